//! Per-topic reducers
//!
//! Each reducer folds one topic's event sequence into a bounded collection.
//! Output depends only on the events applied and the capacity. Local actions
//! (acknowledge, dismiss, mark read, clear) are synchronous and idempotent.

use std::collections::{BTreeMap, HashMap, VecDeque};

use finadvise_types::{
    AgentStatusUpdate, AlertSeverity, CampaignUpdate, LogEntry, LogLevel, Notification,
    SystemAlert,
};

// ============================================================================
// Bounded buffer
// ============================================================================

/// Newest-first ring with a fixed capacity
#[derive(Debug, Clone)]
pub struct BoundedBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Insert at the front, evicting the oldest entry when full
    pub fn push(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        if self.items.len() == self.capacity {
            self.items.pop_back();
        }
        self.items.push_front(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Newest first
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    pub fn first(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn retain(&mut self, f: impl FnMut(&T) -> bool) {
        self.items.retain(f);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.iter().cloned().collect()
    }
}

// ============================================================================
// Status
// ============================================================================

/// Latest status per agent
///
/// Capacity counts distinct agents. An update for a known agent replaces its
/// entry and makes it the most recent; a new agent arriving at capacity
/// evicts the least recently updated one.
#[derive(Debug, Clone)]
pub struct StatusReducer {
    entries: HashMap<String, (u64, AgentStatusUpdate)>,
    order: BTreeMap<u64, String>,
    next_seq: u64,
    capacity: usize,
}

impl StatusReducer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: BTreeMap::new(),
            next_seq: 0,
            capacity,
        }
    }

    pub fn apply(&mut self, update: AgentStatusUpdate) {
        if self.capacity == 0 {
            return;
        }
        let seq = self.next_seq;
        self.next_seq += 1;

        let id = update.agent_id.clone();
        if let Some((old_seq, _)) = self.entries.insert(id.clone(), (seq, update)) {
            self.order.remove(&old_seq);
        }
        self.order.insert(seq, id);

        while self.entries.len() > self.capacity {
            match self.order.pop_first() {
                Some((_, evicted)) => {
                    self.entries.remove(&evicted);
                }
                None => break,
            }
        }
    }

    pub fn get(&self, agent_id: &str) -> Option<&AgentStatusUpdate> {
        self.entries.get(agent_id).map(|(_, update)| update)
    }

    /// Most recently updated first
    pub fn latest(&self) -> Vec<&AgentStatusUpdate> {
        self.order
            .values()
            .rev()
            .filter_map(|id| self.get(id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

// ============================================================================
// Logs
// ============================================================================

#[derive(Debug, Clone)]
pub struct LogReducer {
    logs: BoundedBuffer<LogEntry>,
}

impl LogReducer {
    pub fn new(capacity: usize) -> Self {
        Self {
            logs: BoundedBuffer::new(capacity),
        }
    }

    pub fn apply(&mut self, entry: LogEntry) {
        self.logs.push(entry);
    }

    pub fn entries(&self) -> &BoundedBuffer<LogEntry> {
        &self.logs
    }

    pub fn by_level(&self, level: LogLevel) -> Vec<&LogEntry> {
        self.logs.iter().filter(|l| l.level == level).collect()
    }

    /// Lines emitted by one agent, matched on its display name
    pub fn by_source(&self, source: &str) -> Vec<&LogEntry> {
        self.logs.iter().filter(|l| l.source == source).collect()
    }

    pub fn clear(&mut self) {
        self.logs.clear();
    }
}

// ============================================================================
// Alerts
// ============================================================================

#[derive(Debug, Clone)]
pub struct AlertReducer {
    alerts: BoundedBuffer<SystemAlert>,
}

impl AlertReducer {
    pub fn new(capacity: usize) -> Self {
        Self {
            alerts: BoundedBuffer::new(capacity),
        }
    }

    /// Add an alert unless one with the same id is already held
    pub fn apply(&mut self, alert: SystemAlert) {
        if self.alerts.iter().any(|a| a.id == alert.id) {
            return;
        }
        self.alerts.push(alert);
    }

    pub fn alerts(&self) -> &BoundedBuffer<SystemAlert> {
        &self.alerts
    }

    pub fn acknowledge(&mut self, id: &str) {
        for alert in self.alerts.iter_mut().filter(|a| a.id == id) {
            alert.acknowledged = true;
        }
    }

    pub fn dismiss(&mut self, id: &str) {
        self.alerts.retain(|a| a.id != id);
    }

    pub fn clear_all(&mut self) {
        self.alerts.clear();
    }

    /// Alerts not yet acknowledged
    pub fn unread_count(&self) -> usize {
        self.alerts.iter().filter(|a| !a.acknowledged).count()
    }

    /// Unacknowledged critical alerts
    pub fn critical_count(&self) -> usize {
        self.alerts
            .iter()
            .filter(|a| !a.acknowledged && a.severity == AlertSeverity::Critical)
            .count()
    }
}

// ============================================================================
// Campaign events
// ============================================================================

#[derive(Debug, Clone)]
pub struct CampaignReducer {
    events: BoundedBuffer<CampaignUpdate>,
}

impl CampaignReducer {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: BoundedBuffer::new(capacity),
        }
    }

    pub fn apply(&mut self, event: CampaignUpdate) {
        self.events.push(event);
    }

    pub fn events(&self) -> &BoundedBuffer<CampaignUpdate> {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

// ============================================================================
// Notifications
// ============================================================================

#[derive(Debug, Clone)]
pub struct NotificationReducer {
    notifications: BoundedBuffer<Notification>,
}

impl NotificationReducer {
    pub fn new(capacity: usize) -> Self {
        Self {
            notifications: BoundedBuffer::new(capacity),
        }
    }

    pub fn apply(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn notifications(&self) -> &BoundedBuffer<Notification> {
        &self.notifications
    }

    pub fn mark_as_read(&mut self, id: &str) {
        for notification in self.notifications.iter_mut().filter(|n| n.id == id) {
            notification.read = true;
        }
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    pub fn clear(&mut self) {
        self.notifications.clear();
    }
}
