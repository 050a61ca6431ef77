//! Agent registry
//!
//! Ordered roster with a per-agent command generation. The generation is
//! bumped by every operator command and lets a delayed restart detect that it
//! has been superseded.

use std::time::Duration;

use finadvise_types::Agent;

#[derive(Debug, Clone)]
pub(crate) struct AgentRecord {
    pub agent: Agent,
    pub generation: u64,
    /// Running time not yet counted into the whole-second `uptime`
    pub uptime_carry: Duration,
}

/// Roster of agents, in seed order
#[derive(Debug, Clone, Default)]
pub struct AgentRegistry {
    records: Vec<AgentRecord>,
}

impl AgentRegistry {
    pub fn new(agents: Vec<Agent>) -> Self {
        Self {
            records: agents
                .into_iter()
                .map(|agent| AgentRecord {
                    agent,
                    generation: 0,
                    uptime_carry: Duration::ZERO,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Agent> {
        self.records.iter().find(|r| r.agent.id == id).map(|r| &r.agent)
    }

    pub(crate) fn record_mut(&mut self, id: &str) -> Option<&mut AgentRecord> {
        self.records.iter_mut().find(|r| r.agent.id == id)
    }

    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.records.iter().map(|r| &r.agent)
    }

    pub(crate) fn records_mut(&mut self) -> impl Iterator<Item = &mut AgentRecord> {
        self.records.iter_mut()
    }

    pub(crate) fn nth(&self, index: usize) -> Option<&Agent> {
        self.records.get(index).map(|r| &r.agent)
    }

    /// Snapshot copy of the roster
    pub fn snapshot(&self) -> Vec<Agent> {
        self.agents().cloned().collect()
    }
}
