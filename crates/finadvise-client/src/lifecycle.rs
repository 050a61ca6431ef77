//! Connection lifecycle
//!
//! Synchronous state machine holding every reconnect decision. The connection
//! task reports what happened to the transport and acts on the returned
//! [`Decision`]; no I/O happens here.
//!
//! Each `connect()` and `disconnect()` opens a new session. Reports carrying
//! an older session are ignored, so a task that outlived its session can never
//! overwrite the state of a newer one.

use std::fmt;
use std::time::Duration;

use crate::config::ReconnectPolicy;

/// Observable connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Error => "error",
        };
        f.write_str(label)
    }
}

/// Point-in-time view of the connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSnapshot {
    pub state: ConnectionState,
    /// Reconnect attempts since the last successful open
    pub attempts: u32,
    pub last_error: Option<String>,
}

impl ConnectionSnapshot {
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }
}

impl Default for ConnectionSnapshot {
    fn default() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            attempts: 0,
            last_error: None,
        }
    }
}

/// What the connection task should do after a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Wait `delay`, then dial again
    Retry { attempt: u32, delay: Duration },
    /// Stop; only a new `connect()` resumes
    GiveUp,
}

/// Identifier of one `connect()` call
pub type Session = u64;

#[derive(Debug, Clone)]
pub struct Lifecycle {
    policy: ReconnectPolicy,
    state: ConnectionState,
    attempts: u32,
    last_error: Option<String>,
    session: Session,
}

impl Lifecycle {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            policy,
            state: ConnectionState::Disconnected,
            attempts: 0,
            last_error: None,
            session: 0,
        }
    }

    pub fn policy(&self) -> ReconnectPolicy {
        self.policy
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn snapshot(&self) -> ConnectionSnapshot {
        ConnectionSnapshot {
            state: self.state,
            attempts: self.attempts,
            last_error: self.last_error.clone(),
        }
    }

    /// Outbound frames are only forwarded while connected
    pub fn can_emit(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Attempts exhausted; waiting for an explicit `connect()`
    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.policy.max_attempts
            && matches!(self.state, ConnectionState::Disconnected | ConnectionState::Error)
    }

    fn is_current(&self, session: Session) -> bool {
        session == self.session
    }

    /// Caller asked to connect
    ///
    /// Returns the new session, or `None` when already connected or
    /// connecting. An exhausted lifecycle starts over with zero attempts.
    pub fn begin_connect(&mut self) -> Option<Session> {
        if matches!(self.state, ConnectionState::Connected | ConnectionState::Connecting) {
            return None;
        }
        if self.is_exhausted() {
            self.attempts = 0;
        }
        self.session += 1;
        self.state = ConnectionState::Connecting;
        self.last_error = None;
        Some(self.session)
    }

    /// Transport opened; returns false if the session is stale
    pub fn on_open(&mut self, session: Session) -> bool {
        if !self.is_current(session) {
            return false;
        }
        self.state = ConnectionState::Connected;
        self.attempts = 0;
        self.last_error = None;
        true
    }

    /// Handshake failed
    pub fn on_connect_failed(&mut self, session: Session, error: impl Into<String>) -> Decision {
        if !self.is_current(session) {
            return Decision::GiveUp;
        }
        self.state = ConnectionState::Error;
        self.last_error = Some(error.into());
        self.schedule()
    }

    /// Open transport closed without the caller asking
    pub fn on_closed(&mut self, session: Session, reason: impl Into<String>) -> Decision {
        if !self.is_current(session) {
            return Decision::GiveUp;
        }
        self.state = ConnectionState::Disconnected;
        self.last_error = Some(reason.into());
        self.schedule()
    }

    fn schedule(&mut self) -> Decision {
        if self.attempts < self.policy.max_attempts {
            self.attempts += 1;
            Decision::Retry {
                attempt: self.attempts,
                delay: self.policy.delay,
            }
        } else {
            Decision::GiveUp
        }
    }

    /// Retry delay elapsed; returns false if the session is stale
    pub fn on_retry(&mut self, session: Session) -> bool {
        if !self.is_current(session) {
            return false;
        }
        self.state = ConnectionState::Connecting;
        true
    }

    /// Caller asked to disconnect; the only path that suppresses reconnects
    pub fn on_manual_disconnect(&mut self) {
        self.session += 1;
        self.state = ConnectionState::Disconnected;
        self.attempts = 0;
        self.last_error = None;
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new(ReconnectPolicy::default())
    }
}
