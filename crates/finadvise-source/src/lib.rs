//! FinAdvise Source - Mock real-time event source
//!
//! Owns a fixed roster of agents, mutates it on independent timers and
//! publishes every delta on an in-process event bus.
//!
//! # Timers
//!
//! ```text
//! every 2s   metrics random walk   -> agent:status (per running agent)
//! every 5s   log line              -> log:stream
//! every 10s  campaign event        -> campaign:update
//! every 15s  alert roll (p = 0.3)  -> system:alert
//! ```
//!
//! Operator commands (start, stop, restart) mutate the roster synchronously
//! and publish `agent:status`. A restart completes after a delay unless a
//! newer command reached the agent first.

pub mod bus;
pub mod catalog;
pub mod config;
pub mod error;
pub mod registry;
pub mod seed;
pub mod simulation;
pub mod source;

pub use bus::EventBus;
pub use config::SimulationConfig;
pub use error::{SourceError, SourceResult};
pub use registry::AgentRegistry;
pub use seed::demo_roster;
pub use simulation::SimulationHandle;
pub use source::EventSource;
