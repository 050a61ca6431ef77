//! FinAdvise Types - Wire and domain types for the live demo backplane
//!
//! This crate has zero dependencies on other finadvise crates. It defines:
//!
//! - Agent entities, statuses and metrics
//! - The topic-keyed event envelope pushed over the WebSocket
//! - Client-to-server control frames
//! - Request/response bodies of the HTTP command surface
//!
//! # Wire Envelope
//!
//! ```text
//! {"event": "<topic>", "data": <payload>}
//! ```

pub mod agent;
pub mod api;
pub mod error;
pub mod events;

pub use agent::*;
pub use api::*;
pub use error::*;
pub use events::*;
