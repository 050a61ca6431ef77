//! FinAdvise Client - Consumer side of the live event stream
//!
//! - [`ConnectionManager`]: one logical WebSocket connection with bounded,
//!   fixed-delay reconnection and an observable [`ConnectionSnapshot`]
//! - [`reducers`]: bounded per-topic folds over the event stream
//! - [`DashboardStore`]: roster plus every reducer behind one lock
//! - [`ApiClient`]: typed access to the HTTP command surface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use finadvise_client::{ClientConfig, ConnectionManager, DashboardStore};
//!
//! # async fn run() {
//! let config = ClientConfig::from_env();
//! let manager = ConnectionManager::websocket(config.ws_url.clone(), config.reconnect);
//! let store = Arc::new(DashboardStore::new(config.capacities));
//! let _follower = store.clone().follow(manager.subscribe());
//! manager.connect();
//! # }
//! ```

pub mod api;
pub mod config;
pub mod connection;
pub mod error;
pub mod lifecycle;
pub mod reducers;
pub mod store;
pub mod transport;

pub use api::ApiClient;
pub use config::{ClientConfig, ReconnectPolicy, ReducerCapacities};
pub use connection::ConnectionManager;
pub use error::{ClientError, ClientResult, TransportError};
pub use lifecycle::{ConnectionSnapshot, ConnectionState, Decision, Lifecycle};
pub use reducers::{
    AlertReducer, BoundedBuffer, CampaignReducer, LogReducer, NotificationReducer, StatusReducer,
};
pub use store::{AgentFilter, AgentSummary, DashboardStore, SystemStatus};
pub use transport::{Connector, Transport, WsConnector, WsTransport};
