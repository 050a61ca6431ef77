//! FinAdvise API
//!
//! HTTP and WebSocket surface of the demo event source.
//!
//! # API Structure
//!
//! ```text
//! /api/
//! ├── /health                       - Liveness
//! ├── /agents                       - Roster snapshot
//! │   └── /:id/{status,start,stop,restart,logs}
//! ├── /logs                         - Recent log lines
//! ├── /campaigns, /advisors         - Static listings
//! └── /analytics/{overview,realtime/:metric}
//! /ws                               - Event stream
//! ```

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod websocket;

use axum::http::{header, HeaderName, Method};
use axum::Router;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Enable CORS for browser clients
    pub enable_cors: bool,
    /// Allowed origins for CORS; `*` allows any
    pub cors_origins: Vec<String>,
    /// Enable request tracing
    pub enable_tracing: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            cors_origins: vec!["*".to_string()],
            enable_tracing: true,
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| o.parse().ok()))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Create the main router with all middleware
pub fn create_router(state: Arc<AppState>, config: ApiConfig) -> Router {
    let mut router = Router::new()
        .nest("/api", routes::api_routes())
        .route("/ws", axum::routing::get(websocket::ws_handler))
        .with_state(state);

    let x_request_id = HeaderName::from_static("x-request-id");
    router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));

    if config.enable_tracing {
        router = router.layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");

                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        );
    }

    // Outermost so the trace span sees the generated id
    router = router.layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid));

    if config.enable_cors {
        router = router.layer(cors_layer(&config.cors_origins));
    }

    router
}
