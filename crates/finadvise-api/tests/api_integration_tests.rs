//! API Integration Tests
//!
//! Drives the full router (middleware included) over a seeded event source.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use finadvise_api::{create_router, ApiConfig, AppState};
use finadvise_source::{EventSource, SimulationConfig};
use finadvise_types::{AgentStatus, ClientEvent, ServerEvent};

fn test_router() -> (Router, EventSource) {
    let source = EventSource::new(SimulationConfig::seeded(42));
    let state = Arc::new(AppState::new(source.clone()));
    (create_router(state, ApiConfig::default()), source)
}

/// Make a request and decode the JSON response
async fn json_request(router: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::empty())
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(json!(null));

    (status, json)
}

// =============================================================================
// Reads
// =============================================================================

#[cfg(test)]
mod reads {
    use super::*;

    #[tokio::test]
    async fn test_health() {
        let (router, _) = test_router();
        let (status, json) = json_request(&router, "GET", "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
        assert!(json.get("timestamp").is_some());
        assert!(json["uptimeSeconds"].is_u64());
    }

    #[tokio::test]
    async fn test_list_agents() {
        let (router, _) = test_router();
        let (status, json) = json_request(&router, "GET", "/api/agents").await;

        assert_eq!(status, StatusCode::OK);
        let agents = json.as_array().unwrap();
        assert_eq!(agents.len(), 10);
        assert_eq!(agents[0]["id"], "agent-1");
        assert_eq!(agents[0]["type"], "content_generator");
        assert!(agents[0]["metrics"].get("totalRequests").is_some());
    }

    #[tokio::test]
    async fn test_agent_status() {
        let (router, _) = test_router();
        let (status, json) = json_request(&router, "GET", "/api/agents/agent-3/status").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "idle");
        assert!(json["metrics"].get("cpu").is_some());
    }

    #[tokio::test]
    async fn test_unknown_agent_status_is_404() {
        let (router, _) = test_router();
        let (status, json) = json_request(&router, "GET", "/api/agents/agent-404/status").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json, json!({"error": "Agent not found"}));
    }

    #[tokio::test]
    async fn test_logs_default_limit() {
        let (router, _) = test_router();
        let (status, json) = json_request(&router, "GET", "/api/logs").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 100);
    }

    #[tokio::test]
    async fn test_logs_with_limit() {
        let (router, _) = test_router();
        let (_, json) = json_request(&router, "GET", "/api/logs?limit=7").await;

        let logs = json.as_array().unwrap();
        assert_eq!(logs.len(), 7);
        for entry in logs {
            assert!(["info", "warn", "error"].contains(&entry["level"].as_str().unwrap()));
        }
    }

    #[tokio::test]
    async fn test_logs_non_numeric_limit_uses_default() {
        let (router, _) = test_router();
        let (status, json) = json_request(&router, "GET", "/api/logs?limit=abc").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 100);
    }

    #[tokio::test]
    async fn test_logs_negative_limit_is_empty() {
        let (router, _) = test_router();
        let (status, json) = json_request(&router, "GET", "/api/logs?limit=-5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!([]));

        let (status, json) = json_request(&router, "GET", "/api/agents/agent-6/logs?limit=-1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!([]));
    }

    #[tokio::test]
    async fn test_agent_logs() {
        let (router, _) = test_router();
        let (status, json) = json_request(&router, "GET", "/api/agents/agent-6/logs?limit=3").await;

        assert_eq!(status, StatusCode::OK);
        let logs = json.as_array().unwrap();
        assert_eq!(logs.len(), 3);
        assert!(logs.iter().all(|l| l["source"] == "Market Intelligence"));

        let (status, _) = json_request(&router, "GET", "/api/agents/ghost/logs").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_static_listings() {
        let (router, _) = test_router();

        let (status, campaigns) = json_request(&router, "GET", "/api/campaigns").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(campaigns[0]["name"], "Daily Market Updates");
        assert_eq!(campaigns[1]["status"], "scheduled");

        let (status, advisors) = json_request(&router, "GET", "/api/advisors").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(advisors.as_array().unwrap().len(), 2);
        assert!(advisors[0].get("lastActive").is_some());
    }

    #[tokio::test]
    async fn test_analytics() {
        let (router, _) = test_router();

        let (status, overview) = json_request(&router, "GET", "/api/analytics/overview").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(overview["systemHealth"], 90);
        assert_eq!(overview["activeCampaigns"], 12);

        let (status, series) = json_request(&router, "GET", "/api/analytics/realtime/cpu").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(series.as_array().unwrap().len(), 50);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (router, _) = test_router();
        let (status, _) = json_request(&router, "GET", "/api/nothing-here").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

// =============================================================================
// Commands
// =============================================================================

#[cfg(test)]
mod commands {
    use super::*;

    #[tokio::test]
    async fn test_stop_then_status() {
        let (router, source) = test_router();
        let before = source.agent("agent-1").unwrap().metrics;

        let (status, ack) = json_request(&router, "POST", "/api/agents/agent-1/stop").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ack, json!({"success": true, "status": "stopped"}));

        let (_, json) = json_request(&router, "GET", "/api/agents/agent-1/status").await;
        assert_eq!(json["status"], "stopped");
        assert_eq!(json["metrics"]["cpu"], 0.0);
        assert_eq!(json["metrics"]["memory"], 0.0);
        assert_eq!(json["metrics"]["requestsPerSecond"], 0.0);
        assert_eq!(json["metrics"]["totalRequests"], before.total_requests);
    }

    #[tokio::test]
    async fn test_start() {
        let (router, source) = test_router();
        let (status, ack) = json_request(&router, "POST", "/api/agents/agent-8/start").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(ack, json!({"success": true, "status": "active"}));
        assert_eq!(source.agent("agent-8").unwrap().status, AgentStatus::Active);
    }

    #[tokio::test]
    async fn test_restart_acknowledges_immediately() {
        let (router, source) = test_router();
        let (status, ack) = json_request(&router, "POST", "/api/agents/agent-2/restart").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(ack, json!({"success": true, "status": "restarting"}));
        assert_eq!(source.agent("agent-2").unwrap().status, AgentStatus::Processing);
    }

    #[tokio::test]
    async fn test_commands_on_unknown_agent() {
        let (router, _) = test_router();
        for action in ["start", "stop", "restart"] {
            let uri = format!("/api/agents/agent-0/{}", action);
            let (status, json) = json_request(&router, "POST", &uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{}", action);
            assert_eq!(json["error"], "Agent not found");
        }
    }

    #[tokio::test]
    async fn test_commands_publish_events() {
        let (router, source) = test_router();
        let mut rx = source.subscribe();

        json_request(&router, "POST", "/api/agents/agent-5/stop").await;
        match rx.recv().await.unwrap() {
            ServerEvent::AgentStatus(update) => {
                assert_eq!(update.agent_id, "agent-5");
                assert_eq!(update.status, AgentStatus::Stopped);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}

// =============================================================================
// Middleware
// =============================================================================

#[cfg(test)]
mod middleware {
    use super::*;

    #[tokio::test]
    async fn test_cors_preflight() {
        let (router, _) = test_router();
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/agents/agent-1/start")
            .header("Origin", "http://localhost:3000")
            .header("Access-Control-Request-Method", "POST")
            .header("Access-Control-Request-Headers", "content-type")
            .body(Body::empty())
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        let methods = headers["access-control-allow-methods"].to_str().unwrap();
        assert!(methods.contains("POST"));
        assert!(methods.contains("DELETE"));
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let (router, _) = test_router();
        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }
}

// =============================================================================
// WebSocket
// =============================================================================

#[cfg(test)]
mod websocket {
    use super::*;
    use tokio_tungstenite::{connect_async, tungstenite::Message};

    async fn next_event<S>(ws: &mut S) -> ServerEvent
    where
        S: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
    {
        loop {
            let msg = tokio::time::timeout(std::time::Duration::from_secs(5), ws.next())
                .await
                .expect("timed out waiting for a frame")
                .expect("stream ended")
                .expect("websocket error");
            if let Message::Text(text) = msg {
                return ServerEvent::from_frame(&text).unwrap();
            }
        }
    }

    #[tokio::test]
    async fn test_initial_snapshot_then_live_deltas() {
        let (router, source) = test_router();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let (mut ws, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();

        match next_event(&mut ws).await {
            ServerEvent::AgentsInitial(agents) => assert_eq!(agents.len(), 10),
            other => panic!("expected agents:initial, got {:?}", other),
        }
        assert_eq!(source.bus().subscriber_count(), 1);

        let subscribe = ClientEvent::MetricsSubscribe {
            metric: "cpu".to_string(),
        };
        ws.send(Message::Text(subscribe.to_frame().unwrap())).await.unwrap();

        source.stop_agent("agent-10").unwrap();
        match next_event(&mut ws).await {
            ServerEvent::AgentStatus(update) => {
                assert_eq!(update.agent_id, "agent-10");
                assert_eq!(update.status, AgentStatus::Stopped);
            }
            other => panic!("expected agent:status, got {:?}", other),
        }

        ws.close(None).await.unwrap();
    }
}
