//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tower::ServiceExt;

use helpdesk_api::{AppState, build_app};
use helpdesk_core::config::AppConfig;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for driving the engine directly
    pub state: AppState,
}

/// A decoded HTTP response
pub struct TestResponse {
    /// Status code
    pub status: StatusCode,
    /// Parsed JSON body (`Value::Null` when empty)
    pub body: Value,
}

impl TestApp {
    /// Create a new test application with default configuration
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new test application with a custom configuration
    pub fn with_config(config: AppConfig) -> Self {
        let state = AppState::from_config(config);
        let router = build_app(state.clone());
        Self { router, state }
    }

    /// Make a request and parse the JSON body
    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("infallible router");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// A server bound to an ephemeral local port
pub struct LiveServer {
    /// Listening address
    pub addr: SocketAddr,
    /// Shared state behind the server
    pub state: AppState,
}

/// Spawn the full application on `127.0.0.1:0`
pub async fn spawn_server() -> LiveServer {
    let state = AppState::from_config(AppConfig::default());
    let app = build_app(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server");
    });

    LiveServer { addr, state }
}

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

impl LiveServer {
    /// Open a WebSocket client with the given query string
    pub async fn connect(&self, query: &str) -> WsClient {
        let url = format!("ws://{}/ws?{}", self.addr, query);
        let (client, _) = connect_async(url).await.expect("ws connect");
        client
    }

    /// Poll until `check` holds, or panic after two seconds
    pub async fn wait_until(&self, check: impl Fn(&AppState) -> bool) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        while !check(&self.state) {
            assert!(tokio::time::Instant::now() < deadline, "condition not reached");
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

/// Send a JSON frame
pub async fn send_json(client: &mut WsClient, frame: Value) {
    client
        .send(Message::text(frame.to_string()))
        .await
        .expect("ws send");
}

/// Receive the next JSON text frame, skipping control frames
pub async fn recv_json(client: &mut WsClient) -> Value {
    let next = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            match client.next().await {
                Some(Ok(Message::Text(text))) => {
                    return serde_json::from_str::<Value>(text.as_str()).expect("json frame");
                }
                Some(Ok(Message::Close(_))) | None => panic!("connection closed"),
                Some(Ok(_)) => continue,
                Some(Err(e)) => panic!("ws error: {e}"),
            }
        }
    })
    .await;
    next.expect("frame within timeout")
}

/// Receive frames until one of the given type arrives
pub async fn recv_type(client: &mut WsClient, kind: &str) -> Value {
    loop {
        let frame = recv_json(client).await;
        if frame["type"] == kind {
            return frame;
        }
    }
}

/// Assert that no text frame arrives within a short window
pub async fn assert_silent(client: &mut WsClient) {
    let got = tokio::time::timeout(Duration::from_millis(150), client.next()).await;
    if let Ok(Some(Ok(Message::Text(text)))) = got {
        panic!("unexpected frame: {}", text.as_str());
    }
}
