//! Integration tests for the REST API.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpdesk_core::types::{RoomId, UserId};
use helpdesk_realtime::presence::UserStatus;

#[tokio::test]
async fn test_health_check() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["status"], "ok");
    assert!(response.body["data"]["version"].is_string());
}

#[tokio::test]
async fn test_detailed_health_counts_connections() {
    let app = helpers::TestApp::new();
    let engine = &app.state.realtime;
    let room = RoomId::from("support-1");
    let (_a, _rx_a) = engine.connections.register(UserId::from("alice"), Some(room.clone()));
    let (_b, _rx_b) = engine.connections.register(UserId::from("alice"), None);
    let (_c, _rx_c) = engine.connections.register(UserId::from("bob"), Some(room));

    let response = app.request("GET", "/api/health/detailed", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["ws_connections"], 3);
    assert_eq!(data["connected_users"], 2);
    assert_eq!(data["active_rooms"], 1);
    assert_eq!(data["online_users"], 2);
}

#[tokio::test]
async fn test_realtime_stats_reports_metrics() {
    let app = helpers::TestApp::new();
    let (_a, _rx) = app
        .state
        .realtime
        .connections
        .register(UserId::from("alice"), None);

    let response = app.request("GET", "/api/realtime/stats", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["metrics"]["connections_total"], 1);
    assert_eq!(response.body["data"]["metrics"]["connections_active"], 1);
}

#[tokio::test]
async fn test_presence_endpoints() {
    let app = helpers::TestApp::new();
    let presence = &app.state.realtime.presence;
    let alice = UserId::from("alice");
    let room = RoomId::from("support-1");
    presence.update(&alice, UserStatus::Online, Some(&room), None, None);
    presence.update(&alice, UserStatus::Away, None, None, None);
    presence.update(&UserId::from("bob"), UserStatus::Offline, None, None, None);

    let online = app.request("GET", "/api/presence/online", None).await;
    assert_eq!(online.status, StatusCode::OK);
    assert_eq!(online.body["data"]["count"], 1);
    assert_eq!(online.body["data"]["users"][0]["user_id"], "alice");

    let one = app.request("GET", "/api/presence/users/alice", None).await;
    assert_eq!(one.status, StatusCode::OK);
    assert_eq!(one.body["data"]["status"], "away");
    assert_eq!(one.body["data"]["current_room"], "support-1");

    let history = app
        .request("GET", "/api/presence/users/alice/history", None)
        .await;
    let changes = history.body["data"].as_array().expect("array");
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[1]["from_status"], "online");
    assert_eq!(changes[1]["to_status"], "away");

    let room_presence = app
        .request("GET", "/api/rooms/support-1/presence", None)
        .await;
    assert_eq!(room_presence.body["data"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_unknown_user_presence_is_not_found() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/presence/users/ghost", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_room_users_and_typing() {
    let app = helpers::TestApp::new();
    let engine = &app.state.realtime;
    let room = RoomId::from("support-1");
    let (_a, _rx_a) = engine.connections.register(UserId::from("alice"), Some(room.clone()));
    let (_b, _rx_b) = engine.connections.register(UserId::from("bob"), Some(room.clone()));
    let (_c, _rx_c) = engine.connections.register(UserId::from("bob"), Some(room.clone()));
    engine.typing.start_typing(&UserId::from("bob"), &room);

    let users = app.request("GET", "/api/rooms/support-1/users", None).await;
    assert_eq!(users.status, StatusCode::OK);
    assert_eq!(users.body["data"]["count"], 2);
    assert_eq!(users.body["data"]["users"], json!(["alice", "bob"]));

    let typing = app.request("GET", "/api/rooms/support-1/typing", None).await;
    assert_eq!(typing.body["data"]["typing_users"], json!(["bob"]));

    let empty = app.request("GET", "/api/rooms/nobody/users", None).await;
    assert_eq!(empty.body["data"]["count"], 0);
}

#[tokio::test]
async fn test_room_connections_lists_live_connections() {
    let app = helpers::TestApp::new();
    let engine = &app.state.realtime;
    let room = RoomId::from("support-1");
    let (a, _rx_a) = engine.connections.register(UserId::from("alice"), Some(room.clone()));
    let (b, _rx_b) = engine.connections.register(UserId::from("bob"), Some(room.clone()));
    let (_c, _rx_c) = engine
        .connections
        .register(UserId::from("carol"), Some(RoomId::from("billing")));
    engine.connections.unregister(&b.id);

    let response = app
        .request("GET", "/api/rooms/support-1/connections", None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let connections = response.body["data"].as_array().expect("array");
    assert_eq!(connections.len(), 1);
    assert_eq!(connections[0]["id"], a.id.to_string());
    assert_eq!(connections[0]["user_id"], "alice");
    assert_eq!(connections[0]["room_id"], "support-1");
    assert_eq!(connections[0]["alive"], true);
}

#[tokio::test]
async fn test_room_history_returns_recent_chat() {
    let app = helpers::TestApp::new();
    let engine = &app.state.realtime;
    let (a, _rx) = engine
        .connections
        .register(UserId::from("alice"), Some(RoomId::from("support-1")));

    for text in ["one", "two", "three"] {
        let frame = json!({ "type": "chat_message", "data": { "text": text } });
        engine.router.handle_frame(&a.id, frame.to_string().as_bytes());
    }

    let response = app
        .request("GET", "/api/rooms/support-1/history?limit=2", None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let frames = response.body["data"].as_array().expect("array");
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0]["data"]["text"], "two");
    assert_eq!(frames[1]["data"]["text"], "three");
}

#[tokio::test]
async fn test_notification_lifecycle() {
    let app = helpers::TestApp::new();

    let created = app
        .request(
            "POST",
            "/api/notifications/u1",
            Some(json!({ "title": "Ticket assigned", "message": "#42 is yours", "priority": "high" })),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["data"]["notification_id"]
        .as_str()
        .expect("id")
        .to_string();

    app.request(
        "POST",
        "/api/notifications/u1",
        Some(json!({ "title": "FYI", "message": "Queue is quiet" })),
    )
    .await;

    let count = app
        .request("GET", "/api/notifications/u1/unread-count", None)
        .await;
    assert_eq!(count.body["data"]["count"], 2);

    let listed = app.request("GET", "/api/notifications/u1", None).await;
    let items = listed.body["data"].as_array().expect("array");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["title"], "FYI");
    assert_eq!(items[0]["priority"], "normal");

    let marked = app
        .request("PUT", &format!("/api/notifications/u1/{id}/read"), None)
        .await;
    assert_eq!(marked.status, StatusCode::OK);

    let unread = app
        .request("GET", "/api/notifications/u1?unread_only=true", None)
        .await;
    let items = unread.body["data"].as_array().expect("array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "FYI");

    let all = app
        .request("PUT", "/api/notifications/u1/read-all", None)
        .await;
    assert_eq!(all.body["data"]["marked"], 1);

    let count = app
        .request("GET", "/api/notifications/u1/unread-count", None)
        .await;
    assert_eq!(count.body["data"]["count"], 0);
}

#[tokio::test]
async fn test_mark_read_unknown_notification_is_not_found() {
    let app = helpers::TestApp::new();
    let missing = helpdesk_core::types::NotificationId::new();

    let response = app
        .request("PUT", &format!("/api/notifications/u1/{missing}/read"), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let malformed = app
        .request("PUT", "/api/notifications/u1/not-a-uuid/read", None)
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_notification_validates_body() {
    let app = helpers::TestApp::new();

    let empty_title = app
        .request(
            "POST",
            "/api/notifications/u1",
            Some(json!({ "title": "", "message": "body" })),
        )
        .await;
    assert_eq!(empty_title.status, StatusCode::BAD_REQUEST);
    assert_eq!(empty_title.body["error"], "VALIDATION_ERROR");

    let bad_priority = app
        .request(
            "POST",
            "/api/notifications/u1",
            Some(json!({ "title": "t", "message": "m", "priority": "urgent" })),
        )
        .await;
    assert_eq!(bad_priority.status, StatusCode::BAD_REQUEST);

    let count = app
        .request("GET", "/api/notifications/u1/unread-count", None)
        .await;
    assert_eq!(count.body["data"]["count"], 0);
}

#[tokio::test]
async fn test_system_alert_targets_room() {
    let app = helpers::TestApp::new();
    let engine = &app.state.realtime;
    let (_a, mut rx_a) = engine
        .connections
        .register(UserId::from("alice"), Some(RoomId::from("support-1")));
    let (_b, mut rx_b) = engine
        .connections
        .register(UserId::from("bob"), Some(RoomId::from("billing")));
    while rx_a.try_recv().is_ok() {}

    let response = app
        .request(
            "POST",
            "/api/alerts",
            Some(json!({ "title": "Maintenance", "message": "Restart at 5", "room_id": "support-1" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["delivered"], 1);

    let frame: serde_json::Value =
        serde_json::from_str(&rx_a.try_recv().expect("alert")).expect("json");
    assert_eq!(frame["type"], "system_alert");
    assert_eq!(frame["data"]["priority"], "high");
    assert!(rx_b.try_recv().is_err());
}

#[tokio::test]
async fn test_system_alert_without_room_reaches_everyone() {
    let app = helpers::TestApp::new();
    let engine = &app.state.realtime;
    let (_a, _rx_a) = engine.connections.register(UserId::from("alice"), None);
    let (_b, _rx_b) = engine
        .connections
        .register(UserId::from("bob"), Some(RoomId::from("billing")));

    let response = app
        .request(
            "POST",
            "/api/alerts",
            Some(json!({ "title": "Heads up", "message": "All hands", "priority": "critical" })),
        )
        .await;

    assert_eq!(response.body["data"]["delivered"], 2);
}
