//! Integration tests for WebSocket connection and messaging.

mod helpers;

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::json;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

use helpdesk_core::types::{RoomId, UserId};
use helpdesk_realtime::notification::{NewNotification, NotificationPriority};

#[tokio::test]
async fn test_typing_then_leave_reaches_room_peer() {
    let server = helpers::spawn_server().await;

    let mut alice = server.connect("user_id=alice&room_id=support-1").await;
    server.wait_until(|s| s.realtime.connections.connection_count() == 1).await;
    let mut bob = server.connect("user_id=bob&room_id=support-1").await;
    server.wait_until(|s| s.realtime.connections.connection_count() == 2).await;

    let joined = helpers::recv_json(&mut alice).await;
    assert_eq!(joined["type"], "user_joined");
    assert_eq!(joined["data"]["user_id"], "bob");
    assert_eq!(joined["room_id"], "support-1");

    helpers::send_json(
        &mut alice,
        json!({ "type": "typing_indicator", "data": { "action": "start_typing" } }),
    )
    .await;

    let typing = helpers::recv_json(&mut bob).await;
    assert_eq!(typing["type"], "typing_indicator");
    assert_eq!(typing["data"]["user_id"], "alice");
    assert_eq!(typing["data"]["action"], "start_typing");

    alice.close(None).await.expect("close");

    let left = helpers::recv_type(&mut bob, "user_left").await;
    assert_eq!(left["data"]["user_id"], "alice");
    server.wait_until(|s| s.realtime.connections.connection_count() == 1).await;

    let room = RoomId::from("support-1");
    assert_eq!(
        server.state.realtime.connections.room_users(&room),
        vec![UserId::from("bob")]
    );
}

#[tokio::test]
async fn test_chat_relay_and_acknowledgment() {
    let server = helpers::spawn_server().await;

    let mut alice = server.connect("user_id=alice&room_id=support-1").await;
    let mut bob = server.connect("user_id=bob&room_id=support-1").await;
    server.wait_until(|s| s.realtime.connections.connection_count() == 2).await;

    helpers::send_json(
        &mut alice,
        json!({ "type": "chat_message", "data": { "text": "How can I help?" } }),
    )
    .await;

    let to_bob = helpers::recv_type(&mut bob, "chat_message").await;
    let to_alice = helpers::recv_type(&mut alice, "chat_message").await;
    assert_eq!(to_bob["data"]["text"], "How can I help?");
    assert_eq!(to_bob["sender_id"], "alice");
    assert_eq!(to_bob["requires_ack"], true);
    assert_eq!(to_alice["message_id"], to_bob["message_id"]);

    let message_id = to_bob["message_id"].as_str().expect("message id").to_string();
    helpers::send_json(
        &mut bob,
        json!({ "type": "acknowledgment", "data": { "message_id": message_id } }),
    )
    .await;

    server
        .wait_until(|s| {
            s.realtime
                .router
                .acknowledgments(&message_id)
                .is_some_and(|m| m.acknowledged_by.len() == 1)
        })
        .await;
}

#[tokio::test]
async fn test_malformed_frame_gets_error_and_connection_survives() {
    let server = helpers::spawn_server().await;

    let mut alice = server.connect("user_id=alice&room_id=support-1").await;
    server.wait_until(|s| s.realtime.connections.connection_count() == 1).await;
    let mut bob = server.connect("user_id=bob&room_id=support-1").await;
    server.wait_until(|s| s.realtime.connections.connection_count() == 2).await;
    let _ = helpers::recv_type(&mut alice, "user_joined").await;

    alice
        .send(Message::text("{definitely not json"))
        .await
        .expect("send");

    let error = helpers::recv_json(&mut alice).await;
    assert_eq!(error["type"], "error");
    assert!(error["data"]["error"].is_string());
    helpers::assert_silent(&mut bob).await;

    helpers::send_json(
        &mut alice,
        json!({ "type": "status_update", "data": { "status": "busy" } }),
    )
    .await;
    server
        .wait_until(|s| {
            s.realtime
                .presence
                .get(&UserId::from("alice"))
                .is_some_and(|p| p.status.as_str() == "busy")
        })
        .await;
}

#[tokio::test]
async fn test_oversized_frame_gets_error_and_connection_survives() {
    let server = helpers::spawn_server().await;

    let mut alice = server.connect("user_id=alice&room_id=support-1").await;
    server.wait_until(|s| s.realtime.connections.connection_count() == 1).await;

    helpers::send_json(
        &mut alice,
        json!({ "type": "chat_message", "data": { "text": "x".repeat(200_000) } }),
    )
    .await;

    let error = helpers::recv_json(&mut alice).await;
    assert_eq!(error["type"], "error");
    assert!(
        error["data"]["error"]
            .as_str()
            .is_some_and(|e| e.contains("maximum size"))
    );
    let room = RoomId::from("support-1");
    assert!(server.state.realtime.router.room_history(&room, Some(10)).is_empty());

    helpers::send_json(
        &mut alice,
        json!({ "type": "chat_message", "data": { "text": "short one" } }),
    )
    .await;
    let chat = helpers::recv_type(&mut alice, "chat_message").await;
    assert_eq!(chat["data"]["text"], "short one");
    assert_eq!(server.state.realtime.connections.connection_count(), 1);
}

#[tokio::test]
async fn test_upgrade_requires_user_id() {
    let server = helpers::spawn_server().await;

    for query in ["room_id=support-1", "user_id="] {
        let url = format!("ws://{}/ws?{}", server.addr, query);
        match connect_async(url).await {
            Err(WsError::Http(response)) => assert_eq!(response.status(), 400),
            Err(e) => panic!("expected HTTP 400 for {query}, got {e}"),
            Ok(_) => panic!("upgrade accepted for {query}"),
        }
    }
    assert_eq!(server.state.realtime.connections.connection_count(), 0);
}

#[tokio::test]
async fn test_notification_delivered_live() {
    let server = helpers::spawn_server().await;

    let mut client = server.connect("user_id=u1").await;
    server.wait_until(|s| s.realtime.connections.is_user_connected(&UserId::from("u1"))).await;

    let id = server.state.realtime.notifications.enqueue(
        &UserId::from("u1"),
        NewNotification::new("Ticket escalated", "#7 needs you", NotificationPriority::Critical),
    );

    let frame = helpers::recv_json(&mut client).await;
    assert_eq!(frame["type"], "notification");
    assert_eq!(frame["data"]["notification_id"], id.to_string());
    assert_eq!(frame["data"]["priority"], "critical");
    assert_eq!(frame["requires_ack"], true);
}

#[tokio::test]
async fn test_shutdown_closes_clients() {
    let server = helpers::spawn_server().await;

    let mut client = server.connect("user_id=u1&room_id=support-1").await;
    server.wait_until(|s| s.realtime.connections.connection_count() == 1).await;

    assert_eq!(server.state.realtime.shutdown(), 1);

    let closed = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            match client.next().await {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => return,
                Some(Ok(_)) => continue,
            }
        }
    })
    .await;
    assert!(closed.is_ok(), "client was not closed");
}
