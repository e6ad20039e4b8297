//! WebSocket lifecycle integration tests.
//!
//! Tests the transport lifecycle against a local mock feed:
//! - Connection establishment and subscribe-frame delivery
//! - Frame forwarding with connect/disconnect markers
//! - Shutdown via cancellation

mod integration;
use integration::common::mock_ws::MockFeedServer;

use bandwatch_ws::{ConnectionConfig, ConnectionManager, TransportEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn transport_connects_and_sends_subscribe_frame() {
    let server = MockFeedServer::start(Vec::new()).await;

    let config = ConnectionConfig {
        url: server.url(),
        subscribe_frame: Some(r#"{"type":"subscribe","channel":"btc_jpy-trades"}"#.to_string()),
        max_reconnect_attempts: 3,
        reconnect_base_delay_ms: 50,
        reconnect_max_delay_ms: 200,
    };

    let (tx, mut rx) = mpsc::channel(16);
    let token = CancellationToken::new();
    let manager = Arc::new(ConnectionManager::new(config, tx, token.clone()));

    let manager_clone = manager.clone();
    let handle = tokio::spawn(async move {
        let _ = manager_clone.run().await;
    });

    // First event must be the Connected marker.
    let event = timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("event within timeout")
        .expect("channel open");
    assert!(matches!(event, TransportEvent::Connected));

    // The subscribe frame reaches the server.
    let subscribed = timeout(Duration::from_secs(2), async {
        loop {
            let frames = server.received_frames().await;
            if frames
                .iter()
                .any(|f| f.contains("btc_jpy-trades"))
            {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
    .await;
    assert!(subscribed.is_ok(), "subscribe frame should arrive");
    assert!(server.connection_count().await >= 1);

    token.cancel();
    let _ = handle.await;
    server.shutdown().await;
}

#[tokio::test]
async fn transport_forwards_frames_in_order() {
    let frames = vec![
        r#"[1, "btc_jpy", "100.0", "1.0", "buy"]"#.to_string(),
        r#"[2, "btc_jpy", "101.0", "2.0", "sell"]"#.to_string(),
    ];
    let server = MockFeedServer::start(frames.clone()).await;

    let config = ConnectionConfig {
        url: server.url(),
        subscribe_frame: None,
        max_reconnect_attempts: 3,
        reconnect_base_delay_ms: 50,
        reconnect_max_delay_ms: 200,
    };

    let (tx, mut rx) = mpsc::channel(16);
    let token = CancellationToken::new();
    let manager = ConnectionManager::new(config, tx, token.clone());
    let handle = tokio::spawn(async move {
        let _ = manager.run().await;
    });

    let mut seen = Vec::new();
    let collected = timeout(Duration::from_secs(2), async {
        while seen.len() < 2 {
            match rx.recv().await {
                Some(TransportEvent::Frame(text)) => seen.push(text),
                Some(_) => {}
                None => break,
            }
        }
    })
    .await;
    assert!(collected.is_ok(), "frames should arrive within timeout");
    assert_eq!(seen, frames);

    token.cancel();
    let _ = handle.await;
    server.shutdown().await;
}

#[tokio::test]
async fn cancelled_transport_stops_cleanly() {
    let server = MockFeedServer::start(Vec::new()).await;

    let config = ConnectionConfig {
        url: server.url(),
        subscribe_frame: None,
        max_reconnect_attempts: 0,
        reconnect_base_delay_ms: 50,
        reconnect_max_delay_ms: 200,
    };

    let (tx, mut rx) = mpsc::channel(16);
    let token = CancellationToken::new();
    let manager = ConnectionManager::new(config, tx, token.clone());
    let handle = tokio::spawn(async move { manager.run().await });

    // Wait until connected, then cancel.
    let event = timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("event within timeout");
    assert!(matches!(event, Some(TransportEvent::Connected)));

    token.cancel();
    let result = timeout(Duration::from_secs(2), handle)
        .await
        .expect("run() should return after cancel")
        .expect("task should not panic");
    assert!(result.is_ok());

    server.shutdown().await;
}
