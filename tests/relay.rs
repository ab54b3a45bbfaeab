//! End-to-end tests against a relay bound to an ephemeral port.

#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use screeniverse_relay::app_state::AppState;
use screeniverse_relay::build_app;
use screeniverse_relay::config::RelayConfig;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const SILENCE: Duration = Duration::from_millis(200);
const PATIENCE: Duration = Duration::from_secs(5);

async fn spawn_relay() -> SocketAddr {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let config = RelayConfig {
        listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        static_dir: root.join("client"),
        entry_document: root.join("client").join("screens.html"),
        ..RelayConfig::default()
    };
    let Ok(listener) = tokio::net::TcpListener::bind(config.listen_addr).await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    let app = build_app(AppState::new(config));
    tokio::spawn(async move { axum::serve(listener, app).await });
    addr
}

async fn connect(addr: SocketAddr) -> Client {
    let url = format!("ws://{addr}/screeniverse-socket-io");
    let Ok((socket, _)) = tokio_tungstenite::connect_async(url).await else {
        panic!("ws connect failed");
    };
    socket
}

async fn send(client: &mut Client, frame: Value) {
    if client.send(Message::text(frame.to_string())).await.is_err() {
        panic!("ws send failed");
    }
}

async fn recv(client: &mut Client) -> Value {
    loop {
        let Ok(next) = tokio::time::timeout(PATIENCE, client.next()).await else {
            panic!("timed out waiting for a frame");
        };
        match next {
            Some(Ok(Message::Text(text))) => {
                let Ok(value) = serde_json::from_str(text.as_str()) else {
                    panic!("server sent invalid JSON: {text}");
                };
                return value;
            }
            Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
            other => panic!("unexpected ws item: {other:?}"),
        }
    }
}

async fn assert_silent(client: &mut Client) {
    if let Ok(frame) = tokio::time::timeout(SILENCE, client.next()).await {
        panic!("expected silence, got {frame:?}");
    }
}

async fn health(addr: SocketAddr) -> Value {
    let Ok(response) = reqwest::get(format!("http://{addr}/health")).await else {
        panic!("health request failed");
    };
    let Ok(body) = response.json::<Value>().await else {
        panic!("health body is not JSON");
    };
    body
}

/// Polls `/health` until `field` equals `expected`.
async fn wait_for(addr: SocketAddr, field: &str, expected: u64) {
    let deadline = tokio::time::Instant::now() + PATIENCE;
    loop {
        if health(addr).await.get(field).and_then(Value::as_u64) == Some(expected) {
            return;
        }
        if tokio::time::Instant::now() > deadline {
            panic!("{field} never reached {expected}");
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

fn new_view(payload: Value) -> Value {
    json!({"event": "newCameraView", "payload": payload})
}

#[tokio::test]
async fn serves_entry_document_and_assets() {
    let addr = spawn_relay().await;

    let Ok(entry) = reqwest::get(format!("http://{addr}/screeniverse")).await else {
        panic!("entry request failed");
    };
    assert_eq!(entry.status(), StatusCode::OK);
    let Ok(html) = entry.text().await else {
        panic!("entry body unreadable");
    };
    assert!(html.contains("relay.js"));

    let Ok(asset) = reqwest::get(format!("http://{addr}/screeniverse/relay.js")).await else {
        panic!("asset request failed");
    };
    assert_eq!(asset.status(), StatusCode::OK);

    let Ok(missing) = reqwest::get(format!("http://{addr}/screeniverse/nope.js")).await else {
        panic!("missing asset request failed");
    };
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_views_and_connections() {
    let addr = spawn_relay().await;
    let body = health(addr).await;
    assert_eq!(body.get("status"), Some(&json!("healthy")));
    assert_eq!(body.get("views"), Some(&json!(0)));
    assert_eq!(body.get("connections"), Some(&json!(0)));

    let _a = connect(addr).await;
    wait_for(addr, "connections", 1).await;
}

#[tokio::test]
async fn end_to_end_scenario() {
    let addr = spawn_relay().await;

    let mut a = connect(addr).await;
    send(&mut a, new_view(json!({"id": 1}))).await;
    wait_for(addr, "views", 1).await;

    let mut b = connect(addr).await;
    assert_eq!(recv(&mut b).await, new_view(json!({"id": 1})));
    wait_for(addr, "connections", 2).await;

    send(&mut b, new_view(json!({"id": 2}))).await;
    assert_eq!(recv(&mut a).await, new_view(json!({"id": 2})));
    wait_for(addr, "views", 2).await;

    send(&mut a, json!({"event": "wipeAllViews"})).await;
    assert_eq!(recv(&mut b).await, json!({"event": "wipeAllViews"}));
    wait_for(addr, "views", 0).await;
    assert_silent(&mut a).await;

    let mut c = connect(addr).await;
    wait_for(addr, "connections", 3).await;
    assert_silent(&mut c).await;
}

#[tokio::test]
async fn synch_is_forwarded_to_others_only() {
    let addr = spawn_relay().await;
    let mut a = connect(addr).await;
    let mut b = connect(addr).await;
    let mut c = connect(addr).await;
    wait_for(addr, "connections", 3).await;

    let synch = json!({"event": "synchWithMe", "payload": {"camera": [1.5, 2, -3]}});
    send(&mut a, synch.clone()).await;

    assert_eq!(recv(&mut b).await, synch);
    assert_eq!(recv(&mut c).await, synch);
    assert_silent(&mut a).await;
    assert_eq!(health(addr).await.get("views"), Some(&json!(0)));
}

// The HTTP wipe clears the store but, unlike the wipeAllViews event,
// does not tell connected clients.
#[tokio::test]
async fn http_wipe_redirects_without_broadcast() {
    let addr = spawn_relay().await;
    let mut a = connect(addr).await;
    let mut b = connect(addr).await;
    wait_for(addr, "connections", 2).await;

    send(&mut a, new_view(json!("first"))).await;
    assert_eq!(recv(&mut b).await, new_view(json!("first")));

    let Ok(http) = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
    else {
        panic!("client build failed");
    };
    for method in [reqwest::Method::GET, reqwest::Method::POST, reqwest::Method::DELETE] {
        let Ok(response) = http
            .request(method, format!("http://{addr}/screeniverse/wipe"))
            .send()
            .await
        else {
            panic!("wipe request failed");
        };
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok()),
            Some("/screeniverse")
        );
    }

    assert_eq!(health(addr).await.get("views"), Some(&json!(0)));
    assert_silent(&mut a).await;
    assert_silent(&mut b).await;
}

#[tokio::test]
async fn malformed_frames_are_dropped() {
    let addr = spawn_relay().await;
    let mut a = connect(addr).await;
    let mut b = connect(addr).await;
    wait_for(addr, "connections", 2).await;

    if a.send(Message::text("definitely not json".to_string())).await.is_err() {
        panic!("ws send failed");
    }
    send(&mut a, json!({"event": "unknownEvent", "payload": 1})).await;
    send(&mut a, new_view(json!(null))).await;

    assert_eq!(recv(&mut b).await, new_view(json!(null)));
    wait_for(addr, "views", 1).await;
}

#[tokio::test]
async fn disconnect_is_silent() {
    let addr = spawn_relay().await;
    let mut a = connect(addr).await;
    let mut b = connect(addr).await;
    wait_for(addr, "connections", 2).await;

    send(&mut a, new_view(json!({"id": 7}))).await;
    assert_eq!(recv(&mut b).await, new_view(json!({"id": 7})));

    if a.close(None).await.is_err() {
        panic!("close failed");
    }
    wait_for(addr, "connections", 1).await;

    assert_silent(&mut b).await;
    assert_eq!(health(addr).await.get("views"), Some(&json!(1)));
}

#[tokio::test]
async fn payloadless_frames_are_relayed() {
    let addr = spawn_relay().await;
    let mut a = connect(addr).await;
    let mut b = connect(addr).await;
    wait_for(addr, "connections", 2).await;

    send(&mut a, json!({"event": "newCameraView"})).await;
    assert_eq!(recv(&mut b).await, new_view(Value::Null));
    wait_for(addr, "views", 1).await;

    send(&mut a, json!({"event": "synchWithMe"})).await;
    assert_eq!(recv(&mut b).await, json!({"event": "synchWithMe", "payload": null}));

    send(&mut a, json!({"event": "wipeAllViews", "payload": {"by": "a"}})).await;
    assert_eq!(recv(&mut b).await, json!({"event": "wipeAllViews"}));
    wait_for(addr, "views", 0).await;
    assert_silent(&mut a).await;
}

#[tokio::test]
async fn trailing_slash_and_nested_wipe_paths() {
    let addr = spawn_relay().await;

    let Ok(entry) = reqwest::get(format!("http://{addr}/screeniverse/")).await else {
        panic!("entry request failed");
    };
    assert_eq!(entry.status(), StatusCode::OK);
    let Ok(html) = entry.text().await else {
        panic!("entry body unreadable");
    };
    assert!(html.contains("relay.js"));

    let Ok(http) = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
    else {
        panic!("client build failed");
    };
    let mut a = connect(addr).await;
    for path in ["/screeniverse/wipe/", "/screeniverse/wipe/all/of/them"] {
        send(&mut a, new_view(json!(path))).await;
        wait_for(addr, "views", 1).await;

        let Ok(response) = http
            .request(reqwest::Method::POST, format!("http://{addr}{path}"))
            .send()
            .await
        else {
            panic!("wipe request failed");
        };
        assert_eq!(response.status(), StatusCode::FOUND, "{path}");
        assert_eq!(
            response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok()),
            Some("/screeniverse")
        );
        assert_eq!(health(addr).await.get("views"), Some(&json!(0)), "{path}");
    }
}
