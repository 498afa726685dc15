//! Integration tests for the meta-crate: builder, prelude, and a full
//! session against a mock backend.

use std::sync::{Arc, Mutex};

use chimpvine::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_backend(level: i32) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wp-admin/admin-ajax.php"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": "abc123" })),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/wp-json/chimpvine/v1/get-game-result"))
        .and(header("X-WP-Nonce", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Level": level })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/wp-json/chimpvine/v1/submit-game-result"))
        .and(header("X-WP-Nonce", "abc123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "ok", "userinstance": 42 })),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/wp-json/chimpvine/v1/update-game-result"))
        .and(header("X-WP-Nonce", "abc123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "ok", "userinstance": 42 })),
        )
        .mount(&server)
        .await;

    server
}

#[tokio::test]
async fn test_ready_signal_awaited_from_another_task() {
    let server = mock_backend(3).await;

    let mut client = SessionBuilder::new()
        .game_id(5)
        .build(&StaticOrigin::new(server.uri()));

    // The game's UI waits for readiness on its own task.
    let mut ready = client.subscribe();
    let waiter = tokio::spawn(async move { ready.wait().await });

    client.start().await.expect("start");

    let progress = waiter
        .await
        .expect("task should complete")
        .expect("session should be ready");
    assert_eq!(progress.level, 3);
}

#[tokio::test]
async fn test_listener_sees_loaded_level() {
    let server = mock_backend(8).await;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let mut client = SessionBuilder::new()
        .test_origin(server.uri())
        .game_id(5)
        .build(&|| -> Option<String> { None });
    client.on_ready(move |progress| sink.lock().unwrap().push(progress.level));

    client.start().await.expect("start");

    assert_eq!(*seen.lock().unwrap(), vec![8]);
}

#[tokio::test]
async fn test_level_played_through_prelude() -> Result<(), ChimpvineError> {
    let server = mock_backend(1).await;

    let mut client = SessionBuilder::new()
        .game_id(5)
        .build(&StaticOrigin::new(server.uri()));

    let progress = client.start().await?;
    let started = client.report_start(progress.level, true, true).await?;

    {
        let progress = client.progress_mut();
        progress.points_earned = 10;
        progress.total_points = 10;
        progress.is_level_completed = true;
    }
    let ended = client.report_end_from_progress().await?;

    assert_eq!(started, UserInstance(42));
    assert_eq!(ended, UserInstance(42));
    assert!(matches!(client.state(), SessionState::Ready(_)));
    Ok(())
}

#[tokio::test]
async fn test_unreachable_backend_halts_session() {
    // Grab a free port, then close it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("should bind");
    let uri = format!("http://{}", listener.local_addr().expect("should have addr"));
    drop(listener);

    let mut client = SessionBuilder::new()
        .game_id(5)
        .build(&StaticOrigin::new(uri));
    let mut ready = client.subscribe();

    let result = client.start().await;

    assert!(matches!(result, Err(SessionError::Transport(_))));
    assert!(matches!(
        ready.wait().await,
        Err(SessionError::Halted { kind: FailureKind::Transport, .. })
    ));
}
