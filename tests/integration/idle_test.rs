// tests/integration/idle_test.rs

use super::test_helpers::{TestClient, test_state};
use spineltune::config::Config;
use spineltune::core::events::Subsystem;
use spineltune::core::handler::Dispatcher;
use std::time::Duration;
use tokio::sync::broadcast;

#[tokio::test]
async fn test_idle_is_woken_by_published_event() {
    let state = test_state(Config::default());
    let dispatcher = Dispatcher::with_state(state.clone()).unwrap();
    let (shutdown_tx, _) = broadcast::channel(1);
    let mut client = TestClient::connect(&dispatcher, 1, &shutdown_tx);
    client.read_line().await;

    client.send("idle playlist").await;
    client.expect_silence().await;

    state.idle_bus.publish(Subsystem::Playlist);
    assert_eq!(
        client.read_response().await,
        vec!["changed: playlist", "OK"]
    );

    // Back in normal mode.
    client.send("ping").await;
    assert_eq!(client.read_response().await, vec!["OK"]);
}

#[tokio::test]
async fn test_unsubscribed_event_does_not_wake_idle() {
    let state = test_state(Config::default());
    let dispatcher = Dispatcher::with_state(state.clone()).unwrap();
    let (shutdown_tx, _) = broadcast::channel(1);
    let mut client = TestClient::connect(&dispatcher, 1, &shutdown_tx);
    client.read_line().await;

    client.send("idle player").await;
    client.expect_silence().await;

    state.idle_bus.publish(Subsystem::Mixer);
    client.expect_silence().await;

    client.send("noidle").await;
    client.expect_silence().await;

    client.send("ping").await;
    assert_eq!(client.read_response().await, vec!["OK"]);
}

#[tokio::test]
async fn test_playlist_change_in_one_session_wakes_another() {
    let state = test_state(Config::default());
    let dispatcher = Dispatcher::with_state(state).unwrap();
    let (shutdown_tx, _) = broadcast::channel(1);
    let mut watcher = TestClient::connect(&dispatcher, 1, &shutdown_tx);
    let mut editor = TestClient::connect(&dispatcher, 2, &shutdown_tx);
    watcher.read_line().await;
    editor.read_line().await;

    watcher.send("idle playlist player").await;
    watcher.expect_silence().await;

    editor.send(r#"add "albums/blue/01-intro.ogg""#).await;
    assert_eq!(editor.read_response().await, vec!["OK"]);

    assert_eq!(
        watcher.read_response().await,
        vec!["changed: playlist", "OK"]
    );
}

#[tokio::test]
async fn test_event_before_idle_is_reported_immediately() {
    let state = test_state(Config::default());
    let dispatcher = Dispatcher::with_state(state.clone()).unwrap();
    let (shutdown_tx, _) = broadcast::channel(1);
    let mut client = TestClient::connect(&dispatcher, 1, &shutdown_tx);
    client.read_line().await;

    state.idle_bus.publish(Subsystem::Options);
    // Make sure the handler has recorded the event before asking.
    client.send("ping").await;
    assert_eq!(client.read_response().await, vec!["OK"]);

    client.send("idle").await;
    assert_eq!(
        client.read_response().await,
        vec!["changed: options", "OK"]
    );
}

#[tokio::test]
async fn test_command_while_idle_closes_connection() {
    let dispatcher = Dispatcher::with_state(test_state(Config::default())).unwrap();
    let (shutdown_tx, _) = broadcast::channel(1);
    let mut client = TestClient::connect(&dispatcher, 1, &shutdown_tx);
    client.read_line().await;

    client.send("idle").await;
    client.send("status").await;

    assert_eq!(client.read_line().await, None);
    client.task.await.unwrap();
}

#[tokio::test]
async fn test_idle_outlasts_inactivity_timeout() {
    let config = Config {
        connection_timeout_secs: 1,
        ..Config::default()
    };
    let state = test_state(config);
    let dispatcher = Dispatcher::with_state(state.clone()).unwrap();
    let (shutdown_tx, _) = broadcast::channel(1);
    let mut client = TestClient::connect(&dispatcher, 1, &shutdown_tx);
    client.read_line().await;

    client.send("idle mixer").await;
    tokio::time::sleep(Duration::from_millis(1500)).await;
    state.idle_bus.publish(Subsystem::Mixer);
    assert_eq!(client.read_response().await, vec!["changed: mixer", "OK"]);

    // The wakeup restarts the inactivity clock.
    client.send("ping").await;
    assert_eq!(client.read_response().await, vec!["OK"]);
}
