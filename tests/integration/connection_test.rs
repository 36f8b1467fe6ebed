// tests/integration/connection_test.rs

use super::test_helpers::{TestClient, config_with_password, test_state};
use spineltune::config::Config;
use spineltune::core::events::Subsystem;
use spineltune::core::handler::Dispatcher;
use std::time::Duration;
use tokio::sync::broadcast;

fn dispatcher(config: Config) -> Dispatcher {
    Dispatcher::with_state(test_state(config)).unwrap()
}

#[tokio::test]
async fn test_greeting_is_sent_on_connect() {
    let dispatcher = dispatcher(Config::default());
    let (shutdown_tx, _) = broadcast::channel(1);
    let mut client = TestClient::connect(&dispatcher, 1, &shutdown_tx);

    assert_eq!(client.read_line().await.as_deref(), Some("OK MPD 0.17.0"));
}

#[tokio::test]
async fn test_ping_round_trip() {
    let dispatcher = dispatcher(Config::default());
    let (shutdown_tx, _) = broadcast::channel(1);
    let mut client = TestClient::connect(&dispatcher, 1, &shutdown_tx);
    client.read_line().await;

    client.send("ping").await;
    assert_eq!(client.read_response().await, vec!["OK"]);
}

#[tokio::test]
async fn test_status_block_over_the_wire() {
    let dispatcher = dispatcher(Config::default());
    let (shutdown_tx, _) = broadcast::channel(1);
    let mut client = TestClient::connect(&dispatcher, 1, &shutdown_tx);
    client.read_line().await;

    client.send("status").await;
    let response = client.read_response().await;
    assert_eq!(response.len(), 10);
    assert_eq!(response[0], "volume: 100");
    assert_eq!(response[8], "state: stop");
    assert_eq!(response[9], "OK");
}

#[tokio::test]
async fn test_unknown_command_gets_ack_and_connection_survives() {
    let dispatcher = dispatcher(Config::default());
    let (shutdown_tx, _) = broadcast::channel(1);
    let mut client = TestClient::connect(&dispatcher, 1, &shutdown_tx);
    client.read_line().await;

    client.send("frobnicate now").await;
    assert_eq!(
        client.read_response().await,
        vec![r#"ACK [5@0] {frobnicate} unknown command "frobnicate""#]
    );

    client.send("ping").await;
    assert_eq!(client.read_response().await, vec!["OK"]);
}

#[tokio::test]
async fn test_password_flow_over_the_wire() {
    let dispatcher = dispatcher(config_with_password("secret"));
    let (shutdown_tx, _) = broadcast::channel(1);
    let mut client = TestClient::connect(&dispatcher, 1, &shutdown_tx);
    client.read_line().await;

    client.send("status").await;
    assert_eq!(
        client.read_response().await,
        vec![r#"ACK [4@0] {status} you don't have permission for "status""#]
    );

    client.send(r#"password "wrong""#).await;
    assert_eq!(
        client.read_response().await,
        vec!["ACK [3@0] {password} incorrect password"]
    );

    client.send(r#"password "secret""#).await;
    assert_eq!(client.read_response().await, vec!["OK"]);

    client.send("status").await;
    assert_eq!(client.read_response().await.last().map(String::as_str), Some("OK"));
}

#[tokio::test]
async fn test_command_list_over_the_wire() {
    let dispatcher = dispatcher(Config::default());
    let (shutdown_tx, _) = broadcast::channel(1);
    let mut client = TestClient::connect(&dispatcher, 1, &shutdown_tx);
    client.read_line().await;

    client.send("command_list_ok_begin").await;
    client.send("ping").await;
    client.send(r#"add "singles/untagged.mp3""#).await;
    client.send("command_list_end").await;

    assert_eq!(
        client.read_response().await,
        vec!["list_OK", "list_OK", "OK"]
    );
}

#[tokio::test]
async fn test_close_ends_connection_without_response() {
    let dispatcher = dispatcher(Config::default());
    let (shutdown_tx, _) = broadcast::channel(1);
    let mut client = TestClient::connect(&dispatcher, 1, &shutdown_tx);
    client.read_line().await;

    client.send("close").await;
    assert_eq!(client.read_line().await, None);
    client.task.await.unwrap();
}

#[tokio::test]
async fn test_shutdown_signal_closes_connection() {
    let dispatcher = dispatcher(Config::default());
    let (shutdown_tx, _) = broadcast::channel(1);
    let mut client = TestClient::connect(&dispatcher, 1, &shutdown_tx);
    client.read_line().await;

    shutdown_tx.send(()).unwrap();
    assert_eq!(client.read_line().await, None);
    client.task.await.unwrap();
}

#[tokio::test]
async fn test_inactive_client_is_disconnected() {
    let config = Config {
        connection_timeout_secs: 1,
        ..Config::default()
    };
    let dispatcher = dispatcher(config);
    let (shutdown_tx, _) = broadcast::channel(1);
    let mut client = TestClient::connect(&dispatcher, 1, &shutdown_tx);
    client.read_line().await;

    tokio::time::sleep(Duration::from_millis(1200)).await;
    assert_eq!(client.read_line().await, None);
}

#[tokio::test]
async fn test_unrelated_events_do_not_extend_inactivity_timeout() {
    let config = Config {
        connection_timeout_secs: 1,
        ..Config::default()
    };
    let dispatcher = dispatcher(config);
    let (shutdown_tx, _) = broadcast::channel(1);
    let mut client = TestClient::connect(&dispatcher, 1, &shutdown_tx);
    client.read_line().await;

    for _ in 0..6 {
        tokio::time::sleep(Duration::from_millis(300)).await;
        dispatcher.state().idle_bus.publish(Subsystem::Player);
    }
    assert_eq!(client.read_line().await, None);
}

#[tokio::test]
async fn test_request_resets_inactivity_timeout() {
    let config = Config {
        connection_timeout_secs: 1,
        ..Config::default()
    };
    let dispatcher = dispatcher(config);
    let (shutdown_tx, _) = broadcast::channel(1);
    let mut client = TestClient::connect(&dispatcher, 1, &shutdown_tx);
    client.read_line().await;

    for _ in 0..3 {
        tokio::time::sleep(Duration::from_millis(600)).await;
        client.send("ping").await;
        assert_eq!(client.read_line().await.as_deref(), Some("OK"));
    }
}

#[tokio::test]
async fn test_overlong_line_terminates_connection() {
    let dispatcher = dispatcher(Config::default());
    let (shutdown_tx, _) = broadcast::channel(1);
    let mut client = TestClient::connect(&dispatcher, 1, &shutdown_tx);
    client.read_line().await;

    let line = format!("add \"{}\"", "x".repeat(70 * 1024));
    // The server may hang up before the whole line is written.
    let _ = client.try_send(&line).await;
    assert_eq!(client.read_line().await, None);
}
