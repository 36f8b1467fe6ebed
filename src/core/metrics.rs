// src/core/metrics.rs

//! Defines and registers Prometheus metrics for server monitoring.
//!
//! This module uses `lazy_static` to ensure that metrics are registered only once
//! globally for the entire application lifecycle.

use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Gauge, Histogram, TextEncoder, register_counter, register_counter_vec,
    register_gauge, register_histogram,
};

lazy_static! {
    // --- Server-wide Gauges ---
    /// The number of clients currently connected to the server.
    pub static ref CONNECTED_CLIENTS: Gauge =
        register_gauge!("spineltune_connected_clients", "Number of currently connected clients.").unwrap();
    /// The number of clients currently waiting in idle mode.
    pub static ref IDLE_CLIENTS: Gauge =
        register_gauge!("spineltune_idle_clients", "Number of clients blocked in idle mode.").unwrap();
    /// The number of entries in the play queue.
    pub static ref PLAYLIST_LENGTH: Gauge =
        register_gauge!("spineltune_playlist_length", "Number of entries in the play queue.").unwrap();


    // --- Server-wide Counters ---
    /// The total number of commands processed by the server since startup.
    pub static ref COMMANDS_PROCESSED_TOTAL: Counter =
        register_counter!("spineltune_commands_processed_total", "Total number of commands processed.").unwrap();
    /// The total number of connections accepted by the server since startup.
    pub static ref CONNECTIONS_RECEIVED_TOTAL: Counter =
        register_counter!("spineltune_connections_received_total", "Total number of connections received.").unwrap();
    /// The total number of ACK responses sent, labeled by error class.
    pub static ref ACK_ERRORS_TOTAL: CounterVec =
        register_counter_vec!("spineltune_ack_errors_total", "Total number of ACK responses, labeled by error kind.", &["kind"]).unwrap();


    // --- Histograms ---
    /// A histogram of request handling latencies.
    pub static ref COMMAND_LATENCY_SECONDS: Histogram =
        register_histogram!("spineltune_command_latency_seconds", "Latency of request handling in seconds.").unwrap();
}

/// Gathers all registered metrics and encodes them in the Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder.encode_to_string(&metric_families).unwrap()
}
