//! `sonarbridge-cli` – Sonar Bridge Entry Point
//!
//! This binary owns the process lifecycle that the translation core stays out
//! of.  It:
//!
//! 1. Initialises structured logging (`RUST_LOG`, optional JSON output).
//! 2. Builds the event bus and spawns the [`ScanAdapter`] dispatch task.
//! 3. Spawns a [`SimSonar`] source so the bridge runs headless out of the box.
//! 4. Intercepts **Ctrl-C** to publish a shutdown notice and exit cleanly.

use std::sync::Arc;

use colored::Colorize;
use tracing::info;

use sonarbridge_middleware::{EventBus, Topic};
use sonarbridge_node::{ScanAdapter, SimSonar};
use sonarbridge_types::{Event, EventPayload};

#[tokio::main]
async fn main() {
    // ── Structured logging ────────────────────────────────────────────────
    // Initialise tracing-subscriber using RUST_LOG (defaults to "info").
    // Set SONARBRIDGE_LOG_FORMAT=json to emit newline-delimited JSON logs
    // suitable for log aggregators.
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if std::env::var("SONARBRIDGE_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .compact()
            .init();
    }

    print_banner();

    // ── Bus and task wiring ───────────────────────────────────────────────
    let bus = Arc::new(EventBus::default());

    let adapter = ScanAdapter::new(bus.clone());
    let adapter_task = tokio::spawn(adapter.run());

    let sim = SimSonar::new(bus.clone(), "sonar0");
    let sim_task = tokio::spawn(sim.run());

    info!("sonar bridge running; translating sonar readings to range scans");

    // ── Ctrl-C ────────────────────────────────────────────────────────────
    if let Err(e) = tokio::signal::ctrl_c().await {
        eprintln!("failed to listen for Ctrl-C: {e}");
    }

    println!();
    println!(
        "{}",
        "⚠  Ctrl-C received – initiating graceful shutdown …".yellow().bold()
    );

    // Publish a shutdown notice so any attached consumer can react to it.
    let stop_event = Event {
        id: uuid::Uuid::new_v4(),
        timestamp: chrono::Utc::now(),
        source: "sonarbridge-cli".to_string(),
        payload: EventPayload::Fault {
            component: "cli".to_string(),
            code: 0,
            message: "SHUTDOWN: operator Ctrl-C".to_string(),
        },
    };
    let _ = bus.publish_to(Topic::SystemAlerts, stop_event);

    sim_task.abort();
    adapter_task.abort();

    println!("{}", "  ✓ Shutdown notice published to Event Bus.".green());
    println!("{}", "  ✓ Exiting sonarbridge.".green());
}

fn print_banner() {
    println!();
    println!("  {}", "sonarbridge".bold());
    println!("  {}", "sonar readings → range scans, one topic each way".dimmed());
    println!();
}
