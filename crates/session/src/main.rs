//! `tubescribe` -- terminal watcher for the TubeScribe backend.
//!
//! Connects a sync session (REST snapshot + live push updates) and
//! renders the merged view on a fixed tick until Ctrl-C.
//!
//! # Environment variables
//!
//! | Variable                          | Required | Default                     |
//! |-----------------------------------|----------|-----------------------------|
//! | `TUBESCRIBE_API_URL`              | no       | `http://localhost:5000/api` |
//! | `TUBESCRIBE_WS_URL`               | no       | `ws://localhost:5000/ws`    |
//! | `TUBESCRIBE_RECONNECT_ATTEMPTS`   | no       | `5`                         |
//! | `TUBESCRIBE_RECONNECT_DELAY_SECS` | no       | `1`                         |

use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tubescribe_channel::subscription::ConnectionState;
use tubescribe_core::stages::{progress_stage_index, should_show_progress, PIPELINE_STAGES};
use tubescribe_core::types::VideoRecord;
use tubescribe_session::config::SessionConfig;
use tubescribe_session::session::SyncSession;

/// Seconds between view redraws.
const TICK_SECS: u64 = 2;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tubescribe=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SessionConfig::from_env();
    tracing::info!(
        api_url = %config.api_url,
        ws_url = %config.ws_url,
        "Starting tubescribe watcher",
    );

    let session = SyncSession::connect(&config);

    // The first tick fires immediately and performs the initial fetch.
    let mut ticker = tokio::time::interval(Duration::from_secs(TICK_SECS));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = session.refresh(None).await {
                    tracing::warn!(error = %e, "Refresh failed, showing last known data");
                }
                draw(&session).await;
            }
            _ = &mut ctrl_c => {
                tracing::info!("Shutting down");
                break;
            }
        }
    }

    session.shutdown().await;
}

/// Print the merged view to stdout.
async fn draw(session: &SyncSession) {
    let records = session.merged_view().await;

    let connectivity = match session.connection_state() {
        ConnectionState::Connected => "live",
        ConnectionState::Connecting => "connecting",
        ConnectionState::Disconnected => "offline",
    };

    println!("-- {} videos ({connectivity}) --", records.len());
    if let Some(error) = session.last_error().await {
        println!("!! last fetch failed: {error}");
    }
    for record in &records {
        println!("{}", format_record(record));
    }
    println!();
}

/// One line per record: status, stage ordinal, progress, title.
fn format_record(record: &VideoRecord) -> String {
    let status = record.status.as_str();
    let title = &record.title;

    if should_show_progress(record) {
        let stage = match progress_stage_index(record) {
            Some(i) => format!("{}/{}", i + 1, PIPELINE_STAGES.len()),
            None => format!("-/{}", PIPELINE_STAGES.len()),
        };
        let percent = record.progress.unwrap_or(0);
        let step = record.current_step.as_deref().unwrap_or("Initializing...");
        format!("[{status} {stage} {percent:>3}%] {title} - {step}")
    } else if let Some(ref message) = record.error_message {
        format!("[{status}] {title} - {message}")
    } else {
        format!("[{status}] {title}")
    }
}
