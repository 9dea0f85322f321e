// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Re-broadcast Gate replay service
//!
//! Reads newline-delimited JSON post events from stdin, runs each one
//! through the admission gate chain, and writes one JSON line per
//! re-broadcast event to stdout. Logs go to stderr as JSON.
//!
//! ## Usage
//!
//! ```text
//! rebroadcast-gate [--config PATH] [--relationships PATH] < events.jsonl
//! ```
//!
//! ## Configuration
//!
//! Environment variables override the configuration file:
//!
//! - `LOG_LEVEL`: Default tracing directive (default: info)
//! - `MUST_FOLLOW`: Handle that authors must follow
//! - `MIN_ACCOUNT_AGE_DAYS`: Minimum author account age
//! - `POST_TIME_DELTA_SECONDS`: Minimum seconds between posts per author
//! - `CONTENT_TIME_DELTA_SECONDS`: Minimum seconds between posts per content class
//! - `MUTUAL_FOLLOW`: Require mutual follows (true/false)

use async_trait::async_trait;
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::{filter::Directive, fmt, prelude::*, EnvFilter};

use rebroadcast_gate::{
    chain::GateChain,
    config::Config,
    dispatch::{Dispatcher, Rebroadcaster},
    error::RebroadcastError,
    event::PostEvent,
    fixture::{FixtureMutedSource, FixtureRelationships, RelationshipEntry},
    gate::MediaMatch,
    mute::{populate_muted, refresh_muted},
    state::CacheSet,
};

const EVENT_BUFFER: usize = 256;

#[derive(Parser)]
#[command(name = "rebroadcast-gate", about = "Replay post events through the re-broadcast gate chain")]
struct Cli {
    /// JSON configuration file
    #[arg(long, default_value = "./config.json")]
    config: PathBuf,

    /// JSON array of known follow relationships; without it nobody follows anybody
    #[arg(long, env = "RELATIONSHIPS_FILE")]
    relationships: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::from_file(&cli.config)?;
    config.apply_env_overrides();
    config.validate()?;

    // Initialize tracing
    let default_directive: Directive = config.log_level.parse()?;
    tracing_subscriber::registry()
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(default_directive)
                .from_env_lossy(),
        )
        .init();

    info!(
        config = %cli.config.display(),
        must_follow = %config.settings.must_follow,
        mutual_follow = config.settings.mutual_follow,
        min_account_age_days = config.settings.min_account_age_days,
        test_mode = config.test_mode,
        "Starting re-broadcast gate"
    );

    // Create shared state
    let caches = Arc::new(CacheSet::from_config(&config.caches, &config.settings)?);
    let muted_source = Arc::new(FixtureMutedSource::single(config.muted.ids.clone()));
    populate_muted(muted_source.as_ref(), &caches.muted_ids).await?;

    let lookup = Arc::new(load_relationships(cli.relationships.as_deref())?);
    let config = Arc::new(config);
    let chain = Arc::new(GateChain::new(config.clone(), caches.clone(), lookup));

    // Spawn muted refresh task
    if let Some(secs) = config.muted.refresh_secs {
        let refresh_caches = caches.clone();
        let refresh_source = muted_source.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(secs));
            interval.tick().await;
            loop {
                interval.tick().await;
                if let Err(err) = refresh_muted(refresh_source.as_ref(), &refresh_caches.muted_ids).await {
                    error!(error = %err, "Muted refresh failed; keeping previous set");
                }
            }
        });
    }

    // Feed stdin to the dispatcher
    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    let reader = tokio::spawn(read_events(tx));

    let dispatcher = Dispatcher::new(chain, Arc::new(StdoutRebroadcaster));
    let summary = dispatcher.run(rx).await?;
    reader.await??;

    info!(
        seen = summary.seen,
        admitted = summary.admitted(),
        rejected = summary.rejected.values().sum::<usize>(),
        "Replay complete"
    );
    Ok(())
}

/// Load the follow relationship fixture, if one was given.
fn load_relationships(path: Option<&Path>) -> anyhow::Result<FixtureRelationships> {
    let Some(path) = path else {
        return Ok(FixtureRelationships::new());
    };
    let raw = std::fs::read_to_string(path)?;
    let entries: Vec<RelationshipEntry> = serde_json::from_str(&raw)?;
    info!(path = %path.display(), count = entries.len(), "Relationships loaded");
    Ok(FixtureRelationships::from_entries(entries))
}

/// Parse one event per stdin line and hand it to the dispatcher.
async fn read_events(tx: mpsc::Sender<PostEvent>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<PostEvent>(&line) {
            Ok(event) => {
                if tx.send(event).await.is_err() {
                    // Dispatcher stopped.
                    break;
                }
            }
            Err(err) => warn!(line = line_no, error = %err, "Skipping malformed event"),
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct RebroadcastRecord<'a> {
    id: u64,
    author: &'a str,
    content_type: &'a str,
    url: &'a str,
}

/// Writes one JSON line per re-broadcast event to stdout.
struct StdoutRebroadcaster;

#[async_trait]
impl Rebroadcaster for StdoutRebroadcaster {
    async fn rebroadcast(&self, event: &PostEvent, media: &MediaMatch) -> Result<(), RebroadcastError> {
        let record = RebroadcastRecord {
            id: event.id,
            author: &event.user.screen_name,
            content_type: media.class.label(),
            url: &media.url,
        };
        let line = serde_json::to_string(&record).map_err(|e| RebroadcastError::Api(e.to_string()))?;
        println!("{}", line);
        Ok(())
    }
}
