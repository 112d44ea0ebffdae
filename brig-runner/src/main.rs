//! Brig Runner binary
//!
//! Loads one event and its project, routes the event and runs the resulting
//! pipeline on podman. Exits non-zero when a job fails so that whatever
//! launched the runner sees the real failure.

use anyhow::{Context, Result};
use brig_core::domain::event::Event;
use brig_core::domain::project::Project;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use brig_runner::{Config, EventRouter, PipelineContext, PodmanExecutor};

#[derive(Parser)]
#[command(name = "brig-runner")]
#[command(about = "Run the pipeline for a repository event", long_about = None)]
struct Cli {
    /// JSON file holding the event
    #[arg(long, env = "BRIG_EVENT")]
    event: PathBuf,

    /// JSON file holding the project
    #[arg(long, env = "BRIG_PROJECT")]
    project: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brig_runner=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate()?;

    let mut event: Event = read_json(&cli.event)?;
    if event.build_id.is_empty() {
        event.build_id = uuid::Uuid::new_v4().to_string();
    }
    let project: Project = read_json(&cli.project)?;

    info!(
        "Handling {} event for {} (build {})",
        event.event_type, project.repo_name, event.build_id
    );

    let executor = PodmanExecutor::new(&config, event.build_id.clone());
    executor.check_available().await?;

    let mut ctx = PipelineContext::new(event, project, Arc::new(executor))
        .with_notification_image(config.notification_image.clone());
    if !config.details_url.is_empty() {
        ctx = ctx.with_details_url(config.details_url.clone());
    }

    let router = EventRouter::standard(config.recipes());

    match router.dispatch(&ctx).await {
        Ok(Some(outputs)) => {
            info!("Pipeline completed: {} job(s) passed", outputs.len());
            Ok(())
        }
        Ok(None) => {
            info!("No pipeline to run for this event");
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            Err(e.into())
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}
