//! Dividas report
//!
//! Loads a JSON snapshot and prints the monthly installment dashboard.

use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dividas_core::purchase::PurchaseService;
use dividas_core::storage::{StorageConfig, TieredReceiptStore};
use dividas_shared::AppConfig;
use dividas_store::{InMemoryRepository, Snapshot};

mod cli;
mod render;

use cli::{Cli, OutputFormat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so the report can be piped
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dividas=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("failed to load configuration")?;

    let json = tokio::fs::read_to_string(&cli.snapshot)
        .await
        .with_context(|| format!("failed to read {}", cli.snapshot.display()))?;
    let snapshot = Snapshot::from_json(&json)?;

    let owners: BTreeSet<_> = match cli.owner {
        Some(owner) => BTreeSet::from([owner]),
        None => snapshot.purchases.iter().map(|p| p.owner).collect(),
    };

    let repo = Arc::new(InMemoryRepository::load(snapshot)?);
    let receipts = Arc::new(TieredReceiptStore::from_config(StorageConfig::from_receipts(
        &config.receipts,
    ))?);
    info!(
        purchases = repo.len(),
        owners = owners.len(),
        storage = receipts.provider_name(),
        "snapshot loaded"
    );

    let service = PurchaseService::new(repo, receipts)
        .with_upcoming_months(config.dashboard.upcoming_months);
    let reference = cli.reference.unwrap_or_else(|| Local::now().date_naive());

    let mut reports = Vec::with_capacity(owners.len());
    for owner in owners {
        let dashboard = service.dashboard(owner, reference).await?;
        match cli.format {
            OutputFormat::Json => reports.push(serde_json::to_value(&dashboard)?),
            OutputFormat::Text => {
                let purchases = service.list(owner).await?;
                println!("{}", render::dashboard(owner, &dashboard, &purchases)?);
            }
        }
    }

    if cli.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    Ok(())
}
