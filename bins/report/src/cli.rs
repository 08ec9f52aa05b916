//! CLI argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use dividas_core::schedule::parse_anchor_date;
use dividas_shared::types::UserId;

/// Dividas report - monthly installment dashboard from a snapshot
#[derive(Debug, Parser)]
#[command(name = "dividas-report")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON snapshot of purchases, overrides and payments
    pub snapshot: PathBuf,

    /// Only report this owner (default: every owner in the snapshot)
    #[arg(long)]
    pub owner: Option<UserId>,

    /// Reference date, YYYY-MM-DD (default: today)
    #[arg(long, value_parser = parse_anchor_date)]
    pub reference: Option<NaiveDate>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// The dashboard as JSON
    Json,
}
