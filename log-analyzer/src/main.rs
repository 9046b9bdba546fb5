use std::{io, num::NonZeroU64, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use log_analyzer::{
    analytics::{Analytics, DEFAULT_SUMMARY_LIMIT},
    ingest::{IngestError, LineSource, consume_lines},
    render::{OutputFormat, render},
    worker::summarize_lines,
};
use tokio::{
    sync::mpsc::{self, Sender},
    task::JoinHandle,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const INGEST_BUFFER_SIZE: usize = 50;

#[derive(Parser, Debug)]
#[command(version, about = "Summarize combined-format access logs", long_about = None)]
struct Args {
    /// Log file to read, `-` for standard input
    #[arg(short, long)]
    log: PathBuf,

    /// Length of the ranked visitor and URL lists; negative values show none
    #[arg(short, long, default_value_t = DEFAULT_SUMMARY_LIMIT as i64, allow_negative_numbers = true)]
    top: i64,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log an interim summary every N lines
    #[arg(long)]
    checkpoint_every: Option<NonZeroU64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    let limit = usize::try_from(args.top).unwrap_or(0);

    let source = LineSource::from_path(&args.log);
    info!(%source, limit, "summarizing access log");

    let (ingest_tx, ingest_rx) = mpsc::channel(INGEST_BUFFER_SIZE);
    let ingest_handle = spawn_ingest(source, ingest_tx);

    let mut analytics = Analytics::default();
    let report = summarize_lines(ingest_rx, &mut analytics, args.checkpoint_every, limit).await;
    ingest_handle
        .await
        .context("ingest task panicked")?
        .context("error reading log input")?;

    let summary = analytics.summary(limit);
    info!(
        parsed = report.parsed,
        failed = report.failed,
        "finished reading log"
    );
    let output = render(args.format, &report, &summary, limit)?;
    println!("{}", output.trim_end());
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn spawn_ingest(source: LineSource, tx: Sender<Vec<String>>) -> JoinHandle<Result<(), IngestError>> {
    tokio::spawn(consume_lines(source, tx))
}
