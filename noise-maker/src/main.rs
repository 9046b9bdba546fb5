mod args;
mod generator;
mod stream;

use anyhow::Context;
use args::CliArgs;
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use stream::{StreamConfig, run_log_stream};
use tokio::{
    fs::File,
    io::{self, AsyncWrite, BufWriter},
    signal,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = CliArgs::parse();
    let config = StreamConfig {
        rate: *args.rate(),
        batch_size: *args.batch_size(),
        count: *args.count(),
        malformed_ratio: *args.malformed_ratio(),
    };
    let mut rng = match args.seed() {
        Some(seed) => StdRng::seed_from_u64(*seed),
        None => StdRng::from_os_rng(),
    };

    let mut writer: Box<dyn AsyncWrite + Unpin + Send> = match args.output() {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .await
                .with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout()),
    };
    info!(?config, "starting log stream");

    tokio::select! {
        written = run_log_stream(&mut writer, &mut rng, config) => {
            let written = written.context("failed to write log lines")?;
            info!(written, "log stream finished");
        }
        _ = signal::ctrl_c() => {
            info!("stopping log generation");
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
