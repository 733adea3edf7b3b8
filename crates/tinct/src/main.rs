use std::io;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tinct::cli::{run, Cli};

/// Environment variable holding the log filter, e.g. `TINCT_LOG=debug`.
const LOG_ENV: &str = "TINCT_LOG";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out)
}
