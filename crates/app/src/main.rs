//! Tripcart storefront CLI

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

pub fn main() {
    let _env = dotenvy::dotenv();

    let cli = cli::Cli::parse();

    init_logging(cli.log_level());

    if let Err(error) = cli.run() {
        eprintln!("{error}");
        process::exit(1);
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _subscriber = tracing_subscriber::fmt()
        .compact()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}
