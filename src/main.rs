//! Card Extract - credit card listing extractor
//!
//! Turns the listing spreadsheet into the CSV consumed by the card browser.

use card_extract::{Args, Pipeline};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let mut pipeline = Pipeline::new(args.to_config());
    match pipeline.run() {
        Ok(report) => {
            println!("Success! '{}' is ready.", report.output.display());
            for line in report.summary.lines() {
                println!("{}", line);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("Error: {}", err);
            err.exit_code()
        }
    }
}
