use clap::Parser;
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};
use transform::transform;

mod compute;
mod config;
mod data;
mod infer;
mod read;
mod transform;
mod write;

/// Builds the dashboard data file from the financial summary and the member
/// contributions tables.
#[derive(Parser)]
#[command(name = "fund-report", version)]
struct Cli {
    /// Financial summary table [default: data/financial_summary.csv]
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Member contributions table [default: data/member_contributions.csv]
    #[arg(long)]
    contributions: Option<PathBuf>,

    /// Generated JSON document [default: docs/js/data.json]
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Flags override the paths of `Config::default()`.
impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        let defaults = Config::default();
        Self {
            summary_path: cli.summary.unwrap_or(defaults.summary_path),
            contributions_path: cli.contributions.unwrap_or(defaults.contributions_path),
            output_path: cli.output.unwrap_or(defaults.output_path),
        }
    }
}

fn main() -> Result<(), anyhow::Error> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from(Cli::parse());
    transform(&config)?;
    println!("Data processed and saved to {}", config.output_path.display());
    Ok(())
}
