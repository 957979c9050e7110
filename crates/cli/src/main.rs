use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fear_greed_cli::{run_pipeline, run_summary};
use fear_greed_core::ConfigLoader;

#[derive(Parser)]
#[command(name = "fear-greed")]
#[command(about = "Trading performance against the crypto Fear & Greed index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis and write reports and charts
    Run {
        /// Config file path
        #[arg(short, long, default_value = "config/Config.toml")]
        config: PathBuf,
        /// Write CSV reports only
        #[arg(long)]
        skip_charts: bool,
        /// Append logs to this file instead of stderr
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
    /// Print dataset sizes and overall trading metrics without writing files
    Summary {
        /// Config file path
        #[arg(short, long, default_value = "config/Config.toml")]
        config: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Run {
            log_file: Some(path),
            ..
        } => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
                )
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
                )
                .with_writer(std::io::stderr)
                .init();
        }
    }

    match cli.command {
        Commands::Run {
            config,
            skip_charts,
            log_file: _,
        } => {
            run_analysis(&config, skip_charts)?;
        }
        Commands::Summary { config } => {
            let config = ConfigLoader::load(&config)?;
            run_summary(&config)?;
        }
    }

    Ok(())
}

fn run_analysis(config_path: &std::path::Path, skip_charts: bool) -> anyhow::Result<()> {
    tracing::info!(
        "Starting Crypto Trading Sentiment Analysis with config: {}",
        config_path.display()
    );
    println!("Starting Crypto Trading Sentiment Analysis...");

    let config = ConfigLoader::load(config_path)?;
    let render_charts = config.charts.enabled && !skip_charts;

    let summary = run_pipeline(&config, render_charts)?;
    tracing::info!(
        reports = summary.reports.len(),
        charts = summary.charts.len(),
        "Analysis complete"
    );

    Ok(())
}
