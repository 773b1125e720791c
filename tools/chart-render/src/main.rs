use std::path::PathBuf;

use chart_render::{export_json, load_config, render_file, Section};
use clap::Parser;

/// Render bookdepth and klines chart models from an iteration-detail payload.
#[derive(Debug, Parser)]
#[command(name = "chart-render", version, about)]
struct Cli {
    /// Iteration-detail JSON as served by the crawler admin API
    payload: PathBuf,

    /// TOML file overriding chart settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Single-line JSON output
    #[arg(long)]
    compact: bool,

    /// Which render model to emit
    #[arg(long, value_enum, default_value_t = Section::All)]
    section: Section,
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), anyhow::Error> {
    init_logging();
    let cli = Cli::parse();

    tracing::info!(payload = %cli.payload.display(), section = ?cli.section, "Rendering iteration");

    let config = load_config(cli.config.as_deref())?;
    let export = render_file(&cli.payload, &config, cli.section)?;
    println!("{}", export_json(&export, cli.compact)?);

    Ok(())
}
