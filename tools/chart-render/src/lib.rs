//! Chart render export
//!
//! Reads a crawler iteration-detail payload, runs the depth aggregator and
//! candle scaler over it and serialises the resulting render models as JSON.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chart_core::{CandleChart, ChartConfig, DepthTable};
use serde::{Deserialize, Serialize};
use tracing::info;
use types::wire::IterationDetail;

/// Crate version constant
pub const VERSION: &str = "1.0.0";

/// Which render models to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Depth,
    Klines,
    #[default]
    All,
}

impl Section {
    fn wants_depth(self) -> bool {
        matches!(self, Section::Depth | Section::All)
    }

    fn wants_klines(self) -> bool {
        matches!(self, Section::Klines | Section::All)
    }
}

/// Combined export of one iteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderExport {
    pub version: String,
    /// `None` when not requested or the iteration carries no book.
    pub depth: Option<DepthTable>,
    pub klines: Option<CandleChart>,
}

/// Load a TOML config file, or the defaults when `path` is `None`.
pub fn load_config(path: Option<&Path>) -> Result<ChartConfig> {
    let config: ChartConfig = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => ChartConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Build the requested render models from a parsed payload.
pub fn render(detail: &IterationDetail, config: &ChartConfig, section: Section) -> Result<RenderExport> {
    let depth = if section.wants_depth() {
        detail
            .order_book()
            .context("validating book_depth")?
            .map(|book| DepthTable::build(&book, &config.depth))
    } else {
        None
    };

    let klines = if section.wants_klines() {
        let candles = detail.candles().context("validating klines")?;
        Some(CandleChart::build(&candles, &config.scaler))
    } else {
        None
    };

    info!(
        depth_rows = depth.as_ref().map_or(0, |d| d.rows.len()),
        candles = klines.as_ref().map_or(0, CandleChart::len),
        "Iteration rendered"
    );

    Ok(RenderExport {
        version: VERSION.to_string(),
        depth,
        klines,
    })
}

/// Read and render the payload at `path`.
pub fn render_file(path: &Path, config: &ChartConfig, section: Section) -> Result<RenderExport> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading payload {}", path.display()))?;
    let detail = IterationDetail::from_json(&text)
        .with_context(|| format!("parsing payload {}", path.display()))?;
    render(&detail, config, section)
}

/// Serialise an export, pretty-printed unless `compact`.
pub fn export_json(export: &RenderExport, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(export)?
    } else {
        serde_json::to_string_pretty(export)?
    };
    Ok(json)
}
