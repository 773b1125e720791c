//! Chart Core — Depth and Candle Computation Layer
//!
//! Provides the numeric side of the crawler admin dashboard's bookdepth and
//! klines popups:
//! - Depth aggregation: notional values, proportional bar widths, row spreads
//! - Candle scaling: price/volume scales, wick and body spans, column slots
//! - Axis ticks and time labels
//! - Composite render models (`DepthTable`, `CandleChart`)
//!
//! # Determinism
//! All functions are pure: no I/O, no shared state, no caching between calls.
//! Uses `Decimal` (fixed-point) throughout. Degenerate input degrades to an
//! inert value (`0`, `None`, an empty list or a unit range) instead of an error.
//!
//! ```text
//! OrderBookSnapshot ──► depth ──► DepthTable
//!
//! Vec<Candle> ──► scale ──┬──► CandleChart ──► VolumeBarActivated
//!                 axis  ──┘
//! ```

pub mod axis;
pub mod chart;
pub mod config;
pub mod depth;
pub mod numeric;
pub mod scale;

pub use chart::{CandleChart, VolumeBarActivated};
pub use config::ChartConfig;
pub use depth::DepthTable;

/// Crate version constant
pub const CHART_CORE_VERSION: &str = "1.0.0";
