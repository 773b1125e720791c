//! Candlestick chart render model
//!
//! Combines the scaler and axis functions into one structure per render. The
//! chart is built in display order (newest candle on the left); each column
//! carries its original index so interactions can be reported back in the
//! caller's ordering.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use types::candle::Candle;

use crate::axis::{price_axis_ticks, time_axis_labels, volume_axis_ticks, TimeLabel};
use crate::config::ScalerConfig;
use crate::scale::{
    body_rect, column_layout, display_index_to_original_index, display_sequence, price_scale,
    volume_bar_rect, volume_scale, wick_rect, ColumnSlot, ScaleRange, VerticalSpan, VolumeBar,
    VolumeScale,
};

/// Candle colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandleDirection {
    /// close >= open
    Up,
    /// close < open
    Down,
}

/// One rendered candle with its volume bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandleColumn {
    pub display_index: usize,
    pub original_index: usize,
    pub open_time_seconds: i64,
    pub direction: CandleDirection,
    pub slot: ColumnSlot,
    pub wick: Option<VerticalSpan>,
    pub body: Option<VerticalSpan>,
    pub volume: VolumeBar,
    pub effective_volume: Decimal,
}

/// Emitted when the user activates a volume bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeBarActivated {
    /// Index into the caller's (oldest-first) candle sequence.
    pub original_index: usize,
    pub open_time_seconds: i64,
}

/// Render model for the klines popup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandleChart {
    pub columns: Vec<CandleColumn>,
    pub price_scale: ScaleRange,
    pub volume_scale: VolumeScale,
    pub price_ticks: Vec<Decimal>,
    pub volume_ticks: Vec<Decimal>,
    /// Indices refer to display positions.
    pub time_labels: Vec<TimeLabel>,
}

impl CandleChart {
    /// Build the chart for `candles` given oldest-first.
    pub fn build(candles: &[Candle], config: &ScalerConfig) -> Self {
        let count = candles.len();
        let prices = price_scale(candles);
        let volumes = volume_scale(candles);

        let invalid = candles.iter().filter(|c| !c.is_valid()).count();
        if invalid > 0 {
            warn!(invalid, total = count, "Candles violate the OHLC invariant");
        }

        let display = display_sequence(candles);

        let columns: Vec<CandleColumn> = display
            .iter()
            .enumerate()
            .filter_map(|(display_index, &candle)| {
                let original_index = display_index_to_original_index(display_index, count)?;
                Some(CandleColumn {
                    display_index,
                    original_index,
                    open_time_seconds: candle.open_time_seconds,
                    direction: if candle.is_bullish() {
                        CandleDirection::Up
                    } else {
                        CandleDirection::Down
                    },
                    slot: column_layout(display_index, count),
                    wick: wick_rect(candle, &prices),
                    body: body_rect(candle, &prices),
                    volume: volume_bar_rect(candle, display_index, count, &volumes),
                    effective_volume: candle.effective_volume(),
                })
            })
            .collect();

        debug!(
            candles = count,
            price_min = %prices.min,
            price_max = %prices.max,
            volume_max = %volumes.max,
            "Candle chart built"
        );

        Self {
            columns,
            price_ticks: price_axis_ticks(&prices, config.price_ticks),
            volume_ticks: volume_axis_ticks(&volumes, config.volume_ticks),
            time_labels: time_axis_labels(&display, config.time_label_target),
            price_scale: prices,
            volume_scale: volumes,
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column at a display position.
    pub fn column(&self, display_index: usize) -> Option<&CandleColumn> {
        self.columns.get(display_index)
    }

    /// Translate a click on the volume bar at `display_index` into an event
    /// in caller ordering. `None` for an index past the last column.
    pub fn activate_volume_bar(&self, display_index: usize) -> Option<VolumeBarActivated> {
        let original_index = display_index_to_original_index(display_index, self.len())?;
        let column = self.column(display_index)?;
        debug!(display_index, original_index, "Volume bar activated");
        Some(VolumeBarActivated {
            original_index,
            open_time_seconds: column.open_time_seconds,
        })
    }
}
