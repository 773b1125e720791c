//! Candle Scaler
//!
//! Maps a candle sequence to proportional chart coordinates. Every output is a
//! percentage of the chart area; the caller multiplies by its own pixel height
//! or width.
//!
//! The chart shows the newest candle on the left. Callers pass candles
//! oldest-first, [`display_sequence`] reverses them once, and every
//! per-candle function works on display positions. Use
//! [`display_index_to_original_index`] to report a display position back in
//! the caller's ordering.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::candle::Candle;

use crate::numeric::{percent_of, position_percent, HUNDRED};

// ---------------------------------------------------------------------------
// Visibility floors
// ---------------------------------------------------------------------------

/// Minimum wick height (0.5%) so a zero-range candle stays visible.
pub const MIN_WICK_HEIGHT: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Minimum body height (1%) for a visible doji.
pub const MIN_BODY_HEIGHT: Decimal = Decimal::ONE;

/// Minimum column width (1.5%) when many candles share the axis.
pub const MIN_COLUMN_WIDTH: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// Share of a slot occupied by the candle; the rest is gutter.
pub const COLUMN_FILL: Decimal = Decimal::from_parts(9, 0, 0, false, 1);

/// Minimum volume bar height (2%) so empty buckets remain clickable.
pub const MIN_VOLUME_HEIGHT: Decimal = Decimal::TWO;

// ---------------------------------------------------------------------------
// Scales
// ---------------------------------------------------------------------------

/// Price axis bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl ScaleRange {
    pub fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    /// `max − min`, zero on overflow.
    pub fn range(&self) -> Decimal {
        self.max.checked_sub(self.min).unwrap_or(Decimal::ZERO)
    }
}

impl Default for ScaleRange {
    fn default() -> Self {
        Self::new(Decimal::ZERO, Decimal::ONE)
    }
}

/// Volume axis bound; the minimum is always zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeScale {
    pub max: Decimal,
}

/// Price scale over the whole sequence.
///
/// `{0, 1}` when empty; `{min, min + 1}` when flat, inverted or when
/// `max − min` is not representable.
pub fn price_scale(candles: &[Candle]) -> ScaleRange {
    let Some(min) = candles.iter().map(|c| c.low_price).min() else {
        return ScaleRange::default();
    };
    let max = candles
        .iter()
        .map(|c| c.high_price)
        .max()
        .unwrap_or(min);

    if max > min && max.checked_sub(min).is_some() {
        return ScaleRange::new(min, max);
    }

    match min.checked_add(Decimal::ONE) {
        Some(widened) => ScaleRange::new(min, widened),
        None => ScaleRange::new(min - Decimal::ONE, min),
    }
}

/// Largest effective volume (USD when reported, else coin); zero when empty.
pub fn volume_scale(candles: &[Candle]) -> VolumeScale {
    let max = candles
        .iter()
        .map(Candle::effective_volume)
        .max()
        .unwrap_or(Decimal::ZERO);
    VolumeScale { max }
}

// ---------------------------------------------------------------------------
// Vertical geometry
// ---------------------------------------------------------------------------

/// A vertical bar measured from the bottom of the pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerticalSpan {
    pub bottom_percent: Decimal,
    pub height_percent: Decimal,
}

/// High–low wick. `None` if `scale` has no positive range.
pub fn wick_rect(candle: &Candle, scale: &ScaleRange) -> Option<VerticalSpan> {
    let bottom = position_percent(candle.low_price, scale.min, scale.max)?;
    let top = position_percent(candle.high_price, scale.min, scale.max)?;
    let height = top.checked_sub(bottom).unwrap_or(Decimal::ZERO);

    Some(VerticalSpan {
        bottom_percent: bottom,
        height_percent: height.max(MIN_WICK_HEIGHT),
    })
}

/// Open–close body. `None` if `scale` has no positive range.
pub fn body_rect(candle: &Candle, scale: &ScaleRange) -> Option<VerticalSpan> {
    let open = position_percent(candle.open_price, scale.min, scale.max)?;
    let close = position_percent(candle.close_price, scale.min, scale.max)?;
    let height = close.checked_sub(open).unwrap_or(Decimal::ZERO).abs();

    Some(VerticalSpan {
        bottom_percent: open.min(close),
        height_percent: height.max(MIN_BODY_HEIGHT),
    })
}

// ---------------------------------------------------------------------------
// Horizontal geometry
// ---------------------------------------------------------------------------

/// Horizontal slot of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSlot {
    pub left_percent: Decimal,
    pub width_percent: Decimal,
}

/// Slot `index` of `count` equal slots. Zero-sized when `count` is zero.
pub fn column_layout(index: usize, count: usize) -> ColumnSlot {
    if count == 0 {
        return ColumnSlot {
            left_percent: Decimal::ZERO,
            width_percent: Decimal::ZERO,
        };
    }

    let slot = HUNDRED / Decimal::from(count);
    let left = slot
        .checked_mul(Decimal::from(index))
        .unwrap_or(HUNDRED);
    let width = (slot * COLUMN_FILL).max(MIN_COLUMN_WIDTH);

    ColumnSlot {
        left_percent: left,
        width_percent: width,
    }
}

/// A volume pane bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeBar {
    pub slot: ColumnSlot,
    pub height_percent: Decimal,
}

/// Volume bar for the candle at display position `index` of `count`.
///
/// Height is zero when the scale maximum is not positive, otherwise at least
/// [`MIN_VOLUME_HEIGHT`] and at most 100.
pub fn volume_bar_rect(
    candle: &Candle,
    index: usize,
    count: usize,
    scale: &VolumeScale,
) -> VolumeBar {
    let height = if scale.max <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        percent_of(candle.effective_volume(), scale.max)
            .unwrap_or(Decimal::ZERO)
            .clamp(MIN_VOLUME_HEIGHT, HUNDRED)
    };

    VolumeBar {
        slot: column_layout(index, count),
        height_percent: height,
    }
}

// ---------------------------------------------------------------------------
// Display ordering
// ---------------------------------------------------------------------------

/// Candles in display order (newest first).
pub fn display_sequence(candles: &[Candle]) -> Vec<&Candle> {
    candles.iter().rev().collect()
}

/// Caller index of the candle shown at `display_index`, or `None` when out of
/// range.
pub fn display_index_to_original_index(display_index: usize, count: usize) -> Option<usize> {
    if display_index >= count {
        return None;
    }
    Some(count - 1 - display_index)
}
