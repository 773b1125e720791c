//! Axis ticks and time labels
//!
//! Price and volume ticks are returned top-to-bottom (descending), the order
//! in which the axis renders them.

use std::borrow::Borrow;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::candle::Candle;

use crate::numeric::{percent_of, HUNDRED};
use crate::scale::{ScaleRange, VolumeScale};

/// `intervals + 1` evenly spaced values from `min` to `max`, descending.
/// Empty when `intervals` is zero.
pub fn price_axis_ticks(scale: &ScaleRange, intervals: usize) -> Vec<Decimal> {
    evenly_spaced(scale.min, scale.max, intervals)
}

/// `intervals + 1` evenly spaced values from `0` to `max`, descending.
pub fn volume_axis_ticks(scale: &VolumeScale, intervals: usize) -> Vec<Decimal> {
    evenly_spaced(Decimal::ZERO, scale.max, intervals)
}

fn evenly_spaced(min: Decimal, max: Decimal, intervals: usize) -> Vec<Decimal> {
    if intervals == 0 {
        return Vec::new();
    }

    let range = max.checked_sub(min).unwrap_or(Decimal::ZERO);
    let n = Decimal::from(intervals);
    let mut ticks: Vec<Decimal> = (0..=intervals)
        .map(|i| {
            range
                .checked_mul(Decimal::from(i))
                .and_then(|scaled| scaled.checked_div(n))
                .and_then(|step| min.checked_add(step))
                .unwrap_or(min)
        })
        .collect();
    ticks.reverse();
    ticks
}

/// A label on the time axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLabel {
    /// Position in the sequence the labels were computed over.
    pub index: usize,
    pub label: String,
    pub left_percent: Decimal,
}

/// Roughly `target` labels spread across `candles`.
///
/// One label every `max(1, len / target)` candles starting at 0. The last
/// candle is always labelled: appended when the gap to the last emitted label
/// exceeds half a step, otherwise it takes over that last label so the two do
/// not collide.
///
/// Accepts owned candles or references, so a reordered view such as the
/// display sequence can be labelled without copying.
pub fn time_axis_labels<C: Borrow<Candle>>(candles: &[C], target: usize) -> Vec<TimeLabel> {
    let len = candles.len();
    if len == 0 {
        return Vec::new();
    }

    let step = (len / target.max(1)).max(1);
    let mut indices: Vec<usize> = (0..len).step_by(step).collect();

    let last = len - 1;
    if let Some(&emitted) = indices.last() {
        if emitted != last {
            // gap > step / 2, compared in whole numbers
            if (last - emitted) * 2 > step || indices.len() == 1 {
                indices.push(last);
            } else if let Some(slot) = indices.last_mut() {
                *slot = last;
            }
        }
    }

    let multi_day = spans_multiple_days(candles);
    indices
        .into_iter()
        .map(|index| TimeLabel {
            index,
            label: format_time_label(candles[index].borrow().open_time_seconds, multi_day),
            left_percent: label_position(index, len),
        })
        .collect()
}

fn label_position(index: usize, len: usize) -> Decimal {
    if len <= 1 {
        return Decimal::ZERO;
    }
    percent_of(Decimal::from(index), Decimal::from(len - 1))
        .unwrap_or(Decimal::ZERO)
        .min(HUNDRED)
}

fn spans_multiple_days<C: Borrow<Candle>>(candles: &[C]) -> bool {
    let days = candles
        .iter()
        .filter_map(|c| DateTime::<Utc>::from_timestamp(c.borrow().open_time_seconds, 0))
        .map(|t| t.date_naive());
    let mut first = None;
    for day in days {
        match first {
            None => first = Some(day),
            Some(d) if d != day => return true,
            Some(_) => {}
        }
    }
    false
}

/// UTC `HH:MM`, or `MM-DD HH:MM` when the chart spans several days.
/// Empty for a timestamp chrono cannot represent.
pub fn format_time_label(open_time_seconds: i64, multi_day: bool) -> String {
    let Some(time) = DateTime::<Utc>::from_timestamp(open_time_seconds, 0) else {
        return String::new();
    };
    if multi_day {
        time.format("%m-%d %H:%M").to_string()
    } else {
        time.format("%H:%M").to_string()
    }
}
