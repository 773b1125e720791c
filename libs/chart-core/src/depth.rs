//! Depth Aggregator
//!
//! Turns a two-sided order book snapshot into render-ready magnitudes: bar
//! widths proportional to notional value, the notional (USD) column and a
//! per-row bid/ask spread.
//!
//! Only the first `window` levels of each side (20 by default) are visible.
//! Each side is normalised against its own largest notional; bids are never
//! compared against asks. Nothing here fails: missing or degenerate input
//! yields `0` or `None` (rendered as [`NO_VALUE`]).
//!
//! Spread uses the conventional definition `(ask − bid) / mid × 100`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use types::book::{OrderBookSnapshot, PriceLevel, Side};
use types::symbol::Symbol;

use crate::config::DepthConfig;
use crate::numeric::{percent_of, round_display, HUNDRED};

/// Placeholder shown where a row has no valid spread.
pub const NO_VALUE: &str = "—";

// ---------------------------------------------------------------------------
// Per-level operations
// ---------------------------------------------------------------------------

/// Notional value of a level (price × quantity).
pub fn notional_value(level: &PriceLevel) -> Decimal {
    level.notional()
}

/// Largest notional among the visible levels of `side`; zero when empty.
pub fn max_notional(snapshot: &OrderBookSnapshot, side: Side, window: usize) -> Decimal {
    snapshot
        .visible(side, window)
        .iter()
        .map(PriceLevel::notional)
        .max()
        .unwrap_or(Decimal::ZERO)
}

/// Bar width in `[0, 100]` for `level`, relative to the largest visible
/// notional on `side`.
pub fn bar_width_percent(
    side: Side,
    level: &PriceLevel,
    snapshot: &OrderBookSnapshot,
    window: usize,
) -> Decimal {
    width_against(level.notional(), max_notional(snapshot, side, window))
}

fn width_against(notional: Decimal, max: Decimal) -> Decimal {
    if max <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    percent_of(notional, max)
        .unwrap_or(Decimal::ZERO)
        .clamp(Decimal::ZERO, HUNDRED)
}

/// Spread percentage between the bid and ask at `row`.
///
/// `None` when either side lacks the row, a price is non-positive, or the
/// book is crossed or locked at that row.
pub fn row_spread_percent(
    row: usize,
    snapshot: &OrderBookSnapshot,
    window: usize,
) -> Option<Decimal> {
    let bid = snapshot.visible(Side::Bid, window).get(row)?;
    let ask = snapshot.visible(Side::Ask, window).get(row)?;
    spread_between(bid.price, ask.price)
}

fn spread_between(bid: Decimal, ask: Decimal) -> Option<Decimal> {
    if bid <= Decimal::ZERO || ask <= Decimal::ZERO || ask <= bid {
        return None;
    }
    let mid = mid_between(bid, ask)?;
    percent_of(ask.checked_sub(bid)?, mid)
}

fn mid_between(bid: Decimal, ask: Decimal) -> Option<Decimal> {
    bid.checked_add(ask)?.checked_div(Decimal::TWO)
}

/// Render a spread for the table: two decimals and `%`, or [`NO_VALUE`].
pub fn format_spread(spread: Option<Decimal>) -> String {
    match spread {
        Some(value) => format!("{:.2}%", round_display(value, 2)),
        None => NO_VALUE.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Depth table
// ---------------------------------------------------------------------------

/// One side of one table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthCell {
    pub price: Decimal,
    pub quantity: Decimal,
    pub notional: Decimal,
    /// Running quantity from the best level down to this one.
    pub cumulative_quantity: Decimal,
    pub bar_width_percent: Decimal,
}

/// A row of the side-by-side depth table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthRow {
    pub index: usize,
    pub bid: Option<DepthCell>,
    pub ask: Option<DepthCell>,
    pub spread_percent: Option<Decimal>,
}

/// Render model for the bookdepth popup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthTable {
    pub symbol: Symbol,
    pub timestamp_seconds: Option<i64>,
    pub rows: Vec<DepthRow>,
    pub best_bid: Option<Decimal>,
    pub best_ask: Option<Decimal>,
    pub mid_price: Option<Decimal>,
    /// Top-of-book spread (row 0).
    pub spread_percent: Option<Decimal>,
    pub total_bid_notional: Decimal,
    pub total_ask_notional: Decimal,
    /// `(bid − ask) / (bid + ask) × 100` over visible notional.
    pub imbalance_percent: Option<Decimal>,
}

impl DepthTable {
    /// Build the table for the visible window of `snapshot`.
    pub fn build(snapshot: &OrderBookSnapshot, config: &DepthConfig) -> Self {
        let window = config.window;
        let bids = side_cells(snapshot.visible(Side::Bid, window));
        let asks = side_cells(snapshot.visible(Side::Ask, window));

        let row_count = bids.len().max(asks.len());
        let rows: Vec<DepthRow> = (0..row_count)
            .map(|index| DepthRow {
                index,
                bid: bids.get(index).cloned(),
                ask: asks.get(index).cloned(),
                spread_percent: row_spread_percent(index, snapshot, window),
            })
            .collect();

        let best_bid = bids.first().map(|c| c.price);
        let best_ask = asks.first().map(|c| c.price);
        let mid_price = match (best_bid, best_ask) {
            (Some(bid), Some(ask)) if bid > Decimal::ZERO && ask > Decimal::ZERO => {
                mid_between(bid, ask)
            }
            _ => None,
        };

        if let (Some(bid), Some(ask)) = (best_bid, best_ask) {
            if ask <= bid {
                warn!(
                    symbol = %snapshot.symbol,
                    best_bid = %bid,
                    best_ask = %ask,
                    "Crossed or locked top of book"
                );
            }
        }

        let total_bid_notional = total_notional(&bids);
        let total_ask_notional = total_notional(&asks);
        let imbalance_percent = total_bid_notional
            .checked_add(total_ask_notional)
            .and_then(|total| {
                percent_of(total_bid_notional.checked_sub(total_ask_notional)?, total)
            });

        debug!(
            symbol = %snapshot.symbol,
            bid_levels = bids.len(),
            ask_levels = asks.len(),
            window,
            "Depth table built"
        );

        Self {
            symbol: snapshot.symbol.clone(),
            timestamp_seconds: snapshot.timestamp_seconds,
            spread_percent: rows.first().and_then(|r| r.spread_percent),
            rows,
            best_bid,
            best_ask,
            mid_price,
            total_bid_notional,
            total_ask_notional,
            imbalance_percent,
        }
    }
}

fn side_cells(levels: &[PriceLevel]) -> Vec<DepthCell> {
    let max = levels
        .iter()
        .map(PriceLevel::notional)
        .max()
        .unwrap_or(Decimal::ZERO);

    let mut cumulative = Decimal::ZERO;
    levels
        .iter()
        .map(|level| {
            cumulative = cumulative
                .checked_add(level.quantity)
                .unwrap_or(cumulative);
            let notional = level.notional();
            DepthCell {
                price: level.price,
                quantity: level.quantity,
                notional,
                cumulative_quantity: cumulative,
                bar_width_percent: width_against(notional, max),
            }
        })
        .collect()
}

fn total_notional(cells: &[DepthCell]) -> Decimal {
    cells.iter().fold(Decimal::ZERO, |acc, c| {
        acc.checked_add(c.notional).unwrap_or(acc)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn level(price: &str, qty: &str) -> PriceLevel {
        PriceLevel::new(dec(price), dec(qty))
    }

    fn book(bids: Vec<PriceLevel>, asks: Vec<PriceLevel>) -> OrderBookSnapshot {
        OrderBookSnapshot::new(Symbol::new("BTC/USDT"), bids, asks)
    }

    #[test]
    fn test_notional_value() {
        assert_eq!(notional_value(&level("100", "2.5")), dec("250"));
    }

    #[test]
    fn test_bar_width_relative_to_side_max() {
        let snapshot = book(
            vec![level("100", "1"), level("99", "4"), level("98", "2")],
            vec![level("101", "100")],
        );

        // Max bid notional is 99 × 4 = 396; the large ask does not matter.
        let widest = bar_width_percent(Side::Bid, &snapshot.bids[1], &snapshot, 20);
        assert_eq!(widest, dec("100"));

        let first = bar_width_percent(Side::Bid, &snapshot.bids[0], &snapshot, 20);
        assert!(first > Decimal::ZERO && first < dec("26"));
    }

    #[test]
    fn test_bar_width_empty_side_is_zero() {
        let snapshot = book(vec![level("100", "1")], vec![]);
        let width = bar_width_percent(Side::Ask, &level("101", "1"), &snapshot, 20);
        assert_eq!(width, Decimal::ZERO);
    }

    #[test]
    fn test_bar_width_capped_for_level_outside_window() {
        let snapshot = book(vec![level("100", "1")], vec![]);
        let width = bar_width_percent(Side::Bid, &level("100", "50"), &snapshot, 20);
        assert_eq!(width, dec("100"));
    }

    #[test]
    fn test_bar_width_zero_max_notional() {
        let snapshot = book(vec![level("100", "0"), level("99", "0")], vec![]);
        let width = bar_width_percent(Side::Bid, &snapshot.bids[0], &snapshot, 20);
        assert_eq!(width, Decimal::ZERO);
    }

    #[test]
    fn test_bar_width_ignores_levels_beyond_window() {
        let mut bids: Vec<PriceLevel> = (0..20).map(|i| level(&(100 - i).to_string(), "1")).collect();
        // A huge level at index 20 is outside the default window.
        bids.push(level("50", "1000"));
        let snapshot = book(bids, vec![]);

        let top = bar_width_percent(Side::Bid, &snapshot.bids[0], &snapshot, 20);
        assert_eq!(top, dec("100"));
    }

    #[test]
    fn test_row_spread_example() {
        let snapshot = book(vec![level("100", "1")], vec![level("101", "1")]);
        let spread = row_spread_percent(0, &snapshot, 20).unwrap();
        // (101 − 100) / 100.5 × 100 ≈ 0.995
        assert_eq!(round_display(spread, 3), dec("0.995"));
    }

    #[test]
    fn test_row_spread_sentinels() {
        let crossed = book(vec![level("101", "1")], vec![level("100", "1")]);
        assert_eq!(row_spread_percent(0, &crossed, 20), None);

        let locked = book(vec![level("100", "1")], vec![level("100", "1")]);
        assert_eq!(row_spread_percent(0, &locked, 20), None);

        let zero_bid = book(vec![level("0", "1")], vec![level("100", "1")]);
        assert_eq!(row_spread_percent(0, &zero_bid, 20), None);

        let one_sided = book(vec![level("100", "1"), level("99", "1")], vec![level("101", "1")]);
        assert_eq!(row_spread_percent(1, &one_sided, 20), None);
    }

    #[test]
    fn test_row_spread_outside_window() {
        let snapshot = book(
            vec![level("100", "1"), level("99", "1")],
            vec![level("101", "1"), level("102", "1")],
        );
        assert!(row_spread_percent(1, &snapshot, 2).is_some());
        assert_eq!(row_spread_percent(1, &snapshot, 1), None);
    }

    #[test]
    fn test_format_spread() {
        assert_eq!(format_spread(Some(dec("0.99502"))), "1.00%");
        assert_eq!(format_spread(Some(dec("0.125"))), "0.13%");
        assert_eq!(format_spread(None), "—");
    }

    #[test]
    fn test_depth_table_rows() {
        let snapshot = book(
            vec![level("100", "1"), level("99", "2"), level("98", "3")],
            vec![level("101", "1")],
        )
        .with_timestamp(1_708_123_456);

        let table = DepthTable::build(&snapshot, &DepthConfig::default());

        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.timestamp_seconds, Some(1_708_123_456));
        assert!(table.rows[0].spread_percent.is_some());
        assert!(table.rows[1].ask.is_none());
        assert_eq!(table.rows[1].spread_percent, None);

        let third = table.rows[2].bid.as_ref().unwrap();
        assert_eq!(third.cumulative_quantity, dec("6"));
        assert_eq!(third.notional, dec("294"));
        assert_eq!(third.bar_width_percent, dec("100"));

        assert_eq!(table.best_bid, Some(dec("100")));
        assert_eq!(table.best_ask, Some(dec("101")));
        assert_eq!(table.mid_price, Some(dec("100.5")));
        assert_eq!(table.spread_percent, table.rows[0].spread_percent);
        assert_eq!(table.total_bid_notional, dec("592"));
        assert_eq!(table.total_ask_notional, dec("101"));
    }

    #[test]
    fn test_depth_table_imbalance() {
        let balanced = book(vec![level("100", "1")], vec![level("100", "1")]);
        let table = DepthTable::build(&balanced, &DepthConfig::default());
        assert_eq!(table.imbalance_percent, Some(Decimal::ZERO));
        // Locked book: no spread
        assert_eq!(table.spread_percent, None);

        let bid_heavy = book(vec![level("100", "3")], vec![level("100", "1")]);
        let table = DepthTable::build(&bid_heavy, &DepthConfig::default());
        assert_eq!(table.imbalance_percent, Some(dec("50")));
    }

    #[test]
    fn test_depth_table_empty_book() {
        let table = DepthTable::build(&book(vec![], vec![]), &DepthConfig::default());
        assert!(table.rows.is_empty());
        assert_eq!(table.best_bid, None);
        assert_eq!(table.mid_price, None);
        assert_eq!(table.spread_percent, None);
        assert_eq!(table.total_bid_notional, Decimal::ZERO);
        assert_eq!(table.imbalance_percent, None);
    }

    #[test]
    fn test_depth_table_respects_window() {
        let bids: Vec<PriceLevel> = (0..30).map(|i| level(&(100 - i).to_string(), "1")).collect();
        let table = DepthTable::build(&book(bids, vec![]), &DepthConfig { window: 5 });
        assert_eq!(table.rows.len(), 5);
    }
}
