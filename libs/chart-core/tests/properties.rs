//! Property tests for the depth aggregator and candle scaler
//!
//! Checks the render invariants over random books and candle sequences:
//! - Bar widths stay within [0, 100] and the widest level reaches 100
//! - Crossed or locked rows never produce a spread
//! - Wick and body spans respect their visibility floors
//! - Display/original index mapping is an involution
//! - The final candle always carries a time label

use chart_core::axis::time_axis_labels;
use chart_core::config::ScalerConfig;
use chart_core::depth::{bar_width_percent, max_notional, row_spread_percent, DepthTable};
use chart_core::scale::{
    body_rect, display_index_to_original_index, price_scale, volume_bar_rect, volume_scale,
    wick_rect, MIN_BODY_HEIGHT, MIN_WICK_HEIGHT,
};
use chart_core::CandleChart;
use proptest::prelude::*;
use rust_decimal::Decimal;
use types::book::{OrderBookSnapshot, PriceLevel, Side};
use types::candle::Candle;
use types::symbol::Symbol;

fn decimal(max: i64, scale: u32) -> impl Strategy<Value = Decimal> {
    (0..max).prop_map(move |v| Decimal::new(v, scale))
}

fn level() -> impl Strategy<Value = PriceLevel> {
    (decimal(10_000_000, 2), decimal(1_000_000, 3)).prop_map(|(p, q)| PriceLevel::new(p, q))
}

fn book() -> impl Strategy<Value = OrderBookSnapshot> {
    (
        prop::collection::vec(level(), 0..30),
        prop::collection::vec(level(), 0..30),
    )
        .prop_map(|(bids, asks)| OrderBookSnapshot::new(Symbol::new("BTC/USDT"), bids, asks))
}

/// Candles that satisfy low <= open, close <= high.
fn candle() -> impl Strategy<Value = Candle> {
    (
        decimal(1_000_000, 2),
        decimal(10_000, 2),
        decimal(10_000, 2),
        decimal(10_000, 2),
        decimal(1_000_000, 1),
        prop::option::of(decimal(1_000_000, 1)),
        0i64..2_000_000_000,
    )
        .prop_map(|(low, a, b, up, coin, usd, t)| {
            let open = low + a;
            let close = low + b;
            let high = open.max(close) + up;
            Candle {
                open_price: open,
                high_price: high,
                low_price: low,
                close_price: close,
                coin_volume: coin,
                usd_volume: usd,
                open_time_seconds: t,
            }
        })
}

proptest! {
    #[test]
    fn bar_width_within_bounds(snapshot in book()) {
        for side in [Side::Bid, Side::Ask] {
            for level in snapshot.levels(side) {
                let width = bar_width_percent(side, level, &snapshot, 20);
                prop_assert!(width >= Decimal::ZERO);
                prop_assert!(width <= Decimal::ONE_HUNDRED);
            }
        }
    }

    #[test]
    fn widest_level_reaches_full_width(snapshot in book()) {
        for side in [Side::Bid, Side::Ask] {
            let max = max_notional(&snapshot, side, 20);
            if max > Decimal::ZERO {
                let widest = snapshot
                    .visible(side, 20)
                    .iter()
                    .find(|l| l.notional() == max)
                    .unwrap();
                prop_assert_eq!(
                    bar_width_percent(side, widest, &snapshot, 20),
                    Decimal::ONE_HUNDRED
                );
            }
        }
    }

    #[test]
    fn empty_side_has_zero_width(bids in prop::collection::vec(level(), 0..10), stray in level()) {
        let snapshot = OrderBookSnapshot::new(Symbol::new("BTC/USDT"), bids, vec![]);
        prop_assert_eq!(bar_width_percent(Side::Ask, &stray, &snapshot, 20), Decimal::ZERO);
    }

    #[test]
    fn crossed_rows_have_no_spread(snapshot in book()) {
        let rows = snapshot.bids.len().max(snapshot.asks.len()).min(20);
        for row in 0..rows {
            let spread = row_spread_percent(row, &snapshot, 20);
            if let (Some(bid), Some(ask)) = (snapshot.bids.get(row), snapshot.asks.get(row)) {
                if ask.price <= bid.price {
                    prop_assert_eq!(spread, None);
                } else if bid.price > Decimal::ZERO {
                    prop_assert!(spread.unwrap() > Decimal::ZERO);
                }
            } else {
                prop_assert_eq!(spread, None);
            }
        }
    }

    #[test]
    fn depth_table_never_exceeds_window(snapshot in book()) {
        let table = DepthTable::build(&snapshot, &Default::default());
        prop_assert!(table.rows.len() <= 20);
    }

    #[test]
    fn wick_and_body_floors(candles in prop::collection::vec(candle(), 1..60)) {
        let scale = price_scale(&candles);
        prop_assert!(scale.max > scale.min);
        for c in &candles {
            let wick = wick_rect(c, &scale).unwrap();
            let body = body_rect(c, &scale).unwrap();
            prop_assert!(wick.height_percent >= MIN_WICK_HEIGHT);
            prop_assert!(body.height_percent >= MIN_BODY_HEIGHT);
        }
    }

    #[test]
    fn display_mapping_is_involution(n in 1usize..500, seed in 0usize..500) {
        let i = seed % n;
        let original = display_index_to_original_index(i, n).unwrap();
        prop_assert_eq!(display_index_to_original_index(original, n), Some(i));
    }

    #[test]
    fn zero_volume_bars_are_flat(count in 1usize..40) {
        let candles: Vec<Candle> = (0..count)
            .map(|i| Candle::new(i as i64 * 60, Decimal::ONE, Decimal::TWO, Decimal::ONE, Decimal::TWO, Decimal::ZERO))
            .collect();
        let scale = volume_scale(&candles);
        prop_assert_eq!(scale.max, Decimal::ZERO);
        for (i, c) in candles.iter().enumerate() {
            prop_assert_eq!(volume_bar_rect(c, i, count, &scale).height_percent, Decimal::ZERO);
        }
    }

    #[test]
    fn final_candle_is_labelled(candles in prop::collection::vec(candle(), 2..120), target in 1usize..12) {
        let labels = time_axis_labels(&candles, target);
        prop_assert_eq!(labels.first().map(|l| l.index), Some(0));
        prop_assert_eq!(labels.last().map(|l| l.index), Some(candles.len() - 1));
        prop_assert!(labels.windows(2).all(|w| w[0].index < w[1].index));
    }

    #[test]
    fn chart_activation_maps_back(candles in prop::collection::vec(candle(), 1..40)) {
        let chart = CandleChart::build(&candles, &ScalerConfig::default());
        for display_index in 0..chart.len() {
            let event = chart.activate_volume_bar(display_index).unwrap();
            prop_assert_eq!(
                event.open_time_seconds,
                candles[event.original_index].open_time_seconds
            );
        }
    }
}
