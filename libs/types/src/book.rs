//! Order book snapshot types
//!
//! A snapshot is built once per iteration-detail request by the wire layer and
//! is immutable afterwards. Levels keep the caller's ordering (best price
//! first); nothing in this crate re-sorts them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::symbol::Symbol;

/// Book side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy interest
    Bid,
    /// Sell interest
    Ask,
}

/// A single price level of a depth snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: Decimal,
    pub quantity: Decimal,
}

impl PriceLevel {
    pub fn new(price: Decimal, quantity: Decimal) -> Self {
        Self { price, quantity }
    }

    /// Notional value of the level (price × quantity).
    ///
    /// Overflow degrades to zero rather than panicking.
    pub fn notional(&self) -> Decimal {
        self.price
            .checked_mul(self.quantity)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Two-sided order book snapshot for one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    pub symbol: Symbol,
    /// Bids, best (highest) price first.
    pub bids: Vec<PriceLevel>,
    /// Asks, best (lowest) price first.
    pub asks: Vec<PriceLevel>,
    /// Unix seconds at which the crawler captured the book.
    pub timestamp_seconds: Option<i64>,
}

impl OrderBookSnapshot {
    pub fn new(symbol: Symbol, bids: Vec<PriceLevel>, asks: Vec<PriceLevel>) -> Self {
        Self {
            symbol,
            bids,
            asks,
            timestamp_seconds: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp_seconds: i64) -> Self {
        self.timestamp_seconds = Some(timestamp_seconds);
        self
    }

    /// All levels of one side in caller order.
    pub fn levels(&self, side: Side) -> &[PriceLevel] {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    /// The first `window` levels of one side (fewer if the side is shorter).
    pub fn visible(&self, side: Side, window: usize) -> &[PriceLevel] {
        let levels = self.levels(side);
        &levels[..levels.len().min(window)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_notional() {
        let level = PriceLevel::new(dec("50000.5"), dec("0.2"));
        assert_eq!(level.notional(), dec("10000.1"));
    }

    #[test]
    fn test_notional_overflow_is_zero() {
        let level = PriceLevel::new(Decimal::MAX, dec("2"));
        assert_eq!(level.notional(), Decimal::ZERO);
    }

    #[test]
    fn test_visible_window_truncates() {
        let bids: Vec<PriceLevel> = (0..30)
            .map(|i| PriceLevel::new(Decimal::from(100 - i), Decimal::ONE))
            .collect();
        let book = OrderBookSnapshot::new(Symbol::new("BTC/USDT"), bids, vec![]);

        assert_eq!(book.visible(Side::Bid, 20).len(), 20);
        assert_eq!(book.visible(Side::Ask, 20).len(), 0);
        // Caller ordering is preserved
        assert_eq!(book.visible(Side::Bid, 20)[0].price, Decimal::from(100));
    }

    #[test]
    fn test_visible_window_shorter_side() {
        let asks = vec![PriceLevel::new(dec("101"), dec("1"))];
        let book = OrderBookSnapshot::new(Symbol::new("BTC/USDT"), vec![], asks);
        assert_eq!(book.visible(Side::Ask, 20).len(), 1);
        assert!(book.visible(Side::Bid, 20).is_empty());
    }

    #[test]
    fn test_snapshot_serialization() {
        let book = OrderBookSnapshot::new(
            Symbol::new("BTC/USDT"),
            vec![PriceLevel::new(dec("100"), dec("1.5"))],
            vec![PriceLevel::new(dec("101"), dec("2"))],
        )
        .with_timestamp(1_708_123_456);

        let json = serde_json::to_string(&book).unwrap();
        let deserialized: OrderBookSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(book, deserialized);
    }
}
