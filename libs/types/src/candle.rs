//! OHLCV candle as delivered by the crawler
//!
//! Candles arrive oldest-first. The OHLC invariant is reported by
//! [`Candle::is_valid`] but never enforced: the chart engine renders whatever
//! it is given.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single kline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    pub open_price: Decimal,
    pub high_price: Decimal,
    pub low_price: Decimal,
    pub close_price: Decimal,
    /// Volume in base-asset units.
    pub coin_volume: Decimal,
    /// Volume in USD, only reported by some venues for USD-quoted pairs.
    pub usd_volume: Option<Decimal>,
    /// Unix seconds of the bucket open.
    pub open_time_seconds: i64,
}

impl Candle {
    pub fn new(
        open_time_seconds: i64,
        open_price: Decimal,
        high_price: Decimal,
        low_price: Decimal,
        close_price: Decimal,
        coin_volume: Decimal,
    ) -> Self {
        Self {
            open_price,
            high_price,
            low_price,
            close_price,
            coin_volume,
            usd_volume: None,
            open_time_seconds,
        }
    }

    pub fn with_usd_volume(mut self, usd_volume: Decimal) -> Self {
        self.usd_volume = Some(usd_volume);
        self
    }

    /// Volume used for the volume pane: USD volume when reported and positive,
    /// otherwise coin volume.
    pub fn effective_volume(&self) -> Decimal {
        match self.usd_volume {
            Some(usd) if usd > Decimal::ZERO => usd,
            _ => self.coin_volume,
        }
    }

    /// Close at or above open.
    pub fn is_bullish(&self) -> bool {
        self.close_price >= self.open_price
    }

    /// Validate candle integrity (OHLCV invariants).
    pub fn is_valid(&self) -> bool {
        self.high_price >= self.open_price
            && self.high_price >= self.close_price
            && self.high_price >= self.low_price
            && self.low_price <= self.open_price
            && self.low_price <= self.close_price
            && self.coin_volume >= Decimal::ZERO
    }
}
