//! Iteration-detail payload served by `/api/admin/crawler/.../iterations/{id}`
//!
//! Only the `book_depth` and `klines` members are modelled; everything else in
//! the payload (funding rates, job metadata) is ignored. The crawler writes
//! floats, but some venues hand back numeric strings, so both are accepted.
//! Every number is validated into a `Decimal` here so the chart engine can
//! assume well-typed input.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::book::{OrderBookSnapshot, PriceLevel};
use crate::candle::Candle;
use crate::errors::PayloadError;
use crate::symbol::Symbol;

/// A JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireNumber {
    Number(f64),
    Text(String),
}

impl WireNumber {
    /// Parse into a `Decimal`, naming `field` in the error.
    pub fn to_decimal(&self, field: &str) -> Result<Decimal, PayloadError> {
        match self {
            WireNumber::Number(n) => {
                if !n.is_finite() {
                    return Err(PayloadError::invalid_number(field, n));
                }
                // f64 Display is the shortest round-trip form and never uses
                // an exponent, so it parses as an exact decimal.
                Decimal::from_str(&n.to_string())
                    .map_err(|_| PayloadError::invalid_number(field, n))
            }
            WireNumber::Text(s) => {
                let trimmed = s.trim();
                Decimal::from_str(trimmed)
                    .or_else(|_| Decimal::from_scientific(trimmed))
                    .map_err(|_| PayloadError::invalid_number(field, s))
            }
        }
    }

    /// Parse float seconds into whole Unix seconds (truncating).
    pub fn to_unix_seconds(&self, field: &str) -> Result<i64, PayloadError> {
        let secs = match self {
            WireNumber::Number(n) => *n,
            WireNumber::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| PayloadError::invalid_timestamp(field, s))?,
        };

        if !secs.is_finite() || secs.abs() >= i64::MAX as f64 {
            return Err(PayloadError::invalid_timestamp(field, secs));
        }
        Ok(secs.trunc() as i64)
    }
}

/// One book level, either `{price, quantity}` or `[price, quantity]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireLevel {
    Object { price: WireNumber, quantity: WireNumber },
    Pair(WireNumber, WireNumber),
}

impl WireLevel {
    fn to_level(&self, field: &str) -> Result<PriceLevel, PayloadError> {
        let (price, quantity) = match self {
            WireLevel::Object { price, quantity } => (price, quantity),
            WireLevel::Pair(price, quantity) => (price, quantity),
        };
        Ok(PriceLevel::new(
            price.to_decimal(&format!("{field}.price"))?,
            quantity.to_decimal(&format!("{field}.quantity"))?,
        ))
    }
}

/// Raw `book_depth` member.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WireBookDepth {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub exchange_symbol: Option<String>,
    #[serde(default)]
    pub bids: Option<Vec<WireLevel>>,
    #[serde(default)]
    pub asks: Option<Vec<WireLevel>>,
    #[serde(default)]
    pub utc: Option<WireNumber>,
}

/// Raw `klines[]` element.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WireCandle {
    pub utc_open_time: WireNumber,
    pub open_price: WireNumber,
    pub high_price: WireNumber,
    pub low_price: WireNumber,
    pub close_price: WireNumber,
    #[serde(default)]
    pub coin_volume: Option<WireNumber>,
    #[serde(default)]
    pub usd_volume: Option<WireNumber>,
}

impl WireCandle {
    fn to_candle(&self, index: usize) -> Result<Candle, PayloadError> {
        let field = |name: &str| format!("klines[{index}].{name}");

        let coin_volume = match &self.coin_volume {
            Some(v) => v.to_decimal(&field("coin_volume"))?,
            None => Decimal::ZERO,
        };
        let usd_volume = match &self.usd_volume {
            Some(v) => Some(v.to_decimal(&field("usd_volume"))?),
            None => None,
        };

        Ok(Candle {
            open_price: self.open_price.to_decimal(&field("open_price"))?,
            high_price: self.high_price.to_decimal(&field("high_price"))?,
            low_price: self.low_price.to_decimal(&field("low_price"))?,
            close_price: self.close_price.to_decimal(&field("close_price"))?,
            coin_volume,
            usd_volume,
            open_time_seconds: self.utc_open_time.to_unix_seconds(&field("utc_open_time"))?,
        })
    }
}

/// The chart-relevant part of an iteration-detail response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IterationDetail {
    #[serde(default)]
    pub book_depth: Option<WireBookDepth>,
    #[serde(default)]
    pub klines: Option<Vec<WireCandle>>,
}

impl IterationDetail {
    /// Parse a JSON document.
    pub fn from_json(json: &str) -> Result<Self, PayloadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse from an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, PayloadError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Validated order book, or `None` when the iteration carries no depth.
    pub fn order_book(&self) -> Result<Option<OrderBookSnapshot>, PayloadError> {
        let Some(raw) = &self.book_depth else {
            return Ok(None);
        };

        let symbol = raw
            .symbol
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(raw.exchange_symbol.as_deref())
            .unwrap_or_default();

        let bids = convert_levels(raw.bids.as_deref().unwrap_or_default(), "book_depth.bids")?;
        let asks = convert_levels(raw.asks.as_deref().unwrap_or_default(), "book_depth.asks")?;

        let timestamp_seconds = match &raw.utc {
            Some(utc) => Some(utc.to_unix_seconds("book_depth.utc")?),
            None => None,
        };

        Ok(Some(OrderBookSnapshot {
            symbol: Symbol::new(symbol),
            bids,
            asks,
            timestamp_seconds,
        }))
    }

    /// Validated candles in payload order (oldest first).
    pub fn candles(&self) -> Result<Vec<Candle>, PayloadError> {
        self.klines
            .as_deref()
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(i, raw)| raw.to_candle(i))
            .collect()
    }
}

fn convert_levels(raw: &[WireLevel], field: &str) -> Result<Vec<PriceLevel>, PayloadError> {
    raw.iter()
        .enumerate()
        .map(|(i, level)| level.to_level(&format!("{field}[{i}]")))
        .collect()
}
