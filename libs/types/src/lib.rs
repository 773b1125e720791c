//! Types library for the crawler admin chart engine
//!
//! Plain data objects delivered by the crawler admin API and consumed by the
//! depth aggregator and candle scaler in `chart-core`.
//!
//! # Version
//! v1.0.0
//!
//! # Modules
//! - `symbol`: Opaque display symbol (`BTC/USDT`)
//! - `book`: Order book snapshot (`PriceLevel`, `Side`, `OrderBookSnapshot`)
//! - `candle`: OHLCV candle as delivered by the crawler
//! - `wire`: Iteration-detail payload and its validation boundary
//! - `errors`: Error taxonomy

// Public modules
pub mod symbol;
pub mod book;
pub mod candle;
pub mod wire;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::symbol::*;
    pub use crate::book::*;
    pub use crate::candle::*;
    pub use crate::wire::*;
    pub use crate::errors::*;
}
