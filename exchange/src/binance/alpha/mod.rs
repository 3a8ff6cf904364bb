//! Alpha 2.0 流动性：通过对特殊交易对下 BUY/SELL 单在现货与流动性钱包之间划转资金

pub mod balance;
pub mod catalog;
pub mod models;
pub mod order_builder;
pub mod parser;
pub mod precision;
pub mod price;
pub mod transfer;

pub use balance::{BalanceCache, balances_changed_significantly};
pub use catalog::InstrumentCatalogCache;
pub use models::*;
pub use order_builder::LiquidityOrderBuilder;
pub use price::PriceOracle;
pub use transfer::LiquidityTransferService;

#[cfg(test)]
mod order_builder_test;
