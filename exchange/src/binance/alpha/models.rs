use rust_decimal::Decimal;
use std::{collections::HashMap, fmt, time::Duration};
use tokio::time::Instant;

/// 资产代码 -> 正数余额，不包含零或负数
pub type BalanceMap = HashMap<String, Decimal>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountType {
    Spot,
    Alpha,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Spot => "SPOT",
            AccountType::Alpha => "ALPHA",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstrumentStatus {
    Trading,
    Other(String),
}

impl From<&str> for InstrumentStatus {
    fn from(s: &str) -> Self {
        match s {
            "TRADING" => InstrumentStatus::Trading,
            other => InstrumentStatus::Other(other.to_string()),
        }
    }
}

impl InstrumentStatus {
    pub fn is_trading(&self) -> bool {
        matches!(self, InstrumentStatus::Trading)
    }
}

/// Alpha 交易对
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instrument {
    pub symbol: String,
    pub base_asset: String,
    pub quote_asset: String,
    pub status: InstrumentStatus,
    pub price_precision: u32,
    pub quantity_precision: u32,
}

/// 一次完整拉取的交易对列表，刷新时整体替换
#[derive(Debug, Clone, Default)]
pub struct InstrumentCatalog {
    pub instruments: Vec<Instrument>,
}

impl InstrumentCatalog {
    pub fn new(instruments: Vec<Instrument>) -> Self {
        Self { instruments }
    }

    /// 按列表顺序返回第一个报价资产匹配且处于 TRADING 的交易对
    pub fn resolve(&self, quote_asset: &str) -> Option<&Instrument> {
        self.instruments
            .iter()
            .find(|i| i.quote_asset == quote_asset && i.status.is_trading())
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}

/// 单槽缓存项，`fetched_at` 为 None 表示已失效
#[derive(Debug)]
pub struct CacheEntry<T> {
    pub fetched_at: Option<Instant>,
    pub value: T,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T) -> Self {
        Self {
            fetched_at: Some(Instant::now()),
            value,
        }
    }

    pub fn expired(value: T) -> Self {
        Self {
            fetched_at: None,
            value,
        }
    }

    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.is_some_and(|t| t.elapsed() < ttl)
    }
}

/// 待提交的 Alpha 下单参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDescriptor {
    pub base_asset: String,
    pub quote_asset: String,
    pub side: Side,
    pub quantity: String,
    pub price: String,
    pub timestamp: u128,
    pub recv_window: u64,
}

impl OrderDescriptor {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("baseAsset", self.base_asset.clone()),
            ("quoteAsset", self.quote_asset.clone()),
            ("side", self.side.as_str().to_string()),
            ("quantity", self.quantity.clone()),
            ("price", self.price.clone()),
            ("timestamp", self.timestamp.to_string()),
            ("recvWindow", self.recv_window.to_string()),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct TransferReceipt {
    pub order: OrderDescriptor,
    pub response: serde_json::Value,
}
