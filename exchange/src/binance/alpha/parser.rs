use crate::binance::{
    alpha::{
        models::{BalanceMap, Instrument, InstrumentCatalog, InstrumentStatus},
        precision::DEFAULT_PRECISION,
    },
    errors::{BinanceError, Result},
};
use log::warn;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

#[derive(Debug, Deserialize)]
struct ExchangeInfoRaw {
    #[serde(default)]
    symbols: Vec<SymbolRaw>,
}

#[derive(Debug, Deserialize)]
struct SymbolRaw {
    symbol: Option<String>,
    status: Option<String>,
    #[serde(rename = "baseAsset")]
    base_asset: Option<String>,
    #[serde(rename = "quoteAsset")]
    quote_asset: Option<String>,
    #[serde(rename = "pricePrecision")]
    price_precision: Option<u32>,
    #[serde(rename = "quantityPrecision")]
    quantity_precision: Option<u32>,
}

impl SymbolRaw {
    fn into_instrument(self) -> Option<Instrument> {
        let symbol = non_empty(self.symbol)?;
        let base_asset = non_empty(self.base_asset)?;
        let quote_asset = non_empty(self.quote_asset)?;
        Some(Instrument {
            symbol,
            base_asset,
            quote_asset,
            status: InstrumentStatus::from(self.status.as_deref().unwrap_or_default()),
            price_precision: self.price_precision.unwrap_or(DEFAULT_PRECISION),
            quantity_precision: self.quantity_precision.unwrap_or(DEFAULT_PRECISION),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_json(data: &str) -> Result<Value> {
    serde_json::from_str(data).map_err(|e| BinanceError::ParseResultError {
        message: format!("{}, {}", data, e),
    })
}

/// 数字或字符串形式的数值，缺失/null/空串视为 0
pub fn parse_lenient_decimal(value: Option<&Value>) -> Result<Decimal> {
    let text = match value {
        None | Some(Value::Null) => return Ok(Decimal::ZERO),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(Decimal::ZERO),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => {
            return Err(BinanceError::ParseResultError {
                message: format!("not a decimal value: {}", other),
            });
        }
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| BinanceError::ParseResultError {
            message: format!("invalid decimal {}: {}", text, e),
        })
}

/// 解析 get-exchange-info，缺少 symbol/baseAsset/quoteAsset 的条目被丢弃，其余保持原顺序
pub fn parse_exchange_info(data: &str) -> Result<InstrumentCatalog> {
    let raw: ExchangeInfoRaw =
        serde_json::from_str(data).map_err(|e| BinanceError::ParseResultError {
            message: format!("{}, {}", data, e),
        })?;

    let total = raw.symbols.len();
    let instruments: Vec<Instrument> = raw
        .symbols
        .into_iter()
        .filter_map(SymbolRaw::into_instrument)
        .collect();
    if instruments.len() < total {
        warn!(
            "Dropped {} alpha symbols without symbol/baseAsset/quoteAsset",
            total - instruments.len()
        );
    }

    Ok(InstrumentCatalog::new(instruments))
}

pub fn parse_ticker_price(data: &str) -> Result<Decimal> {
    let value = parse_json(data)?;
    parse_lenient_decimal(value.get("price"))
}

/// 解析 get-alpha-asset，资产代码优先取 cexAssetCode，其次 alphaId
pub fn parse_alpha_assets(data: &str) -> Result<BalanceMap> {
    let value = parse_json(data)?;
    let items = value
        .as_array()
        .ok_or_else(|| BinanceError::ParseResultError {
            message: format!("alpha assets is not an array: {}", data),
        })?;

    let mut balances = BalanceMap::new();
    for item in items {
        let code = ["cexAssetCode", "alphaId"]
            .iter()
            .filter_map(|key| item.get(*key).and_then(Value::as_str))
            .find(|code| !code.is_empty());
        let Some(code) = code else {
            continue;
        };
        let amount = parse_lenient_decimal(item.get("amount"))?;
        if amount > Decimal::ZERO {
            balances.insert(code.to_string(), amount);
        }
    }
    Ok(balances)
}

/// 解析下单回报，业务失败（success=false 或带 code/msg 的错误体）转为 GatewayError
pub fn parse_order_ack(data: &str) -> Result<Value> {
    let value = parse_json(data)?;

    if value.get("success").and_then(Value::as_bool) == Some(false) {
        let message = value
            .get("message")
            .or_else(|| value.get("msg"))
            .and_then(Value::as_str)
            .unwrap_or(data)
            .to_string();
        return Err(BinanceError::GatewayError {
            status: 200,
            message,
        });
    }
    if let (Some(code), Some(msg)) = (value.get("code"), value.get("msg"))
        && code.as_i64().is_some_and(|c| c != 0)
    {
        return Err(BinanceError::GatewayError {
            status: 200,
            message: format!("Error {}: {}", code, msg.as_str().unwrap_or("Unknown error")),
        });
    }

    Ok(value)
}
