use crate::binance::{
    alpha::{models::BalanceMap, parser::parse_lenient_decimal},
    errors::{BinanceError, Result},
};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ServerTimeRaw {
    #[serde(rename = "serverTime")]
    server_time: u128,
}

pub fn parse_server_time(data: &str) -> Result<u128> {
    let raw: ServerTimeRaw =
        serde_json::from_str(data).map_err(|e| BinanceError::ParseResultError {
            message: format!("{}, {}", data, e),
        })?;
    Ok(raw.server_time)
}

#[derive(Debug, Deserialize)]
struct SpotAccountRaw {
    #[serde(default)]
    balances: Vec<serde_json::Value>,
}

/// 现货余额 = free + locked，只保留正数
pub fn parse_spot_balances(data: &str) -> Result<BalanceMap> {
    let raw: SpotAccountRaw =
        serde_json::from_str(data).map_err(|e| BinanceError::ParseResultError {
            message: format!("{}, {}", data, e),
        })?;

    let mut balances = BalanceMap::new();
    for item in raw.balances {
        let Some(asset) = item.get("asset").and_then(|a| a.as_str()) else {
            continue;
        };
        let total = parse_lenient_decimal(item.get("free"))?
            + parse_lenient_decimal(item.get("locked"))?;
        if total > Decimal::ZERO {
            balances.insert(asset.to_string(), total);
        }
    }
    Ok(balances)
}
