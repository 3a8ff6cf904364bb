use crate::binance::{
    alpha::parser::parse_ticker_price,
    consts::{ALPHA_TICKER_PRICE_ENDPOINT, RECV_WINDOW_MILLIS},
    errors::{BinanceError, Result},
    gateway::ExchangeGateway,
    utils::push_timestamp,
};
use log::warn;
use rust_decimal::Decimal;
use std::sync::Arc;
use time::TimeSync;

/// Alpha 交易对最新价，每次都实时请求
pub struct PriceOracle {
    gateway: Arc<dyn ExchangeGateway>,
    time_sync: Arc<TimeSync>,
}

impl PriceOracle {
    pub fn new(gateway: Arc<dyn ExchangeGateway>, time_sync: Arc<TimeSync>) -> Self {
        Self { gateway, time_sync }
    }

    pub async fn get_price(&self, symbol: &str) -> Result<Decimal> {
        let mut params = vec![("symbol", symbol.to_string())];
        push_timestamp(&mut params, self.time_sync.now_millis(), RECV_WINDOW_MILLIS);

        let text = self
            .gateway
            .request(reqwest::Method::GET, ALPHA_TICKER_PRICE_ENDPOINT, params)
            .await?;
        let price = parse_ticker_price(&text)?;

        if price <= Decimal::ZERO {
            warn!("Alpha symbol {} has no valid price: {}", symbol, text);
            return Err(BinanceError::InvalidPrice {
                symbol: symbol.to_string(),
                price,
            });
        }
        Ok(price)
    }
}
