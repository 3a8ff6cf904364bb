//! 脚本化的 ExchangeGateway，用于不访问网络的测试

use crate::binance::{
    alpha::models::{AccountType, BalanceMap},
    errors::{BinanceError, Result},
    gateway::ExchangeGateway,
};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
    time::Duration,
};

#[derive(Debug, Clone)]
pub enum MockReply<T> {
    Ok(T),
    NetworkError(String),
    Rejected(u16, String),
}

impl<T> MockReply<T> {
    fn into_result(self) -> Result<T> {
        match self {
            MockReply::Ok(value) => Ok(value),
            MockReply::NetworkError(message) => Err(BinanceError::NetworkError { message }),
            MockReply::Rejected(status, message) => {
                Err(BinanceError::GatewayError { status, message })
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: reqwest::Method,
    pub endpoint: String,
    pub params: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// 每个 endpoint / 账户类型维护一个回复队列，队列只剩一项时重复返回该项
#[derive(Default)]
pub struct MockGateway {
    routes: Mutex<HashMap<String, VecDeque<MockReply<String>>>>,
    balances: Mutex<HashMap<AccountType, VecDeque<MockReply<BalanceMap>>>>,
    server_times: Mutex<VecDeque<MockReply<u128>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    balance_fetches: Mutex<Vec<AccountType>>,
    delay: Mutex<Option<Duration>>,
}

fn next_reply<T: Clone>(queue: Option<&mut VecDeque<MockReply<T>>>, what: &str) -> Result<T> {
    let queue = queue.ok_or_else(|| BinanceError::NetworkError {
        message: format!("no mock reply for {}", what),
    })?;
    let reply = if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    };
    reply
        .ok_or_else(|| BinanceError::NetworkError {
            message: format!("no mock reply for {}", what),
        })?
        .into_result()
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_route(&self, endpoint: &str, reply: MockReply<String>) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .entry(endpoint.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn on(&self, endpoint: &str, body: impl Into<String>) -> &Self {
        self.push_route(endpoint, MockReply::Ok(body.into()))
    }

    pub fn on_network_error(&self, endpoint: &str, message: &str) -> &Self {
        self.push_route(endpoint, MockReply::NetworkError(message.to_string()))
    }

    pub fn on_rejected(&self, endpoint: &str, status: u16, message: &str) -> &Self {
        self.push_route(endpoint, MockReply::Rejected(status, message.to_string()))
    }

    pub fn on_balance(&self, account_type: AccountType, balances: BalanceMap) -> &Self {
        self.balances
            .lock()
            .unwrap()
            .entry(account_type)
            .or_default()
            .push_back(MockReply::Ok(balances));
        self
    }

    pub fn on_balance_error(&self, account_type: AccountType, message: &str) -> &Self {
        self.balances
            .lock()
            .unwrap()
            .entry(account_type)
            .or_default()
            .push_back(MockReply::NetworkError(message.to_string()));
        self
    }

    pub fn on_server_time(&self, server_millis: u128) -> &Self {
        self.server_times
            .lock()
            .unwrap()
            .push_back(MockReply::Ok(server_millis));
        self
    }

    /// 每次调用前等待，配合 tokio 暂停时钟模拟并发
    pub fn with_delay(&self, delay: Duration) -> &Self {
        *self.delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, endpoint: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.endpoint == endpoint)
            .collect()
    }

    pub fn request_count(&self, endpoint: &str) -> usize {
        self.requests_to(endpoint).len()
    }

    pub fn balance_fetch_count(&self, account_type: AccountType) -> usize {
        self.balance_fetches
            .lock()
            .unwrap()
            .iter()
            .filter(|t| **t == account_type)
            .count()
    }

    async fn maybe_delay(&self) {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ExchangeGateway for MockGateway {
    async fn fetch_balance(&self, account_type: AccountType) -> Result<BalanceMap> {
        self.balance_fetches.lock().unwrap().push(account_type);
        self.maybe_delay().await;
        let mut balances = self.balances.lock().unwrap();
        next_reply(balances.get_mut(&account_type), account_type.as_str())
    }

    async fn request(
        &self,
        method: reqwest::Method,
        endpoint: &str,
        params: Vec<(&str, String)>,
    ) -> Result<String> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            endpoint: endpoint.to_string(),
            params: params
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        });
        self.maybe_delay().await;
        let mut routes = self.routes.lock().unwrap();
        next_reply(routes.get_mut(endpoint), endpoint)
    }

    async fn server_time(&self) -> Result<u128> {
        self.maybe_delay().await;
        let mut server_times = self.server_times.lock().unwrap();
        next_reply(Some(&mut *server_times), "server time")
    }
}

/// get-exchange-info 中的一个交易对
pub fn alpha_symbol(
    symbol: &str,
    base_asset: &str,
    quote_asset: &str,
    status: &str,
    price_precision: u32,
    quantity_precision: u32,
) -> Value {
    json!({
        "symbol": symbol,
        "status": status,
        "baseAsset": base_asset,
        "quoteAsset": quote_asset,
        "pricePrecision": price_precision,
        "quantityPrecision": quantity_precision,
    })
}

pub fn exchange_info(symbols: Vec<Value>) -> String {
    json!({ "symbols": symbols }).to_string()
}

pub fn ticker_price(price: &str) -> String {
    json!({ "price": price }).to_string()
}
