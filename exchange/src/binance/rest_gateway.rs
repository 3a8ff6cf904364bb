use crate::binance::{
    alpha::{
        models::{AccountType, BalanceMap},
        parser::parse_alpha_assets,
    },
    consts::*,
    errors::{BinanceError, Result},
    gateway::ExchangeGateway,
    parser::{parse_server_time, parse_spot_balances},
    utils::{encode_params, hmac_sha256, push_timestamp, sort_params},
};
use async_trait::async_trait;
use log::{debug, error};
use rate_limiter::RateLimiter;
use std::{sync::Arc, time::Duration};
use time::TimeSync;

pub struct BinanceRestGatewayConfig {
    pub base_url: String,
    pub proxy_url: Option<String>,
    pub api_key: String,
    pub secret_key: String,
    pub timeout_milli_secs: u64,
    pub rate_limiters: Option<Arc<Vec<RateLimiter>>>,
}

pub struct BinanceRestGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    secret_key: String,
    rate_limiters: Option<Arc<Vec<RateLimiter>>>,
    timeout: Duration,
    time_sync: Arc<TimeSync>,
}

impl BinanceRestGateway {
    pub fn new(config: BinanceRestGatewayConfig, time_sync: Arc<TimeSync>) -> Result<Self> {
        let client_builder = reqwest::Client::builder();
        let client = if let Some(proxy_url) = &config.proxy_url {
            let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| {
                BinanceError::ParametersInvalid {
                    message: format!("proxy url invalid: {}, error: {}", proxy_url, e),
                }
            })?;
            client_builder.proxy(proxy).build()
        } else {
            client_builder.build()
        }
        .map_err(|e| BinanceError::ParametersInvalid {
            message: format!("build client failed: {}", e),
        })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            secret_key: config.secret_key,
            rate_limiters: config.rate_limiters,
            timeout: Duration::from_millis(config.timeout_milli_secs),
            time_sync,
        })
    }

    /// 以签名时刻重写 timestamp，排序后追加 signature，返回最终的 query 参数
    pub(crate) fn sign_params<'a>(
        &self,
        mut params: Vec<(&'a str, String)>,
    ) -> Result<Vec<(&'a str, String)>> {
        push_timestamp(&mut params, self.time_sync.now_millis(), RECV_WINDOW_MILLIS);
        sort_params(&mut params);
        let signature = hmac_sha256(&self.secret_key, encode_params(&params).as_str())?;
        params.push(("signature", signature));
        Ok(params)
    }

    /// 先等待限流再签名，限流等待不会让 timestamp 超出 recvWindow
    pub(crate) async fn prepare_params<'a>(
        &self,
        endpoint: &str,
        params: Vec<(&'a str, String)>,
        signed: bool,
    ) -> Result<Vec<(&'a str, String)>> {
        if let Some(rate_limiters) = &self.rate_limiters {
            let weight = endpoint_weight(endpoint);
            for rl in rate_limiters.iter() {
                if let Err(e) = rl.wait(weight).await {
                    error!("Rate limiter rejected {}: {}", endpoint, e);
                }
            }
        }

        if signed {
            self.sign_params(params)
        } else {
            Ok(params)
        }
    }

    async fn send_request(
        &self,
        method: reqwest::Method,
        endpoint: &str,
        params: Vec<(&str, String)>,
        signed: bool,
    ) -> Result<String> {
        let params = self.prepare_params(endpoint, params, signed).await?;

        let url = format!("{}{}", self.base_url, endpoint);
        let builder = match method {
            reqwest::Method::GET => self.client.get(url),
            reqwest::Method::POST => self.client.post(url),
            reqwest::Method::DELETE => self.client.delete(url),
            _ => {
                return Err(BinanceError::ParametersInvalid {
                    message: format!("unsupported http method: {}", method),
                });
            }
        };
        let builder = if signed {
            builder.header(API_KEY_HEADER, self.api_key.as_str())
        } else {
            builder
        };

        debug!("{} {}", method, endpoint);
        let resp = builder
            .query(&params)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                error!("Network error: {:?}", e);
                BinanceError::NetworkError {
                    message: e.to_string(),
                }
            })?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            let text = resp.text().await.unwrap_or_default();
            error!("Response error: status: {}, text: {}", status, text);
            return Err(BinanceError::GatewayError {
                status: status.as_u16(),
                message: text,
            });
        }

        resp.text().await.map_err(|e| {
            error!("Network error: {:?}", e);
            BinanceError::NetworkError {
                message: e.to_string(),
            }
        })
    }
}

// 未公开权重的 sapi 接口按 1 计
pub(crate) fn endpoint_weight(endpoint: &str) -> u64 {
    match endpoint {
        SPOT_ACCOUNT_ENDPOINT => 20,
        ALPHA_EXCHANGE_INFO_ENDPOINT => 10,
        _ => 1,
    }
}

#[async_trait]
impl ExchangeGateway for BinanceRestGateway {
    async fn fetch_balance(&self, account_type: AccountType) -> Result<BalanceMap> {
        let params = vec![("omitZeroBalances", "true".to_string())];
        match account_type {
            AccountType::Spot => {
                let text = self
                    .send_request(reqwest::Method::GET, SPOT_ACCOUNT_ENDPOINT, params, true)
                    .await?;
                parse_spot_balances(&text)
            }
            AccountType::Alpha => {
                let text = self
                    .send_request(reqwest::Method::GET, ALPHA_ASSET_ENDPOINT, vec![], true)
                    .await?;
                parse_alpha_assets(&text)
            }
        }
    }

    async fn request(
        &self,
        method: reqwest::Method,
        endpoint: &str,
        params: Vec<(&str, String)>,
    ) -> Result<String> {
        self.send_request(method, endpoint, params, true).await
    }

    async fn server_time(&self) -> Result<u128> {
        let text = self
            .send_request(reqwest::Method::GET, SERVER_TIME_ENDPOINT, vec![], false)
            .await?;
        parse_server_time(&text)
    }
}
