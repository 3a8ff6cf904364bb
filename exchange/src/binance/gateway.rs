use crate::binance::{
    alpha::models::{AccountType, BalanceMap},
    errors::Result,
};
use async_trait::async_trait;

/// 交易所访问入口，签名与传输由实现负责
///
/// Alpha 相关接口都不在标准现货 API 中，统一通过 `request` 发送带签名的请求，
/// 调用方负责提供 timestamp/recvWindow 之外的业务参数。
#[async_trait]
pub trait ExchangeGateway: Send + Sync {
    async fn fetch_balance(&self, account_type: AccountType) -> Result<BalanceMap>;

    async fn request(
        &self,
        method: reqwest::Method,
        endpoint: &str,
        params: Vec<(&str, String)>,
    ) -> Result<String>;

    /// 交易所服务器时间（毫秒）
    async fn server_time(&self) -> Result<u128>;
}
