use crate::binance::{
    alpha::{
        balance::BalanceCache,
        models::{Side, TransferReceipt},
        order_builder::LiquidityOrderBuilder,
        parser::parse_order_ack,
    },
    consts::ALPHA_PLACE_ORDER_ENDPOINT,
    errors::{BinanceError, Result},
    gateway::ExchangeGateway,
};
use log::{error, info};
use rust_decimal::Decimal;
use std::sync::Arc;
use time::LatencyGuard;

/// 现货 <-> Alpha 流动性划转
///
/// 每次调用独立完成 构建订单 -> 提交 -> 清除余额缓存 -> 解析回执。失败时原样上报，不重试
pub struct LiquidityTransferService {
    enabled: bool,
    gateway: Arc<dyn ExchangeGateway>,
    builder: Arc<LiquidityOrderBuilder>,
    balance_caches: Vec<Arc<BalanceCache>>,
}

impl LiquidityTransferService {
    pub fn new(
        enabled: bool,
        gateway: Arc<dyn ExchangeGateway>,
        builder: Arc<LiquidityOrderBuilder>,
        balance_caches: Vec<Arc<BalanceCache>>,
    ) -> Self {
        Self {
            enabled,
            gateway,
            builder,
            balance_caches,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// 现货 -> 流动性，对 asset 计价的 Alpha 交易对下 BUY 单
    pub async fn move_to_liquidity(&self, asset: &str, amount: Decimal) -> Result<TransferReceipt> {
        self.transfer(asset, amount, Side::Buy).await
    }

    /// 流动性 -> 现货，下 SELL 单
    pub async fn move_to_spot(&self, asset: &str, amount: Decimal) -> Result<TransferReceipt> {
        self.transfer(asset, amount, Side::Sell).await
    }

    async fn transfer(&self, asset: &str, amount: Decimal, side: Side) -> Result<TransferReceipt> {
        if !self.enabled {
            return Err(BinanceError::FeatureDisabled {
                feature: "alpha liquidity".to_string(),
            });
        }
        let _latency = LatencyGuard::new(format!("alpha {} transfer", side));

        let wrap = |e: BinanceError| {
            error!("Alpha {} failed for {} {}: {}", side, amount, asset, e);
            BinanceError::TransferFailed {
                side: side.to_string(),
                asset: asset.to_string(),
                amount,
                source: Box::new(e),
            }
        };

        let order = self
            .builder
            .build_order(asset, amount, side)
            .await
            .map_err(wrap)?;
        info!(
            "Alpha {}: {} {} @ {} ({})",
            side, order.quantity, order.base_asset, order.price, asset
        );

        let text = self
            .gateway
            .request(
                reqwest::Method::POST,
                ALPHA_PLACE_ORDER_ENDPOINT,
                order.to_params(),
            )
            .await
            .map_err(wrap)?;

        // 交易所已受理请求，订单可能已成交，无论回执能否解析都清除余额缓存
        for cache in &self.balance_caches {
            cache.invalidate();
        }
        let response = parse_order_ack(&text).map_err(wrap)?;

        info!("Alpha {} success: {}", side, response);
        Ok(TransferReceipt { order, response })
    }
}
