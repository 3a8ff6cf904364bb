use crate::{config::connector_config::ConnectorConfig, errors::{PlatformError, Result}};
use exchange::binance::{
    alpha::{
        AccountType, BalanceCache, BalanceMap, Instrument, InstrumentCatalogCache,
        LiquidityOrderBuilder, LiquidityTransferService, PriceOracle, TransferReceipt,
    },
    gateway::ExchangeGateway,
    rest_gateway::{BinanceRestGateway, BinanceRestGatewayConfig},
};
use log::{info, warn};
use rust_decimal::Decimal;
use std::{sync::Arc, time::Duration};
use time::{TimeSync, get_current_milli_timestamp};
use tokio::{sync::Mutex, task::JoinHandle, time::MissedTickBehavior};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExchangeCapability {
    SpotTrading,
    Savings,
    MarginTrading,
}

impl ExchangeCapability {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeCapability::SpotTrading => "SPOT_TRADING",
            ExchangeCapability::Savings => "SAVINGS",
            ExchangeCapability::MarginTrading => "MARGIN_TRADING",
        }
    }
}

/// 单个账户的 Binance 连接，持有时间同步、交易对缓存、余额缓存与划转服务
///
/// 多个连接之间不共享任何缓存状态。
pub struct AlphaConnector {
    config: ConnectorConfig,
    gateway: Arc<dyn ExchangeGateway>,
    time_sync: Arc<TimeSync>,
    catalog: Arc<InstrumentCatalogCache>,
    spot_balances: Arc<BalanceCache>,
    alpha_balances: Arc<BalanceCache>,
    transfer: LiquidityTransferService,
    time_sync_task: Mutex<Option<(CancellationToken, JoinHandle<()>)>>,
}

impl AlphaConnector {
    pub fn new(config: ConnectorConfig) -> Result<Self> {
        config.validate()?;
        let time_sync = Arc::new(TimeSync::new());
        let gateway = BinanceRestGateway::new(
            BinanceRestGatewayConfig {
                base_url: config.api_base_url.clone(),
                proxy_url: config.proxy_url.clone(),
                api_key: config.api_key.clone(),
                secret_key: config.secret_key.clone(),
                timeout_milli_secs: config.api_timeout_milli_secs,
                rate_limiters: config.rate_limiters(),
            },
            time_sync.clone(),
        )?;
        Ok(Self::with_gateway(config, Arc::new(gateway), time_sync))
    }

    pub fn with_gateway(
        config: ConnectorConfig,
        gateway: Arc<dyn ExchangeGateway>,
        time_sync: Arc<TimeSync>,
    ) -> Self {
        let catalog = Arc::new(InstrumentCatalogCache::new(
            gateway.clone(),
            time_sync.clone(),
        ));
        let oracle = Arc::new(PriceOracle::new(gateway.clone(), time_sync.clone()));
        let builder = Arc::new(LiquidityOrderBuilder::new(
            catalog.clone(),
            oracle,
            time_sync.clone(),
        ));
        let spot_balances = Arc::new(BalanceCache::new(
            gateway.clone(),
            AccountType::Spot,
            config.balance_cache_ttl(),
        ));
        let alpha_balances = Arc::new(BalanceCache::new(
            gateway.clone(),
            AccountType::Alpha,
            config.balance_cache_ttl(),
        ));
        let transfer = LiquidityTransferService::new(
            config.enable_alpha,
            gateway.clone(),
            builder,
            vec![spot_balances.clone(), alpha_balances.clone()],
        );

        Self {
            config,
            gateway,
            time_sync,
            catalog,
            spot_balances,
            alpha_balances,
            transfer,
            time_sync_task: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    pub fn time_sync(&self) -> Arc<TimeSync> {
        self.time_sync.clone()
    }

    /// 同步时间并预热交易对缓存，配置了同步间隔时启动后台时间同步
    pub async fn initialize(&self) -> Result<()> {
        info!("Initializing binance connector, alpha enabled: {}", self.config.enable_alpha);
        self.sync_time().await?;

        if self.config.enable_alpha {
            match self.catalog.get_catalog().await {
                Ok(catalog) => info!("Alpha instruments loaded: {}", catalog.len()),
                Err(e) => warn!("Load alpha instruments failed, retry on first transfer: {}", e),
            }
        }

        if let Some(interval) = self.config.time_sync_interval() {
            self.start_periodic_time_sync(interval).await?;
        }
        Ok(())
    }

    pub async fn close(&self) {
        self.stop_periodic_time_sync().await;
        info!("Binance connector closed");
    }

    /// 返回新的偏移量（毫秒）
    pub async fn sync_time(&self) -> Result<i64> {
        Ok(sync_time_once(self.gateway.as_ref(), &self.time_sync).await?)
    }

    /// 重复调用会替换并停止之前的后台任务
    pub async fn start_periodic_time_sync(&self, interval: Duration) -> Result<()> {
        if interval.is_zero() {
            return Err(PlatformError::ConnectorError {
                message: "time sync interval must be positive".to_string(),
            });
        }

        let shutdown_token = CancellationToken::new();
        let token = shutdown_token.clone();
        let gateway = self.gateway.clone();
        let time_sync = self.time_sync.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // 第一次 tick 立即返回
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        break;
                    }
                    _ = ticker.tick() => {
                        if let Err(e) = sync_time_once(gateway.as_ref(), &time_sync).await {
                            warn!("Periodic time sync failed: {}", e);
                        }
                    }
                }
            }
            info!("Periodic time sync stopped");
        });

        let previous = self
            .time_sync_task
            .lock()
            .await
            .replace((shutdown_token, handle));
        if let Some((token, handle)) = previous {
            token.cancel();
            let _ = handle.await;
        }
        Ok(())
    }

    pub async fn stop_periodic_time_sync(&self) {
        let task = self.time_sync_task.lock().await.take();
        if let Some((token, handle)) = task {
            token.cancel();
            if let Err(e) = handle.await {
                warn!("Time sync task join failed: {}", e);
            }
        }
    }

    pub async fn is_time_sync_running(&self) -> bool {
        self.time_sync_task
            .lock()
            .await
            .as_ref()
            .is_some_and(|(_, handle)| !handle.is_finished())
    }

    pub fn capabilities(&self) -> Vec<ExchangeCapability> {
        let mut capabilities = vec![ExchangeCapability::SpotTrading];
        if self.config.enable_alpha {
            capabilities.push(ExchangeCapability::Savings);
        }
        if self.config.enable_margin {
            capabilities.push(ExchangeCapability::MarginTrading);
        }
        capabilities
    }

    /// 现货余额，拉取失败时返回最后一次成功的数据
    pub async fn fetch_balance(&self) -> Arc<BalanceMap> {
        self.spot_balances.get_balance().await
    }

    /// 流动性钱包余额，功能关闭时直接返回空
    pub async fn fetch_funding_balance(&self) -> Arc<BalanceMap> {
        if !self.config.enable_alpha {
            return Arc::new(BalanceMap::new());
        }
        self.alpha_balances.get_balance().await
    }

    pub async fn resolve_instrument(&self, quote_asset: &str) -> Result<Instrument> {
        Ok(self.catalog.resolve_instrument(quote_asset).await?)
    }

    pub async fn move_to_liquidity(&self, asset: &str, amount: Decimal) -> Result<TransferReceipt> {
        Ok(self.transfer.move_to_liquidity(asset, amount).await?)
    }

    pub async fn move_to_spot(&self, asset: &str, amount: Decimal) -> Result<TransferReceipt> {
        Ok(self.transfer.move_to_spot(asset, amount).await?)
    }
}

// 以请求往返的中点作为本地参考时间
async fn sync_time_once(
    gateway: &dyn ExchangeGateway,
    time_sync: &TimeSync,
) -> exchange::binance::errors::Result<i64> {
    let sent_at = get_current_milli_timestamp();
    let server_millis = gateway.server_time().await?;
    let received_at = get_current_milli_timestamp().max(sent_at);
    Ok(time_sync.update_with_local(server_millis, sent_at + (received_at - sent_at) / 2))
}
