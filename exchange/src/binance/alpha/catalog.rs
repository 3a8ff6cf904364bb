use crate::binance::{
    alpha::{
        models::{CacheEntry, Instrument, InstrumentCatalog},
        parser::parse_exchange_info,
    },
    consts::{ALPHA_EXCHANGE_INFO_ENDPOINT, RECV_WINDOW_MILLIS},
    errors::{BinanceError, Result},
    gateway::ExchangeGateway,
    utils::push_timestamp,
};
use arc_swap::ArcSwapOption;
use log::{debug, info};
use std::{sync::Arc, time::Duration};
use time::TimeSync;
use tokio::sync::Mutex;

pub const CATALOG_TTL: Duration = Duration::from_secs(30);

/// Alpha 交易对列表缓存
///
/// 过期后重新拉取完整列表并整体替换；拉取失败直接返回错误，不回退到旧数据。
/// 并发刷新由 `refresh_lock` 合并为一次请求。
pub struct InstrumentCatalogCache {
    gateway: Arc<dyn ExchangeGateway>,
    time_sync: Arc<TimeSync>,
    ttl: Duration,
    entry: ArcSwapOption<CacheEntry<Arc<InstrumentCatalog>>>,
    refresh_lock: Mutex<()>,
}

impl InstrumentCatalogCache {
    pub fn new(gateway: Arc<dyn ExchangeGateway>, time_sync: Arc<TimeSync>) -> Self {
        Self::with_ttl(gateway, time_sync, CATALOG_TTL)
    }

    pub fn with_ttl(
        gateway: Arc<dyn ExchangeGateway>,
        time_sync: Arc<TimeSync>,
        ttl: Duration,
    ) -> Self {
        Self {
            gateway,
            time_sync,
            ttl,
            entry: ArcSwapOption::empty(),
            refresh_lock: Mutex::new(()),
        }
    }

    pub async fn get_catalog(&self) -> Result<Arc<InstrumentCatalog>> {
        if let Some(catalog) = self.fresh() {
            return Ok(catalog);
        }

        let _guard = self.refresh_lock.lock().await;
        // 等锁期间可能已被其他任务刷新
        if let Some(catalog) = self.fresh() {
            return Ok(catalog);
        }

        let mut params = Vec::new();
        push_timestamp(&mut params, self.time_sync.now_millis(), RECV_WINDOW_MILLIS);
        let text = self
            .gateway
            .request(reqwest::Method::GET, ALPHA_EXCHANGE_INFO_ENDPOINT, params)
            .await?;
        let catalog = Arc::new(parse_exchange_info(&text)?);

        info!("Alpha exchange info refreshed: {} symbols", catalog.len());
        self.entry
            .store(Some(Arc::new(CacheEntry::new(catalog.clone()))));
        Ok(catalog)
    }

    pub async fn resolve_instrument(&self, quote_asset: &str) -> Result<Instrument> {
        let catalog = self.get_catalog().await?;
        let instrument = catalog.resolve(quote_asset).cloned().ok_or_else(|| {
            BinanceError::InstrumentNotFound {
                quote_asset: quote_asset.to_string(),
            }
        })?;
        debug!(
            "Resolved alpha instrument {} for quote asset {}",
            instrument.symbol, quote_asset
        );
        Ok(instrument)
    }

    pub fn invalidate(&self) {
        self.entry.store(None);
    }

    fn fresh(&self) -> Option<Arc<InstrumentCatalog>> {
        let entry = self.entry.load_full()?;
        entry.is_fresh(self.ttl).then(|| entry.value.clone())
    }
}
