use crate::binance::{
    alpha::models::{AccountType, BalanceMap, CacheEntry},
    gateway::ExchangeGateway,
};
use arc_swap::ArcSwap;
use log::{debug, error};
use rust_decimal::Decimal;
use std::{sync::Arc, time::Duration};

pub const DEFAULT_BALANCE_TTL: Duration = Duration::from_secs(30);

/// 钱包余额缓存
///
/// 与交易对缓存不同，拉取失败时返回最后一次成功的数据而不是错误
pub struct BalanceCache {
    gateway: Arc<dyn ExchangeGateway>,
    account_type: AccountType,
    ttl: Duration,
    entry: ArcSwap<CacheEntry<Arc<BalanceMap>>>,
}

impl BalanceCache {
    pub fn new(
        gateway: Arc<dyn ExchangeGateway>,
        account_type: AccountType,
        ttl: Duration,
    ) -> Self {
        Self {
            gateway,
            account_type,
            ttl,
            entry: ArcSwap::from_pointee(CacheEntry::expired(Arc::new(BalanceMap::new()))),
        }
    }

    pub fn is_fresh(&self) -> bool {
        self.entry.load().is_fresh(self.ttl)
    }

    /// 当前缓存值，不触发请求
    pub fn peek(&self) -> Arc<BalanceMap> {
        self.entry.load().value.clone()
    }

    pub async fn get_balance(&self) -> Arc<BalanceMap> {
        let current = self.entry.load_full();
        if current.is_fresh(self.ttl) {
            return current.value.clone();
        }

        match self.gateway.fetch_balance(self.account_type).await {
            Ok(balances) => {
                debug!("{} balances: {:?}", self.account_type.as_str(), balances);
                let balances = Arc::new(balances);
                let fetched = Arc::new(CacheEntry::new(balances.clone()));
                // 请求期间缓存被 invalidate 时不覆盖，保证下一次读取重新拉取
                let previous = self.entry.compare_and_swap(&current, fetched);
                if !Arc::ptr_eq(&*previous, &current) {
                    debug!(
                        "{} balance cache changed during fetch, result not cached",
                        self.account_type.as_str()
                    );
                }
                balances
            }
            Err(e) => {
                error!(
                    "Fetch {} balances failed: {}, serving last known value",
                    self.account_type.as_str(),
                    e
                );
                current.value.clone()
            }
        }
    }

    pub fn invalidate(&self) {
        self.entry
            .store(Arc::new(CacheEntry::expired(Arc::new(BalanceMap::new()))));
    }
}

/// 资产种类变化，或任一资产相对变化超过 threshold（如 0.01 = 1%）
pub fn balances_changed_significantly(
    old: &BalanceMap,
    new: &BalanceMap,
    threshold: Decimal,
) -> bool {
    if old.len() != new.len() || old.keys().any(|k| !new.contains_key(k)) {
        return true;
    }

    old.iter().any(|(asset, old_amount)| {
        let new_amount = new.get(asset).copied().unwrap_or_default();
        if old_amount.is_zero() {
            return !new_amount.is_zero();
        }
        ((new_amount - old_amount) / old_amount).abs() > threshold
    })
}
