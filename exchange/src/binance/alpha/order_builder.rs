use crate::binance::{
    alpha::{
        catalog::InstrumentCatalogCache,
        models::{OrderDescriptor, Side},
        precision::format_with_precision,
        price::PriceOracle,
    },
    consts::RECV_WINDOW_MILLIS,
    errors::{BinanceError, Result},
};
use rust_decimal::Decimal;
use std::sync::Arc;
use time::TimeSync;

/// 两个划转方向共用的下单参数构建：交易对 -> 价格 -> 数量 -> 精度格式化
pub struct LiquidityOrderBuilder {
    catalog: Arc<InstrumentCatalogCache>,
    oracle: Arc<PriceOracle>,
    time_sync: Arc<TimeSync>,
}

impl LiquidityOrderBuilder {
    pub fn new(
        catalog: Arc<InstrumentCatalogCache>,
        oracle: Arc<PriceOracle>,
        time_sync: Arc<TimeSync>,
    ) -> Self {
        Self {
            catalog,
            oracle,
            time_sync,
        }
    }

    // amount 以 quote_asset 计价，数量 = amount / price，以 base_asset 计
    // 不检查最小下单量，过小的数量交由交易所拒绝
    pub async fn build_order(
        &self,
        quote_asset: &str,
        amount: Decimal,
        side: Side,
    ) -> Result<OrderDescriptor> {
        if amount <= Decimal::ZERO {
            return Err(BinanceError::ParametersInvalid {
                message: format!("transfer amount must be positive: {}", amount),
            });
        }

        let instrument = self.catalog.resolve_instrument(quote_asset).await?;
        let price = self.oracle.get_price(&instrument.symbol).await?;
        let quantity = amount
            .checked_div(price)
            .ok_or_else(|| BinanceError::ParametersInvalid {
                message: format!("quantity overflow: {} / {}", amount, price),
            })?;

        Ok(OrderDescriptor {
            base_asset: instrument.base_asset,
            quote_asset: quote_asset.to_string(),
            side,
            quantity: format_with_precision(quantity, instrument.quantity_precision),
            price: format_with_precision(price, instrument.price_precision),
            timestamp: self.time_sync.now_millis(),
            recv_window: RECV_WINDOW_MILLIS,
        })
    }
}
