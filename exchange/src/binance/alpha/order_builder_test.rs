use super::{
    catalog::InstrumentCatalogCache, models::Side, order_builder::LiquidityOrderBuilder,
    price::PriceOracle,
};
use crate::binance::{consts::*, errors::BinanceError};
use crate::testkit::{MockGateway, alpha_symbol, exchange_info, ticker_price};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use time::TimeSync;

fn setup(mock: &Arc<MockGateway>, time_sync: Arc<TimeSync>) -> LiquidityOrderBuilder {
    let catalog = Arc::new(InstrumentCatalogCache::new(mock.clone(), time_sync.clone()));
    let oracle = Arc::new(PriceOracle::new(mock.clone(), time_sync.clone()));
    LiquidityOrderBuilder::new(catalog, oracle, time_sync)
}

fn usdt_instrument(price_precision: u32, quantity_precision: u32) -> String {
    exchange_info(vec![alpha_symbol(
        "ALPHA_1USDT",
        "ALPHA_1",
        "USDT",
        "TRADING",
        price_precision,
        quantity_precision,
    )])
}

#[tokio::test]
async fn test_build_buy_order() {
    let mock = Arc::new(MockGateway::new());
    mock.on(ALPHA_EXCHANGE_INFO_ENDPOINT, usdt_instrument(2, 4))
        .on(ALPHA_TICKER_PRICE_ENDPOINT, ticker_price("2.5"));
    let builder = setup(&mock, Arc::new(TimeSync::new()));

    let order = builder.build_order("USDT", dec!(100), Side::Buy).await.unwrap();
    assert_eq!(order.base_asset, "ALPHA_1");
    assert_eq!(order.quote_asset, "USDT");
    assert_eq!(order.side, Side::Buy);
    assert_eq!(order.quantity, "40.0000");
    assert_eq!(order.price, "2.50");
    assert_eq!(order.recv_window, 5000);
}

#[tokio::test]
async fn test_build_order_rounds_quantity() {
    let mock = Arc::new(MockGateway::new());
    mock.on(ALPHA_EXCHANGE_INFO_ENDPOINT, usdt_instrument(4, 3))
        .on(ALPHA_TICKER_PRICE_ENDPOINT, ticker_price("0.5000"));
    let builder = setup(&mock, Arc::new(TimeSync::new()));

    let order = builder
        .build_order("USDT", dec!(1000.5), Side::Sell)
        .await
        .unwrap();
    assert_eq!(order.side, Side::Sell);
    assert_eq!(order.quantity, "2001.000");
    assert_eq!(order.price, "0.5000");

    let mock = Arc::new(MockGateway::new());
    mock.on(ALPHA_EXCHANGE_INFO_ENDPOINT, usdt_instrument(8, 8))
        .on(ALPHA_TICKER_PRICE_ENDPOINT, ticker_price("3"));
    let builder = setup(&mock, Arc::new(TimeSync::new()));
    let order = builder.build_order("USDT", dec!(100), Side::Buy).await.unwrap();
    assert_eq!(order.quantity, "33.33333333");
    assert_eq!(order.price, "3.00000000");
}

#[tokio::test]
async fn test_build_order_uses_adjusted_timestamp() {
    let mock = Arc::new(MockGateway::new());
    mock.on(ALPHA_EXCHANGE_INFO_ENDPOINT, usdt_instrument(2, 4))
        .on(ALPHA_TICKER_PRICE_ENDPOINT, ticker_price("2.5"));
    let builder = setup(&mock, Arc::new(TimeSync::with_offset(3_600_000)));

    let local = time::get_current_milli_timestamp();
    let order = builder.build_order("USDT", dec!(100), Side::Buy).await.unwrap();
    assert!(order.timestamp >= local + 3_600_000);

    let params = order.to_params();
    assert!(params.contains(&("timestamp", order.timestamp.to_string())));
    assert!(params.contains(&("side", "BUY".to_string())));
}

#[tokio::test]
async fn test_zero_price_fails_before_submission() {
    let mock = Arc::new(MockGateway::new());
    mock.on(ALPHA_EXCHANGE_INFO_ENDPOINT, usdt_instrument(2, 4))
        .on(ALPHA_TICKER_PRICE_ENDPOINT, ticker_price("0"));
    let builder = setup(&mock, Arc::new(TimeSync::new()));

    let result = builder.build_order("USDT", dec!(100), Side::Buy).await;
    assert!(matches!(
        result,
        Err(BinanceError::InvalidPrice { price, .. }) if price == Decimal::ZERO
    ));
    assert_eq!(mock.request_count(ALPHA_PLACE_ORDER_ENDPOINT), 0);
}

#[tokio::test]
async fn test_unknown_quote_asset_skips_price_lookup() {
    let mock = Arc::new(MockGateway::new());
    mock.on(ALPHA_EXCHANGE_INFO_ENDPOINT, usdt_instrument(2, 4));
    let builder = setup(&mock, Arc::new(TimeSync::new()));

    let result = builder.build_order("FDUSD", dec!(100), Side::Buy).await;
    assert!(matches!(result, Err(BinanceError::InstrumentNotFound { .. })));
    assert_eq!(mock.request_count(ALPHA_TICKER_PRICE_ENDPOINT), 0);
}

#[tokio::test]
async fn test_non_positive_amount_rejected_without_requests() {
    let mock = Arc::new(MockGateway::new());
    let builder = setup(&mock, Arc::new(TimeSync::new()));

    for amount in [Decimal::ZERO, dec!(-10)] {
        let result = builder.build_order("USDT", amount, Side::Buy).await;
        assert!(matches!(result, Err(BinanceError::ParametersInvalid { .. })));
    }
    assert!(mock.requests().is_empty());
}
