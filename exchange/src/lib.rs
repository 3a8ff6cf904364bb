pub mod binance;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
