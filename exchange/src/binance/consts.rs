// 现货测试链接：https://testnet.binance.vision/
// Alpha 接口仅在主网提供

pub const SPOT_BASE_URL: &str = "https://api.binance.com";

pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

pub const SERVER_TIME_ENDPOINT: &str = "/api/v3/time";
pub const SPOT_ACCOUNT_ENDPOINT: &str = "/api/v3/account";

pub const ALPHA_EXCHANGE_INFO_ENDPOINT: &str = "/sapi/v1/alpha-trade/get-exchange-info";
pub const ALPHA_TICKER_PRICE_ENDPOINT: &str = "/sapi/v1/alpha-trade/market/ticker-price";
pub const ALPHA_PLACE_ORDER_ENDPOINT: &str = "/sapi/v1/alpha-trade/order/place";
pub const ALPHA_ASSET_ENDPOINT: &str = "/sapi/v1/asset/get-alpha-asset";

pub const RECV_WINDOW_MILLIS: u64 = 5000;

pub const DEFAULT_API_TIMEOUT_MILLI_SECS: u64 = 30000;
