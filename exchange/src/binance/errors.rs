use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BinanceError {
    #[error("Parameters invalid: {message}")]
    ParametersInvalid { message: String },

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Parse result error: {message}")]
    ParseResultError { message: String },

    #[error("Gateway rejected request: status: {status}, message: {message}")]
    GatewayError { status: u16, message: String },

    #[error("No TRADING alpha instrument quoted in {quote_asset}")]
    InstrumentNotFound { quote_asset: String },

    #[error("Invalid price {price} for alpha instrument {symbol}")]
    InvalidPrice { symbol: String, price: Decimal },

    #[error("Feature disabled: {feature}")]
    FeatureDisabled { feature: String },

    #[error("Alpha {side} transfer of {amount} {asset} failed: {source}")]
    TransferFailed {
        side: String,
        asset: String,
        amount: Decimal,
        #[source]
        source: Box<BinanceError>,
    },
}

impl BinanceError {
    /// 网络层错误可由调用方稍后重试，其余均为配置/行情/参数问题
    pub fn is_retryable(&self) -> bool {
        match self {
            BinanceError::NetworkError { .. } => true,
            BinanceError::GatewayError { status, .. } => *status >= 500,
            BinanceError::TransferFailed { source, .. } => source.is_retryable(),
            _ => false,
        }
    }

    /// 去掉 TransferFailed 包装后的原始错误
    pub fn root_cause(&self) -> &BinanceError {
        match self {
            BinanceError::TransferFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, BinanceError>;
