use exchange::binance::errors::BinanceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Connector error: {message}")]
    ConnectorError { message: String },

    #[error(transparent)]
    Exchange(#[from] BinanceError),
}

pub type Result<T> = std::result::Result<T, PlatformError>;
