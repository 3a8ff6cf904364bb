use thiserror::Error;

#[derive(Error, Debug)]
pub enum RateLimiterError {
    #[error("invalid weight: {message}")]
    InvalidWeight { message: String },

    #[error("reach rate limit, retry after {retry_after_millis} ms")]
    Limited { retry_after_millis: u64 },
}

impl RateLimiterError {
    pub fn zero_weight() -> Self {
        RateLimiterError::InvalidWeight {
            message: "weight must be greater than 0".to_string(),
        }
    }

    pub fn weight_exceeded(weight: u64, max: u64) -> Self {
        RateLimiterError::InvalidWeight {
            message: format!("weight {} exceeds window limit {}", weight, max),
        }
    }
}

pub type Result<T> = std::result::Result<T, RateLimiterError>;
