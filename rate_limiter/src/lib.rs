//! 按请求权重计数的滑动窗口限流
pub mod error;
pub mod rate_limiter;
pub use error::{RateLimiterError, Result};
pub use rate_limiter::RateLimiter;

#[cfg(test)]
mod rate_limiter_test;
