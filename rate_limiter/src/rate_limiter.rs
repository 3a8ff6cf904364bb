use crate::error::{RateLimiterError, Result};
use log::debug;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

struct Window {
    // (请求时间, 权重)，按时间递增
    entries: VecDeque<(Instant, u64)>,
    used_weight: u64,
}

impl Window {
    fn evict_before(&mut self, cutoff: Instant) {
        while let Some(&(ts, weight)) = self.entries.front() {
            if ts > cutoff {
                break;
            }
            self.entries.pop_front();
            self.used_weight -= weight;
        }
    }
}

/// 滑动窗口权重限流，对应交易所 REST 接口的 request weight 限制
pub struct RateLimiter {
    window: Duration,
    max_weight: u64,
    inner: Mutex<Window>,
}

impl RateLimiter {
    // window: 窗口长度
    // max_weight: 窗口内允许的最大权重和
    pub fn new(window: Duration, max_weight: u64) -> Self {
        Self {
            window,
            max_weight,
            inner: Mutex::new(Window {
                entries: VecDeque::new(),
                used_weight: 0,
            }),
        }
    }

    pub fn max_weight(&self) -> u64 {
        self.max_weight
    }

    pub async fn used_weight(&self) -> u64 {
        let mut inner = self.inner.lock().await;
        if let Some(cutoff) = Instant::now().checked_sub(self.window) {
            inner.evict_before(cutoff);
        }
        inner.used_weight
    }

    /// 立即尝试占用权重，超限返回 Limited
    pub async fn allow(&self, weight: u64) -> Result<()> {
        self.check_weight(weight)?;
        match self.try_acquire(weight).await {
            None => Ok(()),
            Some(wait) => Err(RateLimiterError::Limited {
                retry_after_millis: wait.as_millis() as u64,
            }),
        }
    }

    /// 等待直到权重可用
    pub async fn wait(&self, weight: u64) -> Result<()> {
        self.check_weight(weight)?;
        while let Some(wait) = self.try_acquire(weight).await {
            debug!("rate limiter sleeping for {:?}", wait);
            tokio::time::sleep(wait).await;
        }
        Ok(())
    }

    fn check_weight(&self, weight: u64) -> Result<()> {
        if weight == 0 {
            return Err(RateLimiterError::zero_weight());
        }
        if weight > self.max_weight {
            return Err(RateLimiterError::weight_exceeded(weight, self.max_weight));
        }
        Ok(())
    }

    // 成功返回 None，否则返回需要等待的时长
    async fn try_acquire(&self, weight: u64) -> Option<Duration> {
        let mut inner = self.inner.lock().await;
        let now = Instant::now();
        if let Some(cutoff) = now.checked_sub(self.window) {
            inner.evict_before(cutoff);
        }

        if inner.used_weight + weight <= self.max_weight {
            inner.entries.push_back((now, weight));
            inner.used_weight += weight;
            return None;
        }

        // 释放足够权重所需的最早时间点
        let mut released = 0;
        for &(ts, w) in inner.entries.iter() {
            released += w;
            if inner.used_weight - released + weight <= self.max_weight {
                let wait = (ts + self.window).saturating_duration_since(now);
                return Some(wait.max(Duration::from_millis(1)));
            }
        }
        Some(self.window)
    }
}
