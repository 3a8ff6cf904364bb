use crate::time::get_current_milli_timestamp;
use log::info;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

/// 本地时钟与交易所服务器时钟的偏移
///
/// 偏移量 = 服务器时间 - 本地时间（毫秒）。所有带 timestamp 的签名请求
/// 都使用 `now_millis()` 生成时间戳，保证落在交易所的 recvWindow 内。
/// 偏移只在 `update` 时整体替换，读写均为单个原子量。
pub struct TimeSync {
    offset_millis: AtomicI64,
    synced: AtomicBool,
}

impl TimeSync {
    pub fn new() -> Self {
        Self {
            offset_millis: AtomicI64::new(0),
            synced: AtomicBool::new(false),
        }
    }

    pub fn with_offset(offset_millis: i64) -> Self {
        Self {
            offset_millis: AtomicI64::new(offset_millis),
            synced: AtomicBool::new(true),
        }
    }

    pub fn offset_millis(&self) -> i64 {
        self.offset_millis.load(Ordering::Acquire)
    }

    pub fn is_synced(&self) -> bool {
        self.synced.load(Ordering::Acquire)
    }

    /// 以当前本地时间为参考更新偏移
    pub fn update(&self, server_millis: u128) -> i64 {
        self.update_with_local(server_millis, get_current_milli_timestamp())
    }

    pub fn update_with_local(&self, server_millis: u128, local_millis: u128) -> i64 {
        let offset = server_millis as i64 - local_millis as i64;
        self.offset_millis.store(offset, Ordering::Release);
        self.synced.store(true, Ordering::Release);

        let server_time = chrono::DateTime::from_timestamp_millis(server_millis as i64)
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();
        info!(
            "time synced, server time: {}, offset: {} ms",
            server_time, offset
        );
        offset
    }

    /// 校正后的当前时间戳（毫秒）
    pub fn now_millis(&self) -> u128 {
        self.adjust(get_current_milli_timestamp())
    }

    pub fn adjust(&self, local_millis: u128) -> u128 {
        let adjusted = local_millis as i64 + self.offset_millis();
        adjusted.max(0) as u128
    }
}

impl Default for TimeSync {
    fn default() -> Self {
        Self::new()
    }
}
