use std::time::{SystemTime, UNIX_EPOCH};

// 系统时钟早于 UNIX_EPOCH 时返回 0
pub fn get_current_milli_timestamp() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
