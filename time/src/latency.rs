use std::time::Instant;

/// 记录一次操作的耗时，drop 时输出日志
pub struct LatencyGuard {
    process_name: String,
    start: Instant,
}

impl LatencyGuard {
    pub fn new(process_name: impl Into<String>) -> Self {
        Self {
            process_name: process_name.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for LatencyGuard {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        log::info!("{} took {} ms", self.process_name, elapsed.as_millis());
    }
}
