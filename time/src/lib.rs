pub mod latency;
pub mod time;
pub mod time_sync;
pub use latency::LatencyGuard;
pub use time::get_current_milli_timestamp;
pub use time_sync::TimeSync;
