use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, Histogram, register_counter, register_gauge, register_histogram};

lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("moodboard_requests_total", "Total number of requests").unwrap();
    pub static ref CACHE_HITS: Counter =
        register_counter!("moodboard_cache_hits_total", "Total cache hits").unwrap();
    pub static ref CACHE_MISSES: Counter =
        register_counter!("moodboard_cache_misses_total", "Total cache misses").unwrap();
    pub static ref THROTTLE_REJECTIONS: Counter =
        register_counter!("moodboard_throttle_rejections_total", "Total throttled requests")
            .unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "moodboard_request_latency_seconds",
        "Request latency in seconds"
    )
    .unwrap();
    pub static ref CACHE_SIZE: Gauge =
        register_gauge!("moodboard_cache_size", "Current number of items in cache").unwrap();
}
