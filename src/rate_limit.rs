use axum::http::HeaderMap;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

// Per-client throttle: one accepted request per client per min_interval,
// with no burst accumulation. Rejections do not move the timestamp, so an
// accepted request resets the clock regardless of how many rejections
// preceded it.
pub struct ThrottleGuard {
    last_accepted: DashMap<String, Instant>,
    min_interval: Duration,
}

impl ThrottleGuard {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_accepted: DashMap::new(),
            min_interval,
        }
    }

    // The entry guard holds the shard lock across the check-then-set
    pub fn admit(&self, client_key: &str) -> bool {
        let now = Instant::now();
        match self.last_accepted.entry(client_key.to_string()) {
            Entry::Occupied(mut entry) => {
                if now.duration_since(*entry.get()) < self.min_interval {
                    false
                } else {
                    entry.insert(now);
                    true
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
                true
            }
        }
    }
}

// First comma-separated token of x-forwarded-for, else the peer address,
// else a fixed sentinel. A malformed header degrades rather than failing
// the request.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn first_request_from_unseen_client_is_allowed() {
        let guard = ThrottleGuard::new(Duration::from_millis(100));
        assert!(guard.admit("1.2.3.4"));
    }

    #[test]
    fn second_request_within_interval_is_rejected() {
        let guard = ThrottleGuard::new(Duration::from_millis(100));
        assert!(guard.admit("1.2.3.4"));
        assert!(!guard.admit("1.2.3.4"));
    }

    #[test]
    fn rejection_does_not_reset_the_clock() {
        let guard = ThrottleGuard::new(Duration::from_millis(150));
        assert!(guard.admit("1.2.3.4"));
        std::thread::sleep(Duration::from_millis(50));
        // still inside the interval since the accepted request
        assert!(!guard.admit("1.2.3.4"));
        std::thread::sleep(Duration::from_millis(150));
        // past the interval measured from the accepted request, not the rejection
        assert!(guard.admit("1.2.3.4"));
    }

    #[test]
    fn clients_are_throttled_independently() {
        let guard = ThrottleGuard::new(Duration::from_millis(100));
        assert!(guard.admit("1.2.3.4"));
        assert!(guard.admit("5.6.7.8"));
    }

    #[test]
    fn forwarded_for_takes_first_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        assert_eq!(client_key(&headers, None), "203.0.113.9");
    }

    #[test]
    fn falls_back_to_peer_then_sentinel() {
        let headers = HeaderMap::new();
        let peer: SocketAddr = "192.0.2.7:51000".parse().unwrap();
        assert_eq!(client_key(&headers, Some(peer)), "192.0.2.7");
        assert_eq!(client_key(&headers, None), "unknown");
    }

    #[test]
    fn malformed_header_degrades_to_peer() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(" ,10.0.0.1"));
        let peer: SocketAddr = "192.0.2.7:51000".parse().unwrap();
        assert_eq!(client_key(&headers, Some(peer)), "192.0.2.7");
    }
}
