use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::time::{Duration, Instant};

use crate::config::ProviderConfig;
use crate::models::StylingRequest;

// What the generate pipeline produces for one fingerprint
#[derive(Clone, Debug, PartialEq)]
pub struct CachedImage {
    pub image_data_url: String,
    pub prompt: String,
}

// Cache entry with timestamp
#[derive(Clone)]
struct CacheEntry {
    value: CachedImage,
    created_at: Instant,
}

// Create a cache fingerprint: active model + resolution + every cache-relevant
// request field in fixed order, lowercased, SHA-256 hex. Absent optionals hash
// as empty strings so presence/absence stays distinguishable from content.
pub fn fingerprint(config: &ProviderConfig, req: &StylingRequest) -> String {
    let raw = format!(
        "{}|{}|{}|{}|{}|{}|{}|{}|{}",
        config.active_model(req.venue_image_url.is_some()),
        config.resolution,
        req.mood,
        req.palette.as_deref().unwrap_or(""),
        req.layout,
        req.room.as_deref().unwrap_or(""),
        req.venue_image_url.as_deref().unwrap_or(""),
        if req.av_equipment { "av" } else { "" },
        req.uplighting_colour.as_deref().unwrap_or(""),
    );
    let mut hasher = Sha256::new();
    hasher.update(raw.to_lowercase());
    format!("{:x}", hasher.finalize())
}

// TTL cache over generated responses. Expiry is lazy: an entry past its TTL
// is evicted by the next lookup that touches it.
pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    // Values come back as clones, never as references into the map.
    // The expiry check runs inside the map lock via remove_if, so eviction
    // can never race a concurrent put and delete a fresh entry.
    pub fn get(&self, key: &str) -> Option<CachedImage> {
        self.entries
            .remove_if(key, |_, entry| entry.created_at.elapsed() > self.ttl);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // Last writer wins
    pub fn put(&self, key: String, value: CachedImage) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                created_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
