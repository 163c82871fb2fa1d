use axum::Json;
use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::cache::{CachedImage, fingerprint};
use crate::error::ApiError;
use crate::fetch;
use crate::metrics::{
    CACHE_HITS, CACHE_MISSES, CACHE_SIZE, REQUEST_LATENCY, REQUEST_TOTAL, THROTTLE_REJECTIONS,
};
use crate::models::{GenerateResponse, StylingRequest};
use crate::prompt;
use crate::provider::{self, GenerationJob};
use crate::rate_limit::client_key;
use crate::state::AppState;

// post handler; latency is observed once per request whatever the outcome
pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<StylingRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    REQUEST_TOTAL.inc();
    let started = Instant::now();
    let result = run_pipeline(&state, peer, &headers, payload).await;
    REQUEST_LATENCY.observe(started.elapsed().as_secs_f64());
    result
}

// throttle -> cache lookup -> compose -> generate -> materialize -> store.
// Failures past the cache lookup leave the cache untouched; there is no
// negative caching.
async fn run_pipeline(
    state: &AppState,
    peer: SocketAddr,
    headers: &HeaderMap,
    payload: StylingRequest,
) -> Result<Json<GenerateResponse>, ApiError> {
    payload.validate().map_err(ApiError::Invalid)?;

    let client = client_key(headers, Some(peer));
    if !state.throttle.admit(&client) {
        THROTTLE_REJECTIONS.inc();
        return Err(ApiError::Throttled);
    }

    let key = fingerprint(&state.provider, &payload);
    let cached = state.cache.get(&key);
    // the lookup may have lazily evicted an expired entry
    CACHE_SIZE.set(state.cache.len() as f64);
    if let Some(cached) = cached {
        CACHE_HITS.inc();
        info!(%client, "cache hit");
        return Ok(Json(GenerateResponse {
            image_data_url: cached.image_data_url,
            prompt: cached.prompt,
            cache_hit: true,
        }));
    }
    CACHE_MISSES.inc();
    info!(%client, "cache miss, generating");

    let prompt_text = prompt::compose_prompt(&payload);
    let has_reference = payload.venue_image_url.is_some();
    let model = state.provider.active_model(has_reference);
    let negative = if has_reference && provider::model_caps(model).supports_negative_prompt {
        Some(prompt::compose_negative_prompt(&payload.layout))
    } else {
        None
    };

    let job = GenerationJob {
        prompt: &prompt_text,
        negative_prompt: negative.as_deref(),
        reference_image_url: payload.venue_image_url.as_deref(),
    };
    let asset_url = provider::generate(&state.client, &state.provider, job)
        .await
        .inspect_err(|e| warn!(%client, "generation failed: {e}"))?;
    let image_data_url = fetch::materialize(&state.client, &asset_url)
        .await
        .inspect_err(|e| warn!(%client, "materialization failed: {e}"))?;

    state.cache.put(
        key,
        CachedImage {
            image_data_url: image_data_url.clone(),
            prompt: prompt_text.clone(),
        },
    );
    CACHE_SIZE.set(state.cache.len() as f64);

    Ok(Json(GenerateResponse {
        image_data_url,
        prompt: prompt_text,
        cache_hit: false,
    }))
}
