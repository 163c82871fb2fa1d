use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use moodboard_gateway::cache::ResponseCache;
use moodboard_gateway::config::{Args, ProviderConfig};
use moodboard_gateway::rate_limit::ThrottleGuard;
use moodboard_gateway::router;
use moodboard_gateway::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    // parse cli arguments (env-backed)
    let args = Args::parse();
    let provider = ProviderConfig::from_args(&args);

    // creating shared state
    let state = Arc::new(AppState {
        client: reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to build HTTP client"),
        provider,
        cache: ResponseCache::new(Duration::from_secs(args.cache_ttl)),
        throttle: ThrottleGuard::new(Duration::from_secs_f64(args.rate_limit_seconds)),
    });

    let app = router(state, &args.allowed_origin);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind listener");

    info!("gateway running on http://localhost:{}", args.port);
    info!("model: {} (tier {})", args.model, args.model_tier);
    info!("cache TTL: {} seconds", args.cache_ttl);
    info!("throttle: one request per {} seconds per client", args.rate_limit_seconds);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("server error");
}
