use clap::Parser;
use std::time::Duration;

// CLI argument structure; every flag is also settable through the
// environment so a .env-style deployment keeps working
#[derive(Parser, Debug, Clone)]
#[command(name = "moodboard-gateway")]
#[command(about = "Event styling moodboard generation API")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    // Replicate API token
    #[arg(long, env = "REPLICATE_API_TOKEN", default_value = "", hide_env_values = true)]
    pub api_token: String,

    // Provider API base URL
    #[arg(long, env = "REPLICATE_API_BASE", default_value = "https://api.replicate.com/v1")]
    pub api_base: String,

    // Default model (owner/name)
    #[arg(long, env = "REPLICATE_MODEL", default_value = "black-forest-labs/flux-schnell")]
    pub model: String,

    // Fast model variant
    #[arg(long, env = "REPLICATE_MODEL_FAST", default_value = "black-forest-labs/flux-schnell")]
    pub model_fast: String,

    // Quality model variant (must accept a reference image)
    #[arg(long, env = "REPLICATE_MODEL_QUALITY", default_value = "stability-ai/sdxl")]
    pub model_quality: String,

    // Which model variant to prefer: default, fast or quality
    #[arg(long, env = "MODEL_TIER", default_value = "default")]
    pub model_tier: String,

    // Resolution preference, passed to models with a resolution toggle
    #[arg(long, env = "RESOLUTION", default_value = "1")]
    pub resolution: String,

    // Cache TTL in seconds
    #[arg(long, env = "CACHE_TTL_SECONDS", default_value_t = 86400)]
    pub cache_ttl: u64,

    // Minimum seconds between accepted requests per client
    #[arg(long, env = "RATE_LIMIT_SECONDS", default_value_t = 2.5)]
    pub rate_limit_seconds: f64,

    // Allowed CORS origin ("*" for any)
    #[arg(long, env = "ALLOWED_ORIGIN", default_value = "*")]
    pub allowed_origin: String,

    // Provider poll cadence in milliseconds
    #[arg(long, env = "POLL_INTERVAL_MS", default_value_t = 750)]
    pub poll_interval_ms: u64,

    // Provider poll attempt ceiling
    #[arg(long, env = "POLL_MAX_ATTEMPTS", default_value_t = 240)]
    pub poll_max_attempts: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    Default,
    Fast,
    Quality,
}

impl ModelTier {
    // unrecognized values fall back to the default tier
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "fast" => ModelTier::Fast,
            "quality" => ModelTier::Quality,
            _ => ModelTier::Default,
        }
    }
}

// Immutable provider configuration snapshot, fixed for the process lifetime
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_token: String,
    pub api_base: String,
    pub model: String,
    pub model_fast: String,
    pub model_quality: String,
    pub model_tier: ModelTier,
    pub resolution: String,
    pub poll_interval: Duration,
    pub poll_max_attempts: u32,
}

impl ProviderConfig {
    pub fn from_args(args: &Args) -> Self {
        Self {
            api_token: args.api_token.clone(),
            api_base: args.api_base.trim_end_matches('/').to_string(),
            model: args.model.clone(),
            model_fast: args.model_fast.clone(),
            model_quality: args.model_quality.clone(),
            model_tier: ModelTier::parse(&args.model_tier),
            resolution: args.resolution.clone(),
            poll_interval: Duration::from_millis(args.poll_interval_ms),
            poll_max_attempts: args.poll_max_attempts,
        }
    }

    // A reference image forces the quality model (the img2img-capable one);
    // otherwise the configured tier decides.
    pub fn active_model(&self, has_reference_image: bool) -> &str {
        if has_reference_image {
            return &self.model_quality;
        }
        match self.model_tier {
            ModelTier::Default => &self.model,
            ModelTier::Fast => &self.model_fast,
            ModelTier::Quality => &self.model_quality,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(tier: ModelTier) -> ProviderConfig {
        ProviderConfig {
            api_token: "tok".into(),
            api_base: "https://api.replicate.com/v1".into(),
            model: "black-forest-labs/flux-schnell".into(),
            model_fast: "black-forest-labs/flux-schnell".into(),
            model_quality: "stability-ai/sdxl".into(),
            model_tier: tier,
            resolution: "1".into(),
            poll_interval: Duration::from_millis(750),
            poll_max_attempts: 240,
        }
    }

    #[test]
    fn tier_parse_falls_back_to_default() {
        assert_eq!(ModelTier::parse("quality"), ModelTier::Quality);
        assert_eq!(ModelTier::parse("FAST"), ModelTier::Fast);
        assert_eq!(ModelTier::parse("turbo"), ModelTier::Default);
    }

    #[test]
    fn reference_image_forces_quality_model() {
        let cfg = config(ModelTier::Fast);
        assert_eq!(cfg.active_model(true), "stability-ai/sdxl");
        assert_eq!(cfg.active_model(false), "black-forest-labs/flux-schnell");
    }
}
