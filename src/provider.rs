use reqwest::header::AUTHORIZATION;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::error::PipelineError;

// fixed image-to-image strength for single-image models
const PROMPT_STRENGTH: f64 = 0.8;

// One submit-and-poll cycle's worth of input; not persisted anywhere
pub struct GenerationJob<'a> {
    pub prompt: &'a str,
    pub negative_prompt: Option<&'a str>,
    pub reference_image_url: Option<&'a str>,
}

// How a model family accepts a reference image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceImageShape {
    // list-valued field, no strength parameter
    ImageList,
    // single-image field plus a fixed prompt_strength
    SingleWithStrength,
}

// Capability table entry, keyed by model family
#[derive(Debug, Clone, Copy)]
pub struct ModelCaps {
    pub supports_negative_prompt: bool,
    pub supports_resolution_toggle: bool,
    pub reference_image: ReferenceImageShape,
}

pub fn model_caps(model: &str) -> ModelCaps {
    if model.contains("flux-schnell") {
        ModelCaps {
            supports_negative_prompt: false,
            supports_resolution_toggle: true,
            reference_image: ReferenceImageShape::ImageList,
        }
    } else if model.contains("sdxl") {
        ModelCaps {
            supports_negative_prompt: true,
            supports_resolution_toggle: false,
            reference_image: ReferenceImageShape::SingleWithStrength,
        }
    } else {
        ModelCaps {
            supports_negative_prompt: false,
            supports_resolution_toggle: false,
            reference_image: ReferenceImageShape::SingleWithStrength,
        }
    }
}

// Exactly two accepted values; anything else defaults to the higher one
fn normalize_resolution(raw: &str) -> &'static str {
    match raw {
        "0.25" => "0.25",
        _ => "1",
    }
}

fn build_payload(job: &GenerationJob<'_>, caps: &ModelCaps, resolution: &str) -> Value {
    let mut input = serde_json::Map::new();
    input.insert("prompt".to_string(), json!(job.prompt));
    if caps.supports_negative_prompt {
        if let Some(negative) = job.negative_prompt {
            input.insert("negative_prompt".to_string(), json!(negative));
        }
    }
    if caps.supports_resolution_toggle {
        input.insert("megapixels".to_string(), json!(normalize_resolution(resolution)));
    }
    if let Some(url) = job.reference_image_url {
        match caps.reference_image {
            ReferenceImageShape::ImageList => {
                input.insert("image_input".to_string(), json!([url]));
            }
            ReferenceImageShape::SingleWithStrength => {
                input.insert("image".to_string(), json!(url));
                input.insert("prompt_strength".to_string(), json!(PROMPT_STRENGTH));
            }
        }
    }
    json!({ "input": input })
}

// Submit a generation job and poll it to a terminal state, returning the
// output asset URL. Every non-recoverable condition maps onto the error
// taxonomy; nothing here retries beyond the fixed-cadence poll itself.
pub async fn generate(
    client: &reqwest::Client,
    config: &ProviderConfig,
    job: GenerationJob<'_>,
) -> Result<String, PipelineError> {
    if config.api_token.is_empty() {
        return Err(PipelineError::Configuration(
            "REPLICATE_API_TOKEN not configured".to_string(),
        ));
    }
    let model = config.active_model(job.reference_image_url.is_some());
    let Some((owner, name)) = model.split_once('/') else {
        return Err(PipelineError::Configuration(format!(
            "model must be 'owner/name', got '{model}'"
        )));
    };
    let caps = model_caps(model);
    let payload = build_payload(&job, &caps, &config.resolution);
    let auth = format!("Token {}", config.api_token);

    let create_url = format!("{}/models/{}/{}/predictions", config.api_base, owner, name);
    debug!(model, "submitting generation job");
    let response = client
        .post(&create_url)
        .header(AUTHORIZATION, &auth)
        .json(&payload)
        .send()
        .await
        .map_err(|e| PipelineError::Provider(format!("job submission failed: {e}")))?;
    if !response.status().is_success() {
        return Err(PipelineError::Provider(format!(
            "job submission returned {}",
            response.status()
        )));
    }
    let created: Value = response
        .json()
        .await
        .map_err(|e| PipelineError::Provider(format!("malformed submission response: {e}")))?;
    let poll_url = created
        .pointer("/urls/get")
        .and_then(Value::as_str)
        .ok_or_else(|| PipelineError::Provider("response missing poll URL".to_string()))?
        .to_string();

    for attempt in 0..config.poll_max_attempts {
        let response = client
            .get(&poll_url)
            .header(AUTHORIZATION, &auth)
            .send()
            .await
            .map_err(|e| PipelineError::Provider(format!("poll request failed: {e}")))?;
        if !response.status().is_success() {
            return Err(PipelineError::Provider(format!(
                "poll returned {}",
                response.status()
            )));
        }
        let data: Value = response
            .json()
            .await
            .map_err(|e| PipelineError::Provider(format!("malformed poll response: {e}")))?;

        match data.get("status").and_then(Value::as_str) {
            Some("succeeded") => {
                debug!(model, attempt, "generation succeeded");
                return extract_output(&data);
            }
            Some("failed") | Some("canceled") => {
                let detail = data
                    .get("error")
                    .and_then(Value::as_str)
                    .unwrap_or("generation failed")
                    .to_string();
                warn!(model, "provider reported failure: {detail}");
                return Err(PipelineError::Provider(detail));
            }
            _ => {}
        }
        tokio::time::sleep(config.poll_interval).await;
    }

    warn!(model, "poll budget exhausted");
    Err(PipelineError::Timeout)
}

// Output is either a single URL string or a non-empty list of them; anything
// else is a malformed provider response
fn extract_output(data: &Value) -> Result<String, PipelineError> {
    match data.get("output") {
        Some(Value::String(url)) => Ok(url.clone()),
        Some(Value::Array(items)) => items
            .first()
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| PipelineError::Provider("unexpected output shape".to_string())),
        _ => Err(PipelineError::Provider("unexpected output shape".to_string())),
    }
}
