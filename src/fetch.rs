use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::CONTENT_TYPE;

use crate::error::PipelineError;

// Download the generated asset and re-encode it as a self-contained data URL.
// Redirects are followed by the client; content type defaults to image/png
// when the provider omits it.
pub async fn materialize(client: &reqwest::Client, url: &str) -> Result<String, PipelineError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| PipelineError::Fetch(e.to_string()))?;
    if !response.status().is_success() {
        return Err(PipelineError::Fetch(format!(
            "asset fetch returned {}",
            response.status()
        )));
    }
    let mime = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("image/png")
        .to_string();
    let bytes = response
        .bytes()
        .await
        .map_err(|e| PipelineError::Fetch(e.to_string()))?;
    Ok(format!("data:{};base64,{}", mime, BASE64.encode(&bytes)))
}
