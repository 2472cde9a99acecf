use std::path::Path;
use std::time::Duration;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::application::errors::AppError;
use crate::domain::stylize::{CANVAS_HEIGHT, CANVAS_WIDTH};

pub const REPLICATE_URL: &str = "https://api.replicate.com/v1";
pub const DEFAULT_MODEL: &str = "black-forest-labs/flux-1.1-pro";

const USER_AGENT: &str = "Brandbooth/1.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const STYLE_PROMPT: &str = "Convert the uploaded webcam photo into our brand's \
illustration style. Use thin black outline, pure white skin, grayscale \
clothing. Maintain pose and recognizable facial structure. Output PNG with \
transparent background outside the character only.";

/// Send the uploaded photo through the generative provider and return the URL
/// of the stylized result.
///
/// One attempt, waited on synchronously; any transport error, non-success
/// status, unusable body, or non-succeeded prediction aborts the request.
pub async fn generate(
    client: &reqwest::Client,
    base_url: &str,
    api_token: &str,
    model: &str,
    photo_path: &Path,
) -> Result<String, AppError> {
    let photo = tokio::fs::read(photo_path).await?;

    let request = PredictionRequest {
        version: model.to_string(),
        input: PredictionInput {
            prompt: STYLE_PROMPT.to_string(),
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            image: photo_data_url(&photo),
        },
    };

    let response = client
        .post(format!("{base_url}/predictions"))
        .header("User-Agent", USER_AGENT)
        .header("Authorization", format!("Token {api_token}"))
        .header("Prefer", "wait")
        .timeout(REQUEST_TIMEOUT)
        .json(&request)
        .send()
        .await
        .map_err(|e| AppError::provider(format!("provider request failed: {e}")))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "(unreadable body)".to_string());
        return Err(AppError::provider(format!(
            "provider returned status {status}: {body}"
        )));
    }

    let prediction: PredictionResponse = response
        .json()
        .await
        .map_err(|e| AppError::provider(format!("failed to parse provider response: {e}")))?;

    if prediction.status != "succeeded" {
        let detail = prediction
            .error
            .unwrap_or_else(|| format!("prediction ended in status {}", prediction.status));
        return Err(AppError::provider(detail));
    }

    prediction
        .output
        .and_then(PredictionOutput::into_first)
        .ok_or_else(|| AppError::provider("provider returned no output image"))
}

/// Encode the photo as a data URL, the input form the prediction API accepts
/// for inline files.
fn photo_data_url(bytes: &[u8]) -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{b64}", sniff_mime(bytes))
}

fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        "image/png"
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else {
        "application/octet-stream"
    }
}

// --- Prediction API types ---

#[derive(Debug, Serialize)]
struct PredictionRequest {
    version: String,
    input: PredictionInput,
}

#[derive(Debug, Serialize)]
struct PredictionInput {
    prompt: String,
    width: u32,
    height: u32,
    image: String,
}

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    status: String,
    #[serde(default)]
    output: Option<PredictionOutput>,
    #[serde(default)]
    error: Option<String>,
}

/// The provider returns either a single output reference or a list of them;
/// a list resolves deterministically to its first element.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PredictionOutput {
    Single(String),
    Many(Vec<String>),
}

impl PredictionOutput {
    fn into_first(self) -> Option<String> {
        match self {
            Self::Single(url) => Some(url),
            Self::Many(urls) => urls.into_iter().next(),
        }
    }
}
