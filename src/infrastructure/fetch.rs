use std::path::Path;
use std::time::Duration;

use crate::application::errors::AppError;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Download the generated image from the provider's delivery URL and persist
/// it to `dest`.
pub async fn download_to(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
) -> Result<(), AppError> {
    let response = client
        .get(url)
        .timeout(DOWNLOAD_TIMEOUT)
        .send()
        .await
        .map_err(|e| AppError::fetch(format!("failed to download generated image: {e}")))?;

    if !response.status().is_success() {
        return Err(AppError::fetch(format!(
            "generated image download returned status {}",
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::fetch(format!("failed to read generated image bytes: {e}")))?;

    if bytes.is_empty() {
        return Err(AppError::fetch("generated image download returned an empty body"));
    }

    tokio::fs::write(dest, &bytes).await?;
    Ok(())
}
