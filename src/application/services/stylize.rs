//! The request pipeline: store the upload, gate on style references, invoke
//! the provider, fetch the result, composite onto the background. The stages
//! run strictly in order within the request's task; the first failure aborts
//! the rest.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::application::errors::AppError;
use crate::application::state::AppState;
use crate::domain::stylize::{
    BACKGROUND_ASSET, CANVAS_HEIGHT, CANVAS_WIDTH, final_filename, raw_filename,
};
use crate::infrastructure::{compositor, fetch, provider, style_refs};

/// Temp files belonging to one in-flight request. At most one upload and one
/// raw result exist at a time; [`RequestScratch::cleanup`] removes whatever
/// was created, on success and on every failure path.
pub(crate) struct RequestScratch {
    upload: PathBuf,
    raw: Option<PathBuf>,
}

impl RequestScratch {
    pub fn new(upload: PathBuf) -> Self {
        Self { upload, raw: None }
    }

    /// Best-effort removal of every temp file this request created. Deletion
    /// failures never surface to the caller.
    pub async fn cleanup(&self) {
        remove_quietly(&self.upload).await;
        if let Some(raw) = &self.raw {
            remove_quietly(raw).await;
        }
    }
}

async fn remove_quietly(path: &Path) {
    if let Err(err) = tokio::fs::remove_file(path).await {
        debug!(path = %path.display(), error = %err, "failed to remove temp file");
    }
}

/// Run the five pipeline stages for one uploaded photo and return the public
/// URL of the composited output.
pub(crate) async fn run_pipeline(
    state: &AppState,
    scratch: &mut RequestScratch,
    photo: &[u8],
) -> Result<String, AppError> {
    tokio::fs::write(&scratch.upload, photo).await?;

    let references = style_refs::resolve(&state.assets_dir);
    if references.is_empty() {
        return Err(AppError::configuration("no reference style images found"));
    }
    debug!(references = references.len(), "style references located");

    let output_url = provider::generate(
        &state.http_client,
        &state.provider_url,
        &state.provider_token,
        &state.provider_model,
        &scratch.upload,
    )
    .await?;
    info!(output = %output_url, "provider returned stylized image");

    // Registered before the download so a partially written file is still
    // removed by cleanup.
    let raw_path = state.uploads_dir.join(raw_filename());
    scratch.raw = Some(raw_path.clone());
    fetch::download_to(&state.http_client, &output_url, &raw_path).await?;

    let final_name = final_filename();
    let final_path = state.generated_dir.join(&final_name);
    compositor::composite_centered(
        &state.assets_dir.join(BACKGROUND_ASSET),
        &raw_path,
        &final_path,
        CANVAS_WIDTH,
        CANVAS_HEIGHT,
    )
    .await?;

    info!(file = %final_name, "composited output written");
    Ok(format!("/generated/{final_name}"))
}
