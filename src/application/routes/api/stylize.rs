use axum::Json;
use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::info;

use crate::application::errors::{ApiError, AppError};
use crate::application::services::stylize::{RequestScratch, run_pipeline};
use crate::application::state::AppState;
use crate::domain::stylize::{DEFAULT_GENDER, upload_filename};

#[derive(Debug, Serialize)]
struct StylizeResponse {
    ok: bool,
    url: String,
}

/// The one inbound endpoint: a photo goes in, the URL of a composited
/// brand-style character comes out.
///
/// Validation failures return 400 before anything touches the disk; every
/// later failure returns 500 after best-effort temp-file cleanup.
#[tracing::instrument(skip(state, multipart))]
pub(crate) async fn photo_to_brand(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let (photo, gender) = read_form(multipart).await?;

    let Some(photo) = photo else {
        return Err(AppError::validation("no file uploaded").into());
    };

    let gender = gender
        .filter(|g| !g.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_GENDER.to_string());
    info!(gender = %gender, bytes = photo.len(), "photo accepted");

    let mut scratch = RequestScratch::new(state.uploads_dir.join(upload_filename()));
    let result = run_pipeline(&state, &mut scratch, &photo).await;
    scratch.cleanup().await;

    let url = result?;
    Ok(Json(StylizeResponse { ok: true, url }).into_response())
}

/// Pull the photo bytes and the optional gender hint out of the multipart
/// body. Unknown fields are ignored.
async fn read_form(mut multipart: Multipart) -> Result<(Option<Vec<u8>>, Option<String>), AppError> {
    let mut photo = None;
    let mut gender = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("photo") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("failed to read upload: {e}")))?;
                photo = Some(bytes.to_vec());
            }
            Some("gender") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("failed to read gender field: {e}")))?;
                gender = Some(text);
            }
            _ => {}
        }
    }

    Ok((photo, gender))
}
