pub(crate) mod stylize;

use axum::extract::DefaultBodyLimit;
use axum::routing::post;

use crate::application::state::AppState;

/// Uploads land here before any size check in the handler, so the multipart
/// limit has to cover the largest accepted photo.
const UPLOAD_LIMIT_BYTES: usize = 10 * 1024 * 1024;

pub(super) fn router() -> axum::Router<AppState> {
    axum::Router::new().route(
        "/photo-to-brand",
        post(stylize::photo_to_brand).layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES)),
    )
}
