//! Vocabulary of the photo stylization pipeline: canvas geometry, fixed asset
//! names, and the naming scheme for the files each request creates.

use chrono::Utc;
use uuid::Uuid;

/// Output canvas dimensions, shared by the provider request and the compositor.
pub const CANVAS_WIDTH: u32 = 1024;
pub const CANVAS_HEIGHT: u32 = 1024;

/// Sentinel used when the request carries no gender hint.
pub const DEFAULT_GENDER: &str = "neutral";

/// Background asset the stylized character is composited onto.
pub const BACKGROUND_ASSET: &str = "NoiseBG.png";

/// Temp name for an incoming photo upload.
pub fn upload_filename() -> String {
    format!("upload-{}", Uuid::new_v4())
}

/// Temp name for the raw image fetched back from the provider.
pub fn raw_filename() -> String {
    format!("char-{}-{}.png", timestamp_millis(), short_id())
}

/// Durable name for a composited output. The timestamp plus per-request
/// randomness keeps concurrent requests from colliding.
pub fn final_filename() -> String {
    format!("final-{}-{}.png", timestamp_millis(), short_id())
}

fn timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn short_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}
