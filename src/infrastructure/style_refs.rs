use std::path::{Path, PathBuf};

/// Number of numbered brand reference images shipped in the assets directory.
const REFERENCE_COUNT: usize = 8;

/// Resolve the brand reference images that exist on disk, in their numbered
/// order.
///
/// An empty result aborts the pipeline. The surviving paths currently act as
/// a gate only and are not attached to the provider call.
// TODO: attach the reference images to the prediction input once the model
// exposes a multi-image conditioning field.
pub fn resolve(assets_dir: &Path) -> Vec<PathBuf> {
    (1..=REFERENCE_COUNT)
        .map(|i| assets_dir.join(format!("BrandRef_{i:02}.png")))
        .filter(|path| path.exists())
        .collect()
}
