use std::path::PathBuf;

/// Configuration for the provider and the filesystem layout — everything that
/// varies between production and test environments.
pub struct AppStateConfig {
    pub provider_url: String,
    pub provider_token: String,
    pub provider_model: String,
    pub assets_dir: PathBuf,
    pub uploads_dir: PathBuf,
    pub generated_dir: PathBuf,
}

#[derive(Clone)]
pub struct AppState {
    pub http_client: reqwest::Client,
    pub provider_url: String,
    pub provider_token: String,
    pub provider_model: String,
    pub assets_dir: PathBuf,
    pub uploads_dir: PathBuf,
    pub generated_dir: PathBuf,
}

impl AppState {
    pub fn new(config: AppStateConfig) -> Self {
        Self {
            #[allow(clippy::expect_used)]
            http_client: reqwest::ClientBuilder::new()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("failed to build HTTP client"),
            provider_url: config.provider_url,
            provider_token: config.provider_token,
            provider_model: config.provider_model,
            assets_dir: config.assets_dir,
            uploads_dir: config.uploads_dir,
            generated_dir: config.generated_dir,
        }
    }
}
