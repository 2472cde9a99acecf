use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::infrastructure::provider;

#[derive(Debug, Parser)]
#[command(author, version, about = "Relay photos through a generative provider into brand-style art", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeCommand),

    /// Composite a foreground image onto the background asset locally
    Composite(CompositeCommand),
}

#[derive(Debug, Args)]
pub struct ServeCommand {
    #[arg(long, env = "BRANDBOOTH_BIND_ADDRESS", default_value = "127.0.0.1:3000")]
    pub bind_address: SocketAddr,

    #[arg(long, env = "BRANDBOOTH_REPLICATE_API_TOKEN")]
    pub replicate_api_token: Option<String>,

    #[arg(long, env = "BRANDBOOTH_PROVIDER_URL", default_value = provider::REPLICATE_URL)]
    pub provider_url: String,

    #[arg(long, env = "BRANDBOOTH_MODEL", default_value = provider::DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, env = "BRANDBOOTH_ASSETS_DIR", default_value = "assets")]
    pub assets_dir: PathBuf,

    #[arg(long, env = "BRANDBOOTH_UPLOADS_DIR", default_value = "uploads")]
    pub uploads_dir: PathBuf,

    #[arg(long, env = "BRANDBOOTH_GENERATED_DIR", default_value = "generated")]
    pub generated_dir: PathBuf,
}

#[derive(Debug, Args)]
pub struct CompositeCommand {
    /// Foreground image to place over the background
    pub foreground: PathBuf,

    #[arg(long, default_value = "assets/NoiseBG.png")]
    pub background: PathBuf,

    #[arg(long, default_value = "composite.png")]
    pub output: PathBuf,
}
