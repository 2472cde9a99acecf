use anyhow::Result;
use brandbooth::application::{ServerConfig, serve};
use brandbooth::domain::stylize::{CANVAS_HEIGHT, CANVAS_WIDTH};
use brandbooth::infrastructure::compositor;
use brandbooth::presentation::cli::{Cli, Commands, CompositeCommand, ServeCommand};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before clap parses env vars)
    let _ = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(cmd) => run_server(cmd).await,
        Commands::Composite(cmd) => run_composite(cmd).await,
    }
}

async fn run_server(command: ServeCommand) -> Result<()> {
    let replicate_api_token = command.replicate_api_token.unwrap_or_default();

    let config = ServerConfig {
        bind_address: command.bind_address,
        provider_url: command.provider_url,
        replicate_api_token,
        model: command.model,
        assets_dir: command.assets_dir,
        uploads_dir: command.uploads_dir,
        generated_dir: command.generated_dir,
    };

    serve(config).await
}

async fn run_composite(command: CompositeCommand) -> Result<()> {
    compositor::composite_centered(
        &command.background,
        &command.foreground,
        &command.output,
        CANVAS_WIDTH,
        CANVAS_HEIGHT,
    )
    .await?;

    eprintln!("Wrote {}", command.output.display());
    Ok(())
}

#[allow(clippy::expect_used)] // Startup: panicking is appropriate if logging cannot be initialized
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("RUST_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().compact())
            .init();
    }
}
