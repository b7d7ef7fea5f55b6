use clap::Parser;
use nim_proxy::{build_router, AppState, ModelTable, ProxyConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "nim-proxy",
    about = "OpenAI-compatible chat completion proxy for NVIDIA NIM",
    version
)]
struct Cli {
    /// Path to config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Upstream base URL (overrides config and environment)
    #[arg(long)]
    base_url: Option<String>,

    /// Print config search paths and exit
    #[arg(long)]
    show_config_paths: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nim_proxy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if cli.show_config_paths {
        println!("Config search paths:");
        for (i, path) in nim_proxy::config::config_search_paths().iter().enumerate() {
            println!("  {}. {}", i + 1, path.display());
        }
        return Ok(());
    }

    let mut config = ProxyConfig::find_and_load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.port = port;
    }

    let mut upstream = config.upstream_settings();
    if let Some(base_url) = cli.base_url {
        upstream.base_url = base_url;
    }

    let models = ModelTable::builtin();

    info!("nim-proxy v{}", env!("CARGO_PKG_VERSION"));
    info!("  Base URL:  {}", upstream.base_url);
    info!("  Timeout:   {}s", upstream.timeout.as_secs());
    info!("  Port:      {}", config.port);
    info!("  Models:    {} mapped, fallback {}", models.len(), models.fallback());

    // Not fatal: chat requests report it, health shows it.
    if upstream.api_key.is_none() {
        warn!(
            "{} is not set; chat completions will fail until it is configured",
            upstream.api_key_env
        );
    }

    let client = reqwest::Client::builder().build()?;

    let state = Arc::new(AppState {
        upstream,
        client,
        models,
    });

    let app = build_router(state);
    let bind_addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("Listening on http://{}", bind_addr);
    info!("  OPENAI_BASE_URL=http://localhost:{}/v1", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
