use clap::Parser;
use eyre::Context;
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use youtube_live_edge::{App, Config, MemoryCache, YouTubeClient, server};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_ansi(std::io::stdout().is_terminal())
        .init();

    let config = Config::parse();

    let http_client = reqwest::ClientBuilder::new()
        // SSRF no thank you.
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .context("build HTTP client")?;
    let youtube = YouTubeClient::new(config.api_key.clone(), &config.api_base, http_client);

    let live_list = config.live_list();
    tracing::debug!(?live_list, "live list settings");
    let app = Arc::new(App::new(youtube, MemoryCache::new(), live_list));

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("bind to {}", config.listen))?;

    server::serve(listener, app, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    })
    .await
}
