mod routes;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use mbta_transit::prelude::*;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(
    name = "mbta-server",
    author,
    version,
    about = "Serve MBTA route listings and schedule matrices as JSON"
)]
struct Args {
    /// Upstream API key, sent as `x-api-key`
    #[arg(long, env = "MBTA_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Upstream base URL
    #[arg(long, env = "MBTA_BASE_URL")]
    base_url: Option<String>,

    /// Address to listen on
    #[arg(long, env = "MBTA_LISTEN", default_value = "127.0.0.1:8080")]
    listen: SocketAddr,

    /// How long upstream responses stay cached
    #[arg(long, default_value_t = 600)]
    cache_ttl_secs: u64,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(level)
        .init();
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let cache_ttl = Duration::from_secs(args.cache_ttl_secs);
    let mut config = ApiConfig::default().with_cache_ttl(cache_ttl);
    if let Some(base_url) = &args.base_url {
        config = config.with_base_url(base_url)?;
    }

    if args.api_key.is_none() {
        warn!("no API key configured, upstream requests are rate limited");
    }

    let fetcher = HttpFetcher::new(args.api_key.as_deref())?;
    let cache = Arc::new(MemoryCache::new());
    tokio::spawn(purge_expired(cache.clone(), cache_ttl));

    let client = ApiClient::new(Arc::new(fetcher), cache, config);
    let app = routes::create_router(client);

    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;

    Ok(())
}

/// Expired entries are otherwise only dropped when read again
async fn purge_expired(cache: Arc<MemoryCache>, every: Duration) {
    let mut interval = tokio::time::interval(every.max(Duration::from_secs(1)));

    loop {
        interval.tick().await;
        let purged = cache.purge_expired();
        if purged > 0 {
            debug!(purged, "purged expired cache entries");
        }
    }
}
