mod cli;

use clap::Parser;
use dbdeck::api::ApiClient;
use dbdeck::config::Config;
use dbdeck::session::SessionStore;
use dbdeck::storage::SqliteStore;
use mimalloc::MiMalloc;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let args = cli::Cli::parse();
    let cfg = Config::load()?;

    let default_level = if args.verbose {
        "debug".to_string()
    } else {
        cfg.loglevel.clone()
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    info!(
        api_url = %cfg.api_url,
        fallback_url = %cfg.fallback_url.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        database_url = %cfg.database_url,
        proxy = %cfg.proxy.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        loglevel = %cfg.loglevel,
    );

    let storage = SqliteStore::connect(&cfg.database_url).await?;
    let auth = dbdeck::auth::spawn(SessionStore::new(Arc::new(storage))).await?;
    let api = Arc::new(ApiClient::from_config(&cfg)?);

    let ctx = cli::Context {
        api,
        auth: auth.clone(),
        backend_host: cfg.backend_host(),
    };
    let ok = cli::run(args.command, &ctx).await;
    auth.shutdown();

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
