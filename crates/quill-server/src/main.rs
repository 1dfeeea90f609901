mod config;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use quill_api::auth::{AppState, AppStateInner};
use quill_api::oauth::OauthConfig;
use quill_api::routes;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quill=debug,tower_http=debug".into()),
        )
        .init();

    // Config load failure is the only fatal startup error.
    let config = Config::from_env()?;

    // Init database (schema auto-created)
    let db = Arc::new(quill_db::Database::open(&PathBuf::from(&config.db_path))?);

    // A request timeout bounds how long a slow placeholder API can stall the
    // seed stage (and with it, server startup).
    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    // Seed the store before accepting connections. A failed fetch is logged
    // and the server starts anyway.
    if let Err(e) = quill_seed::run(
        db.clone(),
        http.clone(),
        config.seed_base_url.clone(),
        config.seed_user_id,
    )
    .await
    {
        warn!("seed stage failed: {e}");
    }

    // Shared state
    let state: AppState = Arc::new(AppStateInner {
        db,
        jwt_secret: config.jwt_secret.clone(),
        oauth: OauthConfig::new(
            &config.google_client_id,
            &config.google_client_secret,
            &config.google_redirect_url,
            &config.oauth_state,
        ),
        http,
    });

    let app = routes::router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Quill server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
