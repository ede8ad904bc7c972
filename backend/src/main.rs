//! Backend entry-point: resolves settings, then serves the configured site.

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ortho_config::OrthoConfig;
use ya_backend::inbound::http::health::HealthState;
use ya_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use ya_backend::outbound::persistence::{DbPool, PoolConfig};
use ya_backend::server::{ServerConfig, ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().map_err(std::io::Error::other)?;
    let site = settings.site().map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let news_per_page = settings.news_per_page().map_err(std::io::Error::other)?;

    let env = mockable::DefaultEnv::new();
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    info!(fingerprint = %session.key_fingerprint(), "session key loaded");

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    )
    .with_site(site)
    .with_news_per_page(news_per_page);

    match settings.database_url.as_deref() {
        Some(url) => {
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .map_err(std::io::Error::other)?;
            config = config.with_db_pool(pool);
        }
        None => warn!("no database configured; data lives in memory until shutdown"),
    }

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
