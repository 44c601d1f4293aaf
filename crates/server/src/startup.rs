use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use dotenvy::dotenv;
use migration::{Migrator, MigratorTrait};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use service::invitation::mailer::{LogMailer, Mailer, SmtpMailer};

use crate::routes::{self, auth};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn load_config() -> anyhow::Result<configs::AppConfig> {
    match configs::AppConfig::load_and_validate() {
        Ok(cfg) => Ok(cfg),
        Err(e) => {
            // No usable config.toml: fall back to env-driven defaults
            warn!(error = %e, "config.toml not loaded, using environment defaults");
            configs::AppConfig::env_defaults()
        }
    }
}

fn select_mailer(cfg: &configs::SmtpConfig) -> anyhow::Result<Arc<dyn Mailer>> {
    if cfg.is_configured() {
        let mailer = SmtpMailer::from_config(cfg).map_err(|e| anyhow::anyhow!("{e}"))?;
        info!(host = %cfg.host, "smtp mailer configured");
        Ok(Arc::new(mailer))
    } else {
        warn!("smtp not configured; invitation mail will be logged only");
        Ok(Arc::new(LogMailer))
    }
}

/// Public entry: wire configuration, database, mailer and router, then
/// serve until the process is stopped.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();

    let cfg = load_config()?;
    common::env::ensure_env(&cfg.uploads.dir).await?;

    let db = models::db::connect_with(&cfg.database).await?;
    Migrator::up(&db, None).await?;
    info!("database migrations applied");

    let mailer = select_mailer(&cfg.smtp)?;
    let state = auth::ServerState {
        db,
        auth: auth::ServerAuthConfig {
            jwt_secret: cfg.auth.jwt_secret.clone(),
            token_ttl_hours: cfg.auth.token_ttl_hours,
        },
        mailer,
        registration_base_url: cfg.smtp.registration_base_url.clone(),
        uploads_dir: cfg.uploads.dir.clone(),
    };

    let app: Router = routes::build_router(build_cors(), state);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting http server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
