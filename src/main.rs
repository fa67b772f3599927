use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;

use jobboard_backend::auth::AuthKeys;
use jobboard_backend::config::AppConfig;
use jobboard_backend::logging::{init_logging, LoggingConfig};
use jobboard_backend::state::AppState;
use jobboard_backend::{app, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(&LoggingConfig::from_env()?).context("failed to initialize logging")?;

    let config = AppConfig::from_env()?;

    let pool = db::create_pool(&config.database_url, config.max_connections)
        .await
        .context("failed to connect to database")?;

    if config.run_migrations {
        db::run_migrations(&pool).await?;
    }

    let state = AppState {
        pool,
        auth: AuthKeys::from_secret(&config.secret_key),
    };
    let app = app::create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Job board backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
