//! Tracing setup: env-filtered console output, plus Loki shipping when enabled.

use thiserror::Error;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_SERVICE_NAME: &str = "jobboard";
const DEFAULT_ENVIRONMENT: &str = "development";
const DEFAULT_LOG_LEVEL: &str = "info,tower_http=debug,sqlx=warn";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("LOKI_ENABLED must be true or false, got {0:?}")]
    BadLokiFlag(String),

    #[error("LOKI_ENABLED is true but LOKI_URL is not set")]
    MissingLokiUrl,

    #[error("invalid log filter {filter:?}: {source}")]
    BadFilter {
        filter: String,
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("invalid LOKI_URL: {0}")]
    BadLokiUrl(#[from] url::ParseError),

    #[cfg(feature = "loki")]
    #[error("loki layer: {0}")]
    Loki(#[from] tracing_loki::Error),

    #[error("a global subscriber is already installed: {0}")]
    AlreadyInstalled(#[from] TryInitError),
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub loki_url: Option<String>,
    pub service_name: String,
    pub environment: String,
    pub log_level: String,
}

impl LoggingConfig {
    pub fn from_env() -> Result<Self, LoggingError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `loki_url` is only kept when `LOKI_ENABLED=true`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LoggingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let loki_enabled = match lookup("LOKI_ENABLED") {
            Some(raw) => raw
                .parse::<bool>()
                .map_err(|_| LoggingError::BadLokiFlag(raw))?,
            None => false,
        };
        let loki_url = if loki_enabled {
            Some(lookup("LOKI_URL").ok_or(LoggingError::MissingLokiUrl)?)
        } else {
            None
        };

        Ok(Self {
            loki_url,
            service_name: lookup("SERVICE_NAME").unwrap_or_else(|| DEFAULT_SERVICE_NAME.into()),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| DEFAULT_ENVIRONMENT.into()),
            log_level: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_LEVEL.into()),
        })
    }

    fn filter(&self) -> Result<EnvFilter, LoggingError> {
        EnvFilter::try_new(&self.log_level).map_err(|source| LoggingError::BadFilter {
            filter: self.log_level.clone(),
            source,
        })
    }
}

/// Install the global subscriber. Must be called from inside the tokio runtime
/// when Loki is enabled, since its shipping task is spawned here.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = config.filter()?;

    #[cfg(feature = "loki")]
    {
        if let Some(loki_url) = &config.loki_url {
            let url = url::Url::parse(loki_url)?;
            let (loki_layer, task) = tracing_loki::builder()
                .label("service", &config.service_name)?
                .label("environment", &config.environment)?
                .build_url(url)?;
            // Ships buffered events; runs for the life of the process.
            tokio::spawn(task);

            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .with(loki_layer)
                .try_init()?;
            tracing::info!(service = %config.service_name, "Logging to console and Loki at {}", loki_url);
            return Ok(());
        }
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;
    tracing::info!(service = %config.service_name, "Console logging initialized ({})", config.environment);
    Ok(())
}
