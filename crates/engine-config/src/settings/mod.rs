use crate::error::ConfigError;
use connectors::{
    api::cat_api::{CatApiClient, DEFAULT_BASE_URL},
    file::json::JsonFileSource,
    source::BreedSource,
};
use engine_core::context::env::EnvContext;
use std::{path::PathBuf, str::FromStr, sync::Arc, time::Duration};
use tracing::debug;

pub const API_URL_VAR: &str = "BREEDSCOPE_API_URL";
pub const API_KEY_VAR: &str = "BREEDSCOPE_API_KEY";
pub const TIMEOUT_VAR: &str = "BREEDSCOPE_TIMEOUT_MS";
pub const REFRESH_VAR: &str = "BREEDSCOPE_REFRESH_SECS";
pub const STATE_DIR_VAR: &str = "BREEDSCOPE_STATE_DIR";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_REFRESH_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_base_url: String,
    pub api_key: Option<String>,
    pub request_timeout: Duration,
    pub refresh_period: Duration,
    pub state_dir: PathBuf,
    /// Local breed dump used instead of the HTTP API when set.
    pub fixture: Option<PathBuf>,
}

impl Settings {
    pub fn from_env(env: &EnvContext) -> Result<Self, ConfigError> {
        let state_dir = match env.get(STATE_DIR_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => default_state_dir()?,
        };

        let timeout_ms = parse_var::<u64>(env, TIMEOUT_VAR)?;
        let refresh_secs = parse_var::<u64>(env, REFRESH_VAR)?;

        if refresh_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: REFRESH_VAR.to_string(),
                value: "0".to_string(),
                reason: "refresh period must be positive".to_string(),
            });
        }

        let settings = Settings {
            api_base_url: env.get_or(API_URL_VAR, DEFAULT_BASE_URL),
            api_key: env.get(API_KEY_VAR),
            request_timeout: timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_TIMEOUT),
            refresh_period: refresh_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_REFRESH_PERIOD),
            state_dir,
            fixture: None,
        };

        debug!("Resolved settings: {:?}", settings.redacted());
        Ok(settings)
    }

    /// Source the catalogue loads breeds from.
    pub fn breed_source(&self) -> Result<Arc<dyn BreedSource>, ConfigError> {
        if let Some(path) = &self.fixture {
            return Ok(Arc::new(JsonFileSource::new(path)));
        }

        let client = CatApiClient::new(
            &self.api_base_url,
            self.api_key.as_deref(),
            self.request_timeout,
        )?;
        Ok(Arc::new(client))
    }

    fn redacted(&self) -> Self {
        Settings {
            api_key: self.api_key.as_ref().map(|_| "***".to_string()),
            ..self.clone()
        }
    }
}

fn default_state_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".breedscope").join("cache"))
        .ok_or(ConfigError::NoStateDir)
}

fn parse_var<T>(env: &EnvContext, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env.parse::<T>(key)
        .transpose()
        .map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            value: env.get(key).unwrap_or_default(),
            reason: e.to_string(),
        })
}
