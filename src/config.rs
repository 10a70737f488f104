// Client configuration.
// Layers defaults, an optional settings file, and TODOLINK_* environment variables.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use url::Url;

use crate::cache::paths;
use crate::error::{Result, TodoError};

const ENV_PREFIX: &str = "TODOLINK";
const DEFAULT_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_BUILD_ENV: &str = "prod";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Deployment flavour. Decides where the API endpoint lives under the base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildEnv {
    /// Behind the development proxy, which serves the API under `/api`.
    Dev,
    /// Served directly by the API host.
    Prod,
}

impl BuildEnv {
    pub fn endpoint_path(&self) -> &'static str {
        match self {
            BuildEnv::Dev => "/api/graphql",
            BuildEnv::Prod => "/graphql",
        }
    }
}

impl FromStr for BuildEnv {
    type Err = TodoError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dev" => Ok(BuildEnv::Dev),
            "prod" => Ok(BuildEnv::Prod),
            other => Err(TodoError::Config(format!("unknown build {:?}", other))),
        }
    }
}

/// Resolved settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: Url,
    pub build_env: BuildEnv,
    pub timeout: Duration,
    /// Directory holding the persisted credential.
    pub data_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    base_url: String,
    build_env: String,
    timeout_secs: u64,
    data_dir: Option<PathBuf>,
}

impl Settings {
    /// Load from the default settings file (if any) and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(paths::settings_path().as_deref())
    }

    /// Load using an explicit settings file. A missing file is skipped.
    pub fn load_from(settings_file: Option<&Path>) -> Result<Self> {
        let mut builder = defaults()?;
        if let Some(path) = settings_file {
            builder = builder.add_source(File::from(path).required(false));
        }
        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        Self::from_config(config)
    }

    /// Resolve settings from an already built configuration.
    pub fn from_config(config: Config) -> Result<Self> {
        let raw: RawSettings = config.try_deserialize()?;

        let base_url = Url::parse(&raw.base_url)
            .map_err(|e| TodoError::Config(format!("invalid base_url {:?}: {}", raw.base_url, e)))?;
        let build_env = raw.build_env.parse()?;
        let data_dir = match raw.data_dir {
            Some(dir) => dir,
            None => paths::data_dir()
                .ok_or_else(|| TodoError::Config("no home directory for data_dir".to_string()))?,
        };

        Ok(Self {
            base_url,
            build_env,
            timeout: Duration::from_secs(raw.timeout_secs),
            data_dir,
        })
    }

    /// Full endpoint URL for API requests.
    pub fn endpoint(&self) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let endpoint = format!("{}{}", base, self.build_env.endpoint_path());
        Url::parse(&endpoint).map_err(|e| TodoError::Config(e.to_string()))
    }
}

fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(Config::builder()
        .set_default("base_url", DEFAULT_BASE_URL)?
        .set_default("build_env", DEFAULT_BUILD_ENV)?
        .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)?)
}
