//! Connection settings for the registration API.
//!
//! Sources, lowest precedence first: built-in defaults, an optional
//! `regsuite.toml`, `API_*` environment variables, then an explicit override
//! from the caller.

use std::{collections::HashMap, path::PathBuf, time::Duration};

use serde::Deserialize;
use validator::Validate;

use crate::{Result, spec::LogDetail};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8081";

const FILE_NAME: &str = "regsuite";
const ENV_PREFIX: &str = "API";

#[derive(Deserialize, Debug, Clone, Validate)]
pub struct ApiConfig {
    pub base_url: url::Url,

    #[validate(range(min = 1))]
    pub connect_timeout_ms: u64,

    /// Longest wait between reads of a response.
    #[validate(range(min = 1))]
    pub read_timeout_ms: u64,

    pub log: LogDetail,
}

impl ApiConfig {
    /// Loads `.env`, then resolves every source against the process environment.
    pub fn load(base_url: Option<&str>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut loader = ConfigLoader::default();
        if let Some(base_url) = base_url {
            loader = loader.base_url(base_url);
        }
        loader.load()
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

#[derive(Default, Debug, Clone)]
pub struct ConfigLoader {
    dir: Option<PathBuf>,
    env: Option<HashMap<String, String>>,
    base_url: Option<String>,
}

impl ConfigLoader {
    /// Directory searched for `regsuite.toml` (defaults to the working directory).
    pub fn dir(
        mut self,
        dir: impl Into<PathBuf>,
    ) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Replaces the process environment with the given variables.
    pub fn env(
        mut self,
        vars: HashMap<String, String>,
    ) -> Self {
        self.env = Some(vars);
        self
    }

    pub fn base_url(
        mut self,
        base_url: impl Into<String>,
    ) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn load(self) -> Result<ApiConfig> {
        let file_name = format!(
            "{}",
            self.dir
                .unwrap_or_else(|| PathBuf::from("./"))
                .join(FILE_NAME)
                .display()
        );

        let mut env = config::Environment::with_prefix(ENV_PREFIX).try_parsing(true);
        if let Some(vars) = self.env {
            env = env.source(Some(vars));
        }

        let this: ApiConfig = config::Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("connect_timeout_ms", 5_000_i64)?
            .set_default("read_timeout_ms", 30_000_i64)?
            .set_default("log", "uri")?
            .add_source(config::File::with_name(&file_name).required(false))
            .add_source(env)
            .set_override_option("base_url", self.base_url)?
            .build()?
            .try_deserialize()?;

        this.validate()?;

        tracing::debug!(base_url = %this.base_url, "resolved API configuration");

        Ok(this)
    }
}
