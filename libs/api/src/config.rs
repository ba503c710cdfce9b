use std::{path::Path, time::Duration};

use serde::Deserialize;
use services::ServiceUrls;
use toml::{map::Map, Value};
use util::env_or_secret;

pub const CLIP_API: &str = "CLIP_API";
pub const GEMINI_API: &str = "GEMINI_API";
pub const DIFFUSION_API: &str = "DIFFUSION_API";

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub services: ServiceUrls,
    pub server: Server,
    pub session: Session,
    pub search: Search,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Server {
    pub port: u16,
    pub request_timeout_secs: u64,
    pub max_upload_bytes: usize,
    pub cors_origins: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Session {
    pub cookie_name: String,
    pub idle_ttl_secs: u64,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Search {
    pub top_k: u32,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            port: 8000,
            request_timeout_secs: 300,
            max_upload_bytes: 20 * 1024 * 1024,
            cors_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self {
            cookie_name: "outfit_session".to_string(),
            idle_ttl_secs: 60 * 60,
        }
    }
}

impl Default for Search {
    fn default() -> Self {
        Self { top_k: 10 }
    }
}

impl Config {
    /// Reads `config_name` from the workspace root.
    pub fn load(config_name: &str) -> anyhow::Result<Self> {
        util::load_config(config_name)
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        util::read_toml(path)
    }

    /// Service base URLs given in the environment or the secrets table win
    /// over the config file.
    pub fn with_overrides(mut self, secrets: &Map<String, Value>) -> Self {
        if let Some(url) = env_or_secret(secrets, CLIP_API) {
            self.services.catalog = url;
        }
        if let Some(url) = env_or_secret(secrets, GEMINI_API) {
            self.services.recommender = url;
        }
        if let Some(url) = env_or_secret(secrets, DIFFUSION_API) {
            self.services.diffusion = url;
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session.idle_ttl_secs)
    }
}
