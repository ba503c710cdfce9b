use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::de::DeserializeOwned;
use toml::{map::Map, Value};

/// Environment variable that pins the workspace root, for binaries running
/// outside of cargo.
pub const WORKSPACE_DIR_ENV: &str = "OUTFIT_WORKSPACE_DIR";

pub fn workspace_dir() -> anyhow::Result<PathBuf> {
    if let Ok(dir) = std::env::var(WORKSPACE_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }

    let output = std::process::Command::new(env!("CARGO"))
        .arg("locate-project")
        .arg("--workspace")
        .arg("--message-format=plain")
        .output()
        .context("failed to run cargo locate-project")?
        .stdout;
    let cargo_path = Path::new(
        std::str::from_utf8(&output)
            .context("cargo locate-project printed invalid utf-8")?
            .trim(),
    );

    cargo_path
        .parent()
        .map(Path::to_path_buf)
        .context("Cargo.toml has no parent directory")
}

pub fn read_toml<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    toml::from_str::<T>(&text)
        .with_context(|| format!("failed to parse {}", path.display()))
}

pub fn load_config<T: DeserializeOwned>(config_name: &str) -> anyhow::Result<T> {
    read_toml(&workspace_dir()?.join(config_name))
}

/// Reads `Secrets.dev.toml` from the workspace root. A missing file yields an
/// empty table so that plain environment variables can be used instead.
pub fn load_env() -> anyhow::Result<Map<String, Value>> {
    let path = workspace_dir()?.join("Secrets.dev.toml");
    if !path.exists() {
        return Ok(Map::new());
    }

    read_toml(&path)
}

/// Looks a key up in the environment first, then in the secrets table.
pub fn env_or_secret(secrets: &Map<String, Value>, key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| {
            secrets
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
        })
}
