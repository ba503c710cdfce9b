use api::{
    config::{CLIP_API, DIFFUSION_API, GEMINI_API},
    Config,
};
use shuttle_runtime::{Error, SecretStore, Secrets};
use toml::{map::Map, Value};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[shuttle_runtime::main]
async fn main(
    #[Secrets] secret_store: SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("info"))
        .init();

    let mut secrets = Map::new();
    for key in [CLIP_API, GEMINI_API, DIFFUSION_API] {
        if let Some(value) = secret_store.get(key) {
            secrets.insert(key.to_string(), Value::String(value));
        }
    }

    let config = Config::load("Config.toml")
        .unwrap_or_else(|e| {
            warn!(task = "load config", error = %format!("{:#}", e));
            Config::default()
        })
        .with_overrides(&secrets);

    let router = api::serve(config)
        .await
        .map_err(|e| Error::BuildPanic(e.to_string()))?;

    Ok(router.into())
}
