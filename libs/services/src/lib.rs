use std::time::Duration;

use anyhow::{ensure, Context};
use bytes::Bytes;
use reqwest::{multipart::Part, Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use utoipa::ToSchema;

pub mod catalog;
pub mod diffusion;
pub mod recommender;

pub const DEFAULT_CATALOG_URL: &str = "http://localhost:8001";
pub const DEFAULT_RECOMMENDER_URL: &str = "http://localhost:8002";
pub const DEFAULT_DIFFUSION_URL: &str = "http://localhost:8003";

/// Base URLs of the three backing services.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServiceUrls {
    pub catalog: String,
    pub recommender: String,
    pub diffusion: String,
}

impl Default for ServiceUrls {
    fn default() -> Self {
        Self {
            catalog: DEFAULT_CATALOG_URL.to_string(),
            recommender: DEFAULT_RECOMMENDER_URL.to_string(),
            diffusion: DEFAULT_DIFFUSION_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Catalog,
    Recommender,
    Diffusion,
}

impl Service {
    pub const ALL: [Service; 3] =
        [Service::Catalog, Service::Recommender, Service::Diffusion];
}

/// Whatever a service reports on its root path.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ServiceStatus {
    pub service: String,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub details: Map<String, Value>,
}

/// An uploaded image on its way to a service.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn mime(&self) -> &str {
        self.content_type.as_deref().unwrap_or("application/octet-stream")
    }

    fn into_part(self) -> anyhow::Result<Part> {
        let mime = self.mime().to_string();
        Part::bytes(self.bytes.to_vec())
            .file_name(self.file_name)
            .mime_str(&mime)
            .context("invalid image content type")
    }
}

#[derive(Debug, Clone)]
struct Endpoint {
    base_url: String,
    client: Client,
}

impl Endpoint {
    fn new(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(format!("{}{}", self.base_url, path))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(format!("{}{}", self.base_url, path))
    }

    async fn string_response(
        &self,
        request: RequestBuilder,
    ) -> anyhow::Result<String> {
        let response = request
            .send()
            .await
            .with_context(|| format!("failed to reach {}", self.base_url))?;

        let status_code = response.status();
        let text = response.text().await;

        ensure!(
            status_code.is_success(),
            "status code: {}, response: {:?}",
            status_code,
            text
        );

        Ok(text?)
    }

    async fn json_response<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> anyhow::Result<T> {
        let text = self.string_response(request).await?;
        debug!(
            task = "service response",
            url = %self.base_url,
            len = text.len()
        );

        serde_json::from_str(&text).context("failed to parse response")
    }

    async fn binary_response(
        &self,
        request: RequestBuilder,
    ) -> anyhow::Result<Bytes> {
        let response = request
            .send()
            .await
            .with_context(|| format!("failed to reach {}", self.base_url))?;

        let status_code = response.status();
        let bytes = response.bytes().await;

        ensure!(status_code.is_success(), "status code: {}", status_code);

        Ok(bytes?)
    }
}

/// Clients for the catalog, recommendation and diffusion services, sharing
/// one connection pool.
#[derive(Debug, Clone)]
pub struct Services {
    catalog: Endpoint,
    recommender: Endpoint,
    diffusion: Endpoint,
}

impl Services {
    pub fn new(urls: &ServiceUrls, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::ClientBuilder::new()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;

        Ok(Self {
            catalog: Endpoint::new(&urls.catalog, client.clone()),
            recommender: Endpoint::new(&urls.recommender, client.clone()),
            diffusion: Endpoint::new(&urls.diffusion, client),
        })
    }

    fn endpoint(&self, service: Service) -> &Endpoint {
        match service {
            Service::Catalog => &self.catalog,
            Service::Recommender => &self.recommender,
            Service::Diffusion => &self.diffusion,
        }
    }

    pub async fn status(&self, service: Service) -> anyhow::Result<ServiceStatus> {
        let endpoint = self.endpoint(service);
        endpoint.json_response(endpoint.get("/")).await
    }
}
