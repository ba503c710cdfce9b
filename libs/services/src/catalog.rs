pub mod implementation;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use utoipa::ToSchema;

use crate::ImageFile;

/// Responses are decoded into whatever the caller asks for: the typed
/// structs below, or a `serde_json::Value` to pass the body on untouched.
pub trait Catalog {
    fn list_items<T: DeserializeOwned + Send>(
        &self,
    ) -> impl std::future::Future<Output = anyhow::Result<T>> + Send;

    fn upload_item<T: DeserializeOwned + Send>(
        &self,
        file: ImageFile,
        metadata: ItemMetadata,
    ) -> impl std::future::Future<Output = anyhow::Result<T>> + Send;

    fn search_by_text<T: DeserializeOwned + Send>(
        &self,
        request: TextSearchRequest,
    ) -> impl std::future::Future<Output = anyhow::Result<T>> + Send;

    fn search_by_image<T: DeserializeOwned + Send>(
        &self,
        file: ImageFile,
        top_k: u32,
    ) -> impl std::future::Future<Output = anyhow::Result<T>> + Send;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClothingItem {
    #[serde(default)]
    pub item_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f32>,
}

/// Metadata sent with an upload. Sent as query parameters, so `None` fields
/// are left out entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ItemMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub item_id: String,
    pub total_items: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TextSearchRequest {
    pub query_text: String,
    pub top_k: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SimilarityResult {
    pub item_id: String,
    pub similarity_score: f32,
    pub metadata: ClothingItem,
}

impl From<SimilarityResult> for ClothingItem {
    fn from(result: SimilarityResult) -> Self {
        let item_id = if result.metadata.item_id.is_empty() {
            result.item_id
        } else {
            result.metadata.item_id
        };

        ClothingItem {
            item_id,
            similarity_score: Some(result.similarity_score),
            ..result.metadata
        }
    }
}
