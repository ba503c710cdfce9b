use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Serialize, Deserialize, ToSchema)]
pub struct TextSearchParam {
    pub query_text: String,
    /// Falls back to the configured default.
    pub top_k: Option<u32>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ImageSearchParam {
    pub top_k: Option<u32>,
}

/// Multipart body of `POST /api/search/image`, documentation only.
#[derive(ToSchema)]
pub struct ImageSearchForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}
