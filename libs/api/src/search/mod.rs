use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde_json::Value;
use services::catalog::{Catalog, TextSearchRequest};
use tracing::info;

pub mod request;

use crate::response::{ApiResponse, IntoApiResponse};
use crate::util::multipart::FormData;
use crate::{ApiError, ApiState};

use self::request::{ImageSearchParam, TextSearchParam};

/// Search items by description
#[utoipa::path(
    post,
    path = "/api/search/text",
    request_body = TextSearchParam,
    responses(
        (status = 200, description = "Matching items, best first", body = [services::catalog::SimilarityResult]),
        (status = 400, description = "Empty query"),
        (status = 502, description = "Catalog service failed")
    )
)]
pub async fn search_text(
    State(state): State<ApiState>,
    Json(params): Json<TextSearchParam>,
) -> ApiResponse<Json<Value>> {
    let query_text = params.query_text.trim().to_string();
    if query_text.is_empty() {
        return Err(ApiError::from_code("400-004"));
    }

    let request = TextSearchRequest {
        query_text,
        top_k: params.top_k.unwrap_or(state.config.search.top_k),
    };
    info!(task = "search by text", query = %request.query_text, top_k = request.top_k);

    let results = state
        .services
        .search_by_text::<Value>(request)
        .await
        .into_response("502-003")?;

    Ok(Json(results))
}

/// Search items similar to an image
#[utoipa::path(
    post,
    path = "/api/search/image",
    request_body(content = crate::search::request::ImageSearchForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Matching items, best first", body = [services::catalog::SimilarityResult]),
        (status = 400, description = "No image given"),
        (status = 502, description = "Catalog service failed")
    ),
    params(
        ImageSearchParam
    )
)]
pub async fn search_image(
    State(state): State<ApiState>,
    Query(params): Query<ImageSearchParam>,
    multipart: Multipart,
) -> ApiResponse<Json<Value>> {
    let mut form = FormData::read(multipart).await.into_response("400-001")?;
    let file = form
        .take_file("file")
        .ok_or_else(|| ApiError::from_code("400-002"))?;

    let top_k = params.top_k.unwrap_or(state.config.search.top_k);
    let results = state
        .services
        .search_by_image::<Value>(file, top_k)
        .await
        .into_response("502-004")?;

    Ok(Json(results))
}
