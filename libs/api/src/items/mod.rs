use axum::{
    extract::{Multipart, State},
    Json,
};
use serde_json::Value;
use services::catalog::Catalog;
use tracing::info;

pub mod request;

use crate::response::{ApiResponse, IntoApiResponse};
use crate::util::multipart::FormData;
use crate::{ApiError, ApiState};

use self::request::metadata_from_form;

/// List all wardrobe items
#[utoipa::path(
    get,
    path = "/api/items",
    responses(
        (status = 200, description = "List all items successfully", body = [services::catalog::ClothingItem]),
        (status = 502, description = "Catalog service failed")
    )
)]
pub async fn get_items(State(state): State<ApiState>) -> ApiResponse<Json<Value>> {
    let items = state
        .services
        .list_items::<Value>()
        .await
        .into_response("502-001")?;

    Ok(Json(items))
}

/// Upload a clothing item
#[utoipa::path(
    post,
    path = "/api/items",
    request_body(content = crate::items::request::ItemUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Item uploaded", body = services::catalog::UploadResponse),
        (status = 400, description = "No image given"),
        (status = 502, description = "Catalog service failed")
    )
)]
pub async fn post_item(
    State(state): State<ApiState>,
    multipart: Multipart,
) -> ApiResponse<Json<Value>> {
    let mut form = FormData::read(multipart).await.into_response("400-001")?;
    let file = form
        .take_file("file")
        .ok_or_else(|| ApiError::from_code("400-002"))?;
    let metadata = metadata_from_form(&form);

    let response = state
        .services
        .upload_item::<Value>(file, metadata)
        .await
        .into_response("502-002")?;
    info!(
        task = "upload item",
        item_id = %response["item_id"],
        total_items = %response["total_items"]
    );

    Ok(Json(response))
}
