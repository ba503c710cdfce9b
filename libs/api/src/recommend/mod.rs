use axum::{extract::State, Json};
use serde_json::Value;
use services::recommender::Recommender;
use tracing::info;

use crate::response::{ApiResponse, IntoApiResponse};
use crate::util::blank_field;
use crate::{ApiError, ApiState};

/// Ask the stylist for an outfit
#[utoipa::path(
    post,
    path = "/api/recommend",
    request_body = services::recommender::OutfitRequest,
    responses(
        (status = 200, description = "Recommendation", body = services::recommender::RecommendResponse),
        (status = 400, description = "Empty prompt"),
        (status = 502, description = "Recommendation service failed")
    )
)]
pub async fn post_recommend(
    State(state): State<ApiState>,
    Json(request): Json<Value>,
) -> ApiResponse<Json<Value>> {
    if blank_field(&request, "prompt") {
        return Err(ApiError::from_code("400-007"));
    }
    info!(task = "recommend", prompt = %request["prompt"]);

    let response = state
        .services
        .recommend::<_, Value>(&request)
        .await
        .into_response("502-005")?;

    Ok(Json(response))
}

/// Free-form chat with the stylist
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = services::recommender::ChatRequest,
    responses(
        (status = 200, description = "Stylist reply", body = services::recommender::ChatResponse),
        (status = 400, description = "Empty message"),
        (status = 502, description = "Recommendation service failed")
    )
)]
pub async fn post_chat(
    State(state): State<ApiState>,
    Json(request): Json<Value>,
) -> ApiResponse<Json<Value>> {
    if blank_field(&request, "message") {
        return Err(ApiError::from_code("400-008"));
    }

    let response = state
        .services
        .chat::<_, Value>(&request)
        .await
        .into_response("502-006")?;

    Ok(Json(response))
}

/// Analyze how a set of items works together
#[utoipa::path(
    post,
    path = "/api/analyze-outfit",
    request_body = [services::catalog::ClothingItem],
    responses(
        (status = 200, description = "Analysis", body = services::recommender::AnalysisResponse),
        (status = 502, description = "Recommendation service failed")
    )
)]
pub async fn post_analyze_outfit(
    State(state): State<ApiState>,
    Json(items): Json<Value>,
) -> ApiResponse<Json<Value>> {
    let response = state
        .services
        .analyze_outfit::<_, Value>(&items)
        .await
        .into_response("502-007")?;

    Ok(Json(response))
}
