use axum::http::StatusCode;

pub(super) async fn get_404() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "not found")
}
