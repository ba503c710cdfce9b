use axum::http::StatusCode;

pub(super) async fn get_health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}
