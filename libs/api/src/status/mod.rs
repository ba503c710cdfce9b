use axum::{extract::State, Json};
use services::Service;
use tokio::join;
use tracing::warn;

pub mod response;

use crate::ApiState;

use self::response::{ServiceState, StatusResponse};

/// Report what each service says about itself
#[utoipa::path(
    get,
    path = "/api/status",
    responses(
        (status = 200, description = "One entry per service, unreachable ones included", body = StatusResponse)
    )
)]
pub async fn get_status(State(state): State<ApiState>) -> Json<StatusResponse> {
    let services = &state.services;
    let (catalog, recommender, diffusion) = join!(
        services.status(Service::Catalog),
        services.status(Service::Recommender),
        services.status(Service::Diffusion),
    );

    let states = Service::ALL
        .into_iter()
        .zip([catalog, recommender, diffusion])
        .map(|(service, status)| ServiceState::new(service, status))
        .collect::<Vec<_>>();

    for down in states.iter().filter(|s| !s.reachable) {
        warn!(
            task = "service status",
            service = ?down.service,
            error = down.error.as_deref().unwrap_or_default()
        );
    }

    Json(StatusResponse { services: states })
}
