use serde::{Deserialize, Serialize};
use services::{Service, ServiceStatus};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub services: Vec<ServiceState>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ServiceState {
    pub service: Service,
    pub reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ServiceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceState {
    pub fn new(service: Service, status: anyhow::Result<ServiceStatus>) -> Self {
        match status {
            Ok(status) => Self {
                service,
                reachable: true,
                status: Some(status),
                error: None,
            },
            Err(e) => Self {
                service,
                reachable: false,
                status: None,
                error: Some(format!("{:#}", e)),
            },
        }
    }
}
