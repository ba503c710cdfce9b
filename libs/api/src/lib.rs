use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use services::Services;
use session::Sessions;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::Config;

pub mod config;
pub mod healthz;
pub mod items;
pub mod not_found;
pub mod pages;
pub mod recommend;
mod response;
pub mod search;
pub mod session;
pub mod status;
pub mod try_on;
mod util;

#[derive(Debug)]
pub enum ApiError {
    ClientError(String),
    ServerError(String),
    UpstreamError(String),
}

#[derive(Clone, Debug)]
pub struct ApiState {
    services: Services,
    sessions: Sessions,
    config: Config,
}

impl ApiState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let services = Services::new(&config.services, config.request_timeout())?;
        let sessions = Sessions::new(
            config.session.cookie_name.clone(),
            config.session_ttl(),
        );

        Ok(Self {
            services,
            sessions,
            config,
        })
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        items::get_items,
        items::post_item,
        search::search_text,
        search::search_image,
        recommend::post_recommend,
        recommend::post_chat,
        recommend::post_analyze_outfit,
        try_on::post_try_on,
        try_on::post_generate_outfit,
        status::get_status,
    ),
    components(schemas(
        services::catalog::ClothingItem,
        services::catalog::ItemMetadata,
        services::catalog::UploadResponse,
        services::catalog::SimilarityResult,
        services::recommender::OutfitRequest,
        services::recommender::Occasion,
        services::recommender::Weather,
        services::recommender::RecommendResponse,
        services::recommender::Recommendation,
        services::recommender::RecommendedItem,
        services::recommender::ChatRequest,
        services::recommender::ChatResponse,
        services::recommender::AnalysisResponse,
        services::diffusion::GenerationParameters,
        services::diffusion::TryOnMode,
        services::Service,
        services::ServiceStatus,
        items::request::ItemUploadForm,
        search::request::TextSearchParam,
        search::request::ImageSearchForm,
        try_on::request::TryOnForm,
        status::response::StatusResponse,
        status::response::ServiceState,
    )),
    tags(
        (name = "outfit", description = "Pass-through API for the wardrobe, stylist and try-on services")
    )
)]
struct ApiDoc;

pub async fn serve(config: Config) -> anyhow::Result<Router> {
    info!(
        task = "start api serving",
        catalog = %config.services.catalog,
        recommender = %config.services.recommender,
        diffusion = %config.services.diffusion
    );

    let state = ApiState::new(config)?;

    Ok(router(state))
}

pub fn router(state: ApiState) -> Router {
    let origins = state
        .config
        .server
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(origin) => Some(origin),
            Err(e) => {
                warn!(task = "cors", origin = %origin, error = %e);
                None
            }
        })
        .collect::<Vec<_>>();
    let body_limit = state.config.server.max_upload_bytes;

    // json pass-through
    let api_router = Router::new()
        .route("/items", get(items::get_items).post(items::post_item))
        .route("/search/text", post(search::search_text))
        .route("/search/image", post(search::search_image))
        .route("/recommend", post(recommend::post_recommend))
        .route("/chat", post(recommend::post_chat))
        .route("/analyze-outfit", post(recommend::post_analyze_outfit))
        .route("/try-on", post(try_on::post_try_on))
        .route("/generate-outfit", post(try_on::post_generate_outfit))
        .route("/status", get(status::get_status))
        .fallback(not_found::get_404)
        .with_state(state.clone());

    // pages
    let page_router = Router::new()
        .route("/", get(pages::home::get_home))
        .route("/wardrobe", get(pages::wardrobe::get_wardrobe))
        .route("/wardrobe/upload", post(pages::wardrobe::post_upload))
        .route("/wardrobe/search", post(pages::wardrobe::post_search))
        .route(
            "/wardrobe/search-image",
            post(pages::wardrobe::post_search_image),
        )
        .route("/wardrobe/clear", post(pages::wardrobe::post_clear))
        .route("/recommend", get(pages::recommend::get_recommend))
        .route("/recommend/send", post(pages::recommend::post_send))
        .route("/recommend/reset", post(pages::recommend::post_reset))
        .route("/try-on", get(pages::try_on::get_try_on))
        .route("/try-on/generate", post(pages::try_on::post_generate))
        .route(
            "/try-on/generate-outfit",
            post(pages::try_on::post_generate_outfit),
        )
        .with_state(state);

    Router::new()
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .route("/healthz", get(healthz::get_health))
        .nest("/api", api_router)
        .merge(page_router)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::new().allow_origin(origins))
        .layer(TraceLayer::new_for_http())
        .fallback(not_found::get_404)
}
