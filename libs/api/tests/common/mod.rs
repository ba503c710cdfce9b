#![allow(dead_code)]

use std::{net::SocketAddr, time::Duration};

use api::{router, ApiState, Config};
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response, StatusCode},
    routing::{self, post},
    Json, Router,
};
use serde_json::{json, Value};
use services::ServiceUrls;
use tokio::net::TcpListener;
use tower::ServiceExt;

/// Nothing listens here.
pub const UNREACHABLE: &str = "http://127.0.0.1:1";

pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake";

pub const BOUNDARY: &str = "outfit-test-boundary";

pub async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", address)
}

pub fn catalog() -> Router {
    Router::new()
        .route(
            "/",
            routing::get(|| async {
                Json(json!({"service": "CLIP Similarity Search Service", "total_items": 1}))
            }),
        )
        .route(
            "/items",
            routing::get(|| async {
                Json(json!([
                    {"item_id": "item_0", "category": "top", "color": "Blue",
                     "style": "casual", "description": null, "filename": "a.png"}
                ]))
            }),
        )
        .route(
            "/upload",
            post(|| async {
                Json(json!({"success": true, "item_id": "item_1", "total_items": 2}))
            }),
        )
        .route(
            "/search/text",
            post(|| async {
                Json(json!([
                    {"item_id": "item_0", "similarity_score": 0.92,
                     "metadata": {"item_id": "item_0", "category": "top", "color": "Blue"}}
                ]))
            }),
        )
        .route(
            "/search/image",
            post(|| async {
                Json(json!([
                    {"item_id": "item_0", "similarity_score": 0.75,
                     "metadata": {"item_id": "item_0", "category": "shoes", "color": "Tan"}}
                ]))
            }),
        )
}

/// Item list with nulls and a key the typed model does not know.
pub fn upstream_items() -> Value {
    json!([
        {"item_id": "item_0", "category": "top", "color": null, "style": null,
         "description": null, "filename": "a.png", "uploaded_by": "kiosk"}
    ])
}

/// Search results with more precision than `f32` holds.
pub fn upstream_results() -> Value {
    json!([
        {"item_id": "item_0", "similarity_score": 0.123456789012, "rank": 1,
         "metadata": {"item_id": "item_0", "category": "top", "color": null,
                      "extra": "kept?"}}
    ])
}

/// Catalog answering with `upstream_items` and `upstream_results`.
pub fn detailed_catalog() -> Router {
    Router::new()
        .route("/items", routing::get(|| async { Json(upstream_items()) }))
        .route("/search/text", post(|| async { Json(upstream_results()) }))
        .route("/search/image", post(|| async { Json(upstream_results()) }))
}

pub fn recommender() -> Router {
    Router::new()
        .route(
            "/",
            routing::get(|| async {
                Json(json!({"service": "Gemini Outfit Recommender", "status": "running"}))
            }),
        )
        .route(
            "/recommend",
            post(|| async {
                Json(json!({
                    "success": true,
                    "recommendation": null,
                    "full_text": "Try navy chinos with a white tee."
                }))
            }),
        )
        .route(
            "/chat",
            post(|| async { Json(json!({"success": true, "response": "Sure!"})) }),
        )
        .route(
            "/analyze-outfit",
            post(|Json(items): Json<Value>| async move {
                let count = items.as_array().map_or(0, Vec::len);
                Json(json!({
                    "success": true,
                    "analysis": format!("{} pieces work together", count),
                    "score": 8.5
                }))
            }),
        )
}

/// Recommender that takes a while to answer.
pub fn slow_recommender(delay: Duration) -> Router {
    Router::new().route(
        "/recommend",
        post(move || async move {
            tokio::time::sleep(delay).await;
            Json(json!({"success": true, "full_text": "Worth the wait."}))
        }),
    )
}

pub fn failing_recommender() -> Router {
    Router::new().route(
        "/recommend",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model overloaded") }),
    )
}

pub fn diffusion() -> Router {
    let png = || async { ([(header::CONTENT_TYPE, "image/png")], PNG) };

    Router::new()
        .route("/try-on/simple", post(png))
        .route("/try-on/img2img", post(png))
        .route("/try-on/inpaint", post(png))
        .route("/generate-outfit", post(png))
}

pub fn app(catalog: &str, recommender: &str, diffusion: &str) -> Router {
    let config = Config {
        services: ServiceUrls {
            catalog: catalog.to_string(),
            recommender: recommender.to_string(),
            diffusion: diffusion.to_string(),
        },
        ..Default::default()
    };

    router(ApiState::new(config).unwrap())
}

/// App wired to healthy mock services.
pub async fn healthy_app() -> Router {
    let catalog = spawn(catalog()).await;
    let recommender = spawn(recommender()).await;
    let diffusion = spawn(diffusion()).await;

    app(&catalog, &recommender, &diffusion)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// `name=value` of the session cookie set on the response.
pub fn session_cookie(response: &Response<Body>) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();

    set_cookie.split(';').next().unwrap().to_string()
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, cookie: Option<&str>, form: &str) -> Request<Body> {
    let mut builder = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

pub fn multipart(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, file_name, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: image/png\r\n\r\n",
                        name, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn post_multipart(uri: &str, cookie: Option<&str>, parts: &[Part]) -> Request<Body> {
    let mut builder = Request::post(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={}", BOUNDARY),
    );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(multipart(parts))).unwrap()
}
