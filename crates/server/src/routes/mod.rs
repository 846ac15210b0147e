//! HTTP routes.
//!
//! Request bodies are validated here before anything reaches the board;
//! the board trusts its inputs.

pub mod auth;
pub mod posts;

use std::time::Duration;

use axum::{
    Router,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    routing::{get, post},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/api/posts", get(posts::list_posts))
        .route("/api/create-post", post(posts::create_post))
        .route("/api/edit-post", post(posts::edit_post))
        .route("/api/delete-post", post(posts::delete_post))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = cors_layer(&state.config.cors_origins) {
        app = app.layer(cors);
    }

    app.with_state(state)
}

/// CORS for the configured frontend origins.
///
/// Without origins the API is same-origin only and no layer is added.
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(%origin, error = %e, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(Duration::from_secs(60 * 60)),
    )
}

async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use postboard_core::{AppConfig, BoardDb};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::state::AppState;

    pub(crate) async fn test_state() -> AppState {
        let db = BoardDb::open_in_memory().await.unwrap();
        let config = AppConfig { jwt_secret: Some("0123456789abcdef".into()), ..Default::default() };
        AppState::new(db, config)
    }

    pub(crate) async fn send(app: Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, cookie, body)
    }

    pub(crate) fn post_json(uri: &str, payload: &Value, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(payload.to_string())).expect("request")
    }

    pub(crate) fn get(uri: &str) -> Request<Body> {
        Request::builder().method("GET").uri(uri).body(Body::empty()).expect("request")
    }
}
