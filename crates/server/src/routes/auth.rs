//! Admin login and logout.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use postboard_core::{Error, auth::admin};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::state::{AppState, SESSION_COOKIE};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub email: String,
}

pub async fn login(
    State(state): State<AppState>, jar: CookieJar, payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<(CookieJar, Json<LoginResponse>)> {
    let Json(req) = payload?;

    if !admin::verify_admin_password(&state.db, &req.email, &req.password).await? {
        tracing::warn!(email = %req.email, "failed admin login");
        return Err(Error::InvalidCredentials.into());
    }

    let session = state.sessions.issue(&req.email)?;
    let cookie = Cookie::build((SESSION_COOKIE, session))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build();

    tracing::info!(email = %req.email, "admin logged in");
    Ok((jar.add(cookie), Json(LoginResponse { email: req.email })))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, Json<serde_json::Value>) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Json(serde_json::json!({ "status": "ok" })))
}
