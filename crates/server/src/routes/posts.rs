//! Post endpoints: list, create, edit, delete.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use axum_extra::extract::cookie::CookieJar;
use postboard_core::{EditToken, Error, Post, PostId, PostType};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ListPostsResponse {
    pub posts: Arc<Vec<Post>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub text: String,
    pub post_type: PostType,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostResponse {
    pub post: Post,
    pub edit_id: EditToken,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditPostRequest {
    /// Omitted when an admin session is editing.
    #[serde(default)]
    pub edit_id: Option<String>,
    pub post_id: PostId,
    pub text: String,
    pub post_type: PostType,
}

#[derive(Debug, Serialize)]
pub struct EditPostResponse {
    pub post: Post,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePostRequest {
    #[serde(default)]
    pub edit_id: Option<String>,
    pub post_id: PostId,
}

#[derive(Debug, Serialize)]
pub struct DeletePostResponse {
    pub deleted: u64,
}

fn validate_text(text: &str, max_len: usize) -> Result<(), Error> {
    if text.is_empty() {
        return Err(Error::InvalidInput("\"text\" is not allowed to be empty".into()));
    }
    // UTF-16 code units, matching what browser clients count.
    let len = text.encode_utf16().count();
    if len > max_len {
        return Err(Error::InvalidInput(format!(
            "\"text\" length must be less than or equal to {max_len} characters long"
        )));
    }
    Ok(())
}

pub async fn list_posts(State(state): State<AppState>) -> ApiResult<Json<ListPostsResponse>> {
    let posts = state.board.list_posts().await?;
    Ok(Json(ListPostsResponse { posts }))
}

pub async fn create_post(
    State(state): State<AppState>, payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> ApiResult<Json<CreatePostResponse>> {
    let Json(req) = payload?;
    validate_text(&req.text, state.config.max_text_length)?;

    let (post, edit_id) = state.board.create_post(&req.text, req.post_type).await?;
    Ok(Json(CreatePostResponse { post, edit_id }))
}

pub async fn edit_post(
    State(state): State<AppState>, jar: CookieJar, payload: Result<Json<EditPostRequest>, JsonRejection>,
) -> ApiResult<Json<EditPostResponse>> {
    let Json(req) = payload?;
    validate_text(&req.text, state.config.max_text_length)?;

    let admin = state.admin(&jar);
    let post = state
        .board
        .edit_post(admin.as_ref(), req.edit_id.as_deref(), req.post_id, &req.text, req.post_type)
        .await?;
    Ok(Json(EditPostResponse { post }))
}

pub async fn delete_post(
    State(state): State<AppState>, jar: CookieJar, payload: Result<Json<DeletePostRequest>, JsonRejection>,
) -> ApiResult<Json<DeletePostResponse>> {
    let Json(req) = payload?;

    let admin = state.admin(&jar);
    let deleted = state
        .board
        .delete_post(admin.as_ref(), req.edit_id.as_deref(), req.post_id)
        .await?;
    Ok(Json(DeletePostResponse { deleted }))
}
