//! Post services - CRUD dei post gated sull'identità dell'autore

use crate::core::{AppError, AppState};
use crate::dtos::{CreatePostDTO, Page, PageQuery, PostDTO, UpdatePostDTO};
use crate::entities::User;
use crate::repositories::{Delete, Read, Update};
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

#[instrument(skip(state))]
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<PostDTO>>, AppError> {
    debug!("Listing posts");
    let (limit, offset) = query.limit_offset();

    let posts = state.post.find_all(limit, offset).await?;
    let total = state.post.count_all().await?;

    let dtos = posts.into_iter().map(PostDTO::from).collect();

    Ok(Json(Page::new(dtos, &query, total)))
}

#[instrument(skip(state, current_user, body), fields(author = %current_user.user_id))]
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>, // ottenuto dall'autenticazione tramite token jwt
    Json(body): Json<CreatePostDTO>,
) -> Result<(StatusCode, Json<PostDTO>), AppError> {
    debug!("Creating post");
    body.validate()?;

    let post = state.post.create(&current_user.user_id, &body).await?;

    info!("Post created with id {}", post.post_id);
    Ok((StatusCode::CREATED, Json(PostDTO::from(post))))
}

#[instrument(skip(state), fields(post_id = %post_id))]
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<i64>,
) -> Result<Json<PostDTO>, AppError> {
    debug!("Fetching post by ID");
    let post = state.post.read(&post_id).await?.ok_or_else(|| {
        warn!("Post not found: {}", post_id);
        AppError::not_found("notFound.post.byId").with_arg(post_id)
    })?;

    Ok(Json(PostDTO::from(post)))
}

#[instrument(skip(state, current_user, body), fields(post_id = %post_id, author = %current_user.user_id))]
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<i64>,
    Extension(current_user): Extension<User>,
    Json(body): Json<UpdatePostDTO>,
) -> Result<Json<PostDTO>, AppError> {
    debug!("Updating post");
    // 1. Lookup id+autore: un post altrui risponde 404, non 403
    // 2. Update parziale con timestamp updated_at

    body.validate()?;

    if state
        .post
        .find_by_id_and_author(&post_id, &current_user.user_id)
        .await?
        .is_none()
    {
        warn!("Post not found for this author");
        return Err(AppError::not_found("notFound.post.byIdAndAuthorId")
            .with_arg(post_id)
            .with_arg(current_user.user_id));
    }

    let post = state.post.update(&post_id, &body).await?;

    info!("Post updated");
    Ok(Json(PostDTO::from(post)))
}

#[instrument(skip(state, current_user), fields(post_id = %post_id, author = %current_user.user_id))]
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<i64>,
    Extension(current_user): Extension<User>,
) -> Result<StatusCode, AppError> {
    debug!("Deleting post");
    if state
        .post
        .find_by_id_and_author(&post_id, &current_user.user_id)
        .await?
        .is_none()
    {
        warn!("Post not found for this author");
        return Err(AppError::not_found("notFound.post.byIdAndAuthorId")
            .with_arg(post_id)
            .with_arg(current_user.user_id));
    }

    state.post.delete(&post_id).await?;

    info!("Post deleted");
    Ok(StatusCode::OK)
}
