//! Comment services - Commenti gated sulla publicity dell'autore del post
//!
//! La visibilità per commentare dipende dal livello dell'AUTORE DEL POST,
//! non da quello di chi commenta.

use crate::core::{AppError, AppState};
use crate::dtos::{CommentDTO, CreateCommentDTO, Page, PageQuery, UpdateCommentDTO};
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

#[instrument(skip(state), fields(post_id = %post_id))]
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<CommentDTO>>, AppError> {
    debug!("Listing comments for post");
    if state.post.read(&post_id).await?.is_none() {
        warn!("Post not found: {}", post_id);
        return Err(AppError::not_found("notFound.post.byId").with_arg(post_id));
    }

    let (limit, offset) = query.limit_offset();

    let comments = state.comment.find_all_by_post(&post_id, limit, offset).await?;
    let total = state.comment.count_by_post(&post_id).await?;

    let dtos = comments.into_iter().map(CommentDTO::from).collect();

    Ok(Json(Page::new(dtos, &query, total)))
}

#[instrument(skip(state, current_user, body), fields(post_id = %post_id, commenter = %current_user.user_id))]
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<i64>,
    Extension(current_user): Extension<User>, // ottenuto dall'autenticazione tramite token jwt
    Json(body): Json<CreateCommentDTO>,
) -> Result<(StatusCode, Json<CommentDTO>), AppError> {
    debug!("Creating comment");
    // 1. Validare il body
    // 2. Recuperare il post, altrimenti 404
    // 3. Recuperare l'autore del post: il gate si valuta sulla SUA publicity
    // 4. PRIVATE: può commentare solo l'autore stesso
    // 5. INTERNAL: può commentare solo un amico dell'autore
    // 6. PUBLIC: chiunque sia autenticato
    // 7. Salvare il commento

    body.validate()?;

    let post = state.post.read(&post_id).await?.ok_or_else(|| {
        warn!("Post not found: {}", post_id);
        AppError::not_found("notFound.post.byId").with_arg(post_id)
    })?;

    let post_author = state.user.read(&post.author_id).await?.ok_or_else(|| {
        warn!("Post author not found: {}", post.author_id);
        AppError::not_found("notFound.user.byId").with_arg(post.author_id)
    })?;

    if post_author.is_private() && post_author.user_id != current_user.user_id {
        warn!("Comment rejected: private post author");
        return Err(AppError::illegal_action("illegalAction.comment.privatePost"));
    }

    // NB: il gate INTERNAL richiede l'amicizia e basta, senza eccezione per
    // l'autore stesso (nessuno è amico di se stesso)
    if post_author.is_internal()
        && !state
            .user
            .has_friendship(&post_author.user_id, &current_user.user_id)
            .await?
    {
        warn!("Comment rejected: commenter is not a friend of the author");
        return Err(AppError::illegal_action("illegalAction.comment.internalPost"));
    }

    let comment = state
        .comment
        .create(&post_id, &current_user.user_id, &body)
        .await?;

    info!("Comment created with id {}", comment.comment_id);
    Ok((StatusCode::CREATED, Json(CommentDTO::from(comment))))
}

#[instrument(skip(state, current_user, body), fields(comment_id = %comment_id, author = %current_user.user_id))]
pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    Path((_post_id, comment_id)): Path<(i64, i64)>,
    Extension(current_user): Extension<User>,
    Json(body): Json<UpdateCommentDTO>,
) -> Result<Json<CommentDTO>, AppError> {
    debug!("Updating comment");
    // Lookup id+autore: un commento altrui risponde 404, non 403

    body.validate()?;

    if state
        .comment
        .find_by_id_and_author(&comment_id, &current_user.user_id)
        .await?
        .is_none()
    {
        warn!("Comment not found for this author");
        return Err(AppError::not_found("notFound.comment.byIdAndAuthor")
            .with_arg(comment_id)
            .with_arg(current_user.user_id));
    }

    let comment = state.comment.update(&comment_id, &body).await?;

    info!("Comment updated");
    Ok(Json(CommentDTO::from(comment)))
}

#[instrument(skip(state, current_user), fields(comment_id = %comment_id, author = %current_user.user_id))]
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Path((_post_id, comment_id)): Path<(i64, i64)>,
    Extension(current_user): Extension<User>,
) -> Result<StatusCode, AppError> {
    debug!("Deleting comment");
    if state
        .comment
        .find_by_id_and_author(&comment_id, &current_user.user_id)
        .await?
        .is_none()
    {
        warn!("Comment not found for this author");
        return Err(AppError::not_found("notFound.comment.byIdAndAuthor")
            .with_arg(comment_id)
            .with_arg(current_user.user_id));
    }

    state.comment.delete(&comment_id).await?;

    info!("Comment deleted");
    Ok(StatusCode::OK)
}
