//! Message services - CRUD dei messaggi scoped sulla membership della chat

use crate::core::{AppError, AppState};
use crate::dtos::{CreateMessageDTO, MessageDTO, Page, PageQuery, UpdateMessageDTO};
use crate::entities::User;
use crate::repositories::{Delete, Update};
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

#[instrument(skip(state, current_user), fields(chat_id = %chat_id, user_id = %current_user.user_id))]
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<i64>,
    Query(query): Query<PageQuery>,
    Extension(current_user): Extension<User>,
) -> Result<Json<Page<MessageDTO>>, AppError> {
    debug!("Listing chat messages");
    // 1. Risolvere la chat con il lookup id+membro (404 per i non membri)
    // 2. Pagina dei messaggi dal più vecchio al più recente

    if state
        .chat
        .find_by_id_and_member(&chat_id, &current_user.user_id)
        .await?
        .is_none()
    {
        warn!("Chat not found or requester is not a member");
        return Err(AppError::not_found("notFound.chat.byIdAndUser")
            .with_arg(chat_id)
            .with_arg(current_user.user_id));
    }

    let (limit, offset) = query.limit_offset();

    let messages = state.msg.find_all_by_chat(&chat_id, limit, offset).await?;
    let total = state.msg.count_by_chat(&chat_id).await?;

    let dtos = messages.into_iter().map(MessageDTO::from).collect();

    Ok(Json(Page::new(dtos, &query, total)))
}

#[instrument(skip(state, current_user, body), fields(chat_id = %chat_id, author = %current_user.user_id))]
pub async fn create_message(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<i64>,
    Extension(current_user): Extension<User>, // ottenuto dall'autenticazione tramite token jwt
    Json(body): Json<CreateMessageDTO>,
) -> Result<(StatusCode, Json<MessageDTO>), AppError> {
    debug!("Creating message");
    // 1. Validare il body
    // 2. Risolvere la chat con il lookup id+membro (404 per i non membri)
    // 3. Salvare il messaggio

    body.validate()?;

    if state
        .chat
        .find_by_id_and_member(&chat_id, &current_user.user_id)
        .await?
        .is_none()
    {
        warn!("Chat not found or requester is not a member");
        return Err(AppError::not_found("notFound.chat.byIdAndUser")
            .with_arg(chat_id)
            .with_arg(current_user.user_id));
    }

    let message = state
        .msg
        .create(&chat_id, &current_user.user_id, &body)
        .await?;

    info!("Message created with id {}", message.message_id);
    Ok((StatusCode::CREATED, Json(MessageDTO::from(message))))
}

#[instrument(skip(state, current_user, body), fields(message_id = %message_id, author = %current_user.user_id))]
pub async fn update_message(
    State(state): State<Arc<AppState>>,
    Path((_chat_id, message_id)): Path<(i64, i64)>,
    Extension(current_user): Extension<User>,
    Json(body): Json<UpdateMessageDTO>,
) -> Result<Json<MessageDTO>, AppError> {
    debug!("Updating message");
    // Lookup id+autore: un messaggio altrui risponde 404, non 403

    body.validate()?;

    if state
        .msg
        .find_by_id_and_author(&message_id, &current_user.user_id)
        .await?
        .is_none()
    {
        warn!("Message not found for this author");
        return Err(AppError::not_found("notFound.message.byIdAndAuthor")
            .with_arg(message_id)
            .with_arg(current_user.user_id));
    }

    let message = state.msg.update(&message_id, &body).await?;

    info!("Message updated");
    Ok(Json(MessageDTO::from(message)))
}

#[instrument(skip(state, current_user), fields(message_id = %message_id, author = %current_user.user_id))]
pub async fn delete_message(
    State(state): State<Arc<AppState>>,
    Path((_chat_id, message_id)): Path<(i64, i64)>,
    Extension(current_user): Extension<User>,
) -> Result<StatusCode, AppError> {
    debug!("Deleting message");
    if state
        .msg
        .find_by_id_and_author(&message_id, &current_user.user_id)
        .await?
        .is_none()
    {
        warn!("Message not found for this author");
        return Err(AppError::not_found("notFound.message.byIdAndAuthor")
            .with_arg(message_id)
            .with_arg(current_user.user_id));
    }

    state.msg.delete(&message_id).await?;

    info!("Message deleted");
    Ok(StatusCode::OK)
}
