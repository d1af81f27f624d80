//! User services - Utenti e grafo delle amicizie
//!
//! L'amicizia è simmetrica per costruzione: ogni mutazione scrive o cancella
//! entrambe le direzioni in un'unica transazione lato repository.

use crate::core::{AppError, AppState};
use crate::dtos::{Page, PageQuery, PostDTO, UserDTO};
use crate::entities::User;
use crate::repositories::Read;
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[instrument(skip(state, current_user))]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
    Extension(current_user): Extension<User>,
) -> Result<Json<Page<UserDTO>>, AppError> {
    debug!("Listing users");
    let (limit, offset) = query.limit_offset();

    let users = state.user.find_all(limit, offset).await?;
    let total = state.user.count_all().await?;

    let dtos = users
        .into_iter()
        .map(|u| UserDTO::for_viewer(u, &current_user))
        .collect();

    Ok(Json(Page::new(dtos, &query, total)))
}

#[instrument(skip(state, current_user), fields(user_id = %user_id))]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Extension(current_user): Extension<User>,
) -> Result<Json<UserDTO>, AppError> {
    debug!("Fetching user by ID");
    let user = state.user.read(&user_id).await?.ok_or_else(|| {
        warn!("User not found: {}", user_id);
        AppError::not_found("notFound.user.byId").with_arg(user_id)
    })?;

    Ok(Json(UserDTO::for_viewer(user, &current_user)))
}

#[instrument(skip(state, current_user), fields(user_id = %user_id))]
pub async fn list_friends(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Query(query): Query<PageQuery>,
    Extension(current_user): Extension<User>,
) -> Result<Json<Page<UserDTO>>, AppError> {
    debug!("Listing friends");
    // 1. Verificare che l'utente richiesto esista
    // 2. Recuperare la pagina di amici e il conteggio totale
    // 3. Convertire in DTO con i campi filtrati per il viewer

    if state.user.read(&user_id).await?.is_none() {
        warn!("User not found: {}", user_id);
        return Err(AppError::not_found("notFound.user.byId").with_arg(user_id));
    }

    let (limit, offset) = query.limit_offset();

    let friends = state.user.find_friends(&user_id, limit, offset).await?;
    let total = state.user.count_friends(&user_id).await?;

    let dtos = friends
        .into_iter()
        .map(|u| UserDTO::for_viewer(u, &current_user))
        .collect();

    Ok(Json(Page::new(dtos, &query, total)))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, target = %target_id))]
pub async fn add_friend(
    State(state): State<Arc<AppState>>,
    Path(target_id): Path<i64>,
    Extension(current_user): Extension<User>, // ottenuto dall'autenticazione tramite token jwt
) -> Result<StatusCode, AppError> {
    debug!("Adding friend");
    // 1. Bloccare l'auto-amicizia (fail-fast, nessuna query)
    // 2. Verificare che il target esista
    // 3. Un utente PRIVATE non può essere aggiunto come amico
    // 4. Bloccare l'amicizia già presente
    // 5. Inserire entrambe le direzioni in un'unica transazione

    if current_user.user_id == target_id {
        warn!("User attempted to befriend himself");
        return Err(AppError::illegal_action("illegalAction.user.addHimself"));
    }

    let target = state.user.read(&target_id).await?.ok_or_else(|| {
        warn!("Target user not found: {}", target_id);
        AppError::not_found("notFound.user.byId").with_arg(target_id)
    })?;

    if target.is_private() {
        warn!("Attempted to befriend a private user");
        return Err(
            AppError::illegal_action("illegalAction.user.addPrivate").with_arg(target_id)
        );
    }

    if state
        .user
        .has_friendship(&current_user.user_id, &target_id)
        .await?
    {
        warn!("Friendship already present");
        return Err(
            AppError::illegal_action("illegalAction.user.addPresent").with_arg(target_id)
        );
    }

    state
        .user
        .add_friendship(&current_user.user_id, &target_id)
        .await?;

    info!("Friendship created");
    Ok(StatusCode::OK)
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, target = %target_id))]
pub async fn remove_friend(
    State(state): State<Arc<AppState>>,
    Path(target_id): Path<i64>,
    Extension(current_user): Extension<User>,
) -> Result<StatusCode, AppError> {
    debug!("Removing friend");
    // 1. Bloccare l'auto-rimozione (fail-fast, nessuna query)
    // 2. Verificare che il target esista
    // 3. Bloccare la rimozione di un'amicizia assente
    // 4. Cancellare entrambe le direzioni in un'unica transazione

    if current_user.user_id == target_id {
        warn!("User attempted to unfriend himself");
        return Err(
            AppError::illegal_action("illegalAction.user.removeHimself").with_arg(target_id)
        );
    }

    if state.user.read(&target_id).await?.is_none() {
        warn!("Target user not found: {}", target_id);
        return Err(AppError::not_found("notFound.user.byId").with_arg(target_id));
    }

    if !state
        .user
        .has_friendship(&current_user.user_id, &target_id)
        .await?
    {
        warn!("Friendship not present");
        return Err(
            AppError::illegal_action("illegalAction.user.removeAbsent").with_arg(target_id)
        );
    }

    state
        .user
        .remove_friendship(&current_user.user_id, &target_id)
        .await?;

    info!("Friendship removed");
    Ok(StatusCode::OK)
}

#[instrument(skip(state), fields(user_id = %user_id))]
pub async fn list_user_posts(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<PostDTO>>, AppError> {
    debug!("Listing posts by author");
    if state.user.read(&user_id).await?.is_none() {
        warn!("User not found: {}", user_id);
        return Err(AppError::not_found("notFound.user.byId").with_arg(user_id));
    }

    let (limit, offset) = query.limit_offset();

    let posts = state.post.find_all_by_author(&user_id, limit, offset).await?;
    let total = state.post.count_by_author(&user_id).await?;

    let dtos = posts.into_iter().map(PostDTO::from).collect();

    Ok(Json(Page::new(dtos, &query, total)))
}
