//! Chat services - Ciclo di vita delle chat e macchina a stati membri/owner
//!
//! Il predicato di ammissione comune è "pubblico oppure amico":
//! un utente entra in una chat (privata o di gruppo) solo se è PUBLIC
//! o se ha un'amicizia con chi lo sta aggiungendo.
//!
//! I lookup id+membro e id+owner rispondono 404 quando il predicato
//! fallisce: "non esiste" e "non autorizzato" producono la stessa
//! risposta.

use crate::core::{AppError, AppState};
use crate::dtos::{
    ChatDTO, CreateGroupDTO, Page, PageQuery, UpdateGroupDTO, UpdateGroupMembersDTO, UserDTO,
};
use crate::entities::{Chat, ChatType, User};
use crate::repositories::{Delete, Read};
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use axum_macros::debug_handler;
use futures_util::future::try_join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Predicato di ammissione: il target è raggiungibile da `user` se è
/// PUBLIC oppure se i due sono amici.
async fn is_public_or_friend(
    state: &AppState,
    user_id: &i64,
    target: &User,
) -> Result<bool, AppError> {
    if target.is_public() {
        return Ok(true);
    }
    Ok(state.user.has_friendship(user_id, &target.user_id).await?)
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn list_chats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
    Extension(current_user): Extension<User>,
) -> Result<Json<Page<ChatDTO>>, AppError> {
    debug!("Listing chats for user");
    let (limit, offset) = query.limit_offset();

    let chats = state
        .chat
        .find_all_by_member(&current_user.user_id, limit, offset)
        .await?;
    let total = state.chat.count_by_member(&current_user.user_id).await?;

    let dtos = chats.into_iter().map(ChatDTO::from).collect();

    Ok(Json(Page::new(dtos, &query, total)))
}

#[instrument(skip(state, current_user), fields(chat_id = %chat_id, user_id = %current_user.user_id))]
pub async fn get_chat(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<i64>,
    Extension(current_user): Extension<User>,
) -> Result<Json<ChatDTO>, AppError> {
    debug!("Fetching chat");
    let chat = state
        .chat
        .find_by_id_and_member(&chat_id, &current_user.user_id)
        .await?
        .ok_or_else(|| {
            warn!("Chat not found or requester is not a member");
            AppError::not_found("notFound.chat.byIdAndUser")
                .with_arg(chat_id)
                .with_arg(current_user.user_id)
        })?;

    Ok(Json(ChatDTO::from(chat)))
}

#[instrument(skip(state, current_user), fields(chat_id = %chat_id, user_id = %current_user.user_id))]
pub async fn list_chat_members(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<i64>,
    Query(query): Query<PageQuery>,
    Extension(current_user): Extension<User>,
) -> Result<Json<Page<UserDTO>>, AppError> {
    debug!("Listing chat members");
    // 1. Lookup id+membro (404 per chat inesistente o richiedente esterno)
    // 2. Pagina dei membri con join sugli utenti

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

    let members = state.chat.members(&chat_id, limit, offset).await?;
    let total = state.chat.count_members(&chat_id).await?;

    let dtos = members
        .into_iter()
        .map(|u| UserDTO::for_viewer(u, &current_user))
        .collect();

    Ok(Json(Page::new(dtos, &query, total)))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, target = %target_id))]
pub async fn create_private_chat(
    State(state): State<Arc<AppState>>,
    Path(target_id): Path<i64>,
    Extension(current_user): Extension<User>, // ottenuto dall'autenticazione tramite token jwt
) -> Result<(StatusCode, Json<ChatDTO>), AppError> {
    debug!("Creating private chat");
    // 1. Verificare che il target esista
    // 2. Al più una chat privata per coppia non ordinata di membri
    // 3. Predicato di ammissione pubblico-o-amico sul target
    // 4. Creare chat + entrambe le membership in un'unica transazione

    let target = state.user.read(&target_id).await?.ok_or_else(|| {
        warn!("Target user not found: {}", target_id);
        AppError::not_found("notFound.user.byId").with_arg(target_id)
    })?;

    if state
        .chat
        .find_private_between(&current_user.user_id, &target_id)
        .await?
        .is_some()
    {
        warn!("Private chat already exists for this pair");
        return Err(
            AppError::illegal_action("illegalAction.chat.private.alreadyExist")
                .with_arg(target_id),
        );
    }

    if !is_public_or_friend(&state, &current_user.user_id, &target).await? {
        warn!("Target is neither public nor a friend");
        return Err(
            AppError::illegal_action("illegalAction.chat.private.createNotFriend")
                .with_arg(target_id),
        );
    }

    let chat = state
        .chat
        .create_private(&current_user.user_id, &target_id)
        .await?;

    info!("Private chat created");
    Ok((StatusCode::CREATED, Json(ChatDTO::from(chat))))
}

#[instrument(skip(state, current_user, body), fields(creator = %current_user.user_id))]
pub async fn create_group(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<CreateGroupDTO>,
) -> Result<(StatusCode, Json<ChatDTO>), AppError> {
    debug!("Creating group chat");
    // 1. Validare il nome del gruppo
    // 2. Per ogni membro proposto (escluso il creatore): deve esistere e
    //    superare il predicato pubblico-o-amico rispetto al creatore
    // 3. Insieme finale = proposti U {creatore}, owner = creatore
    // 4. Creare chat + membership in un'unica transazione

    body.validate()?;

    let mut member_ids: HashSet<i64> = body.members.iter().copied().collect();
    member_ids.remove(&current_user.user_id);
    let member_ids: Vec<i64> = member_ids.into_iter().collect();

    // Lettura in parallelo dei membri proposti (lookup per primary key)
    let users = try_join_all(member_ids.iter().map(|id| state.user.read(id))).await?;

    for (member_id, member) in member_ids.iter().zip(users) {
        let member = member.ok_or_else(|| {
            warn!("Proposed member not found: {}", member_id);
            AppError::not_found("notFound.user.byId").with_arg(*member_id)
        })?;

        if !is_public_or_friend(&state, &current_user.user_id, &member).await? {
            warn!("Proposed member {} is neither public nor a friend", member_id);
            return Err(
                AppError::illegal_action("illegalAction.chat.group.addNotFriend")
                    .with_arg(*member_id),
            );
        }
    }

    let mut final_members: Vec<i64> = member_ids;
    final_members.push(current_user.user_id);
    final_members.sort_unstable();

    let chat = state
        .chat
        .create_group(&body.name, &current_user.user_id, &final_members)
        .await?;

    info!("Group chat created");
    Ok((StatusCode::CREATED, Json(ChatDTO::from(chat))))
}

#[instrument(skip(state, current_user, body), fields(chat_id = %chat_id, owner = %current_user.user_id))]
pub async fn update_group(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<i64>,
    Extension(current_user): Extension<User>,
    Json(body): Json<UpdateGroupDTO>,
) -> Result<Json<ChatDTO>, AppError> {
    debug!("Renaming group chat");
    // Solo l'owner può rinominare: lookup id+owner, 404 altrimenti

    body.validate()?;

    if state
        .chat
        .find_group_by_id_and_owner(&chat_id, &current_user.user_id)
        .await?
        .is_none()
    {
        warn!("Group not found or requester is not the owner");
        return Err(AppError::not_found("notFound.chat.group.byIdAndOwnerId")
            .with_arg(chat_id)
            .with_arg(current_user.user_id));
    }

    state.chat.update_name(&chat_id, &body.name).await?;

    let chat = state.chat.read(&chat_id).await?.ok_or_else(|| {
        AppError::not_found("notFound.chat.byIdAndUser").with_arg(chat_id)
    })?;

    info!("Group chat renamed");
    Ok(Json(ChatDTO::from(chat)))
}

#[debug_handler]
#[instrument(skip(state, current_user, body), fields(chat_id = %chat_id, owner = %current_user.user_id))]
pub async fn update_group_members(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<i64>,
    Extension(current_user): Extension<User>,
    Json(body): Json<UpdateGroupMembersDTO>,
) -> Result<Json<ChatDTO>, AppError> {
    debug!("Replacing group member set");
    // 1. Lookup id+owner (404 per gruppo inesistente o richiedente non owner)
    // 2. L'insieme proposto deve contenere l'owner corrente
    // 3. Solo i membri NUOVI vengono rivalidati col predicato pubblico-o-amico:
    //    chi era già dentro passa senza controlli
    // 4. Insieme finale = proposto, sostituito in un'unica transazione

    let chat = state
        .chat
        .find_group_by_id_and_owner(&chat_id, &current_user.user_id)
        .await?
        .ok_or_else(|| {
            warn!("Group not found or requester is not the owner");
            AppError::not_found("notFound.chat.group.byIdAndOwnerId")
                .with_arg(chat_id)
                .with_arg(current_user.user_id)
        })?;

    let proposed: HashSet<i64> = body.members.iter().copied().collect();

    let owner_id = chat.owner_id().unwrap_or(current_user.user_id);
    if !proposed.contains(&owner_id) {
        warn!("Proposed member set excludes the owner");
        return Err(
            AppError::illegal_action("illegalAction.chat.group.removeOwner")
                .with_arg(chat_id)
                .with_arg(owner_id),
        );
    }

    let current_members: HashSet<i64> =
        state.chat.member_ids(&chat_id).await?.into_iter().collect();

    // Solo i membri nuovi vengono letti e rivalidati; quelli già presenti
    // passano senza controlli
    let new_member_ids: Vec<i64> = proposed.difference(&current_members).copied().collect();

    let users =
        futures::future::try_join_all(new_member_ids.iter().map(|id| state.user.read(id))).await?;

    for (member_id, member) in new_member_ids.iter().zip(users) {
        let member = member.ok_or_else(|| {
            warn!("Proposed member not found: {}", member_id);
            AppError::not_found("notFound.user.byId").with_arg(*member_id)
        })?;

        if !is_public_or_friend(&state, &current_user.user_id, &member).await? {
            warn!("Proposed member {} is neither public nor a friend", member_id);
            return Err(
                AppError::illegal_action("illegalAction.chat.group.addNotFriend")
                    .with_arg(*member_id),
            );
        }
    }

    let mut final_members: Vec<i64> = proposed.into_iter().collect();
    final_members.sort_unstable();

    state.chat.replace_members(&chat_id, &final_members).await?;

    let chat = state.chat.read(&chat_id).await?.ok_or_else(|| {
        AppError::not_found("notFound.chat.byIdAndUser").with_arg(chat_id)
    })?;

    info!("Group member set replaced");
    Ok(Json(ChatDTO::from(chat)))
}

#[instrument(skip(state, current_user), fields(chat_id = %chat_id, owner = %current_user.user_id, new_owner = %new_owner_id))]
pub async fn change_owner(
    State(state): State<Arc<AppState>>,
    Path((chat_id, new_owner_id)): Path<(i64, i64)>,
    Extension(current_user): Extension<User>,
) -> Result<Json<ChatDTO>, AppError> {
    debug!("Transferring group ownership");
    // 1. Lookup id+owner (404 altrimenti)
    // 2. Il nuovo owner deve essere già membro
    // 3. Riassegnare il campo owner (il nuovo owner resta membro)

    if state
        .chat
        .find_group_by_id_and_owner(&chat_id, &current_user.user_id)
        .await?
        .is_none()
    {
        warn!("Group not found or requester is not the owner");
        return Err(AppError::not_found("notFound.chat.group.byIdAndOwnerId")
            .with_arg(chat_id)
            .with_arg(current_user.user_id));
    }

    let member_ids = state.chat.member_ids(&chat_id).await?;
    if !member_ids.contains(&new_owner_id) {
        warn!("New owner is not a member of the group");
        return Err(
            AppError::illegal_action("illegalAction.chat.group.setOwnerNotMember")
                .with_arg(chat_id)
                .with_arg(new_owner_id),
        );
    }

    state.chat.set_owner(&chat_id, &new_owner_id).await?;

    let chat = state.chat.read(&chat_id).await?.ok_or_else(|| {
        AppError::not_found("notFound.chat.byIdAndUser").with_arg(chat_id)
    })?;

    info!("Ownership transferred");
    Ok(Json(ChatDTO::from(chat)))
}

#[instrument(skip(state, current_user), fields(chat_id = %chat_id, user_id = %current_user.user_id))]
pub async fn leave_group(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<i64>,
    Extension(current_user): Extension<User>,
) -> Result<StatusCode, AppError> {
    debug!("Leaving group chat");
    // 1. Lookup id+membro limitato alle chat di gruppo (404 altrimenti)
    // 2. L'owner non può uscire senza prima trasferire la ownership
    // 3. Rimuovere il membro

    let chat = state
        .chat
        .find_by_id_and_member_of_type(&chat_id, &current_user.user_id, ChatType::Group)
        .await?
        .ok_or_else(|| {
            warn!("Group not found or requester is not a member");
            AppError::not_found("notFound.chat.group.byIdAndUser")
                .with_arg(chat_id)
                .with_arg(current_user.user_id)
        })?;

    if let Chat::Group { owner_id, .. } = &chat {
        if *owner_id == current_user.user_id {
            warn!("Owner attempted to leave the group");
            return Err(
                AppError::illegal_action("illegalAction.chat.group.leaveOwner").with_arg(chat_id),
            );
        }
    }

    state
        .chat
        .remove_member(&chat_id, &current_user.user_id)
        .await?;

    info!("User left the group");
    Ok(StatusCode::OK)
}

#[instrument(skip(state, current_user), fields(chat_id = %chat_id, owner = %current_user.user_id))]
pub async fn delete_group(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<i64>,
    Extension(current_user): Extension<User>,
) -> Result<StatusCode, AppError> {
    debug!("Deleting group chat");
    // Solo l'owner può cancellare il gruppo: lookup id+owner, 404 altrimenti.
    // Hard delete: membri e messaggi vengono eliminati via CASCADE.

    if state
        .chat
        .find_group_by_id_and_owner(&chat_id, &current_user.user_id)
        .await?
        .is_none()
    {
        warn!("Group not found or requester is not the owner");
        return Err(AppError::not_found("notFound.chat.group.byIdAndOwnerId")
            .with_arg(chat_id)
            .with_arg(current_user.user_id));
    }

    state.chat.delete(&chat_id).await?;

    info!("Group chat deleted");
    Ok(StatusCode::OK)
}

#[instrument(skip(state, current_user), fields(chat_id = %chat_id, user_id = %current_user.user_id))]
pub async fn delete_private_chat(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<i64>,
    Extension(current_user): Extension<User>,
) -> Result<StatusCode, AppError> {
    debug!("Deleting private chat");
    // Basta la membership (le chat private non hanno owner): 404 altrimenti.

    if state
        .chat
        .find_by_id_and_member_of_type(&chat_id, &current_user.user_id, ChatType::Private)
        .await?
        .is_none()
    {
        warn!("Private chat not found or requester is not a member");
        return Err(AppError::not_found("notFound.chat.byIdAndUser")
            .with_arg(chat_id)
            .with_arg(current_user.user_id));
    }

    state.chat.delete(&chat_id).await?;

    info!("Private chat deleted");
    Ok(StatusCode::OK)
}
