//! Account services - Registrazione, login e gestione dell'account corrente

use crate::core::{AppError, AppState, encode_jwt};
use crate::dtos::{CreateUserDTO, DeleteUserDTO, PasswordDTO, RoleDTO, UpdateUserDTO, UserDTO};
use crate::entities::User;
use crate::repositories::{Create, Delete, Update};
use axum::{
    Extension,
    extract::{Json, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;
use validator::Validate;

/// DTO per il login (solo username e password)
#[derive(serde::Deserialize)]
pub struct LoginDTO {
    pub username: String,
    pub password: String,
}

pub async fn login_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginDTO>, // JSON body
) -> Result<impl IntoResponse, AppError> {
    // 1. Cercare l'utente nel database tramite username
    // 2. Se l'utente non esiste, ritornare errore UNAUTHORIZED senza distinguere il caso
    // 3. Verificare che la password fornita corrisponda all'hash memorizzato
    // 4. Generare un token JWT con userid, username e il segreto
    // 5. Costruire un cookie HttpOnly, Secure, SameSite=Lax con il token e durata 24 ore
    // 6. Ritornare StatusCode::OK con gli headers Set-Cookie e Authorization

    let user = match state.user.find_by_username(&body.username).await? {
        Some(user) => user,
        None => return Err(AppError::unauthorized("unauthorized.credentials")),
    };

    if !user.verify_password(&body.password) {
        return Err(AppError::unauthorized("unauthorized.credentials"));
    }

    let token = encode_jwt(user.username, user.user_id, &state.jwt_secret)?;

    let cookie_value = format!(
        "token={}; HttpOnly; Secure; SameSite=Lax; Max-Age={}",
        token,
        24 * 60 * 60
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        "Set-Cookie",
        HeaderValue::from_str(&cookie_value)
            .map_err(|_| AppError::internal_server_error("internal.header"))?,
    );
    headers.insert(
        "Authorization",
        HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| AppError::internal_server_error("internal.header"))?,
    );

    Ok((StatusCode::OK, headers))
}

pub async fn register_account(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateUserDTO>, // JSON body
) -> Result<impl IntoResponse, AppError> {
    // 1. Validare il DTO con validator (formato email/username, lunghezza password)
    // 2. Controllare se esiste già un utente con la stessa email o lo stesso username
    // 3. In caso di duplicato, ritornare errore CONFLICT
    // 4. Generare l'hash bcrypt della password fornita
    // 5. Salvare il nuovo utente (publicity di default: PRIVATE)
    // 6. Generare il token JWT per il nuovo account
    // 7. Ritornare il DTO dell'utente creato con gli headers di autenticazione

    body.validate()?;

    if state.user.find_by_email(&body.email).await?.is_some() {
        return Err(AppError::conflict("conflict.user.emailPresent"));
    }

    if state.user.find_by_username(&body.username).await?.is_some() {
        return Err(AppError::conflict("conflict.user.usernamePresent"));
    }

    let password_hash = User::hash_password(&body.password)?;

    let new_user = CreateUserDTO {
        password: password_hash,
        ..body
    };

    let created_user = state.user.create(&new_user).await?;

    let token = encode_jwt(
        created_user.username.clone(),
        created_user.user_id,
        &state.jwt_secret,
    )?;

    let mut headers = HeaderMap::new();
    headers.insert(
        "Authorization",
        HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| AppError::internal_server_error("internal.header"))?,
    );

    Ok((
        StatusCode::CREATED,
        headers,
        Json(UserDTO::from(created_user)),
    ))
}

pub async fn get_account(
    Extension(current_user): Extension<User>, // ottenuto dall'autenticazione tramite token jwt
) -> Result<Json<UserDTO>, AppError> {
    // L'account del principal corrente: l'email è sempre visibile a se stessi
    Ok(Json(UserDTO::from(current_user)))
}

pub async fn update_account(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<UpdateUserDTO>, // JSON body
) -> Result<Json<UserDTO>, AppError> {
    // 1. Validare il DTO (solo i campi presenti)
    // 2. Se email o username cambiano, verificare che non siano già in uso
    // 3. Aggiornare solo i campi presenti (update parziale lato repository)
    // 4. Ritornare il DTO aggiornato

    body.validate()?;

    if let Some(ref email) = body.email {
        if let Some(other) = state.user.find_by_email(email).await? {
            if other.user_id != current_user.user_id {
                return Err(AppError::conflict("conflict.user.emailPresent"));
            }
        }
    }

    if let Some(ref username) = body.username {
        if let Some(other) = state.user.find_by_username(username).await? {
            if other.user_id != current_user.user_id {
                return Err(AppError::conflict("conflict.user.usernamePresent"));
            }
        }
    }

    let updated = state.user.update(&current_user.user_id, &body).await?;

    Ok(Json(UserDTO::from(updated)))
}

pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<PasswordDTO>, // JSON body
) -> Result<StatusCode, AppError> {
    // 1. Validare la nuova password
    // 2. Verificare la password attuale, altrimenti wrongCredentials
    // 3. Salvare il nuovo hash

    body.validate()?;

    if !current_user.verify_password(&body.actual) {
        return Err(AppError::wrong_credentials("wrongCredentials.password"));
    }

    let password_hash = User::hash_password(&body.change)?;

    state
        .user
        .update_password(&current_user.user_id, &password_hash)
        .await?;

    Ok(StatusCode::OK)
}

pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<DeleteUserDTO>, // JSON body
) -> Result<impl IntoResponse, AppError> {
    // 1. Verificare la password attuale, altrimenti wrongCredentials
    // 2. Hard delete della riga utente: le CASCADE ripuliscono amicizie,
    //    post, commenti, membership e messaggi
    // 3. Cookie con Max-Age=0 per forzare il logout lato client

    if !current_user.verify_password(&body.password) {
        return Err(AppError::wrong_credentials("wrongCredentials.password"));
    }

    state.user.delete(&current_user.user_id).await?;

    let cookie = "token=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0";
    let mut headers = HeaderMap::new();
    headers.insert(
        "Set-Cookie",
        HeaderValue::from_str(cookie)
            .map_err(|_| AppError::internal_server_error("internal.header"))?,
    );

    Ok((StatusCode::OK, headers))
}

pub async fn update_role(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<RoleDTO>, // JSON body
) -> Result<Json<UserDTO>, AppError> {
    let updated = state
        .user
        .update_role(&current_user.user_id, body.moder)
        .await?;

    Ok(Json(UserDTO::from(updated)))
}
