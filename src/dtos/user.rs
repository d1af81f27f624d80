//! User DTOs - Data Transfer Objects per utenti

use crate::entities::{Publicity, User};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

lazy_static! {
    static ref USERNAME_RE: Regex = Regex::new(r"^[a-zA-Z0-9_]{3,32}$").unwrap();
}

// struct per gestire io col client
#[derive(Serialize, Deserialize, Debug)]
pub struct UserDTO {
    pub user_id: i64,
    // serializzata solo per il proprietario o per moderatori/admin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub publicity: Publicity,
    pub moder: bool,
}

impl UserDTO {
    /// Rappresentazione vista da `viewer`: l'email è visibile solo al
    /// proprietario del profilo o a un moderatore/admin.
    pub fn for_viewer(user: User, viewer: &User) -> Self {
        let can_see_email = viewer.user_id == user.user_id || viewer.moder || viewer.admin;
        let mut dto = UserDTO::from(user);
        if !can_see_email {
            dto.email = None;
        }
        dto
    }
}

impl From<User> for UserDTO {
    fn from(value: User) -> Self {
        Self {
            user_id: value.user_id,
            email: Some(value.email),
            username: value.username,
            first_name: value.first_name,
            last_name: value.last_name,
            publicity: value.publicity,
            moder: value.moder,
            // la password non viene mai esposta al client
        }
    }
}

/// DTO per la registrazione di un nuovo account
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateUserDTO {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(regex(
        path = *USERNAME_RE,
        message = "Username must be 3-32 characters, letters, digits or underscore"
    ))]
    pub username: String,

    #[validate(length(min = 1, max = 64, message = "First name must be 1-64 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 64, message = "Last name must be 1-64 characters"))]
    pub last_name: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub password: String,
}

/// DTO per l'aggiornamento parziale dell'account (solo i campi Some vengono modificati)
#[derive(Serialize, Deserialize, Debug, Clone, Validate, Default)]
pub struct UpdateUserDTO {
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    #[validate(regex(
        path = *USERNAME_RE,
        message = "Username must be 3-32 characters, letters, digits or underscore"
    ))]
    pub username: Option<String>,

    #[validate(length(min = 1, max = 64, message = "First name must be 1-64 characters"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 64, message = "Last name must be 1-64 characters"))]
    pub last_name: Option<String>,

    pub publicity: Option<Publicity>,
}

/// DTO per il cambio password: richiede la password attuale
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct PasswordDTO {
    pub actual: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub change: String,
}

/// DTO per la cancellazione dell'account: richiede la password attuale
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DeleteUserDTO {
    pub password: String,
}

/// DTO per l'aggiornamento del flag moderatore
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RoleDTO {
    pub moder: bool,
}
