//! User entity - Entità utente con metodi per gestione password e visibilità

use bcrypt::{DEFAULT_COST, hash, verify};
use serde::{Deserialize, Serialize};

use super::enums::Publicity;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub user_id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub publicity: Publicity,
    pub moder: bool,
    pub admin: bool,
}

impl User {
    /// Verify if target_password matches the stored hashed password
    pub fn verify_password(&self, target_password: &str) -> bool {
        verify(target_password, &self.password).unwrap_or(false)
    }

    /// Hash a password using bcrypt with default cost
    pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
        let hash = hash(password, DEFAULT_COST)?;
        Ok(hash)
    }

    pub fn is_public(&self) -> bool {
        self.publicity == Publicity::Public
    }

    pub fn is_internal(&self) -> bool {
        self.publicity == Publicity::Internal
    }

    pub fn is_private(&self) -> bool {
        self.publicity == Publicity::Private
    }
}
