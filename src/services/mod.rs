//! Services module - Coordinatore per tutti i service handler HTTP
//!
//! Questo modulo organizza i service handlers in sotto-moduli separati per una migliore manutenibilità.
//! Ogni modulo gestisce gli endpoint HTTP per una specifica funzionalità.

pub mod account;
pub mod chat;
pub mod comment;
pub mod message;
pub mod post;
pub mod user;

// Re-exports per facilitare l'import
pub use account::{
    change_password, delete_account, get_account, login_user, register_account, update_account,
    update_role,
};
pub use chat::{
    change_owner, create_group, create_private_chat, delete_group, delete_private_chat, get_chat,
    leave_group, list_chat_members, list_chats, update_group, update_group_members,
};
pub use comment::{create_comment, delete_comment, list_comments, update_comment};
pub use message::{create_message, delete_message, list_messages, update_message};
pub use post::{create_post, delete_post, get_post, list_posts, update_post};
pub use user::{add_friend, get_user, list_friends, list_user_posts, list_users, remove_friend};

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Root endpoint - health check
pub async fn root(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}
