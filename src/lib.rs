//! Server library - espone i moduli principali per i test

pub mod core;
pub mod dtos;
pub mod entities;
pub mod repositories;
pub mod services;

// Re-export dei tipi principali per facilitare l'import
pub use self::core::{AppError, AppState};
pub use services::root;

use axum::{
    Router, middleware,
    routing::{delete, get, patch, post, put},
};
use std::sync::Arc;

/// Crea il router principale dell'applicazione
pub fn create_router(state: Arc<AppState>) -> Router {
    use services::*;

    Router::new()
        .route("/", get(root))
        .nest("/auth", configure_auth_routes())
        .merge(configure_account_routes(state.clone()))
        .nest("/users", configure_user_routes(state.clone()))
        .nest("/posts", configure_post_routes(state.clone()))
        .nest("/chats", configure_chat_routes(state.clone()))
        .with_state(state)
}

/// Configura le routes di autenticazione (login)
fn configure_auth_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new().route("/login", post(login_user))
}

/// Configura le routes dell'account corrente.
/// La registrazione è pubblica, tutto il resto richiede autenticazione.
fn configure_account_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    let public_routes = Router::new().route("/account", post(register_account));

    let protected_routes = Router::new()
        .route(
            "/account",
            get(get_account).patch(update_account).delete(delete_account),
        )
        .route("/account/password", put(change_password))
        .route("/account/role", patch(update_role))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ));

    public_routes.merge(protected_routes)
}

/// Configura le routes per utenti, amicizie e chat private
fn configure_user_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/", get(list_users))
        .route("/{id}", get(get_user))
        .route(
            "/{id}/friends",
            get(list_friends).post(add_friend).delete(remove_friend),
        )
        .route("/{id}/posts", get(list_user_posts))
        .route("/{id}/chats/private", post(create_private_chat))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

/// Configura le routes per post e commenti
fn configure_post_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route(
            "/{id}",
            get(get_post).patch(update_post).delete(delete_post),
        )
        .route(
            "/{id}/comments",
            get(list_comments).post(create_comment),
        )
        .route(
            "/{id}/comments/{comment_id}",
            patch(update_comment).delete(delete_comment),
        )
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

/// Configura le routes per chat e messaggi
fn configure_chat_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/", get(list_chats))
        .route("/group", post(create_group))
        .route(
            "/group/{id}",
            patch(update_group).put(leave_group).delete(delete_group),
        )
        .route("/group/{id}/members", put(update_group_members))
        .route("/group/{id}/members/{new_owner_id}", put(change_owner))
        .route("/private/{id}", delete(delete_private_chat))
        .route("/{id}", get(get_chat))
        .route("/{id}/members", get(list_chat_members))
        .route(
            "/{id}/messages",
            get(list_messages).post(create_message),
        )
        .route(
            "/{id}/messages/{message_id}",
            patch(update_message).delete(delete_message),
        )
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}
