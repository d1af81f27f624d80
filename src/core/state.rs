//! Application State - Stato globale dell'applicazione
//!
//! Contiene tutti i repository, configurazioni e stato condiviso
//! necessario per gestire l'applicazione.

use crate::repositories::{
    ChatRepository, CommentRepository, MessageRepository, PostRepository, UserRepository,
};
use sqlx::SqlitePool;

/// Stato globale dell'applicazione condiviso tra tutte le route e middleware
pub struct AppState {
    /// Repository per la gestione degli utenti e delle amicizie
    pub user: UserRepository,

    /// Repository per la gestione dei post
    pub post: PostRepository,

    /// Repository per la gestione dei commenti
    pub comment: CommentRepository,

    /// Repository per la gestione delle chat e dei membri
    pub chat: ChatRepository,

    /// Repository per la gestione dei messaggi
    pub msg: MessageRepository,

    /// Secret key per JWT token
    pub jwt_secret: String,
}

impl AppState {
    /// Crea una nuova istanza di AppState inizializzando tutti i repository
    /// con il pool di connessioni fornito e la JWT secret.
    pub fn new(pool: SqlitePool, jwt_secret: String) -> Self {
        Self {
            user: UserRepository::new(pool.clone()),
            post: PostRepository::new(pool.clone()),
            comment: CommentRepository::new(pool.clone()),
            chat: ChatRepository::new(pool.clone()),
            msg: MessageRepository::new(pool),
            jwt_secret,
        }
    }
}
