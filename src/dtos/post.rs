//! Post DTOs - Data Transfer Objects per post

use crate::entities::Post;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Struct per gestire io col client
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PostDTO {
    pub post_id: i64,
    pub author_id: i64,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Post> for PostDTO {
    fn from(value: Post) -> Self {
        Self {
            post_id: value.post_id,
            author_id: value.author_id,
            title: value.title,
            body: value.body,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// DTO per creare un nuovo post (senza post_id)
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreatePostDTO {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,

    #[validate(length(
        min = 1,
        max = 10000,
        message = "Post body must be between 1 and 10000 characters"
    ))]
    pub body: String,
}

/// DTO per aggiornare un post (solo campi modificabili)
#[derive(Serialize, Deserialize, Debug, Clone, Validate, Default)]
pub struct UpdatePostDTO {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,

    #[validate(length(
        min = 1,
        max = 10000,
        message = "Post body must be between 1 and 10000 characters"
    ))]
    pub body: Option<String>,
}
