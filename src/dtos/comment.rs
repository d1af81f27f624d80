//! Comment DTOs - Data Transfer Objects per commenti

use crate::entities::Comment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Struct per gestire io col client
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CommentDTO {
    pub comment_id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Comment> for CommentDTO {
    fn from(value: Comment) -> Self {
        Self {
            comment_id: value.comment_id,
            post_id: value.post_id,
            author_id: value.author_id,
            body: value.body,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// DTO per creare un nuovo commento
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateCommentDTO {
    #[validate(length(
        min = 1,
        max = 2000,
        message = "Comment body must be between 1 and 2000 characters"
    ))]
    pub body: String,
}

/// DTO per aggiornare un commento
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct UpdateCommentDTO {
    #[validate(length(
        min = 1,
        max = 2000,
        message = "Comment body must be between 1 and 2000 characters"
    ))]
    pub body: String,
}
