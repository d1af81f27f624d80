//! Message DTOs - Data Transfer Objects per messaggi

use crate::entities::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Struct per gestire io col client
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MessageDTO {
    pub message_id: i64,
    pub chat_id: i64,
    pub author_id: i64,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Message> for MessageDTO {
    fn from(value: Message) -> Self {
        Self {
            message_id: value.message_id,
            chat_id: value.chat_id,
            author_id: value.author_id,
            body: value.body,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// DTO per creare un nuovo messaggio
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateMessageDTO {
    #[validate(length(
        min = 1,
        max = 5000,
        message = "Message content must be between 1 and 5000 characters"
    ))]
    pub body: String,
}

/// DTO per aggiornare un messaggio (solo campi modificabili)
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct UpdateMessageDTO {
    #[validate(length(
        min = 1,
        max = 5000,
        message = "Message content must be between 1 and 5000 characters"
    ))]
    pub body: String,
}
