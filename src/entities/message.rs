//! Message entity - Entità messaggio

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Message {
    pub message_id: i64,
    pub chat_id: i64,
    pub author_id: i64,
    pub body: String,
    // il server si aspetta una stringa iso8601 che serde converte in DateTime Utc
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
