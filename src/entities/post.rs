//! Post entity - Entità post

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Post {
    pub post_id: i64,
    pub author_id: i64,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    // NULL finché il post non viene modificato la prima volta
    pub updated_at: Option<DateTime<Utc>>,
}
