//! Chat entity - Entità chat come variante taggata
//!
//! Una chat è privata (due membri, nessun owner, non rinominabile) oppure
//! di gruppo (nome, un owner che è sempre anche membro). I membri vivono
//! nella tabella chat_members e sono referenziati per id.

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use super::enums::ChatType;

#[derive(Debug, Clone, PartialEq)]
pub enum Chat {
    Private {
        chat_id: i64,
    },
    Group {
        chat_id: i64,
        name: String,
        owner_id: i64,
    },
}

impl Chat {
    pub fn chat_id(&self) -> i64 {
        match self {
            Chat::Private { chat_id } => *chat_id,
            Chat::Group { chat_id, .. } => *chat_id,
        }
    }

    pub fn chat_type(&self) -> ChatType {
        match self {
            Chat::Private { .. } => ChatType::Private,
            Chat::Group { .. } => ChatType::Group,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Chat::Private { .. } => None,
            Chat::Group { name, .. } => Some(name),
        }
    }

    pub fn owner_id(&self) -> Option<i64> {
        match self {
            Chat::Private { .. } => None,
            Chat::Group { owner_id, .. } => Some(*owner_id),
        }
    }
}

impl FromRow<'_, SqliteRow> for Chat {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let chat_type: ChatType = row.try_get("chat_type")?;
        match chat_type {
            ChatType::Private => Ok(Chat::Private {
                chat_id: row.try_get("chat_id")?,
            }),
            ChatType::Group => Ok(Chat::Group {
                chat_id: row.try_get("chat_id")?,
                name: row.try_get("name")?,
                owner_id: row.try_get("owner_id")?,
            }),
        }
    }
}
