//! Chat DTOs - Data Transfer Objects per chat

use crate::entities::{Chat, ChatType};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

lazy_static! {
    static ref GROUP_NAME_RE: Regex = Regex::new(r"^[\w][\w \-]{0,49}$").unwrap();
}

/// Struct per gestire io col client
#[derive(Serialize, Deserialize, Debug)]
pub struct ChatDTO {
    pub chat_id: i64,
    pub chat_type: ChatType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
}

impl From<Chat> for ChatDTO {
    fn from(value: Chat) -> Self {
        match value {
            Chat::Private { chat_id } => Self {
                chat_id,
                chat_type: ChatType::Private,
                name: None,
                owner_id: None,
            },
            Chat::Group {
                chat_id,
                name,
                owner_id,
            } => Self {
                chat_id,
                chat_type: ChatType::Group,
                name: Some(name),
                owner_id: Some(owner_id),
            },
        }
    }
}

/// DTO per creare una chat di gruppo
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateGroupDTO {
    #[validate(regex(
        path = *GROUP_NAME_RE,
        message = "Group name must be 1-50 characters, starting with a letter or digit"
    ))]
    pub name: String,

    /// Membri proposti (il creatore viene sempre aggiunto)
    #[serde(default)]
    pub members: Vec<i64>,
}

/// DTO per rinominare una chat di gruppo
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct UpdateGroupDTO {
    #[validate(regex(
        path = *GROUP_NAME_RE,
        message = "Group name must be 1-50 characters, starting with a letter or digit"
    ))]
    pub name: String,
}

/// DTO per sostituire l'insieme dei membri di un gruppo
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UpdateGroupMembersDTO {
    pub members: Vec<i64>,
}
