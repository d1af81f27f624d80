//! MessageRepository - Repository per la gestione dei messaggi

use super::{Delete, Read, Update};
use crate::dtos::{CreateMessageDTO, UpdateMessageDTO};
use crate::entities::Message;
use chrono::Utc;
use sqlx::{Error, SqlitePool};

const MESSAGE_COLUMNS: &str = "message_id, chat_id, author_id, body, created_at, updated_at";

pub struct MessageRepository {
    connection_pool: SqlitePool,
}

impl MessageRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    pub async fn create(
        &self,
        chat_id: &i64,
        author_id: &i64,
        data: &CreateMessageDTO,
    ) -> Result<Message, Error> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO messages (chat_id, author_id, body, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(chat_id)
        .bind(author_id)
        .bind(&data.body)
        .bind(created_at)
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_rowid();

        Ok(Message {
            message_id: new_id,
            chat_id: *chat_id,
            author_id: *author_id,
            body: data.body.clone(),
            created_at,
            updated_at: None,
        })
    }

    /// Lookup id + autore, stessa semantica degli altri lookup autorizzati.
    pub async fn find_by_id_and_author(
        &self,
        message_id: &i64,
        author_id: &i64,
    ) -> Result<Option<Message>, Error> {
        let message = sqlx::query_as::<_, Message>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE message_id = ? AND author_id = ?"
        ))
        .bind(message_id)
        .bind(author_id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(message)
    }

    /// Messaggi di una chat ordinati dal più vecchio al più recente.
    pub async fn find_all_by_chat(
        &self,
        chat_id: &i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>, Error> {
        let messages = sqlx::query_as::<_, Message>(&format!(
            r#"
            SELECT {MESSAGE_COLUMNS} FROM messages
            WHERE chat_id = ?
            ORDER BY created_at ASC
            LIMIT ? OFFSET ?
            "#
        ))
        .bind(chat_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(messages)
    }

    pub async fn count_by_chat(&self, chat_id: &i64) -> Result<i64, Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages WHERE chat_id = ?")
            .bind(chat_id)
            .fetch_one(&self.connection_pool)
            .await?;

        Ok(count.0)
    }
}

impl Read<Message, i64> for MessageRepository {
    async fn read(&self, id: &i64) -> Result<Option<Message>, Error> {
        let message = sqlx::query_as::<_, Message>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE message_id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(message)
    }
}

impl Update<Message, UpdateMessageDTO, i64> for MessageRepository {
    async fn update(&self, id: &i64, data: &UpdateMessageDTO) -> Result<Message, Error> {
        sqlx::query("UPDATE messages SET body = ?, updated_at = ? WHERE message_id = ?")
            .bind(&data.body)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i64> for MessageRepository {
    async fn delete(&self, id: &i64) -> Result<(), Error> {
        sqlx::query("DELETE FROM messages WHERE message_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        Ok(())
    }
}
