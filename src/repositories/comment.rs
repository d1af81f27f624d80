//! CommentRepository - Repository per la gestione dei commenti

use super::{Delete, Read, Update};
use crate::dtos::{CreateCommentDTO, UpdateCommentDTO};
use crate::entities::Comment;
use chrono::Utc;
use sqlx::{Error, SqlitePool};

const COMMENT_COLUMNS: &str = "comment_id, post_id, author_id, body, created_at, updated_at";

pub struct CommentRepository {
    connection_pool: SqlitePool,
}

impl CommentRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    pub async fn create(
        &self,
        post_id: &i64,
        author_id: &i64,
        data: &CreateCommentDTO,
    ) -> Result<Comment, Error> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO comments (post_id, author_id, body, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(post_id)
        .bind(author_id)
        .bind(&data.body)
        .bind(created_at)
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_rowid();

        Ok(Comment {
            comment_id: new_id,
            post_id: *post_id,
            author_id: *author_id,
            body: data.body.clone(),
            created_at,
            updated_at: None,
        })
    }

    /// Lookup id + autore, stessa semantica degli altri lookup autorizzati.
    pub async fn find_by_id_and_author(
        &self,
        comment_id: &i64,
        author_id: &i64,
    ) -> Result<Option<Comment>, Error> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE comment_id = ? AND author_id = ?"
        ))
        .bind(comment_id)
        .bind(author_id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(comment)
    }

    pub async fn find_all_by_post(
        &self,
        post_id: &i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, Error> {
        let comments = sqlx::query_as::<_, Comment>(&format!(
            r#"
            SELECT {COMMENT_COLUMNS} FROM comments
            WHERE post_id = ?
            ORDER BY created_at ASC
            LIMIT ? OFFSET ?
            "#
        ))
        .bind(post_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(comments)
    }

    pub async fn count_by_post(&self, post_id: &i64) -> Result<i64, Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments WHERE post_id = ?")
            .bind(post_id)
            .fetch_one(&self.connection_pool)
            .await?;

        Ok(count.0)
    }
}

impl Read<Comment, i64> for CommentRepository {
    async fn read(&self, id: &i64) -> Result<Option<Comment>, Error> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE comment_id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(comment)
    }
}

impl Update<Comment, UpdateCommentDTO, i64> for CommentRepository {
    async fn update(&self, id: &i64, data: &UpdateCommentDTO) -> Result<Comment, Error> {
        sqlx::query("UPDATE comments SET body = ?, updated_at = ? WHERE comment_id = ?")
            .bind(&data.body)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i64> for CommentRepository {
    async fn delete(&self, id: &i64) -> Result<(), Error> {
        sqlx::query("DELETE FROM comments WHERE comment_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        Ok(())
    }
}
