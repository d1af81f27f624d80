//! PostRepository - Repository per la gestione dei post

use super::{Delete, Read, Update};
use crate::dtos::{CreatePostDTO, UpdatePostDTO};
use crate::entities::Post;
use chrono::Utc;
use sqlx::{Error, SqlitePool};

const POST_COLUMNS: &str = "post_id, author_id, title, body, created_at, updated_at";

pub struct PostRepository {
    connection_pool: SqlitePool,
}

impl PostRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    pub async fn create(&self, author_id: &i64, data: &CreatePostDTO) -> Result<Post, Error> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO posts (author_id, title, body, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(author_id)
        .bind(&data.title)
        .bind(&data.body)
        .bind(created_at)
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_rowid();

        Ok(Post {
            post_id: new_id,
            author_id: *author_id,
            title: data.title.clone(),
            body: data.body.clone(),
            created_at,
            updated_at: None,
        })
    }

    /// Lookup id + autore: None sia per post inesistente sia per
    /// richiedente che non è l'autore.
    pub async fn find_by_id_and_author(
        &self,
        post_id: &i64,
        author_id: &i64,
    ) -> Result<Option<Post>, Error> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE post_id = ? AND author_id = ?"
        ))
        .bind(post_id)
        .bind(author_id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(post)
    }

    pub async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<Post>, Error> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC LIMIT ? OFFSET ?"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(posts)
    }

    pub async fn count_all(&self) -> Result<i64, Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.connection_pool)
            .await?;

        Ok(count.0)
    }

    pub async fn find_all_by_author(
        &self,
        author_id: &i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>, Error> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT {POST_COLUMNS} FROM posts
            WHERE author_id = ?
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#
        ))
        .bind(author_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(posts)
    }

    pub async fn count_by_author(&self, author_id: &i64) -> Result<i64, Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts WHERE author_id = ?")
            .bind(author_id)
            .fetch_one(&self.connection_pool)
            .await?;

        Ok(count.0)
    }
}

impl Read<Post, i64> for PostRepository {
    async fn read(&self, id: &i64) -> Result<Option<Post>, Error> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE post_id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(post)
    }
}

impl Update<Post, UpdatePostDTO, i64> for PostRepository {
    /// Aggiornamento parziale con timestamp updated_at.
    /// Il chiamante ha già verificato la ownership con find_by_id_and_author.
    async fn update(&self, id: &i64, data: &UpdatePostDTO) -> Result<Post, Error> {
        let current_post = self.read(id).await?.ok_or(Error::RowNotFound)?;

        if data.title.is_none() && data.body.is_none() {
            return Ok(current_post);
        }

        let mut query_builder = sqlx::QueryBuilder::new("UPDATE posts SET ");

        let mut separated = query_builder.separated(", ");
        if let Some(ref title) = data.title {
            separated.push("title = ");
            separated.push_bind_unseparated(title);
        }
        if let Some(ref body) = data.body {
            separated.push("body = ");
            separated.push_bind_unseparated(body);
        }
        separated.push("updated_at = ");
        separated.push_bind_unseparated(Utc::now());

        query_builder.push(" WHERE post_id = ");
        query_builder.push_bind(id);

        query_builder.build().execute(&self.connection_pool).await?;

        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i64> for PostRepository {
    /// Hard delete: i commenti del post vengono eliminati via CASCADE.
    async fn delete(&self, id: &i64) -> Result<(), Error> {
        sqlx::query("DELETE FROM posts WHERE post_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: il lookup id+autore risponde None quando l'autore non coincide
    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "posts")))]
    async fn test_find_by_id_and_author(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = PostRepository::new(pool);

        // il post 1 è di alice (1)
        assert!(repo.find_by_id_and_author(&1, &1).await?.is_some());
        assert!(repo.find_by_id_and_author(&1, &2).await?.is_none());
        assert!(repo.find_by_id_and_author(&999, &1).await?.is_none());

        Ok(())
    }

    /// Test CASCADE: eliminare un post elimina i suoi commenti
    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "posts")))]
    async fn test_delete_post_cascades_comments(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = PostRepository::new(pool.clone());

        repo.delete(&1).await?;

        let comments: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM comments WHERE post_id = 1")
                .fetch_one(&pool)
                .await?;
        assert_eq!(comments.0, 0);

        Ok(())
    }
}
