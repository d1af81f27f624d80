//! UserRepository - Repository per la gestione degli utenti e delle amicizie

use super::{Create, Delete, Read, Update};
use crate::dtos::{CreateUserDTO, UpdateUserDTO};
use crate::entities::User;
use sqlx::{Error, SqlitePool};
use tracing::{debug, instrument};

const USER_COLUMNS: &str =
    "user_id, email, username, first_name, last_name, password, publicity, moder, admin";

pub struct UserRepository {
    connection_pool: SqlitePool,
}

impl UserRepository {
    pub fn new(connection_pool: SqlitePool) -> UserRepository {
        Self { connection_pool }
    }

    /// Find user by exact username match (lo username è univoco)
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(user)
    }

    /// Find user by exact email match (l'email è univoca)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(user)
    }

    pub async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<User>, Error> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY user_id LIMIT ? OFFSET ?"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(users)
    }

    pub async fn count_all(&self) -> Result<i64, Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.connection_pool)
            .await?;

        Ok(count.0)
    }

    // ********************* AMICIZIE ********************* //

    /// True se esiste l'amicizia user -> friend. La relazione è simmetrica
    /// per costruzione, quindi una sola direzione è sufficiente da leggere.
    pub async fn has_friendship(&self, user_id: &i64, friend_id: &i64) -> Result<bool, Error> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM friendships WHERE user_id = ? AND friend_id = ?",
        )
        .bind(user_id)
        .bind(friend_id)
        .fetch_one(&self.connection_pool)
        .await?;

        Ok(count.0 > 0)
    }

    /// Inserisce l'amicizia in entrambe le direzioni nella stessa transazione:
    /// o entrambe le righe vengono scritte, o nessuna.
    #[instrument(skip(self), fields(user = %user_id, friend = %friend_id))]
    pub async fn add_friendship(&self, user_id: &i64, friend_id: &i64) -> Result<(), Error> {
        debug!("Adding symmetric friendship");
        let mut tx = self.connection_pool.begin().await?;

        sqlx::query("INSERT INTO friendships (user_id, friend_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(friend_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO friendships (user_id, friend_id) VALUES (?, ?)")
            .bind(friend_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Rimuove l'amicizia in entrambe le direzioni nella stessa transazione.
    #[instrument(skip(self), fields(user = %user_id, friend = %friend_id))]
    pub async fn remove_friendship(&self, user_id: &i64, friend_id: &i64) -> Result<(), Error> {
        debug!("Removing symmetric friendship");
        let mut tx = self.connection_pool.begin().await?;

        sqlx::query("DELETE FROM friendships WHERE user_id = ? AND friend_id = ?")
            .bind(user_id)
            .bind(friend_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM friendships WHERE user_id = ? AND friend_id = ?")
            .bind(friend_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    pub async fn find_friends(
        &self,
        user_id: &i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, Error> {
        let friends = sqlx::query_as::<_, User>(
            r#"
            SELECT u.user_id, u.email, u.username, u.first_name, u.last_name,
                   u.password, u.publicity, u.moder, u.admin
            FROM users u
            INNER JOIN friendships f ON u.user_id = f.friend_id
            WHERE f.user_id = ?
            ORDER BY u.user_id
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(friends)
    }

    pub async fn count_friends(&self, user_id: &i64) -> Result<i64, Error> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM friendships WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(&self.connection_pool)
                .await?;

        Ok(count.0)
    }

    // ********************* CAMPI SINGOLI ********************* //

    pub async fn update_password(&self, user_id: &i64, password_hash: &str) -> Result<(), Error> {
        sqlx::query("UPDATE users SET password = ? WHERE user_id = ?")
            .bind(password_hash)
            .bind(user_id)
            .execute(&self.connection_pool)
            .await?;

        Ok(())
    }

    pub async fn update_role(&self, user_id: &i64, moder: bool) -> Result<User, Error> {
        sqlx::query("UPDATE users SET moder = ? WHERE user_id = ?")
            .bind(moder)
            .bind(user_id)
            .execute(&self.connection_pool)
            .await?;

        self.read(user_id).await?.ok_or(Error::RowNotFound)
    }
}

impl Create<User, CreateUserDTO> for UserRepository {
    /// Inserisce l'utente e ritorna l'entità con l'id assegnato dal database.
    /// La password nel DTO deve essere già hashata dal chiamante.
    async fn create(&self, data: &CreateUserDTO) -> Result<User, Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (email, username, first_name, last_name, password)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&data.email)
        .bind(&data.username)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.password)
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_rowid();

        self.read(&new_id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<User, i64> for UserRepository {
    async fn read(&self, id: &i64) -> Result<Option<User>, Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(user)
    }
}

impl Update<User, UpdateUserDTO, i64> for UserRepository {
    /// Aggiornamento parziale: solo i campi Some vengono modificati.
    async fn update(&self, id: &i64, data: &UpdateUserDTO) -> Result<User, Error> {
        // First, get the current user to ensure it exists
        let current_user = self.read(id).await?.ok_or(Error::RowNotFound)?;

        if data.email.is_none()
            && data.username.is_none()
            && data.first_name.is_none()
            && data.last_name.is_none()
            && data.publicity.is_none()
        {
            return Ok(current_user);
        }

        // Build dynamic UPDATE query using QueryBuilder (idiomatic SQLx way)
        let mut query_builder = sqlx::QueryBuilder::new("UPDATE users SET ");

        let mut separated = query_builder.separated(", ");
        if let Some(ref email) = data.email {
            separated.push("email = ");
            separated.push_bind_unseparated(email);
        }
        if let Some(ref username) = data.username {
            separated.push("username = ");
            separated.push_bind_unseparated(username);
        }
        if let Some(ref first_name) = data.first_name {
            separated.push("first_name = ");
            separated.push_bind_unseparated(first_name);
        }
        if let Some(ref last_name) = data.last_name {
            separated.push("last_name = ");
            separated.push_bind_unseparated(last_name);
        }
        if let Some(publicity) = data.publicity {
            separated.push("publicity = ");
            separated.push_bind_unseparated(publicity);
        }

        query_builder.push(" WHERE user_id = ");
        query_builder.push_bind(id);

        query_builder.build().execute(&self.connection_pool).await?;

        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i64> for UserRepository {
    /// Hard delete: le foreign key ON DELETE CASCADE ripuliscono amicizie,
    /// post, commenti, membership e messaggi dell'utente.
    async fn delete(&self, user_id: &i64) -> Result<(), Error> {
        sqlx::query("DELETE FROM users WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.connection_pool)
            .await?;

        Ok(())
    }
}
