//! ChatRepository - Repository per la gestione delle chat e dei membri
//!
//! I lookup combinati id+membro e id+owner sono il punto in cui
//! l'autorizzazione viene fusa con l'esistenza: un predicato fallito
//! produce None, che i services traducono in 404.

use super::{Delete, Read};
use crate::entities::{Chat, ChatType, User};
use sqlx::{Error, SqlitePool};
use tracing::{debug, info, instrument};

const CHAT_COLUMNS: &str = "c.chat_id, c.chat_type, c.name, c.owner_id";

pub struct ChatRepository {
    connection_pool: SqlitePool,
}

impl ChatRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Crea una chat privata con i suoi due membri in un'unica transazione.
    #[instrument(skip(self), fields(user = %user_id, target = %target_id))]
    pub async fn create_private(&self, user_id: &i64, target_id: &i64) -> Result<Chat, Error> {
        debug!("Creating private chat");
        let mut tx = self.connection_pool.begin().await?;

        let result = sqlx::query("INSERT INTO chats (chat_type) VALUES (?)")
            .bind(ChatType::Private)
            .execute(&mut *tx)
            .await?;

        let chat_id = result.last_insert_rowid();

        for member in [user_id, target_id] {
            sqlx::query("INSERT INTO chat_members (chat_id, user_id) VALUES (?, ?)")
                .bind(chat_id)
                .bind(member)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!("Private chat created with id {}", chat_id);
        Ok(Chat::Private { chat_id })
    }

    /// Crea una chat di gruppo con owner e membri in un'unica transazione.
    /// `member_ids` deve già includere l'owner (ci pensa il service).
    #[instrument(skip(self, member_ids), fields(owner = %owner_id, members = member_ids.len()))]
    pub async fn create_group(
        &self,
        name: &str,
        owner_id: &i64,
        member_ids: &[i64],
    ) -> Result<Chat, Error> {
        debug!("Creating group chat");
        let mut tx = self.connection_pool.begin().await?;

        let result = sqlx::query("INSERT INTO chats (chat_type, name, owner_id) VALUES (?, ?, ?)")
            .bind(ChatType::Group)
            .bind(name)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        let chat_id = result.last_insert_rowid();

        for member in member_ids {
            sqlx::query("INSERT INTO chat_members (chat_id, user_id) VALUES (?, ?)")
                .bind(chat_id)
                .bind(member)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!("Group chat created with id {}", chat_id);
        Ok(Chat::Group {
            chat_id,
            name: name.to_string(),
            owner_id: *owner_id,
        })
    }

    /// Get private chat between two users (if exists)
    /// Optimized query: uses GROUP BY + HAVING instead of multiple JOINs
    #[instrument(skip(self), fields(user1 = %user1_id, user2 = %user2_id))]
    pub async fn find_private_between(
        &self,
        user1_id: &i64,
        user2_id: &i64,
    ) -> Result<Option<Chat>, Error> {
        debug!("Finding private chat between two users");
        let chat = sqlx::query_as::<_, Chat>(
            r#"
            SELECT c.chat_id, c.chat_type, c.name, c.owner_id
            FROM chats c
            INNER JOIN chat_members cm ON c.chat_id = cm.chat_id
            WHERE c.chat_type = 'PRIVATE'
            AND cm.user_id IN (?, ?)
            GROUP BY c.chat_id, c.chat_type, c.name, c.owner_id
            HAVING COUNT(DISTINCT cm.user_id) = 2
            "#,
        )
        .bind(user1_id)
        .bind(user2_id)
        .fetch_optional(&self.connection_pool)
        .await?;

        if chat.is_some() {
            debug!("Private chat found");
        } else {
            debug!("No private chat found");
        }

        Ok(chat)
    }

    /// Lookup id + membership: None sia per chat inesistente sia per
    /// richiedente non membro.
    pub async fn find_by_id_and_member(
        &self,
        chat_id: &i64,
        user_id: &i64,
    ) -> Result<Option<Chat>, Error> {
        let chat = sqlx::query_as::<_, Chat>(&format!(
            r#"
            SELECT {CHAT_COLUMNS}
            FROM chats c
            INNER JOIN chat_members cm ON c.chat_id = cm.chat_id
            WHERE c.chat_id = ? AND cm.user_id = ?
            "#
        ))
        .bind(chat_id)
        .bind(user_id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(chat)
    }

    /// Come find_by_id_and_member ma limitato alle chat del tipo richiesto.
    pub async fn find_by_id_and_member_of_type(
        &self,
        chat_id: &i64,
        user_id: &i64,
        chat_type: ChatType,
    ) -> Result<Option<Chat>, Error> {
        let chat = sqlx::query_as::<_, Chat>(&format!(
            r#"
            SELECT {CHAT_COLUMNS}
            FROM chats c
            INNER JOIN chat_members cm ON c.chat_id = cm.chat_id
            WHERE c.chat_id = ? AND cm.user_id = ? AND c.chat_type = ?
            "#
        ))
        .bind(chat_id)
        .bind(user_id)
        .bind(chat_type)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(chat)
    }

    /// Lookup id + ownership, solo chat di gruppo.
    pub async fn find_group_by_id_and_owner(
        &self,
        chat_id: &i64,
        owner_id: &i64,
    ) -> Result<Option<Chat>, Error> {
        let chat = sqlx::query_as::<_, Chat>(&format!(
            r#"
            SELECT {CHAT_COLUMNS}
            FROM chats c
            WHERE c.chat_id = ? AND c.owner_id = ? AND c.chat_type = 'GROUP'
            "#
        ))
        .bind(chat_id)
        .bind(owner_id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(chat)
    }

    pub async fn find_all_by_member(
        &self,
        user_id: &i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Chat>, Error> {
        let chats = sqlx::query_as::<_, Chat>(&format!(
            r#"
            SELECT {CHAT_COLUMNS}
            FROM chats c
            INNER JOIN chat_members cm ON c.chat_id = cm.chat_id
            WHERE cm.user_id = ?
            ORDER BY c.chat_id
            LIMIT ? OFFSET ?
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(chats)
    }

    pub async fn count_by_member(&self, user_id: &i64) -> Result<i64, Error> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM chat_members WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(&self.connection_pool)
                .await?;

        Ok(count.0)
    }

    pub async fn member_ids(&self, chat_id: &i64) -> Result<Vec<i64>, Error> {
        let rows: Vec<(i64,)> =
            sqlx::query_as("SELECT user_id FROM chat_members WHERE chat_id = ? ORDER BY user_id")
                .bind(chat_id)
                .fetch_all(&self.connection_pool)
                .await?;

        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    pub async fn members(
        &self,
        chat_id: &i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, Error> {
        let members = sqlx::query_as::<_, User>(
            r#"
            SELECT u.user_id, u.email, u.username, u.first_name, u.last_name,
                   u.password, u.publicity, u.moder, u.admin
            FROM users u
            INNER JOIN chat_members cm ON u.user_id = cm.user_id
            WHERE cm.chat_id = ?
            ORDER BY u.user_id
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(chat_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(members)
    }

    pub async fn count_members(&self, chat_id: &i64) -> Result<i64, Error> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM chat_members WHERE chat_id = ?")
                .bind(chat_id)
                .fetch_one(&self.connection_pool)
                .await?;

        Ok(count.0)
    }

    /// Sostituisce l'intero insieme membri in un'unica transazione.
    /// Il service ha già verificato che l'owner sia presente nel nuovo insieme.
    #[instrument(skip(self, member_ids), fields(chat_id = %chat_id, members = member_ids.len()))]
    pub async fn replace_members(&self, chat_id: &i64, member_ids: &[i64]) -> Result<(), Error> {
        debug!("Replacing chat member set");
        let mut tx = self.connection_pool.begin().await?;

        sqlx::query("DELETE FROM chat_members WHERE chat_id = ?")
            .bind(chat_id)
            .execute(&mut *tx)
            .await?;

        for member in member_ids {
            sqlx::query("INSERT INTO chat_members (chat_id, user_id) VALUES (?, ?)")
                .bind(chat_id)
                .bind(member)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!("Chat member set replaced");
        Ok(())
    }

    pub async fn remove_member(&self, chat_id: &i64, user_id: &i64) -> Result<(), Error> {
        sqlx::query("DELETE FROM chat_members WHERE chat_id = ? AND user_id = ?")
            .bind(chat_id)
            .bind(user_id)
            .execute(&self.connection_pool)
            .await?;

        Ok(())
    }

    /// Riassegna l'owner di una chat di gruppo (il nuovo owner resta membro).
    pub async fn set_owner(&self, chat_id: &i64, new_owner_id: &i64) -> Result<(), Error> {
        sqlx::query("UPDATE chats SET owner_id = ? WHERE chat_id = ?")
            .bind(new_owner_id)
            .bind(chat_id)
            .execute(&self.connection_pool)
            .await?;

        Ok(())
    }

    pub async fn update_name(&self, chat_id: &i64, name: &str) -> Result<(), Error> {
        sqlx::query("UPDATE chats SET name = ? WHERE chat_id = ?")
            .bind(name)
            .bind(chat_id)
            .execute(&self.connection_pool)
            .await?;

        Ok(())
    }
}

impl Read<Chat, i64> for ChatRepository {
    async fn read(&self, id: &i64) -> Result<Option<Chat>, Error> {
        let chat = sqlx::query_as::<_, Chat>(&format!(
            "SELECT {CHAT_COLUMNS} FROM chats c WHERE c.chat_id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(chat)
    }
}

impl Delete<i64> for ChatRepository {
    #[instrument(skip(self), fields(chat_id = %id))]
    async fn delete(&self, id: &i64) -> Result<(), Error> {
        debug!("Deleting chat");
        sqlx::query("DELETE FROM chats WHERE chat_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        info!("Chat deleted successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /*------------------------------------- */
    /* Unit tests: find_private_between     */
    /*------------------------------------- */

    /// Test: trova una chat privata esistente tra due utenti
    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "chats")))]
    async fn test_find_private_between_success(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = ChatRepository::new(pool);

        // alice (1) e bob (2) hanno una chat privata (chat_id=1)
        let result = repo.find_private_between(&1, &2).await?;

        assert!(result.is_some());
        let chat = result.unwrap();
        assert_eq!(chat.chat_id(), 1);
        assert_eq!(chat.chat_type(), ChatType::Private);

        Ok(())
    }

    /// Test: l'ordine degli utenti non influisce sul risultato
    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "chats")))]
    async fn test_find_private_between_order_independent(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = ChatRepository::new(pool);

        let result1 = repo.find_private_between(&1, &2).await?;
        let result2 = repo.find_private_between(&2, &1).await?;

        assert!(result1.is_some());
        assert!(result2.is_some());
        assert_eq!(result1.unwrap().chat_id(), result2.unwrap().chat_id());

        Ok(())
    }

    /// Test: non trova chat quando non esiste tra i due utenti
    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "chats")))]
    async fn test_find_private_between_not_found(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = ChatRepository::new(pool);

        // bob (2) e charlie (3) non hanno chat privata
        let result = repo.find_private_between(&2, &3).await?;

        assert!(result.is_none());

        Ok(())
    }

    /// Test: una chat GROUP con gli stessi due utenti non viene confusa
    /// con una chat privata
    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "chats")))]
    async fn test_find_private_between_ignores_group_chats(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = ChatRepository::new(pool);

        // alice (1) e dave (4) sono entrambi nel gruppo "Rustaceans"
        // ma non hanno una chat privata
        let result = repo.find_private_between(&1, &4).await?;

        assert!(result.is_none());

        Ok(())
    }

    /// Test: stesso user_id per entrambi i parametri non trova nulla
    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "chats")))]
    async fn test_find_private_between_same_user(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = ChatRepository::new(pool);

        let result = repo.find_private_between(&1, &1).await?;

        assert!(result.is_none());

        Ok(())
    }

    /*------------------------------------- */
    /* Unit tests: lookup autorizzati       */
    /*------------------------------------- */

    /// Test: il lookup id+membro risponde None per i non membri
    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "chats")))]
    async fn test_find_by_id_and_member(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = ChatRepository::new(pool);

        // bob (2) è membro della chat privata 1
        assert!(repo.find_by_id_and_member(&1, &2).await?.is_some());
        // charlie (3) non lo è: stessa risposta di una chat inesistente
        assert!(repo.find_by_id_and_member(&1, &3).await?.is_none());
        assert!(repo.find_by_id_and_member(&999, &2).await?.is_none());

        Ok(())
    }

    /// Test: il lookup id+owner accetta solo l'owner del gruppo
    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "chats")))]
    async fn test_find_group_by_id_and_owner(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = ChatRepository::new(pool);

        // alice (1) è owner del gruppo 2
        let chat = repo.find_group_by_id_and_owner(&2, &1).await?;
        assert!(matches!(chat, Some(Chat::Group { owner_id: 1, .. })));

        // bob (2) è membro ma non owner
        assert!(repo.find_group_by_id_and_owner(&2, &2).await?.is_none());
        // la chat privata 1 non è mai raggiungibile da questo lookup
        assert!(repo.find_group_by_id_and_owner(&1, &1).await?.is_none());

        Ok(())
    }

    /// Test: replace_members sostituisce l'insieme in modo atomico
    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "chats")))]
    async fn test_replace_members(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = ChatRepository::new(pool);

        repo.replace_members(&2, &[1, 3]).await?;

        let ids = repo.member_ids(&2).await?;
        assert_eq!(ids, vec![1, 3]);

        Ok(())
    }

    /// Test CASCADE: eliminare la chat elimina membri e messaggi
    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "chats", "messages")))]
    async fn test_delete_chat_cascades(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = ChatRepository::new(pool.clone());

        repo.delete(&1).await?;

        assert!(repo.read(&1).await?.is_none());
        assert!(repo.member_ids(&1).await?.is_empty());

        let messages: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM messages WHERE chat_id = 1")
                .fetch_one(&pool)
                .await?;
        assert_eq!(messages.0, 0);

        Ok(())
    }
}
