//! Integration tests per gli endpoints di post e commenti

mod common;

#[cfg(test)]
mod post_tests {
    use super::common::{create_test_jwt, server_from_pool};
    use axum_test::http::{HeaderName, StatusCode};
    use serde_json::json;
    use sqlx::SqlitePool;

    fn bearer(token: &str) -> (HeaderName, String) {
        (
            HeaderName::from_static("authorization"),
            format!("Bearer {}", token),
        )
    }

    // ============================================================
    // Test per POST /posts e GET /posts
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_create_post_success(pool: SqlitePool) -> sqlx::Result<()> {
        let server = server_from_pool(pool);
        let token = create_test_jwt(1, "alice");

        let (name, value) = bearer(&token);
        let response = server
            .post("/posts")
            .add_header(name, value)
            .json(&json!({ "title": "My day", "body": "It was fine." }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let post: serde_json::Value = response.json();
        assert_eq!(post["title"], "My day");
        assert_eq!(post["author_id"], 1);
        assert!(post["updated_at"].is_null());

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "posts")))]
    async fn test_list_user_posts(pool: SqlitePool) -> sqlx::Result<()> {
        let server = server_from_pool(pool);
        let token = create_test_jwt(2, "bob");

        let (name, value) = bearer(&token);
        let response = server.get("/users/1/posts").add_header(name, value).await;

        response.assert_status_ok();
        let page: serde_json::Value = response.json();
        assert_eq!(page["total_elements"], 1);
        assert_eq!(page["content"][0]["author_id"], 1);

        Ok(())
    }

    // ============================================================
    // Test per PATCH/DELETE /posts/{id} - solo l'autore
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "posts")))]
    async fn test_update_post_by_author(pool: SqlitePool) -> sqlx::Result<()> {
        let server = server_from_pool(pool);
        let token = create_test_jwt(1, "alice");

        let (name, value) = bearer(&token);
        let response = server
            .patch("/posts/1")
            .add_header(name, value)
            .json(&json!({ "body": "Edited body" }))
            .await;

        response.assert_status_ok();
        let post: serde_json::Value = response.json();
        assert_eq!(post["body"], "Edited body");
        // il titolo non inviato resta invariato
        assert_eq!(post["title"], "Hello world");
        assert!(!post["updated_at"].is_null());

        Ok(())
    }

    /// Il post di un altro autore risponde 404, non 403
    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "posts")))]
    async fn test_update_post_by_other_is_not_found(pool: SqlitePool) -> sqlx::Result<()> {
        let server = server_from_pool(pool);
        let token = create_test_jwt(2, "bob");

        let (name, value) = bearer(&token);
        let response = server
            .patch("/posts/1")
            .add_header(name, value)
            .json(&json!({ "body": "Hijacked" }))
            .await;

        response.assert_status_not_found();
        let err: serde_json::Value = response.json();
        assert_eq!(err["error"], "notFound.post.byIdAndAuthorId");

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "posts")))]
    async fn test_delete_post_by_author(pool: SqlitePool) -> sqlx::Result<()> {
        let server = server_from_pool(pool);
        let token = create_test_jwt(1, "alice");

        let (name, value) = bearer(&token);
        server
            .delete("/posts/1")
            .add_header(name, value)
            .await
            .assert_status_ok();

        let (name, value) = bearer(&token);
        server
            .get("/posts/1")
            .add_header(name, value)
            .await
            .assert_status_not_found();

        Ok(())
    }

    // ============================================================
    // Test per POST /posts/{id}/comments - gate sulla publicity
    // dell'autore del post
    // ============================================================

    /// Post PRIVATE: commenta solo l'autore stesso
    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "friendships", "posts")))]
    async fn test_comment_private_post_rejected_for_others(pool: SqlitePool) -> sqlx::Result<()> {
        let server = server_from_pool(pool);

        // il post 3 è di charlie (PRIVATE); bob non può commentare
        // nemmeno se fosse amico
        let token = create_test_jwt(2, "bob");
        let (name, value) = bearer(&token);
        let response = server
            .post("/posts/3/comments")
            .add_header(name, value)
            .json(&json!({ "body": "Let me in" }))
            .await;

        response.assert_status_bad_request();
        let err: serde_json::Value = response.json();
        assert_eq!(err["error"], "illegalAction.comment.privatePost");

        // charlie commenta il proprio post senza problemi
        let token = create_test_jwt(3, "charlie");
        let (name, value) = bearer(&token);
        let response = server
            .post("/posts/3/comments")
            .add_header(name, value)
            .json(&json!({ "body": "Note to self" }))
            .await;

        response.assert_status(StatusCode::CREATED);

        Ok(())
    }

    /// Post INTERNAL: commenta solo un amico dell'autore
    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "friendships", "posts")))]
    async fn test_comment_internal_post_requires_friendship(pool: SqlitePool) -> sqlx::Result<()> {
        let server = server_from_pool(pool);

        // il post 2 è di bob (INTERNAL); alice è sua amica -> ok
        let token = create_test_jwt(1, "alice");
        let (name, value) = bearer(&token);
        let response = server
            .post("/posts/2/comments")
            .add_header(name, value)
            .json(&json!({ "body": "Interesting!" }))
            .await;
        response.assert_status(StatusCode::CREATED);

        // dave non è amico di bob -> rifiutato
        let token = create_test_jwt(4, "dave");
        let (name, value) = bearer(&token);
        let response = server
            .post("/posts/2/comments")
            .add_header(name, value)
            .json(&json!({ "body": "Hello bob" }))
            .await;

        response.assert_status_bad_request();
        let err: serde_json::Value = response.json();
        assert_eq!(err["error"], "illegalAction.comment.internalPost");

        Ok(())
    }

    /// Post PUBLIC: chiunque sia autenticato può commentare
    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "posts")))]
    async fn test_comment_public_post_open_to_all(pool: SqlitePool) -> sqlx::Result<()> {
        let server = server_from_pool(pool);

        // il post 1 è di alice (PUBLIC); charlie non è suo amico ma commenta
        let token = create_test_jwt(3, "charlie");
        let (name, value) = bearer(&token);
        let response = server
            .post("/posts/1/comments")
            .add_header(name, value)
            .json(&json!({ "body": "Nice post" }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let comment: serde_json::Value = response.json();
        assert_eq!(comment["post_id"], 1);
        assert_eq!(comment["author_id"], 3);

        Ok(())
    }

    // ============================================================
    // Test per PATCH/DELETE dei commenti - solo l'autore
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "posts")))]
    async fn test_update_comment_by_author(pool: SqlitePool) -> sqlx::Result<()> {
        let server = server_from_pool(pool);
        let token = create_test_jwt(2, "bob");

        // il commento 1 è di bob
        let (name, value) = bearer(&token);
        let response = server
            .patch("/posts/1/comments/1")
            .add_header(name, value)
            .json(&json!({ "body": "Edited comment" }))
            .await;

        response.assert_status_ok();
        let comment: serde_json::Value = response.json();
        assert_eq!(comment["body"], "Edited comment");

        Ok(())
    }

    /// Il commento di un altro autore risponde 404, non 403
    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "posts")))]
    async fn test_delete_comment_by_other_is_not_found(pool: SqlitePool) -> sqlx::Result<()> {
        let server = server_from_pool(pool);
        let token = create_test_jwt(1, "alice");

        let (name, value) = bearer(&token);
        let response = server
            .delete("/posts/1/comments/1")
            .add_header(name, value)
            .await;

        response.assert_status_not_found();
        let err: serde_json::Value = response.json();
        assert_eq!(err["error"], "notFound.comment.byIdAndAuthor");

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "posts")))]
    async fn test_list_comments_scoped_to_post(pool: SqlitePool) -> sqlx::Result<()> {
        let server = server_from_pool(pool);
        let token = create_test_jwt(1, "alice");

        let (name, value) = bearer(&token);
        let response = server
            .get("/posts/1/comments")
            .add_header(name, value)
            .await;

        response.assert_status_ok();
        let page: serde_json::Value = response.json();
        assert_eq!(page["total_elements"], 1);
        assert_eq!(page["content"][0]["comment_id"], 1);

        Ok(())
    }
}
