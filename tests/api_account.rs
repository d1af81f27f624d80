//! Integration tests per gli endpoints dell'account

mod common;

#[cfg(test)]
mod account_tests {
    use super::common::{create_test_jwt, server_from_pool};
    use axum_test::http::HeaderName;
    use serde_json::json;
    use sqlx::SqlitePool;

    // ============================================================
    // Test per POST /account - register_account
    // ============================================================

    #[sqlx::test]
    async fn test_register_account_success(pool: SqlitePool) -> sqlx::Result<()> {
        let server = server_from_pool(pool);

        let body = json!({
            "email": "grace@example.com",
            "username": "grace",
            "first_name": "Grace",
            "last_name": "Hopper",
            "password": "correct-horse-battery"
        });

        let response = server.post("/account").json(&body).await;

        response.assert_status(axum_test::http::StatusCode::CREATED);
        let user: serde_json::Value = response.json();
        assert_eq!(user["username"], "grace");
        assert_eq!(user["email"], "grace@example.com");
        // publicity di default: PRIVATE
        assert_eq!(user["publicity"], "PRIVATE");
        assert!(user.get("password").is_none(), "La password non deve mai essere esposta");
        assert!(
            response.headers().get("authorization").is_some(),
            "La registrazione deve ritornare il token"
        );

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_register_account_duplicate_username(pool: SqlitePool) -> sqlx::Result<()> {
        let server = server_from_pool(pool);

        let body = json!({
            "email": "alice2@example.com",
            "username": "alice",
            "first_name": "Alice",
            "last_name": "Clone",
            "password": "correct-horse-battery"
        });

        let response = server.post("/account").json(&body).await;

        response.assert_status(axum_test::http::StatusCode::CONFLICT);

        Ok(())
    }

    #[sqlx::test]
    async fn test_register_account_invalid_payload(pool: SqlitePool) -> sqlx::Result<()> {
        let server = server_from_pool(pool);

        // email non valida e password troppo corta
        let body = json!({
            "email": "not-an-email",
            "username": "grace",
            "first_name": "Grace",
            "last_name": "Hopper",
            "password": "short"
        });

        let response = server.post("/account").json(&body).await;

        response.assert_status_bad_request();

        Ok(())
    }

    // ============================================================
    // Test per POST /auth/login - login_user
    // ============================================================

    #[sqlx::test]
    async fn test_register_then_login(pool: SqlitePool) -> sqlx::Result<()> {
        let server = server_from_pool(pool);

        let body = json!({
            "email": "grace@example.com",
            "username": "grace",
            "first_name": "Grace",
            "last_name": "Hopper",
            "password": "correct-horse-battery"
        });
        server.post("/account").json(&body).await.assert_status(
            axum_test::http::StatusCode::CREATED,
        );

        let response = server
            .post("/auth/login")
            .json(&json!({ "username": "grace", "password": "correct-horse-battery" }))
            .await;

        response.assert_status_ok();
        assert!(response.headers().get("authorization").is_some());
        assert!(response.headers().get("set-cookie").is_some());

        Ok(())
    }

    #[sqlx::test]
    async fn test_login_wrong_password(pool: SqlitePool) -> sqlx::Result<()> {
        let server = server_from_pool(pool);

        let body = json!({
            "email": "grace@example.com",
            "username": "grace",
            "first_name": "Grace",
            "last_name": "Hopper",
            "password": "correct-horse-battery"
        });
        server.post("/account").json(&body).await.assert_status(
            axum_test::http::StatusCode::CREATED,
        );

        let response = server
            .post("/auth/login")
            .json(&json!({ "username": "grace", "password": "wrong-password" }))
            .await;

        response.assert_status_unauthorized();

        Ok(())
    }

    // ============================================================
    // Test per GET/PATCH /account
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_get_account_requires_token(pool: SqlitePool) -> sqlx::Result<()> {
        let server = server_from_pool(pool);

        let response = server.get("/account").await;

        response.assert_status_forbidden();

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_get_account_success(pool: SqlitePool) -> sqlx::Result<()> {
        let server = server_from_pool(pool);
        let token = create_test_jwt(1, "alice");

        let response = server
            .get("/account")
            .add_header(
                HeaderName::from_static("authorization"),
                format!("Bearer {}", token),
            )
            .await;

        response.assert_status_ok();
        let user: serde_json::Value = response.json();
        assert_eq!(user["user_id"], 1);
        // il proprietario vede sempre la propria email
        assert_eq!(user["email"], "alice@example.com");

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_update_account_partial(pool: SqlitePool) -> sqlx::Result<()> {
        let server = server_from_pool(pool);
        let token = create_test_jwt(1, "alice");

        let response = server
            .patch("/account")
            .add_header(
                HeaderName::from_static("authorization"),
                format!("Bearer {}", token),
            )
            .json(&json!({ "first_name": "Alicia", "publicity": "INTERNAL" }))
            .await;

        response.assert_status_ok();
        let user: serde_json::Value = response.json();
        assert_eq!(user["first_name"], "Alicia");
        assert_eq!(user["publicity"], "INTERNAL");
        // i campi non inviati restano invariati
        assert_eq!(user["last_name"], "Anderson");

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_update_account_username_taken(pool: SqlitePool) -> sqlx::Result<()> {
        let server = server_from_pool(pool);
        let token = create_test_jwt(1, "alice");

        let response = server
            .patch("/account")
            .add_header(
                HeaderName::from_static("authorization"),
                format!("Bearer {}", token),
            )
            .json(&json!({ "username": "bob" }))
            .await;

        response.assert_status(axum_test::http::StatusCode::CONFLICT);

        Ok(())
    }

    // ============================================================
    // Test per PUT /account/password e DELETE /account
    // ============================================================

    #[sqlx::test]
    async fn test_change_password_flow(pool: SqlitePool) -> sqlx::Result<()> {
        let server = server_from_pool(pool);

        let body = json!({
            "email": "grace@example.com",
            "username": "grace",
            "first_name": "Grace",
            "last_name": "Hopper",
            "password": "correct-horse-battery"
        });
        server.post("/account").json(&body).await.assert_status(
            axum_test::http::StatusCode::CREATED,
        );

        let token = create_test_jwt(1, "grace");

        // password attuale sbagliata -> wrongCredentials
        let response = server
            .put("/account/password")
            .add_header(
                HeaderName::from_static("authorization"),
                format!("Bearer {}", token),
            )
            .json(&json!({ "actual": "wrong-password", "change": "new-password-123" }))
            .await;
        response.assert_status_bad_request();
        let err: serde_json::Value = response.json();
        assert_eq!(err["error"], "wrongCredentials.password");

        // password attuale corretta -> OK, e il login funziona con la nuova
        let response = server
            .put("/account/password")
            .add_header(
                HeaderName::from_static("authorization"),
                format!("Bearer {}", token),
            )
            .json(&json!({ "actual": "correct-horse-battery", "change": "new-password-123" }))
            .await;
        response.assert_status_ok();

        server
            .post("/auth/login")
            .json(&json!({ "username": "grace", "password": "new-password-123" }))
            .await
            .assert_status_ok();

        Ok(())
    }

    #[sqlx::test]
    async fn test_delete_account_requires_password(pool: SqlitePool) -> sqlx::Result<()> {
        let server = server_from_pool(pool);

        let body = json!({
            "email": "grace@example.com",
            "username": "grace",
            "first_name": "Grace",
            "last_name": "Hopper",
            "password": "correct-horse-battery"
        });
        server.post("/account").json(&body).await.assert_status(
            axum_test::http::StatusCode::CREATED,
        );

        let token = create_test_jwt(1, "grace");

        let response = server
            .delete("/account")
            .add_header(
                HeaderName::from_static("authorization"),
                format!("Bearer {}", token),
            )
            .json(&json!({ "password": "wrong-password" }))
            .await;
        response.assert_status_bad_request();

        let response = server
            .delete("/account")
            .add_header(
                HeaderName::from_static("authorization"),
                format!("Bearer {}", token),
            )
            .json(&json!({ "password": "correct-horse-battery" }))
            .await;
        response.assert_status_ok();

        // l'account non esiste più: il token non è più valido
        server
            .get("/account")
            .add_header(
                HeaderName::from_static("authorization"),
                format!("Bearer {}", token),
            )
            .await
            .assert_status_unauthorized();

        Ok(())
    }
}
