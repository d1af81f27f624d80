use axum_test::TestServer;
use socialnet::core::AppState;
use sqlx::SqlitePool;
use std::sync::Arc;

/// JWT secret condiviso da tutti i test di integrazione
pub const TEST_JWT_SECRET: &str = "test-secret-do-not-use-in-production";

/// Crea un AppState per i test
pub fn create_test_state(pool: SqlitePool) -> Arc<AppState> {
    Arc::new(AppState::new(pool, TEST_JWT_SECRET.to_string()))
}

/// Crea un TestServer per i test
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = socialnet::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Scorciatoia: TestServer direttamente dal pool delle fixtures
pub fn server_from_pool(pool: SqlitePool) -> TestServer {
    create_test_server(create_test_state(pool))
}

/// Genera un JWT token per testing, valido 24 ore
pub fn create_test_jwt(user_id: i64, username: &str) -> String {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Claims {
        id: i64,
        username: String,
        exp: usize,
        iat: usize,
    }

    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::hours(24))
        .expect("valid timestamp")
        .timestamp() as usize;

    let claims = Claims {
        id: user_id,
        username: username.to_string(),
        exp: expiration,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Failed to create JWT token")
}
