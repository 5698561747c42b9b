/// Shared application state
use segue_core::TokenCipher;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub cipher: Arc<dyn TokenCipher>,
}

impl AppState {
    pub fn new(pool: SqlitePool, cipher: Arc<dyn TokenCipher>) -> Self {
        Self { pool, cipher }
    }
}
