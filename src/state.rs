use rusqlite::Connection;
use std::sync::Mutex;

use crate::{errors::AdminError, utils::token::TokenService};

/// Shared across workers through `web::Data`.
pub struct AppState {
    conn: Mutex<Connection>,
    pub tokens: TokenService,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new(conn: Connection, tokens: TokenService, bcrypt_cost: u32) -> Self {
        Self {
            conn: Mutex::new(conn),
            tokens,
            bcrypt_cost,
        }
    }

    /// Runs `f` with the connection locked. Call from a blocking context.
    pub fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, AdminError>,
    ) -> Result<T, AdminError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| AdminError::InternalError("Database lock poisoned".to_string()))?;
        f(&*conn)
    }
}
