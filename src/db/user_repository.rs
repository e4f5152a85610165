use crate::{errors::AdminError, models::user::User};
use rusqlite::{params, Connection, OptionalExtension};

pub struct UserRepository<'a> {
    conn: &'a Connection,
}

impl<'a> UserRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    // Create user and read it back
    pub fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> Result<Option<User>, AdminError> {
        self.conn.execute(
            "INSERT INTO users (email, password_hash, is_admin) VALUES (?1, ?2, ?3)",
            params![email, password_hash, is_admin],
        )?;
        self.find_user_by_id(self.conn.last_insert_rowid())
    }

    // Find user by id
    pub fn find_user_by_id(&self, id: i64) -> Result<Option<User>, AdminError> {
        self.conn
            .query_row(
                "SELECT id, email, password_hash, is_admin FROM users WHERE id = ?1",
                params![id],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        password_hash: row.get(2)?,
                        is_admin: row.get(3)?,
                    })
                },
            )
            .optional()
            .map_err(|e| AdminError::DatabaseError(e.to_string()))
    }

    /// Returns the number of rows removed.
    pub fn delete_user(&self, id: i64) -> Result<usize, AdminError> {
        self.conn
            .execute("DELETE FROM users WHERE id = ?1", params![id])
            .map_err(|e| AdminError::DatabaseError(e.to_string()))
    }
}
