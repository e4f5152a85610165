use rusqlite::Connection;
use std::path::Path;

pub fn init_db(path: impl AsRef<Path>) -> Result<Connection, rusqlite::Error> {
    let conn = Connection::open(path)?;
    create_tables(&conn)?;
    Ok(conn)
}

#[cfg(test)]
pub fn init_memory_db() -> Result<Connection, rusqlite::Error> {
    let conn = Connection::open_in_memory()?;
    create_tables(&conn)?;
    Ok(conn)
}

fn create_tables(conn: &Connection) -> Result<(), rusqlite::Error> {
    // SQLite leaves foreign keys off per connection
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            email         TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            is_admin      INTEGER NOT NULL DEFAULT 0,
            created_at    DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS hostels (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            name       TEXT NOT NULL UNIQUE,
            location   TEXT NOT NULL DEFAULT '',
            rooms      INTEGER NOT NULL DEFAULT 0,
            capacity   INTEGER NOT NULL DEFAULT 0,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    // Email uniqueness is checked by the handlers, not enforced here.
    // The user reference is deferred so an admin's user can be removed
    // before the admin row inside the same transaction.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS admins (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            father_name TEXT NOT NULL,
            contact     TEXT NOT NULL,
            address     TEXT NOT NULL,
            dob         TEXT NOT NULL,
            cnic        TEXT NOT NULL,
            email       TEXT NOT NULL,
            user_id     INTEGER NOT NULL
                        REFERENCES users(id) DEFERRABLE INITIALLY DEFERRED,
            hostel_id   INTEGER NOT NULL
                        REFERENCES hostels(id) DEFERRABLE INITIALLY DEFERRED,
            created_at  DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_admins_email ON admins (email)",
        [],
    )?;

    Ok(())
}
