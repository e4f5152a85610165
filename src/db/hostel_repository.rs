use crate::{errors::AdminError, models::hostel::Hostel};
use rusqlite::{params, Connection, OptionalExtension, Result as RusqliteResult};

pub struct HostelRepository<'a> {
    conn: &'a Connection,
}

impl<'a> HostelRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn map_row_to_hostel(row: &rusqlite::Row) -> RusqliteResult<Hostel> {
        Ok(Hostel {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            location: row.get(2)?,
            rooms: row.get(3)?,
            capacity: row.get(4)?,
        })
    }

    // Find hostel by name (registration)
    pub fn find_hostel_by_name(&self, name: &str) -> Result<Option<Hostel>, AdminError> {
        self.conn
            .query_row(
                "SELECT id, name, location, rooms, capacity FROM hostels WHERE name = ?1",
                params![name],
                Self::map_row_to_hostel,
            )
            .optional()
            .map_err(|e| AdminError::DatabaseError(e.to_string()))
    }

    // Find hostel by id (admin's hostel lookup)
    pub fn find_hostel_by_id(&self, id: i64) -> Result<Option<Hostel>, AdminError> {
        self.conn
            .query_row(
                "SELECT id, name, location, rooms, capacity FROM hostels WHERE id = ?1",
                params![id],
                Self::map_row_to_hostel,
            )
            .optional()
            .map_err(|e| AdminError::DatabaseError(e.to_string()))
    }

    // Hostels are managed elsewhere; this backs start-up seeding and tests.
    pub fn create_hostel(&self, hostel: &Hostel) -> Result<i64, AdminError> {
        let result = self.conn.execute(
            "INSERT INTO hostels (name, location, rooms, capacity) VALUES (?1, ?2, ?3, ?4)",
            params![hostel.name, hostel.location, hostel.rooms, hostel.capacity],
        );

        match result {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(e) => {
                if e.to_string()
                    .contains("UNIQUE constraint failed: hostels.name")
                {
                    Err(AdminError::Conflict(format!(
                        "Hostel '{}' already exists",
                        hostel.name
                    )))
                } else {
                    Err(AdminError::DatabaseError(e.to_string()))
                }
            }
        }
    }
}
