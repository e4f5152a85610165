use crate::{errors::AdminError, models::admin::Admin};
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result as RusqliteResult};

pub struct AdminRepository<'a> {
    conn: &'a Connection,
}

impl<'a> AdminRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    const SELECT_FIELDS: &'static str =
        "id, name, father_name, contact, address, dob, cnic, email, user_id, hostel_id, created_at";

    fn map_row_to_admin(row: &rusqlite::Row) -> RusqliteResult<Admin> {
        let created_at_str: Option<String> = row.get(10)?;

        let created_at = created_at_str.and_then(|s| {
            NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc))
        });

        Ok(Admin {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            father_name: row.get(2)?,
            contact: row.get(3)?,
            address: row.get(4)?,
            dob: row.get(5)?,
            cnic: row.get(6)?,
            email: row.get(7)?,
            user_id: row.get(8)?,
            hostel_id: row.get(9)?,
            created_at,
        })
    }

    // Single-row lookup on one column
    fn find_one(
        &self,
        column: &str,
        value: &dyn rusqlite::ToSql,
    ) -> Result<Option<Admin>, AdminError> {
        let sql = format!(
            "SELECT {} FROM admins WHERE {} = ?1 LIMIT 1",
            Self::SELECT_FIELDS,
            column
        );
        self.conn
            .query_row(&sql, [value], Self::map_row_to_admin)
            .optional()
            .map_err(|e| AdminError::DatabaseError(e.to_string()))
    }

    // Find admin by email
    pub fn find_admin_by_email(&self, email: &str) -> Result<Option<Admin>, AdminError> {
        self.find_one("email", &email)
    }

    // Find admin by id
    pub fn find_admin_by_id(&self, id: i64) -> Result<Option<Admin>, AdminError> {
        self.find_one("id", &id)
    }

    // Find the admin linked to a user (token lookups)
    pub fn find_admin_by_user_id(&self, user_id: i64) -> Result<Option<Admin>, AdminError> {
        self.find_one("user_id", &user_id)
    }

    /// Inserts the admin and reads it back; `None` means the row did not land.
    pub fn create_admin(&self, admin: &Admin) -> Result<Option<Admin>, AdminError> {
        self.conn.execute(
            "INSERT INTO admins (name, father_name, contact, address, dob, cnic, email, user_id, hostel_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                admin.name,
                admin.father_name,
                admin.contact,
                admin.address,
                admin.dob,
                admin.cnic,
                admin.email,
                admin.user_id,
                admin.hostel_id,
            ],
        )?;
        self.find_admin_by_id(self.conn.last_insert_rowid())
    }

    // Overwrite the mutable profile fields; user and hostel never change
    pub fn update_admin(&self, admin: &Admin) -> Result<(), AdminError> {
        let id = admin.id.ok_or_else(|| {
            AdminError::InternalError("Cannot update an unsaved admin".to_string())
        })?;

        let rows = self.conn.execute(
            "UPDATE admins
             SET name = ?1, father_name = ?2, contact = ?3, address = ?4,
                 dob = ?5, cnic = ?6, email = ?7
             WHERE id = ?8",
            params![
                admin.name,
                admin.father_name,
                admin.contact,
                admin.address,
                admin.dob,
                admin.cnic,
                admin.email,
                id,
            ],
        )?;

        if rows == 0 {
            return Err(AdminError::NotFound("Admin does not exists".to_string()));
        }
        Ok(())
    }

    // Delete admin row only; the caller removes the linked user
    pub fn delete_admin(&self, id: i64) -> Result<usize, AdminError> {
        self.conn
            .execute("DELETE FROM admins WHERE id = ?1", params![id])
            .map_err(|e| AdminError::DatabaseError(e.to_string()))
    }
}
