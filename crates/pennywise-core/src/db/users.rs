//! User operations

use rusqlite::{params, OptionalExtension};
use tracing::info;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{AuthProvider, User};

const USER_COLUMNS: &str = "id, name, email, auth_provider, created_at";

impl Database {
    /// Insert a user with an already-hashed password
    ///
    /// Expects a trimmed name and lower-cased email. Returns `Conflict` if the
    /// email is taken.
    pub fn create_user(&self, name: &str, email: &str, password_hash: &str) -> Result<User> {
        if self.get_user_by_email(email)?.is_some() {
            return Err(Error::Conflict(format!("User already exists: {}", email)));
        }

        let conn = self.conn()?;
        let inserted = conn.execute(
            "INSERT INTO users (name, email, password_hash, auth_provider) VALUES (?, ?, ?, ?)",
            params![name, email, password_hash, AuthProvider::Local.as_str()],
        );

        // A concurrent registration can still win the race to the UNIQUE index
        match inserted {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                return Err(Error::Conflict(format!("User already exists: {}", email)));
            }
            Err(e) => return Err(e.into()),
        }

        let id = conn.last_insert_rowid();
        drop(conn);

        info!(user_id = id, "Registered user");
        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("User {}", id)))
    }

    /// Get a user by ID
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                params![id],
                |row| Self::row_to_user(row),
            )
            .optional()?;
        Ok(user)
    }

    /// Get a user by email (case-insensitive)
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS),
                params![email.trim().to_lowercase()],
                |row| Self::row_to_user(row),
            )
            .optional()?;
        Ok(user)
    }

    /// Get a user together with their stored password hash
    pub fn get_user_credentials(&self, email: &str) -> Result<Option<(User, String)>> {
        let conn = self.conn()?;
        let result = conn
            .query_row(
                &format!(
                    "SELECT {}, password_hash FROM users WHERE email = ?",
                    USER_COLUMNS
                ),
                params![email.trim()],
                |row| Ok((Self::row_to_user(row)?, row.get::<_, String>(5)?)),
            )
            .optional()?;
        Ok(result)
    }

    /// List all users, oldest first
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM users ORDER BY id ASC",
            USER_COLUMNS
        ))?;
        let users = stmt
            .query_map([], |row| Self::row_to_user(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(users)
    }

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        let provider_str: String = row.get(3)?;
        let created_at_str: String = row.get(4)?;
        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            auth_provider: provider_str.parse().unwrap_or_default(),
            created_at: parse_datetime(&created_at_str),
        })
    }
}
