//! UUID utilities

use uuid::Uuid;

/// Generate a new UUIDv4
pub fn generate() -> Uuid {
    Uuid::new_v4()
}

/// Parse UUID from string
pub fn parse(s: &str) -> Result<Uuid, uuid::Error> {
    Uuid::parse_str(s.trim())
}

/// Parse a UUID column read back from SQLite (ids are stored as TEXT)
pub fn from_column(s: &str) -> crate::Result<Uuid> {
    parse(s).map_err(|e| crate::Error::Internal(format!("Corrupt id {:?} in database: {}", s, e)))
}
