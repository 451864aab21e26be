//! SQLite-backed slot storage.
//!
//! # Responsibility
//! - Persist slots as rows of the `slots` table.
//! - Reject connections that were not bootstrapped through `db::open_db*`.
//!
//! # Invariants
//! - One row per slot name; writes are upserts.
//! - `updated_at` is refreshed on every write.

use super::{slot_text, validate_slot_name, SlotStorage, StorageError, StorageResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Slot storage over a migrated SQLite connection.
pub struct SqliteSlotStorage<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotStorage<'conn> {
    /// Wraps a connection after checking the `slots` table is present.
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        ensure_slots_table(conn)?;
        Ok(Self { conn })
    }
}

impl SlotStorage for SqliteSlotStorage<'_> {
    fn read_slot(&self, name: &str) -> StorageResult<Option<String>> {
        validate_slot_name(name)?;
        // Read as bytes; TEXT holding invalid UTF-8 must not surface as a db error.
        let bytes = self
            .conn
            .query_row(
                "SELECT CAST(value AS BLOB) FROM slots WHERE name = ?1;",
                [name],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        bytes.map(|bytes| slot_text(name, bytes)).transpose()
    }

    fn write_slot(&mut self, name: &str, value: &str) -> StorageResult<()> {
        validate_slot_name(name)?;
        self.conn.execute(
            "INSERT INTO slots (name, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(name) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![name, value],
        )?;
        Ok(())
    }

    fn remove_slot(&mut self, name: &str) -> StorageResult<()> {
        validate_slot_name(name)?;
        self.conn
            .execute("DELETE FROM slots WHERE name = ?1;", [name])?;
        Ok(())
    }
}

fn ensure_slots_table(conn: &Connection) -> StorageResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = 'slots'
        );",
        [],
        |row| row.get(0),
    )?;
    if exists == 1 {
        Ok(())
    } else {
        Err(StorageError::MissingRequiredTable("slots"))
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteSlotStorage;
    use crate::db::open_db_in_memory;
    use crate::storage::{SlotStorage, StorageError};
    use rusqlite::Connection;

    #[test]
    fn upsert_replaces_existing_value() {
        let conn = open_db_in_memory().unwrap();
        let mut storage = SqliteSlotStorage::try_new(&conn).unwrap();
        storage.write_slot("notes", "[1]").unwrap();
        storage.write_slot("notes", "[2]").unwrap();

        assert_eq!(storage.read_slot("notes").unwrap().as_deref(), Some("[2]"));
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM slots;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn remove_deletes_row_and_tolerates_absence() {
        let conn = open_db_in_memory().unwrap();
        let mut storage = SqliteSlotStorage::try_new(&conn).unwrap();
        storage.write_slot("notes", "[]").unwrap();
        storage.remove_slot("notes").unwrap();
        storage.remove_slot("notes").unwrap();
        assert_eq!(storage.read_slot("notes").unwrap(), None);
    }

    #[test]
    fn non_utf8_text_reads_as_invalid_encoding() {
        let conn = open_db_in_memory().unwrap();
        conn.execute(
            "INSERT INTO slots (name, value) VALUES ('notes', CAST(X'FFFE5B5D' AS TEXT));",
            [],
        )
        .unwrap();
        let storage = SqliteSlotStorage::try_new(&conn).unwrap();
        assert!(matches!(
            storage.read_slot("notes"),
            Err(StorageError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn unmigrated_connection_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(SqliteSlotStorage::try_new(&conn).is_err());
    }
}
