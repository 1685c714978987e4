//! SQLite-backed media store implementation.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};

use super::{MediaAsset, MediaId, MediaStore, MediaStoreError};

const SELECT_COLUMNS: &str =
    "SELECT id, title, year, is_movie, txdb_id, monitor, folder_path, trailer_exists FROM media";

/// SQLite-backed media store.
pub struct SqliteMediaStore {
    conn: Mutex<Connection>,
}

impl SqliteMediaStore {
    /// Open (or create) the database file and ensure the schema exists.
    pub fn new(path: &Path) -> Result<Self, MediaStoreError> {
        let conn = Connection::open(path)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, MediaStoreError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), MediaStoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS media (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                year INTEGER,
                is_movie INTEGER NOT NULL,
                txdb_id TEXT NOT NULL,
                monitor INTEGER NOT NULL DEFAULT 0,
                folder_path TEXT,
                trailer_exists INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_media_txdb_id ON media(txdb_id);
            "#,
        )?;
        Ok(())
    }

    fn row_to_media(row: &rusqlite::Row) -> rusqlite::Result<MediaAsset> {
        let folder_path: Option<String> = row.get(6)?;
        Ok(MediaAsset {
            id: row.get(0)?,
            title: row.get(1)?,
            year: row.get(2)?,
            is_movie: row.get(3)?,
            txdb_id: row.get(4)?,
            monitor: row.get(5)?,
            folder_path: folder_path.map(PathBuf::from),
            trailer_exists: row.get(7)?,
        })
    }
}

impl MediaStore for SqliteMediaStore {
    fn read_all(&self) -> Result<Vec<MediaAsset>, MediaStoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!("{} ORDER BY id", SELECT_COLUMNS))?;
        let rows = stmt.query_map([], Self::row_to_media)?;
        let media = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(media)
    }

    fn read(&self, id: MediaId) -> Result<MediaAsset, MediaStoreError> {
        let conn = self.conn.lock();
        conn.query_row(
            &format!("{} WHERE id = ?", SELECT_COLUMNS),
            params![id],
            Self::row_to_media,
        )
        .optional()?
        .ok_or(MediaStoreError::NotFound(id))
    }

    fn upsert(&self, media: &MediaAsset) -> Result<(), MediaStoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT OR REPLACE INTO media (id, title, year, is_movie, txdb_id, monitor, folder_path, trailer_exists) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                media.id,
                media.title,
                media.year,
                media.is_movie,
                media.txdb_id,
                media.monitor,
                media
                    .folder_path
                    .as_ref()
                    .map(|p| p.to_string_lossy().to_string()),
                media.trailer_exists,
            ],
        )?;
        Ok(())
    }

    fn set_trailer_exists(&self, id: MediaId, exists: bool) -> Result<(), MediaStoreError> {
        let conn = self.conn.lock();
        let updated = conn.execute(
            "UPDATE media SET trailer_exists = ? WHERE id = ?",
            params![exists, id],
        )?;
        if updated == 0 {
            return Err(MediaStoreError::NotFound(id));
        }
        Ok(())
    }
}
