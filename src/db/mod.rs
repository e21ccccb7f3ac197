pub mod models;
pub mod queries;

use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("song {song_id} referenced by gig {gig_id} does not exist")]
    MissingSong { gig_id: i64, song_id: i64 },
    #[error("gig {0} does not exist")]
    MissingGig(i64),
    #[error("bad JSON in column {column}: {source}")]
    BadJson {
        column: &'static str,
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, DbError>;

pub struct Database {
    pub conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    fn init(&self) -> Result<()> {
        // WAL mode for better concurrent read performance
        self.conn.pragma_update(None, "journal_mode", "WAL")?;
        self.conn.pragma_update(None, "synchronous", "NORMAL")?;
        self.conn.pragma_update(None, "foreign_keys", "ON")?;
        self.migrate()?;
        Ok(())
    }

    fn migrate(&self) -> Result<()> {
        let version: i32 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap_or(0);

        if version < 1 {
            self.migrate_v1()?;
        }

        self.conn.pragma_update(None, "user_version", 1)?;
        Ok(())
    }

    /// V1: bands, songs, memberships, gigs, set lists.
    ///
    /// `gig_sets.song_id` intentionally carries no foreign key: set lists
    /// hold document-style references that may dangle after a song is
    /// removed, and resolution reports the dangling reference instead.
    fn migrate_v1(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS bands (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                name            TEXT NOT NULL UNIQUE,
                description     TEXT NOT NULL DEFAULT ''
            );

            CREATE TABLE IF NOT EXISTS songs (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                title           TEXT NOT NULL,
                artist          TEXT NOT NULL DEFAULT '',
                length_secs     INTEGER NOT NULL DEFAULT 0,

                -- Stage notes (raw enum codes; -1 = none)
                starts_with     INTEGER NOT NULL DEFAULT 0,
                features        INTEGER NOT NULL DEFAULT -1,
                pad             INTEGER NOT NULL DEFAULT -1,
                solos           TEXT NOT NULL DEFAULT '[]',  -- JSON array of instrument codes
                notes           TEXT NOT NULL DEFAULT '',

                -- Rehearsal links
                groove          TEXT NOT NULL DEFAULT '',
                drumeo          TEXT NOT NULL DEFAULT '',
                yt_music        TEXT NOT NULL DEFAULT '',

                practice        INTEGER NOT NULL DEFAULT 0,

                created_at      TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at      TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX IF NOT EXISTS idx_songs_title ON songs(title);
            CREATE INDEX IF NOT EXISTS idx_songs_practice ON songs(practice);

            CREATE TABLE IF NOT EXISTS song_bands (
                song_id         INTEGER NOT NULL REFERENCES songs(id) ON DELETE CASCADE,
                band_id         INTEGER NOT NULL REFERENCES bands(id) ON DELETE CASCADE,
                UNIQUE(song_id, band_id)
            );
            CREATE INDEX IF NOT EXISTS idx_song_bands_band ON song_bands(band_id);

            CREATE TABLE IF NOT EXISTS gigs (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                band_id         INTEGER NOT NULL REFERENCES bands(id) ON DELETE CASCADE,
                venue           TEXT NOT NULL,
                date            TEXT NOT NULL,  -- YYYY-MM-DD
                created_at      TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at      TEXT NOT NULL DEFAULT (datetime('now'))
            );
            CREATE INDEX IF NOT EXISTS idx_gigs_band ON gigs(band_id);
            CREATE INDEX IF NOT EXISTS idx_gigs_date ON gigs(date);

            CREATE TABLE IF NOT EXISTS gig_sets (
                gig_id          INTEGER NOT NULL REFERENCES gigs(id) ON DELETE CASCADE,
                slot            INTEGER NOT NULL,  -- 0 = Set One, 1 = Set Two, 2 = Pocket
                position        INTEGER NOT NULL,
                song_id         INTEGER NOT NULL,
                UNIQUE(gig_id, slot, position)
            );
            CREATE INDEX IF NOT EXISTS idx_gig_sets_gig ON gig_sets(gig_id);
            ",
        )?;
        Ok(())
    }
}
