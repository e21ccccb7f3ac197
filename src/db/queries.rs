use std::collections::HashMap;

use rusqlite::{OptionalExtension, params};

use super::models::{
    Band, CatalogExport, CatalogStats, Gig, NewSong, SetListSongs, SetSlot, Song,
};
use super::{Database, DbError, Result};

/// Decode a JSON integer-array column (the `solos` list).
fn decode_codes(column: &'static str, raw: &str) -> Result<Vec<i64>> {
    serde_json::from_str(raw).map_err(|source| DbError::BadJson { column, source })
}

fn encode_codes(codes: &[i64]) -> String {
    serde_json::to_string(codes).unwrap_or_else(|_| "[]".to_string())
}

impl Database {
    // ── Bands ───────────────────────────────────────────────────────

    /// Insert a band. Returns the band id.
    pub fn add_band(&self, name: &str, description: &str) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO bands (name, description) VALUES (?1, ?2)",
            params![name, description],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn band_by_name(&self, name: &str) -> Result<Option<Band>> {
        let band = self
            .conn
            .query_row(
                "SELECT id, name, description FROM bands WHERE name = ?1",
                params![name],
                |row| {
                    Ok(Band {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        description: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(band)
    }

    /// The default band when none is named: the first one created.
    pub fn first_band(&self) -> Result<Option<Band>> {
        let band = self
            .conn
            .query_row(
                "SELECT id, name, description FROM bands ORDER BY id LIMIT 1",
                [],
                |row| {
                    Ok(Band {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        description: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(band)
    }

    pub fn list_bands(&self) -> Result<Vec<Band>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, description FROM bands ORDER BY id")?;
        let bands = stmt
            .query_map([], |row| {
                Ok(Band {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(bands)
    }

    // ── Songs ───────────────────────────────────────────────────────

    /// Insert a song. Returns the song id.
    pub fn add_song(&self, s: &NewSong) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO songs (
                title, artist, length_secs,
                starts_with, features, pad, solos, notes,
                groove, drumeo, yt_music, practice
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                s.title,
                s.artist,
                s.length_secs,
                s.starts_with,
                s.features,
                s.pad,
                encode_codes(&s.solos),
                s.notes,
                s.groove,
                s.drumeo,
                s.yt_music,
                s.practice,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn update_song(&self, id: i64, s: &NewSong) -> Result<()> {
        self.conn.execute(
            "UPDATE songs SET
                title = ?1, artist = ?2, length_secs = ?3,
                starts_with = ?4, features = ?5, pad = ?6, solos = ?7, notes = ?8,
                groove = ?9, drumeo = ?10, yt_music = ?11, practice = ?12,
                updated_at = datetime('now')
             WHERE id = ?13",
            params![
                s.title,
                s.artist,
                s.length_secs,
                s.starts_with,
                s.features,
                s.pad,
                encode_codes(&s.solos),
                s.notes,
                s.groove,
                s.drumeo,
                s.yt_music,
                s.practice,
                id,
            ],
        )?;
        Ok(())
    }

    /// Remove a song. Set list entries referencing it are left to dangle,
    /// like document references; resolution reports them.
    pub fn remove_song(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM songs WHERE id = ?1", params![id])?;
        Ok(())
    }

    pub fn get_song(&self, id: i64) -> Result<Option<Song>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, title, artist, length_secs, starts_with, features, pad,
                        solos, notes, groove, drumeo, yt_music, practice
                 FROM songs WHERE id = ?1",
                params![id],
                Self::song_from_row,
            )
            .optional()?;

        match row {
            Some((mut song, solos_raw)) => {
                song.solos = decode_codes("solos", &solos_raw)?;
                song.band_ids = self.song_band_ids(song.id)?;
                Ok(Some(song))
            }
            None => Ok(None),
        }
    }

    /// All songs in the catalog with their band memberships attached.
    pub fn list_songs(&self) -> Result<Vec<Song>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, artist, length_secs, starts_with, features, pad,
                    solos, notes, groove, drumeo, yt_music, practice
             FROM songs ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], Self::song_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut memberships: HashMap<i64, Vec<i64>> = HashMap::new();
        let mut stmt = self
            .conn
            .prepare("SELECT song_id, band_id FROM song_bands ORDER BY band_id")?;
        let pairs = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        for (song_id, band_id) in pairs {
            memberships.entry(song_id).or_default().push(band_id);
        }

        let mut songs = Vec::with_capacity(rows.len());
        for (mut song, solos_raw) in rows {
            song.solos = decode_codes("solos", &solos_raw)?;
            song.band_ids = memberships.remove(&song.id).unwrap_or_default();
            songs.push(song);
        }
        Ok(songs)
    }

    /// Replace a song's band memberships.
    pub fn set_song_bands(&self, song_id: i64, band_ids: &[i64]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM song_bands WHERE song_id = ?1",
            params![song_id],
        )?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR IGNORE INTO song_bands (song_id, band_id) VALUES (?1, ?2)",
            )?;
            for band_id in band_ids {
                stmt.execute(params![song_id, band_id])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Set or clear the practice flag.
    pub fn set_practice(&self, song_id: i64, flag: bool) -> Result<()> {
        self.conn.execute(
            "UPDATE songs SET practice = ?1, updated_at = datetime('now') WHERE id = ?2",
            params![flag, song_id],
        )?;
        Ok(())
    }

    fn song_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(Song, String)> {
        let solos_raw: String = row.get(7)?;
        Ok((
            Song {
                id: row.get(0)?,
                title: row.get(1)?,
                artist: row.get(2)?,
                length_secs: row.get(3)?,
                starts_with: row.get(4)?,
                features: row.get(5)?,
                pad: row.get(6)?,
                solos: Vec::new(),
                notes: row.get(8)?,
                groove: row.get(9)?,
                drumeo: row.get(10)?,
                yt_music: row.get(11)?,
                practice: row.get(12)?,
                band_ids: Vec::new(),
            },
            solos_raw,
        ))
    }

    fn song_band_ids(&self, song_id: i64) -> Result<Vec<i64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT band_id FROM song_bands WHERE song_id = ?1 ORDER BY band_id")?;
        let ids = stmt
            .query_map(params![song_id], |row| row.get(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    // ── Gigs ────────────────────────────────────────────────────────

    /// Insert a gig with empty set lists. Returns the gig id.
    pub fn add_gig(&self, band_id: i64, venue: &str, date: &str) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO gigs (band_id, venue, date) VALUES (?1, ?2, ?3)",
            params![band_id, venue, date],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn remove_gig(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM gigs WHERE id = ?1", params![id])?;
        Ok(())
    }

    pub fn get_gig(&self, id: i64) -> Result<Option<Gig>> {
        let gig = self
            .conn
            .query_row(
                "SELECT id, band_id, venue, date FROM gigs WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Gig {
                        id: row.get(0)?,
                        band_id: row.get(1)?,
                        venue: row.get(2)?,
                        date: row.get(3)?,
                        one: Vec::new(),
                        two: Vec::new(),
                        pocket: Vec::new(),
                    })
                },
            )
            .optional()?;

        match gig {
            Some(mut gig) => {
                gig.one = self.set_song_ids(gig.id, SetSlot::One)?;
                gig.two = self.set_song_ids(gig.id, SetSlot::Two)?;
                gig.pocket = self.set_song_ids(gig.id, SetSlot::Pocket)?;
                Ok(Some(gig))
            }
            None => Ok(None),
        }
    }

    /// All of a band's gigs, set lists included.
    pub fn list_gigs(&self, band_id: i64) -> Result<Vec<Gig>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, band_id, venue, date FROM gigs WHERE band_id = ?1 ORDER BY id",
        )?;
        let mut gigs = stmt
            .query_map(params![band_id], |row| {
                Ok(Gig {
                    id: row.get(0)?,
                    band_id: row.get(1)?,
                    venue: row.get(2)?,
                    date: row.get(3)?,
                    one: Vec::new(),
                    two: Vec::new(),
                    pocket: Vec::new(),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for gig in &mut gigs {
            gig.one = self.set_song_ids(gig.id, SetSlot::One)?;
            gig.two = self.set_song_ids(gig.id, SetSlot::Two)?;
            gig.pocket = self.set_song_ids(gig.id, SetSlot::Pocket)?;
        }
        Ok(gigs)
    }

    fn set_song_ids(&self, gig_id: i64, slot: SetSlot) -> Result<Vec<i64>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT song_id FROM gig_sets WHERE gig_id = ?1 AND slot = ?2 ORDER BY position",
        )?;
        let ids = stmt
            .query_map(params![gig_id, slot.code()], |row| row.get(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    /// Replace one of a gig's set lists with the given songs, in order.
    ///
    /// A song belongs to at most one of the three lists, so the assigned
    /// songs are stripped from the other two slots first. This invariant
    /// lives here, in the editor, not in the renderer.
    pub fn assign_set(&self, gig_id: i64, slot: SetSlot, song_ids: &[i64]) -> Result<()> {
        if self.get_gig(gig_id)?.is_none() {
            return Err(DbError::MissingGig(gig_id));
        }

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM gig_sets WHERE gig_id = ?1 AND slot = ?2",
            params![gig_id, slot.code()],
        )?;
        {
            let mut strip = tx.prepare_cached(
                "DELETE FROM gig_sets WHERE gig_id = ?1 AND song_id = ?2",
            )?;
            let mut insert = tx.prepare_cached(
                "INSERT INTO gig_sets (gig_id, slot, position, song_id) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (position, song_id) in song_ids.iter().enumerate() {
                strip.execute(params![gig_id, song_id])?;
                insert.execute(params![gig_id, slot.code(), position as i64, song_id])?;
            }
        }
        tx.execute(
            "UPDATE gigs SET updated_at = datetime('now') WHERE id = ?1",
            params![gig_id],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Resolve every song reference in a gig's three set lists.
    ///
    /// All-or-nothing: the first reference that no longer resolves fails
    /// the whole batch, so the renderer only ever sees complete sets.
    pub fn gig_set_lists(&self, gig: &Gig) -> Result<SetListSongs> {
        let resolve = |ids: &[i64]| -> Result<Vec<Song>> {
            let mut songs = Vec::with_capacity(ids.len());
            for &song_id in ids {
                match self.get_song(song_id)? {
                    Some(song) => songs.push(song),
                    None => {
                        return Err(DbError::MissingSong {
                            gig_id: gig.id,
                            song_id,
                        });
                    }
                }
            }
            Ok(songs)
        };

        Ok(SetListSongs {
            one: resolve(&gig.one)?,
            two: resolve(&gig.two)?,
            pocket: resolve(&gig.pocket)?,
        })
    }

    // ── Stats, import/export ────────────────────────────────────────

    pub fn stats(&self) -> Result<CatalogStats> {
        let total_songs: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM songs", [], |row| row.get(0))?;
        let total_gigs: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM gigs", [], |row| row.get(0))?;
        let flagged_songs: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM songs WHERE practice = 1",
            [],
            |row| row.get(0),
        )?;

        let mut stmt = self.conn.prepare(
            "SELECT b.name, COUNT(sb.song_id)
             FROM bands b LEFT JOIN song_bands sb ON sb.band_id = b.id
             GROUP BY b.id ORDER BY b.id",
        )?;
        let bands = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(CatalogStats {
            total_songs,
            total_gigs,
            flagged_songs,
            bands,
        })
    }

    /// Snapshot the whole catalog for JSON export.
    pub fn export_catalog(&self) -> Result<CatalogExport> {
        let bands = self.list_bands()?;
        let songs = self.list_songs()?;
        let mut gigs = Vec::new();
        for band in &bands {
            gigs.extend(self.list_gigs(band.id)?);
        }
        Ok(CatalogExport { bands, songs, gigs })
    }

    /// Load a catalog snapshot into an empty database.
    ///
    /// Ids from the snapshot are not reused; references are remapped.
    /// Returns (bands, songs, gigs) imported.
    pub fn import_catalog(&self, doc: &CatalogExport) -> Result<(usize, usize, usize)> {
        let mut band_ids: HashMap<i64, i64> = HashMap::new();
        for band in &doc.bands {
            let id = self.add_band(&band.name, &band.description)?;
            band_ids.insert(band.id, id);
        }

        let mut song_ids: HashMap<i64, i64> = HashMap::new();
        for song in &doc.songs {
            let id = self.add_song(&NewSong::from_song(song))?;
            let mapped: Vec<i64> = song
                .band_ids
                .iter()
                .filter_map(|old| band_ids.get(old).copied())
                .collect();
            self.set_song_bands(id, &mapped)?;
            song_ids.insert(song.id, id);
        }

        let remap = |ids: &[i64]| -> Vec<i64> {
            ids.iter().filter_map(|old| song_ids.get(old).copied()).collect()
        };

        let mut imported_gigs = 0;
        for gig in &doc.gigs {
            let Some(&band_id) = band_ids.get(&gig.band_id) else {
                log::warn!("gig {} references unknown band {}, skipping", gig.id, gig.band_id);
                continue;
            };
            let id = self.add_gig(band_id, &gig.venue, &gig.date)?;
            self.assign_set(id, SetSlot::One, &remap(&gig.one))?;
            self.assign_set(id, SetSlot::Two, &remap(&gig.two))?;
            self.assign_set(id, SetSlot::Pocket, &remap(&gig.pocket))?;
            imported_gigs += 1;
        }

        Ok((doc.bands.len(), doc.songs.len(), imported_gigs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(title: &str) -> NewSong {
        NewSong {
            title: title.to_string(),
            artist: "Test Artist".to_string(),
            length_secs: 180,
            ..NewSong::default()
        }
    }

    #[test]
    fn song_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let id = db
            .add_song(&NewSong {
                solos: vec![1, 4],
                pad: 0,
                notes: "Watch tempo".to_string(),
                ..song("Fire on the Mountain")
            })
            .unwrap();

        let loaded = db.get_song(id).unwrap().unwrap();
        assert_eq!(loaded.title, "Fire on the Mountain");
        assert_eq!(loaded.solos, vec![1, 4]);
        assert_eq!(loaded.pad, 0);
        assert_eq!(loaded.notes, "Watch tempo");
        assert!(loaded.band_ids.is_empty());
    }

    #[test]
    fn memberships_attach_to_listed_songs() {
        let db = Database::open_in_memory().unwrap();
        let band = db.add_band("covers", "The Cover Band").unwrap();
        let other = db.add_band("originals", "Originals").unwrap();
        let id = db.add_song(&song("Bertha")).unwrap();
        db.set_song_bands(id, &[band, other]).unwrap();
        db.add_song(&song("Sugaree")).unwrap();

        let songs = db.list_songs().unwrap();
        assert_eq!(songs.len(), 2);
        assert_eq!(songs[0].band_ids, vec![band, other]);
        assert!(songs[1].band_ids.is_empty());
    }

    #[test]
    fn assign_set_replaces_and_orders() {
        let db = Database::open_in_memory().unwrap();
        let band = db.add_band("b", "").unwrap();
        let gig = db.add_gig(band, "The Barn", "2025-06-01").unwrap();
        let a = db.add_song(&song("A")).unwrap();
        let b = db.add_song(&song("B")).unwrap();
        let c = db.add_song(&song("C")).unwrap();

        db.assign_set(gig, SetSlot::One, &[b, a]).unwrap();
        db.assign_set(gig, SetSlot::One, &[a, b, c]).unwrap();

        let loaded = db.get_gig(gig).unwrap().unwrap();
        assert_eq!(loaded.one, vec![a, b, c]);
        assert!(loaded.two.is_empty());
    }

    #[test]
    fn assign_set_keeps_songs_in_one_slot() {
        let db = Database::open_in_memory().unwrap();
        let band = db.add_band("b", "").unwrap();
        let gig = db.add_gig(band, "The Barn", "2025-06-01").unwrap();
        let a = db.add_song(&song("A")).unwrap();
        let b = db.add_song(&song("B")).unwrap();

        db.assign_set(gig, SetSlot::One, &[a, b]).unwrap();
        // Moving A into the pocket strips it from Set One.
        db.assign_set(gig, SetSlot::Pocket, &[a]).unwrap();

        let loaded = db.get_gig(gig).unwrap().unwrap();
        assert_eq!(loaded.one, vec![b]);
        assert_eq!(loaded.pocket, vec![a]);
    }

    #[test]
    fn assign_to_unknown_gig_fails() {
        let db = Database::open_in_memory().unwrap();
        let err = db.assign_set(99, SetSlot::One, &[]).unwrap_err();
        assert!(matches!(err, DbError::MissingGig(99)));
    }

    #[test]
    fn set_list_resolution_is_all_or_nothing() {
        let db = Database::open_in_memory().unwrap();
        let band = db.add_band("b", "").unwrap();
        let gig = db.add_gig(band, "The Barn", "2025-06-01").unwrap();
        let a = db.add_song(&song("A")).unwrap();
        let b = db.add_song(&song("B")).unwrap();
        db.assign_set(gig, SetSlot::One, &[a, b]).unwrap();

        let loaded = db.get_gig(gig).unwrap().unwrap();
        assert_eq!(db.gig_set_lists(&loaded).unwrap().one.len(), 2);

        // Removing a referenced song leaves a dangling reference, and the
        // whole batch fails, not just the one song.
        db.remove_song(a).unwrap();
        let loaded = db.get_gig(gig).unwrap().unwrap();
        let err = db.gig_set_lists(&loaded).unwrap_err();
        assert!(matches!(err, DbError::MissingSong { song_id, .. } if song_id == a));
    }

    #[test]
    fn export_import_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let band = db.add_band("covers", "The Cover Band").unwrap();
        let a = db.add_song(&song("A")).unwrap();
        db.set_song_bands(a, &[band]).unwrap();
        let gig = db.add_gig(band, "The Barn", "2025-06-01").unwrap();
        db.assign_set(gig, SetSlot::One, &[a]).unwrap();

        let doc = db.export_catalog().unwrap();
        let fresh = Database::open_in_memory().unwrap();
        let (bands, songs, gigs) = fresh.import_catalog(&doc).unwrap();
        assert_eq!((bands, songs, gigs), (1, 1, 1));

        let band = fresh.first_band().unwrap().unwrap();
        let gigs = fresh.list_gigs(band.id).unwrap();
        assert_eq!(gigs.len(), 1);
        assert_eq!(gigs[0].one.len(), 1);
        let sets = fresh.gig_set_lists(&gigs[0]).unwrap();
        assert_eq!(sets.one[0].title, "A");
    }
}
