//! Catalog filter and sort helpers — single-pass predicates over
//! already-fetched lists.

use crate::db::models::{Gig, Song};

/// Which slice of the catalog to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SongFilter {
    /// Songs the current band plays.
    All,
    /// Songs flagged as needing practice.
    Practice,
    /// Songs no band plays.
    Orphans,
    /// Songs only other bands play.
    Others,
}

impl SongFilter {
    pub fn matches(self, song: &Song, band_id: i64) -> bool {
        match self {
            Self::All => !song.band_ids.is_empty() && song.band_ids.contains(&band_id),
            Self::Others => !song.band_ids.is_empty() && !song.band_ids.contains(&band_id),
            Self::Practice => song.practice,
            Self::Orphans => song.band_ids.is_empty(),
        }
    }
}

/// Filter songs for a band and sort them by title.
pub fn filter_songs(mut songs: Vec<Song>, filter: SongFilter, band_id: i64) -> Vec<Song> {
    songs.retain(|s| filter.matches(s, band_id));
    songs.sort_by(|a, b| a.title.cmp(&b.title));
    songs
}

/// Sort gigs newest first. Dates are ISO `YYYY-MM-DD` text, so
/// lexicographic order is chronological order.
pub fn sort_gigs_by_date(gigs: &mut [Gig]) {
    gigs.sort_by(|a, b| b.date.cmp(&a.date));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_song(title: &str, band_ids: &[i64], practice: bool) -> Song {
        Song {
            id: 0,
            title: title.to_string(),
            artist: String::new(),
            length_secs: 0,
            starts_with: 0,
            features: -1,
            pad: -1,
            solos: Vec::new(),
            notes: String::new(),
            groove: String::new(),
            drumeo: String::new(),
            yt_music: String::new(),
            practice,
            band_ids: band_ids.to_vec(),
        }
    }

    fn make_gig(venue: &str, date: &str) -> Gig {
        Gig {
            id: 0,
            band_id: 1,
            venue: venue.to_string(),
            date: date.to_string(),
            one: Vec::new(),
            two: Vec::new(),
            pocket: Vec::new(),
        }
    }

    fn catalog() -> Vec<Song> {
        vec![
            make_song("Bertha", &[1], false),
            make_song("Althea", &[1, 2], true),
            make_song("Scarlet Begonias", &[2], false),
            make_song("Deal", &[], false),
        ]
    }

    #[test]
    fn all_keeps_current_band_members() {
        let songs = filter_songs(catalog(), SongFilter::All, 1);
        let titles: Vec<&str> = songs.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Althea", "Bertha"]);
    }

    #[test]
    fn others_excludes_current_band() {
        let songs = filter_songs(catalog(), SongFilter::Others, 1);
        let titles: Vec<&str> = songs.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Scarlet Begonias"]);
    }

    #[test]
    fn orphans_have_no_band() {
        let songs = filter_songs(catalog(), SongFilter::Orphans, 1);
        let titles: Vec<&str> = songs.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Deal"]);
    }

    #[test]
    fn practice_ignores_membership() {
        let songs = filter_songs(catalog(), SongFilter::Practice, 7);
        let titles: Vec<&str> = songs.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Althea"]);
    }

    #[test]
    fn gigs_sort_newest_first() {
        let mut gigs = vec![
            make_gig("The Barn", "2025-06-01"),
            make_gig("The Jazz Club", "2025-12-15"),
            make_gig("Town Hall", "2024-11-30"),
        ];
        sort_gigs_by_date(&mut gigs);
        let venues: Vec<&str> = gigs.iter().map(|g| g.venue.as_str()).collect();
        assert_eq!(venues, vec!["The Jazz Club", "The Barn", "Town Hall"]);
    }
}
