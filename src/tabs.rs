//! Rehearsal link resolution — which tab/reference site to point each
//! band member at, and the URL to open there.

use crate::db::models::{Song, Viewer};

/// Tablature/reference source website.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabSource {
    Songsterr,
    UltimateGuitar,
    LyricsGenius,
    GrooveScribe,
    YouTubeMusic,
}

impl TabSource {
    pub fn label(self) -> &'static str {
        match self {
            Self::Songsterr => "Songsterr",
            Self::UltimateGuitar => "Ultimate Guitar",
            Self::LyricsGenius => "Genius",
            Self::GrooveScribe => "GrooveScribe",
            Self::YouTubeMusic => "YouTube",
        }
    }
}

/// Pick the tab source for a viewer. The drummer gets the stored groove
/// tab when performing and Songsterr when practicing.
pub fn tab_source(viewer: Viewer, practice: bool) -> TabSource {
    match viewer {
        Viewer::Me => {
            if practice {
                TabSource::Songsterr
            } else {
                TabSource::GrooveScribe
            }
        }
        Viewer::Vocals => TabSource::LyricsGenius,
        Viewer::Guitars => TabSource::UltimateGuitar,
        _ => TabSource::YouTubeMusic,
    }
}

/// Build the URL for a song at a tab source. `None` when the source needs
/// a stored link the song doesn't have.
pub fn tab_link(song: &Song, source: TabSource) -> Option<String> {
    let q = encode_query(&format!("{} {}", song.artist, song.title));

    match source {
        TabSource::YouTubeMusic => {
            if song.yt_music.is_empty() {
                Some(format!(
                    "https://www.youtube.com/results?search_query={q}"
                ))
            } else {
                Some(format!(
                    "https://www.youtube.com/watch?v={}",
                    song.yt_music
                ))
            }
        }
        TabSource::LyricsGenius => Some(format!("https://genius.com/search?q={q}")),
        TabSource::UltimateGuitar => Some(format!(
            "https://www.ultimate-guitar.com/search.php?search_type=title&value={q}"
        )),
        TabSource::Songsterr => Some(format!(
            "https://www.songsterr.com/?pattern={q}&inst=drum"
        )),
        TabSource::GrooveScribe => {
            if song.groove.is_empty() {
                None
            } else {
                Some(song.groove.clone())
            }
        }
    }
}

/// Percent-encode characters that break query-string URLs.
fn encode_query(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            ' ' => out.push_str("%20"),
            '&' => out.push_str("%26"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            '+' => out.push_str("%2B"),
            '%' => out.push_str("%25"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_song() -> Song {
        Song {
            id: 1,
            title: "Fire on the Mountain".to_string(),
            artist: "Grateful Dead".to_string(),
            length_secs: 300,
            starts_with: 0,
            features: -1,
            pad: -1,
            solos: Vec::new(),
            notes: String::new(),
            groove: String::new(),
            drumeo: String::new(),
            yt_music: String::new(),
            practice: false,
            band_ids: Vec::new(),
        }
    }

    #[test]
    fn source_per_viewer() {
        assert_eq!(tab_source(Viewer::Me, false), TabSource::GrooveScribe);
        assert_eq!(tab_source(Viewer::Me, true), TabSource::Songsterr);
        assert_eq!(tab_source(Viewer::Vocals, false), TabSource::LyricsGenius);
        assert_eq!(tab_source(Viewer::Guitars, false), TabSource::UltimateGuitar);
        assert_eq!(tab_source(Viewer::Mixer, false), TabSource::YouTubeMusic);
        assert_eq!(tab_source(Viewer::None, true), TabSource::YouTubeMusic);
    }

    #[test]
    fn youtube_prefers_stored_video_id() {
        let mut song = make_song();
        let link = tab_link(&song, TabSource::YouTubeMusic).unwrap();
        assert_eq!(
            link,
            "https://www.youtube.com/results?search_query=Grateful%20Dead%20Fire%20on%20the%20Mountain"
        );

        song.yt_music = "dQw4w9WgXcQ".to_string();
        let link = tab_link(&song, TabSource::YouTubeMusic).unwrap();
        assert_eq!(link, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }

    #[test]
    fn groove_requires_stored_tab() {
        let mut song = make_song();
        assert!(tab_link(&song, TabSource::GrooveScribe).is_none());

        song.groove = "https://montulli.github.io/GrooveScribe/?TimeSig=4/4".to_string();
        assert_eq!(
            tab_link(&song, TabSource::GrooveScribe).as_deref(),
            Some("https://montulli.github.io/GrooveScribe/?TimeSig=4/4")
        );
    }

    #[test]
    fn query_characters_are_encoded() {
        let song = Song {
            artist: "Simon & Garfunkel".to_string(),
            title: "The 59th Street Bridge Song (Feelin' Groovy)".to_string(),
            ..make_song()
        };
        let link = tab_link(&song, TabSource::LyricsGenius).unwrap();
        assert!(link.contains("Simon%20%26%20Garfunkel"));
        assert!(!link.contains(' '));
    }
}
