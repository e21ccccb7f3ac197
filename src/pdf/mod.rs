//! Set list PDF generation.
//!
//! `render_set_list` takes a gig, its fully resolved set lists, and the
//! viewer role, and produces the finished document bytes plus the client
//! filename. The caller decides where the file goes and surfaces errors;
//! rendering itself does no I/O.

mod layout;
mod metrics;
mod writer;

use chrono::NaiveDate;
use thiserror::Error;

use crate::db::models::{Gig, SetListSongs, Song, Viewer};
use crate::notes::{NoteKind, song_notes};

use layout::{FEATURES_GLYPH, SOLOS_GLYPH};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("gig date {0:?} is not a YYYY-MM-DD date")]
    InvalidDate(String),
}

/// A finished set list document plus its client filename.
pub struct SetListPdf {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Generate the set list PDF for a gig.
///
/// Letter pages; venue and date in a header repeated on every page; Set
/// One and Set Two side by side; the pocket set below them, pushed to a
/// fresh page when it would not fit; a glyph legend for the mixer.
pub fn render_set_list(
    gig: &Gig,
    songs: &SetListSongs,
    viewer: Viewer,
) -> Result<SetListPdf, RenderError> {
    let date = format_gig_date(&gig.date)?;
    let pages = layout::layout_set_list(&gig.venue, &date, songs, viewer);
    let bytes = writer::write_document(&pages);

    Ok(SetListPdf {
        file_name: format!("{}-{}.pdf", gig.venue, date),
        bytes,
    })
}

/// Header/filename date: "15 Dec 2025".
pub fn format_gig_date(date: &str) -> Result<String, RenderError> {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| RenderError::InvalidDate(date.to_string()))?;
    Ok(parsed.format("%-d %b %Y").to_string())
}

/// Total set length in whole minutes, e.g. "5 minutes".
pub fn set_list_length(songs: &[Song]) -> String {
    let total_secs: i64 = songs.iter().map(|s| s.length_secs).sum();
    format!("{} minutes", (total_secs as f64 / 60.0).round() as i64)
}

fn set_list_title(title: &str, songs: &[Song]) -> String {
    format!("{} ({})", title, set_list_length(songs))
}

/// A note as printed on the sheet: optional ZapfDingbats glyph + text.
struct PdfNote {
    symbol: Option<&'static str>,
    text: String,
}

/// The notes to print under a song title.
///
/// Pad and drummer notes are screen-only and never printed. The mixer
/// sheet also drops StartsWith, and its solo notes are consolidated into
/// one comma-joined run so a long solo order stays on one line.
fn pdf_notes(song: &Song, viewer: Viewer) -> Vec<PdfNote> {
    let mut notes = Vec::new();
    let mut solo_texts: Vec<String> = Vec::new();

    for note in song_notes(song, viewer) {
        match note.kind {
            NoteKind::Pad | NoteKind::Notes => {}
            NoteKind::StartsWith if viewer == Viewer::Mixer => {}
            NoteKind::StartsWith => notes.push(PdfNote {
                symbol: None,
                text: note.text,
            }),
            NoteKind::Features => notes.push(PdfNote {
                symbol: Some(FEATURES_GLYPH),
                text: note.text,
            }),
            NoteKind::Solos => solo_texts.push(note.text),
        }
    }

    if !solo_texts.is_empty() {
        notes.push(PdfNote {
            symbol: Some(SOLOS_GLYPH),
            text: solo_texts.join(", "),
        });
    }

    notes
}

#[cfg(test)]
mod tests {
    use super::layout::{PageLayout, layout_set_list};
    use super::*;
    use crate::db::models::Instrument;

    fn make_song(title: &str, length_secs: i64) -> Song {
        Song {
            id: 0,
            title: title.to_string(),
            artist: String::new(),
            length_secs,
            starts_with: -1,
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

    fn make_gig(venue: &str, date: &str) -> Gig {
        Gig {
            id: 1,
            band_id: 1,
            venue: venue.to_string(),
            date: date.to_string(),
            one: Vec::new(),
            two: Vec::new(),
            pocket: Vec::new(),
        }
    }

    fn many(prefix: &str, n: usize) -> Vec<Song> {
        (0..n)
            .map(|i| make_song(&format!("{prefix} {i}"), 180))
            .collect()
    }

    fn texts(page: &PageLayout) -> Vec<&str> {
        page.spans.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn set_length_rounds_to_whole_minutes() {
        let songs = vec![
            make_song("A", 60),
            make_song("B", 90),
            make_song("C", 150),
        ];
        assert_eq!(set_list_length(&songs), "5 minutes");
        assert_eq!(set_list_title("Set One", &songs), "Set One (5 minutes)");
    }

    #[test]
    fn date_formatting() {
        assert_eq!(format_gig_date("2025-12-15").unwrap(), "15 Dec 2025");
        assert_eq!(format_gig_date("2026-03-01").unwrap(), "1 Mar 2026");
        assert!(matches!(
            format_gig_date("next friday"),
            Err(RenderError::InvalidDate(_))
        ));
    }

    #[test]
    fn mixer_solos_consolidate_into_one_note() {
        let song = Song {
            solos: vec![Instrument::Bass.code(), Instrument::Keys.code()],
            ..make_song("Jam", 300)
        };
        let notes = pdf_notes(&song, Viewer::Mixer);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].text, "Bass, Keys");
        assert_eq!(notes[0].symbol, Some(SOLOS_GLYPH));
    }

    #[test]
    fn mixer_sheet_drops_starts_with() {
        let song = Song {
            starts_with: 2, // Drums
            features: Instrument::Trumpet.code(),
            ..make_song("Jam", 300)
        };
        let notes = pdf_notes(&song, Viewer::Mixer);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].text, "Trumpet");
        assert_eq!(notes[0].symbol, Some(FEATURES_GLYPH));

        // Everyone else keeps it, without a glyph.
        let notes = pdf_notes(&song, Viewer::Vocals);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].text, "Drums");
        assert_eq!(notes[0].symbol, None);
    }

    #[test]
    fn drummer_screen_notes_never_print() {
        let song = Song {
            starts_with: 2,
            pad: 0,
            notes: "Watch tempo".to_string(),
            ..make_song("Jam", 300)
        };
        let notes = pdf_notes(&song, Viewer::Me);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].text, "Drums");
    }

    #[test]
    fn single_page_single_set() {
        let gig = make_gig("The Jazz Club", "2025-12-15");
        let sets = SetListSongs {
            one: vec![make_song("Opening Song", 180)],
            ..SetListSongs::default()
        };

        let pages = layout_set_list("The Jazz Club", "15 Dec 2025", &sets, Viewer::None);
        assert_eq!(pages.len(), 1);

        let all = texts(&pages[0]);
        assert!(all.contains(&"The Jazz Club"));
        assert!(all.contains(&"15 Dec 2025"));
        assert!(all.contains(&"Set One (3 minutes)"));
        assert!(all.contains(&"Opening Song"));
        // Default annotation fields: no note line at all.
        assert_eq!(all.len(), 4);

        let pdf = render_set_list(&gig, &sets, Viewer::None).unwrap();
        assert_eq!(pdf.file_name, "The Jazz Club-15 Dec 2025.pdf");
        assert!(pdf.bytes.starts_with(b"%PDF-1.4"));
    }

    #[test]
    fn note_line_sits_under_the_title() {
        let sets = SetListSongs {
            one: vec![Song {
                starts_with: 8, // Bass
                ..make_song("Althea", 300)
            }],
            ..SetListSongs::default()
        };

        let pages = layout_set_list("The Barn", "1 Jun 2025", &sets, Viewer::None);
        let title = pages[0]
            .spans
            .iter()
            .find(|s| s.text == "Althea")
            .unwrap();
        let note = pages[0].spans.iter().find(|s| s.text == "Bass").unwrap();
        assert_eq!(title.y, 30.0);
        assert_eq!(note.y, 35.0);
        assert_eq!(note.x, title.x + 4.0);
    }

    #[test]
    fn second_set_renders_as_a_second_column() {
        let sets = SetListSongs {
            one: many("One", 3),
            two: many("Two", 2),
            ..SetListSongs::default()
        };

        let pages = layout_set_list("The Barn", "1 Jun 2025", &sets, Viewer::None);
        assert_eq!(pages.len(), 1);

        let one_title = pages[0]
            .spans
            .iter()
            .find(|s| s.text.starts_with("Set One"))
            .unwrap();
        let two_title = pages[0]
            .spans
            .iter()
            .find(|s| s.text.starts_with("Set Two"))
            .unwrap();
        assert_eq!(one_title.y, two_title.y);
        assert_eq!(two_title.x - one_title.x, 100.0);
    }

    #[test]
    fn pocket_overflow_breaks_the_page_once() {
        let sets = SetListSongs {
            one: many("One", 15),
            two: many("Two", 15),
            pocket: many("Pocket", 10),
        };

        let pages = layout_set_list("The Barn", "1 Jun 2025", &sets, Viewer::None);
        assert_eq!(pages.len(), 2);

        // The pocket set lands entirely on page two.
        assert!(!texts(&pages[0]).iter().any(|t| t.starts_with("Pocket")));
        assert!(texts(&pages[1]).contains(&"Pocket 9"));

        // The header is re-rendered identically on the new page.
        for page in &pages {
            let venue = page.spans.iter().find(|s| s.text == "The Barn").unwrap();
            let date = page.spans.iter().find(|s| s.text == "1 Jun 2025").unwrap();
            assert_eq!((venue.x, venue.y), (10.0, 10.0));
            assert_eq!(date.y, 10.0);
        }

        // And the pocket set starts back at the top of the body.
        let pocket_title = pages[1]
            .spans
            .iter()
            .find(|s| s.text.starts_with("Pocket"))
            .unwrap();
        assert_eq!(pocket_title.y, 20.0);
    }

    #[test]
    fn pocket_stays_on_one_page_when_it_fits() {
        let sets = SetListSongs {
            one: many("One", 4),
            two: many("Two", 4),
            pocket: many("Pocket", 3),
        };
        let pages = layout_set_list("The Barn", "1 Jun 2025", &sets, Viewer::None);
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn legend_only_for_the_mixer_and_only_once() {
        let overflow = SetListSongs {
            one: many("One", 15),
            two: many("Two", 15),
            pocket: many("Pocket", 10),
        };

        for (viewer, expected) in [(Viewer::Mixer, 1), (Viewer::Me, 0), (Viewer::None, 0)] {
            let pages = layout_set_list("The Barn", "1 Jun 2025", &overflow, viewer);
            let featured: usize = pages
                .iter()
                .flat_map(|p| p.spans.iter())
                .filter(|s| s.text == "= Featured")
                .count();
            let solos: usize = pages
                .iter()
                .flat_map(|p| p.spans.iter())
                .filter(|s| s.text == "= Solos")
                .count();
            assert_eq!(featured, expected);
            assert_eq!(solos, expected);
        }

        // Even on an overflowing gig, the legend lands only on the last page.
        let pages = layout_set_list("The Barn", "1 Jun 2025", &overflow, Viewer::Mixer);
        assert!(!texts(&pages[0]).contains(&"= Featured"));
        assert!(texts(&pages[1]).contains(&"= Featured"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let gig = make_gig("The Barn", "2025-06-01");
        let sets = SetListSongs {
            one: many("One", 5),
            two: many("Two", 3),
            pocket: many("Pocket", 2),
        };
        let a = render_set_list(&gig, &sets, Viewer::Mixer).unwrap();
        let b = render_set_list(&gig, &sets, Viewer::Mixer).unwrap();
        assert_eq!(a.bytes, b.bytes);
        assert_eq!(a.file_name, b.file_name);
    }
}
