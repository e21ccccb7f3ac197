//! Song note resolution — maps a song and a viewer role to the ordered
//! list of notes shown next to the song (catalog listings, set list views,
//! and the PDF renderer all consume this).

use crate::db::models::{DrumPad, Instrument, Song, Starter, Viewer};

/// A derived note to display for a song. Recomputed per call; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongNote {
    pub kind: NoteKind,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    StartsWith,
    Pad,
    Notes,
    Features,
    Solos,
}

/// Resolve the notes to display for a song.
///
/// - Everyone sees who starts the song.
/// - The drummer (Me) also sees the pad and the drummer notes.
/// - The mixer also sees the featured instrument and the solo order.
///
/// Unmapped codes are silently skipped; this never fails.
pub fn song_notes(song: &Song, viewer: Viewer) -> Vec<SongNote> {
    let mut notes = Vec::new();

    if let Some(starter) = Starter::from_code(song.starts_with) {
        notes.push(SongNote {
            kind: NoteKind::StartsWith,
            text: starter.label().to_string(),
        });
    }

    if viewer == Viewer::Me {
        if let Some(pad) = DrumPad::from_code(song.pad) {
            notes.push(SongNote {
                kind: NoteKind::Pad,
                text: pad.label().to_string(),
            });
        }

        if !song.notes.is_empty() {
            notes.push(SongNote {
                kind: NoteKind::Notes,
                text: song.notes.clone(),
            });
        }
    }

    if viewer == Viewer::Mixer {
        if let Some(featured) = Instrument::from_code(song.features) {
            notes.push(SongNote {
                kind: NoteKind::Features,
                text: featured.label().to_string(),
            });
        }

        // One note per solo, in order, repeats included.
        for &code in &song.solos {
            if let Some(instrument) = Instrument::from_code(code) {
                notes.push(SongNote {
                    kind: NoteKind::Solos,
                    text: instrument.label().to_string(),
                });
            }
        }
    }

    notes
}

/// Format notes as a single display string, e.g. "Bass | Cowbell (#641) | Watch tempo".
pub fn format_notes(notes: &[SongNote]) -> String {
    notes
        .iter()
        .map(|n| n.text.as_str())
        .collect::<Vec<_>>()
        .join(" | ")
}
