use serde::{Deserialize, Serialize};

/// A band that plays some subset of the song catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Band {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// A song row read from the database.
///
/// The starter, featured-instrument, pad and solo fields hold raw codes as
/// stored; they are decoded with [`Starter::from_code`] and friends at
/// display time so that an unmapped code degrades to "no note" instead of
/// failing a read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Song {
    pub id: i64,
    pub title: String,
    pub artist: String,
    /// Song length in seconds.
    pub length_secs: i64,
    /// The musician that starts the song (code into [`Starter`]).
    pub starts_with: i64,
    /// The instrument featured in this song (code into [`Instrument`], -1 = none).
    pub features: i64,
    /// Auxiliary drum pad used in this song (code into [`DrumPad`], -1 = none).
    pub pad: i64,
    /// The instruments that solo in this song, in order.
    pub solos: Vec<i64>,
    /// Drummer notes for this song.
    pub notes: String,
    /// The groovescribe drum tab URL.
    pub groove: String,
    /// Any non-groovescribe drum tab URL.
    pub drumeo: String,
    /// YouTube video id.
    pub yt_music: String,
    /// Indicates this song needs practice.
    pub practice: bool,
    /// The bands that play this song.
    pub band_ids: Vec<i64>,
}

/// Data for inserting or updating a song.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    pub length_secs: i64,
    pub starts_with: i64,
    pub features: i64,
    pub pad: i64,
    pub solos: Vec<i64>,
    pub notes: String,
    pub groove: String,
    pub drumeo: String,
    pub yt_music: String,
    pub practice: bool,
}

impl Default for NewSong {
    fn default() -> Self {
        Self {
            title: String::new(),
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
            practice: false,
        }
    }
}

impl NewSong {
    /// Carry an existing song's fields into an update payload.
    pub fn from_song(song: &Song) -> Self {
        Self {
            title: song.title.clone(),
            artist: song.artist.clone(),
            length_secs: song.length_secs,
            starts_with: song.starts_with,
            features: song.features,
            pad: song.pad,
            solos: song.solos.clone(),
            notes: song.notes.clone(),
            groove: song.groove.clone(),
            drumeo: song.drumeo.clone(),
            yt_music: song.yt_music.clone(),
            practice: song.practice,
        }
    }
}

/// A gig row with its three ordered song-reference lists.
///
/// `date` is kept as stored (`YYYY-MM-DD` text); the PDF renderer parses it
/// and fails the render if it is unusable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gig {
    pub id: i64,
    pub band_id: i64,
    pub venue: String,
    pub date: String,
    pub one: Vec<i64>,
    pub two: Vec<i64>,
    pub pocket: Vec<i64>,
}

/// A gig's set lists with every song reference resolved.
#[derive(Debug, Clone, Default)]
pub struct SetListSongs {
    pub one: Vec<Song>,
    pub two: Vec<Song>,
    pub pocket: Vec<Song>,
}

/// Which of a gig's three set lists a song belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetSlot {
    One,
    Two,
    Pocket,
}

impl SetSlot {
    pub fn code(self) -> i64 {
        match self {
            Self::One => 0,
            Self::Two => 1,
            Self::Pocket => 2,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::One => "Set One",
            Self::Two => "Set Two",
            Self::Pocket => "Pocket",
        }
    }
}

/// The identity class of the current user. Controls which song notes are
/// computed and whether the PDF legend is drawn. Always passed explicitly;
/// there is no ambient viewer state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Viewer {
    #[default]
    None,
    Me,
    Vocals,
    Guitars,
    Mixer,
}

/// The musician (or group) that starts a song. Closed 13-entry table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Starter {
    All,
    RhythmGuitar,
    Drums,
    DrumsAndKeys,
    LeadGuitar,
    LeadAndVocals,
    DrumsAndBass,
    DrumsAndGuitar,
    Bass,
    Guitars,
    Vocals,
    Keys,
    Trumpet,
}

impl Starter {
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => Self::All,
            1 => Self::RhythmGuitar,
            2 => Self::Drums,
            3 => Self::DrumsAndKeys,
            4 => Self::LeadGuitar,
            5 => Self::LeadAndVocals,
            6 => Self::DrumsAndBass,
            7 => Self::DrumsAndGuitar,
            8 => Self::Bass,
            9 => Self::Guitars,
            10 => Self::Vocals,
            11 => Self::Keys,
            12 => Self::Trumpet,
            _ => return None,
        })
    }

    pub fn code(self) -> i64 {
        match self {
            Self::All => 0,
            Self::RhythmGuitar => 1,
            Self::Drums => 2,
            Self::DrumsAndKeys => 3,
            Self::LeadGuitar => 4,
            Self::LeadAndVocals => 5,
            Self::DrumsAndBass => 6,
            Self::DrumsAndGuitar => 7,
            Self::Bass => 8,
            Self::Guitars => 9,
            Self::Vocals => 10,
            Self::Keys => 11,
            Self::Trumpet => 12,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "Drums count in",
            Self::RhythmGuitar => "Rhythm guitar",
            Self::Drums => "Drums",
            Self::DrumsAndKeys => "Drums and keys",
            Self::LeadGuitar => "Lead guitar",
            Self::LeadAndVocals => "Lead guitar and vocals",
            Self::DrumsAndBass => "Drums and bass",
            Self::DrumsAndGuitar => "Drums and guitar",
            Self::Bass => "Bass",
            Self::Guitars => "Guitars",
            Self::Vocals => "Vocals",
            Self::Keys => "Keys",
            Self::Trumpet => "Trumpet",
        }
    }
}

/// An instrument that can be featured or take a solo.
/// Code -1 ("none") deliberately has no variant — it decodes to `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instrument {
    Drums,
    Bass,
    LeadGuitar,
    RhythmGuitar,
    Keys,
    Vocals,
    Trumpet,
}

impl Instrument {
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => Self::Drums,
            1 => Self::Bass,
            2 => Self::LeadGuitar,
            3 => Self::RhythmGuitar,
            4 => Self::Keys,
            5 => Self::Vocals,
            6 => Self::Trumpet,
            _ => return None,
        })
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Drums => 0,
            Self::Bass => 1,
            Self::LeadGuitar => 2,
            Self::RhythmGuitar => 3,
            Self::Keys => 4,
            Self::Vocals => 5,
            Self::Trumpet => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Drums => "Drums",
            Self::Bass => "Bass",
            Self::LeadGuitar => "Lead Guitar",
            Self::RhythmGuitar => "Rhythm Guitar",
            Self::Keys => "Keys",
            Self::Vocals => "Vocals",
            Self::Trumpet => "Trumpet",
        }
    }
}

/// Auxiliary drum pad sounds. Code -1 ("none") has no variant.
/// Labels carry the pad patch numbers used on stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrumPad {
    Cowbell,
    Claps,
    Tambourine,
    BellTree,
    China,
    Edrum,
    VibraSlap,
    Clave,
}

impl DrumPad {
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => Self::Cowbell,
            1 => Self::Claps,
            2 => Self::Tambourine,
            3 => Self::BellTree,
            4 => Self::China,
            5 => Self::Edrum,
            6 => Self::VibraSlap,
            7 => Self::Clave,
            _ => return None,
        })
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Cowbell => 0,
            Self::Claps => 1,
            Self::Tambourine => 2,
            Self::BellTree => 3,
            Self::China => 4,
            Self::Edrum => 5,
            Self::VibraSlap => 6,
            Self::Clave => 7,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Cowbell => "Cowbell (#641)",
            Self::Claps => "Claps (#800)",
            Self::Tambourine => "Tambourine (#724)",
            Self::BellTree => "Tree chime (#631)",
            Self::China => "China Crash",
            Self::Edrum => "EDrum",
            Self::VibraSlap => "VibraSlap (#753)",
            Self::Clave => "Clave (#736)",
        }
    }
}

/// Catalog statistics.
#[derive(Debug)]
pub struct CatalogStats {
    pub total_songs: i64,
    pub total_gigs: i64,
    pub flagged_songs: i64,
    /// Song counts per band name.
    pub bands: Vec<(String, i64)>,
}

/// Whole-catalog snapshot for JSON import/export.
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogExport {
    pub bands: Vec<Band>,
    pub songs: Vec<Song>,
    pub gigs: Vec<Gig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starter_codes_round_trip() {
        for code in 0..13 {
            let starter = Starter::from_code(code).unwrap();
            assert_eq!(starter.code(), code);
        }
        assert!(Starter::from_code(13).is_none());
        assert!(Starter::from_code(-1).is_none());
    }

    #[test]
    fn none_codes_do_not_decode() {
        assert!(Instrument::from_code(-1).is_none());
        assert!(DrumPad::from_code(-1).is_none());
        assert!(Instrument::from_code(7).is_none());
        assert!(DrumPad::from_code(8).is_none());
    }

    #[test]
    fn pad_labels_keep_patch_numbers() {
        assert_eq!(DrumPad::Cowbell.label(), "Cowbell (#641)");
        assert_eq!(DrumPad::China.label(), "China Crash");
    }

    #[test]
    fn set_slot_titles() {
        assert_eq!(SetSlot::One.title(), "Set One");
        assert_eq!(SetSlot::Two.title(), "Set Two");
        assert_eq!(SetSlot::Pocket.title(), "Pocket");
    }
}
