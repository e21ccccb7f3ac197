use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use gigsheet::db::Database;
use gigsheet::db::models::{
    Band, CatalogExport, DrumPad, Gig, Instrument, NewSong, SetSlot, Song, Starter, Viewer,
};
use gigsheet::filter::{SongFilter, filter_songs, sort_gigs_by_date};
use gigsheet::notes::{format_notes, song_notes};
use gigsheet::{pdf, tabs};

#[derive(Parser)]
#[command(name = "gigsheet", version, about = "Band gig and song catalog manager")]
struct Cli {
    /// Path to the SQLite database
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Band to operate on (by name; defaults to config, then the first band)
    #[arg(long, global = true)]
    band: Option<String>,

    /// Viewer role — controls which song notes and which PDF legend appear
    #[arg(long = "as", value_enum, global = true, default_value = "none")]
    role: Role,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Role {
    None,
    Me,
    Vocals,
    Guitars,
    Mixer,
}

impl Role {
    fn viewer(self) -> Viewer {
        match self {
            Self::None => Viewer::None,
            Self::Me => Viewer::Me,
            Self::Vocals => Viewer::Vocals,
            Self::Guitars => Viewer::Guitars,
            Self::Mixer => Viewer::Mixer,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterArg {
    All,
    Practice,
    Orphans,
    Others,
}

impl FilterArg {
    fn filter(self) -> SongFilter {
        match self {
            Self::All => SongFilter::All,
            Self::Practice => SongFilter::Practice,
            Self::Orphans => SongFilter::Orphans,
            Self::Others => SongFilter::Others,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SlotArg {
    One,
    Two,
    Pocket,
}

impl SlotArg {
    fn slot(self) -> SetSlot {
        match self {
            Self::One => SetSlot::One,
            Self::Two => SetSlot::Two,
            Self::Pocket => SetSlot::Pocket,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum StarterArg {
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

impl StarterArg {
    fn code(self) -> i64 {
        let starter = match self {
            Self::All => Starter::All,
            Self::RhythmGuitar => Starter::RhythmGuitar,
            Self::Drums => Starter::Drums,
            Self::DrumsAndKeys => Starter::DrumsAndKeys,
            Self::LeadGuitar => Starter::LeadGuitar,
            Self::LeadAndVocals => Starter::LeadAndVocals,
            Self::DrumsAndBass => Starter::DrumsAndBass,
            Self::DrumsAndGuitar => Starter::DrumsAndGuitar,
            Self::Bass => Starter::Bass,
            Self::Guitars => Starter::Guitars,
            Self::Vocals => Starter::Vocals,
            Self::Keys => Starter::Keys,
            Self::Trumpet => Starter::Trumpet,
        };
        starter.code()
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum InstrumentArg {
    Drums,
    Bass,
    LeadGuitar,
    RhythmGuitar,
    Keys,
    Vocals,
    Trumpet,
}

impl InstrumentArg {
    fn code(self) -> i64 {
        let instrument = match self {
            Self::Drums => Instrument::Drums,
            Self::Bass => Instrument::Bass,
            Self::LeadGuitar => Instrument::LeadGuitar,
            Self::RhythmGuitar => Instrument::RhythmGuitar,
            Self::Keys => Instrument::Keys,
            Self::Vocals => Instrument::Vocals,
            Self::Trumpet => Instrument::Trumpet,
        };
        instrument.code()
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PadArg {
    Cowbell,
    Claps,
    Tambourine,
    BellTree,
    China,
    Edrum,
    VibraSlap,
    Clave,
}

impl PadArg {
    fn code(self) -> i64 {
        let pad = match self {
            Self::Cowbell => DrumPad::Cowbell,
            Self::Claps => DrumPad::Claps,
            Self::Tambourine => DrumPad::Tambourine,
            Self::BellTree => DrumPad::BellTree,
            Self::China => DrumPad::China,
            Self::Edrum => DrumPad::Edrum,
            Self::VibraSlap => DrumPad::VibraSlap,
            Self::Clave => DrumPad::Clave,
        };
        pad.code()
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List songs in the catalog with role-aware notes
    Songs {
        /// Which slice of the catalog to show
        #[arg(long, value_enum, default_value = "all")]
        filter: FilterArg,
    },

    /// List the band's gigs, newest first
    Gigs,

    /// Print a gig's set lists
    Show {
        gig_id: i64,
    },

    /// Generate the set list PDF for a gig
    Pdf {
        gig_id: i64,

        /// Output directory (defaults to config output_dir, then `.`)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Add a band
    AddBand {
        name: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Add a song to the catalog (joins the current band)
    AddSong {
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        artist: String,

        /// Song length in seconds
        #[arg(long, default_value = "0")]
        length: i64,

        /// Who starts the song
        #[arg(long, value_enum)]
        starts_with: Option<StarterArg>,

        /// Featured instrument
        #[arg(long, value_enum)]
        features: Option<InstrumentArg>,

        /// Auxiliary drum pad
        #[arg(long, value_enum)]
        pad: Option<PadArg>,

        /// Solo instruments in order (repeat the flag)
        #[arg(long = "solo", value_enum)]
        solos: Vec<InstrumentArg>,

        /// Drummer notes
        #[arg(long, default_value = "")]
        notes: String,

        /// GrooveScribe drum tab URL
        #[arg(long, default_value = "")]
        groove: String,

        /// Non-groovescribe drum tab URL
        #[arg(long, default_value = "")]
        drumeo: String,

        /// YouTube video id
        #[arg(long = "yt", default_value = "")]
        yt_music: String,

        /// Flag as needing practice
        #[arg(long)]
        practice: bool,
    },

    /// Update fields on an existing song
    EditSong {
        song_id: i64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        artist: Option<String>,

        /// Song length in seconds
        #[arg(long)]
        length: Option<i64>,

        #[arg(long, value_enum)]
        starts_with: Option<StarterArg>,

        #[arg(long, value_enum)]
        features: Option<InstrumentArg>,

        #[arg(long, value_enum)]
        pad: Option<PadArg>,

        /// Replace the solo order (repeat the flag)
        #[arg(long = "solo", value_enum)]
        solos: Vec<InstrumentArg>,

        #[arg(long)]
        notes: Option<String>,

        #[arg(long)]
        groove: Option<String>,

        #[arg(long)]
        drumeo: Option<String>,

        #[arg(long = "yt")]
        yt_music: Option<String>,
    },

    /// Remove a song from the catalog
    RemoveSong {
        song_id: i64,
    },

    /// Add a gig for the band
    AddGig {
        #[arg(long)]
        venue: String,

        /// Gig date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
    },

    /// Remove a gig
    RemoveGig {
        gig_id: i64,
    },

    /// Replace one of a gig's set lists with the given songs, in order
    Assign {
        gig_id: i64,

        /// Which set list to replace
        #[arg(long, value_enum)]
        set: SlotArg,

        /// Song ids, in playing order (empty clears the set)
        song_ids: Vec<i64>,
    },

    /// Flag or unflag a song as needing practice
    Flag {
        song_id: i64,

        /// Clear the flag instead of setting it
        #[arg(long)]
        clear: bool,
    },

    /// Print the rehearsal/tab link for a song (depends on `--as`)
    Rehearse {
        song_id: i64,

        /// Practicing rather than performing (changes the drummer's source)
        #[arg(long)]
        practice: bool,
    },

    /// Load a catalog snapshot from JSON
    Import {
        file: PathBuf,
    },

    /// Dump the catalog as JSON (to a file, or stdout)
    Export {
        file: Option<PathBuf>,
    },

    /// Show catalog statistics
    Stats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load config file (optional, defaults if missing)
    let config = gigsheet::config::AppConfig::load();

    // Resolve database path: CLI > config > XDG default
    let db_path = cli
        .db_path
        .or(config.db_path.clone())
        .unwrap_or_else(gigsheet::config::default_db_path);
    log::info!("Database: {}", db_path.display());

    let db = Database::open(&db_path).context("Failed to open database")?;

    let viewer = cli.role.viewer();
    let band_name = cli.band.or(config.band.clone());

    match cli.command {
        Commands::Songs { filter } => {
            let band = resolve_band(&db, band_name.as_deref())?;
            let songs = db.list_songs().context("Failed to load songs")?;
            let songs = filter_songs(songs, filter.filter(), band.id);

            if songs.is_empty() {
                println!("No songs found for the current filter.");
                return Ok(());
            }

            println!("Songs ({})", songs.len());
            println!();
            print_song_table(&songs, viewer);
        }

        Commands::Gigs => {
            let band = resolve_band(&db, band_name.as_deref())?;
            let mut gigs = db.list_gigs(band.id).context("Failed to load gigs")?;

            if gigs.is_empty() {
                println!("No gigs scheduled yet.");
                return Ok(());
            }

            sort_gigs_by_date(&mut gigs);
            println!("{:<4} {:<12} {:<28} {:>5} {:>5} {:>7}", "Id", "Date", "Venue", "One", "Two", "Pocket");
            println!("{}", "-".repeat(65));
            for gig in &gigs {
                println!(
                    "{:<4} {:<12} {:<28} {:>5} {:>5} {:>7}",
                    gig.id,
                    display_date(&gig.date),
                    truncate(&gig.venue, 28),
                    gig.one.len(),
                    gig.two.len(),
                    gig.pocket.len(),
                );
            }
        }

        Commands::Show { gig_id } => {
            let gig = get_gig(&db, gig_id)?;
            let sets = db
                .gig_set_lists(&gig)
                .context("Failed to resolve set list songs")?;

            println!("{} - {}", gig.venue, display_date(&gig.date));
            for (title, songs) in [
                (SetSlot::One.title(), &sets.one),
                (SetSlot::Two.title(), &sets.two),
                (SetSlot::Pocket.title(), &sets.pocket),
            ] {
                if songs.is_empty() {
                    continue;
                }
                println!();
                println!("{} ({})", title, pdf::set_list_length(songs));
                for (i, song) in songs.iter().enumerate() {
                    println!("{:>3}. {}", i + 1, song.title);
                    let notes = song_notes(song, viewer);
                    if !notes.is_empty() {
                        println!("     {}", format_notes(&notes));
                    }
                }
            }
        }

        Commands::Pdf { gig_id, out } => {
            let gig = get_gig(&db, gig_id)?;
            let sets = db
                .gig_set_lists(&gig)
                .context("Failed to resolve set list songs")?;

            let sheet =
                pdf::render_set_list(&gig, &sets, viewer).context("Failed to generate PDF")?;

            let out_dir = out
                .or(config.output_dir.clone())
                .unwrap_or_else(|| PathBuf::from("."));
            std::fs::create_dir_all(&out_dir)
                .with_context(|| format!("Failed to create {}", out_dir.display()))?;
            let path = out_dir.join(&sheet.file_name);
            std::fs::write(&path, &sheet.bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;

            println!("PDF generated successfully!");
            println!("Saved {}", path.display());
        }

        Commands::AddBand { name, description } => {
            let id = db
                .add_band(&name, &description)
                .context("Failed to add band")?;
            println!("Added band {id}: {name}");
        }

        Commands::AddSong {
            title,
            artist,
            length,
            starts_with,
            features,
            pad,
            solos,
            notes,
            groove,
            drumeo,
            yt_music,
            practice,
        } => {
            let band = resolve_band(&db, band_name.as_deref())?;
            let new_song = NewSong {
                title: title.clone(),
                artist,
                length_secs: length,
                starts_with: starts_with.map(StarterArg::code).unwrap_or(0),
                features: features.map(InstrumentArg::code).unwrap_or(-1),
                pad: pad.map(PadArg::code).unwrap_or(-1),
                solos: solos.iter().map(|s| s.code()).collect(),
                notes,
                groove,
                drumeo,
                yt_music,
                practice,
            };
            let id = db.add_song(&new_song).context("Failed to add song")?;
            db.set_song_bands(id, &[band.id])
                .context("Failed to set song bands")?;
            println!("Added song {id}: {title}");
        }

        Commands::EditSong {
            song_id,
            title,
            artist,
            length,
            starts_with,
            features,
            pad,
            solos,
            notes,
            groove,
            drumeo,
            yt_music,
        } => {
            let song = get_song(&db, song_id)?;
            let mut update = NewSong::from_song(&song);
            if let Some(title) = title {
                update.title = title;
            }
            if let Some(artist) = artist {
                update.artist = artist;
            }
            if let Some(length) = length {
                update.length_secs = length;
            }
            if let Some(starts_with) = starts_with {
                update.starts_with = starts_with.code();
            }
            if let Some(features) = features {
                update.features = features.code();
            }
            if let Some(pad) = pad {
                update.pad = pad.code();
            }
            if !solos.is_empty() {
                update.solos = solos.iter().map(|s| s.code()).collect();
            }
            if let Some(notes) = notes {
                update.notes = notes;
            }
            if let Some(groove) = groove {
                update.groove = groove;
            }
            if let Some(drumeo) = drumeo {
                update.drumeo = drumeo;
            }
            if let Some(yt_music) = yt_music {
                update.yt_music = yt_music;
            }
            db.update_song(song_id, &update)
                .context("Failed to update song")?;
            println!("Updated song {song_id}: {}", update.title);
        }

        Commands::RemoveSong { song_id } => {
            let song = get_song(&db, song_id)?;
            db.remove_song(song_id).context("Failed to remove song")?;
            println!("Removed song {song_id}: {}", song.title);
        }

        Commands::AddGig { venue, date } => {
            let band = resolve_band(&db, band_name.as_deref())?;
            NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .with_context(|| format!("Invalid date {date:?} (expected YYYY-MM-DD)"))?;
            let id = db
                .add_gig(band.id, &venue, &date)
                .context("Failed to add gig")?;
            println!("Added gig {id}: {} on {}", venue, display_date(&date));
        }

        Commands::RemoveGig { gig_id } => {
            let gig = get_gig(&db, gig_id)?;
            db.remove_gig(gig_id).context("Failed to remove gig")?;
            println!("Removed gig {gig_id}: {}", gig.venue);
        }

        Commands::Assign { gig_id, set, song_ids } => {
            // The editor only accepts songs that exist; dangling references
            // come from later removals, not from assignment.
            for &song_id in &song_ids {
                get_song(&db, song_id)?;
            }
            db.assign_set(gig_id, set.slot(), &song_ids)
                .context("Failed to assign set list")?;
            println!(
                "Assigned {} songs to {} of gig {gig_id}",
                song_ids.len(),
                set.slot().title(),
            );
        }

        Commands::Flag { song_id, clear } => {
            let song = get_song(&db, song_id)?;
            db.set_practice(song_id, !clear)
                .context("Failed to update practice flag")?;
            if clear {
                println!("Cleared practice flag on {}", song.title);
            } else {
                println!("Flagged {} for practice", song.title);
            }
        }

        Commands::Rehearse { song_id, practice } => {
            let song = get_song(&db, song_id)?;
            let source = tabs::tab_source(viewer, practice);
            match tabs::tab_link(&song, source) {
                Some(link) => println!("{}: {link}", source.label()),
                None => println!("No {} link stored for \"{}\"", source.label(), song.title),
            }
        }

        Commands::Import { file } => {
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let doc: CatalogExport =
                serde_json::from_str(&contents).context("Failed to parse catalog JSON")?;
            let (bands, songs, gigs) = db
                .import_catalog(&doc)
                .context("Failed to import catalog")?;
            println!("Imported {bands} bands, {songs} songs, {gigs} gigs");
        }

        Commands::Export { file } => {
            let doc = db.export_catalog().context("Failed to export catalog")?;
            let json = serde_json::to_string_pretty(&doc).context("Failed to encode catalog")?;
            match file {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Exported catalog to {}", path.display());
                }
                None => println!("{json}"),
            }
        }

        Commands::Stats => {
            let stats = db.stats().context("Failed to get stats")?;
            println!("Catalog Statistics");
            println!("==================");
            println!("Songs:     {}", stats.total_songs);
            println!("Gigs:      {}", stats.total_gigs);
            println!("Flagged:   {}", stats.flagged_songs);
            println!();

            if !stats.bands.is_empty() {
                println!("Bands:");
                for (band, count) in &stats.bands {
                    println!("  {:<30} {} songs", band, count);
                }
            }
        }
    }

    Ok(())
}

/// Resolve the band to operate on: named band > first band in the catalog.
fn resolve_band(db: &Database, name: Option<&str>) -> Result<Band> {
    match name {
        Some(name) => db
            .band_by_name(name)
            .context("Failed to look up band")?
            .with_context(|| format!("No band named {name:?}")),
        None => db
            .first_band()
            .context("Failed to look up band")?
            .context("No bands in the catalog. Add one with `gigsheet add-band`."),
    }
}

fn get_song(db: &Database, song_id: i64) -> Result<Song> {
    db.get_song(song_id)
        .context("Failed to load song")?
        .with_context(|| format!("No song with id {song_id}"))
}

fn get_gig(db: &Database, gig_id: i64) -> Result<Gig> {
    db.get_gig(gig_id)
        .context("Failed to load gig")?
        .with_context(|| format!("No gig with id {gig_id}"))
}

/// Listing date: "15 Dec 2025", or the raw text if it doesn't parse.
fn display_date(date: &str) -> String {
    pdf::format_gig_date(date).unwrap_or_else(|_| date.to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        s.to_string()
    }
}

/// Print a table of songs with their role-aware notes.
fn print_song_table(songs: &[Song], viewer: Viewer) {
    println!(
        "{:<4} {:<28} {:<20} {:>6}  {}",
        "Id", "Title", "Artist", "Length", "Notes"
    );
    println!("{}", "-".repeat(90));

    for song in songs {
        let minutes = song.length_secs / 60;
        let seconds = song.length_secs % 60;
        let flag = if song.practice { "*" } else { "" };

        println!(
            "{:<4} {:<28} {:<20} {:>4}:{:02}  {}{}",
            song.id,
            truncate(&song.title, 28),
            truncate(&song.artist, 20),
            minutes,
            seconds,
            format_notes(&song_notes(song, viewer)),
            flag,
        );
    }

    println!();
    println!("* = flagged for practice");
}
