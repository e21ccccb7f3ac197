//! Set list page layout — fixed letter-page geometry and the single
//! pagination pass that turns a gig's sets into positioned text spans.

use crate::db::models::{SetListSongs, Song, Viewer};

use super::metrics::text_width;
use super::{PdfNote, pdf_notes, set_list_title};

// ── Page geometry (millimetres, y measured down from the top edge) ──
pub(super) const PAGE_WIDTH: f64 = 215.9; // letter
pub(super) const PAGE_HEIGHT: f64 = 279.4;
pub(super) const LINE_HEIGHT: f64 = 10.0; // doubles as the left margin
pub(super) const HEADER_Y: f64 = 10.0;
pub(super) const BODY_TOP: f64 = 20.0; // where set lists start under the header
pub(super) const DATE_X: f64 = 200.0; // right edge of the header date
pub(super) const SET_TWO_X: f64 = 100.0; // second column offset
pub(super) const NOTE_INDENT: f64 = 4.0;
pub(super) const NOTE_DROP: f64 = 5.0; // note line sits this far under the title
pub(super) const SONG_ROW: f64 = LINE_HEIGHT + NOTE_DROP; // same height for all songs
pub(super) const NOTE_GAP: f64 = 4.0; // between notes on one line
pub(super) const GLYPH_GAP: f64 = 1.0; // between a glyph and its text
pub(super) const PAGE_LIMIT: f64 = 269.0; // last usable y before the legend strip
pub(super) const LEGEND_Y: f64 = 270.0;
pub(super) const LEGEND_GAP: f64 = 8.0; // between the two legend entries

// ── Font sizes (points) ──
pub(super) const HEADER_SIZE: f64 = 12.0;
pub(super) const TITLE_SIZE: f64 = 13.0;
pub(super) const SONG_SIZE: f64 = 12.0;
pub(super) const NOTE_SIZE: f64 = 10.0;
pub(super) const LEGEND_SIZE: f64 = 8.0;

// ── ZapfDingbats glyphs ──
pub(super) const FEATURES_GLYPH: &str = "s"; // ▲ triangle
pub(super) const SOLOS_GLYPH: &str = "H"; // ★ 5-pointed star

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Font {
    Helvetica,
    HelveticaBold,
    Dingbats,
}

/// One absolutely positioned run of text (page units, y from the top).
#[derive(Debug)]
pub(super) struct TextSpan {
    pub(super) font: Font,
    pub(super) size: f64,
    pub(super) x: f64,
    pub(super) y: f64,
    pub(super) text: String,
}

#[derive(Debug, Default)]
pub(super) struct PageLayout {
    pub(super) spans: Vec<TextSpan>,
}

impl PageLayout {
    fn push(&mut self, font: Font, size: f64, x: f64, y: f64, text: impl Into<String>) {
        self.spans.push(TextSpan {
            font,
            size,
            x,
            y,
            text: text.into(),
        });
    }
}

/// Lay out the whole document. `date` is the already-formatted header date.
pub(super) fn layout_set_list(
    venue: &str,
    date: &str,
    songs: &SetListSongs,
    viewer: Viewer,
) -> Vec<PageLayout> {
    let mut pages: Vec<PageLayout> = Vec::new();
    let mut page = PageLayout::default();

    let base = render_header(&mut page, venue, date);

    let mut set_one_end = base;
    let mut set_two_end = base;
    if !songs.one.is_empty() {
        set_one_end = add_set_list(&mut page, "Set One", &songs.one, viewer, 0.0, base);
    }
    if !songs.two.is_empty() {
        set_two_end = add_set_list(&mut page, "Set Two", &songs.two, viewer, SET_TWO_X, base);
    }

    // Continue below the taller column, with some padding.
    let mut base_y = set_one_end.max(set_two_end) + LINE_HEIGHT;

    if !songs.pocket.is_empty() {
        // Estimated pocket height: title row plus full-height song rows
        // (every row reserves room for a note line).
        let pocket_height = LINE_HEIGHT + songs.pocket.len() as f64 * SONG_ROW;

        // Will the pocket set NOT fit on the current page?
        if base_y + pocket_height > PAGE_LIMIT {
            pages.push(std::mem::take(&mut page));
            base_y = render_header(&mut page, venue, date);
        }

        add_set_list(&mut page, "Pocket", &songs.pocket, viewer, 0.0, base_y);
    }

    // The legend lands exactly once, on the last page.
    render_legend(&mut page, viewer);

    pages.push(page);
    pages
}

/// Venue left, date right. Identical on every page. Returns the y where
/// body content begins.
fn render_header(page: &mut PageLayout, venue: &str, date: &str) -> f64 {
    page.push(Font::HelveticaBold, HEADER_SIZE, LINE_HEIGHT, HEADER_Y, venue);
    let date_width = text_width(Font::HelveticaBold, date, HEADER_SIZE);
    page.push(
        Font::HelveticaBold,
        HEADER_SIZE,
        DATE_X - date_width,
        HEADER_Y,
        date,
    );
    BODY_TOP
}

/// Render one set's title and song rows. Returns the y past the last row.
fn add_set_list(
    page: &mut PageLayout,
    title: &str,
    set_songs: &[Song],
    viewer: Viewer,
    x_offset: f64,
    y_offset: f64,
) -> f64 {
    page.push(
        Font::HelveticaBold,
        TITLE_SIZE,
        LINE_HEIGHT + x_offset,
        y_offset,
        set_list_title(title, set_songs),
    );

    let mut current_y = y_offset + LINE_HEIGHT;
    for song in set_songs {
        page.push(
            Font::Helvetica,
            SONG_SIZE,
            LINE_HEIGHT + x_offset,
            current_y,
            song.title.as_str(),
        );

        // Notes on a separate line, smaller and indented.
        let notes = pdf_notes(song, viewer);
        if !notes.is_empty() {
            add_notes(
                page,
                &notes,
                LINE_HEIGHT + x_offset + NOTE_INDENT,
                current_y + NOTE_DROP,
            );
        }
        current_y += SONG_ROW;
    }

    current_y
}

/// Render a note line, advancing through glyph/text runs.
fn add_notes(page: &mut PageLayout, notes: &[PdfNote], x: f64, y: f64) {
    let mut current_x = x;

    for (i, note) in notes.iter().enumerate() {
        if i > 0 {
            current_x += NOTE_GAP;
        }

        if let Some(symbol) = note.symbol {
            page.push(Font::Dingbats, NOTE_SIZE, current_x, y, symbol);
            current_x += text_width(Font::Dingbats, symbol, NOTE_SIZE) + GLYPH_GAP;
        }

        page.push(Font::Helvetica, NOTE_SIZE, current_x, y, note.text.as_str());
        current_x += text_width(Font::Helvetica, note.text.as_str(), NOTE_SIZE);
    }
}

/// Mixer-only legend near the bottom of the page: what the glyphs mean.
fn render_legend(page: &mut PageLayout, viewer: Viewer) {
    if viewer != Viewer::Mixer {
        return;
    }

    let mut x = LINE_HEIGHT;

    page.push(Font::Dingbats, LEGEND_SIZE, x, LEGEND_Y, FEATURES_GLYPH);
    x += text_width(Font::Dingbats, FEATURES_GLYPH, LEGEND_SIZE) + GLYPH_GAP;
    page.push(Font::Helvetica, LEGEND_SIZE, x, LEGEND_Y, "= Featured");
    x += text_width(Font::Helvetica, "= Featured", LEGEND_SIZE) + LEGEND_GAP;

    page.push(Font::Dingbats, LEGEND_SIZE, x, LEGEND_Y, SOLOS_GLYPH);
    x += text_width(Font::Dingbats, SOLOS_GLYPH, LEGEND_SIZE) + GLYPH_GAP;
    page.push(Font::Helvetica, LEGEND_SIZE, x, LEGEND_Y, "= Solos");
}
