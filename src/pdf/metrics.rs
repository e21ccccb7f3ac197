//! Advance widths for the base-14 fonts the set list uses, from the Adobe
//! AFM files, in 1/1000 em for ASCII 32..=126. Needed to place the
//! right-aligned header date and to advance the cursor through glyph+text
//! note runs.

use super::layout::Font;

/// Page units (mm) per point.
pub(super) const MM_PER_PT: f64 = 25.4 / 72.0;

/// Width of a text run in page units at the given size (points).
pub(super) fn text_width(font: Font, text: &str, size: f64) -> f64 {
    let units: u32 = match font {
        Font::Helvetica => sum_units(&HELVETICA, text),
        Font::HelveticaBold => sum_units(&HELVETICA_BOLD, text),
        // The two dingbats we draw are close to 3/4 em each; ZapfDingbats
        // has no slot-for-slot ASCII table worth carrying.
        Font::Dingbats => text.chars().count() as u32 * DINGBAT_UNITS,
    };
    f64::from(units) / 1000.0 * size * MM_PER_PT
}

const DINGBAT_UNITS: u32 = 760;

/// Fallback for characters outside the table (Helvetica average).
const DEFAULT_UNITS: u16 = 556;

fn sum_units(table: &[u16; 95], text: &str) -> u32 {
    text.chars()
        .map(|c| {
            let i = c as u32;
            if (32..=126).contains(&i) {
                u32::from(table[(i - 32) as usize])
            } else {
                u32::from(DEFAULT_UNITS)
            }
        })
        .sum()
}

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // : ; < = > ? @
    278, 278, 584, 584, 584, 556, 1015,
    // A-Z
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [ \ ] ^ _ `
    278, 278, 278, 469, 556, 333,
    // a-z
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // { | } ~
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_sizes_cover_printable_ascii() {
        assert_eq!(HELVETICA.len(), 95);
        assert_eq!(HELVETICA_BOLD.len(), 95);
    }

    #[test]
    fn widths_scale_linearly_with_size() {
        let at_10 = text_width(Font::Helvetica, "Set One", 10.0);
        let at_20 = text_width(Font::Helvetica, "Set One", 20.0);
        assert!((at_20 - at_10 * 2.0).abs() < 1e-9);
    }

    #[test]
    fn bold_is_at_least_as_wide() {
        let text = "The Jazz Club 15 Dec 2025";
        assert!(
            text_width(Font::HelveticaBold, text, 12.0)
                >= text_width(Font::Helvetica, text, 12.0)
        );
    }

    #[test]
    fn a_twelve_point_date_fits_the_header() {
        // The date is right-aligned at x=200 with a 10mm left margin; even a
        // long month name leaves most of the line free.
        let w = text_width(Font::HelveticaBold, "15 Dec 2025", 12.0);
        assert!(w > 20.0 && w < 40.0, "unexpected width {w}");
    }
}
