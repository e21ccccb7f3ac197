//! Minimal PDF 1.4 emitter — turns laid-out pages of text spans into the
//! final document bytes. Only what a set list needs: letter pages, the
//! base-14 Type1 fonts, absolutely positioned text runs.

use super::layout::{Font, PAGE_HEIGHT, PAGE_WIDTH, PageLayout};

const PT_PER_MM: f64 = 72.0 / 25.4;

// Fixed object numbering: 1 catalog, 2 page tree, 3-5 fonts, then a
// content stream + page object pair per page.
const FIRST_PAGE_OBJ: usize = 7;

pub(super) fn write_document(pages: &[PageLayout]) -> Vec<u8> {
    let mut w = ObjectWriter::new();

    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", FIRST_PAGE_OBJ + 2 * i))
        .collect();

    w.add("<< /Type /Catalog /Pages 2 0 R >>");
    w.add(&format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        pages.len()
    ));
    w.add("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>");
    w.add("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>");
    w.add("<< /Type /Font /Subtype /Type1 /BaseFont /ZapfDingbats >>");

    let media_box = format!(
        "[0 0 {:.2} {:.2}]",
        PAGE_WIDTH * PT_PER_MM,
        PAGE_HEIGHT * PT_PER_MM
    );

    for page in pages {
        let content = content_stream(page);
        let content_obj = w.add_stream(content.as_bytes());
        w.add(&format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox {media_box} \
             /Resources << /Font << /F1 3 0 R /F2 4 0 R /F3 5 0 R >> >> \
             /Contents {content_obj} 0 R >>"
        ));
    }

    w.finish(1)
}

/// Text operators for one page. Layout y grows downward from the top
/// edge; PDF user space grows upward from the bottom left.
fn content_stream(page: &PageLayout) -> String {
    let mut ops = String::new();
    for span in &page.spans {
        let x = span.x * PT_PER_MM;
        let y = (PAGE_HEIGHT - span.y) * PT_PER_MM;
        ops.push_str(&format!(
            "BT /{} {} Tf {:.2} {:.2} Td ({}) Tj ET\n",
            font_resource(span.font),
            span.size,
            x,
            y,
            escape_text(&span.text)
        ));
    }
    ops
}

fn font_resource(font: Font) -> &'static str {
    match font {
        Font::Helvetica => "F1",
        Font::HelveticaBold => "F2",
        Font::Dingbats => "F3",
    }
}

/// Escape a string for a PDF literal. The text fonts use WinAnsiEncoding,
/// so Latin-1 code points become octal escapes; anything beyond that has
/// no glyph and degrades to '?'.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\\' => out.push_str("\\\\"),
            c if (c as u32) < 32 => out.push(' '),
            c if c.is_ascii() => out.push(c),
            c => {
                let code = c as u32;
                if (160..=255).contains(&code) {
                    out.push_str(&format!("\\{code:03o}"));
                } else {
                    out.push('?');
                }
            }
        }
    }
    out
}

/// Accumulates numbered objects and their byte offsets for the xref table.
struct ObjectWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl ObjectWriter {
    fn new() -> Self {
        Self {
            buf: b"%PDF-1.4\n".to_vec(),
            offsets: Vec::new(),
        }
    }

    /// Write a plain object. Returns its object number.
    fn add(&mut self, body: &str) -> usize {
        let num = self.begin();
        self.buf
            .extend_from_slice(format!("{num} 0 obj\n{body}\nendobj\n").as_bytes());
        num
    }

    /// Write a stream object. Returns its object number.
    fn add_stream(&mut self, content: &[u8]) -> usize {
        let num = self.begin();
        self.buf.extend_from_slice(
            format!("{num} 0 obj\n<< /Length {} >>\nstream\n", content.len()).as_bytes(),
        );
        self.buf.extend_from_slice(content);
        self.buf.extend_from_slice(b"endstream\nendobj\n");
        num
    }

    fn begin(&mut self) -> usize {
        self.offsets.push(self.buf.len());
        self.offsets.len()
    }

    /// Append the xref table and trailer and hand back the finished bytes.
    fn finish(mut self, root: usize) -> Vec<u8> {
        let xref_at = self.buf.len();
        let size = self.offsets.len() + 1;

        self.buf
            .extend_from_slice(format!("xref\n0 {size}\n").as_bytes());
        self.buf.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &self.offsets {
            self.buf
                .extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        self.buf.extend_from_slice(
            format!("trailer\n<< /Size {size} /Root {root} 0 R >>\nstartxref\n{xref_at}\n%%EOF\n")
                .as_bytes(),
        );
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::super::layout::TextSpan;
    use super::*;

    fn page_with(text: &str) -> PageLayout {
        let mut page = PageLayout::default();
        page.spans.push(TextSpan {
            font: Font::Helvetica,
            size: 12.0,
            x: 10.0,
            y: 10.0,
            text: text.to_string(),
        });
        page
    }

    #[test]
    fn document_structure() {
        let bytes = write_document(&[page_with("Bertha"), page_with("Althea")]);
        let text = String::from_utf8_lossy(&bytes);

        assert!(text.starts_with("%PDF-1.4\n"));
        assert!(text.contains("/Count 2"));
        assert!(text.contains("/Kids [7 0 R 9 0 R]"));
        assert!(text.contains("/BaseFont /Helvetica"));
        assert!(text.contains("/BaseFont /ZapfDingbats"));
        assert!(text.ends_with("%%EOF\n"));
    }

    #[test]
    fn startxref_points_at_the_xref_table() {
        let bytes = write_document(&[page_with("Bertha")]);
        let text = String::from_utf8_lossy(&bytes);

        let start = text
            .rsplit_once("startxref\n")
            .and_then(|(_, tail)| tail.split('\n').next())
            .and_then(|n| n.parse::<usize>().ok())
            .unwrap();
        assert_eq!(&text[start..start + 5], "xref\n");
    }

    #[test]
    fn parens_and_backslashes_are_escaped() {
        let bytes = write_document(&[page_with(r"Feelin' (Groovy) A\B")]);
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains(r"(Feelin' \(Groovy\) A\\B) Tj"));
    }

    #[test]
    fn latin1_becomes_octal_and_the_rest_degrades() {
        assert_eq!(escape_text("Café"), "Caf\\351");
        assert_eq!(escape_text("日本"), "??");
    }

    #[test]
    fn top_left_maps_to_pdf_space() {
        let stream = content_stream(&page_with("x"));
        // x = 10mm from the left, y = 10mm down from a 279.4mm page.
        assert!(stream.contains("28.35 763.65 Td"));
    }
}
