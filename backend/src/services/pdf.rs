//! Plain-text report to PDF rendering
//!
//! Produces a minimal PDF 1.4 document: one Helvetica text line per report
//! line, top to bottom, starting a new page when the bottom margin is reached.
//! Helvetica with WinAnsi encoding only covers Latin-1; other characters are
//! replaced with `?`.

/// Page geometry and typography, in PDF points
#[derive(Debug, Clone, Copy)]
pub struct PdfRenderer {
    pub page_width: f32,
    pub page_height: f32,
    pub left_margin: f32,
    pub top_baseline: f32,
    pub bottom_margin: f32,
    pub line_height: f32,
    pub font_size: f32,
}

impl Default for PdfRenderer {
    /// US letter, 40pt left margin, first line at 750pt, 15pt line height
    fn default() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            left_margin: 40.0,
            top_baseline: 750.0,
            bottom_margin: 40.0,
            line_height: 15.0,
            font_size: 12.0,
        }
    }
}

impl PdfRenderer {
    /// How many lines fit between the first baseline and the bottom margin
    pub fn lines_per_page(&self) -> usize {
        let usable = (self.top_baseline - self.bottom_margin).max(0.0);
        (usable / self.line_height).floor() as usize + 1
    }

    /// Split report text into pages of lines
    pub fn paginate<'a>(&self, text: &'a str) -> Vec<Vec<&'a str>> {
        let lines: Vec<&str> = text.lines().collect();
        if lines.is_empty() {
            return vec![Vec::new()];
        }
        lines
            .chunks(self.lines_per_page())
            .map(|chunk| chunk.to_vec())
            .collect()
    }

    /// Render report text into PDF bytes
    pub fn render(&self, text: &str) -> Vec<u8> {
        let pages = self.paginate(text);
        let mut writer = PdfWriter::new();

        // Objects 1-3 are fixed; each page then takes a page object and a
        // content stream object.
        let page_ids: Vec<usize> = (0..pages.len()).map(|i| 4 + i * 2).collect();

        writer.object(1, b"<< /Type /Catalog /Pages 2 0 R >>");

        let kids = page_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        writer.object(
            2,
            format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, pages.len()).as_bytes(),
        );

        writer.object(
            3,
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
        );

        for (lines, page_id) in pages.iter().zip(&page_ids) {
            let content_id = page_id + 1;
            let page = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                self.page_width, self.page_height, content_id
            );
            writer.object(*page_id, page.as_bytes());

            let stream = self.content_stream(lines);
            let mut body = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
            body.extend_from_slice(&stream);
            body.extend_from_slice(b"\nendstream");
            writer.object(content_id, &body);
        }

        writer.finish(1)
    }

    fn content_stream(&self, lines: &[&str]) -> Vec<u8> {
        let mut stream = Vec::new();
        let mut y = self.top_baseline;
        for line in lines {
            stream.extend_from_slice(
                format!(
                    "BT /F1 {} Tf {} {} Td (",
                    self.font_size, self.left_margin, y
                )
                .as_bytes(),
            );
            stream.extend_from_slice(&encode_text(line));
            stream.extend_from_slice(b") Tj ET\n");
            y -= self.line_height;
        }
        stream
    }
}

/// Escape a line for a PDF string literal in WinAnsi encoding
fn encode_text(line: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(line.len());
    for ch in line.trim_end_matches('\r').chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push(b'\\');
                out.push(ch as u8);
            }
            '\t' => out.push(b' '),
            c if c.is_control() => {}
            c if (c as u32) <= 0xFF => out.push(c as u32 as u8),
            _ => out.push(b'?'),
        }
    }
    out
}

/// Accumulates numbered objects and writes the cross-reference table
struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<(usize, usize)>,
}

impl PdfWriter {
    fn new() -> Self {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        Self {
            buf,
            offsets: Vec::new(),
        }
    }

    fn object(&mut self, id: usize, body: &[u8]) {
        self.offsets.push((id, self.buf.len()));
        self.buf.extend_from_slice(format!("{} 0 obj\n", id).as_bytes());
        self.buf.extend_from_slice(body);
        self.buf.extend_from_slice(b"\nendobj\n");
    }

    fn finish(mut self, root_id: usize) -> Vec<u8> {
        self.offsets.sort_by_key(|(id, _)| *id);
        let size = self.offsets.len() + 1;
        let xref_offset = self.buf.len();

        self.buf
            .extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", size).as_bytes());
        for (_, offset) in &self.offsets {
            self.buf
                .extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }
        self.buf.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root {} 0 R >>\nstartxref\n{}\n%%EOF\n",
                size, root_id, xref_offset
            )
            .as_bytes(),
        );
        self.buf
    }
}
