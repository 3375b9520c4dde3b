//! PDF document builder
//!
//! Provides a fluent, cursor-driven API for building small PDF 1.4 documents
//! using the standard Helvetica fonts.

use crate::encoding::{escape_pdf_string, text_width, truncate_to_width};
use crate::error::{PrintError, PrintResult};
use std::io::Write;
use tracing::debug;

/// A4 page width in points
pub const A4_WIDTH: f32 = 595.28;
/// A4 page height in points
pub const A4_HEIGHT: f32 = 841.89;

/// Space kept free at the bottom of every page for the footer
const FOOTER_BAND: f32 = 24.0;
const FOOTER_SIZE: f32 = 8.0;
/// Line height as a multiple of the font size
const LEADING: f32 = 1.35;
/// Gap left between table-like cells
const CELL_PADDING: f32 = 4.0;

/// Standard font faces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }

    fn is_bold(&self) -> bool {
        matches!(self, Font::Bold)
    }
}

/// PDF document builder
///
/// Text flows top-down from the top margin. Each line advances the cursor,
/// and a new page starts whenever the next line would run into the footer
/// band. The footer (text plus `Page i / n`) is stamped on every page at
/// [`build`](Self::build) time, once the page count is known.
pub struct PdfBuilder {
    width: f32,
    height: f32,
    margin: f32,
    pages: Vec<Vec<u8>>,
    content: Vec<u8>,
    cursor: f32,
    font: Font,
    size: f32,
    title: Option<String>,
    footer: Option<String>,
    error: Option<PrintError>,
}

impl PdfBuilder {
    /// Create a builder for pages of the given size (points) and margin
    pub fn new(width: f32, height: f32, margin: f32) -> Self {
        Self {
            width,
            height,
            margin,
            pages: Vec::new(),
            content: Vec::with_capacity(4096),
            cursor: height - margin,
            font: Font::Regular,
            size: 10.0,
            title: None,
            footer: None,
            error: None,
        }
    }

    /// A4 portrait with 50pt margins
    pub fn a4() -> Self {
        Self::new(A4_WIDTH, A4_HEIGHT, 50.0)
    }

    /// Width available between the left and right margins
    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    /// Number of pages started so far
    pub fn page_count(&self) -> usize {
        self.pages.len() + 1
    }

    // === Document Metadata ===

    /// Set the document title (Info dictionary)
    pub fn title(&mut self, title: &str) -> &mut Self {
        self.title = Some(title.to_string());
        self
    }

    /// Set the footer text printed at the bottom-left of every page
    pub fn footer(&mut self, text: &str) -> &mut Self {
        self.footer = Some(text.to_string());
        self
    }

    // === Text Style ===

    /// Select the font used by subsequent lines
    pub fn font(&mut self, font: Font, size: f32) -> &mut Self {
        if !(size.is_finite() && size > 0.0) {
            self.error.get_or_insert(PrintError::InvalidFontSize(size));
            return self;
        }
        self.font = font;
        self.size = size;
        self
    }

    fn line_height(&self) -> f32 {
        self.size * LEADING
    }

    // === Text Output ===

    /// Write a line of text at the left margin
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.ensure_space(self.line_height());
        let baseline = self.cursor - self.size;
        let text = truncate_to_width(s, self.content_width(), self.size, self.font.is_bold());
        self.text_at(self.margin, baseline, &text);
        self.cursor -= self.line_height();
        self
    }

    /// Print left and right text on the same line
    ///
    /// Left text is left-aligned, right text is right-aligned.
    pub fn line_lr(&mut self, left: &str, right: &str) -> &mut Self {
        self.ensure_space(self.line_height());
        let baseline = self.cursor - self.size;
        let bold = self.font.is_bold();
        let rw = text_width(right, self.size, bold);
        let left = truncate_to_width(
            left,
            (self.content_width() - rw - CELL_PADDING).max(0.0),
            self.size,
            bold,
        );
        self.text_at(self.margin, baseline, &left);
        self.text_at(self.width - self.margin - rw, baseline, right);
        self.cursor -= self.line_height();
        self
    }

    /// Write one row of cells
    ///
    /// Each cell is `(offset, text)` where the offset is measured from the
    /// left margin. Offsets must be ascending; each cell is truncated so it
    /// stops short of the next one.
    pub fn row(&mut self, cells: &[(f32, &str)]) -> &mut Self {
        self.ensure_space(self.line_height());
        let baseline = self.cursor - self.size;
        let bold = self.font.is_bold();
        for (i, (offset, text)) in cells.iter().enumerate() {
            let end = cells
                .get(i + 1)
                .map(|(next, _)| *next)
                .unwrap_or(self.content_width());
            let cell = truncate_to_width(
                text,
                (end - offset - CELL_PADDING).max(0.0),
                self.size,
                bold,
            );
            self.text_at(self.margin + offset, baseline, &cell);
        }
        self.cursor -= self.line_height();
        self
    }

    /// Write a line on a light gray band spanning the content width
    pub fn shaded_line(&mut self, s: &str) -> &mut Self {
        let h = self.line_height() + 4.0;
        self.ensure_space(h);
        let _ = writeln!(
            self.content,
            "0.92 g {:.2} {:.2} {:.2} {:.2} re f 0 g",
            self.margin,
            self.cursor - h,
            self.content_width(),
            h
        );
        self.cursor -= 2.0;
        self.line(s);
        self.cursor -= 2.0;
        self
    }

    // === Layout ===

    /// Draw a horizontal rule across the content width
    pub fn rule(&mut self) -> &mut Self {
        self.ensure_space(8.0);
        let y = self.cursor - 4.0;
        self.stroke_line(self.margin, y, self.width - self.margin, y);
        self.cursor -= 8.0;
        self
    }

    /// Leave vertical space
    pub fn gap(&mut self, points: f32) -> &mut Self {
        self.cursor -= points;
        self
    }

    /// Start a new page if fewer than `height` points remain
    pub fn ensure_space(&mut self, height: f32) -> &mut Self {
        if self.cursor - height < self.bottom_limit() {
            self.new_page();
        }
        self
    }

    /// Finish the current page and start a new one
    pub fn new_page(&mut self) -> &mut Self {
        let finished = std::mem::replace(&mut self.content, Vec::with_capacity(4096));
        self.pages.push(finished);
        self.cursor = self.height - self.margin;
        self
    }

    fn bottom_limit(&self) -> f32 {
        self.margin + FOOTER_BAND
    }

    // === Raw Operators ===

    fn text_at(&mut self, x: f32, y: f32, s: &str) {
        let _ = write!(
            self.content,
            "BT /{} {:.1} Tf {:.2} {:.2} Td (",
            self.font.resource(),
            self.size,
            x,
            y
        );
        self.content.extend_from_slice(&escape_pdf_string(s));
        self.content.extend_from_slice(b") Tj ET\n");
    }

    fn stroke_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let _ = writeln!(
            self.content,
            "0.5 w {:.2} {:.2} m {:.2} {:.2} l S",
            x1, y1, x2, y2
        );
    }

    fn footer_ops(&self, page: usize, total: usize) -> Vec<u8> {
        let mut ops = Vec::new();
        let y = self.margin;
        let label = format!("Page {} / {}", page, total);
        let lw = text_width(&label, FOOTER_SIZE, false);
        let _ = writeln!(
            ops,
            "0.5 w {:.2} {:.2} m {:.2} {:.2} l S",
            self.margin,
            y + 12.0,
            self.width - self.margin,
            y + 12.0
        );
        if let Some(text) = &self.footer {
            let text = truncate_to_width(text, self.content_width() - lw - CELL_PADDING, FOOTER_SIZE, false);
            let _ = write!(ops, "BT /F1 {:.1} Tf {:.2} {:.2} Td (", FOOTER_SIZE, self.margin, y);
            ops.extend_from_slice(&escape_pdf_string(&text));
            ops.extend_from_slice(b") Tj ET\n");
        }
        let _ = write!(
            ops,
            "BT /F1 {:.1} Tf {:.2} {:.2} Td (",
            FOOTER_SIZE,
            self.width - self.margin - lw,
            y
        );
        ops.extend_from_slice(&escape_pdf_string(&label));
        ops.extend_from_slice(b") Tj ET\n");
        ops
    }

    // === Build ===

    /// Assemble the final PDF bytes
    ///
    /// Object layout: 1 catalog, 2 page tree, 3-4 fonts, 5 info, then a
    /// page object and its content stream per page.
    pub fn build(mut self) -> PrintResult<Vec<u8>> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        if self.bottom_limit() >= self.height - self.margin || self.content_width() <= 0.0 {
            return Err(PrintError::InvalidLayout(format!(
                "margin {} leaves no printable area on a {}x{} page",
                self.margin, self.width, self.height
            )));
        }

        let last = std::mem::take(&mut self.content);
        self.pages.push(last);
        let total = self.pages.len();

        let mut out: Vec<u8> = Vec::with_capacity(8192);
        let mut offsets: Vec<usize> = Vec::with_capacity(5 + total * 2);
        out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

        let page_ids: Vec<usize> = (0..total).map(|i| 6 + 2 * i).collect();
        let kids = page_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");

        write_object(&mut out, &mut offsets, b"<< /Type /Catalog /Pages 2 0 R >>");
        write_object(
            &mut out,
            &mut offsets,
            format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, total).as_bytes(),
        );
        write_object(
            &mut out,
            &mut offsets,
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
        );
        write_object(
            &mut out,
            &mut offsets,
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>",
        );

        let mut info = b"<< /Producer (seating-print)".to_vec();
        if let Some(title) = &self.title {
            info.extend_from_slice(b" /Title (");
            info.extend_from_slice(&escape_pdf_string(title));
            info.push(b')');
        }
        info.extend_from_slice(b" >>");
        write_object(&mut out, &mut offsets, &info);

        for (i, page) in self.pages.iter().enumerate() {
            let content_id = page_ids[i] + 1;
            let page_obj = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                self.width, self.height, content_id
            );
            write_object(&mut out, &mut offsets, page_obj.as_bytes());

            let mut stream = page.clone();
            stream.extend_from_slice(&self.footer_ops(i + 1, total));
            let mut body = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
            body.extend_from_slice(&stream);
            body.extend_from_slice(b"\nendstream");
            write_object(&mut out, &mut offsets, &body);
        }

        let xref_offset = out.len();
        let _ = write!(out, "xref\n0 {}\n0000000000 65535 f \n", offsets.len() + 1);
        for offset in &offsets {
            let _ = write!(out, "{:010} 00000 n \n", offset);
        }
        let _ = write!(
            out,
            "trailer\n<< /Size {} /Root 1 0 R /Info 5 0 R >>\nstartxref\n{}\n%%EOF\n",
            offsets.len() + 1,
            xref_offset
        );

        debug!(pages = total, bytes = out.len(), "PDF document built");
        Ok(out)
    }
}

impl Default for PdfBuilder {
    fn default() -> Self {
        Self::a4()
    }
}

/// Append `n 0 obj ... endobj`, numbering objects in write order
fn write_object(out: &mut Vec<u8>, offsets: &mut Vec<usize>, body: &[u8]) {
    offsets.push(out.len());
    let _ = write!(out, "{} 0 obj\n", offsets.len());
    out.extend_from_slice(body);
    out.extend_from_slice(b"\nendobj\n");
}
