//! # seating-print
//!
//! Minimal PDF writer - low-level document capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to lay out a printable document:
//! - A4 pages with the standard Helvetica fonts
//! - Cursor-driven lines with automatic page breaks
//! - Per-page footer with page numbers
//! - WinAnsi (windows-1252) text encoding
//!
//! Business logic (WHAT to print) stays in application code:
//! - Guest list rendering → seating-server `export`
//!
//! ## Example
//!
//! ```
//! use seating_print::{Font, PdfBuilder};
//!
//! let mut pdf = PdfBuilder::a4();
//! pdf.title("Liste des invités");
//! pdf.font(Font::Bold, 18.0).line("Liste des invités");
//! pdf.font(Font::Regular, 10.0).rule().line("Table 1 - 8 / 10");
//! pdf.footer("Généré le 18/10/2026");
//!
//! let bytes = pdf.build().unwrap();
//! assert!(bytes.starts_with(b"%PDF-1.4"));
//! ```

mod encoding;
mod error;
mod pdf;

// Re-exports
pub use encoding::{encode_win_ansi, escape_pdf_string, text_width, truncate_to_width};
pub use error::{PrintError, PrintResult};
pub use pdf::{Font, PdfBuilder, A4_HEIGHT, A4_WIDTH};
