//! WinAnsi encoding utilities for the standard PDF fonts
//!
//! The 14 standard fonts only cover windows-1252, so text is:
//! - Encoded char by char, with unmappable chars replaced by `?`
//! - Escaped for use inside a PDF literal string
//! - Measured with the Helvetica metrics to lay out columns

/// Helvetica advance widths for ASCII 0x20..=0x7E, in 1/1000 em
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Bold glyphs run roughly this much wider than regular ones
const BOLD_FACTOR: f32 = 1.06;

/// Encode a string to windows-1252 bytes
///
/// Control characters become spaces. Characters outside the code page
/// become `?`.
pub fn encode_win_ansi(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    let mut buf = [0u8; 4];
    for c in s.chars() {
        if c.is_control() {
            out.push(b' ');
            continue;
        }
        let (cow, _, had_errors) = encoding_rs::WINDOWS_1252.encode(c.encode_utf8(&mut buf));
        if had_errors {
            out.push(b'?');
        } else {
            out.extend_from_slice(&cow);
        }
    }
    out
}

/// Encode and escape a string for a PDF literal `( ... )`
pub fn escape_pdf_string(s: &str) -> Vec<u8> {
    let encoded = encode_win_ansi(s);
    let mut out = Vec::with_capacity(encoded.len() + 8);
    for b in encoded {
        if matches!(b, b'(' | b')' | b'\\') {
            out.push(b'\\');
        }
        out.push(b);
    }
    out
}

fn char_width(c: char) -> u16 {
    match c as u32 {
        code @ 0x20..=0x7E => HELVETICA_WIDTHS[(code - 0x20) as usize],
        // Accented Latin letters share their base letter's width closely enough
        _ => 556,
    }
}

/// Approximate rendered width of `s` in points
pub fn text_width(s: &str, size: f32, bold: bool) -> f32 {
    let units: u32 = s.chars().map(|c| char_width(c) as u32).sum();
    let width = units as f32 * size / 1000.0;
    if bold { width * BOLD_FACTOR } else { width }
}

/// Truncate `s` so that it fits within `max_width` points
///
/// Truncated text ends with `...`.
pub fn truncate_to_width(s: &str, max_width: f32, size: f32, bold: bool) -> String {
    if text_width(s, size, bold) <= max_width {
        return s.to_string();
    }
    let budget = max_width - text_width("...", size, bold);
    let mut result = String::new();
    let mut width = 0.0;
    for c in s.chars() {
        let w = text_width(c.encode_utf8(&mut [0u8; 4]), size, bold);
        if width + w > budget {
            break;
        }
        result.push(c);
        width += w;
    }
    result.push_str("...");
    result
}
