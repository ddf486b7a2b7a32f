//! Text helpers for titles, column padding, and iCalendar content lines.

/// Upper-case the first letter of every word and lower-case the rest.
///
/// A word starts at any letter that does not follow another letter, so
/// `"fase da lua"` becomes `"Fase Da Lua"` and `"d'été"` becomes `"D'Été"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

/// Left-align `text` in a column of `width` characters.
pub fn pad_right(text: &str, width: usize) -> String {
    format!("{text:<width$}")
}

/// Escape a TEXT property value (RFC 5545 §3.3.11).
pub fn escape_ical_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(ch),
        }
    }
    out
}

/// Maximum content line length in octets, excluding the CRLF.
const ICAL_LINE_OCTETS: usize = 75;

/// Fold a content line into CRLF-terminated physical lines (RFC 5545 §3.1).
///
/// Continuation lines start with a single space. Splits never fall inside a
/// multi-byte character.
pub fn fold_ical_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + 2);
    let mut used = 0;
    for ch in line.chars() {
        let len = ch.len_utf8();
        if used + len > ICAL_LINE_OCTETS {
            out.push_str("\r\n ");
            used = 1;
        }
        out.push(ch);
        used += len;
    }
    out.push_str("\r\n");
    out
}
