//! Character-set detection and decoding for GEDCOM sources.
//!
//! GEDCOM 5.5.x files arrive in UTF-8 (with or without BOM), UTF-16 LE/BE,
//! ANSEL (Z39.47), plain ASCII, and legacy 8-bit encodings. Detection runs
//! in two steps: a byte-order-mark sniff, then (absent a BOM) a scan of
//! the raw header bytes for the declared `CHAR` value. The BOM always wins;
//! a disagreement with the declaration is reported as a warning, never a
//! failure. Once an encoding is chosen, decoding is total: malformed
//! sequences become U+FFFD and a warning, so the parser downstream always
//! sees UTF-8.
//!
//! UTF-16 and Windows-1252 go through `encoding_rs`; ANSEL has no registry
//! coverage and is decoded by the mapping tables at the bottom of this
//! module.

use crate::diagnostics::{Context, ErrorCollector};
use encoding_rs::{UTF_16BE, UTF_16LE, WINDOWS_1252};

/// The character set a source was decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GedcomEncoding {
    /// UTF-8, the no-BOM default.
    Utf8,
    /// UTF-16 little endian.
    Utf16Le,
    /// UTF-16 big endian.
    Utf16Be,
    /// 7-bit ASCII, decoded as the UTF-8 subset it is.
    Ascii,
    /// ANSEL (Z39.47), the GEDCOM 5.x legacy encoding.
    Ansel,
    /// Windows-1252, covering the `ANSI` declarations of older exports.
    Windows1252,
}

impl std::fmt::Display for GedcomEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GedcomEncoding::Utf8 => "UTF-8",
            GedcomEncoding::Utf16Le => "UTF-16LE",
            GedcomEncoding::Utf16Be => "UTF-16BE",
            GedcomEncoding::Ascii => "ASCII",
            GedcomEncoding::Ansel => "ANSEL",
            GedcomEncoding::Windows1252 => "Windows-1252",
        };
        f.write_str(name)
    }
}

/// BOM sniff over the first bytes.
fn detect_bom(bytes: &[u8]) -> Option<GedcomEncoding> {
    if bytes.len() >= 3 && bytes[0] == 0xEF && bytes[1] == 0xBB && bytes[2] == 0xBF {
        return Some(GedcomEncoding::Utf8);
    }
    if bytes.len() >= 2 {
        if bytes[0] == 0xFF && bytes[1] == 0xFE {
            return Some(GedcomEncoding::Utf16Le);
        }
        if bytes[0] == 0xFE && bytes[1] == 0xFF {
            return Some(GedcomEncoding::Utf16Be);
        }
    }
    None
}

/// Normalizes a declared `CHAR` value to an encoding.
///
/// The table is deliberately small: `UTF-8`/`UTF8` (any case), `UTF-16` and
/// the legacy alias `UNICODE`, `ANSEL`, `ASCII`, and `ANSI`/`Windows-1252`.
#[must_use]
pub fn normalize_declared(value: &str) -> Option<GedcomEncoding> {
    match value.trim().to_uppercase().as_str() {
        "UTF-8" | "UTF8" => Some(GedcomEncoding::Utf8),
        "UTF-16" | "UNICODE" => Some(GedcomEncoding::Utf16Le),
        "ANSEL" => Some(GedcomEncoding::Ansel),
        "ASCII" => Some(GedcomEncoding::Ascii),
        "ANSI" | "WINDOWS-1252" => Some(GedcomEncoding::Windows1252),
        _ => None,
    }
}

/// Scans the raw header bytes for a `CHAR` declaration.
///
/// The scan decodes a prefix of the file permissively (Windows-1252 is a
/// superset of the single-byte candidates) and inspects the first lines
/// only; anything past the header cannot declare an encoding.
fn detect_declared(bytes: &[u8]) -> Option<GedcomEncoding> {
    let sample = &bytes[..bytes.len().min(4096)];
    let (decoded, _, _) = WINDOWS_1252.decode(sample);
    for line in decoded.lines().take(50) {
        let mut parts = line.split_whitespace();
        let (Some(level), Some(tag)) = (parts.next(), parts.next()) else {
            continue;
        };
        if level == "1" && tag == "CHAR" {
            return parts.next().and_then(normalize_declared);
        }
    }
    None
}

/// Detects the encoding of GEDCOM bytes: BOM first, declared `CHAR` next,
/// UTF-8 as the default.
#[must_use]
pub fn detect_encoding(bytes: &[u8]) -> GedcomEncoding {
    detect_bom(bytes)
        .or_else(|| detect_declared(bytes))
        .unwrap_or(GedcomEncoding::Utf8)
}

/// Decodes GEDCOM bytes to UTF-8 with the BOM skipped.
///
/// A BOM/declaration mismatch and any malformed sequence are reported into
/// `errors` as warnings; malformed input is repaired with U+FFFD rather
/// than rejected. Returns the decoded text and the encoding that was used.
#[must_use]
pub fn decode(bytes: &[u8], errors: &mut ErrorCollector) -> (String, GedcomEncoding) {
    let bom = detect_bom(bytes);
    let declared = detect_declared(bytes);
    let encoding = bom.or(declared).unwrap_or(GedcomEncoding::Utf8);

    if let (Some(bom), Some(declared)) = (bom, declared) {
        if bom != declared {
            errors.warning(
                Context::EncodingDetection,
                0,
                format!("byte order mark says {bom} but header declares {declared}; using {bom}"),
            );
        }
    }

    let body = match bom {
        Some(GedcomEncoding::Utf8) => &bytes[3..],
        Some(GedcomEncoding::Utf16Le | GedcomEncoding::Utf16Be) => &bytes[2..],
        _ => bytes,
    };

    let text = match encoding {
        GedcomEncoding::Utf8 => decode_utf8(body, errors),
        GedcomEncoding::Ascii => {
            if body.iter().any(|&b| b >= 0x80) {
                errors.warning(
                    Context::EncodingDetection,
                    0,
                    "declared ASCII but found bytes above 0x7F; replacing them",
                );
            }
            decode_utf8(body, errors)
        }
        GedcomEncoding::Utf16Le => decode_utf16(body, true, errors),
        GedcomEncoding::Utf16Be => decode_utf16(body, false, errors),
        GedcomEncoding::Windows1252 => WINDOWS_1252.decode(body).0.into_owned(),
        GedcomEncoding::Ansel => decode_ansel(body),
    };

    (text, encoding)
}

fn decode_utf8(bytes: &[u8], errors: &mut ErrorCollector) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            errors.warning(
                Context::EncodingDetection,
                0,
                "malformed UTF-8 sequences replaced with U+FFFD",
            );
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

fn decode_utf16(bytes: &[u8], little_endian: bool, errors: &mut ErrorCollector) -> String {
    let codec = if little_endian { UTF_16LE } else { UTF_16BE };
    let (decoded, _, had_errors) = codec.decode(bytes);
    if had_errors {
        errors.warning(
            Context::EncodingDetection,
            0,
            format!("malformed {} sequences replaced with U+FFFD", codec.name()),
        );
    }
    decoded.into_owned()
}

/// Decodes ANSEL (Z39.47) bytes to UTF-8.
///
/// ANSEL is ASCII below 0x80, special characters in 0xA1..=0xDF, and
/// combining diacritical marks in 0xE0..=0xFE. Diacritics precede their
/// base character in ANSEL but follow it in Unicode, so they are buffered
/// and emitted after the next base character.
fn decode_ansel(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut pending_marks: Vec<char> = Vec::new();

    for &byte in bytes {
        if let Some(mark) = ansel_combining_mark(byte) {
            pending_marks.push(mark);
            continue;
        }
        let ch = if byte < 0x80 {
            char::from(byte)
        } else if let Some(special) = ansel_special_char(byte) {
            special
        } else {
            '\u{FFFD}'
        };
        out.push(ch);
        out.extend(pending_marks.drain(..));
    }
    // A trailing diacritic with no base character still belongs to the text.
    out.extend(pending_marks);
    out
}

/// ANSEL non-spacing diacritical marks, 0xE0..=0xFE.
fn ansel_combining_mark(byte: u8) -> Option<char> {
    let mark = match byte {
        0xE0 => '\u{0309}', // hook above
        0xE1 => '\u{0300}', // grave
        0xE2 => '\u{0301}', // acute
        0xE3 => '\u{0302}', // circumflex
        0xE4 => '\u{0303}', // tilde
        0xE5 => '\u{0304}', // macron
        0xE6 => '\u{0306}', // breve
        0xE7 => '\u{0307}', // dot above
        0xE8 => '\u{0308}', // diaeresis
        0xE9 => '\u{030C}', // caron
        0xEA => '\u{030A}', // ring above
        0xEB => '\u{FE20}', // ligature left half
        0xEC => '\u{FE21}', // ligature right half
        0xED => '\u{0315}', // comma above right
        0xEE => '\u{030B}', // double acute
        0xEF => '\u{0310}', // candrabindu
        0xF0 => '\u{0327}', // cedilla
        0xF1 => '\u{0328}', // ogonek
        0xF2 => '\u{0323}', // dot below
        0xF3 => '\u{0324}', // double dot below
        0xF4 => '\u{0325}', // ring below
        0xF5 => '\u{0333}', // double underscore
        0xF6 => '\u{0332}', // underscore
        0xF7 => '\u{0326}', // comma below
        0xF8 => '\u{031C}', // left half ring below
        0xF9 => '\u{032E}', // half ring below
        0xFA => '\u{FE22}', // double tilde left half
        0xFB => '\u{FE23}', // double tilde right half
        0xFE => '\u{0313}', // comma above
        _ => return None,
    };
    Some(mark)
}

/// ANSEL spacing special characters, 0xA1..=0xC8.
fn ansel_special_char(byte: u8) -> Option<char> {
    let ch = match byte {
        0xA1 => '\u{0141}', // Ł
        0xA2 => '\u{00D8}', // Ø
        0xA3 => '\u{0110}', // Đ
        0xA4 => '\u{00DE}', // Þ
        0xA5 => '\u{00C6}', // Æ
        0xA6 => '\u{0152}', // Œ
        0xA7 => '\u{02B9}', // modifier prime
        0xA8 => '\u{00B7}', // middle dot
        0xA9 => '\u{266D}', // music flat
        0xAA => '\u{00AE}', // registered
        0xAB => '\u{00B1}', // plus-minus
        0xAC => '\u{01A0}', // Ơ
        0xAD => '\u{01AF}', // Ư
        0xAE => '\u{02BC}', // modifier apostrophe
        0xB0 => '\u{02BB}', // modifier turned comma
        0xB1 => '\u{0142}', // ł
        0xB2 => '\u{00F8}', // ø
        0xB3 => '\u{0111}', // đ
        0xB4 => '\u{00FE}', // þ
        0xB5 => '\u{00E6}', // æ
        0xB6 => '\u{0153}', // œ
        0xB7 => '\u{02BA}', // modifier double prime
        0xB8 => '\u{0131}', // dotless i
        0xB9 => '\u{00A3}', // £
        0xBA => '\u{00F0}', // ð
        0xBC => '\u{01A1}', // ơ
        0xBD => '\u{01B0}', // ư
        0xC0 => '\u{00B0}', // degree
        0xC1 => '\u{2113}', // script l
        0xC2 => '\u{2117}', // sound recording copyright
        0xC3 => '\u{00A9}', // ©
        0xC4 => '\u{266F}', // music sharp
        0xC5 => '\u{00BF}', // ¿
        0xC6 => '\u{00A1}', // ¡
        0xC7 => '\u{00DF}', // ß
        0xC8 => '\u{20AC}', // €
        _ => return None,
    };
    Some(ch)
}
