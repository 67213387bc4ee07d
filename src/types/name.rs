//! The personal NAME structure.
//!
//! Name pieces come from two places. When the `NAME` line carries the
//! piece sub-tags (`NPFX`, `GIVN`, `NICK`, `SPFX`, `SURN`, `NSFX`) those
//! win; whatever they leave unfilled is recovered from the name value
//! itself, whose canonical shape is `given /surname/ suffix` with the
//! surname delimited by forward slashes.

use crate::line::{LineArena, LineId};

#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

/// What kind of name this is, from the `TYPE` sub-tag.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub enum NameKind {
    /// Name given at or near birth.
    Birth,
    /// Legal name after marriage.
    Married,
    /// Also-known-as.
    Aka,
    /// Name assumed in religious practice.
    Religious,
    /// Any other declared type, preserved as written.
    Other(String),
    /// No type declared.
    #[default]
    Unknown,
}

impl NameKind {
    /// Maps a `TYPE` value to a kind. Matching is case-insensitive; an
    /// empty value means no type was declared.
    #[must_use]
    pub fn parse(value: &str) -> NameKind {
        match value.trim().to_lowercase().as_str() {
            "birth" => NameKind::Birth,
            "married" => NameKind::Married,
            "aka" => NameKind::Aka,
            "religious" => NameKind::Religious,
            "" => NameKind::Unknown,
            _ => NameKind::Other(value.trim().to_string()),
        }
    }
}

/// Honorifics recognized in front of a given name.
const NAME_PREFIXES: &[&str] = &["Dr", "Mr", "Mrs", "Ms", "Prof", "Rev"];

/// Generational suffixes recognized after the surname.
const NAME_SUFFIXES: &[&str] = &["Jr", "Sr", "II", "III", "IV", "V"];

fn matches_token(token: &str, candidates: &[&str]) -> bool {
    let bare = token.strip_suffix('.').unwrap_or(token);
    candidates.iter().any(|c| c.eq_ignore_ascii_case(bare))
}

/// A parsed personal name.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct ParsedName {
    /// The `NAME` value exactly as written.
    pub original: String,
    /// The declared name type.
    pub kind: NameKind,
    /// Honorific prefix (`Dr`, `Rev`, …).
    pub prefix: Option<String>,
    /// Given name(s).
    pub given: Option<String>,
    /// Nickname, from the `NICK` sub-tag.
    pub nickname: Option<String>,
    /// Surname article (`van`, `de`, …), from the `SPFX` sub-tag.
    pub surname_prefix: Option<String>,
    /// Family name.
    pub surname: Option<String>,
    /// Generational suffix (`Jr`, `III`, …).
    pub suffix: Option<String>,
}

impl ParsedName {
    /// Parses a bare name value, without sub-tag information.
    #[must_use]
    pub fn parse(value: &str) -> ParsedName {
        let mut name = ParsedName {
            original: value.to_string(),
            ..ParsedName::default()
        };
        name.fill_from_value(value);
        name
    }

    /// Parses the `NAME` line at `id`, sub-tags first with the value as
    /// fallback for whatever they leave unfilled.
    #[must_use]
    pub fn from_line(arena: &LineArena, id: LineId) -> ParsedName {
        let value = arena.node(id).value.clone();
        let mut name = ParsedName {
            original: value.clone(),
            ..ParsedName::default()
        };

        let piece = |tag: &str| -> Option<String> {
            arena
                .first_child_with_tag(id, tag)
                .map(|child| arena.node(child).value.clone())
                .filter(|v| !v.is_empty())
        };
        name.prefix = piece("NPFX");
        name.given = piece("GIVN");
        name.nickname = piece("NICK");
        name.surname_prefix = piece("SPFX");
        name.surname = piece("SURN");
        name.suffix = piece("NSFX");
        if let Some(kind) = piece("TYPE") {
            name.kind = NameKind::parse(&kind);
        }

        name.fill_from_value(&value);
        name
    }

    /// Fills any still-empty pieces from the slash-delimited value.
    fn fill_from_value(&mut self, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }

        if let Some(open) = value.find('/') {
            let before = &value[..open];
            let after_open = &value[open + 1..];
            let (inside, after) = match after_open.find('/') {
                Some(close) => (&after_open[..close], &after_open[close + 1..]),
                None => (after_open, ""),
            };

            let (prefix, given) = split_prefix(before);
            if self.prefix.is_none() {
                self.prefix = prefix;
            }
            if self.given.is_none() {
                self.given = given;
            }
            if self.surname.is_none() {
                let surname = inside.trim();
                if !surname.is_empty() {
                    self.surname = Some(surname.to_string());
                }
            }
            if self.suffix.is_none() {
                let suffixes: Vec<&str> = after
                    .split_whitespace()
                    .filter(|token| matches_token(token, NAME_SUFFIXES))
                    .collect();
                if !suffixes.is_empty() {
                    self.suffix = Some(suffixes.join(" "));
                }
            }
            return;
        }

        // No slashes: the last of several tokens is the surname; a lone
        // token is a given name.
        let tokens: Vec<&str> = value.split_whitespace().collect();
        match tokens.as_slice() {
            [] => {}
            [single] => {
                if self.given.is_none() {
                    self.given = Some((*single).to_string());
                }
            }
            [given_region @ .., last] => {
                if self.surname.is_none() {
                    self.surname = Some((*last).to_string());
                }
                let (prefix, given) = split_prefix(&given_region.join(" "));
                if self.prefix.is_none() {
                    self.prefix = prefix;
                }
                if self.given.is_none() {
                    self.given = given;
                }
            }
        }
    }

    /// The full name with the slash delimiters dropped.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.original.replace('/', "").trim().to_string()
    }
}

/// Splits a recognized honorific off the front of the given-name region.
fn split_prefix(region: &str) -> (Option<String>, Option<String>) {
    let tokens: Vec<&str> = region.split_whitespace().collect();
    match tokens.as_slice() {
        [] => (None, None),
        [first, rest @ ..] if matches_token(first, NAME_PREFIXES) => {
            let given = if rest.is_empty() {
                None
            } else {
                Some(rest.join(" "))
            };
            (Some((*first).to_string()), given)
        }
        all => (None, Some(all.join(" "))),
    }
}
