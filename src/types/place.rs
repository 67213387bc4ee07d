//! The place hierarchy grammar.
//!
//! A GEDCOM place value is a comma-separated list of jurisdictions from
//! most specific to least specific. The split components are kept in full
//! and additionally mapped onto named slots (city, county, state, country)
//! by a positional heuristic. Place names are never normalized.

use crate::line::{LineArena, LineId};

#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

/// Tokens that mark a second component as a country rather than a state.
///
/// The list is deliberately small and fixed; anything not on it is read as
/// a state when only two components are present.
const COUNTRY_TOKENS: &[&str] = &[
    "USA",
    "U.S.A.",
    "US",
    "UNITED STATES",
    "UNITED STATES OF AMERICA",
    "UNITED KINGDOM",
    "UK",
    "ENGLAND",
    "SCOTLAND",
    "WALES",
    "IRELAND",
    "CANADA",
    "AUSTRALIA",
    "NEW ZEALAND",
    "GERMANY",
    "FRANCE",
    "ITALY",
    "SPAIN",
    "NETHERLANDS",
    "SWEDEN",
    "NORWAY",
    "DENMARK",
    "POLAND",
    "MEXICO",
];

fn is_country_token(component: &str) -> bool {
    let upper = component.to_uppercase();
    COUNTRY_TOKENS.contains(&upper.as_str())
}

/// A parsed place value.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct ParsedPlace {
    /// The value exactly as it appeared in the source.
    pub original: String,
    /// All components, most specific first, trimmed.
    pub components: Vec<String>,
    /// Positional slot: the most specific jurisdiction.
    pub city: Option<String>,
    /// Positional slot: present from four components up.
    pub county: Option<String>,
    /// Positional slot.
    pub state: Option<String>,
    /// Positional slot.
    pub country: Option<String>,
    /// Decimal latitude from a `MAP.LATI` child, when present.
    pub latitude: Option<f64>,
    /// Decimal longitude from a `MAP.LONG` child, when present.
    pub longitude: Option<f64>,
    /// The originating `PLAC` line, when parsed from a record tree.
    pub line: Option<LineId>,
}

impl ParsedPlace {
    /// Parses a bare place value.
    ///
    /// Slots are assigned by component count: one component is a city; two
    /// are city plus state-or-country (disambiguated by
    /// [`COUNTRY_TOKENS`]); three are city, state, country; four or more
    /// are city, county, state, country, with any extras kept in
    /// [`ParsedPlace::components`] only.
    #[must_use]
    pub fn parse(value: &str) -> ParsedPlace {
        let mut place = ParsedPlace {
            original: value.to_string(),
            ..ParsedPlace::default()
        };
        place.components = value
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(ToString::to_string)
            .collect();

        match place.components.as_slice() {
            [] => {}
            [city] => place.city = Some(city.clone()),
            [city, second] => {
                place.city = Some(city.clone());
                if is_country_token(second) {
                    place.country = Some(second.clone());
                } else {
                    place.state = Some(second.clone());
                }
            }
            [city, state, country] => {
                place.city = Some(city.clone());
                place.state = Some(state.clone());
                place.country = Some(country.clone());
            }
            [city, county, state, country, ..] => {
                place.city = Some(city.clone());
                place.county = Some(county.clone());
                place.state = Some(state.clone());
                place.country = Some(country.clone());
            }
        }
        place
    }

    /// Parses the `PLAC` line at `id`, picking up `MAP` coordinates from
    /// its children.
    #[must_use]
    pub fn from_line(arena: &LineArena, id: LineId) -> ParsedPlace {
        let mut place = ParsedPlace::parse(&arena.node(id).value);
        place.line = Some(id);
        if let Some(map) = arena.first_child_with_tag(id, "MAP") {
            place.latitude = arena
                .first_child_with_tag(map, "LATI")
                .and_then(|lati| parse_coordinate(&arena.node(lati).value));
            place.longitude = arena
                .first_child_with_tag(map, "LONG")
                .and_then(|long| parse_coordinate(&arena.node(long).value));
        }
        place
    }

    /// Whether both coordinates were present and parseable.
    #[must_use]
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// Parses a GEDCOM coordinate: `N`/`S`/`E`/`W`-prefixed degrees
/// (GEDCOM 5.5.1) or a signed decimal (GEDCOM 7.0).
fn parse_coordinate(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.chars().next()? {
        'N' | 'E' => trimmed[1..].parse().ok(),
        'S' | 'W' => trimmed[1..].parse::<f64>().ok().map(|v| -v),
        _ => trimmed.parse().ok(),
    }
}
