//! Metro-area county allow-list.
//!
//! The table is plain static data. [`ALLOWED_GEOGRAPHIES`] is the derived
//! set of `"<State>-<County> County"` keys, built once on first use.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// A named metro area and the counties that make it up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetroArea {
    pub name: &'static str,
    /// Two-letter state abbreviation.
    pub state: &'static str,
    /// County names without the trailing `" County"`.
    pub counties: &'static [&'static str],
}

impl MetroArea {
    /// Allow-list keys for this metro, e.g. `"TX-Travis County"`.
    pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
        self.counties
            .iter()
            .map(move |county| geography_key(self.state, &format!("{} County", county)))
    }
}

pub const METRO_AREAS: &[MetroArea] = &[
    MetroArea {
        name: "San Francisco Bay Area",
        state: "CA",
        counties: &[
            "Alameda",
            "Contra Costa",
            "Marin",
            "Napa",
            "San Mateo",
            "Santa Clara",
            "Solano",
            "Sonoma",
            "San Francisco",
        ],
    },
    MetroArea {
        name: "New York City",
        state: "NY",
        counties: &["New York", "Bronx", "Queens", "Kings", "Richmond"],
    },
    MetroArea {
        name: "Greater Austin",
        state: "TX",
        counties: &["Travis"],
    },
    MetroArea {
        name: "Miami",
        state: "FL",
        counties: &["Miami-Dade", "Broward", "Palm Beach"],
    },
];

/// Every allow-listed `"<State>-<County> County"` key.
pub static ALLOWED_GEOGRAPHIES: Lazy<HashSet<String>> =
    Lazy::new(|| METRO_AREAS.iter().flat_map(|m| m.keys()).collect());

/// Join a state and a county into the allow-list key format.
pub fn geography_key(state: &str, county: &str) -> String {
    format!("{}-{}", state, county)
}

/// Whether a (state, county) pair is in the metro allow-list.
pub fn is_allowed(state: &str, county: &str) -> bool {
    ALLOWED_GEOGRAPHIES.contains(&geography_key(state, county))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_list_size() {
        // 9 Bay Area + 5 NYC + 1 Austin + 3 Miami
        assert_eq!(ALLOWED_GEOGRAPHIES.len(), 18);
    }

    #[test]
    fn test_key_format() {
        assert!(ALLOWED_GEOGRAPHIES.contains("CA-Alameda County"));
        assert!(ALLOWED_GEOGRAPHIES.contains("FL-Miami-Dade County"));
        assert!(ALLOWED_GEOGRAPHIES.contains("NY-Kings County"));
    }

    #[test]
    fn test_is_allowed() {
        assert!(is_allowed("CA", "Alameda County"));
        assert!(is_allowed("TX", "Travis County"));
        assert!(!is_allowed("CA", "Orange County"));
        // County name alone is not enough, the state must match
        assert!(!is_allowed("TX", "Kings County"));
        assert!(!is_allowed("CA", "Alameda"));
    }

    #[test]
    fn test_metro_keys() {
        let austin: Vec<String> = METRO_AREAS[2].keys().collect();
        assert_eq!(austin, vec!["TX-Travis County"]);
    }
}
