use std::collections::BTreeMap;

use once_cell::sync::Lazy;

// Names match the surface forms in the NER gazetteer; NZ, SA, SL, WI, EAF
// and UAE keep their codes.
static COUNTRY_MAP: Lazy<BTreeMap<&'static str, &'static str>> = Lazy::new(|| {
    BTreeMap::from([
        ("AFG", "Afghanistan"),
        ("AUS", "Australia"),
        ("BAN", "Bangladesh"),
        ("BER", "Bermuda"),
        ("CAN", "Canada"),
        ("EAF", "EAF"),
        ("ENG", "England"),
        ("IND", "India"),
        ("IRE", "Ireland"),
        ("KENYA", "Kenya"),
        ("NAM", "Namibia"),
        ("NED", "Netherlands"),
        ("NZ", "NZ"),
        ("PAK", "Pakistan"),
        ("SA", "SA"),
        ("SCOT", "Scotland"),
        ("SL", "SL"),
        ("UAE", "UAE"),
        ("WI", "WI"),
        ("ZIM", "Zimbabwe"),
    ])
});

pub fn resolve(code: &str) -> Option<&'static str> {
    COUNTRY_MAP.get(code).copied()
}

pub fn codes() -> impl Iterator<Item = &'static str> {
    COUNTRY_MAP.keys().copied()
}

/// Display name for a code, falling back to the code itself.
pub fn display_name(code: &str) -> &str {
    resolve(code).unwrap_or(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_codes() {
        assert_eq!(resolve("AUS"), Some("Australia"));
        assert_eq!(resolve("KENYA"), Some("Kenya"));
        assert_eq!(resolve("NZ"), Some("NZ"));
    }

    #[test]
    fn unknown_code_is_absent() {
        assert_eq!(resolve("ZZZ"), None);
        assert_eq!(resolve("aus"), None);
        assert_eq!(display_name("ZZZ"), "ZZZ");
    }

    #[test]
    fn codes_are_sorted_and_complete() {
        let all: Vec<&str> = codes().collect();
        assert_eq!(all.len(), 20);
        assert!(all.windows(2).all(|w| w[0] < w[1]));
    }
}
