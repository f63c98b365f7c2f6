//! Known entity values. Entities captured under a gazetteer-typed key are
//! checked against these lists during scoring.

use std::collections::BTreeMap;

const ROOMS: &[&str] = &[
    "kitchen",
    "living room",
    "bedroom",
    "bathroom",
    "dining room",
    "office",
    "garage",
    "hallway",
    "basement",
    "garden",
    "nursery",
    "porch",
    "front",
    "back",
];

const GENRES: &[&str] = &[
    "jazz",
    "rock",
    "pop",
    "classical",
    "hip hop",
    "country",
    "blues",
    "electronic",
    "reggae",
    "metal",
    "ambient",
    "folk",
];

const ROUTINES: &[&str] = &[
    "morning", "night", "bedtime", "movie", "party", "away", "workout", "dinner", "reading",
];

const TYPED: [(&str, &[&str]); 3] = [("location", ROOMS), ("genre", GENRES), ("routine", ROUTINES)];

/// The known values for an entity key, if the key is gazetteer-typed.
pub(super) fn known_values(key: &str) -> Option<&'static [&'static str]> {
    TYPED
        .iter()
        .find_map(|(typed, values)| (*typed == key).then_some(*values))
}

/// Find the first known value of each type appearing as whole words.
pub(super) fn scan(text: &str) -> BTreeMap<String, String> {
    let padded = format!(" {text} ");
    TYPED
        .iter()
        .filter_map(|(key, values)| {
            values
                .iter()
                .find(|value| padded.contains(&format!(" {value} ")))
                .map(|value| ((*key).to_string(), (*value).to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_know_rooms_under_location_key() {
        let rooms = known_values("location").unwrap();
        assert!(rooms.contains(&"living room"));
        assert!(known_values("song").is_none());
    }

    #[test]
    fn should_scan_whole_words_only() {
        let found = scan("play some jazz in the living room");
        assert_eq!(found.get("genre").map(String::as_str), Some("jazz"));
        assert_eq!(found.get("location").map(String::as_str), Some("living room"));

        let found = scan("popcorn time");
        assert!(!found.contains_key("genre"));
    }
}
