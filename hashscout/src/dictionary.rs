//! Dictionary candidate source: a curated list of known-weak passwords
//! plus cheap derived variants, materialized fresh for each search.
//!
//! The list is deterministic and order matters: curated entries first,
//! then trivially short inputs, years, common first names, and finally
//! suffix/case variants of the most common entries. The whole sequence
//! stays in the low thousands, so building it per search is cheap and
//! the resulting `Vec` is shared read-only across workers.

use std::collections::HashSet;

/// Known-weak passwords, roughly in observed-frequency order
const CURATED: &[&str] = &[
    "password", "123456", "123456789", "12345678", "qwerty", "abc123",
    "letmein", "monkey", "dragon", "master", "welcome", "admin", "login",
    "iloveyou", "sunshine", "princess", "football", "baseball", "shadow",
    "superman", "batman", "trustno1", "hello", "freedom", "whatever",
    "qazwsx", "654321", "password1", "123123", "starwars", "charlie",
    "hunter2", "secret", "summer", "winter", "ninja", "mustang", "access",
    "flower", "cookie", "cheese", "soccer", "killer", "pepper", "jordan",
];

/// Common first names, a frequent password choice
const NAMES: &[&str] = &[
    "michael", "jennifer", "jessica", "ashley", "daniel", "matthew",
    "joshua", "amanda", "david", "james", "robert", "maria", "sarah",
    "thomas", "andrew", "laura", "kevin", "brian", "nicole", "anthony",
    "emily", "jacob", "olivia", "hannah",
];

/// How many curated entries get derived variants
const VARIANT_PREFIX: usize = 20;

const YEAR_FIRST: u32 = 1940;
const YEAR_LAST: u32 = 2029;

/// Builds the full dictionary candidate sequence for one search.
///
/// Duplicates produced by overlapping groups (e.g. a curated entry that
/// is also a repeated-character string) are dropped, keeping the first
/// occurrence so the ordering contract holds.
pub fn build_wordlist() -> Vec<String> {
    let mut words: Vec<String> = Vec::with_capacity(512);

    words.extend(CURATED.iter().map(|w| w.to_string()));

    // Trivially short inputs: single digits, single letters, and short
    // repeated-character runs
    words.extend(('0'..='9').map(String::from));
    words.extend(('a'..='z').map(String::from));
    for c in ('a'..='z').chain('0'..='9') {
        for len in 2..=4 {
            words.push(std::iter::repeat(c).take(len).collect());
        }
    }

    words.extend((YEAR_FIRST..=YEAR_LAST).map(|y| y.to_string()));

    words.extend(NAMES.iter().map(|w| w.to_string()));

    // Suffix and case variants of the most common curated entries
    for w in CURATED.iter().take(VARIANT_PREFIX) {
        words.push(format!("{w}1"));
        words.push(format!("{w}123"));
        words.push(format!("{w}!"));
        words.push(format!("{w}@"));
        words.push(w.to_ascii_uppercase());
        words.push(capitalize(w));
    }

    let mut seen = HashSet::with_capacity(words.len());
    words.retain(|w| seen.insert(w.clone()));
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
