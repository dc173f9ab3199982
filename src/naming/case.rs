//! Identifier casing
//!
//! Converts snake_case schema names into the cased identifiers used for
//! generated types and fields.

use super::NameCache;

/// Words that are uppercased in full when they appear as a name component
const UPPERCASE_WORDS: &[&str] = &[
    "acl", "api", "ascii", "cpu", "eof", "guid", "iban", "id", "ip", "json", "ram", "sla", "udp",
    "ui", "uid", "uri", "url", "utf8", "uuid",
];

const VOWELS: &[u8] = b"aeiouy";

/// Convert a snake_case name into a title cased identifier
///
/// Known acronyms and vowel-less words are fully uppercased, so
/// `field_name_id` becomes `FieldNameID` and `ip_address` becomes
/// `IPAddress`. Runs of underscores count as a single separator.
pub fn title_case(cache: &NameCache, name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }

    cache.get_or_insert_with(name, compute_title_case)
}

fn compute_title_case(name: &str) -> String {
    let mut buf = String::with_capacity(name.len());

    for word in name.split('_').filter(|w| !w.is_empty()) {
        if should_uppercase(word) {
            buf.push_str(&word.to_ascii_uppercase());
            continue;
        }

        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            buf.push(first.to_ascii_uppercase());
            buf.push_str(chars.as_str());
        }
    }

    buf
}

fn should_uppercase(word: &str) -> bool {
    let bytes = word.as_bytes();
    let has_vowel = bytes.iter().any(|b| VOWELS.contains(b));

    // Only the part before the first digit is matched against the acronym
    // list, so "id2" matches "id".
    let num_start = bytes
        .iter()
        .position(u8::is_ascii_digit)
        .unwrap_or(bytes.len());

    !has_vowel || UPPERCASE_WORDS.contains(&&word[..num_start])
}

/// Convert a snake_case name into a camel cased identifier
///
/// The first word is kept as-is and the rest is title cased:
/// `var_name_id` becomes `varNameID`.
pub fn camel_case(cache: &NameCache, name: &str) -> String {
    let name = name.trim_start_matches('_');
    if name.is_empty() {
        return String::new();
    }

    match name.split_once('_') {
        None => name.to_string(),
        Some((head, rest)) => {
            let mut buf = String::with_capacity(name.len());
            buf.push_str(head);
            buf.push_str(&title_case(cache, rest));
            buf
        }
    }
}

/// Title case each `__`-separated fragment and join them with dots
///
/// `users__profile_id` becomes `Users.ProfileID`.
pub fn title_case_identifier(cache: &NameCache, id: &str) -> String {
    if !id.contains("__") {
        return title_case(cache, id);
    }

    id.split("__")
        .map(|fragment| title_case(cache, fragment))
        .collect::<Vec<_>>()
        .join(".")
}
