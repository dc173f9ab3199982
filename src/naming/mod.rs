//! Identifier naming
//!
//! Pure string transforms used to turn schema names into generated
//! identifiers: casing, inflection, SQL quoting and keyword avoidance.
//! The only shared state is the [`NameCache`] passed into the casing
//! functions.

use std::collections::BTreeMap;

mod cache;
mod case;
mod inflect;
mod quote;

pub use cache::NameCache;
pub use case::{camel_case, title_case, title_case_identifier};
pub use inflect::{pluralize, singularize, Ruleset};
pub use quote::{quote_character, quote_identifier, quote_identifiers, schema_table};

/// Rust keywords that can't be used as bare identifiers in generated code
/// https://doc.rust-lang.org/reference/keywords.html
const RESERVED_WORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Check if a word is reserved in generated code
pub fn is_reserved_word(word: &str) -> bool {
    RESERVED_WORDS.contains(&word)
}

/// Append an underscore to `word` if it's a reserved word
pub fn replace_reserved_word(word: &str) -> String {
    if is_reserved_word(word) {
        return format!("{}_", word);
    }

    word.to_string()
}

/// Map a string transform over a list of strings
pub fn string_map(modifier: impl Fn(&str) -> String, strs: &[String]) -> Vec<String> {
    strs.iter().map(|s| modifier(s)).collect()
}

/// Prefix every string with `prefix`
pub fn prefix_strings(prefix: &str, strs: &[String]) -> Vec<String> {
    strs.iter().map(|s| format!("{}{}", prefix, s)).collect()
}

/// Render a map as a list of string tuples, sorted by key
///
/// `{"id": "i64", "name": "String"}` becomes
/// `("id", "i64"), ("name", "String")`, ready to be dropped into a
/// `HashMap::from([...])` in generated code.
pub fn make_string_map(types: &BTreeMap<String, String>) -> String {
    types
        .iter()
        .map(|(k, v)| format!("({:?}, {:?})", k, v))
        .collect::<Vec<_>>()
        .join(", ")
}
