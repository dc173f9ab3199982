//! Column set algebra
//!
//! Column lists are small (tens of names), so everything here is a linear
//! scan over slices that keeps the caller's ordering.

use std::collections::HashSet;

/// Columns participating in an INSERT, and the columns read back afterwards
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertColumns {
    /// Columns written by the INSERT statement
    pub insert: Vec<String>,
    /// Defaulted columns whose database-assigned values must be returned
    pub returning: Vec<String>,
}

/// Elements of `a` that are not in `b`, in `a`'s order
pub fn set_complement(a: &[String], b: &[String]) -> Vec<String> {
    a.iter().filter(|x| !set_include(x, b)).cloned().collect()
}

/// `a` followed by `b` with duplicates removed, first occurrence wins
pub fn set_merge(a: &[String], b: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(a.len() + b.len());
    let mut merged = Vec::with_capacity(a.len() + b.len());

    for x in a.iter().chain(b) {
        if seen.insert(x.as_str()) {
            merged.push(x.clone());
        }
    }

    merged
}

/// Reorder `items` to follow the order of `keys`
///
/// Items missing from `keys` are dropped, so this is a filter as well as a
/// sort.
pub fn sort_by_keys(keys: &[String], items: &[String]) -> Vec<String> {
    keys.iter()
        .filter(|key| set_include(key, items))
        .take(items.len())
        .cloned()
        .collect()
}

/// Check if `x` is in `set`
pub fn set_include(x: &str, set: &[String]) -> bool {
    set.iter().any(|s| s == x)
}

/// Columns for an UPDATE's SET list
///
/// A non-empty whitelist is used verbatim. Otherwise every column except
/// the primary key columns is updated.
pub fn update_field_set(
    all_columns: &[String],
    primary_key_columns: &[String],
    whitelist: &[String],
) -> Vec<String> {
    if !whitelist.is_empty() {
        return whitelist.to_vec();
    }

    set_complement(all_columns, primary_key_columns)
}

/// Columns to insert and columns to return for an INSERT
///
/// With a whitelist, the whitelist is inserted and every defaulted column
/// outside it is returned. Without one, columns lacking a default are always
/// inserted, along with defaulted columns that hold non-zero values; they
/// are ordered like `columns`. The remaining defaulted columns are returned.
pub fn insert_field_set(
    columns: &[String],
    defaulted_columns: &[String],
    no_default_columns: &[String],
    non_zero_defaulted_columns: &[String],
    whitelist: &[String],
) -> InsertColumns {
    if !whitelist.is_empty() {
        return InsertColumns {
            insert: whitelist.to_vec(),
            returning: set_complement(defaulted_columns, whitelist),
        };
    }

    let merged = set_merge(no_default_columns, non_zero_defaulted_columns);
    let insert = sort_by_keys(columns, &merged);
    let returning = set_complement(defaulted_columns, &insert);

    InsertColumns { insert, returning }
}

/// Check if both slices hold the same elements, in any order
pub fn string_slice_match(a: &[String], b: &[String]) -> bool {
    a.len() == b.len() && a.iter().all(|x| set_include(x, b))
}

/// Check if any of `finds` is in `a`
pub fn contains_any(a: &[String], finds: &[&str]) -> bool {
    a.iter().any(|s| finds.contains(&s.as_str()))
}

/// Join two equal-length slices pairwise with `sep`
///
/// # Panics
///
/// Panics if the slices differ in length.
pub fn join_slices(sep: &str, a: &[String], b: &[String]) -> Vec<String> {
    assert_eq!(
        a.len(),
        b.len(),
        "join_slices: can only merge slices of same length"
    );

    a.iter()
        .zip(b)
        .map(|(x, y)| format!("{}{}{}", x, sep, y))
        .collect()
}
