//! SQL field sets and statement fragments
//!
//! [`sets`] decides which columns take part in generated statements and
//! [`clause`] renders those column lists as SQL text.

pub mod clause;
pub mod sets;

pub use clause::{
    join_on_clause, join_where_clause, placeholders, set_param_names, where_clause,
    where_clause_repeated, where_in_clause,
};
pub use sets::{
    contains_any, insert_field_set, join_slices, set_complement, set_include, set_merge,
    sort_by_keys, string_slice_match, update_field_set, InsertColumns,
};
