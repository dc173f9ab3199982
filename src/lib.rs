//! # sqlmold
//!
//! Code generation support for schema-driven data access layers
//!
//! This crate provides the pieces a generator needs between schema
//! introspection and writing files: identifier casing and inflection,
//! column field-set algebra, SQL fragment builders, and a sanitizer that
//! prunes unused imports from generated Rust source and reformats it.

pub mod config;
pub mod error;
pub mod naming;
pub mod output;
pub mod sanitize;
pub mod schema;
pub mod sql;
pub mod templates;

pub mod prelude {
    pub use crate::config::{Dialect, GeneratorConfig};
    pub use crate::error::SqlmoldError;
    pub use crate::naming::{
        camel_case, pluralize, quote_identifier, replace_reserved_word, singularize, title_case,
        title_case_identifier, NameCache,
    };
    pub use crate::sanitize::{sanitize, Diagnostic, Sanitizer};
    pub use crate::schema::{ColumnDef, ForeignKey, Index, PrimaryKey, Schema, Table, Unique};
    pub use crate::sql::{insert_field_set, update_field_set, InsertColumns};
}
