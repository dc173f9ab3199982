//! Schema data structures
//!
//! These types describe the database schema a generator run works from.
//! Introspection produces them and they stay immutable for the whole run.

use std::fmt;

use crate::naming::{singularize, title_case, NameCache};
use crate::sql::{insert_field_set, join_on_clause, update_field_set, InsertColumns};

/// A complete database schema
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub name: String,
    pub tables: Vec<Table>,
}

impl Schema {
    /// Find a table by name
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|table| table.name == name)
    }
}

/// Database table
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    pub primary_key: Option<PrimaryKey>,
    pub indexes: Vec<Index>,
    pub uniques: Vec<Unique>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    /// Returns the model type name: the singular table name in TitleCase
    pub fn model_name(&self, cache: &NameCache) -> String {
        title_case(cache, &singularize(&self.name))
    }

    /// Column names in table order
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|col| col.name.clone()).collect()
    }

    /// Columns with a server-side default
    pub fn defaulted_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|col| col.has_default)
            .map(|col| col.name.clone())
            .collect()
    }

    /// Columns without a server-side default
    pub fn no_default_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|col| !col.has_default)
            .map(|col| col.name.clone())
            .collect()
    }

    /// Get primary key columns in order
    pub fn primary_key_columns(&self) -> Vec<String> {
        self.primary_key
            .as_ref()
            .map(|pk| pk.columns.clone())
            .unwrap_or_default()
    }

    /// Columns for an UPDATE's SET list
    pub fn update_columns(&self, whitelist: &[String]) -> Vec<String> {
        update_field_set(&self.column_names(), &self.primary_key_columns(), whitelist)
    }

    /// Columns to insert and columns to return for an INSERT
    ///
    /// `non_zero_defaulted` names the defaulted columns the caller holds
    /// explicit values for.
    pub fn insert_columns(
        &self,
        non_zero_defaulted: &[String],
        whitelist: &[String],
    ) -> InsertColumns {
        insert_field_set(
            &self.column_names(),
            &self.defaulted_columns(),
            &self.no_default_columns(),
            non_zero_defaulted,
            whitelist,
        )
    }

    /// Find a column by name
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|col| col.name == name)
    }
}

/// A table column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    /// Database type as reported by introspection (`bigint`, `text`, ...)
    pub db_type: String,
    /// Column has a server-side default (DEFAULT value, NOW(), SERIAL, ...)
    pub has_default: bool,
    pub nullable: bool,
}

impl ColumnDef {
    pub fn new(name: &str, db_type: &str) -> Self {
        Self {
            name: name.to_string(),
            db_type: db_type.to_string(),
            has_default: false,
            nullable: false,
        }
    }

    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimaryKey {
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub name: String,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unique {
    pub name: String,
    pub columns: Vec<String>,
}

/// A foreign key from `local_columns` to `foreign_columns` of `foreign_model`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub name: String,
    pub local_columns: Vec<String>,
    /// Table the key points at
    pub foreign_model: String,
    pub foreign_columns: Vec<String>,
}

impl ForeignKey {
    /// Join condition between `local_table` and the referenced table
    pub fn join_on(&self, lq: char, rq: char, local_table: &str) -> String {
        join_on_clause(
            lq,
            rq,
            local_table,
            &self.local_columns,
            &self.foreign_model,
            &self.foreign_columns,
        )
    }
}

/// A column name and its database type, as used in DDL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlColumnDef {
    pub name: String,
    pub db_type: String,
}

impl fmt::Display for SqlColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.db_type)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlColumnDefs(pub Vec<SqlColumnDef>);

impl SqlColumnDefs {
    pub fn names(&self) -> Vec<String> {
        self.0.iter().map(|def| def.name.clone()).collect()
    }

    pub fn types(&self) -> Vec<String> {
        self.0.iter().map(|def| def.db_type.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SqlColumnDefs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, def) in self.0.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", def)?;
        }
        Ok(())
    }
}

/// Column definitions for `names`, in the order of `names`
///
/// Names that don't match a column are skipped.
pub fn sql_col_definitions(columns: &[ColumnDef], names: &[String]) -> SqlColumnDefs {
    SqlColumnDefs(
        names
            .iter()
            .filter_map(|name| columns.iter().find(|col| &col.name == name))
            .map(|col| SqlColumnDef {
                name: col.name.clone(),
                db_type: col.db_type.clone(),
            })
            .collect(),
    )
}
