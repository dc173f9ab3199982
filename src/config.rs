//! Configuration loading
//!
//! Loads generator settings from environment variables, optionally reading
//! from a .env file first.

use crate::prelude::SqlmoldError;
use std::{env, path::Path};
use tracing::{debug, error, trace, warn};

/// SQL dialect settings used by the clause builders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub left_quote: char,
    pub right_quote: char,
    /// `$1, $2, ...` when true, `?` otherwise
    pub indexed_placeholders: bool,
}

impl Dialect {
    pub const POSTGRES: Dialect = Dialect::new('"', '"', true);
    pub const MYSQL: Dialect = Dialect::new('`', '`', false);
    pub const MSSQL: Dialect = Dialect::new('[', ']', true);
    pub const SQLITE: Dialect = Dialect::new('"', '"', false);

    pub const fn new(left_quote: char, right_quote: char, indexed_placeholders: bool) -> Self {
        Self {
            left_quote,
            right_quote,
            indexed_placeholders,
        }
    }

    /// Look up a preset by name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "psql" => Some(Self::POSTGRES),
            "mysql" | "mariadb" => Some(Self::MYSQL),
            "mssql" | "sqlserver" => Some(Self::MSSQL),
            "sqlite" | "sqlite3" => Some(Self::SQLITE),
            _ => None,
        }
    }

    /// Start index to hand the clause builders: `start` for indexed
    /// placeholders, 0 (anonymous `?`) otherwise
    pub fn placeholder_start(&self, start: usize) -> usize {
        if self.indexed_placeholders {
            start
        } else {
            0
        }
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self::POSTGRES
    }
}

/// Generator configuration
#[derive(Debug, Clone, Default)]
pub struct GeneratorConfig {
    pub dialect: Dialect,
    /// Import aliases or paths the sanitizer must never prune
    pub keep_imports: Vec<String>,
}

impl GeneratorConfig {
    /// Load configuration from environment variables
    ///
    /// Expected variables:
    /// - SQLMOLD_DIALECT (default: postgres)
    /// - SQLMOLD_LQ / SQLMOLD_RQ (override the dialect's quote characters)
    /// - SQLMOLD_INDEX_PLACEHOLDERS (override placeholder style, true/false)
    /// - SQLMOLD_KEEP_IMPORTS (comma separated)
    pub fn from_env() -> Result<Self, SqlmoldError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value
    /// if it's set
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SqlmoldError>
    where
        F: Fn(&str) -> Option<String>,
    {
        debug!("Loading generator configuration from environment");

        let mut dialect = match lookup("SQLMOLD_DIALECT") {
            Some(name) => Dialect::from_name(&name).ok_or_else(|| {
                error!(dialect = ?name, "Unknown SQLMOLD_DIALECT value");
                SqlmoldError::Config(format!(
                    "SQLMOLD_DIALECT must be one of postgres, mysql, mssql, sqlite (got {:?})",
                    name
                ))
            })?,
            None => {
                trace!("SQLMOLD_DIALECT not set, using default");
                Dialect::default()
            }
        };

        if let Some(value) = lookup("SQLMOLD_LQ") {
            dialect.left_quote = parse_quote_char("SQLMOLD_LQ", &value)?;
        }
        if let Some(value) = lookup("SQLMOLD_RQ") {
            dialect.right_quote = parse_quote_char("SQLMOLD_RQ", &value)?;
        }

        if let Some(value) = lookup("SQLMOLD_INDEX_PLACEHOLDERS") {
            dialect.indexed_placeholders = parse_bool(&value).ok_or_else(|| {
                error!(value = ?value, "Invalid SQLMOLD_INDEX_PLACEHOLDERS value");
                SqlmoldError::Config(
                    "SQLMOLD_INDEX_PLACEHOLDERS must be true or false".to_string(),
                )
            })?;
        }

        let keep_imports: Vec<String> = lookup("SQLMOLD_KEEP_IMPORTS")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        debug!(dialect = ?dialect, keep_imports = ?keep_imports, "Configuration loaded");

        Ok(Self {
            dialect,
            keep_imports,
        })
    }

    /// Load a .env file and then read configuration from environment
    pub fn load(env_file: &Path) -> Result<Self, SqlmoldError> {
        if env_file.exists() {
            debug!(path = ?env_file, "Loading environment file");
            dotenvy::from_path(env_file).map_err(|e| {
                error!(path = ?env_file, error = ?e, "Failed to load environment file");
                SqlmoldError::Config(format!("Failed to load {}: {}", env_file.display(), e))
            })?;
        } else {
            warn!(path = ?env_file, "Environment file not found, using existing environment");
        }

        Self::from_env()
    }
}

fn parse_quote_char(key: &str, value: &str) -> Result<char, SqlmoldError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => {
            error!(key = key, value = ?value, "Quote override must be a single character");
            Err(SqlmoldError::Config(format!(
                "{} must be a single character",
                key
            )))
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
