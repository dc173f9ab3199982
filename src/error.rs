use thiserror::Error;

use crate::sanitize::Diagnostic;

/// sqlmold errors
#[derive(Error, Debug)]
pub enum SqlmoldError {
    #[error(transparent)]
    Parse(#[from] Diagnostic),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl SqlmoldError {
    /// The parse diagnostic, if this error came from the sanitizer
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            SqlmoldError::Parse(diagnostic) => Some(diagnostic),
            _ => None,
        }
    }
}
