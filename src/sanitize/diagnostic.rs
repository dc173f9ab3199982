//! Parse failure reports for generated source

use std::fmt;

use thiserror::Error;

/// Lines of context shown on each side of the failing line
const CONTEXT_LINES: usize = 5;

/// A parse failure in generated source, with the surrounding lines
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line the parser failed on
    pub line: usize,
    /// Parser error message
    pub message: String,
    /// Up to five lines either side of `line`. Context lines are prefixed
    /// with their number, the failing line with `>>>>`.
    pub context: String,
}

impl Diagnostic {
    /// Build a diagnostic for `line` of `source`
    pub fn new(source: &str, line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
            context: context_window(source, line),
        }
    }

    pub(crate) fn from_syn(source: &str, err: &syn::Error) -> Self {
        let message = err.to_string();
        let start = err.span().start();

        // Running out of tokens at the top level yields a call-site span
        // with no real position; the parser stopped at the end of the file.
        let at_eof = message.starts_with("unexpected end of input")
            && start.line <= 1
            && start.column == 0;
        let line = if at_eof { last_line(source) } else { start.line };

        Self::new(source, line, message)
    }
}

/// 1-based number of the last non-blank line
fn last_line(source: &str) -> usize {
    source
        .lines()
        .collect::<Vec<_>>()
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .map_or(1, |i| i + 1)
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to parse generated source at line {}: {}",
            self.line, self.message
        )?;
        if !self.context.is_empty() {
            write!(f, "\n\n{}", self.context)?;
        }
        Ok(())
    }
}

fn context_window(source: &str, line: usize) -> String {
    if line == 0 {
        return String::new();
    }

    let first = line.saturating_sub(CONTEXT_LINES).max(1);
    let last = line + CONTEXT_LINES;

    let mut buf = String::new();
    for (number, text) in source.lines().enumerate().map(|(i, l)| (i + 1, l)) {
        if number < first {
            continue;
        }
        if number > last {
            break;
        }

        if number == line {
            buf.push_str(">>>> ");
        } else {
            buf.push_str(&format!("{:>4} ", number));
        }
        buf.push_str(text);
        buf.push('\n');
    }

    buf
}
