//! Generated source cleanup
//!
//! Generated files are parsed, stripped of imports nothing refers to, and
//! printed back in canonical form. Output is deterministic and sanitizing it
//! a second time is a no-op.
//!
//! Trait imports that are only used through method-call syntax can't be
//! seen by name. See [`Sanitizer`] for which ones survive pruning.

mod diagnostic;
mod imports;

use std::collections::HashSet;

use tracing::{debug, info, trace, warn};

use crate::config::GeneratorConfig;
use crate::error::SqlmoldError;

pub use diagnostic::Diagnostic;
pub use imports::ImportBinding;

/// Traits brought into scope for their methods rather than their name
const DEFAULT_KEEP_PATHS: &[&str] = &[
    "std::fmt::Write",
    "std::io::BufRead",
    "std::io::Read",
    "std::io::Seek",
    "std::io::Write",
    "std::str::FromStr",
    "sqlx::Row",
];

/// Extension and DSL traits are imported for their methods by convention
/// (`StreamExt`, `AsyncWriteExt`, `RunQueryDsl`)
const METHOD_TRAIT_SUFFIXES: &[&str] = &["Ext", "Dsl"];

/// Sanitizes generated Rust source
///
/// A trait imported only so its methods can be called looks unused, since
/// method calls never name the trait. Such an import is kept when:
///
/// - it is imported as `_` (`use tokio::io::AsyncReadExt as _;`),
/// - its name ends in `Ext` or `Dsl`,
/// - it is one of a few std and sqlx traits (`std::io::Write`,
///   `std::str::FromStr`, `sqlx::Row`, ...),
/// - or it is listed with [`Sanitizer::with_keep_imports`] or
///   `SQLMOLD_KEEP_IMPORTS`.
///
/// Any other method-only trait import is pruned and the generated code
/// won't compile, so templates must use one of the forms above.
#[derive(Debug, Clone, Default)]
pub struct Sanitizer {
    /// Aliases or full paths that are never pruned
    keep_imports: Vec<String>,
}

/// The outcome of sanitizing one file in a batch
#[derive(Debug)]
pub struct SanitizedFile {
    pub name: String,
    pub result: Result<String, SqlmoldError>,
}

impl Sanitizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sanitizer honoring the configured keep list
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new().with_keep_imports(config.keep_imports.iter().cloned())
    }

    /// Never prune imports matching these aliases or paths
    pub fn with_keep_imports<I, S>(mut self, keep: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keep_imports.extend(keep.into_iter().map(Into::into));
        self
    }

    /// Prune unused imports from `source` and reformat it
    ///
    /// A leading block of plain `//` comments, such as a generated-file
    /// disclaimer, is carried over verbatim ahead of the formatted code.
    pub fn sanitize(&self, source: &str) -> Result<String, SqlmoldError> {
        trace!("Parsing generated source");
        let mut file = parse(source)?;

        let bindings = imports::collect_bindings(&file);
        let unused: HashSet<(String, String)> = bindings
            .iter()
            .filter(|binding| !binding.used && !self.is_kept(binding))
            .map(ImportBinding::key)
            .collect();

        let removed = imports::prune(&mut file, &unused);
        debug!(
            bindings = bindings.len(),
            removed = removed,
            "Pruned unused imports"
        );

        trace!("Printing sanitized source");
        let body = prettyplease::unparse(&file);
        let header = leading_comments(source);

        if header.is_empty() {
            Ok(body)
        } else {
            Ok(format!("{}\n\n{}", header.join("\n"), body))
        }
    }

    /// Report every top-level private import in `source` and whether it's used
    pub fn bindings(&self, source: &str) -> Result<Vec<ImportBinding>, SqlmoldError> {
        let file = parse(source)?;
        Ok(imports::collect_bindings(&file))
    }

    /// Sanitize a batch of files
    ///
    /// A failure in one file doesn't stop the others; each result is
    /// reported against its file name.
    pub fn sanitize_files<'a, I>(&self, files: I) -> Vec<SanitizedFile>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let results: Vec<SanitizedFile> = files
            .into_iter()
            .map(|(name, source)| {
                debug!(file = ?name, "Sanitizing file");
                let result = self.sanitize(source);
                if let Err(e) = &result {
                    warn!(file = ?name, error = %e, "Failed to sanitize file");
                }
                SanitizedFile {
                    name: name.to_string(),
                    result,
                }
            })
            .collect();

        let failed = results.iter().filter(|f| f.result.is_err()).count();
        info!(
            files = results.len(),
            failed = failed,
            "Sanitized generated files"
        );

        results
    }

    fn is_kept(&self, binding: &ImportBinding) -> bool {
        if binding.alias == "_" || is_foreign_interop(&binding.path) {
            return true;
        }
        if DEFAULT_KEEP_PATHS.contains(&binding.path.as_str()) || is_method_trait(&binding.path) {
            return true;
        }
        self.keep_imports
            .iter()
            .any(|keep| *keep == binding.alias || *keep == binding.path)
    }
}

/// Sanitize `source` with the default keep list
pub fn sanitize(source: &str) -> Result<String, SqlmoldError> {
    Sanitizer::new().sanitize(source)
}

fn parse(source: &str) -> Result<syn::File, SqlmoldError> {
    syn::parse_file(source).map_err(|e| {
        let diagnostic = Diagnostic::from_syn(source, &e);
        warn!(line = diagnostic.line, error = %e, "Generated source failed to parse");
        SqlmoldError::Parse(diagnostic)
    })
}

fn is_method_trait(path: &str) -> bool {
    let name = path.rsplit("::").next().unwrap_or(path);
    METHOD_TRAIT_SUFFIXES
        .iter()
        .any(|suffix| name.len() > suffix.len() && name.ends_with(suffix))
}

/// Imports of C interop items stay even when they look unused
fn is_foreign_interop(path: &str) -> bool {
    path.split("::").next() == Some("libc") || path.split("::").any(|segment| segment == "ffi")
}

fn leading_comments(source: &str) -> Vec<&str> {
    let mut header: Vec<&str> = Vec::new();

    for line in source.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !header.is_empty() {
                header.push("");
            }
            continue;
        }
        if trimmed.starts_with("//") && !trimmed.starts_with("///") && !trimmed.starts_with("//!")
        {
            header.push(trimmed);
            continue;
        }
        break;
    }

    while header.last() == Some(&"") {
        header.pop();
    }

    header
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatted(source: &str) -> String {
        prettyplease::unparse(&syn::parse_file(source).unwrap())
    }

    #[test]
    fn test_unused_imports_are_removed() {
        let source = r#"
use std::collections::HashMap;
use std::fmt;
use std::io::Write as _;

pub fn describe(map: &HashMap<String, i64>) -> String {
    format!("{} entries", map.len())
}
"#;

        let expected = formatted(
            r#"
use std::collections::HashMap;
use std::io::Write as _;

pub fn describe(map: &HashMap<String, i64>) -> String {
    format!("{} entries", map.len())
}
"#,
        );

        assert_eq!(sanitize(source).unwrap(), expected);
    }

    #[test]
    fn test_group_reduced_to_one_leaf_collapses() {
        let source = r#"
use std::collections::{BTreeMap, HashMap, HashSet};

fn make() -> HashMap<i32, i32> {
    HashMap::new()
}
"#;

        let out = sanitize(source).unwrap();
        assert!(out.contains("use std::collections::HashMap;"));
        assert!(!out.contains("BTreeMap"));
        assert!(!out.contains("HashSet"));
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let source = r#"// Code generated by sqlmold. DO NOT EDIT.
// This file is meant to be re-generated in place and/or deleted at any time.

use std::collections::{HashMap, HashSet};
use std::fmt;
use crate::models::user;

pub struct Users { by_id: HashMap<i64, user::User> }

impl fmt::Debug for Users {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{} users", self.by_id.len()) }
}
"#;

        let once = sanitize(source).unwrap();
        let twice = sanitize(&once).unwrap();
        assert_eq!(once, twice);
        assert!(!once.contains("HashSet"));
    }

    #[test]
    fn test_header_comments_are_preserved() {
        let source = "// Code generated by sqlmold. DO NOT EDIT.\n    // This file is meant to be re-generated in place and/or deleted at any time.\n\nuse std::fmt;\n\nfn main() {}\n";

        let out = sanitize(source).unwrap();
        assert_eq!(
            out,
            "// Code generated by sqlmold. DO NOT EDIT.\n// This file is meant to be re-generated in place and/or deleted at any time.\n\nfn main() {}\n"
        );
    }

    #[test]
    fn test_doc_comments_are_not_header() {
        assert!(leading_comments("//! crate docs\nfn main() {}").is_empty());
        assert!(leading_comments("/// item docs\nfn main() {}").is_empty());
        assert_eq!(
            leading_comments("\n// one\n\n// two\n\nfn main() {}"),
            vec!["// one", "", "// two"]
        );
    }

    #[test]
    fn test_parse_failure_reports_line() {
        let source = "use std::fmt;\n\nfn main() {\n    let x = ;\n}\n";

        let err = sanitize(source).unwrap_err();
        let diagnostic = err.diagnostic().unwrap();

        assert_eq!(diagnostic.line, 4);
        assert!(diagnostic.context.contains(">>>>     let x = ;"));
        assert!(diagnostic.context.contains("   3 fn main() {"));
    }

    #[test]
    fn test_batch_isolates_failures() {
        let bad = "fn broken( {}\n";
        let good = "use std::fmt;\nuse std::sync::Arc;\n\npub type Shared = Arc<str>;\n";

        let results = Sanitizer::new().sanitize_files([("bad.rs", bad), ("good.rs", good)]);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "bad.rs");
        assert!(results[0].result.is_err());

        let cleaned = results[1].result.as_ref().unwrap();
        assert!(cleaned.contains("use std::sync::Arc;"));
        assert!(!cleaned.contains("std::fmt"));
    }

    #[test]
    fn test_always_kept_imports() {
        let source = r#"
use super::*;
use serde::Deserialize as _;
use std::ffi::CStr;
use libc::c_int;
use std::io::Write;
pub use crate::models::User;

fn main() {}
"#;

        let out = sanitize(source).unwrap();
        assert!(out.contains("use super::*;"));
        assert!(out.contains("use serde::Deserialize as _;"));
        assert!(out.contains("use std::ffi::CStr;"));
        assert!(out.contains("use libc::c_int;"));
        assert!(out.contains("use std::io::Write;"));
        assert!(out.contains("pub use crate::models::User;"));
    }

    #[test]
    fn test_configured_keep_list() {
        let source = "use sqlx::Executor;\nuse sqlx::Acquire;\n\nfn main() {}\n";

        let sanitizer = Sanitizer::new().with_keep_imports(["Executor", "sqlx::Acquire"]);
        let out = sanitizer.sanitize(source).unwrap();
        assert!(out.contains("use sqlx::Executor;"));
        assert!(out.contains("use sqlx::Acquire;"));

        let out = sanitize(source).unwrap();
        assert!(!out.contains("Executor"));
        assert!(!out.contains("Acquire"));
    }

    #[test]
    fn test_from_config_uses_keep_imports() {
        let config = GeneratorConfig {
            keep_imports: vec!["Executor".to_string()],
            ..GeneratorConfig::default()
        };

        let out = Sanitizer::from_config(&config)
            .sanitize("use sqlx::Executor;\n")
            .unwrap();
        assert!(out.contains("use sqlx::Executor;"));
    }

    #[test]
    fn test_shadowed_import_is_removed() {
        let source = r#"
use std::cmp::max;

fn largest(values: &[i64]) -> i64 {
    let max = values.len() as i64;
    max
}
"#;

        assert!(!sanitize(source).unwrap().contains("use std::cmp::max"));
    }

    #[test]
    fn test_pattern_scopes_keep_used_import() {
        let source = r#"
use std::cmp::max;

pub fn first(v: Option<i64>) -> i64 {
    if let Some(max) = v {
        return max;
    }
    max(1, 2)
}

pub fn sum(v: Vec<i64>) -> i64 {
    let mut t = 0;
    for max in v {
        t += max;
    }
    max(t, 2)
}
"#;

        assert!(sanitize(source).unwrap().contains("use std::cmp::max;"));
    }

    #[test]
    fn test_nested_module_item_keeps_used_import() {
        let source = r#"
use crate::models::User;

pub fn load() -> User {
    todo!()
}

#[cfg(test)]
mod tests {
    struct User;
}
"#;

        assert!(sanitize(source).unwrap().contains("use crate::models::User;"));
    }

    #[test]
    fn test_format_capture_keeps_import() {
        let source = r#"
use crate::consts::LIMIT;

pub fn f() -> String {
    format!("limit {LIMIT}")
}
"#;

        assert!(sanitize(source).unwrap().contains("use crate::consts::LIMIT;"));
    }

    #[test]
    fn test_parse_failure_at_end_of_input() {
        let source = "use std::fmt;\n\npub fn f() {}\npub struct S\n";

        let err = sanitize(source).unwrap_err();
        let diagnostic = err.diagnostic().unwrap();
        assert_eq!(diagnostic.line, 4);
        assert!(diagnostic.context.contains(">>>> pub struct S"));
    }

    #[test]
    fn test_extension_traits_are_kept() {
        let source = r#"
use diesel::RunQueryDsl;
use tokio::io::AsyncWriteExt;
use crate::util::Ext;
use std::collections::HashMap;

fn main() {}
"#;

        let out = sanitize(source).unwrap();
        assert!(out.contains("use diesel::RunQueryDsl;"));
        assert!(out.contains("use tokio::io::AsyncWriteExt;"));
        assert!(!out.contains("crate::util::Ext"));
        assert!(!out.contains("HashMap"));
    }

    #[test]
    fn test_bindings_report() {
        let bindings = Sanitizer::new()
            .bindings("use std::fmt;\nuse std::sync::Arc;\nstatic X: Option<Arc<str>> = None;\n")
            .unwrap();

        let report: Vec<(&str, bool)> = bindings
            .iter()
            .map(|b| (b.alias.as_str(), b.used))
            .collect();
        assert_eq!(report, vec![("fmt", false), ("Arc", true)]);
    }

    #[test]
    fn test_foreign_interop_paths() {
        assert!(is_foreign_interop("libc::c_int"));
        assert!(is_foreign_interop("std::ffi::CString"));
        assert!(is_foreign_interop("core::ffi"));
        assert!(!is_foreign_interop("std::fmt"));
        assert!(!is_foreign_interop("my_libc::thing"));
    }
}
