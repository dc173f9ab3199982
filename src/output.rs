//! Generated file preamble writers

use std::collections::BTreeMap;

/// Header written at the top of every generated file
pub const GENERATED_DISCLAIMER: &str = "// Code generated by sqlmold. DO NOT EDIT.\n\
// This file is meant to be re-generated in place and/or deleted at any time.\n\n";

/// Append the generated-code disclaimer to `buf`
pub fn write_file_disclaimer(buf: &mut String) {
    buf.push_str(GENERATED_DISCLAIMER);
}

/// Append a `use` block to `buf`, one declaration per path, sorted by path
///
/// Paths mapped to an alias are written as `use path as alias;`.
/// Nothing is written for an empty map. Unused entries are left for the
/// sanitizer to prune.
pub fn write_imports(buf: &mut String, imports: &BTreeMap<String, Option<String>>) {
    if imports.is_empty() {
        return;
    }

    for (path, alias) in imports {
        match alias {
            Some(alias) => buf.push_str(&format!("use {} as {};\n", path, alias)),
            None => buf.push_str(&format!("use {};\n", path)),
        }
    }
    buf.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::sanitize;

    #[test]
    fn test_write_file_disclaimer() {
        let mut buf = String::new();
        write_file_disclaimer(&mut buf);
        assert!(buf.starts_with("// Code generated by sqlmold. DO NOT EDIT.\n"));
        assert!(buf.ends_with("time.\n\n"));
    }

    #[test]
    fn test_write_imports() {
        let mut imports = BTreeMap::new();
        imports.insert("std::fmt".to_string(), None);
        imports.insert("chrono::DateTime".to_string(), None);
        imports.insert("serde::Serialize".to_string(), Some("_".to_string()));

        let mut buf = String::new();
        write_imports(&mut buf, &imports);

        assert_eq!(
            buf,
            "use chrono::DateTime;\nuse serde::Serialize as _;\nuse std::fmt;\n\n"
        );
    }

    #[test]
    fn test_write_imports_empty() {
        let mut buf = String::new();
        write_imports(&mut buf, &BTreeMap::new());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_generated_file_survives_sanitize() {
        let mut imports = BTreeMap::new();
        imports.insert("std::collections::HashMap".to_string(), None);
        imports.insert("std::fmt".to_string(), None);

        let mut buf = String::new();
        write_file_disclaimer(&mut buf);
        write_imports(&mut buf, &imports);
        buf.push_str("pub type Lookup = HashMap<String, i64>;\n");

        let out = sanitize(&buf).unwrap();
        assert!(out.starts_with(GENERATED_DISCLAIMER));
        assert!(out.contains("use std::collections::HashMap;"));
        assert!(!out.contains("use std::fmt;"));
    }
}
