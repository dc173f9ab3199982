//! Dialect-aware identifier quoting

/// Quote each dot-separated segment of a simple SQL identifier
///
/// `users.id` becomes `"users"."id"` for `"`-quoting dialects. `null`, `?`,
/// `*` segments and segments already carrying the quote characters are left
/// alone. Anything that doesn't look like a plain identifier (expressions,
/// function calls, literals) is returned unchanged.
pub fn quote_identifier(lq: char, rq: char, token: &str) -> String {
    if token.eq_ignore_ascii_case("null") || token == "?" {
        return token.to_string();
    }

    if !looks_like_identifier(token) {
        return token.to_string();
    }

    let mut buf = String::with_capacity(token.len() + 4);
    for (i, segment) in token.split('.').enumerate() {
        if i != 0 {
            buf.push('.');
        }

        if segment == "*" || segment.starts_with(lq) || segment.ends_with(rq) {
            buf.push_str(segment);
            continue;
        }

        buf.push(lq);
        buf.push_str(segment);
        buf.push(rq);
    }

    buf
}

/// Apply [`quote_identifier`] to every token
pub fn quote_identifiers(lq: char, rq: char, tokens: &[String]) -> Vec<String> {
    tokens
        .iter()
        .map(|token| quote_identifier(lq, rq, token))
        .collect()
}

/// A quoted table name, schema-qualified when a schema is given
///
/// `("public", "users")` becomes `"public"."users"`.
pub fn schema_table(lq: char, rq: char, schema: Option<&str>, table: &str) -> String {
    match schema {
        Some(schema) if !schema.is_empty() => format!("{lq}{schema}{rq}.{lq}{table}{rq}"),
        _ => format!("{lq}{table}{rq}"),
    }
}

/// The quote character escaped for use inside a double-quoted Rust string literal
pub fn quote_character(q: char) -> String {
    if q == '"' {
        return "\\\"".to_string();
    }

    q.to_string()
}

/// Equivalent to matching the token against
/// `^"?[a-z_][_a-z0-9]*"?(\."?[_a-z][_a-z0-9]*"?)*(\.\*)?$` case-insensitively
fn looks_like_identifier(token: &str) -> bool {
    let body = token.strip_suffix(".*").unwrap_or(token);

    !body.is_empty() && body.split('.').all(is_identifier_segment)
}

fn is_identifier_segment(segment: &str) -> bool {
    let inner = segment.strip_prefix('"').unwrap_or(segment);
    let inner = inner.strip_suffix('"').unwrap_or(inner);

    let mut bytes = inner.bytes();
    match bytes.next() {
        Some(first) if first.is_ascii_alphabetic() || first == b'_' => {}
        _ => return false,
    }

    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier() {
        let cases = [
            ("thing", "\"thing\""),
            ("null", "null"),
            ("NULL", "NULL"),
            ("?", "?"),
            ("thing.thing", "\"thing\".\"thing\""),
            ("thing.*", "\"thing\".*"),
            ("\"thing\".thing", "\"thing\".\"thing\""),
            ("thing.\"thing\"", "\"thing\".\"thing\""),
            ("public.users.id", "\"public\".\"users\".\"id\""),
            ("count(*)", "count(*)"),
            ("users.id = 5", "users.id = 5"),
            ("*", "*"),
            ("1abc", "1abc"),
            ("", ""),
            ("a..b", "a..b"),
        ];

        for (input, expected) in cases {
            assert_eq!(quote_identifier('"', '"', input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_quote_identifier_other_dialects() {
        assert_eq!(quote_identifier('`', '`', "users.id"), "`users`.`id`");
        assert_eq!(quote_identifier('[', ']', "dbo.users"), "[dbo].[users]");
        // Already-quoted tokens fail the identifier shape check and pass through
        assert_eq!(quote_identifier('`', '`', "`users`"), "`users`");
    }

    #[test]
    fn test_quote_identifiers() {
        let tokens = vec!["a".to_string(), "b.c".to_string(), "?".to_string()];
        assert_eq!(
            quote_identifiers('"', '"', &tokens),
            vec!["\"a\"", "\"b\".\"c\"", "?"]
        );
        assert!(quote_identifiers('"', '"', &[]).is_empty());
    }

    #[test]
    fn test_schema_table() {
        assert_eq!(schema_table('"', '"', None, "users"), "\"users\"");
        assert_eq!(schema_table('"', '"', Some(""), "users"), "\"users\"");
        assert_eq!(
            schema_table('[', ']', Some("dbo"), "users"),
            "[dbo].[users]"
        );
    }

    #[test]
    fn test_quote_character() {
        assert_eq!(quote_character('"'), "\\\"");
        assert_eq!(quote_character('`'), "`");
    }
}
