//! SQL fragment builders
//!
//! Every builder takes the dialect explicitly: the quote characters and a
//! placeholder start index, where a start of 0 selects anonymous `?`
//! placeholders. Callers building one statement from several fragments
//! must thread the running start index through all of them.

use crate::naming::quote_identifier;

/// Placeholders for `count` values, optionally grouped into tuples
///
/// `placeholders(true, 6, 1, 3)` gives `($1,$2,$3),($4,$5,$6)`. A `group`
/// of 0 or 1 means no grouping.
///
/// # Panics
///
/// Panics if indexed placeholders are requested with `start == 0`; that
/// would render `$0` and produce invalid SQL.
pub fn placeholders(indexed: bool, count: usize, start: usize, group: usize) -> String {
    assert!(
        !indexed || start >= 1,
        "invalid placeholder start {} supplied for indexed placeholders",
        start
    );

    let grouped = group > 1;
    let mut buf = String::with_capacity(count * 4);

    if grouped {
        buf.push('(');
    }
    for i in 0..count {
        if i != 0 {
            if grouped && i % group == 0 {
                buf.push_str("),(");
            } else {
                buf.push(',');
            }
        }

        if indexed {
            buf.push('$');
            buf.push_str(&(start + i).to_string());
        } else {
            buf.push('?');
        }
    }
    if grouped {
        buf.push(')');
    }

    buf
}

fn qualified(lq: char, rq: char, table: &str, column: &str) -> String {
    format!("{}.{}", quote_identifier(lq, rq, table), quote_identifier(lq, rq, column))
}

fn param(start: usize, offset: usize) -> String {
    if start == 0 {
        "?".to_string()
    } else {
        format!("${}", start + offset)
    }
}

/// Parameter assignments for a SET clause: `"a"=$1,"b"=$2`
pub fn set_param_names(lq: char, rq: char, start: usize, fields: &[String]) -> String {
    fields
        .iter()
        .enumerate()
        .map(|(i, field)| format!("{}={}", quote_identifier(lq, rq, field), param(start, i)))
        .collect::<Vec<_>>()
        .join(",")
}

/// Equality conditions joined by AND: `"a"=$2 AND "b"=$3`
pub fn where_clause(lq: char, rq: char, start: usize, cols: &[String]) -> String {
    cols.iter()
        .enumerate()
        .map(|(i, col)| format!("{}={}", quote_identifier(lq, rq, col), param(start, i)))
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// `count` where clauses over `cols` joined by OR
///
/// `("a"=$1 AND "b"=$2) OR ("a"=$3 AND "b"=$4)` style matching for
/// batched operations; numbering advances by `cols.len()` per group.
pub fn where_clause_repeated(
    lq: char,
    rq: char,
    start: usize,
    cols: &[String],
    count: usize,
) -> String {
    let groups: Vec<String> = (0..count)
        .map(|i| {
            let group_start = if start == 0 { 0 } else { start + i * cols.len() };
            where_clause(lq, rq, group_start, cols)
        })
        .collect();

    format!("({})", groups.join(") OR ("))
}

/// Join conditions between two tables: `"t1"."a"="t2"."b" AND ...`
///
/// # Panics
///
/// Panics if the column lists differ in length.
pub fn join_on_clause(
    lq: char,
    rq: char,
    table1: &str,
    cols1: &[String],
    table2: &str,
    cols2: &[String],
) -> String {
    assert_eq!(
        cols1.len(),
        cols2.len(),
        "join_on_clause: column lists must have the same length"
    );

    cols1
        .iter()
        .zip(cols2)
        .map(|(c1, c2)| {
            format!(
                "{}={}",
                qualified(lq, rq, table1, c1),
                qualified(lq, rq, table2, c2)
            )
        })
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// Where clause with table-qualified columns: `"t"."a"=$1 AND "t"."b"=$2`
pub fn join_where_clause(lq: char, rq: char, start: usize, table: &str, cols: &[String]) -> String {
    cols.iter()
        .enumerate()
        .map(|(i, col)| format!("{}={}", qualified(lq, rq, table, col), param(start, i)))
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// Left-hand side of an IN match
///
/// A single column renders bare (`"t"."a"`); several columns render as a
/// tuple (`("t"."a","t"."b")`) for multi-column IN matching.
pub fn where_in_clause(lq: char, rq: char, table: &str, cols: &[String]) -> String {
    let joined = cols
        .iter()
        .map(|col| qualified(lq, rq, table, col))
        .collect::<Vec<_>>()
        .join(",");

    if cols.len() == 1 {
        joined
    } else {
        format!("({})", joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(true, 3, 1, 0), "$1,$2,$3");
        assert_eq!(placeholders(false, 3, 0, 0), "?,?,?");
        assert_eq!(placeholders(true, 6, 1, 3), "($1,$2,$3),($4,$5,$6)");
        assert_eq!(placeholders(true, 3, 4, 1), "$4,$5,$6");
        assert_eq!(placeholders(false, 4, 1, 2), "(?,?),(?,?)");
        assert_eq!(placeholders(true, 0, 1, 1), "");
    }

    #[test]
    #[should_panic(expected = "invalid placeholder start")]
    fn test_placeholders_zero_start_panics() {
        placeholders(true, 3, 0, 1);
    }

    #[test]
    fn test_set_param_names() {
        let fields = strs(&["one", "two", "three"]);
        assert_eq!(
            set_param_names('"', '"', 1, &fields),
            "\"one\"=$1,\"two\"=$2,\"three\"=$3"
        );
        assert_eq!(
            set_param_names('`', '`', 0, &fields),
            "`one`=?,`two`=?,`three`=?"
        );
        assert_eq!(set_param_names('"', '"', 1, &[]), "");
    }

    #[test]
    fn test_where_clause() {
        let cols = strs(&["a", "b"]);
        assert_eq!(where_clause('"', '"', 2, &cols), "\"a\"=$2 AND \"b\"=$3");
        assert_eq!(where_clause('`', '`', 0, &cols), "`a`=? AND `b`=?");
        assert_eq!(where_clause('"', '"', 1, &strs(&["id"])), "\"id\"=$1");
        assert_eq!(where_clause('"', '"', 1, &[]), "");
    }

    #[test]
    fn test_where_clause_repeated() {
        let cols = strs(&["a", "b"]);
        assert_eq!(
            where_clause_repeated('"', '"', 2, &cols, 2),
            "(\"a\"=$2 AND \"b\"=$3) OR (\"a\"=$4 AND \"b\"=$5)"
        );
        assert_eq!(
            where_clause_repeated('`', '`', 0, &cols, 2),
            "(`a`=? AND `b`=?) OR (`a`=? AND `b`=?)"
        );
        assert_eq!(
            where_clause_repeated('"', '"', 1, &strs(&["id"]), 1),
            "(\"id\"=$1)"
        );
    }

    #[test]
    fn test_join_on_clause() {
        assert_eq!(
            join_on_clause(
                '"',
                '"',
                "videos",
                &strs(&["id", "owner_id"]),
                "tags",
                &strs(&["video_id", "user_id"]),
            ),
            "\"videos\".\"id\"=\"tags\".\"video_id\" AND \"videos\".\"owner_id\"=\"tags\".\"user_id\""
        );
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn test_join_on_clause_length_mismatch() {
        join_on_clause('"', '"', "a", &strs(&["id"]), "b", &[]);
    }

    #[test]
    fn test_join_where_clause() {
        let cols = strs(&["id", "name"]);
        assert_eq!(
            join_where_clause('"', '"', 3, "users", &cols),
            "\"users\".\"id\"=$3 AND \"users\".\"name\"=$4"
        );
        assert_eq!(
            join_where_clause('[', ']', 0, "users", &cols),
            "[users].[id]=? AND [users].[name]=?"
        );
    }

    #[test]
    fn test_where_in_clause() {
        assert_eq!(
            where_in_clause('"', '"', "users", &strs(&["id"])),
            "\"users\".\"id\""
        );
        assert_eq!(
            where_in_clause('"', '"', "users", &strs(&["id", "org_id"])),
            "(\"users\".\"id\",\"users\".\"org_id\")"
        );
    }

    #[test]
    fn test_expressions_pass_through_quoting() {
        let cols = strs(&["lower(email)"]);
        assert_eq!(where_clause('"', '"', 1, &cols), "lower(email)=$1");
    }
}
