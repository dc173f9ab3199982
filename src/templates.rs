//! Template environment helpers
//!
//! Exposes the naming transforms and clause builders to minijinja
//! templates. Every function is bound to one [`Dialect`] so templates never
//! pass quote characters or placeholder styles around themselves.

use std::sync::Arc;

use minijinja::{Environment, Error, ErrorKind, Value};
use tracing::debug;

use crate::config::Dialect;
use crate::error::SqlmoldError;
use crate::naming::{
    camel_case, pluralize, quote_identifier, replace_reserved_word, schema_table, singularize,
    title_case, title_case_identifier, NameCache,
};
use crate::sanitize::Sanitizer;
use crate::sql;

/// Install naming filters and SQL helper functions into `env`
///
/// Filters: `titlecase`, `camelcase`, `titlecase_ident`, `plural`,
/// `singular`, `replace_reserved`, `quote`.
///
/// Functions: `placeholders`, `set_param_names`, `where_clause`,
/// `where_clause_repeated`, `join_on_clause`, `join_where_clause`,
/// `where_in_clause`, `set_complement`, `set_merge`, `set_include`,
/// `schema_table`. Start indexes are given 1-based and become anonymous
/// `?` placeholders when the dialect isn't indexed.
pub fn register_functions(env: &mut Environment<'_>, cache: Arc<NameCache>, dialect: Dialect) {
    let Dialect {
        left_quote: lq,
        right_quote: rq,
        ..
    } = dialect;

    let titles = Arc::clone(&cache);
    env.add_filter("titlecase", move |value: String| title_case(&titles, &value));
    let camels = Arc::clone(&cache);
    env.add_filter("camelcase", move |value: String| camel_case(&camels, &value));
    let idents = cache;
    env.add_filter("titlecase_ident", move |value: String| {
        title_case_identifier(&idents, &value)
    });
    env.add_filter("plural", |value: String| pluralize(&value));
    env.add_filter("singular", |value: String| singularize(&value));
    env.add_filter("replace_reserved", |value: String| replace_reserved_word(&value));
    env.add_filter("quote", move |value: String| quote_identifier(lq, rq, &value));

    env.add_function(
        "placeholders",
        move |count: usize, start: usize, group: Option<usize>| {
            let start = dialect.placeholder_start(start);
            if dialect.indexed_placeholders && start == 0 {
                return Err(Error::new(
                    ErrorKind::InvalidOperation,
                    "placeholders start at 1 for indexed placeholders",
                ));
            }
            Ok(sql::placeholders(
                dialect.indexed_placeholders,
                count,
                start,
                group.unwrap_or(0),
            ))
        },
    );
    env.add_function("set_param_names", move |start: usize, fields: Vec<String>| {
        sql::set_param_names(lq, rq, dialect.placeholder_start(start), &fields)
    });
    env.add_function("where_clause", move |start: usize, cols: Vec<String>| {
        sql::where_clause(lq, rq, dialect.placeholder_start(start), &cols)
    });
    env.add_function(
        "where_clause_repeated",
        move |start: usize, cols: Vec<String>, count: usize| {
            sql::where_clause_repeated(lq, rq, dialect.placeholder_start(start), &cols, count)
        },
    );
    env.add_function(
        "join_on_clause",
        move |table1: String, cols1: Vec<String>, table2: String, cols2: Vec<String>| {
            if cols1.len() != cols2.len() {
                return Err(Error::new(
                    ErrorKind::InvalidOperation,
                    format!(
                        "join_on_clause column lists differ in length ({} and {})",
                        cols1.len(),
                        cols2.len()
                    ),
                ));
            }
            Ok(sql::join_on_clause(lq, rq, &table1, &cols1, &table2, &cols2))
        },
    );
    env.add_function(
        "join_where_clause",
        move |start: usize, table: String, cols: Vec<String>| {
            sql::join_where_clause(lq, rq, dialect.placeholder_start(start), &table, &cols)
        },
    );
    env.add_function("where_in_clause", move |table: String, cols: Vec<String>| {
        sql::where_in_clause(lq, rq, &table, &cols)
    });
    env.add_function("set_complement", |a: Vec<String>, b: Vec<String>| {
        sql::set_complement(&a, &b)
    });
    env.add_function("set_merge", |a: Vec<String>, b: Vec<String>| {
        sql::set_merge(&a, &b)
    });
    env.add_function("set_include", |x: String, set: Vec<String>| {
        sql::set_include(&x, &set)
    });
    env.add_function(
        "schema_table",
        move |schema: Option<String>, table: String| {
            schema_table(lq, rq, schema.as_deref(), &table)
        },
    );
}

/// Render the template `name` and sanitize the result
pub fn render_source(
    env: &Environment<'_>,
    sanitizer: &Sanitizer,
    name: &str,
    ctx: Value,
) -> Result<String, SqlmoldError> {
    let template = env.get_template(name)?;
    let raw = template.render(ctx)?;
    debug!(template = ?name, bytes = raw.len(), "Rendered template");

    sanitizer.sanitize(&raw)
}
