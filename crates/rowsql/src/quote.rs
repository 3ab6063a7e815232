//! Identifier and literal quoting.
//!
//! Identifiers are always backtick-quoted by [`quote_identifier`]. Literal
//! quoting is dialect dependent and therefore injected as a [`Quoter`]; a
//! MySQL-flavoured default is provided by [`quote_literal`].

use crate::value::{DATETIME_FORMAT, Value};
use std::sync::Arc;

/// Injected value-quoting strategy: turns one scalar into literal SQL text.
pub type Quoter = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Wrap a closure as a [`Quoter`].
pub fn quoter<F>(f: F) -> Quoter
where
    F: Fn(&Value) -> String + Send + Sync + 'static,
{
    Arc::new(f)
}

/// The default quoter, backed by [`quote_literal`].
pub fn default_quoter() -> Quoter {
    quoter(quote_literal)
}

/// MySQL-style literal quoting.
///
/// Numbers are emitted raw, booleans as `1`/`0`, strings single-quoted with
/// backslash escapes, date-times as quoted `YYYY-MM-DD HH:MM:SS`.
pub fn quote_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        Value::Int(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
        Value::String(s) => quote_string(s),
        Value::DateTime(dt) => format!("'{}'", dt.format(DATETIME_FORMAT)),
        Value::List(items) => {
            let mut out = String::from("(");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&quote_literal(item));
            }
            out.push(')');
            out
        }
    }
}

fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        match ch {
            '\'' | '"' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            '\0' => out.push_str("\\0"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

/// `true` when `expr` is emitted verbatim instead of being backtick-quoted.
pub(crate) fn is_raw(expr: &str) -> bool {
    expr == "*" || expr.starts_with('(')
}

/// Split `"<expr> as <alias>"` on the first case-insensitive ` as `.
fn split_alias(expr: &str) -> Option<(&str, &str)> {
    let bytes = expr.as_bytes();
    if bytes.len() < 4 {
        return None;
    }
    (0..=bytes.len() - 4).find_map(|i| {
        let window = &bytes[i..i + 4];
        (window[0] == b' ' && window[1].eq_ignore_ascii_case(&b'a')
            && window[2].eq_ignore_ascii_case(&b's') && window[3] == b' ')
            .then(|| (&expr[..i], &expr[i + 4..]))
    })
}

fn push_quoted(out: &mut String, expr: &str) {
    if is_raw(expr) {
        out.push_str(expr);
    } else {
        out.push('`');
        out.push_str(expr);
        out.push('`');
    }
}

/// Quote a field or expression as an identifier.
///
/// - `*` and anything starting with `(` pass through unchanged
/// - `expr as alias` renders as ``<expr> AS `alias` ``
/// - everything else is wrapped in backticks
pub fn quote_identifier(expr: &str) -> String {
    let mut out = String::with_capacity(expr.len() + 2);
    write_identifier(&mut out, expr, None);
    out
}

/// Write a field, prefixing non-raw expressions with `alias.` when given.
pub(crate) fn write_identifier(out: &mut String, expr: &str, alias: Option<&str>) {
    let (left, as_alias) = match split_alias(expr) {
        Some((left, right)) => (left, Some(right)),
        None => (expr, None),
    };

    if let Some(prefix) = alias {
        if !expr.starts_with('(') {
            out.push_str(prefix);
            out.push('.');
        }
    }
    push_quoted(out, left);

    if let Some(name) = as_alias {
        out.push_str(" AS `");
        out.push_str(name);
        out.push('`');
    }
}

/// Expand a field list for one table reference, comma-joined.
pub(crate) fn expand_fields<'a>(
    out: &mut String,
    fields: impl IntoIterator<Item = &'a String>,
    alias: Option<&str>,
) {
    for field in fields {
        if !out.is_empty() {
            out.push(',');
        }
        write_identifier(out, field, alias);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_plain() {
        assert_eq!(quote_identifier("name"), "`name`");
        assert_eq!(quote_identifier("a.name"), "`a.name`");
    }

    #[test]
    fn identifier_passthrough() {
        assert_eq!(quote_identifier("*"), "*");
        assert_eq!(quote_identifier("(RAND())"), "(RAND())");
    }

    #[test]
    fn identifier_alias() {
        assert_eq!(quote_identifier("foo as bar"), "`foo` AS `bar`");
        assert_eq!(quote_identifier("foo AS bar"), "`foo` AS `bar`");
        assert_eq!(quote_identifier("(MIN(foo)) As bar"), "(MIN(foo)) AS `bar`");
        // Only the first separator splits.
        assert_eq!(quote_identifier("a as b as c"), "`a` AS `b as c`");
    }

    #[test]
    fn identifier_with_table_alias() {
        let mut out = String::new();
        write_identifier(&mut out, "*", Some("a"));
        assert_eq!(out, "a.*");

        let mut out = String::new();
        write_identifier(&mut out, "name as agency", Some("c"));
        assert_eq!(out, "c.`name` AS `agency`");

        let mut out = String::new();
        write_identifier(&mut out, "(COUNT(*)) as n", Some("c"));
        assert_eq!(out, "(COUNT(*)) AS `n`");
    }

    #[test]
    fn literal_quoting() {
        assert_eq!(quote_literal(&Value::Int(1234)), "1234");
        assert_eq!(quote_literal(&Value::Float(1.234)), "1.234");
        assert_eq!(quote_literal(&Value::from("b")), "'b'");
        assert_eq!(quote_literal(&Value::from("it's")), "'it\\'s'");
        assert_eq!(quote_literal(&Value::Bool(true)), "1");
        assert_eq!(quote_literal(&Value::Null), "NULL");
    }
}
