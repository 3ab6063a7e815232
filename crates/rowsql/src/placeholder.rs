//! Positional `?` marker expansion for condition templates.
//!
//! A marker is a `?` that directly follows a non-word character (anything
//! except `[A-Za-z0-9_]`). Each value consumes the next marker, left to
//! right:
//!
//! - [`Value::List`] becomes `(q1,q2,...)`, each element quoted
//! - [`Value::Null`] becomes `NULL`
//! - everything else is passed through the [`Quoter`]
//!
//! Unmatched markers stay in the output as a literal `?`, surplus values are
//! dropped. Neither case is an error.

use crate::quote::Quoter;
use crate::value::Value;

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

fn push_value(out: &mut String, value: &Value, quoter: &Quoter) {
    match value {
        Value::Null => out.push_str("NULL"),
        Value::List(items) => {
            out.push('(');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                match item {
                    Value::Null => out.push_str("NULL"),
                    other => out.push_str(&quoter(other)),
                }
            }
            out.push(')');
        }
        other => out.push_str(&quoter(other)),
    }
}

/// Substitute quoted `values` into the markers of `template`.
///
/// Substituted text is never rescanned, so a quoted value containing `?`
/// cannot capture a later value.
pub fn expand_placeholders(template: &str, values: &[Value], quoter: &Quoter) -> String {
    let mut out = String::with_capacity(template.len() + values.len() * 8);
    let mut pending = values.iter();
    let mut next = pending.next();
    let mut prev: Option<char> = None;
    let mut markers = 0usize;

    for ch in template.chars() {
        let is_marker = ch == '?' && prev.is_some_and(|p| !is_word_char(p));
        if is_marker {
            markers += 1;
            if let Some(value) = next {
                push_value(&mut out, value, quoter);
                next = pending.next();
                prev = Some(ch);
                continue;
            }
        }
        out.push(ch);
        prev = Some(ch);
    }

    if markers != values.len() {
        tracing::trace!(
            target: "rowsql.placeholder",
            template,
            markers,
            values = values.len(),
            "placeholder count does not match bound values"
        );
    }

    out
}
