//! CRUD statement assembly.
//!
//! Every function here is pure: it turns a row plus resolved key fields into
//! a [`Statement`] (SQL text with `?` placeholders and ordered parameters).
//! Running the statement is the [`Connector`](crate::Connector)'s job.

use crate::error::{OrmError, OrmResult};
use crate::flatten::build_value_set;
use crate::row::RowSource;
use crate::value::Value;
use std::fmt::Write;

/// SQL text plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// Outcome of the insert-or-update decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveAction {
    /// The row is new.
    Insert,
    /// The row is persisted; update it by these key fields.
    Update(Vec<String>),
}

fn push_assignments<'a>(sql: &mut String, columns: impl IntoIterator<Item = &'a str>, sep: &str) {
    for (i, column) in columns.into_iter().enumerate() {
        if i > 0 {
            sql.push_str(sep);
        }
        let _ = write!(sql, "`{column}` = ?");
    }
}

/// `INSERT INTO `table` (`c1`,`c2`) VALUES (?,?)`
pub fn insert_statement(table: &str, row: &(impl RowSource + ?Sized)) -> Statement {
    let values = build_value_set(row);

    let columns: Vec<String> = values.keys().map(|c| format!("`{c}`")).collect();
    let placeholders = vec!["?"; columns.len()].join(",");
    let sql = format!(
        "INSERT INTO `{table}` ({}) VALUES ({placeholders})",
        columns.join(",")
    );

    Statement::new(sql, values.into_values().collect())
}

/// `UPDATE `table` SET `a` = ?,`b` = ? WHERE `k1` = ? AND `k2` = ?`
///
/// Value-set entries whose column is a key field go to WHERE, everything else
/// to SET, each keeping its relative order. Parameters are SET values
/// followed by WHERE values.
///
/// Fails with [`OrmError::NoKey`] when no key field is present in the row,
/// and with [`OrmError::Validation`] when the row holds nothing but keys.
pub fn update_statement<S: AsRef<str>>(
    table: &str,
    row: &(impl RowSource + ?Sized),
    keys: &[S],
) -> OrmResult<Statement> {
    let values = build_value_set(row);

    let mut set_columns = Vec::new();
    let mut set_values = Vec::new();
    let mut where_columns = Vec::new();
    let mut where_values = Vec::new();
    for (column, value) in &values {
        if keys.iter().any(|k| k.as_ref() == column) {
            where_columns.push(column.as_str());
            where_values.push(value.clone());
        } else {
            set_columns.push(column.as_str());
            set_values.push(value.clone());
        }
    }

    if where_columns.is_empty() {
        return Err(OrmError::no_key(table));
    }
    if set_columns.is_empty() {
        return Err(OrmError::validation(format!(
            "UPDATE on '{table}' has no columns to SET"
        )));
    }

    let mut sql = format!("UPDATE `{table}` SET ");
    push_assignments(&mut sql, set_columns, ",");
    sql.push_str(" WHERE ");
    push_assignments(&mut sql, where_columns, " AND ");

    set_values.extend(where_values);
    Ok(Statement::new(sql, set_values))
}

/// `DELETE FROM `table` WHERE `k1` = ? AND `k2` = ?`
///
/// Key values are read straight off the row; a missing key binds `NULL`.
pub fn delete_statement<S: AsRef<str>>(
    table: &str,
    row: &(impl RowSource + ?Sized),
    keys: &[S],
) -> OrmResult<Statement> {
    if keys.is_empty() {
        return Err(OrmError::no_key(table));
    }

    let mut sql = format!("DELETE FROM `{table}` WHERE ");
    push_assignments(&mut sql, keys.iter().map(AsRef::as_ref), " AND ");
    let params = keys
        .iter()
        .map(|k| row.get(k.as_ref()).unwrap_or(Value::Null))
        .collect();

    Ok(Statement::new(sql, params))
}

/// Pick the single key field of a by-id operation.
pub fn single_key(table: &str, keys: Vec<String>) -> OrmResult<String> {
    match keys.len() {
        0 => Err(OrmError::no_key(table)),
        1 => Ok(keys.into_iter().next().unwrap_or_default()),
        count => Err(OrmError::SplitKey {
            table: table.to_string(),
            count,
        }),
    }
}

/// `DELETE FROM `table` WHERE `key` = ?`
pub fn delete_by_id_statement(table: &str, key: &str, id: impl Into<Value>) -> Statement {
    Statement::new(
        format!("DELETE FROM `{table}` WHERE `{key}` = ?"),
        vec![id.into()],
    )
}

/// `SELECT * FROM `table` WHERE `key` = ?`
pub fn find_by_id_statement(table: &str, key: &str, id: impl Into<Value>) -> Statement {
    Statement::new(
        format!("SELECT * FROM `{table}` WHERE `{key}` = ?"),
        vec![id.into()],
    )
}

/// Decide between INSERT and UPDATE.
///
/// A row is new when there is no key field at all, or when any key field is
/// absent, `NULL` or zero. A legitimate key value of `0` is therefore treated
/// as unset.
pub fn save_action(row: &(impl RowSource + ?Sized), keys: Vec<String>) -> SaveAction {
    let is_new = keys.is_empty()
        || keys.iter().any(|key| match row.get(key) {
            None => true,
            Some(value) => value.is_null() || value.is_zero(),
        });

    if is_new {
        SaveAction::Insert
    } else {
        SaveAction::Update(keys)
    }
}
