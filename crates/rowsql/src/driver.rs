//! Driver trait: the database connection the connector runs statements on.

use crate::error::OrmResult;
use crate::flatten::ValueSet;
use crate::quote::quote_literal;
use crate::value::Value;
use std::future::Future;

/// Executes SQL against a database.
///
/// Statements arrive with `?` positional placeholders and their parameters in
/// order. Fetched rows come back as ordered column maps.
pub trait Driver: Send + Sync {
    /// Execute a statement and return the number of affected rows.
    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = OrmResult<u64>> + Send;

    /// Execute a query and return all rows.
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = OrmResult<Vec<ValueSet>>> + Send;

    /// Render `value` as a SQL literal for inline expansion.
    ///
    /// The default uses MySQL-style escaping via [`quote_literal`]; drivers
    /// with a native quoting routine should override it.
    fn quote(&self, value: &Value) -> String {
        quote_literal(value)
    }

    /// The id generated by the last insert, optionally for a named sequence.
    fn last_insert_id(
        &self,
        sequence: Option<&str>,
    ) -> impl Future<Output = OrmResult<Option<String>>> + Send;
}
