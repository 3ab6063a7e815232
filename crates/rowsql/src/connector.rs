//! Table-bound data-access object.
//!
//! A [`Connector`] ties a [`Driver`] to one table and its key configuration.
//! Writes go through the statement assemblers in [`crate::crud`], reads go
//! through [`Select`] builders and come back through the row factory.
//!
//! # Example
//! ```ignore
//! use rowsql::{Connector, KeyConfig, Row, cond};
//! use std::sync::Arc;
//!
//! let users = Connector::new(Arc::new(driver), "users")
//!     .set_key_config(KeyConfig::new().map_table("users", "id"));
//!
//! users.save(&Row::new().with("name", "alice"), &[] as &[&str]).await?;
//!
//! let active = users
//!     .find_all(&users.select().where_(cond!("a.status = ?", "active")))
//!     .await?;
//! ```

use crate::crud::{self, SaveAction, Statement};
use crate::driver::Driver;
use crate::error::{OrmError, OrmResult};
use crate::flatten::ValueSet;
use crate::keys::{KeyConfig, KeySpec};
use crate::quote::quoter;
use crate::row::{Row, RowFactory, RowSource};
use crate::select::Select;
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Maximum number of SQL bytes carried by a log event.
const MAX_LOGGED_SQL: usize = 200;

/// Cut `sql` to at most `max_bytes` without splitting a character.
fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

fn log_statement(op: &'static str, table: &str, sql: &str, param_count: usize) {
    tracing::debug!(
        target: "rowsql.sql",
        op,
        table,
        param_count,
        sql = truncate_sql_bytes(sql, MAX_LOGGED_SQL),
        "running statement"
    );
}

/// Data-access object for a single table.
pub struct Connector<D: Driver, R = Row> {
    driver: Arc<D>,
    table: String,
    keys: KeyConfig,
    factory: RowFactory<R>,
}

impl<D: Driver> Connector<D, Row> {
    /// Create a connector producing [`Row`]s, with the default key scheme.
    pub fn new(driver: Arc<D>, table: impl Into<String>) -> Self {
        Self {
            driver,
            table: table.into(),
            keys: KeyConfig::default(),
            factory: Arc::new(Row::from_map),
        }
    }
}

impl<D: Driver, R> Clone for Connector<D, R> {
    fn clone(&self) -> Self {
        Self {
            driver: Arc::clone(&self.driver),
            table: self.table.clone(),
            keys: self.keys.clone(),
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<D: Driver, R> fmt::Debug for Connector<D, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connector")
            .field("table", &self.table)
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

impl<D: Driver, R> Connector<D, R> {
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn set_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn driver(&self) -> &Arc<D> {
        &self.driver
    }

    pub fn set_driver(mut self, driver: Arc<D>) -> Self {
        self.driver = driver;
        self
    }

    pub fn key_config(&self) -> &KeyConfig {
        &self.keys
    }

    pub fn set_key_config(mut self, keys: KeyConfig) -> Self {
        self.keys = keys;
        self
    }

    /// Replace the per-table key mappings, keeping the scheme.
    pub fn set_pk_mappings(mut self, mappings: HashMap<String, KeySpec>) -> Self {
        self.keys = self.keys.mappings(mappings);
        self
    }

    /// Replace the key naming scheme, keeping the mappings.
    pub fn set_pk_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.keys = self.keys.scheme(scheme);
        self
    }

    /// Build fetched rows with `factory` instead.
    ///
    /// Use `|values| values` to get raw [`ValueSet`]s.
    pub fn with_row_factory<R2, F>(self, factory: F) -> Connector<D, R2>
    where
        F: Fn(ValueSet) -> R2 + Send + Sync + 'static,
    {
        Connector {
            driver: self.driver,
            table: self.table,
            keys: self.keys,
            factory: Arc::new(factory),
        }
    }

    fn resolve_keys<S: AsRef<str>>(&self, explicit: &[S]) -> Vec<String> {
        self.keys.resolve_keys(&self.table, explicit)
    }

    fn id_key(&self, key_field: Option<&str>) -> OrmResult<String> {
        match key_field {
            Some(field) if !field.is_empty() => Ok(field.to_string()),
            _ => crud::single_key(&self.table, self.resolve_keys::<&str>(&[])),
        }
    }

    async fn run(&self, op: &'static str, stmt: Statement) -> OrmResult<u64> {
        log_statement(op, &self.table, &stmt.sql, stmt.params.len());
        self.driver.execute(&stmt.sql, &stmt.params).await
    }

    async fn fetch(
        &self,
        op: &'static str,
        sql: &str,
        params: &[Value],
    ) -> OrmResult<Vec<ValueSet>> {
        log_statement(op, &self.table, sql, params.len());
        self.driver.query(sql, params).await
    }

    /// Insert `row`, returning the affected row count.
    pub async fn insert(&self, row: &(impl RowSource + Sync + ?Sized)) -> OrmResult<u64> {
        let stmt = crud::insert_statement(&self.table, row);
        self.run("insert", stmt).await
    }

    /// Update `row` by its key fields.
    ///
    /// An empty `keys` list falls back to the key configuration.
    pub async fn update<S: AsRef<str>>(
        &self,
        row: &(impl RowSource + Sync + ?Sized),
        keys: &[S],
    ) -> OrmResult<u64> {
        let keys = self.resolve_keys(keys);
        let stmt = crud::update_statement(&self.table, row, &keys)?;
        self.run("update", stmt).await
    }

    /// Delete `row` by its key fields.
    pub async fn delete<S: AsRef<str>>(
        &self,
        row: &(impl RowSource + Sync + ?Sized),
        keys: &[S],
    ) -> OrmResult<u64> {
        let keys = self.resolve_keys(keys);
        let stmt = crud::delete_statement(&self.table, row, &keys)?;
        self.run("delete", stmt).await
    }

    /// Delete by a single key value.
    ///
    /// Without `key_field` the table must resolve to exactly one key field.
    pub async fn delete_by_id(
        &self,
        id: impl Into<Value>,
        key_field: Option<&str>,
    ) -> OrmResult<u64> {
        let key = self.id_key(key_field)?;
        let stmt = crud::delete_by_id_statement(&self.table, &key, id);
        self.run("delete_by_id", stmt).await
    }

    /// Insert or update `row`, depending on its key values.
    pub async fn save<S: AsRef<str>>(
        &self,
        row: &(impl RowSource + Sync + ?Sized),
        keys: &[S],
    ) -> OrmResult<SaveAction> {
        let action = crud::save_action(row, self.resolve_keys(keys));
        match &action {
            SaveAction::Insert => self.insert(row).await?,
            SaveAction::Update(keys) => self.update(row, keys.as_slice()).await?,
        };
        Ok(action)
    }

    /// Run raw SQL with `?` parameters, returning the affected row count.
    pub async fn exec(&self, sql: &str, params: &[Value]) -> OrmResult<u64> {
        log_statement("exec", &self.table, sql, params.len());
        self.driver.execute(sql, params).await
    }

    /// A builder over this connector's table, quoting through the driver.
    pub fn select(&self) -> Select
    where
        D: 'static,
    {
        let driver = Arc::clone(&self.driver);
        Select::new(quoter(move |value| driver.quote(value)), &self.table)
    }

    /// Run `select` and return the raw column maps.
    pub async fn query(&self, select: &Select) -> OrmResult<Vec<ValueSet>> {
        self.fetch("query", &select.to_sql(), &[]).await
    }

    /// First row of `select`, if any.
    pub async fn find_one(&self, select: &Select) -> OrmResult<Option<R>> {
        let rows = self.fetch("find_one", &select.to_sql(), &[]).await?;
        Ok(rows.into_iter().next().map(|values| (self.factory)(values)))
    }

    /// All rows of `select`.
    pub async fn find_all(&self, select: &Select) -> OrmResult<Vec<R>> {
        let rows = self.fetch("find_all", &select.to_sql(), &[]).await?;
        Ok(rows.into_iter().map(|values| (self.factory)(values)).collect())
    }

    /// Row with the given single key value, if any.
    pub async fn find_by_id(
        &self,
        id: impl Into<Value>,
        key_field: Option<&str>,
    ) -> OrmResult<Option<R>> {
        let key = self.id_key(key_field)?;
        let stmt = crud::find_by_id_statement(&self.table, &key, id);
        let rows = self.fetch("find_by_id", &stmt.sql, &stmt.params).await?;
        Ok(rows.into_iter().next().map(|values| (self.factory)(values)))
    }

    /// Count rows of `select`; with `field`, count distinct values of it.
    ///
    /// Ordering is dropped, unions are counted as a whole.
    pub async fn count(&self, select: &Select, field: Option<&str>) -> OrmResult<i64> {
        let select = match field {
            Some(field) => select.count_distinct(field),
            None => select.count(),
        };
        let rows = self.fetch("count", &select.to_sql(), &[]).await?;

        let Some((column, value)) = rows.into_iter().next().and_then(|r| r.into_iter().next())
        else {
            return Ok(0);
        };
        value.as_i64().ok_or_else(|| {
            OrmError::decode(column, format!("expected an integer count, got {value}"))
        })
    }

    /// Id generated by the last insert on the driver.
    pub async fn last_insert_id(&self, sequence: Option<&str>) -> OrmResult<Option<String>> {
        self.driver.last_insert_id(sequence).await
    }
}
