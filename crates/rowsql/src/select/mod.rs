//! Immutable SELECT builder.
//!
//! [`Select`] is a persistent value: every mutator borrows the current state
//! and returns a new builder, so a partially built query can be shared and
//! specialised freely.
//!
//! # Example
//!
//! ```ignore
//! use rowsql::{Select, cond, default_quoter};
//!
//! let base = Select::new(default_quoter(), "users");
//! let admins = base
//!     .join_left(("g", "groups"), "g.id = a.group_id")
//!     .where_(cond!("g.name = ?", "admin"))
//!     .order_desc("a.created")
//!     .limit(10);
//!
//! assert_eq!(base.to_sql(), "SELECT a.* FROM `users` a");
//! ```

mod render;

use crate::condition::Condition;
use crate::placeholder::expand_placeholders;
use crate::quote::Quoter;
use std::fmt;
use std::sync::Arc;

/// Alias given to the base table of a builder created with [`Select::new`].
pub const BASE_ALIAS: &str = "a";

/// A table reference, optionally aliased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRef {
    /// `` `table` ``
    Bare(String),
    /// `` `table` alias ``
    Aliased { alias: String, table: String },
}

impl TableRef {
    pub fn bare(table: impl Into<String>) -> Self {
        TableRef::Bare(table.into())
    }

    pub fn aliased(alias: impl Into<String>, table: impl Into<String>) -> Self {
        TableRef::Aliased {
            alias: alias.into(),
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        match self {
            TableRef::Bare(table) | TableRef::Aliased { table, .. } => table,
        }
    }

    pub fn alias(&self) -> Option<&str> {
        match self {
            TableRef::Bare(_) => None,
            TableRef::Aliased { alias, .. } => Some(alias),
        }
    }
}

impl From<&str> for TableRef {
    fn from(table: &str) -> Self {
        TableRef::bare(table)
    }
}

impl From<String> for TableRef {
    fn from(table: String) -> Self {
        TableRef::Bare(table)
    }
}

/// `(alias, table)`
impl From<(&str, &str)> for TableRef {
    fn from((alias, table): (&str, &str)) -> Self {
        TableRef::aliased(alias, table)
    }
}

/// Boolean connective joining a filter to the ones before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    pub fn as_sql(self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }
}

/// Join flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
}

impl JoinKind {
    pub fn as_sql(self) -> &'static str {
        match self {
            JoinKind::Inner => "JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
        }
    }
}

/// Aggregate count mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CountMode {
    #[default]
    None,
    /// `COUNT(*)`
    All,
    /// `COUNT(DISTINCT field)`
    Distinct(String),
}

impl CountMode {
    pub fn is_active(&self) -> bool {
        !matches!(self, CountMode::None)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Source {
    pub(crate) table: TableRef,
    pub(crate) fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Filter {
    pub(crate) connective: Connective,
    pub(crate) sql: String,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Join {
    pub(crate) kind: JoinKind,
    pub(crate) table: TableRef,
    pub(crate) on: String,
    pub(crate) fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct OrderBy {
    pub(crate) expr: String,
    pub(crate) desc: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Limit {
    pub(crate) skip: Option<u64>,
    pub(crate) count: u64,
}

#[derive(Clone)]
pub(crate) struct Union {
    pub(crate) select: Arc<Select>,
    pub(crate) all: bool,
}

/// Immutable SELECT builder.
#[derive(Clone)]
pub struct Select {
    quoter: Quoter,
    pub(crate) sources: Vec<Source>,
    pub(crate) columns: Vec<String>,
    pub(crate) where_filters: Vec<Filter>,
    pub(crate) having_filters: Vec<Filter>,
    pub(crate) joins: Vec<Join>,
    pub(crate) order: Vec<OrderBy>,
    pub(crate) group: Vec<String>,
    pub(crate) limit: Option<Limit>,
    pub(crate) unions: Vec<Union>,
    pub(crate) distinct: bool,
    pub(crate) count: CountMode,
}

const ALL_FIELDS: [&str; 1] = ["*"];

fn to_fields(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

impl Select {
    /// Create a builder selecting `a.*` from `table` aliased `a`.
    pub fn new(quoter: Quoter, table: &str) -> Self {
        Self::empty(quoter).from(TableRef::aliased(BASE_ALIAS, table))
    }

    /// Create a builder without any source.
    pub fn empty(quoter: Quoter) -> Self {
        Self {
            quoter,
            sources: Vec::new(),
            columns: Vec::new(),
            where_filters: Vec::new(),
            having_filters: Vec::new(),
            joins: Vec::new(),
            order: Vec::new(),
            group: Vec::new(),
            limit: None,
            unions: Vec::new(),
            distinct: false,
            count: CountMode::None,
        }
    }

    /// The quoting strategy used for bound values.
    pub fn quoter(&self) -> &Quoter {
        &self.quoter
    }

    fn derive(&self, f: impl FnOnce(&mut Self)) -> Self {
        let mut next = self.clone();
        f(&mut next);
        next
    }

    fn expand(&self, cond: Condition) -> String {
        expand_placeholders(cond.template(), cond.values(), &self.quoter)
    }

    // ==================== SELECT head ====================

    /// Emit `SELECT DISTINCT`.
    pub fn distinct(&self) -> Self {
        self.derive(|s| s.distinct = true)
    }

    /// Render as `SELECT COUNT(*)`; ORDER BY is dropped.
    pub fn count(&self) -> Self {
        self.derive(|s| s.count = CountMode::All)
    }

    /// Render as `SELECT COUNT(DISTINCT field)`; ORDER BY is dropped.
    pub fn count_distinct(&self, field: &str) -> Self {
        self.derive(|s| s.count = CountMode::Distinct(field.to_string()))
    }

    // ==================== FROM / columns ====================

    /// Add a source selecting all of its fields.
    pub fn from(&self, table: impl Into<TableRef>) -> Self {
        self.from_fields(table, &ALL_FIELDS)
    }

    /// Add a source with an explicit field list.
    pub fn from_fields(&self, table: impl Into<TableRef>, fields: &[&str]) -> Self {
        let source = Source {
            table: table.into(),
            fields: to_fields(fields),
        };
        self.derive(|s| s.sources.push(source))
    }

    /// Remove all sources.
    pub fn clear_from(&self) -> Self {
        self.derive(|s| s.sources.clear())
    }

    /// Add a column expression, applied to every source.
    pub fn column(&self, expr: &str) -> Self {
        self.derive(|s| s.columns.push(expr.to_string()))
    }

    /// Remove extra columns and empty the field list of every source.
    ///
    /// Sources themselves are kept.
    pub fn clear_columns(&self) -> Self {
        self.derive(|s| {
            s.columns.clear();
            for source in &mut s.sources {
                source.fields.clear();
            }
        })
    }

    // ==================== WHERE / HAVING ====================

    /// Add a WHERE condition joined with `AND`.
    pub fn where_(&self, cond: impl Into<Condition>) -> Self {
        self.push_filter(cond.into(), Connective::And, false)
    }

    /// Add a WHERE condition joined with `OR`.
    pub fn or_where(&self, cond: impl Into<Condition>) -> Self {
        self.push_filter(cond.into(), Connective::Or, false)
    }

    /// Remove all WHERE conditions.
    pub fn clear_where(&self) -> Self {
        self.derive(|s| s.where_filters.clear())
    }

    /// Add a HAVING condition joined with `AND`.
    pub fn having(&self, cond: impl Into<Condition>) -> Self {
        self.push_filter(cond.into(), Connective::And, true)
    }

    /// Add a HAVING condition joined with `OR`.
    pub fn or_having(&self, cond: impl Into<Condition>) -> Self {
        self.push_filter(cond.into(), Connective::Or, true)
    }

    /// Remove all HAVING conditions.
    pub fn clear_having(&self) -> Self {
        self.derive(|s| s.having_filters.clear())
    }

    fn push_filter(&self, cond: Condition, connective: Connective, having: bool) -> Self {
        let filter = Filter {
            connective,
            sql: self.expand(cond),
        };
        self.derive(|s| {
            if having {
                s.having_filters.push(filter);
            } else {
                s.where_filters.push(filter);
            }
        })
    }

    // ==================== JOIN ====================

    /// Add `JOIN table ON ...`, selecting all fields of the joined table.
    pub fn join(&self, table: impl Into<TableRef>, on: impl Into<Condition>) -> Self {
        self.join_fields(JoinKind::Inner, table, on, &ALL_FIELDS)
    }

    /// Add `LEFT JOIN table ON ...`, selecting all fields of the joined table.
    pub fn join_left(&self, table: impl Into<TableRef>, on: impl Into<Condition>) -> Self {
        self.join_fields(JoinKind::Left, table, on, &ALL_FIELDS)
    }

    /// Add `RIGHT JOIN table ON ...`, selecting all fields of the joined table.
    pub fn join_right(&self, table: impl Into<TableRef>, on: impl Into<Condition>) -> Self {
        self.join_fields(JoinKind::Right, table, on, &ALL_FIELDS)
    }

    /// Add a join with an explicit field list (may be empty).
    pub fn join_fields(
        &self,
        kind: JoinKind,
        table: impl Into<TableRef>,
        on: impl Into<Condition>,
        fields: &[&str],
    ) -> Self {
        let join = Join {
            kind,
            table: table.into(),
            on: self.expand(on.into()),
            fields: to_fields(fields),
        };
        self.derive(|s| s.joins.push(join))
    }

    /// Remove all joins.
    pub fn clear_joins(&self) -> Self {
        self.derive(|s| s.joins.clear())
    }

    // ==================== ORDER / GROUP / LIMIT ====================

    /// Add an ascending ORDER BY expression.
    pub fn order(&self, expr: &str) -> Self {
        self.push_order(expr, false)
    }

    /// Add a descending ORDER BY expression.
    pub fn order_desc(&self, expr: &str) -> Self {
        self.push_order(expr, true)
    }

    fn push_order(&self, expr: &str, desc: bool) -> Self {
        let order = OrderBy {
            expr: expr.to_string(),
            desc,
        };
        self.derive(|s| s.order.push(order))
    }

    pub fn clear_order(&self) -> Self {
        self.derive(|s| s.order.clear())
    }

    /// Add a GROUP BY expression.
    pub fn group(&self, expr: &str) -> Self {
        self.derive(|s| s.group.push(expr.to_string()))
    }

    pub fn clear_group(&self) -> Self {
        self.derive(|s| s.group.clear())
    }

    /// `LIMIT count`
    pub fn limit(&self, count: u64) -> Self {
        self.derive(|s| s.limit = Some(Limit { skip: None, count }))
    }

    /// `LIMIT skip,count`
    pub fn limit_skip(&self, count: u64, skip: u64) -> Self {
        self.derive(|s| {
            s.limit = Some(Limit {
                skip: Some(skip),
                count,
            })
        })
    }

    pub fn clear_limit(&self) -> Self {
        self.derive(|s| s.limit = None)
    }

    // ==================== UNION ====================

    /// Append `UNION ALL (other)`.
    pub fn union_all(&self, other: &Select) -> Self {
        self.push_union(other, true)
    }

    /// Append `UNION (other)`.
    pub fn union(&self, other: &Select) -> Self {
        self.push_union(other, false)
    }

    fn push_union(&self, other: &Select, all: bool) -> Self {
        let union = Union {
            select: Arc::new(other.clone()),
            all,
        };
        self.derive(|s| s.unions.push(union))
    }

    /// Render the SQL text.
    pub fn to_sql(&self) -> String {
        render::render(self)
    }
}

impl fmt::Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

impl fmt::Debug for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Select")
            .field("sql", &self.to_sql())
            .finish_non_exhaustive()
    }
}
