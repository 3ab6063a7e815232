//! # rowsql
//!
//! A small SQL layer for MySQL-flavoured databases.
//!
//! ## Features
//!
//! - **Immutable SELECT builder**: every mutator returns a new [`Select`], so
//!   partial queries can be shared and specialised
//! - **Inline placeholders**: `?` markers in conditions are expanded through an
//!   injected [`Quoter`]
//! - **CRUD assembly**: INSERT/UPDATE/DELETE statements with `?` parameters,
//!   derived from any [`RowSource`]
//! - **Key resolution**: explicit keys, per-table mappings or a naming scheme
//!   (`{table}_id` by default)
//! - **Driver agnostic**: a [`Connector`] runs statements through any [`Driver`]
//!
//! ## Select builder
//!
//! ```ignore
//! use rowsql::{Select, cond, default_quoter};
//!
//! let sql = Select::new(default_quoter(), "users")
//!     .join_left(("g", "groups"), "g.id = a.group_id")
//!     .where_(cond!("a.uid = ?", 1000))
//!     .or_where(cond!("g.name IN ?", vec!["admin", "staff"]))
//!     .order_desc("a.created")
//!     .limit_skip(10, 20)
//!     .to_sql();
//! ```
//!
//! ## CRUD
//!
//! ```ignore
//! use rowsql::{Connector, Row};
//! use std::sync::Arc;
//!
//! let users = Connector::new(Arc::new(driver), "users");
//!
//! // INSERT INTO `users` (`name`) VALUES (?)
//! users.save(&Row::new().with("name", "alice"), &[] as &[&str]).await?;
//!
//! // UPDATE `users` SET `name` = ? WHERE `users_id` = ?
//! users
//!     .save(&Row::new().with("users_id", 7).with("name", "bob"), &[] as &[&str])
//!     .await?;
//! ```

pub mod condition;
pub mod connector;
pub mod crud;
pub mod driver;
pub mod error;
pub mod flatten;
pub mod keys;
pub mod placeholder;
pub mod prelude;
pub mod quote;
pub mod row;
pub mod select;
pub mod value;

pub use condition::Condition;
pub use connector::Connector;
pub use crud::{
    SaveAction, Statement, delete_by_id_statement, delete_statement, find_by_id_statement,
    insert_statement, save_action, update_statement,
};
pub use driver::Driver;
pub use error::{OrmError, OrmResult};
pub use flatten::{ValueSet, build_value_set};
pub use keys::{DEFAULT_KEY_SCHEME, KeyConfig, KeySpec};
pub use placeholder::expand_placeholders;
pub use quote::{Quoter, default_quoter, quote_identifier, quote_literal, quoter};
pub use row::{Field, Row, RowFactory, RowSource};
pub use select::{BASE_ALIAS, CountMode, JoinKind, Select, TableRef};
pub use value::Value;
