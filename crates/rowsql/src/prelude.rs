//! Convenient imports for typical `rowsql` usage.
//!
//! ```ignore
//! use rowsql::prelude::*;
//! ```

pub use crate::cond;
pub use crate::{
    Condition, Connector, Driver, KeyConfig, OrmError, OrmResult, Row, RowSource, SaveAction,
    Select, Value, ValueSet, default_quoter,
};
