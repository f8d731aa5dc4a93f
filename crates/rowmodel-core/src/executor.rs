//! Statement executor abstraction.
//!
//! rowmodel generates SQL text; running it is the job of a
//! [`StatementExecutor`] supplied by the caller. All operations integrate with
//! asupersync's structured concurrency via `Cx` for cancellation, and accept
//! an optional per-command timeout that the executor is expected to enforce.

use std::time::Duration;

use crate::row::Row;
use crate::value::Value;
use asupersync::{Cx, Outcome};

/// Runs SQL text against a database.
pub trait StatementExecutor: Send + Sync {
    /// Execute a statement, discarding any result.
    fn execute(
        &self,
        cx: &Cx,
        sql: &str,
        timeout: Option<Duration>,
    ) -> impl Future<Output = Outcome<(), crate::Error>> + Send;

    /// Execute a statement and return the number of affected rows.
    fn execute_non_query(
        &self,
        cx: &Cx,
        sql: &str,
        timeout: Option<Duration>,
    ) -> impl Future<Output = Outcome<u64, crate::Error>> + Send;

    /// Execute a statement and return the first column of the first row.
    ///
    /// Used to read back generated keys from `OUTPUT INSERTED` clauses.
    fn execute_scalar(
        &self,
        cx: &Cx,
        sql: &str,
        timeout: Option<Duration>,
    ) -> impl Future<Output = Outcome<Value, crate::Error>> + Send;

    /// Execute a query and return all rows.
    fn query(
        &self,
        cx: &Cx,
        sql: &str,
        timeout: Option<Duration>,
    ) -> impl Future<Output = Outcome<Vec<Row>, crate::Error>> + Send;
}
