//! Session management for rowmodel.
//!
//! A Session pairs a [`StatementExecutor`] with a [`SessionConfig`] and runs
//! generated statements through it: inserts with key read-back, batched
//! inserts, updates, and queries materialized into typed values.
//!
//! # Example
//!
//! ```rust,ignore
//! use rowmodel::prelude::*;
//!
//! let session = Session::builder()
//!     .command_timeout(30)
//!     .default_batch_size(500)
//!     .build_with(executor);
//!
//! let mut user = User { id: 0, name: "Ann".to_string(), active: true };
//! unwrap_outcome(session.insert(&cx, &mut user).await);
//! assert_ne!(user.id, 0);
//! ```

use std::time::Duration;

use asupersync::{Cx, Outcome};
use rowmodel_core::error::ConfigError;
use rowmodel_core::{
    DomainErrorKind, Error, FromRow, Model, Result, StatementExecutor, Value, group_by_count,
    try_get_key,
};
use rowmodel_query::{generate_insert, generate_update};
use serde::{Deserialize, Serialize};

/// Default number of records per batched INSERT round trip.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Per-command timeout in seconds; `None` leaves it to the executor
    pub command_timeout_secs: Option<u64>,
    /// Records per round trip for `insert_range`
    pub default_batch_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            command_timeout_secs: None,
            default_batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl SessionConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-command timeout in seconds.
    pub fn command_timeout(mut self, secs: u64) -> Self {
        self.command_timeout_secs = Some(secs);
        self
    }

    /// Set the default batch size.
    pub fn default_batch_size(mut self, n: usize) -> Self {
        self.default_batch_size = n;
        self
    }

    /// The command timeout as a `Duration`.
    pub fn command_timeout_duration(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }

    /// Parse a configuration from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            Error::Config(ConfigError {
                message: format!("invalid session configuration: {e}"),
                source: Some(Box::new(e)),
            })
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the settings are usable.
    pub fn validate(&self) -> Result<()> {
        if self.default_batch_size == 0 {
            return Err(Error::Config(ConfigError {
                message: "default_batch_size must be greater than zero".to_string(),
                source: None,
            }));
        }
        Ok(())
    }
}

/// Runs generated statements through an executor.
#[derive(Debug)]
pub struct Session<E: StatementExecutor> {
    /// The underlying executor
    executor: E,
    /// Timeouts and batching
    config: SessionConfig,
}

impl<E: StatementExecutor> Session<E> {
    /// Create a new session with default configuration.
    pub fn new(executor: E) -> Self {
        Self::with_config(executor, SessionConfig::default())
    }

    /// Create a new session with the given configuration.
    pub fn with_config(executor: E, config: SessionConfig) -> Self {
        Self { executor, config }
    }

    /// Create a session builder.
    #[must_use]
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Get a reference to the underlying executor.
    #[must_use]
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Get the session configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Consume the session and return the underlying executor.
    pub fn into_executor(self) -> E {
        self.executor
    }

    fn timeout(&self) -> Option<Duration> {
        self.config.command_timeout_duration()
    }

    /// Insert one record.
    ///
    /// When the type has a key, the generated value is read back and
    /// assigned to the record's key field.
    #[tracing::instrument(level = "debug", skip(self, cx, model), fields(model = M::TABLE_NAME))]
    pub async fn insert<M: Model>(&self, cx: &Cx, model: &mut M) -> Outcome<(), Error> {
        let statement = generate_insert(&*model);

        let key = match try_get_key::<M>() {
            Some(key) if statement.returns_key => key,
            _ => {
                return match self
                    .executor
                    .execute_non_query(cx, &statement.sql, self.timeout())
                    .await
                {
                    Outcome::Ok(_) => Outcome::Ok(()),
                    Outcome::Err(e) => Outcome::Err(e),
                    Outcome::Cancelled(r) => Outcome::Cancelled(r),
                    Outcome::Panicked(p) => Outcome::Panicked(p),
                };
            }
        };

        // The row must not be written when its key cannot be read back.
        if !key.is_materialized() {
            return Outcome::Err(Error::domain(
                DomainErrorKind::KeyNotAssignable,
                format!(
                    "Key field '{}' of {} is not assignable; the generated key cannot be read back",
                    key.name,
                    M::TABLE_NAME
                ),
            ));
        }

        let generated = match self
            .executor
            .execute_scalar(cx, &statement.sql, self.timeout())
            .await
        {
            Outcome::Ok(v) => v,
            Outcome::Err(e) => return Outcome::Err(e),
            Outcome::Cancelled(r) => return Outcome::Cancelled(r),
            Outcome::Panicked(p) => return Outcome::Panicked(p),
        };

        tracing::debug!(key = key.name, value = ?generated, "Assigning generated key");
        match model.set_field(key.name, &generated) {
            Ok(()) => Outcome::Ok(()),
            Err(e) => Outcome::Err(e),
        }
    }

    /// Insert records in batches of the configured default size.
    pub async fn insert_range<M: Model>(&self, cx: &Cx, models: &[M]) -> Outcome<u64, Error> {
        self.insert_range_with_batch_size(cx, models, self.config.default_batch_size)
            .await
    }

    /// Insert records in batches of `batch_size`.
    ///
    /// Each batch is sent as one round trip holding one INSERT per line.
    /// Generated keys are not read back. Returns the total affected rows.
    #[tracing::instrument(
        level = "debug",
        skip(self, cx, models),
        fields(model = M::TABLE_NAME, count = models.len())
    )]
    pub async fn insert_range_with_batch_size<M: Model>(
        &self,
        cx: &Cx,
        models: &[M],
        batch_size: usize,
    ) -> Outcome<u64, Error> {
        if batch_size == 0 {
            return Outcome::Err(Error::invalid_argument(
                "Batch size must be greater than 0",
            ));
        }

        let batches = match group_by_count(models, batch_size) {
            Ok(batches) => batches,
            Err(e) => return Outcome::Err(e),
        };

        let mut total: u64 = 0;
        for (index, batch) in batches.enumerate() {
            tracing::debug!(batch = index, records = batch.len(), "Sending insert batch");

            let mut sql = String::new();
            for model in batch {
                sql.push_str(&generate_insert(model).sql);
                sql.push('\n');
            }

            match self
                .executor
                .execute_non_query(cx, &sql, self.timeout())
                .await
            {
                Outcome::Ok(count) => total += count,
                Outcome::Err(e) => return Outcome::Err(e),
                Outcome::Cancelled(r) => return Outcome::Cancelled(r),
                Outcome::Panicked(p) => return Outcome::Panicked(p),
            }
        }

        Outcome::Ok(total)
    }

    /// Update one record by key. Returns the affected rows.
    #[tracing::instrument(level = "debug", skip(self, cx, model), fields(model = M::TABLE_NAME))]
    pub async fn update<M: Model>(&self, cx: &Cx, model: &M) -> Outcome<u64, Error> {
        let sql = match generate_update(model) {
            Ok(sql) => sql,
            Err(e) => return Outcome::Err(e),
        };
        self.executor
            .execute_non_query(cx, &sql, self.timeout())
            .await
    }

    /// Run a query and convert every row.
    ///
    /// Record types are materialized by column name; scalars and strings
    /// read the first column.
    #[tracing::instrument(level = "debug", skip(self, cx))]
    pub async fn query<T: FromRow>(&self, cx: &Cx, sql: &str) -> Outcome<Vec<T>, Error> {
        let rows = match self.executor.query(cx, sql, self.timeout()).await {
            Outcome::Ok(rows) => rows,
            Outcome::Err(e) => return Outcome::Err(e),
            Outcome::Cancelled(r) => return Outcome::Cancelled(r),
            Outcome::Panicked(p) => return Outcome::Panicked(p),
        };

        tracing::trace!(rows = rows.len(), "Materializing result rows");
        match rows.iter().map(T::from_row).collect::<Result<Vec<_>>>() {
            Ok(values) => Outcome::Ok(values),
            Err(e) => Outcome::Err(e),
        }
    }

    /// Execute a statement, discarding any result.
    pub async fn execute(&self, cx: &Cx, sql: &str) -> Outcome<(), Error> {
        self.executor.execute(cx, sql, self.timeout()).await
    }

    /// Execute a statement and return the affected rows.
    pub async fn execute_non_query(&self, cx: &Cx, sql: &str) -> Outcome<u64, Error> {
        self.executor
            .execute_non_query(cx, sql, self.timeout())
            .await
    }

    /// Execute a statement and return its first value.
    pub async fn execute_scalar(&self, cx: &Cx, sql: &str) -> Outcome<Value, Error> {
        self.executor.execute_scalar(cx, sql, self.timeout()).await
    }
}

/// Builder for creating Session instances with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// let session = Session::builder()
///     .command_timeout(15)
///     .build_with(executor);
/// ```
#[derive(Debug, Default)]
pub struct SessionBuilder {
    config: SessionConfig,
}

impl SessionBuilder {
    /// Create a new session builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    #[must_use]
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the per-command timeout in seconds.
    #[must_use]
    pub fn command_timeout(mut self, secs: u64) -> Self {
        self.config.command_timeout_secs = Some(secs);
        self
    }

    /// Set the default batch size for `insert_range`.
    #[must_use]
    pub fn default_batch_size(mut self, n: usize) -> Self {
        self.config.default_batch_size = n;
        self
    }

    /// Build the session with the given executor.
    pub fn build_with<E: StatementExecutor>(self, executor: E) -> Session<E> {
        Session::with_config(executor, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.command_timeout_secs, None);
        assert_eq!(config.default_batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.command_timeout_duration(), None);
    }

    #[test]
    fn config_from_json_fills_missing_keys() {
        let config = SessionConfig::from_json(r#"{"command_timeout_secs": 30}"#).unwrap();
        assert_eq!(config.command_timeout_duration(), Some(Duration::from_secs(30)));
        assert_eq!(config.default_batch_size, DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn config_from_json_rejects_bad_input() {
        assert!(matches!(
            SessionConfig::from_json("{not json"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            SessionConfig::from_json(r#"{"default_batch_size": 0}"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = SessionConfig::new().command_timeout(5).default_batch_size(50);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(SessionConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn builder_collects_settings() {
        let builder = SessionBuilder::new().command_timeout(12).default_batch_size(3);
        assert_eq!(builder.config.command_timeout_secs, Some(12));
        assert_eq!(builder.config.default_batch_size, 3);
    }
}
