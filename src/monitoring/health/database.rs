//! Data-store connection checker

use async_trait::async_trait;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, FromQueryResult, JsonValue,
    Statement,
};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::{CheckOutcome, Checker, CheckerError, classify_latency};
use crate::config::{CheckConfig, CheckSpec, CheckType, DatabaseCheckSpec, DatabaseDialect};

/// Liveness query used when a check does not configure one
pub const DEFAULT_QUERY: &str = "SELECT 1";

/// Checker opening a dedicated connection per attempt
///
/// The connection is closed before `evaluate` returns, whether the query
/// succeeded or not.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatabaseChecker;

impl DatabaseChecker {
    pub fn new() -> Self {
        Self
    }

    fn spec(config: &CheckConfig) -> Result<&DatabaseCheckSpec, CheckerError> {
        match &config.spec {
            CheckSpec::Database(spec) => Ok(spec),
            other => Err(CheckerError::invalid_config(format!(
                "Database checker cannot evaluate a {} check",
                other.check_type()
            ))),
        }
    }

    async fn connect(spec: &DatabaseCheckSpec, timeout: Duration) -> Result<DatabaseConnection, CheckerError> {
        let mut options = ConnectOptions::new(spec.connection_string.clone());
        options
            .max_connections(1)
            .min_connections(0)
            .connect_timeout(timeout)
            .acquire_timeout(timeout)
            .sqlx_logging(false);

        Ok(Database::connect(options).await?)
    }

    async fn first_row(
        connection: &DatabaseConnection,
        query: &str,
    ) -> Result<Option<JsonValue>, CheckerError> {
        let statement = Statement::from_string(connection.get_database_backend(), query.to_owned());
        Ok(JsonValue::find_by_statement(statement).one(connection).await?)
    }
}

/// Compare the first row against an expected value.
///
/// An object expectation must match every listed column. A scalar matches
/// when any column of the row equals it, comparing loosely so that `1`,
/// `"1"` and `true` are interchangeable across drivers.
pub(crate) fn row_matches(row: &JsonValue, expected: &JsonValue) -> bool {
    match (row, expected) {
        (JsonValue::Object(columns), JsonValue::Object(wanted)) => wanted
            .iter()
            .all(|(key, value)| columns.get(key).is_some_and(|actual| loosely_equal(actual, value))),
        (JsonValue::Object(columns), scalar) => columns.values().any(|actual| loosely_equal(actual, scalar)),
        (actual, wanted) => loosely_equal(actual, wanted),
    }
}

fn loosely_equal(actual: &JsonValue, expected: &JsonValue) -> bool {
    if actual == expected {
        return true;
    }
    match (scalar_text(actual), scalar_text(expected)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn scalar_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Bool(true) => Some("1".to_string()),
        JsonValue::Bool(false) => Some("0".to_string()),
        JsonValue::Number(n) => Some(
            n.as_f64()
                .filter(|f| f.fract() == 0.0)
                .map(|f| format!("{}", f as i64))
                .unwrap_or_else(|| n.to_string()),
        ),
        JsonValue::String(s) => Some(s.clone()),
        _ => None,
    }
}

#[async_trait]
impl Checker for DatabaseChecker {
    fn check_type(&self) -> CheckType {
        CheckType::Database
    }

    async fn evaluate(
        &self,
        config: &CheckConfig,
        timeout: Duration,
    ) -> Result<CheckOutcome, CheckerError> {
        let spec = Self::spec(config)?;
        let dialect = spec
            .dialect
            .or_else(|| DatabaseDialect::from_connection_string(&spec.connection_string));
        let query = spec.query.as_deref().unwrap_or(DEFAULT_QUERY);

        debug!("Database check {} running: {}", config.id, query);
        let start = Instant::now();

        let connection = Self::connect(spec, timeout).await?;
        let row = Self::first_row(&connection, query).await;
        if let Err(e) = connection.close().await {
            warn!("Failed to close connection for check {}: {}", config.id, e);
        }
        let row = row?;

        if let Some(expected) = &spec.expected_result {
            let matched = row.as_ref().is_some_and(|row| row_matches(row, expected));
            if !matched {
                return Err(CheckerError::ResultMismatch {
                    expected: expected.to_string(),
                    actual: row
                        .map(|row| row.to_string())
                        .unwrap_or_else(|| "no rows".to_string()),
                });
            }
        }

        let elapsed = start.elapsed();
        let elapsed_ms = elapsed.as_millis() as u64;
        let status = classify_latency(elapsed, timeout);

        let mut outcome = CheckOutcome::new(status, format!("Query completed in {}ms", elapsed_ms))
            .with_metadata("responseTime", elapsed_ms)
            .with_metadata("rowReturned", row.is_some());
        if let Some(dialect) = dialect {
            outcome = outcome.with_metadata("dialect", dialect.as_str());
        }
        Ok(outcome)
    }
}
