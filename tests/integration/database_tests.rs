//! Database checker integration tests
//!
//! Uses in-memory SQLite, so no external database is required.

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use crate::assert_ok;
    use crate::common::CheckFactory;
    use healthwatch::{CheckSpec, EngineConfig, HealthOrchestrator, HealthStatus};
    use serde_json::json;

    fn with_query(
        mut config: healthwatch::CheckConfig,
        query: &str,
        expected: Option<serde_json::Value>,
    ) -> healthwatch::CheckConfig {
        if let CheckSpec::Database(spec) = &mut config.spec {
            spec.query = Some(query.to_string());
            spec.expected_result = expected;
        }
        config
    }

    #[tokio::test]
    async fn test_sqlite_liveness_check() {
        let orchestrator = HealthOrchestrator::new(EngineConfig::default());
        assert_ok!(orchestrator.register(CheckFactory::database("db", "sqlite::memory:")));

        let result = assert_ok!(orchestrator.execute_one("db").await);

        assert_eq!(result.status, HealthStatus::Healthy);
        assert_eq!(result.retry_count, Some(0));
        assert_eq!(result.metadata["dialect"], "sqlite");
        assert_eq!(result.metadata["rowReturned"], true);
    }

    #[tokio::test]
    async fn test_expected_row_matches() {
        let orchestrator = HealthOrchestrator::new(EngineConfig::default());
        let config = with_query(
            CheckFactory::database("db", "sqlite::memory:"),
            "SELECT 'primary' AS role, 'ok' AS state",
            Some(json!({"role": "primary", "state": "ok"})),
        );
        assert_ok!(orchestrator.register(config));

        let result = assert_ok!(orchestrator.execute_one("db").await);
        assert_eq!(result.status, HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn test_mismatched_row_is_unhealthy_after_retries() {
        let orchestrator = HealthOrchestrator::new(EngineConfig::default());
        let config = with_query(
            CheckFactory::database("db", "sqlite::memory:"),
            "SELECT 'replica' AS role",
            Some(json!({"role": "primary"})),
        )
        .with_retries(1);
        assert_ok!(orchestrator.register(config));

        let result = assert_ok!(orchestrator.execute_one("db").await);

        assert_eq!(result.status, HealthStatus::Unhealthy);
        assert_eq!(result.retry_count, Some(1));
        assert!(result.error.unwrap().contains("mismatch"));
    }

    #[tokio::test]
    async fn test_failing_query_is_unhealthy() {
        let orchestrator = HealthOrchestrator::new(EngineConfig::default());
        let config = with_query(
            CheckFactory::database("db", "sqlite::memory:"),
            "SELECT * FROM missing_table",
            None,
        );
        assert_ok!(orchestrator.register(config));

        let result = assert_ok!(orchestrator.execute_one("db").await);
        assert_eq!(result.status, HealthStatus::Unhealthy);
        assert!(result.error.unwrap().contains("Database error"));

        let metrics = assert_ok!(orchestrator.metrics_of("db"));
        assert_eq!(metrics.total_executions, 1);
        assert_eq!(metrics.failed_executions, 1);
    }
}
