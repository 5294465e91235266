//! Error handling integration tests
//!
//! Verify which errors reach orchestrator callers and how a transport layer
//! would map them.

#[cfg(test)]
mod tests {
    use crate::assert_err;
    use crate::common::{CheckFactory, ScriptedChecker};
    use healthwatch::utils::error::ErrorResponse;
    use healthwatch::{EngineConfig, HealthError, HealthOrchestrator, HealthStatus};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_caller_errors_map_to_status_codes() {
        let orchestrator = HealthOrchestrator::new(EngineConfig::default());
        orchestrator
            .register(CheckFactory::custom("job", json!({})))
            .unwrap();

        let duplicate = assert_err!(orchestrator.register(CheckFactory::custom("job", json!({}))));
        assert_eq!(duplicate.status_code(), 409);

        let unsupported = assert_err!(orchestrator.execute_one("job").await);
        assert!(matches!(unsupported, HealthError::UnsupportedType(_)));
        assert_eq!(unsupported.status_code(), 400);

        let missing = assert_err!(orchestrator.toggle("ghost", false));
        assert_eq!(missing.status_code(), 404);

        let invalid = assert_err!(orchestrator.register(CheckFactory::http("bad", "ftp://example.com")));
        assert!(matches!(invalid, HealthError::Validation(_)));
        assert_eq!(invalid.status_code(), 400);
    }

    #[tokio::test]
    async fn test_checker_failures_never_propagate() {
        let orchestrator = HealthOrchestrator::builder(EngineConfig::default())
            .checker(Arc::new(ScriptedChecker::new()))
            .build();
        orchestrator
            .register(CheckFactory::custom("job", json!({"failures": 100})).with_retries(1))
            .unwrap();

        let result = orchestrator.execute_one("job").await.unwrap();
        assert_eq!(result.status, HealthStatus::Unhealthy);
        assert_eq!(result.error.as_deref(), Some("scripted failure 2"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_unhealthy() {
        let orchestrator = HealthOrchestrator::new(EngineConfig::default());
        orchestrator
            .register(CheckFactory::http("down", "http://127.0.0.1:1/health").with_timeout(1000))
            .unwrap();

        let result = orchestrator.execute_one("down").await.unwrap();
        assert_eq!(result.status, HealthStatus::Unhealthy);
        assert!(result.error.is_some());
    }

    #[test]
    fn test_error_response_body() {
        let error = HealthError::not_found("ghost");
        let body = serde_json::to_value(ErrorResponse::from(&error)).unwrap();

        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(body["error"]["message"], "Check not found: ghost");
        assert!(body["error"]["timestamp"].as_i64().unwrap() > 0);
    }
}
