//! Orchestrator integration tests
//!
//! Drive registration, execution and aggregation through the public API,
//! with real HTTP endpoints served by `wiremock`.

#[cfg(test)]
mod tests {
    use crate::common::{CheckFactory, ScriptedChecker};
    use crate::{assert_err, assert_ok};
    use healthwatch::{
        EngineConfig, HealthError, HealthOrchestrator, HealthStatus, ResourceCheck, ResourceKind,
    };
    use serde_json::json;
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn orchestrator_with_custom() -> (HealthOrchestrator, Arc<ScriptedChecker>) {
        let checker = Arc::new(ScriptedChecker::new());
        let orchestrator = HealthOrchestrator::builder(EngineConfig::default())
            .checker(checker.clone())
            .build();
        (orchestrator, checker)
    }

    /// Endpoint failing twice before recovering is healthy after two retries
    #[tokio::test]
    async fn test_http_check_recovers_within_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let orchestrator = HealthOrchestrator::new(EngineConfig::default());
        let config = CheckFactory::http("api", format!("{}/health", server.uri()))
            .with_interval(0)
            .with_timeout(5000)
            .with_retries(2);
        assert_ok!(orchestrator.register(config));
        assert!(!orchestrator.is_scheduled("api"));

        let result = assert_ok!(orchestrator.execute_one("api").await);

        assert_eq!(result.status, HealthStatus::Healthy);
        assert_eq!(result.retry_count, Some(2));
        assert_eq!(result.metadata["statusCode"], 200);
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_http_check_exhausts_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let orchestrator = HealthOrchestrator::new(EngineConfig::default());
        assert_ok!(orchestrator.register(CheckFactory::http("api", server.uri()).with_retries(2)));

        let result = assert_ok!(orchestrator.execute_one("api").await);
        assert_eq!(result.status, HealthStatus::Unhealthy);
        assert_eq!(result.retry_count, Some(2));
        assert!(result.error.unwrap().contains("503"));
        assert_eq!(result.status.http_status_code(), 503);

        let metrics = assert_ok!(orchestrator.metrics_of("api"));
        assert_eq!(metrics.failed_executions, 1);
        assert_eq!(metrics.uptime, 0.0);
    }

    #[tokio::test]
    async fn test_ghost_ids_are_not_found() {
        let orchestrator = HealthOrchestrator::new(EngineConfig::default());

        let err = assert_err!(orchestrator.unregister("ghost"));
        assert!(matches!(err, HealthError::NotFound(_)));
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_summary_over_mixed_checks() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let (orchestrator, _) = orchestrator_with_custom();
        assert_ok!(orchestrator.register(CheckFactory::http("api", server.uri())));
        assert_ok!(orchestrator.register(CheckFactory::custom("queue", json!({"status": "degraded"}))));
        assert_ok!(orchestrator.register(CheckFactory::system(
            "host",
            vec![ResourceCheck::new(ResourceKind::Memory, 1000.0)],
        )));
        assert_ok!(orchestrator.register(
            CheckFactory::custom("paused", json!({"status": "unhealthy"})).with_enabled(false)
        ));

        let summary = orchestrator.execute_all().await;

        assert_eq!(summary.total, 3);
        assert_eq!(summary.healthy, 2);
        assert_eq!(summary.degraded, 1);
        assert_eq!(summary.status, HealthStatus::Degraded);
        assert_eq!(summary.status.http_status_code(), 206);

        let ids: Vec<_> = summary.results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["api", "host", "queue"]);

        let host = &summary.results[1];
        assert!(host.metadata.contains_key("memory"));

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["results"][0]["type"], "http");
        assert_eq!(json["results"][0]["retryCount"], 0);
    }

    #[tokio::test]
    async fn test_execute_all_runs_concurrently() {
        let (orchestrator, checker) = orchestrator_with_custom();
        for i in 0..8 {
            assert_ok!(orchestrator.register(CheckFactory::custom(
                &format!("slow-{}", i),
                json!({"delayMs": 300}),
            )));
        }

        let start = Instant::now();
        let summary = orchestrator.execute_all().await;

        assert_eq!(summary.healthy, 8);
        assert!(start.elapsed() < Duration::from_millis(8 * 300));
        for i in 0..8 {
            assert_eq!(checker.attempts(&format!("slow-{}", i)), 1);
        }
    }

    #[tokio::test]
    async fn test_timeout_override_fails_slow_check() {
        let (orchestrator, _) = orchestrator_with_custom();
        assert_ok!(orchestrator.register(
            CheckFactory::custom("slow", json!({"delayMs": 2000})).with_timeout(100)
        ));

        let result = assert_ok!(orchestrator.execute_one("slow").await);
        assert_eq!(result.status, HealthStatus::Unhealthy);
        assert!(result.error.unwrap().contains("timed out"));
        assert!(result.duration < 2000);
    }

    #[tokio::test]
    async fn test_scheduled_check_records_history() {
        let (orchestrator, checker) = orchestrator_with_custom();
        assert_ok!(orchestrator.register(CheckFactory::custom("tick", json!({})).with_interval(100)));

        tokio::time::sleep(Duration::from_millis(550)).await;
        orchestrator.shutdown();
        // Let a tick that was already running finish recording
        tokio::time::sleep(Duration::from_millis(50)).await;

        let executed = checker.attempts("tick");
        assert!(executed >= 3, "executed {} times", executed);

        let history = assert_ok!(orchestrator.history_of("tick", None));
        assert_eq!(history.len() as u64, executed);
        assert!(orchestrator.status_of("tick").is_some());
    }
}
