//! Configuration loading integration tests
//!
//! Load YAML files from disk and register their checks with an orchestrator.

#[cfg(test)]
mod tests {
    use crate::assert_ok;
    use healthwatch::{CheckType, Config, HealthError, HealthOrchestrator};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CONFIG: &str = r#"
engine:
  default_timeout_ms: 3000
  default_retries: 1
  default_retry_delay_ms: 250
  history_capacity: 20
checks:
  - id: api
    name: Public API
    type: http
    interval: 30000
    timeout: 2000
    retries: 2
    url: "https://example.com/health"
    method: HEAD
    headers:
      x-probe: healthwatch
    expectedStatusCodes: [200, 204]
    expectedBody:
      regex: "ok|up"
    tags: [edge, public]
  - id: db
    name: Primary database
    type: database
    connectionString: "sqlite::memory:"
    query: "SELECT 1"
  - id: host
    name: Host resources
    type: system
    enabled: false
    interval: 60000
    checks:
      - resource: memory
        threshold: 90
      - resource: cpu
        threshold: 95
      - resource: disk
        threshold: 85
        path: /
"#;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_and_register_checks() {
        let file = write_config(CONFIG);
        let config = assert_ok!(Config::from_file(file.path()).await);

        assert_eq!(config.engine().history_capacity, 20);
        assert_eq!(config.engine().default_retry_delay_ms, 250);

        let orchestrator = HealthOrchestrator::new(config.engine().clone());
        for check in config.checks() {
            assert_ok!(orchestrator.register(check.clone()));
        }

        let configs = orchestrator.list_configs();
        let ids: Vec<_> = configs.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["api", "db", "host"]);

        let api = orchestrator.get_config("api").unwrap();
        assert_eq!(api.check_type(), CheckType::Http);
        assert_eq!(api.retries, Some(2));
        assert!(api.tags.contains("edge"));

        assert!(orchestrator.is_scheduled("api"));
        assert!(!orchestrator.is_scheduled("db"));
        assert!(!orchestrator.is_scheduled("host"));

        orchestrator.shutdown();
    }

    #[test]
    fn test_load_with_blocking_runtime() {
        let file = write_config(CONFIG);
        let config = assert_ok!(tokio_test::block_on(Config::from_file(file.path())));
        assert_eq!(config.checks().len(), 3);
    }

    #[test]
    fn test_unknown_resource_kind_rejected() {
        let yaml = r#"
checks:
  - id: host
    name: Host
    type: system
    checks:
      - resource: gpu
        threshold: 90
"#;
        let err = Config::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, HealthError::Yaml(_)));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let yaml = r#"
checks:
  - id: api
    name: API
    type: http
    url: "https://example.com"
  - id: api
    name: API again
    type: http
    url: "https://example.org"
"#;
        let err = Config::from_yaml_str(yaml).unwrap_err();
        assert!(err.to_string().contains("api"));
    }

    #[test]
    fn test_dialect_must_match_connection_string() {
        let yaml = r#"
checks:
  - id: db
    name: DB
    type: database
    connectionString: "sqlite::memory:"
    dialect: postgres
"#;
        assert!(Config::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_yaml_export_reloads() {
        let config = Config::from_yaml_str(CONFIG).unwrap();
        let exported = config.to_yaml().unwrap();
        let reloaded = Config::from_yaml_str(&exported).unwrap();

        assert_eq!(reloaded.checks(), config.checks());
        assert_eq!(reloaded.engine(), config.engine());
    }
}
