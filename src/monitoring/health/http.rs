//! Network endpoint checker

use async_trait::async_trait;
use reqwest::Method;
use std::time::{Duration, Instant};
use tracing::debug;

use super::{CheckOutcome, Checker, CheckerError, classify_latency};
use crate::config::{BodyMatcher, CheckConfig, CheckSpec, CheckType, HttpCheckSpec};
use crate::monitoring::types::HealthStatus;

/// Checker issuing one HTTP request per attempt
///
/// A response outside `expectedStatusCodes`, or whose body fails the
/// `expectedBody` matcher, is an attempt failure and is therefore retried.
#[derive(Debug, Clone)]
pub struct HttpChecker {
    client: reqwest::Client,
}

impl HttpChecker {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("healthwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self { client }
    }

    /// Use a preconfigured client (proxies, TLS roots, ...)
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn body_matches(matcher: &BodyMatcher, body: &str) -> Result<bool, CheckerError> {
        match matcher {
            BodyMatcher::Contains(needle) => Ok(body.contains(needle.as_str())),
            BodyMatcher::Regex { regex } => {
                let pattern = regex::Regex::new(regex)
                    .map_err(|e| CheckerError::invalid_config(format!("Invalid body regex: {}", e)))?;
                Ok(pattern.is_match(body))
            }
        }
    }

    fn spec(config: &CheckConfig) -> Result<&HttpCheckSpec, CheckerError> {
        match &config.spec {
            CheckSpec::Http(spec) => Ok(spec),
            other => Err(CheckerError::invalid_config(format!(
                "HTTP checker cannot evaluate a {} check",
                other.check_type()
            ))),
        }
    }
}

impl Default for HttpChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Checker for HttpChecker {
    fn check_type(&self) -> CheckType {
        CheckType::Http
    }

    async fn evaluate(
        &self,
        config: &CheckConfig,
        timeout: Duration,
    ) -> Result<CheckOutcome, CheckerError> {
        let spec = Self::spec(config)?;
        let method = Method::from_bytes(spec.method.to_uppercase().as_bytes())
            .map_err(|_| CheckerError::invalid_config(format!("Invalid HTTP method: {}", spec.method)))?;

        let mut request = self.client.request(method.clone(), &spec.url).timeout(timeout);
        for (name, value) in &spec.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        debug!("HTTP check {} requesting {} {}", config.id, method, spec.url);
        let start = Instant::now();

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                CheckerError::Timeout(timeout)
            } else {
                CheckerError::Http(e)
            }
        })?;

        let status_code = response.status().as_u16();
        if !spec.expected_status_codes.contains(&status_code) {
            return Err(CheckerError::UnexpectedStatus {
                actual: status_code,
                expected: spec.expected_status_codes.clone(),
            });
        }

        if let Some(matcher) = &spec.expected_body {
            let body = response.text().await.map_err(|e| {
                if e.is_timeout() {
                    CheckerError::Timeout(timeout)
                } else {
                    CheckerError::Http(e)
                }
            })?;
            if !Self::body_matches(matcher, &body)? {
                return Err(CheckerError::BodyMismatch(format!(
                    "expected {:?} in response from {}",
                    matcher, spec.url
                )));
            }
        }

        let elapsed = start.elapsed();
        let elapsed_ms = elapsed.as_millis() as u64;
        let status = classify_latency(elapsed, timeout);

        let message = match status {
            HealthStatus::Degraded => format!(
                "HTTP {} in {}ms, above 80% of the {}ms timeout",
                status_code,
                elapsed_ms,
                timeout.as_millis()
            ),
            _ => format!("HTTP {} in {}ms", status_code, elapsed_ms),
        };

        Ok(CheckOutcome::new(status, message)
            .with_metadata("statusCode", status_code)
            .with_metadata("responseTime", elapsed_ms)
            .with_metadata("url", spec.url.clone())
            .with_metadata("method", method.as_str()))
    }
}
