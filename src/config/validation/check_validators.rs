//! Check configuration validators

use super::Validate;
use crate::config::models::*;

impl Validate for CheckConfig {
    fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("Check id cannot be empty".to_string());
        }

        if self.name.trim().is_empty() {
            return Err(format!("Check {} must have a name", self.id));
        }

        if self.interval > MAX_INTERVAL_MS {
            return Err(format!(
                "Check {} interval must be at most {}ms",
                self.id, MAX_INTERVAL_MS
            ));
        }

        if self.timeout == Some(0) {
            return Err(format!("Check {} timeout must be greater than 0", self.id));
        }

        let spec_result = match &self.spec {
            CheckSpec::Http(http) => http.validate(),
            CheckSpec::Database(database) => database.validate(),
            CheckSpec::System(system) => system.validate(),
            CheckSpec::Custom(_) => Ok(()),
        };

        spec_result.map_err(|e| format!("Check {}: {}", self.id, e))
    }
}

impl Validate for HttpCheckSpec {
    fn validate(&self) -> Result<(), String> {
        let parsed =
            url::Url::parse(&self.url).map_err(|e| format!("Invalid URL {}: {}", self.url, e))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(format!("URL scheme must be http or https: {}", self.url));
        }

        if reqwest::Method::from_bytes(self.method.to_uppercase().as_bytes()).is_err() {
            return Err(format!("Invalid HTTP method: {}", self.method));
        }

        if self.expected_status_codes.is_empty() {
            return Err("At least one expected status code is required".to_string());
        }

        if let Some(code) = self
            .expected_status_codes
            .iter()
            .find(|code| !(100..=599).contains(*code))
        {
            return Err(format!("Invalid expected status code: {}", code));
        }

        if let Some(BodyMatcher::Regex { regex }) = &self.expected_body {
            regex::Regex::new(regex).map_err(|e| format!("Invalid body regex: {}", e))?;
        }

        Ok(())
    }
}

impl Validate for DatabaseCheckSpec {
    fn validate(&self) -> Result<(), String> {
        if self.connection_string.trim().is_empty() {
            return Err("Connection string cannot be empty".to_string());
        }

        if let Some(dialect) = self.dialect {
            let scheme = self.connection_string.split(':').next().unwrap_or_default();
            if !dialect.schemes().contains(&scheme) {
                return Err(format!(
                    "Connection string scheme '{}' does not match dialect {}",
                    scheme,
                    dialect.as_str()
                ));
            }
        }

        if matches!(&self.query, Some(query) if query.trim().is_empty()) {
            return Err("Query cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Validate for SystemCheckSpec {
    fn validate(&self) -> Result<(), String> {
        if self.checks.is_empty() {
            return Err("At least one resource check is required".to_string());
        }

        for check in &self.checks {
            if !check.threshold.is_finite() || check.threshold <= 0.0 {
                return Err(format!(
                    "Threshold for {} must be a positive number",
                    check.resource
                ));
            }
            if check.resource != ResourceKind::Disk && check.path.is_some() {
                return Err(format!(
                    "Path is only supported for disk checks, not {}",
                    check.resource
                ));
            }
        }

        Ok(())
    }
}
