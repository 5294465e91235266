//! Check definitions
//!
//! A [`CheckConfig`] describes one monitored target. The type-specific payload
//! is a tagged variant keyed by `type`, so a check's type and its payload can
//! never disagree.

use super::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::time::Duration;

/// Check category, used to look up the checker that evaluates it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckType {
    /// Network endpoint
    Http,
    /// Data-store connection
    Database,
    /// Local system resources
    System,
    /// User-supplied checker
    Custom,
}

impl CheckType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckType::Http => "http",
            CheckType::Database => "database",
            CheckType::System => "system",
            CheckType::Custom => "custom",
        }
    }
}

impl fmt::Display for CheckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration of a single health check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckConfig {
    /// Unique, immutable identifier
    pub id: String,
    /// Human readable name
    pub name: String,
    /// Whether the check is scheduled and included in batch executions
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Scheduling interval in milliseconds; 0 disables scheduling
    #[serde(default)]
    pub interval: u64,
    /// Per-attempt timeout in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    /// Retry attempts after the first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
    /// Delay between attempts in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_delay: Option<u64>,
    /// Free-form labels
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
    /// Type tag and type-specific payload
    #[serde(flatten)]
    pub spec: CheckSpec,
}

impl CheckConfig {
    /// Create an enabled, unscheduled check
    pub fn new(id: impl Into<String>, name: impl Into<String>, spec: CheckSpec) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            enabled: true,
            interval: 0,
            timeout: None,
            retries: None,
            retry_delay: None,
            tags: BTreeSet::new(),
            spec,
        }
    }

    pub fn with_interval(mut self, interval_ms: u64) -> Self {
        self.interval = interval_ms;
        self
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = Some(timeout_ms);
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    pub fn with_retry_delay(mut self, retry_delay_ms: u64) -> Self {
        self.retry_delay = Some(retry_delay_ms);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[inline]
    pub fn check_type(&self) -> CheckType {
        self.spec.check_type()
    }

    /// Scheduling period, `None` when scheduling is disabled
    pub fn interval_duration(&self) -> Option<Duration> {
        (self.interval > 0).then(|| Duration::from_millis(self.interval))
    }

    /// Whether the scheduler should run a timer for this check
    #[inline]
    pub fn is_schedulable(&self) -> bool {
        self.enabled && self.interval > 0
    }
}

/// Type-specific check payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CheckSpec {
    Http(HttpCheckSpec),
    Database(DatabaseCheckSpec),
    System(SystemCheckSpec),
    Custom(CustomCheckSpec),
}

impl CheckSpec {
    pub fn check_type(&self) -> CheckType {
        match self {
            CheckSpec::Http(_) => CheckType::Http,
            CheckSpec::Database(_) => CheckType::Database,
            CheckSpec::System(_) => CheckType::System,
            CheckSpec::Custom(_) => CheckType::Custom,
        }
    }
}

/// Network endpoint check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpCheckSpec {
    /// Target URL
    pub url: String,
    /// HTTP method
    #[serde(default = "default_method")]
    pub method: String,
    /// Extra request headers
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    /// Status codes considered a pass
    #[serde(default = "default_expected_status_codes")]
    pub expected_status_codes: Vec<u16>,
    /// Optional response body matcher
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_body: Option<BodyMatcher>,
}

impl HttpCheckSpec {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: default_method(),
            headers: BTreeMap::new(),
            expected_status_codes: default_expected_status_codes(),
            expected_body: None,
        }
    }
}

/// Response body expectation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BodyMatcher {
    /// Body must contain this text
    Contains(String),
    /// Body must match this regular expression
    Regex { regex: String },
}

/// SQL dialect of a data-store check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseDialect {
    Postgres,
    Sqlite,
}

impl DatabaseDialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseDialect::Postgres => "postgres",
            DatabaseDialect::Sqlite => "sqlite",
        }
    }

    /// URL schemes accepted for this dialect
    pub fn schemes(&self) -> &'static [&'static str] {
        match self {
            DatabaseDialect::Postgres => &["postgres", "postgresql"],
            DatabaseDialect::Sqlite => &["sqlite"],
        }
    }

    /// Infer the dialect from a connection string
    pub fn from_connection_string(connection_string: &str) -> Option<Self> {
        let scheme = connection_string.split(':').next()?;
        [DatabaseDialect::Postgres, DatabaseDialect::Sqlite]
            .into_iter()
            .find(|dialect| dialect.schemes().contains(&scheme))
    }
}

/// Data-store connection check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseCheckSpec {
    /// Connection URL, e.g. `postgres://user@host/db` or `sqlite::memory:`
    pub connection_string: String,
    /// Dialect; inferred from the connection string when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialect: Option<DatabaseDialect>,
    /// Query to run; a trivial liveness query when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Expected value of the first row
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_result: Option<serde_json::Value>,
}

impl DatabaseCheckSpec {
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            dialect: None,
            query: None,
            expected_result: None,
        }
    }
}

/// Local resource kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Memory,
    Cpu,
    Disk,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Memory => "memory",
            ResourceKind::Cpu => "cpu",
            ResourceKind::Disk => "disk",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One resource sub-check; values and thresholds are percentages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceCheck {
    pub resource: ResourceKind,
    pub threshold: f64,
    /// Filesystem path for disk checks, `/` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ResourceCheck {
    pub fn new(resource: ResourceKind, threshold: f64) -> Self {
        Self {
            resource,
            threshold,
            path: None,
        }
    }

    /// Key under which this sub-check is reported in result metadata
    pub fn metadata_key(&self) -> String {
        match &self.path {
            Some(path) => format!("{}:{}", self.resource, path),
            None => self.resource.to_string(),
        }
    }
}

/// Local system resource check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemCheckSpec {
    /// Sub-checks, evaluated in order
    pub checks: Vec<ResourceCheck>,
}

/// Check evaluated by a user-registered checker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomCheckSpec {
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub params: serde_json::Map<String, serde_json::Value>,
}
