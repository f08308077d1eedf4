//! Logging configuration for Wanderer
//!
//! Log events are emitted through `tracing` when the `logging` feature is
//! enabled. Values that reach a log line pass through [`LogConfig`] first so
//! that exported secrets and oversized file contents stay out of the logs.
//!
//! # Log Levels
//!
//! - **WARN**: Rejected commands
//! - **INFO**: Kernel boot/shutdown, shell session lifecycle
//! - **DEBUG**: Command dispatch, filesystem mutation, environment changes
//! - **TRACE**: Completion candidates

use std::borrow::Cow;
use std::collections::HashSet;

/// Configuration for what may appear in log lines.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Whether to redact values of sensitive-looking variables (default: true)
    pub redact_sensitive: bool,

    /// Environment variable name fragments to redact (case-insensitive)
    pub redact_env_vars: HashSet<String>,

    /// Maximum length of logged values before truncation (default: 120)
    pub max_value_length: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        let redact_env_vars = [
            "PASSWORD", "PASSWD", "SECRET", "TOKEN", "KEY", "CREDENTIAL", "AUTH", "PRIVATE",
            "SESSION", "COOKIE",
        ]
        .iter()
        .map(|pattern| pattern.to_string())
        .collect();

        Self {
            redact_sensitive: true,
            redact_env_vars,
            max_value_length: 120,
        }
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable redaction (debugging only)
    pub fn unsafe_disable_redaction(mut self) -> Self {
        self.redact_sensitive = false;
        self
    }

    /// Add a variable name fragment to redact
    pub fn redact_env(mut self, pattern: &str) -> Self {
        self.redact_env_vars.insert(pattern.to_uppercase());
        self
    }

    pub fn max_value_length(mut self, len: usize) -> Self {
        self.max_value_length = len;
        self
    }

    /// Check if an environment variable name should be redacted
    pub fn should_redact_env(&self, name: &str) -> bool {
        if !self.redact_sensitive {
            return false;
        }
        let upper = name.to_uppercase();
        self.redact_env_vars
            .iter()
            .any(|pattern| upper.contains(pattern))
    }

    /// Value of an environment variable as it may be logged
    pub fn env_value<'a>(&self, name: &str, value: &'a str) -> Cow<'a, str> {
        if self.should_redact_env(name) {
            Cow::Borrowed("[REDACTED]")
        } else {
            self.truncate(value)
        }
    }

    /// Truncate a value on a char boundary
    pub fn truncate<'a>(&self, value: &'a str) -> Cow<'a, str> {
        if value.len() <= self.max_value_length {
            return Cow::Borrowed(value);
        }
        let mut end = self.max_value_length;
        while end > 0 && !value.is_char_boundary(end) {
            end -= 1;
        }
        Cow::Owned(format!(
            "{}...[truncated {} bytes]",
            &value[..end],
            value.len() - end
        ))
    }
}
