//! Printer configuration
//!
//! # Environment variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | ESCPOS_CODE_PAGE | latin9 | `latin9` or `gbk` |
//! | ESCPOS_WRITE_TIMEOUT_MS | 10000 | Per-write deadline, 0 disables |
//! | ESCPOS_CONNECT_TIMEOUT_MS | 5000 | TCP connect timeout |

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::encoding::CodePage;
use crate::error::{PrintError, PrintResult};

const DEFAULT_WRITE_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

/// Printer connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterConfig {
    /// Code page text is converted to
    pub code_page: CodePage,
    /// Deadline applied before each write; `None` disables it
    pub write_timeout_ms: Option<u64>,
    /// TCP connect timeout
    pub connect_timeout_ms: u64,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            code_page: CodePage::default(),
            write_timeout_ms: Some(DEFAULT_WRITE_TIMEOUT_MS),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
        }
    }
}

impl PrinterConfig {
    /// Load from environment variables
    ///
    /// Unset or unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            code_page: lookup("ESCPOS_CODE_PAGE")
                .and_then(|v| CodePage::parse(&v))
                .unwrap_or(defaults.code_page),
            write_timeout_ms: match lookup("ESCPOS_WRITE_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
                Some(0) => None,
                Some(ms) => Some(ms),
                None => defaults.write_timeout_ms,
            },
            connect_timeout_ms: lookup("ESCPOS_CONNECT_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.connect_timeout_ms),
        }
    }

    /// Parse from JSON; missing fields take defaults
    pub fn from_json(s: &str) -> PrintResult<Self> {
        serde_json::from_str(s).map_err(|e| PrintError::InvalidConfig(e.to_string()))
    }

    pub fn with_code_page(mut self, code_page: CodePage) -> Self {
        self.code_page = code_page;
        self
    }

    pub fn with_write_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.write_timeout_ms = timeout.map(|t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Write deadline, if any (zero counts as none)
    pub fn write_timeout(&self) -> Option<Duration> {
        self.write_timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}
