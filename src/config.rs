//! Configuration management and validation.
//!
//! The only operator-facing setting is the chrono pattern used for DATE
//! fields. FileMaker writes dates using the exporting machine's locale, so
//! this must match the export (e.g. `%m/%d/%Y` for US systems).

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::DEFAULT_DATE_FORMAT;
use crate::error::{FmpError, Result};

/// Settings for a single import run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// chrono strftime pattern for DATE fields
    pub date_format: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl ImportConfig {
    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }

    /// Reject patterns chrono cannot use for parsing dates
    pub fn validate(&self) -> Result<()> {
        if self.date_format.trim().is_empty() {
            return Err(FmpError::configuration("Date format must not be empty"));
        }

        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(FmpError::configuration(format!(
                "Invalid date format '{}'",
                self.date_format
            )));
        }

        debug!("Using date format '{}'", self.date_format);
        Ok(())
    }
}
