//! Dashboard configuration.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// What to do with a row whose timestamp, date, side or number fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MalformedRowPolicy {
    /// Abort the run on the first malformed row
    Fail,
    /// Drop the row, log a warning and keep going
    Skip,
}

impl fmt::Display for MalformedRowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedRowPolicy::Fail => f.write_str("fail"),
            MalformedRowPolicy::Skip => f.write_str("skip"),
        }
    }
}

/// Configuration for parsing, comparison and rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Classification compared against the baseline in the insight rules
    pub primary_label: String,

    /// Classification the primary label is compared against
    pub baseline_label: String,

    /// Number of accounts listed in each ranked table
    pub top_accounts: usize,

    /// chrono format of the trade log's `Timestamp IST` column
    pub timestamp_format: String,

    /// Row-level parse failure handling
    pub on_malformed: MalformedRowPolicy,

    /// Default file name of the merged export
    pub export_file_name: String,

    /// Width in characters of the text chart panels
    pub chart_width: usize,

    /// Number of points the violin density is evaluated on
    pub density_points: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            primary_label: "Greed".to_string(),
            baseline_label: "Fear".to_string(),
            top_accounts: 3,
            timestamp_format: "%d-%m-%Y %H:%M".to_string(),
            on_malformed: MalformedRowPolicy::Fail,
            export_file_name: "merged_trader_sentiment.csv".to_string(),
            chart_width: 48,
            density_points: 32,
        }
    }
}

impl DashboardConfig {
    /// Load a configuration overlay from a JSON file.
    ///
    /// Keys absent from the file keep their default values.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        let config: Self = serde_json::from_reader(file)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.primary_label == self.baseline_label {
            anyhow::bail!(
                "primary and baseline classifications must differ (both '{}')",
                self.primary_label
            );
        }
        if self.top_accounts == 0 {
            anyhow::bail!("top_accounts must be at least 1");
        }
        if self.chart_width < 10 {
            anyhow::bail!("chart_width must be at least 10");
        }
        if self.density_points < 2 {
            anyhow::bail!("density_points must be at least 2");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_compare_greed_against_fear() {
        let config = DashboardConfig::default();
        assert_eq!(config.primary_label, "Greed");
        assert_eq!(config.baseline_label, "Fear");
        assert_eq!(config.top_accounts, 3);
        assert_eq!(config.on_malformed, MalformedRowPolicy::Fail);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_overlay_keeps_missing_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"top_accounts": 5, "on_malformed": "skip"}}"#).unwrap();

        let config = DashboardConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.top_accounts, 5);
        assert_eq!(config.on_malformed, MalformedRowPolicy::Skip);
        assert_eq!(config.timestamp_format, "%d-%m-%Y %H:%M");
    }

    #[test]
    fn test_identical_labels_rejected() {
        let config = DashboardConfig {
            baseline_label: "Greed".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
