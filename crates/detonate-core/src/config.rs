//! Analyzer configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{AnalysisError, Result};
use crate::scoring::{default_rules, RiskRule, ScoreWeights};

/// Configuration for one analysis run.
///
/// Every field has a default, so a config file only needs the keys it
/// changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Root walked by file snapshots (default: /sandbox).
    pub watch_root: PathBuf,

    /// Directory the host drops the target into (default: /sandbox/input).
    pub input_dir: PathBuf,

    /// Where the JSON report is written.
    pub output_path: PathBuf,

    /// Working directory for the target (default: `watch_root`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workdir: Option<PathBuf>,

    /// Wall-clock deadline for the target, in seconds.
    pub timeout_secs: u64,

    /// Wait between execution and the post snapshot, in milliseconds.
    pub settle_delay_ms: u64,

    /// Cap on captured bytes per output stream.
    pub max_output_bytes: usize,

    /// Extensions read as text instead of executed.
    pub text_extensions: Vec<String>,

    /// Extension -> interpreter program.
    pub interpreters: BTreeMap<String, String>,

    /// Per-event score weights.
    pub weights: ScoreWeights,

    /// Keyword rule table.
    pub rules: Vec<RiskRule>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            watch_root: PathBuf::from("/sandbox"),
            input_dir: PathBuf::from("/sandbox/input"),
            output_path: PathBuf::from("/sandbox/output/analysis_results.json"),
            workdir: None,
            timeout_secs: 30,
            settle_delay_ms: 2000,
            max_output_bytes: 1024 * 1024,
            text_extensions: vec!["txt".into(), "log".into()],
            interpreters: default_interpreters(),
            weights: ScoreWeights::default(),
            rules: default_rules(),
        }
    }
}

fn default_interpreters() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("py".to_string(), "python3".to_string()),
        ("sh".to_string(), "bash".to_string()),
    ])
}

impl AnalyzerConfig {
    /// Load config from a TOML file, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .map_err(|e| AnalysisError::io(path.display().to_string(), e))?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| AnalysisError::Config(e.to_string()))
    }

    /// Render the effective config as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| AnalysisError::Config(e.to_string()))
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub const fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Working directory for the target.
    pub fn workdir(&self) -> &Path {
        self.workdir.as_deref().unwrap_or(&self.watch_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.settle_delay(), Duration::from_secs(2));
        assert_eq!(config.workdir(), Path::new("/sandbox"));
        assert_eq!(config.interpreters.get("py").map(String::as_str), Some("python3"));
        assert_eq!(config.interpreters.get("sh").map(String::as_str), Some("bash"));
        assert_eq!(config.weights.file_created, 5);
        assert_eq!(config.weights.process_spawned, 10);
        assert_eq!(config.rules.len(), 3);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AnalyzerConfig::from_toml(
            r#"
            timeout_secs = 5
            watch_root = "/tmp/box"

            [interpreters]
            rb = "ruby"
            "#,
        )
        .unwrap();

        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.workdir(), Path::new("/tmp/box"));
        assert_eq!(config.interpreters.get("rb").map(String::as_str), Some("ruby"));
        assert_eq!(config.settle_delay_ms, 2000);
        assert_eq!(config.rules.len(), 3);
    }

    #[test]
    fn test_custom_rules_replace_table() {
        let config = AnalyzerConfig::from_toml(
            r#"
            [[rules]]
            category = "crypto_mining"
            keywords = ["xmrig", "minerd"]
            weight = 40
            "#,
        )
        .unwrap();

        assert_eq!(config.rules.len(), 1);
        assert_eq!(config.rules[0].weight, 40);
        assert_eq!(config.rules[0].category.to_string(), "crypto_mining");
    }

    #[test]
    fn test_config_keywords_match_case_insensitively() {
        use crate::scoring::score_signals;
        use crate::types::ProcessEvent;
        use chrono::Utc;

        let config = AnalyzerConfig::from_toml(
            r#"
            [[rules]]
            category = "crypto_mining"
            keywords = ["XMRig"]
            "#,
        )
        .unwrap();
        assert_eq!(config.rules[0].keywords, vec!["xmrig"]);

        let miner = ProcessEvent {
            pid: 4242,
            name: "XMRig".into(),
            cmdline: vec!["./XMRig".into()],
            observed_at: Utc::now(),
        };
        let signals = score_signals(&[miner], &config.rules);

        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].keyword, "xmrig");
        assert_eq!(signals[0].weight, 20);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AnalyzerConfig::from_toml("timeout_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalyzerConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AnalyzerConfig::default();
        let text = config.to_toml().unwrap();
        let parsed = AnalyzerConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.output_path, config.output_path);
        assert_eq!(parsed.rules, config.rules);
        assert_eq!(parsed.interpreters, config.interpreters);
    }
}
