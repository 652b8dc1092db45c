// SPDX-License-Identifier: PMPL-1.0-or-later
//! Configuration for a11yguard

use crate::error::{GuardError, Result};
use crate::finding::Severity;
use crate::report::ReportFormat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Per-rule override: `true | false | "warn" | "error"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRuleSetting", into = "RawRuleSetting")]
pub enum RuleSetting {
    /// Run with the rule's nominal severity
    On,
    /// Skip the rule entirely
    Off,
    /// Run, capping severity at `moderate`
    Warn,
    /// Run, raising severity to at least `serious`
    Error,
}

impl RuleSetting {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, RuleSetting::Off)
    }

    /// Effective severity of a finding produced under this setting
    pub fn apply(&self, nominal: Severity) -> Severity {
        match self {
            RuleSetting::Warn => nominal.min(Severity::Moderate),
            RuleSetting::Error => nominal.max(Severity::Serious),
            RuleSetting::On | RuleSetting::Off => nominal,
        }
    }
}

impl std::str::FromStr for RuleSetting {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "on" | "true" => Ok(RuleSetting::On),
            "off" | "false" => Ok(RuleSetting::Off),
            "warn" => Ok(RuleSetting::Warn),
            "error" => Ok(RuleSetting::Error),
            other => Err(format!("Unknown rule setting: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawRuleSetting {
    Flag(bool),
    Level(String),
}

impl TryFrom<RawRuleSetting> for RuleSetting {
    type Error = String;

    fn try_from(raw: RawRuleSetting) -> std::result::Result<Self, String> {
        match raw {
            RawRuleSetting::Flag(true) => Ok(RuleSetting::On),
            RawRuleSetting::Flag(false) => Ok(RuleSetting::Off),
            RawRuleSetting::Level(level) => match level.as_str() {
                "warn" => Ok(RuleSetting::Warn),
                "error" => Ok(RuleSetting::Error),
                other => Err(format!("expected true, false, \"warn\" or \"error\", got \"{}\"", other)),
            },
        }
    }
}

impl From<RuleSetting> for RawRuleSetting {
    fn from(setting: RuleSetting) -> Self {
        match setting {
            RuleSetting::On => RawRuleSetting::Flag(true),
            RuleSetting::Off => RawRuleSetting::Flag(false),
            RuleSetting::Warn => RawRuleSetting::Level("warn".to_string()),
            RuleSetting::Error => RawRuleSetting::Level("error".to_string()),
        }
    }
}

/// Caller-supplied validation options, immutable for the duration of a call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidatorConfig {
    /// Per-rule overrides keyed by rule name
    pub rules: BTreeMap<String, RuleSetting>,
    /// Errors below this severity are dropped
    pub min_severity: Severity,
    /// Strip fix suggestions from the output when false
    pub include_fixes: bool,
    pub format: ReportFormat,
    pub fail_on_warnings: bool,
    /// Directories skipped by the scanner
    pub exclude: Vec<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            rules: BTreeMap::new(),
            min_severity: Severity::Minor,
            include_fixes: true,
            format: ReportFormat::Console,
            fail_on_warnings: false,
            exclude: vec![
                "node_modules".to_string(),
                ".git".to_string(),
                "target".to_string(),
                "dist".to_string(),
                "build".to_string(),
                "storybook-static".to_string(),
                "coverage".to_string(),
            ],
        }
    }
}

impl ValidatorConfig {
    /// Setting for a rule; unlisted rules are on
    pub fn rule(&self, name: &str) -> RuleSetting {
        self.rules.get(name).copied().unwrap_or(RuleSetting::On)
    }

    pub fn with_rule(mut self, name: &str, setting: RuleSetting) -> Self {
        self.rules.insert(name.to_string(), setting);
        self
    }

    pub fn with_min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    pub fn without_fixes(mut self) -> Self {
        self.include_fixes = false;
        self
    }

    pub fn failing_on_warnings(mut self) -> Self {
        self.fail_on_warnings = true;
        self
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("a11yguard")
        .join("config.yml")
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|s| s.to_str())
}

fn is_toml(path: &Path) -> bool {
    extension(path) == Some("toml")
}

pub fn load_config(path: &Path) -> Result<ValidatorConfig> {
    if !path.exists() {
        return Ok(ValidatorConfig::default());
    }

    let content = std::fs::read_to_string(path)?;

    let config = match extension(path) {
        Some("toml") => toml::from_str(&content)?,
        Some("json") => serde_json::from_str(&content)?,
        _ => serde_yaml::from_str(&content)?,
    };
    Ok(config)
}

pub fn write_default_config(path: &Path) -> Result<()> {
    let config = ValidatorConfig::default()
        .with_rule("aria-redundant-role", RuleSetting::Warn);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let content = if is_toml(path) {
        toml::to_string_pretty(&config)
            .map_err(|e| GuardError::Config(format!("TOML serialize error: {}", e)))?
    } else {
        serde_yaml::to_string(&config)?
    };

    std::fs::write(path, content)?;
    Ok(())
}
