// SPDX-License-Identifier: PMPL-1.0-or-later
//! Validation result types.
//!
//! `ValidationResult` and everything nested in it form the JSON wire contract
//! consumed by CI gates and agent tool calls, so field names are camelCase
//! and every map is ordered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Violation impact level, ordered `minor < moderate < serious < critical`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Cosmetic or best-practice issue
    Minor,
    /// Degrades the experience for some users
    Moderate,
    /// Blocks some users from some content
    Serious,
    /// Blocks users from core functionality
    Critical,
}

impl Severity {
    /// All severities, lowest first
    pub const ALL: [Severity; 4] = [
        Severity::Minor,
        Severity::Moderate,
        Severity::Serious,
        Severity::Critical,
    ];

    /// Whether an error at this severity blocks the gate
    pub fn blocks_release(&self) -> bool {
        *self >= Severity::Serious
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Minor => "minor",
            Severity::Moderate => "moderate",
            Severity::Serious => "serious",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minor" => Ok(Severity::Minor),
            "moderate" => Ok(Severity::Moderate),
            "serious" => Ok(Severity::Serious),
            "critical" => Ok(Severity::Critical),
            other => Err(format!("Unknown severity: {}", other)),
        }
    }
}

/// Rule category; every error belongs to exactly one
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    ColorContrast,
    Landmarks,
    Keyboard,
    Aria,
    Forms,
    Images,
    Links,
    Tables,
    Structure,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::ColorContrast,
        Category::Landmarks,
        Category::Keyboard,
        Category::Aria,
        Category::Forms,
        Category::Images,
        Category::Links,
        Category::Tables,
        Category::Structure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::ColorContrast => "color-contrast",
            Category::Landmarks => "landmarks",
            Category::Keyboard => "keyboard",
            Category::Aria => "aria",
            Category::Forms => "forms",
            Category::Images => "images",
            Category::Links => "links",
            Category::Tables => "tables",
            Category::Structure => "structure",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall gate outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    Passed,
    Blocked,
    Warning,
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationStatus::Passed => write!(f, "PASSED"),
            ValidationStatus::Blocked => write!(f, "BLOCKED"),
            ValidationStatus::Warning => write!(f, "WARNING"),
        }
    }
}

/// A suggested remediation for a violation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixSuggestion {
    pub description: String,
    pub example: String,
    pub auto_fixable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs_url: Option<String>,
}

impl FixSuggestion {
    pub fn new(description: impl Into<String>, example: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            example: example.into(),
            auto_fixable: false,
            docs_url: None,
        }
    }

    /// Mark as mechanically applicable
    pub fn auto_fixable(mut self) -> Self {
        self.auto_fixable = true;
        self
    }

    pub fn with_docs(mut self, url: &str) -> Self {
        self.docs_url = Some(url.to_string());
        self
    }
}

/// Source coordinates of the offending node (1-indexed)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub file: String,
    pub line: usize,
    pub column: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_column: Option<usize>,
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

impl SourceLocation {
    /// `file:line:column`, followed by `-endLine:endColumn` when the end is known
    pub fn range(&self) -> String {
        match (self.end_line, self.end_column) {
            (Some(end_line), Some(end_column)) => format!("{}-{}:{}", self, end_line, end_column),
            _ => self.to_string(),
        }
    }
}

/// Free-form diagnostic data attached to an error
pub type ErrorContext = BTreeMap<String, serde_json::Value>;

/// One detected violation instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct A11yError {
    /// `<rule>-<ordinal>`, unique within a result
    pub id: String,
    pub rule: String,
    pub category: Category,
    pub severity: Severity,
    pub message: String,
    pub element: String,
    pub selector: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
    #[serde(default)]
    pub context: ErrorContext,
    #[serde(default)]
    pub fixes: Vec<FixSuggestion>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wcag_criteria: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_url: Option<String>,
}

impl A11yError {
    /// Create a new error; the id is assigned once the result is assembled
    pub fn new(rule: &str, category: Category, severity: Severity, message: &str) -> Self {
        Self {
            id: String::new(),
            rule: rule.to_string(),
            category,
            severity,
            message: message.to_string(),
            element: String::new(),
            selector: String::new(),
            location: None,
            context: ErrorContext::new(),
            fixes: Vec::new(),
            wcag_criteria: Vec::new(),
            help_url: None,
        }
    }

    pub fn with_element(mut self, element: &str) -> Self {
        self.element = element.to_string();
        self
    }

    pub fn with_selector(mut self, selector: &str) -> Self {
        self.selector = selector.to_string();
        self
    }

    pub fn with_location(mut self, location: Option<SourceLocation>) -> Self {
        self.location = location;
        self
    }

    /// Add one diagnostic entry
    pub fn with_context(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }

    pub fn with_fixes(mut self, fixes: Vec<FixSuggestion>) -> Self {
        self.fixes = fixes;
        self
    }

    pub fn with_wcag(mut self, criteria: &[&str]) -> Self {
        self.wcag_criteria = criteria.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_help_url(mut self, url: &str) -> Self {
        self.help_url = Some(url.to_string());
        self
    }

    /// Whether at least one attached fix can be applied mechanically
    pub fn is_auto_fixable(&self) -> bool {
        self.fixes.iter().any(|f| f.auto_fixable)
    }
}

/// Aggregate counts derived from a result's errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub total: usize,
    pub by_severity: BTreeMap<Severity, usize>,
    pub by_category: BTreeMap<Category, usize>,
    pub auto_fixable: usize,
    pub passed: bool,
}

impl ValidationSummary {
    /// Derive the summary; every severity and category key is present
    pub fn from_errors(errors: &[A11yError]) -> Self {
        let mut by_severity: BTreeMap<Severity, usize> =
            Severity::ALL.iter().map(|s| (*s, 0)).collect();
        let mut by_category: BTreeMap<Category, usize> =
            Category::ALL.iter().map(|c| (*c, 0)).collect();

        for error in errors {
            *by_severity.entry(error.severity).or_insert(0) += 1;
            *by_category.entry(error.category).or_insert(0) += 1;
        }

        Self {
            total: errors.len(),
            by_severity,
            by_category,
            auto_fixable: errors.iter().filter(|e| e.is_auto_fixable()).count(),
            passed: errors.is_empty(),
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.by_severity.get(&severity).copied().unwrap_or(0)
    }
}

/// Outcome of one validation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub status: ValidationStatus,
    pub component: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub errors: Vec<A11yError>,
    pub summary: ValidationSummary,
    /// Wall-clock milliseconds
    #[serde(rename = "duration")]
    pub duration_ms: u64,
}

impl ValidationResult {
    /// Errors at exactly the given severity, in discovery order
    pub fn by_severity(&self, severity: Severity) -> Vec<&A11yError> {
        self.errors.iter().filter(|e| e.severity == severity).collect()
    }

    pub fn by_category(&self, category: Category) -> Vec<&A11yError> {
        self.errors.iter().filter(|e| e.category == category).collect()
    }

    pub fn by_rule(&self, rule: &str) -> Vec<&A11yError> {
        self.errors.iter().filter(|e| e.rule == rule).collect()
    }

    pub fn is_passed(&self) -> bool {
        self.status == ValidationStatus::Passed
    }

    /// Whether a gate configured with `fail_on_warnings` should reject this result
    pub fn fails(&self, fail_on_warnings: bool) -> bool {
        match self.status {
            ValidationStatus::Blocked => true,
            ValidationStatus::Warning => fail_on_warnings,
            ValidationStatus::Passed => false,
        }
    }
}
