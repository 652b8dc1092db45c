// SPDX-License-Identifier: PMPL-1.0-or-later
//! Report generation for validation results.
//!
//! Supports multiple output formats:
//! - Console: human-readable errors grouped by severity, fixes inlined
//! - JSON: the lossless `ValidationResult` wire form
//! - HTML: a self-contained document for sharing or archiving
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI integration

use crate::finding::{A11yError, Severity, ValidationResult, ValidationStatus};
use crate::rules::RULES;
use serde::{Deserialize, Serialize};

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable text
    #[default]
    Console,
    /// Structured JSON
    Json,
    /// Standalone HTML document
    Html,
    /// SARIF for IDE/CI integration
    Sarif,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Console => write!(f, "console"),
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Html => write!(f, "html"),
            ReportFormat::Sarif => write!(f, "sarif"),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" | "text" => Ok(ReportFormat::Console),
            "json" => Ok(ReportFormat::Json),
            "html" => Ok(ReportFormat::Html),
            "sarif" => Ok(ReportFormat::Sarif),
            other => Err(format!("Unknown report format: {}", other)),
        }
    }
}

/// Render one validation result
pub fn generate_report(result: &ValidationResult, format: ReportFormat) -> String {
    match format {
        ReportFormat::Console => generate_console_report(result),
        ReportFormat::Json => to_json(result, "validation result"),
        ReportFormat::Html => html_document(std::slice::from_ref(result)),
        ReportFormat::Sarif => generate_sarif_report(std::slice::from_ref(result)),
    }
}

/// Render the results of a directory scan
pub fn generate_scan_report(results: &[ValidationResult], format: ReportFormat) -> String {
    match format {
        ReportFormat::Console => {
            let mut output = String::new();
            for result in results {
                output.push_str(&generate_console_report(result));
                output.push('\n');
            }

            let failed = results.iter().filter(|r| !r.is_passed()).count();
            let total: usize = results.iter().map(|r| r.summary.total).sum();
            output.push_str(&format!(
                "Scanned {} file(s): {} with issues, {} error(s) in total\n",
                results.len(),
                failed,
                total
            ));
            output
        }
        ReportFormat::Json => to_json(&results, "scan results"),
        ReportFormat::Html => html_document(results),
        ReportFormat::Sarif => generate_sarif_report(results),
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, what: &str) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        serde_json::json!({ "error": format!("Failed to serialize {}: {}", what, e) }).to_string()
    })
}

/// Generate human-readable console report
fn generate_console_report(result: &ValidationResult) -> String {
    let mut output = String::new();

    let target = match &result.file {
        Some(file) => format!("{} ({})", result.component, file),
        None => result.component.clone(),
    };
    output.push_str(&format!("=== a11yguard: {} ===\n\n", target));

    if result.errors.is_empty() {
        output.push_str("No accessibility issues found. All checks passed.\n");
        output.push_str(&format!("RESULT: {}\n", result.status));
        return output;
    }

    let summary = &result.summary;
    output.push_str(&format!(
        "Found {} issue(s): {} critical, {} serious, {} moderate, {} minor ({} auto-fixable)\n\n",
        summary.total,
        summary.count(Severity::Critical),
        summary.count(Severity::Serious),
        summary.count(Severity::Moderate),
        summary.count(Severity::Minor),
        summary.auto_fixable
    ));

    for severity in Severity::ALL.iter().rev() {
        let errors = result.by_severity(*severity);
        if errors.is_empty() {
            continue;
        }

        output.push_str(&format!("--- {} ({}) ---\n", severity, errors.len()));
        for error in errors {
            push_console_error(&mut output, error);
        }
    }

    let by_category: Vec<String> = summary
        .by_category
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(category, count)| format!("{} {}", category, count))
        .collect();
    output.push_str(&format!("By category: {}\n", by_category.join(", ")));

    match result.status {
        ValidationStatus::Blocked => output.push_str("RESULT: BLOCKED (serious or critical errors found)\n"),
        ValidationStatus::Warning => output.push_str("RESULT: WARNING\n"),
        ValidationStatus::Passed => output.push_str("RESULT: PASSED\n"),
    }

    output
}

fn push_console_error(output: &mut String, error: &A11yError) {
    output.push_str(&format!("[{}] {}\n", error.id, error.message));

    if !error.element.is_empty() {
        output.push_str(&format!("  Element: {}\n", error.element));
    }
    if !error.selector.is_empty() {
        output.push_str(&format!("  Selector: {}\n", error.selector));
    }
    if let Some(ref location) = error.location {
        output.push_str(&format!("  Location: {}\n", location));
    }
    if !error.wcag_criteria.is_empty() {
        output.push_str(&format!("  WCAG: {}\n", error.wcag_criteria.join(", ")));
    }
    if let Some(ref url) = error.help_url {
        output.push_str(&format!("  Help: {}\n", url));
    }

    for fix in &error.fixes {
        let marker = if fix.auto_fixable { " (auto-fixable)" } else { "" };
        output.push_str(&format!("  Fix{}: {}\n", marker, fix.description));
        for line in fix.example.lines() {
            output.push_str(&format!("      {}\n", line));
        }
    }

    output.push('\n');
}

/// Escape text for inclusion in HTML element content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const HTML_STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:60rem;margin:2rem auto;padding:0 1rem;color:#1a1a1a}\
.status{font-weight:700}.BLOCKED{color:#a40000}.WARNING{color:#7a4d00}.PASSED{color:#1e6b1e}\
article{border:1px solid #ccc;border-radius:4px;padding:.75rem 1rem;margin:1rem 0}\
pre{background:#f4f4f4;padding:.5rem;overflow-x:auto}dt{font-weight:600}";

fn html_document(results: &[ValidationResult]) -> String {
    let title = match results {
        [single] => format!("Accessibility report: {}", single.component),
        _ => format!("Accessibility report: {} components", results.len()),
    };

    let body: String = results.iter().map(html_section).collect();

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>{style}</style>\n</head>\n<body>\n<main>\n<h1>{title}</h1>\n{body}</main>\n</body>\n</html>\n",
        title = escape_html(&title),
        style = HTML_STYLE,
        body = body
    )
}

fn html_section(result: &ValidationResult) -> String {
    let mut html = String::new();
    html.push_str("<section>\n");
    html.push_str(&format!("<h2>{}</h2>\n", escape_html(&result.component)));
    if let Some(ref file) = result.file {
        html.push_str(&format!("<p>File: <code>{}</code></p>\n", escape_html(file)));
    }
    html.push_str(&format!(
        "<p>Status: <span class=\"status {status}\">{status}</span> &middot; validated {} in {} ms</p>\n",
        escape_html(&result.timestamp.to_rfc3339()),
        result.duration_ms,
        status = result.status
    ));

    if result.errors.is_empty() {
        html.push_str("<p>No accessibility issues found. All checks passed.</p>\n</section>\n");
        return html;
    }

    let summary = &result.summary;
    html.push_str("<table>\n<caption>Summary</caption>\n<tr><th scope=\"col\">Severity</th><th scope=\"col\">Count</th></tr>\n");
    for severity in Severity::ALL.iter().rev() {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            severity,
            summary.count(*severity)
        ));
    }
    html.push_str(&format!(
        "<tr><td>total</td><td>{}</td></tr>\n<tr><td>auto-fixable</td><td>{}</td></tr>\n</table>\n",
        summary.total, summary.auto_fixable
    ));

    for error in &result.errors {
        html.push_str(&html_error(error));
    }

    html.push_str("</section>\n");
    html
}

fn html_error(error: &A11yError) -> String {
    let mut html = format!(
        "<article id=\"{id}\">\n<h3>{id}: {message}</h3>\n<dl>\n",
        id = escape_html(&error.id),
        message = escape_html(&error.message)
    );

    let mut field = |name: &str, value: &str| {
        html.push_str(&format!("<dt>{}</dt><dd>{}</dd>\n", name, value));
    };
    field("Rule", &escape_html(&error.rule));
    field("Category", error.category.as_str());
    field("Severity", error.severity.as_str());
    field("Element", &format!("<code>{}</code>", escape_html(&error.element)));
    field("Selector", &format!("<code>{}</code>", escape_html(&error.selector)));
    if let Some(ref location) = error.location {
        field("Location", &escape_html(&location.range()));
    }
    if !error.wcag_criteria.is_empty() {
        field("WCAG", &escape_html(&error.wcag_criteria.join(", ")));
    }
    if let Some(ref url) = error.help_url {
        let url = escape_html(url);
        field("Help", &format!("<a href=\"{url}\">{url}</a>", url = url));
    }
    if !error.context.is_empty() {
        let context = serde_json::to_string(&error.context).unwrap_or_default();
        field("Context", &format!("<code>{}</code>", escape_html(&context)));
    }
    html.push_str("</dl>\n");

    if !error.fixes.is_empty() {
        html.push_str("<ol class=\"fixes\">\n");
        for fix in &error.fixes {
            let docs = match fix.docs_url {
                Some(ref url) => {
                    let url = escape_html(url);
                    format!("<p>See <a href=\"{url}\">{url}</a></p>", url = url)
                }
                None => String::new(),
            };
            html.push_str(&format!(
                "<li>{}{}<pre><code>{}</code></pre>{}</li>\n",
                escape_html(&fix.description),
                if fix.auto_fixable { " <em>(auto-fixable)</em>" } else { "" },
                escape_html(&fix.example),
                docs
            ));
        }
        html.push_str("</ol>\n");
    }

    html.push_str("</article>\n");
    html
}

/// SARIF report structure (simplified)
#[derive(Debug, Serialize)]
struct SarifReport {
    #[serde(rename = "$schema")]
    schema: String,
    version: String,
    runs: Vec<SarifRun>,
}

#[derive(Debug, Serialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Debug, Serialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifDriver {
    name: String,
    version: String,
    information_uri: String,
    rules: Vec<SarifRule>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRule {
    id: String,
    short_description: SarifMessage,
    help_uri: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifResult {
    rule_id: String,
    level: String,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
}

#[derive(Debug, Serialize)]
struct SarifMessage {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifLocation {
    physical_location: SarifPhysicalLocation,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifPhysicalLocation {
    artifact_location: SarifArtifactLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<SarifRegion>,
}

#[derive(Debug, Serialize)]
struct SarifArtifactLocation {
    uri: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRegion {
    start_line: usize,
    start_column: usize,
}

fn sarif_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical | Severity::Serious => "error",
        Severity::Moderate => "warning",
        Severity::Minor => "note",
    }
}

/// Generate SARIF report
fn generate_sarif_report(results: &[ValidationResult]) -> String {
    let sarif_results: Vec<SarifResult> = results
        .iter()
        .flat_map(|result| result.errors.iter().map(move |e| (result, e)))
        .map(|(result, e)| {
            let mut locations = Vec::new();
            let uri = e
                .location
                .as_ref()
                .map(|l| l.file.clone())
                .or_else(|| result.file.clone());
            if let Some(uri) = uri {
                locations.push(SarifLocation {
                    physical_location: SarifPhysicalLocation {
                        artifact_location: SarifArtifactLocation { uri },
                        region: e.location.as_ref().map(|l| SarifRegion {
                            start_line: l.line,
                            start_column: l.column,
                        }),
                    },
                });
            }

            SarifResult {
                rule_id: e.rule.clone(),
                level: sarif_level(e.severity).to_string(),
                message: SarifMessage { text: e.message.clone() },
                locations,
            }
        })
        .collect();

    let rules = RULES
        .iter()
        .map(|r| SarifRule {
            id: r.name.to_string(),
            short_description: SarifMessage { text: r.description.to_string() },
            help_uri: r.help_url.to_string(),
        })
        .collect();

    let report = SarifReport {
        schema: "https://json.schemastore.org/sarif-2.1.0.json".to_string(),
        version: "2.1.0".to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: "a11yguard".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    information_uri: "https://www.w3.org/WAI/WCAG21/quickref/".to_string(),
                    rules,
                },
            },
            results: sarif_results,
        }],
    };

    to_json(&report, "SARIF report")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::validate;

    fn failing() -> ValidationResult {
        validate(
            "<div>\n<img src=\"x.png\">\n<a href=\"/a\">Click here</a>\n</div>",
            "Card",
            Some("Card.html"),
            None,
        )
    }

    fn passing() -> ValidationResult {
        validate("<p>Hello</p>", "Greeting", None, None)
    }

    #[test]
    fn test_console_report_empty() {
        let report = generate_report(&passing(), ReportFormat::Console);
        assert!(report.contains("No accessibility issues found"));
        assert!(report.contains("PASSED"));
    }

    #[test]
    fn test_console_report_groups_by_severity() {
        let report = generate_report(&failing(), ReportFormat::Console);
        let critical = report.find("--- critical").expect("critical group");
        let moderate = report.find("--- moderate").expect("moderate group");
        assert!(critical < moderate);
        assert!(report.contains("[image-alt-1]"));
        assert!(report.contains("Location: Card.html:2:1"));
        assert!(report.contains("Fix"));
        assert!(report.contains("BLOCKED"));
    }

    #[test]
    fn test_json_round_trip() {
        let result = failing();
        let report = generate_report(&result, ReportFormat::Json);
        let parsed: ValidationResult = serde_json::from_str(&report).expect("valid JSON");
        assert_eq!(parsed, result);

        let value: serde_json::Value = serde_json::from_str(&report).expect("valid JSON");
        assert_eq!(value["status"], "BLOCKED");
        assert!(value["summary"]["bySeverity"].is_object());
        assert!(value["duration"].is_u64());
    }

    #[test]
    fn test_html_report_escapes() {
        let result = failing();
        let report = generate_report(&result, ReportFormat::Html);
        assert!(report.starts_with("<!DOCTYPE html>"));
        assert!(report.contains("&lt;img src=&quot;x.png&quot;&gt;"));
        assert!(!report.contains("<img src=\"x.png\">"));
        for error in &result.errors {
            assert!(report.contains(&escape_html(&error.id)));
            assert!(report.contains(&escape_html(&error.selector)));
        }
    }

    #[test]
    fn test_html_report_carries_every_field() {
        let result = failing();
        let report = generate_report(&result, ReportFormat::Html);
        let has = |text: &str| report.contains(&escape_html(text));

        for error in &result.errors {
            assert!(has(&error.id));
            assert!(has(&error.rule));
            assert!(has(error.category.as_str()));
            assert!(has(error.severity.as_str()));
            assert!(has(&error.message));
            assert!(has(&error.element));
            assert!(has(&error.selector));
            let location = error.location.as_ref().expect("file was supplied");
            assert!(location.end_line.is_some() && location.end_column.is_some());
            assert!(has(&location.range()), "missing {}", location.range());
            for criterion in &error.wcag_criteria {
                assert!(has(criterion));
            }
            if let Some(ref url) = error.help_url {
                assert!(has(url));
            }
            for (key, value) in &error.context {
                assert!(has(key));
                assert!(has(&value.to_string()));
            }
            for fix in &error.fixes {
                assert!(has(&fix.description));
                assert!(has(&fix.example));
                if let Some(ref url) = fix.docs_url {
                    let link = format!("<p>See <a href=\"{url}\">", url = escape_html(url));
                    assert!(report.contains(&link), "no docs link for fix of {}", error.id);
                }
            }
        }
    }

    #[test]
    fn test_html_report_empty() {
        let report = generate_report(&passing(), ReportFormat::Html);
        assert!(report.contains("All checks passed"));
    }

    #[test]
    fn test_sarif_report() {
        let report = generate_report(&failing(), ReportFormat::Sarif);
        let parsed: serde_json::Value = serde_json::from_str(&report).expect("valid JSON");
        assert_eq!(parsed["version"], "2.1.0");
        let results = parsed["runs"][0]["results"].as_array().expect("results");
        assert_eq!(results[0]["ruleId"], "image-alt");
        assert_eq!(results[0]["level"], "error");
        assert_eq!(
            results[0]["locations"][0]["physicalLocation"]["region"]["startLine"],
            2
        );
        assert_eq!(
            parsed["runs"][0]["tool"]["driver"]["rules"].as_array().map(|r| r.len()),
            Some(RULES.len())
        );
    }

    #[test]
    fn test_scan_report() {
        let results = vec![failing(), passing()];
        let report = generate_scan_report(&results, ReportFormat::Console);
        assert!(report.contains("Scanned 2 file(s): 1 with issues"));

        let json = generate_scan_report(&results, ReportFormat::Json);
        let parsed: Vec<ValidationResult> = serde_json::from_str(&json).expect("valid JSON");
        assert_eq!(parsed, results);
    }

    #[test]
    fn test_report_format_parse() {
        assert_eq!("console".parse::<ReportFormat>().unwrap(), ReportFormat::Console);
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!("html".parse::<ReportFormat>().unwrap(), ReportFormat::Html);
        assert_eq!("sarif".parse::<ReportFormat>().unwrap(), ReportFormat::Sarif);
        assert!("xml".parse::<ReportFormat>().is_err());
        assert_eq!(ReportFormat::default(), ReportFormat::Console);
    }
}
