// SPDX-License-Identifier: PMPL-1.0-or-later
//! Integration tests for config files and directory scans

use a11yguard::config::{load_config, write_default_config, RuleSetting, ValidatorConfig};
use a11yguard::finding::{Severity, ValidationStatus};
use a11yguard::report::{generate_scan_report, ReportFormat};
use a11yguard::scanner;
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, rel: &str, content: &str) {
    let path = dir.path().join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn test_toml_default_config_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a11yguard.toml");
    write_default_config(&path).expect("write config");

    let loaded = load_config(&path).expect("load config");
    assert_eq!(loaded.rule("aria-redundant-role"), RuleSetting::Warn);
    assert_eq!(loaded.format, ReportFormat::Console);
    assert!(loaded.include_fixes);
}

#[test]
fn test_yaml_config_drives_scan() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "a11yguard.yml",
        "rules:\n  image-alt: false\n  link-text-generic: warn\nminSeverity: moderate\nexclude:\n  - generated\n",
    );
    write(&dir, "src/Avatar.html", r#"<img src="avatar.png">"#);
    write(&dir, "src/Teaser.html", r#"<a href="/post">Read more</a>"#);
    write(&dir, "src/Icon.html", r#"<img src="i.png" alt="icon">"#);
    write(&dir, "generated/Broken.html", r#"<div class="x>"#);

    let config = load_config(&dir.path().join("a11yguard.yml")).expect("load config");
    assert_eq!(config.min_severity, Severity::Moderate);

    let results = scanner::scan_directory(dir.path(), &config).expect("scan");
    let names: Vec<_> = results.iter().map(|r| r.component.as_str()).collect();
    assert_eq!(names, vec!["Avatar", "Icon", "Teaser"]);

    // image-alt disabled
    assert_eq!(results[0].status, ValidationStatus::Passed);
    // image-redundant-alt is minor, below the floor
    assert_eq!(results[1].status, ValidationStatus::Passed);
    // link-text-generic capped at moderate
    assert_eq!(results[2].status, ValidationStatus::Warning);
    assert_eq!(results[2].errors[0].severity, Severity::Moderate);
}

#[test]
fn test_scan_reports() {
    let dir = TempDir::new().unwrap();
    write(&dir, "Good.html", "<button>Save</button>");
    write(&dir, "Bad.html", "<button></button>");

    let results = scanner::scan_directory(dir.path(), &ValidatorConfig::default()).expect("scan");
    assert_eq!(results.len(), 2);

    let console = generate_scan_report(&results, ReportFormat::Console);
    assert!(console.contains("Scanned 2 file(s): 1 with issues"));

    let html = generate_scan_report(&results, ReportFormat::Html);
    assert!(html.contains("<h2>Bad</h2>"));
    assert!(html.contains("<h2>Good</h2>"));

    let sarif = generate_scan_report(&results, ReportFormat::Sarif);
    let parsed: serde_json::Value = serde_json::from_str(&sarif).expect("valid SARIF JSON");
    let results = parsed["runs"][0]["results"].as_array().expect("results");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["ruleId"], "button-name");
}
