// SPDX-License-Identifier: PMPL-1.0-or-later
//! a11yguard CLI - accessibility gate for UI component markup

use a11yguard::config::{default_config_path, load_config, write_default_config, RuleSetting, ValidatorConfig};
use a11yguard::finding::Severity;
use a11yguard::fixes::fix_suggestions;
use a11yguard::report::{generate_report, generate_scan_report, ReportFormat};
use a11yguard::reveal::{CursorStyle, RevealHost, RevealProps, SpeedTier};
use a11yguard::rules::{self, MARKUP_PARSE_RULE, RULES, RULE_EXECUTION_RULE};
use a11yguard::scanner;
use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::cell::Cell;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

/// Accessibility validation gate for design-system components
#[derive(Parser)]
#[command(name = "a11yguard")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a single markup file
    Validate {
        /// File to validate
        file: PathBuf,

        /// Component name (defaults to the file stem)
        #[arg(long)]
        component: Option<String>,

        #[command(flatten)]
        gate: GateArgs,
    },

    /// Validate every markup file under a directory
    Scan {
        /// Directory to scan
        dir: PathBuf,

        #[command(flatten)]
        gate: GateArgs,
    },

    /// List the rule battery
    Rules {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the fix suggestions for a rule
    Fixes {
        /// Rule name, e.g. image-alt
        rule: String,
    },

    /// Write a default configuration file (YAML, or TOML by extension)
    InitConfig {
        /// Destination (defaults to the user config directory)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Typewriter demo of the streaming text reveal
    Reveal {
        /// Text to reveal
        text: String,

        /// slow, normal, fast, instant, or a delay in milliseconds
        #[arg(long, default_value = "normal")]
        speed: SpeedTier,

        #[arg(long, default_value = "block")]
        cursor: CursorArg,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },
}

/// Options shared by `validate` and `scan`
#[derive(Args)]
struct GateArgs {
    /// Config file (defaults to the user config, if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format (overrides the config file)
    #[arg(long)]
    format: Option<FormatArg>,

    /// Drop errors below this severity
    #[arg(long)]
    min_severity: Option<SeverityArg>,

    /// Rule override, repeatable: name=on|off|warn|error
    #[arg(long = "rule", value_name = "NAME=SETTING")]
    rules: Vec<String>,

    /// Omit fix suggestions
    #[arg(long)]
    no_fixes: bool,

    /// Treat WARNING results as failures
    #[arg(long)]
    fail_on_warnings: bool,

    /// Output file (stdout if not specified)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short)]
    verbose: bool,
}

/// Output format CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Human-readable text
    Console,
    /// ValidationResult JSON
    Json,
    /// Standalone HTML document
    Html,
    /// SARIF for IDE/CI
    Sarif,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Console => ReportFormat::Console,
            FormatArg::Json => ReportFormat::Json,
            FormatArg::Html => ReportFormat::Html,
            FormatArg::Sarif => ReportFormat::Sarif,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SeverityArg {
    Minor,
    Moderate,
    Serious,
    Critical,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Minor => Severity::Minor,
            SeverityArg::Moderate => Severity::Moderate,
            SeverityArg::Serious => Severity::Serious,
            SeverityArg::Critical => Severity::Critical,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CursorArg {
    Block,
    Line,
    Underscore,
}

impl From<CursorArg> for CursorStyle {
    fn from(arg: CursorArg) -> Self {
        match arg {
            CursorArg::Block => CursorStyle::Block,
            CursorArg::Line => CursorStyle::Line,
            CursorArg::Underscore => CursorStyle::Underscore,
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("a11yguard=debug")
    } else {
        EnvFilter::new("a11yguard=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { file, component, gate } => {
            init_logging(gate.verbose);
            let config = resolve_config(&gate)?;
            let mut result = scanner::scan_file(&file, &config)
                .with_context(|| format!("Failed to validate {}", file.display()))?;
            if let Some(component) = component {
                result.component = component;
            }

            let report = generate_report(&result, config.format);
            write_output(&report, gate.output.as_deref())?;

            if result.fails(config.fail_on_warnings) {
                std::process::exit(1);
            }
        }

        Commands::Scan { dir, gate } => {
            init_logging(gate.verbose);
            let config = resolve_config(&gate)?;
            let results = scanner::scan_directory(&dir, &config)
                .with_context(|| format!("Failed to scan {}", dir.display()))?;

            let report = generate_scan_report(&results, config.format);
            write_output(&report, gate.output.as_deref())?;

            if results.iter().any(|r| r.fails(config.fail_on_warnings)) {
                std::process::exit(1);
            }
        }

        Commands::Rules { json } => {
            init_logging(false);
            print_rules(json)?;
        }

        Commands::Fixes { rule } => {
            init_logging(false);
            let known = rules::find_rule(&rule).is_some()
                || rule == MARKUP_PARSE_RULE
                || rule == RULE_EXECUTION_RULE;
            if !known {
                bail!("Unknown rule: {} (run `a11yguard rules` for the list)", rule);
            }

            for (i, fix) in fix_suggestions(&rule, None).iter().enumerate() {
                let marker = if fix.auto_fixable { " (auto-fixable)" } else { "" };
                println!("{}. {}{}", i + 1, fix.description, marker);
                for line in fix.example.lines() {
                    println!("     {}", line);
                }
                if let Some(ref url) = fix.docs_url {
                    println!("   See: {}", url);
                }
            }
        }

        Commands::InitConfig { path, force } => {
            init_logging(false);
            let path = path.unwrap_or_else(default_config_path);
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            write_default_config(&path)?;
            eprintln!("Config written to {}", path.display());
        }

        Commands::Reveal { text, speed, cursor, verbose } => {
            init_logging(verbose);
            run_reveal(text, speed, cursor.into())?;
        }
    }

    Ok(())
}

/// Load the config file and apply command-line overrides on top
fn resolve_config(gate: &GateArgs) -> anyhow::Result<ValidatorConfig> {
    let path = gate.config.clone().unwrap_or_else(default_config_path);
    if gate.config.is_some() && !path.exists() {
        bail!("Config file not found: {}", path.display());
    }
    let mut config = load_config(&path)
        .with_context(|| format!("Failed to load config {}", path.display()))?;

    if let Some(format) = gate.format {
        config.format = format.into();
    }
    if let Some(severity) = gate.min_severity {
        config.min_severity = severity.into();
    }
    for entry in &gate.rules {
        let (name, setting) = parse_rule_override(entry)?;
        config = config.with_rule(&name, setting);
    }
    if gate.no_fixes {
        config.include_fixes = false;
    }
    if gate.fail_on_warnings {
        config.fail_on_warnings = true;
    }

    Ok(config)
}

fn parse_rule_override(entry: &str) -> anyhow::Result<(String, RuleSetting)> {
    let (name, setting) = entry
        .split_once('=')
        .with_context(|| format!("Expected NAME=SETTING, got {}", entry))?;
    let name = name.trim();
    if rules::find_rule(name).is_none() {
        bail!("Unknown rule: {}", name);
    }
    let setting = setting.trim().parse::<RuleSetting>().map_err(anyhow::Error::msg)?;
    Ok((name.to_string(), setting))
}

fn print_rules(json: bool) -> anyhow::Result<()> {
    if json {
        let catalogue: Vec<serde_json::Value> = RULES
            .iter()
            .map(|r| {
                serde_json::json!({
                    "name": r.name,
                    "category": r.category,
                    "severity": r.severity,
                    "description": r.description,
                    "wcagCriteria": r.wcag,
                    "helpUrl": r.help_url,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&catalogue)?);
        return Ok(());
    }

    println!("{:<30} {:<15} {:<9} {}", "RULE", "CATEGORY", "SEVERITY", "WCAG");
    for rule in RULES {
        println!(
            "{:<30} {:<15} {:<9} {}",
            rule.name,
            rule.category,
            rule.severity,
            rule.wcag.join(", ")
        );
    }
    Ok(())
}

/// Drive a reveal host in real time, redrawing the line on every tick
fn run_reveal(text: String, speed: SpeedTier, cursor: CursorStyle) -> anyhow::Result<()> {
    let mut host = RevealHost::new();
    let done = Rc::new(Cell::new(false));
    let flag = Rc::clone(&done);
    let id = host.mount(
        RevealProps::new(text).with_speed(speed).with_cursor(cursor),
        Some(Box::new(move || flag.set(true))),
    );

    let mut stdout = std::io::stdout();
    loop {
        if let Some(view) = host.view(id) {
            write!(stdout, "\r\x1b[2K{}", view)?;
            stdout.flush()?;
        }

        match host.next_deadline() {
            Some(deadline) => {
                std::thread::sleep(deadline.saturating_sub(host.now()));
                host.advance_to(deadline);
            }
            None => break,
        }
    }

    // Final frame without the cursor
    host.set_streaming(id, false);
    if let Some(view) = host.view(id) {
        writeln!(stdout, "\r\x1b[2K{}", view)?;
    }
    if !done.get() {
        bail!("Reveal stopped before completion");
    }
    Ok(())
}

/// Write output to file or stdout
fn write_output(content: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(p) => {
            std::fs::write(p, content)?;
            eprintln!("Report written to {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
