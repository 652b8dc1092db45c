// SPDX-License-Identifier: PMPL-1.0-or-later
//! a11yguard - Accessibility gate and streaming text reveal for UI component libraries
//!
//! Two independent subsystems:
//!
//! - **Validator**: markup fragment in, `ValidationResult` out. A fixed,
//!   ordered battery of WCAG rule checks produces typed errors with severity,
//!   category, source location, and fix suggestions. The result's status
//!   gates CI and agent workflows.
//! - **Reveal**: a timing state machine that reveals text one grapheme at a
//!   time at a configurable speed, with a one-shot completion notification.
//!
//! ## Rules
//!
//! - **Color contrast** (1.4.3): inline color pairs against AA ratios
//! - **Landmarks** (1.3.1/2.4.1): single main, distinguishable landmarks
//! - **Keyboard** (2.1.1/2.4.3): positive tabindex, click-only handlers
//! - **ARIA** (4.1.2): valid roles, hidden focusables, button names, redundant roles
//! - **Forms** (1.3.1/3.3.2): associated labels
//! - **Images** (1.1.1): alt presence and quality
//! - **Links** (2.4.4): accessible and descriptive link names
//! - **Tables** (1.3.1): header cells and scope
//! - **Structure** (1.3.1/2.4.6): heading order, empty headings, list structure

pub mod config;
pub mod error;
pub mod finding;
pub mod fixes;
pub mod markup;
pub mod report;
pub mod reveal;
pub mod rules;
pub mod scanner;
pub mod validator;

pub use config::{RuleSetting, ValidatorConfig};
pub use error::{GuardError, Result};
pub use finding::{
    A11yError, Category, FixSuggestion, Severity, SourceLocation, ValidationResult,
    ValidationStatus, ValidationSummary,
};
pub use fixes::fix_suggestions;
pub use report::{generate_report, ReportFormat};
pub use reveal::{CursorStyle, RevealHost, RevealProps, RevealState, SpeedTier, StreamingText};
pub use validator::{validate, Validator};
