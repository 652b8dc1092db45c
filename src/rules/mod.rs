// SPDX-License-Identifier: PMPL-1.0-or-later
//! Accessibility rule battery.
//!
//! Each rule is a plain check function over the parsed markup. The battery is
//! a fixed, ordered table; the validator runs it top to bottom and
//! concatenates the results, so discovery order is the table order followed by
//! document order within a rule.

pub mod aria;
pub mod contrast;
pub mod forms;
pub mod images;
pub mod keyboard;
pub mod landmarks;
pub mod links;
pub mod structure;
pub mod tables;

use crate::error::Result;
use crate::finding::{A11yError, Category, Severity};
use crate::markup::{css_path, render_open_tag, Markup};
use scraper::ElementRef;

/// Signature shared by every rule check
pub type RuleCheck = fn(&RuleContext<'_>) -> Result<Vec<A11yError>>;

/// Static description of one rule
pub struct RuleSpec {
    /// Machine-readable rule name, also the config key
    pub name: &'static str,
    pub category: Category,
    /// Nominal severity before any config override
    pub severity: Severity,
    pub description: &'static str,
    pub wcag: &'static [&'static str],
    pub help_url: &'static str,
    pub check: RuleCheck,
}

impl std::fmt::Debug for RuleSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleSpec")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("severity", &self.severity)
            .finish()
    }
}

const UNDERSTANDING: &str = "https://www.w3.org/WAI/WCAG21/Understanding";

macro_rules! understanding {
    ($page:literal) => {
        concat!("https://www.w3.org/WAI/WCAG21/Understanding/", $page, ".html")
    };
}

/// Rule name of the synthetic error emitted for unparseable markup
pub const MARKUP_PARSE_RULE: &str = "markup-parse";
/// Rule name of the synthetic error emitted when a check fails internally
pub const RULE_EXECUTION_RULE: &str = "rule-execution";

/// The battery, in execution order
pub static RULES: &[RuleSpec] = &[
    RuleSpec {
        name: "color-contrast",
        category: Category::ColorContrast,
        severity: Severity::Serious,
        description: "Inline text colors must meet the WCAG AA contrast ratio against their background",
        wcag: &["1.4.3"],
        help_url: understanding!("contrast-minimum"),
        check: contrast::check_color_contrast,
    },
    RuleSpec {
        name: "landmark-one-main",
        category: Category::Landmarks,
        severity: Severity::Moderate,
        description: "Markup must not contain more than one main landmark",
        wcag: &["1.3.1", "2.4.1"],
        help_url: understanding!("bypass-blocks"),
        check: landmarks::check_one_main,
    },
    RuleSpec {
        name: "landmark-unique",
        category: Category::Landmarks,
        severity: Severity::Minor,
        description: "Repeated landmarks of the same role need distinct accessible names",
        wcag: &["1.3.1"],
        help_url: understanding!("info-and-relationships"),
        check: landmarks::check_unique_landmarks,
    },
    RuleSpec {
        name: "tabindex",
        category: Category::Keyboard,
        severity: Severity::Serious,
        description: "Elements must not use a positive tabindex",
        wcag: &["2.4.3"],
        help_url: understanding!("focus-order"),
        check: keyboard::check_positive_tabindex,
    },
    RuleSpec {
        name: "click-events-have-key-events",
        category: Category::Keyboard,
        severity: Severity::Serious,
        description: "Non-interactive elements with click handlers must also be keyboard operable",
        wcag: &["2.1.1"],
        help_url: understanding!("keyboard"),
        check: keyboard::check_click_without_keyboard,
    },
    RuleSpec {
        name: "aria-valid-role",
        category: Category::Aria,
        severity: Severity::Critical,
        description: "role attributes must name a valid, non-abstract ARIA role",
        wcag: &["4.1.2"],
        help_url: understanding!("name-role-value"),
        check: aria::check_valid_role,
    },
    RuleSpec {
        name: "aria-hidden-focus",
        category: Category::Aria,
        severity: Severity::Serious,
        description: "aria-hidden content must not contain focusable elements",
        wcag: &["4.1.2"],
        help_url: understanding!("name-role-value"),
        check: aria::check_hidden_focusable,
    },
    RuleSpec {
        name: "button-name",
        category: Category::Aria,
        severity: Severity::Critical,
        description: "Buttons must have an accessible name",
        wcag: &["4.1.2"],
        help_url: understanding!("name-role-value"),
        check: aria::check_button_name,
    },
    RuleSpec {
        name: "aria-redundant-role",
        category: Category::Aria,
        severity: Severity::Minor,
        description: "Elements should not repeat their implicit role explicitly",
        wcag: &["4.1.2"],
        help_url: understanding!("name-role-value"),
        check: aria::check_redundant_role,
    },
    RuleSpec {
        name: "label",
        category: Category::Forms,
        severity: Severity::Critical,
        description: "Form controls must have an associated label",
        wcag: &["1.3.1", "3.3.2", "4.1.2"],
        help_url: understanding!("labels-or-instructions"),
        check: forms::check_labels,
    },
    RuleSpec {
        name: "image-alt",
        category: Category::Images,
        severity: Severity::Critical,
        description: "Images must have alternative text",
        wcag: &["1.1.1"],
        help_url: understanding!("non-text-content"),
        check: images::check_image_alt,
    },
    RuleSpec {
        name: "image-redundant-alt",
        category: Category::Images,
        severity: Severity::Minor,
        description: "Alternative text should describe the image, not name it or its file",
        wcag: &["1.1.1"],
        help_url: understanding!("non-text-content"),
        check: images::check_redundant_alt,
    },
    RuleSpec {
        name: "link-name",
        category: Category::Links,
        severity: Severity::Serious,
        description: "Links must have an accessible name",
        wcag: &["2.4.4", "4.1.2"],
        help_url: understanding!("link-purpose-in-context"),
        check: links::check_link_name,
    },
    RuleSpec {
        name: "link-text-generic",
        category: Category::Links,
        severity: Severity::Moderate,
        description: "Link text should describe the destination, not say \"click here\"",
        wcag: &["2.4.4"],
        help_url: understanding!("link-purpose-in-context"),
        check: links::check_generic_link_text,
    },
    RuleSpec {
        name: "table-headers",
        category: Category::Tables,
        severity: Severity::Serious,
        description: "Data tables must declare header cells",
        wcag: &["1.3.1"],
        help_url: understanding!("info-and-relationships"),
        check: tables::check_table_headers,
    },
    RuleSpec {
        name: "th-scope",
        category: Category::Tables,
        severity: Severity::Minor,
        description: "Header cells should declare their scope",
        wcag: &["1.3.1"],
        help_url: understanding!("info-and-relationships"),
        check: tables::check_th_scope,
    },
    RuleSpec {
        name: "heading-order",
        category: Category::Structure,
        severity: Severity::Moderate,
        description: "Heading levels should only increase by one",
        wcag: &["1.3.1", "2.4.6"],
        help_url: understanding!("headings-and-labels"),
        check: structure::check_heading_order,
    },
    RuleSpec {
        name: "empty-heading",
        category: Category::Structure,
        severity: Severity::Minor,
        description: "Headings must have discernible text",
        wcag: &["1.3.1", "2.4.6"],
        help_url: understanding!("headings-and-labels"),
        check: structure::check_empty_heading,
    },
    RuleSpec {
        name: "list",
        category: Category::Structure,
        severity: Severity::Serious,
        description: "Lists must only directly contain list items, and list items must sit in a list",
        wcag: &["1.3.1"],
        help_url: understanding!("info-and-relationships"),
        check: structure::check_list_structure,
    },
];

/// Look up a rule by name
pub fn find_rule(name: &str) -> Option<&'static RuleSpec> {
    RULES.iter().find(|r| r.name == name)
}

/// Help page for the synthetic structure errors
pub fn parsing_help_url() -> String {
    format!("{}/parsing.html", UNDERSTANDING)
}

/// What a rule check sees: the parsed markup, the source file, and its own rule entry
pub struct RuleContext<'a> {
    pub markup: &'a Markup<'a>,
    pub file: Option<&'a str>,
    pub rule: &'static RuleSpec,
}

impl<'a> RuleContext<'a> {
    pub fn new(markup: &'a Markup<'a>, file: Option<&'a str>, rule: &'static RuleSpec) -> Self {
        Self { markup, file, rule }
    }

    pub fn select(&self, selector: &str) -> Result<Vec<ElementRef<'a>>> {
        self.markup.select(selector)
    }

    /// Build an error for `element` carrying this rule's category and nominal severity
    pub fn violation(&self, element: ElementRef<'_>, message: &str) -> A11yError {
        let location = self
            .file
            .and_then(|file| self.markup.location_of(element, file));

        A11yError::new(self.rule.name, self.rule.category, self.rule.severity, message)
            .with_element(&render_open_tag(element))
            .with_selector(&css_path(element))
            .with_location(location)
            .with_wcag(self.rule.wcag)
            .with_help_url(self.rule.help_url)
    }
}

/// Trimmed, whitespace-collapsed text content
pub fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn non_empty_attr<'e>(element: &ElementRef<'e>, name: &str) -> Option<&'e str> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Best-effort accessible name: aria-label, aria-labelledby, text, nested
/// image alt text, then title
pub fn accessible_name(element: ElementRef<'_>) -> Option<String> {
    if let Some(label) = non_empty_attr(&element, "aria-label") {
        return Some(label.to_string());
    }
    if let Some(ids) = non_empty_attr(&element, "aria-labelledby") {
        return Some(format!("#{}", ids));
    }

    let text = text_of(element);
    if !text.is_empty() {
        return Some(text);
    }

    let nested_alt = element
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|e| matches!(e.value().name(), "img" | "svg"))
        .find_map(|e| {
            non_empty_attr(&e, "alt")
                .or_else(|| non_empty_attr(&e, "aria-label"))
                .map(str::to_string)
        });
    if nested_alt.is_some() {
        return nested_alt;
    }

    non_empty_attr(&element, "title").map(str::to_string)
}

/// Whether the element participates in sequential keyboard focus
pub fn is_focusable(element: ElementRef<'_>) -> bool {
    let value = element.value();
    if value.attr("disabled").is_some() {
        return false;
    }

    if let Some(tabindex) = value.attr("tabindex").and_then(|t| t.trim().parse::<i32>().ok()) {
        return tabindex >= 0;
    }

    match value.name() {
        "a" | "area" => value.attr("href").is_some(),
        "input" => value.attr("type").map(|t| !t.eq_ignore_ascii_case("hidden")).unwrap_or(true),
        "button" | "select" | "textarea" | "summary" | "iframe" => true,
        _ => value.attr("contenteditable").map(|c| c != "false").unwrap_or(false),
    }
}

/// Whether the element hides itself from assistive technology via role
pub fn is_presentational(element: ElementRef<'_>) -> bool {
    matches!(
        element.value().attr("role").map(str::trim),
        Some("presentation") | Some("none")
    )
}
