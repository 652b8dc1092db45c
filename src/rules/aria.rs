// SPDX-License-Identifier: PMPL-1.0-or-later
//! ARIA validator - WCAG 4.1.2 Name, Role, Value (Level A)
//!
//! - role values name real, non-abstract ARIA roles
//! - aria-hidden content holds nothing focusable
//! - buttons have an accessible name
//! - no redundant roles on native semantic elements

use crate::error::Result;
use crate::finding::A11yError;
use crate::rules::{accessible_name, is_focusable, RuleContext};
use scraper::ElementRef;

/// Concrete ARIA 1.2 roles
const VALID_ROLES: &[&str] = &[
    "alert", "alertdialog", "application", "article", "banner", "blockquote", "button",
    "caption", "cell", "checkbox", "code", "columnheader", "combobox", "complementary",
    "contentinfo", "definition", "deletion", "dialog", "directory", "document", "emphasis",
    "feed", "figure", "form", "generic", "grid", "gridcell", "group", "heading", "img",
    "insertion", "link", "list", "listbox", "listitem", "log", "main", "marquee", "math",
    "menu", "menubar", "menuitem", "menuitemcheckbox", "menuitemradio", "meter", "navigation",
    "none", "note", "option", "paragraph", "presentation", "progressbar", "radio",
    "radiogroup", "region", "row", "rowgroup", "rowheader", "scrollbar", "search",
    "searchbox", "separator", "slider", "spinbutton", "status", "strong", "subscript",
    "superscript", "switch", "tab", "table", "tablist", "tabpanel", "term", "textbox",
    "time", "timer", "toolbar", "tooltip", "tree", "treegrid", "treeitem",
];

/// Abstract roles, never valid in markup
const ABSTRACT_ROLES: &[&str] = &[
    "command", "composite", "input", "landmark", "range", "roletype", "section",
    "sectionhead", "select", "structure", "widget", "window",
];

/// Elements whose implicit role makes an identical explicit role redundant
const REDUNDANT_ROLES: &[(&str, &str)] = &[
    ("nav", "navigation"),
    ("main", "main"),
    ("aside", "complementary"),
    ("form", "form"),
    ("button", "button"),
    ("select", "listbox"),
    ("textarea", "textbox"),
    ("table", "table"),
    ("ul", "list"),
    ("ol", "list"),
    ("li", "listitem"),
    ("article", "article"),
    ("dialog", "dialog"),
    ("img", "img"),
];

pub fn check_valid_role(ctx: &RuleContext<'_>) -> Result<Vec<A11yError>> {
    let mut errors = Vec::new();

    for element in ctx.select("[role]")? {
        let raw = element.value().attr("role").unwrap_or("");
        // Fallback role lists are allowed; the first recognised token wins
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        if tokens.iter().any(|t| VALID_ROLES.contains(t)) {
            continue;
        }

        let message = match tokens.first() {
            None => "role attribute is empty".to_string(),
            Some(t) if ABSTRACT_ROLES.contains(t) => {
                format!("role=\"{}\" is an abstract ARIA role and must not be used in markup", raw)
            }
            Some(_) => format!("role=\"{}\" is not a valid ARIA role", raw),
        };

        errors.push(
            ctx.violation(element, &message)
                .with_context("role", raw.trim()),
        );
    }

    Ok(errors)
}

/// Nearest element (self included) carrying aria-hidden="true"
fn hidden_container<'a>(element: ElementRef<'a>) -> Option<ElementRef<'a>> {
    std::iter::once(element)
        .chain(element.ancestors().filter_map(ElementRef::wrap))
        .find(|e| e.value().attr("aria-hidden").map(str::trim) == Some("true"))
}

pub fn check_hidden_focusable(ctx: &RuleContext<'_>) -> Result<Vec<A11yError>> {
    let mut errors = Vec::new();
    let candidates = ctx.select(
        "a[href], area[href], button, input, select, textarea, summary, iframe, [tabindex], [contenteditable]",
    )?;

    for element in candidates {
        if !is_focusable(element) {
            continue;
        }
        let container = match hidden_container(element) {
            Some(c) => c,
            None => continue,
        };

        let inherited = container != element;
        let message = if inherited {
            format!(
                "Focusable <{}> sits inside aria-hidden=\"true\" <{}>; it stays reachable by keyboard but is hidden from screen readers",
                element.value().name(),
                container.value().name()
            )
        } else {
            format!(
                "aria-hidden=\"true\" is set on focusable <{}>; it stays reachable by keyboard but is hidden from screen readers",
                element.value().name()
            )
        };

        errors.push(
            ctx.violation(element, &message)
                .with_context("inherited", inherited),
        );
    }

    Ok(errors)
}

pub fn check_button_name(ctx: &RuleContext<'_>) -> Result<Vec<A11yError>> {
    let mut errors = Vec::new();

    for element in ctx.select("button, [role=\"button\"], input[type=\"button\"], input[type=\"submit\"], input[type=\"reset\"]")? {
        let value = element.value();
        if value.name() == "input" {
            // Submit and reset inputs get a default label from the browser
            let kind = value.attr("type").unwrap_or("").to_lowercase();
            let has_value = value.attr("value").map(|v| !v.trim().is_empty()).unwrap_or(false);
            if has_value || kind != "button" || value.attr("aria-label").is_some() {
                continue;
            }
        } else if accessible_name(element).is_some() {
            continue;
        }

        errors.push(ctx.violation(
            element,
            "Button has no accessible name: no text content, aria-label, aria-labelledby, or title",
        ));
    }

    Ok(errors)
}

pub fn check_redundant_role(ctx: &RuleContext<'_>) -> Result<Vec<A11yError>> {
    let mut errors = Vec::new();

    for element in ctx.select("[role]")? {
        let name = element.value().name();
        let role = element.value().attr("role").unwrap_or("").trim();

        let redundant = REDUNDANT_ROLES.iter().any(|(tag, implicit)| *tag == name && *implicit == role)
            || (name == "a" && role == "link" && element.value().attr("href").is_some());

        if redundant {
            errors.push(
                ctx.violation(
                    element,
                    &format!(
                        "role=\"{}\" on <{}> is redundant; the element already has this role",
                        role, name
                    ),
                )
                .with_context("role", role),
            );
        }
    }

    Ok(errors)
}
