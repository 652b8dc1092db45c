// SPDX-License-Identifier: PMPL-1.0-or-later
//! Image alternative text - WCAG 1.1.1 Non-text Content (Level A)
//!
//! - Every `<img>` has an `alt` attribute (or is otherwise named / presentational)
//! - `alt=""` marks a decorative image and is valid
//! - Alt text is descriptive: not "image", "photo", or a filename

use crate::error::Result;
use crate::finding::A11yError;
use crate::rules::{is_presentational, RuleContext};

/// Generic alt text values that describe nothing
const GENERIC_ALT_VALUES: &[&str] = &[
    "image",
    "photo",
    "picture",
    "icon",
    "graphic",
    "img",
    "banner",
    "logo",
    "untitled",
    "screenshot",
    "thumbnail",
    "placeholder",
];

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp", ".avif"];

/// Leading phrases screen readers already convey by announcing "image"
const REDUNDANT_PREFIXES: &[&str] = &["image of", "picture of", "photo of", "graphic of"];

pub fn check_image_alt(ctx: &RuleContext<'_>) -> Result<Vec<A11yError>> {
    let mut errors = Vec::new();

    for element in ctx.select("img")? {
        let value = element.value();
        if value.attr("alt").is_some() || is_presentational(element) {
            continue;
        }
        let named = ["aria-label", "aria-labelledby", "title"]
            .iter()
            .any(|a| value.attr(a).map(|v| !v.trim().is_empty()).unwrap_or(false));
        if named {
            continue;
        }

        let mut error = ctx.violation(
            element,
            "Image is missing an alt attribute; use alt=\"description\" or alt=\"\" if decorative",
        );
        if let Some(src) = value.attr("src") {
            error = error.with_context("src", src);
        }
        errors.push(error);
    }

    Ok(errors)
}

pub fn check_redundant_alt(ctx: &RuleContext<'_>) -> Result<Vec<A11yError>> {
    let mut errors = Vec::new();

    for element in ctx.select("img[alt]")? {
        let alt = element.value().attr("alt").unwrap_or("");
        let normalized = alt.trim().to_lowercase();
        if normalized.is_empty() {
            continue;
        }

        let reason = if GENERIC_ALT_VALUES.contains(&normalized.as_str()) {
            "generic"
        } else if IMAGE_EXTENSIONS.iter().any(|ext| normalized.ends_with(ext)) {
            "filename"
        } else if REDUNDANT_PREFIXES.iter().any(|p| normalized.starts_with(p)) {
            "redundant-prefix"
        } else {
            continue;
        };

        let message = match reason {
            "generic" => format!("Alt text \"{}\" is generic; describe what the image shows", alt),
            "filename" => format!("Alt text \"{}\" looks like a filename; describe what the image shows", alt),
            _ => format!("Alt text \"{}\" repeats that this is an image; screen readers already announce it", alt),
        };

        errors.push(
            ctx.violation(element, &message)
                .with_context("alt", alt)
                .with_context("reason", reason),
        );
    }

    Ok(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Markup;
    use crate::rules::find_rule;

    fn run(rule: &str, markup: &str) -> Vec<A11yError> {
        let parsed = Markup::parse(markup).expect("parse");
        let spec = find_rule(rule).expect("rule");
        (spec.check)(&RuleContext::new(&parsed, None, spec)).expect("check")
    }

    #[test]
    fn test_accessible_images() {
        let html = r#"
            <img src="logo.png" alt="Acme">
            <img src="divider.png" alt="">
            <img src="chart.png" alt="Bar chart showing Q4 revenue growth of 15%">
            <img src="spacer.gif" role="presentation">
            <img src="avatar.png" aria-label="Jane Doe">
        "#;
        assert!(run("image-alt", html).is_empty());
        assert!(run("image-redundant-alt", html).is_empty());
    }

    #[test]
    fn test_missing_alt() {
        let errors = run("image-alt", r#"<img src="x.png">"#);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule, "image-alt");
        assert_eq!(errors[0].context["src"], "x.png");
        assert_eq!(errors[0].element, "<img src=\"x.png\">");
    }

    #[test]
    fn test_generic_and_filename_alt() {
        let errors = run(
            "image-redundant-alt",
            r#"<img src="a.jpg" alt="Photo"><img src="b.jpg" alt="hero-banner.jpg"><img src="c.jpg" alt="Image of a cat"><img src="d.jpg" alt="A cat asleep">"#,
        );
        let reasons: Vec<_> = errors.iter().map(|e| e.context["reason"].clone()).collect();
        assert_eq!(reasons, vec!["generic", "filename", "redundant-prefix"]);
    }
}
