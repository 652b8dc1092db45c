// SPDX-License-Identifier: PMPL-1.0-or-later
//! Color contrast - WCAG 1.4.3 Contrast (Minimum)
//!
//! Reads `color` / `background(-color)` pairs from inline `style` attributes
//! and computes the WCAG contrast ratio:
//! - 4.5:1 for normal text
//! - 3:1 for large text (>= 24px, or >= 18.66px bold)

use crate::error::Result;
use crate::finding::A11yError;
use crate::rules::RuleContext;
use regex::Regex;
use std::sync::OnceLock;

/// Minimum ratio for normal-size text
pub const NORMAL_TEXT_RATIO: f64 = 4.5;
/// Minimum ratio for large text
pub const LARGE_TEXT_RATIO: f64 = 3.0;

static RGB_FUNCTION: OnceLock<Option<Regex>> = OnceLock::new();

/// An opaque sRGB color; alpha channels are ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Parse a CSS color value: `#rgb[a]`, `#rrggbb[aa]`, `rgb()`/`rgba()`, or a basic keyword
    pub fn parse(value: &str) -> Option<Rgb> {
        let value = value.trim().trim_end_matches("!important").trim().to_lowercase();
        if let Some(digits) = value.strip_prefix('#') {
            Self::from_hex_digits(digits)
        } else if value.starts_with("rgb") {
            Self::from_rgb_function(&value)
        } else {
            Self::from_keyword(&value)
        }
    }

    fn from_hex_digits(digits: &str) -> Option<Rgb> {
        if !digits.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            3 | 4 => {
                let mut it = digits.chars().map(|c| channel(&c.to_string().repeat(2)));
                Some(Rgb(it.next()??, it.next()??, it.next()??))
            }
            6 | 8 => Some(Rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => None,
        }
    }

    fn from_rgb_function(value: &str) -> Option<Rgb> {
        let re = RGB_FUNCTION
            .get_or_init(|| Regex::new(r"rgba?\(\s*(\d+)\s*[,\s]\s*(\d+)\s*[,\s]\s*(\d+)").ok())
            .as_ref()?;
        let caps = re.captures(value)?;
        Some(Rgb(caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?))
    }

    fn from_keyword(name: &str) -> Option<Rgb> {
        let rgb = match name {
            "white" => Self::WHITE,
            "black" => Self::BLACK,
            "red" => Rgb(255, 0, 0),
            "green" => Rgb(0, 128, 0),
            "blue" => Rgb(0, 0, 255),
            "yellow" => Rgb(255, 255, 0),
            "gray" | "grey" => Rgb(128, 128, 128),
            "silver" => Rgb(192, 192, 192),
            "lightgray" | "lightgrey" => Rgb(211, 211, 211),
            "darkgray" | "darkgrey" => Rgb(169, 169, 169),
            "maroon" => Rgb(128, 0, 0),
            "olive" => Rgb(128, 128, 0),
            "lime" => Rgb(0, 255, 0),
            "aqua" | "cyan" => Rgb(0, 255, 255),
            "teal" => Rgb(0, 128, 128),
            "navy" => Rgb(0, 0, 128),
            "fuchsia" | "magenta" => Rgb(255, 0, 255),
            "purple" => Rgb(128, 0, 128),
            "orange" => Rgb(255, 165, 0),
            _ => return None,
        };
        Some(rgb)
    }

    /// Relative luminance, <https://www.w3.org/TR/WCAG21/#dfn-relative-luminance>
    pub fn luminance(self) -> f64 {
        let linear = |c: u8| {
            let v = f64::from(c) / 255.0;
            if v <= 0.04045 {
                v / 12.92
            } else {
                ((v + 0.055) / 1.055).powf(2.4)
            }
        };
        0.2126 * linear(self.0) + 0.7152 * linear(self.1) + 0.0722 * linear(self.2)
    }

    /// WCAG contrast ratio against `other`, symmetric and >= 1.0
    pub fn contrast_with(self, other: Rgb) -> f64 {
        let (a, b) = (self.luminance(), other.luminance());
        (a.max(b) + 0.05) / (a.min(b) + 0.05)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Declarations of an inline style, later declarations winning
fn declarations(style: &str) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = Vec::new();
    for decl in style.split(';') {
        if let Some((prop, value)) = decl.split_once(':') {
            let prop = prop.trim().to_lowercase();
            let value = value.trim().to_string();
            if prop.is_empty() || value.is_empty() {
                continue;
            }
            out.retain(|(p, _)| *p != prop);
            out.push((prop, value));
        }
    }
    out
}

fn declared<'d>(decls: &'d [(String, String)], prop: &str) -> Option<&'d str> {
    decls.iter().find(|(p, _)| p == prop).map(|(_, v)| v.as_str())
}

/// Font size in px from a CSS length (px, pt, rem/em at 16px)
fn font_size_px(value: &str) -> Option<f64> {
    let v = value.trim().to_lowercase();
    let (number, factor) = if let Some(n) = v.strip_suffix("px") {
        (n, 1.0)
    } else if let Some(n) = v.strip_suffix("pt") {
        (n, 4.0 / 3.0)
    } else if let Some(n) = v.strip_suffix("rem") {
        (n, 16.0)
    } else if let Some(n) = v.strip_suffix("em") {
        (n, 16.0)
    } else {
        return None;
    };
    number.trim().parse::<f64>().ok().map(|n| n * factor)
}

fn is_bold(weight: Option<&str>) -> bool {
    match weight.map(|w| w.trim().to_lowercase()) {
        Some(w) if w == "bold" || w == "bolder" => true,
        Some(w) => w.parse::<u32>().map(|n| n >= 700).unwrap_or(false),
        None => false,
    }
}

/// Whether the declarations describe WCAG "large text"
fn is_large_text(decls: &[(String, String)]) -> bool {
    let size = declared(decls, "font-size").and_then(font_size_px);
    let bold = is_bold(declared(decls, "font-weight"));
    match size {
        Some(px) if px >= 24.0 => true,
        Some(px) if bold && px >= 18.66 => true,
        _ => false,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn check_color_contrast(ctx: &RuleContext<'_>) -> Result<Vec<A11yError>> {
    let mut errors = Vec::new();

    for element in ctx.select("[style]")? {
        let style = element.value().attr("style").unwrap_or("");
        let decls = declarations(style);

        let fg = declared(&decls, "color").and_then(Rgb::parse);
        let bg = declared(&decls, "background-color")
            .or_else(|| declared(&decls, "background"))
            .and_then(Rgb::parse);

        let (fg, bg) = match (fg, bg) {
            (Some(fg), Some(bg)) => (fg, bg),
            _ => continue,
        };

        let large = is_large_text(&decls);
        let required = if large { LARGE_TEXT_RATIO } else { NORMAL_TEXT_RATIO };
        let ratio = round2(fg.contrast_with(bg));

        if ratio < required {
            errors.push(
                ctx.violation(
                    element,
                    &format!(
                        "Text contrast ratio {:.2}:1 ({} on {}) is below the required {}:1",
                        ratio, fg, bg, required
                    ),
                )
                .with_context("foreground", fg.to_string())
                .with_context("background", bg.to_string())
                .with_context("contrastRatio", ratio)
                .with_context("requiredRatio", required)
                .with_context("largeText", large),
            );
        }
    }

    Ok(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Markup;
    use crate::rules::find_rule;

    fn run(markup: &str) -> Vec<A11yError> {
        let parsed = Markup::parse(markup).expect("parse");
        let ctx = RuleContext::new(&parsed, None, find_rule("color-contrast").expect("rule"));
        check_color_contrast(&ctx).expect("check")
    }

    #[test]
    fn test_parse_colors() {
        assert_eq!(Rgb::parse("#fff"), Some(Rgb::WHITE));
        assert_eq!(Rgb::parse("#FF0000"), Some(Rgb(255, 0, 0)));
        assert_eq!(Rgb::parse("#00ff00cc"), Some(Rgb(0, 255, 0)));
        assert_eq!(Rgb::parse("#12"), None);
        assert_eq!(Rgb::parse("rgba(0, 128, 0, 0.5)"), Some(Rgb(0, 128, 0)));
        assert_eq!(Rgb::parse("rgb(10 20 30)"), Some(Rgb(10, 20, 30)));
        assert_eq!(Rgb::parse("Navy !important"), Some(Rgb(0, 0, 128)));
        assert_eq!(Rgb::parse("currentColor"), None);
    }

    #[test]
    fn test_contrast_ratio_bounds() {
        let ratio = Rgb::BLACK.contrast_with(Rgb::WHITE);
        assert!((ratio - 21.0).abs() < 0.1, "Black on white should be ~21:1, got {:.2}", ratio);
        assert_eq!(ratio, Rgb::WHITE.contrast_with(Rgb::BLACK));

        let grey = Rgb(128, 128, 128);
        assert!((grey.contrast_with(grey) - 1.0).abs() < 0.01);
        assert_eq!(grey.to_string(), "#808080");
    }

    #[test]
    fn test_good_contrast_passes() {
        assert!(run(r#"<p style="color: #000; background-color: #fff">ok</p>"#).is_empty());
    }

    #[test]
    fn test_poor_contrast_fails() {
        let errors = run(r#"<p style="color: #aaa; background-color: #ccc">faint</p>"#);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].context["foreground"], "#aaaaaa");
        assert_eq!(errors[0].context["requiredRatio"], 4.5);
        assert_eq!(errors[0].context["largeText"], false);
    }

    #[test]
    fn test_large_text_threshold() {
        // #949494 on white is ~3.0:1: fails for body text, passes for large text
        let small = run(r#"<p style="color: #949494; background: white">x</p>"#);
        let large = run(r#"<h1 style="color: #949494; background: white; font-size: 32px">x</h1>"#);
        assert_eq!(small.len(), 1);
        assert!(large.is_empty(), "large text should pass: {:?}", large);
    }

    #[test]
    fn test_missing_background_is_skipped() {
        assert!(run(r#"<p style="color: #eee">unknown background</p>"#).is_empty());
    }

    #[test]
    fn test_later_declaration_wins() {
        let errors = run(r#"<p style="color: #000; background: #fff; color: #f8f8f8">x</p>"#);
        assert_eq!(errors.len(), 1);
    }
}
