// SPDX-License-Identifier: PMPL-1.0-or-later
//! Markup parsing and source mapping.
//!
//! Wraps the html5ever tree built by `scraper` with a tag index over the raw
//! source so rule checks can report line/column coordinates and a stable CSS
//! path for every offending element.

use crate::error::{GuardError, Result};
use crate::finding::SourceLocation;
use scraper::{ElementRef, Html, Selector};

/// Opening tag located in the raw source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpan {
    /// Lower-cased tag name
    pub name: String,
    /// Byte offset of `<`
    pub start: usize,
    /// Byte offset just past `>`
    pub end: usize,
}

/// Scan the source for opening tags, rejecting markup that cannot be tokenized.
///
/// Fails on an unterminated tag, an unterminated quoted attribute value, or an
/// unterminated comment. Everything else is left to html5ever's error recovery.
pub fn scan_tags(source: &str) -> Result<Vec<TagSpan>> {
    let bytes = source.as_bytes();
    let mut tags = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }

        if source[i..].starts_with("<!--") {
            match source[i + 4..].find("-->") {
                Some(close) => {
                    i += 4 + close + 3;
                    continue;
                }
                None => {
                    let (line, _) = line_col(source, i);
                    return Err(GuardError::Markup(format!(
                        "unterminated comment starting at line {}",
                        line
                    )));
                }
            }
        }

        let name_start = if bytes.get(i + 1) == Some(&b'/') { i + 2 } else { i + 1 };
        let is_tag = bytes
            .get(name_start)
            .map(|b| b.is_ascii_alphabetic())
            .unwrap_or(false);
        if !is_tag {
            i += 1;
            continue;
        }

        let mut name_end = name_start;
        while name_end < bytes.len()
            && !bytes[name_end].is_ascii_whitespace()
            && bytes[name_end] != b'>'
            && bytes[name_end] != b'/'
        {
            name_end += 1;
        }
        let name = source[name_start..name_end].to_ascii_lowercase();

        let end = find_tag_end(source, name_end).map_err(|reason| {
            let (line, column) = line_col(source, i);
            GuardError::Markup(format!("{} in <{}> at {}:{}", reason, name, line, column))
        })?;

        if name_start == i + 1 {
            tags.push(TagSpan { name: name.clone(), start: i, end });
        }

        // Raw text elements: skip to the matching close tag
        if name_start == i + 1 && (name == "script" || name == "style") {
            let close = format!("</{}", name);
            let rest = source[end..].to_ascii_lowercase();
            i = match rest.find(&close) {
                Some(pos) => end + pos,
                None => source.len(),
            };
            continue;
        }

        i = end;
    }

    Ok(tags)
}

/// Find the byte offset just past the `>` closing a tag.
///
/// A quote opens a value only right after `=` (whitespace allowed between);
/// quotes inside unquoted values or stray text are ordinary characters.
fn find_tag_end(source: &str, from: usize) -> std::result::Result<usize, &'static str> {
    let bytes = source.as_bytes();
    let mut quote: Option<u8> = None;
    let mut after_equals = false;
    let mut i = from;

    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if (b == b'"' || b == b'\'') && after_equals => quote = Some(b),
            None if b == b'>' => return Ok(i + 1),
            None => {}
        }
        if quote.is_none() && !b.is_ascii_whitespace() {
            after_equals = b == b'=';
        }
        i += 1;
    }

    if quote.is_some() {
        Err("unterminated attribute value")
    } else {
        Err("unterminated tag")
    }
}

/// 1-indexed line and column (in characters) of a byte offset
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|p| p + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

/// A parsed markup fragment or document
pub struct Markup<'s> {
    source: &'s str,
    html: Html,
    tags: Vec<TagSpan>,
}

impl<'s> Markup<'s> {
    /// Parse markup; full documents are detected by a leading doctype or `<html>`
    pub fn parse(source: &'s str) -> Result<Self> {
        let tags = scan_tags(source)?;

        let head = source.trim_start().to_ascii_lowercase();
        let html = if head.starts_with("<!doctype") || head.starts_with("<html") {
            Html::parse_document(source)
        } else {
            Html::parse_fragment(source)
        };

        Ok(Self { source, html, tags })
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// All elements matching a CSS selector, in document order
    pub fn select(&self, selector: &str) -> Result<Vec<ElementRef<'_>>> {
        let parsed = Selector::parse(selector).map_err(|e| GuardError::Selector {
            selector: selector.to_string(),
            reason: e.to_string(),
        })?;
        Ok(self.html.select(&parsed).collect())
    }

    /// Source span of an element's opening tag, when it can be matched.
    ///
    /// The n-th `<name>` element in tree order maps to the n-th `<name` tag in
    /// the source; elements html5ever synthesized (e.g. an implied `tbody`)
    /// have no span.
    pub fn span_of(&self, element: ElementRef<'_>) -> Option<&TagSpan> {
        let name = element.value().name();
        let ordinal = self
            .html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|e| e.value().name() == name)
            .position(|e| e == element)?;
        self.tags.iter().filter(|t| t.name == name).nth(ordinal)
    }

    /// Source coordinates of an element inside `file`
    pub fn location_of(&self, element: ElementRef<'_>, file: &str) -> Option<SourceLocation> {
        let span = self.span_of(element)?;
        let (line, column) = line_col(self.source, span.start);
        let (end_line, end_column) = line_col(self.source, span.end);
        Some(SourceLocation {
            file: file.to_string(),
            line,
            column,
            end_line: Some(end_line),
            end_column: Some(end_column),
        })
    }
}

/// Render an element's opening tag with attributes sorted by name
pub fn render_open_tag(element: ElementRef<'_>) -> String {
    let mut attrs: Vec<(&str, &str)> = element.value().attrs().collect();
    attrs.sort();
    let rendered: String = attrs
        .iter()
        .map(|(k, v)| format!(" {}=\"{}\"", k, v))
        .collect();
    format!("<{}{}>", element.value().name(), rendered)
}

/// CSS path from the outermost authored element down to `element`
pub fn css_path(element: ElementRef<'_>) -> String {
    let mut segments = Vec::new();
    let mut current = Some(element);

    while let Some(el) = current {
        let name = el.value().name();
        if name == "html" {
            break;
        }

        if let Some(id) = el.value().id() {
            segments.push(format!("#{}", id));
            break;
        }

        let same_type: Vec<ElementRef<'_>> = el
            .parent()
            .map(|p| {
                p.children()
                    .filter_map(ElementRef::wrap)
                    .filter(|s| s.value().name() == name)
                    .collect()
            })
            .unwrap_or_default();

        if same_type.len() > 1 {
            let position = same_type.iter().position(|s| *s == el).unwrap_or(0) + 1;
            segments.push(format!("{}:nth-of-type({})", name, position));
        } else {
            segments.push(name.to_string());
        }

        current = el.parent().and_then(ElementRef::wrap);
    }

    segments.reverse();
    segments.join(" > ")
}
