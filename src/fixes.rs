// SPDX-License-Identifier: PMPL-1.0-or-later
//! Fix suggestion templates.
//!
//! `fix_suggestions` is pure: the rule name selects an ordered list of
//! templates, most broadly applicable first, and the error context only fills
//! in the text. Whether a suggestion is auto-fixable is fixed per template.

use crate::finding::{ErrorContext, FixSuggestion};
use crate::rules::{find_rule, parsing_help_url, MARKUP_PARSE_RULE, RULE_EXECUTION_RULE};

fn ctx_str<'c>(context: Option<&'c ErrorContext>, key: &str) -> Option<&'c str> {
    context.and_then(|c| c.get(key)).and_then(|v| v.as_str())
}

fn ctx_f64(context: Option<&ErrorContext>, key: &str) -> Option<f64> {
    context.and_then(|c| c.get(key)).and_then(|v| v.as_f64())
}

fn ctx_u64(context: Option<&ErrorContext>, key: &str) -> Option<u64> {
    context.and_then(|c| c.get(key)).and_then(|v| v.as_u64())
}

/// Suggestions for a rule; unknown rules yield an empty list
pub fn fix_suggestions(rule: &str, context: Option<&ErrorContext>) -> Vec<FixSuggestion> {
    let mut fixes = match rule {
        "color-contrast" => contrast_fixes(context),
        "landmark-one-main" => vec![
            FixSuggestion::new(
                "Keep a single <main> for the page's primary content and turn the others into <section> or <div>",
                "<main>…</main>\n<section aria-labelledby=\"extra\">…</section>",
            ),
            FixSuggestion::new(
                "If this component is rendered inside a page layout, let the layout own <main>",
                "<div class=\"dashboard\">…</div>",
            ),
        ],
        "landmark-unique" => {
            let role = ctx_str(context, "role").unwrap_or("landmark");
            vec![FixSuggestion::new(
                format!("Give each {} landmark a distinct aria-label", role),
                "<nav aria-label=\"Primary\">…</nav>\n<nav aria-label=\"Footer\">…</nav>",
            )]
        }
        "tabindex" => {
            let value = context
                .and_then(|c| c.get("tabindex"))
                .and_then(|v| v.as_i64())
                .map(|v| v.to_string())
                .unwrap_or_else(|| "1".to_string());
            vec![
                FixSuggestion::new(
                    format!("Replace tabindex=\"{}\" with tabindex=\"0\" and order the DOM to match the visual order", value),
                    "<div tabindex=\"0\">…</div>",
                )
                .auto_fixable(),
                FixSuggestion::new(
                    "Remove tabindex entirely if the element is natively focusable",
                    "<button>Save</button>",
                )
                .auto_fixable(),
            ]
        }
        "click-events-have-key-events" => vec![
            FixSuggestion::new(
                "Use a native <button> for click interactions",
                "<button type=\"button\" onclick=\"toggle()\">Toggle</button>",
            ),
            FixSuggestion::new(
                "Otherwise add role, tabindex, and a key handler for Enter and Space",
                "<div role=\"button\" tabindex=\"0\" onclick=\"toggle()\" onkeydown=\"onKey(event)\">Toggle</div>",
            ),
        ],
        "aria-valid-role" => {
            let role = ctx_str(context, "role").unwrap_or("");
            let mut fixes = Vec::new();
            if let Some(candidate) = closest_role(role) {
                fixes.push(
                    FixSuggestion::new(
                        format!("Did you mean role=\"{}\"?", candidate),
                        format!("<div role=\"{}\">…</div>", candidate),
                    )
                    .auto_fixable(),
                );
            }
            fixes.push(FixSuggestion::new(
                "Use a concrete ARIA role, or a native element that already has the role",
                "<button>…</button> instead of <div role=\"widget\">",
            ));
            fixes.push(FixSuggestion::new(
                "Remove the role attribute if no role is needed",
                "<div>…</div>",
            ));
            fixes
        }
        "aria-hidden-focus" => vec![
            FixSuggestion::new(
                "Remove aria-hidden=\"true\" if the content is meant to be used",
                "<button>Close</button>",
            ),
            FixSuggestion::new(
                "Take hidden controls out of the tab order with tabindex=\"-1\" or disabled, or use the inert attribute",
                "<div aria-hidden=\"true\" inert><a href=\"/\" tabindex=\"-1\">…</a></div>",
            ),
        ],
        "button-name" => vec![
            FixSuggestion::new(
                "Add visible text inside the button",
                "<button>Close</button>",
            ),
            FixSuggestion::new(
                "For icon-only buttons add an aria-label",
                "<button aria-label=\"Close dialog\"><svg aria-hidden=\"true\">…</svg></button>",
            )
            .auto_fixable(),
            FixSuggestion::new(
                "Or add visually hidden text",
                "<button><svg aria-hidden=\"true\">…</svg><span class=\"sr-only\">Close dialog</span></button>",
            ),
        ],
        "aria-redundant-role" => {
            let role = ctx_str(context, "role").unwrap_or("…");
            vec![FixSuggestion::new(
                format!("Remove role=\"{}\"; the element already exposes it", role),
                "<nav>…</nav>",
            )
            .auto_fixable()]
        }
        "label" => {
            let id = ctx_str(context, "id").unwrap_or("field-id");
            vec![
                FixSuggestion::new(
                    "Associate a visible <label> with the control",
                    format!("<label for=\"{}\">Email</label>\n<input id=\"{}\" type=\"email\">", id, id),
                ),
                FixSuggestion::new(
                    "Wrap the control in its label",
                    "<label>Email <input type=\"email\"></label>",
                ),
                FixSuggestion::new(
                    "When no visible label fits the design, add aria-label",
                    "<input type=\"search\" aria-label=\"Search components\">",
                )
                .auto_fixable(),
            ]
        }
        "image-alt" => vec![
            FixSuggestion::new(
                "Describe the image's content or purpose in the alt attribute",
                "<img src=\"chart.png\" alt=\"Revenue grew 15% in Q4\">",
            ),
            FixSuggestion::new(
                "Mark purely decorative images with an empty alt",
                "<img src=\"divider.png\" alt=\"\">",
            )
            .auto_fixable(),
        ],
        "image-redundant-alt" => {
            let alt = ctx_str(context, "alt").unwrap_or("");
            vec![
                FixSuggestion::new(
                    format!("Replace alt=\"{}\" with a description of what the image conveys", alt),
                    "<img src=\"team.jpg\" alt=\"The design team at the 2024 offsite\">",
                ),
                FixSuggestion::new(
                    "Use alt=\"\" if the image adds nothing beyond surrounding text",
                    "<img src=\"icon.svg\" alt=\"\">",
                )
                .auto_fixable(),
            ]
        }
        "link-name" => vec![
            FixSuggestion::new(
                "Add link text describing the destination",
                "<a href=\"/settings\">Account settings</a>",
            ),
            FixSuggestion::new(
                "For icon-only links add an aria-label",
                "<a href=\"/settings\" aria-label=\"Account settings\"><svg aria-hidden=\"true\">…</svg></a>",
            )
            .auto_fixable(),
        ],
        "link-text-generic" => {
            let text = ctx_str(context, "text").unwrap_or("Click here");
            vec![
                FixSuggestion::new(
                    format!("Replace \"{}\" with text naming the destination", text),
                    "<a href=\"/pricing\">View pricing plans</a>",
                ),
                FixSuggestion::new(
                    "Or keep the short text and extend it with visually hidden context",
                    "<a href=\"/pricing\">Read more<span class=\"sr-only\"> about pricing</span></a>",
                ),
            ]
        }
        "table-headers" => vec![
            FixSuggestion::new(
                "Mark the header row with <th> cells",
                "<thead><tr><th scope=\"col\">Name</th><th scope=\"col\">Status</th></tr></thead>",
            ),
            FixSuggestion::new(
                "If the table only lays out content, mark it presentational",
                "<table role=\"presentation\">…</table>",
            )
            .auto_fixable(),
        ],
        "th-scope" => vec![FixSuggestion::new(
            "Add scope=\"col\" to column headers and scope=\"row\" to row headers",
            "<th scope=\"col\">Name</th>",
        )
        .auto_fixable()],
        "heading-order" => {
            let expected = ctx_u64(context, "previousLevel").map(|p| p + 1).unwrap_or(2);
            let found = ctx_u64(context, "level").unwrap_or(expected + 1);
            vec![
                FixSuggestion::new(
                    format!("Change this <h{}> to <h{}> and style it with CSS instead", found, expected),
                    format!("<h{} class=\"text-sm\">…</h{}>", expected, expected),
                )
                .auto_fixable(),
                FixSuggestion::new(
                    "Let callers pass the heading level so the component fits any outline",
                    "<CardTitle as=\"h3\">…</CardTitle>",
                ),
            ]
        }
        "empty-heading" => vec![
            FixSuggestion::new("Give the heading text content", "<h2>Billing</h2>"),
            FixSuggestion::new(
                "Remove the heading element if it only exists for styling",
                "<div class=\"text-lg font-semibold\"></div>",
            ),
        ],
        "list" => vec![
            FixSuggestion::new(
                "Wrap every list entry in <li> and keep <li> inside <ul> or <ol>",
                "<ul>\n  <li>First</li>\n  <li>Second</li>\n</ul>",
            ),
            FixSuggestion::new(
                "If the container is not semantically a list, use <div> elements",
                "<div><div>First</div><div>Second</div></div>",
            ),
        ],
        "markup-parse" => vec![FixSuggestion::new(
            "Close every tag, attribute quote, and comment so the markup can be parsed",
            "<img src=\"x.png\" alt=\"\">",
        )],
        "rule-execution" => vec![FixSuggestion::new(
            "Re-run with --verbose and report the failing rule with the markup that triggered it",
            "a11yguard validate Component.html --verbose",
        )],
        _ => Vec::new(),
    };

    let docs = match find_rule(rule) {
        Some(spec) => Some(spec.help_url.to_string()),
        None if rule == MARKUP_PARSE_RULE || rule == RULE_EXECUTION_RULE => Some(parsing_help_url()),
        None => None,
    };
    if let Some(docs) = docs {
        for fix in &mut fixes {
            if fix.docs_url.is_none() {
                fix.docs_url = Some(docs.clone());
            }
        }
    }

    fixes
}

fn contrast_fixes(context: Option<&ErrorContext>) -> Vec<FixSuggestion> {
    let ratio = ctx_f64(context, "contrastRatio");
    let required = ctx_f64(context, "requiredRatio").unwrap_or(4.5);
    let fg = ctx_str(context, "foreground").unwrap_or("#767676");
    let bg = ctx_str(context, "background").unwrap_or("#ffffff");

    let headline = match ratio {
        Some(r) => format!(
            "Increase the contrast between {} and {} from {:.2}:1 to at least {}:1",
            fg, bg, r, required
        ),
        None => format!("Increase the text contrast to at least {}:1", required),
    };

    vec![
        FixSuggestion::new(headline, format!("color: #1f2937; background-color: {};", bg)),
        FixSuggestion::new(
            "Use a darker design token for text on light surfaces (or lighter on dark surfaces)",
            "class=\"text-foreground bg-background\"",
        ),
        FixSuggestion::new(
            "If the text is decorative or large, increase it to at least 24px (or 18.66px bold) where 3:1 applies",
            "font-size: 24px;",
        ),
    ]
}

/// Nearest valid role within edit distance 2, for typo suggestions
fn closest_role(role: &str) -> Option<&'static str> {
    const CANDIDATES: &[&str] = &[
        "alert", "button", "checkbox", "combobox", "dialog", "grid", "heading", "img", "link",
        "list", "listbox", "listitem", "menu", "menuitem", "navigation", "option", "progressbar",
        "radio", "region", "row", "search", "slider", "status", "switch", "tab", "tablist",
        "tabpanel", "textbox", "tooltip", "tree",
    ];
    let role = role.split_whitespace().next()?.to_lowercase();
    CANDIDATES
        .iter()
        .map(|c| (edit_distance(&role, c), *c))
        .filter(|(d, _)| *d > 0 && *d <= 2)
        .min_by_key(|(d, _)| *d)
        .map(|(_, c)| c)
}

fn edit_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut curr = vec![i + 1; b_chars.len() + 1];
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = if ca == *cb { 0 } else { 1 };
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        prev = curr;
    }
    prev[b_chars.len()]
}
