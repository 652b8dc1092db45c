// SPDX-License-Identifier: PMPL-1.0-or-later
//! Table structure - WCAG 1.3.1 Info and Relationships (Level A)

use crate::error::Result;
use crate::finding::A11yError;
use crate::rules::{is_presentational, RuleContext};
use scraper::ElementRef;

/// Header/data cells that belong to `table` itself, not to a nested table
fn own_cells<'a>(table: ElementRef<'a>, name: &str) -> Vec<ElementRef<'a>> {
    table
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|cell| cell.value().name() == name)
        .filter(|cell| {
            cell.ancestors()
                .filter_map(ElementRef::wrap)
                .find(|a| a.value().name() == "table")
                .map(|nearest| nearest == table)
                .unwrap_or(false)
        })
        .collect()
}

pub fn check_table_headers(ctx: &RuleContext<'_>) -> Result<Vec<A11yError>> {
    let mut errors = Vec::new();

    for table in ctx.select("table")? {
        if is_presentational(table) {
            continue;
        }

        let headers = own_cells(table, "th");
        let data = own_cells(table, "td");
        if !headers.is_empty() || data.is_empty() {
            continue;
        }

        errors.push(
            ctx.violation(
                table,
                &format!(
                    "Data table with {} cells declares no <th> header cells",
                    data.len()
                ),
            )
            .with_context("dataCells", data.len()),
        );
    }

    Ok(errors)
}

pub fn check_th_scope(ctx: &RuleContext<'_>) -> Result<Vec<A11yError>> {
    let mut errors = Vec::new();

    for table in ctx.select("table")? {
        if is_presentational(table) {
            continue;
        }

        for th in own_cells(table, "th") {
            let value = th.value();
            let scope = value.attr("scope").map(|s| s.trim().to_lowercase());
            match scope.as_deref() {
                None | Some("") => {
                    if value.attr("id").is_some() {
                        // Referenced through td[headers]
                        continue;
                    }
                    errors.push(ctx.violation(
                        th,
                        "Header cell has no scope; add scope=\"col\" or scope=\"row\"",
                    ));
                }
                Some("col") | Some("row") | Some("colgroup") | Some("rowgroup") => {}
                Some(other) => {
                    errors.push(
                        ctx.violation(th, &format!("Header cell has invalid scope=\"{}\"", other))
                            .with_context("scope", other),
                    );
                }
            }
        }
    }

    Ok(errors)
}
