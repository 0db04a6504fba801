use chrono::NaiveDate;
use scraper::{ElementRef, Html};

use crate::error::Result;
use crate::html_util::{document_order_blocks, resolve_toggle_and_config, table_cells, Block};
use crate::release_notes::ClassificationOverride;

use super::models::{DeployNotePage, ParsedDeployChange};

const OPTION_HEADER: &str = "Feature Option Name to Enable";

/// Parse a rendered deploy-note page (§4.2): no H2 sections, a flat list
/// of changes under H3 categories. Same table rule as release notes,
/// keyed by "Feature Option Name to Enable" instead of "Feature Option
/// to Enable".
pub fn parse_deploy_note_page(
    html: &str,
    page_date: NaiveDate,
    overrides: &[ClassificationOverride<'_>],
) -> Result<DeployNotePage> {
    let doc = Html::parse_document(html);
    let blocks = document_order_blocks(&doc);

    let mut changes = Vec::new();
    let mut current_category = String::new();
    let mut last_nonblank_category: Option<String> = None;
    let fallback_category = blocks.iter().find_map(|b| match b {
        Block::H3(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        _ => None,
    });

    let mut pending: Option<Pending<'_>> = None;

    for block in &blocks {
        match block {
            Block::H2(_) => {
                // Deploy notes have no H2 sections (§4.2); if present,
                // ignore it for grouping but still flush pending state.
                finish(&mut pending, &mut changes, overrides);
            }
            Block::H3(text) => {
                finish(&mut pending, &mut changes, overrides);
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    current_category =
                        last_nonblank_category.clone().or_else(|| fallback_category.clone()).unwrap_or_default();
                } else {
                    current_category = trimmed.to_string();
                    last_nonblank_category = Some(trimmed.to_string());
                }
            }
            Block::H4 { title, anchor_id, added_date_raw } => {
                finish(&mut pending, &mut changes, overrides);
                pending = Some(Pending {
                    category: current_category.clone(),
                    h4_title: title.clone(),
                    anchor_id: anchor_id.clone(),
                    added_date: added_date_raw.as_deref().and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()),
                    raw_html: String::new(),
                    table: None,
                });
            }
            Block::Table(table_el) => {
                if let Some(p) = pending.as_mut() {
                    p.raw_html.push_str(&table_el.html());
                    if p.table.is_none() {
                        p.table = Some(*table_el);
                    }
                }
            }
            Block::Other(el) => {
                if let Some(p) = pending.as_mut() {
                    p.raw_html.push_str(&el.html());
                }
            }
        }
    }

    finish(&mut pending, &mut changes, overrides);

    Ok(DeployNotePage { page_date, changes })
}

struct Pending<'a> {
    category: String,
    h4_title: String,
    anchor_id: String,
    added_date: Option<NaiveDate>,
    raw_html: String,
    table: Option<ElementRef<'a>>,
}

fn finish(pending: &mut Option<Pending<'_>>, changes: &mut Vec<ParsedDeployChange>, overrides: &[ClassificationOverride<'_>]) {
    let Some(p) = pending.take() else { return };

    let cells = p.table.map(table_cells).unwrap_or_default();
    let (mut toggle, config) = resolve_toggle_and_config(&cells, OPTION_HEADER);

    for ov in overrides {
        let matches = ov.anchor_id.is_some_and(|a| a == p.anchor_id)
            || ov.h4_title.is_some_and(|t| t == p.h4_title);
        if matches {
            toggle = if ov.force_setting {
                crate::html_util::ToggleKind::Setting
            } else {
                crate::html_util::ToggleKind::Option {
                    canonical_name: ov.canonical_name.unwrap_or(&p.h4_title).to_string(),
                }
            };
        }
    }

    changes.push(ParsedDeployChange {
        category: p.category,
        h4_title: p.h4_title,
        anchor_id: p.anchor_id,
        added_date: p.added_date,
        raw_content: p.raw_html,
        toggle,
        config,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn na_cell_classifies_as_setting() {
        let html = r#"
            <h3>Assignments</h3>
            <h4>Minor bug fix</h4>
            <table><tr><th>Feature Option Name to Enable</th><td><p>N/A</p></td></tr></table>
        "#;
        let page = parse_deploy_note_page(html, NaiveDate::from_ymd_opt(2026, 2, 21).unwrap(), &[]).unwrap();
        assert_eq!(page.changes.len(), 1);
        assert!(matches!(page.changes[0].toggle, crate::html_util::ToggleKind::Setting));
    }

    #[test]
    fn flat_list_has_no_sections() {
        let html = r#"
            <h3>Grades</h3>
            <h4>First change</h4>
            <table><tr><th>Feature Option Name to Enable</th><td><p>Speed Grader Beta</p></td></tr></table>
            <h4>Second change</h4>
            <table><tr><th>Feature Option Name to Enable</th><td><p>N/A</p></td></tr></table>
        "#;
        let page = parse_deploy_note_page(html, NaiveDate::from_ymd_opt(2026, 2, 21).unwrap(), &[]).unwrap();
        assert_eq!(page.changes.len(), 2);
        assert_eq!(page.changes[1].category, "Grades");
    }
}
