use canvas_types::SectionKind;
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};

use crate::date_parse::parse_upcoming_date;
use crate::error::{Error, Result};
use crate::html_util::{document_order_blocks, resolve_toggle_and_config, table_cells, text_of, Block};

use super::models::{ParsedFeatureEntry, ParsedSection, ParsedUpcomingItem, ReleaseNotePage, SectionEntry};

const OPTION_HEADER: &str = "Feature Option to Enable";

/// Classification overrides (§4.2 "Classification overrides") let a static
/// config force a specific `h4_title`/`anchor_id` to option or setting,
/// bypassing the table-derived rule.
pub struct ClassificationOverride<'a> {
    pub anchor_id: Option<&'a str>,
    pub h4_title: Option<&'a str>,
    pub force_setting: bool,
    pub canonical_name: Option<&'a str>,
}

/// Parse a rendered release-note page into its structured form.
/// `page_date` is supplied by the caller (from the URL or fetch metadata)
/// since the spec doesn't require scraping it out of the body.
pub fn parse_release_note_page(
    html: &str,
    page_date: NaiveDate,
    overrides: &[ClassificationOverride<'_>],
) -> Result<ReleaseNotePage> {
    let doc = Html::parse_document(html);
    let blocks = document_order_blocks(&doc);

    let fallback_category = first_nonblank_h3(&blocks);

    let mut sections: Vec<ParsedSection> = Vec::new();
    let mut current_kind: Option<SectionKind> = None;
    let mut current_entries: Vec<SectionEntry> = Vec::new();
    let mut current_category = fallback_category.clone().unwrap_or_default();
    let mut last_nonblank_category: Option<String> = None;

    let mut pending: Option<PendingEntry<'_>> = None;

    for block in &blocks {
        match block {
            Block::H2(text) => {
                finish_pending(&mut pending, &mut current_entries, overrides);
                if let Some(kind) = current_kind.take() {
                    sections.push(ParsedSection { kind, entries: std::mem::take(&mut current_entries) });
                }
                current_kind = Some(SectionKind::from_h2_text(text));
            }
            Block::H3(text) => {
                finish_pending(&mut pending, &mut current_entries, overrides);
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
                finish_pending(&mut pending, &mut current_entries, overrides);

                pending = Some(PendingEntry {
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
                } else if matches!(current_kind, Some(SectionKind::UpcomingCanvasChanges)) {
                    for item in parse_upcoming_list(*el) {
                        current_entries.push(SectionEntry::Upcoming(item));
                    }
                }
            }
        }
    }

    finish_pending(&mut pending, &mut current_entries, overrides);
    if let Some(kind) = current_kind {
        sections.push(ParsedSection { kind, entries: current_entries });
    } else {
        return Err(Error::ParseError(
            "no H2 section heading found; page cannot be classified".to_string(),
        ));
    }

    Ok(ReleaseNotePage { page_date, sections })
}

struct PendingEntry<'a> {
    category: String,
    h4_title: String,
    anchor_id: String,
    added_date: Option<NaiveDate>,
    raw_html: String,
    table: Option<ElementRef<'a>>,
}

fn finish_pending<'a>(
    pending: &mut Option<PendingEntry<'a>>,
    entries: &mut Vec<SectionEntry>,
    overrides: &[ClassificationOverride<'_>],
) {
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

    entries.push(SectionEntry::Feature(ParsedFeatureEntry {
        category: p.category,
        h4_title: p.h4_title,
        anchor_id: p.anchor_id,
        added_date: p.added_date,
        raw_content: p.raw_html,
        toggle,
        config,
    }));
}

fn first_nonblank_h3(blocks: &[Block<'_>]) -> Option<String> {
    blocks.iter().find_map(|b| match b {
        Block::H3(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        _ => None,
    })
}

/// Parse `<li>` items of an "Upcoming Canvas Changes" list (§4.2): each
/// becomes a `(change_date, description)` pair, date parsing best-effort.
/// The common format is `"<date>: <description>"` or `"<date> - <description>"`.
fn parse_upcoming_list(el: ElementRef<'_>) -> Vec<ParsedUpcomingItem> {
    let li_sel = Selector::parse("li").unwrap();
    el.select(&li_sel)
        .map(|li| {
            let text = text_of(li);
            split_date_and_description(&text)
        })
        .collect()
}

fn split_date_and_description(text: &str) -> ParsedUpcomingItem {
    for sep in [": ", " - ", " — "] {
        if let Some((date_part, desc_part)) = text.split_once(sep) {
            if let Some(date) = parse_upcoming_date(date_part) {
                return ParsedUpcomingItem { change_date: Some(date), description: desc_part.trim().to_string() };
            }
        }
    }
    ParsedUpcomingItem { change_date: parse_upcoming_date(text), description: text.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <h2>New Features</h2>
        <h3>Assignments</h3>
        <h4 data-id="doc-proc">Document Processing App</h4>
        <table>
            <tr><th>Feature Option to Enable</th><td><p>Document Processor</p></td></tr>
            <tr><th>Affects User Interface</th><td>Yes</td></tr>
        </table>
        <p>Some description of the new app.</p>
    "#;

    #[test]
    fn parses_single_h2_h3_h4_entry() {
        let page = parse_release_note_page(PAGE, NaiveDate::from_ymd_opt(2026, 2, 21).unwrap(), &[]).unwrap();
        assert_eq!(page.sections.len(), 1);
        let entries = &page.sections[0].entries;
        assert_eq!(entries.len(), 1);
        let SectionEntry::Feature(entry) = &entries[0] else { panic!("expected feature entry") };
        assert_eq!(entry.category, "Assignments");
        assert_eq!(entry.anchor_id, "doc-proc");
        assert!(matches!(&entry.toggle, crate::html_util::ToggleKind::Option { canonical_name } if canonical_name == "Document Processor"));
        assert_eq!(entry.config.affects_ui, Some(true));
    }

    #[test]
    fn no_h2_is_a_parse_error() {
        let result = parse_release_note_page("<p>no headings here</p>", NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(), &[]);
        assert!(result.is_err());
    }

    #[test]
    fn setting_entry_when_option_cell_is_na() {
        let html = r#"
            <h2>Updated Features</h2>
            <h3>Grades</h3>
            <h4>Some Behavior Change</h4>
            <table><tr><th>Feature Option to Enable</th><td><p>N/A</p></td></tr></table>
        "#;
        let page = parse_release_note_page(html, NaiveDate::from_ymd_opt(2026, 2, 21).unwrap(), &[]).unwrap();
        let SectionEntry::Feature(entry) = &page.sections[0].entries[0] else { panic!() };
        assert!(matches!(entry.toggle, crate::html_util::ToggleKind::Setting));
    }

    #[test]
    fn blank_h3_carries_previous_category() {
        let html = r#"
            <h2>New Features</h2>
            <h3>Assignments</h3>
            <h4>First</h4>
            <table><tr><th>Feature Option to Enable</th><td><p>First Toggle</p></td></tr></table>
            <h3></h3>
            <h4>Second</h4>
            <table><tr><th>Feature Option to Enable</th><td><p>Second Toggle</p></td></tr></table>
        "#;
        let page = parse_release_note_page(html, NaiveDate::from_ymd_opt(2026, 2, 21).unwrap(), &[]).unwrap();
        let SectionEntry::Feature(second) = &page.sections[0].entries[1] else { panic!() };
        assert_eq!(second.category, "Assignments");
    }

    #[test]
    fn upcoming_changes_list_parsed() {
        let html = r#"
            <h2>Upcoming Canvas Changes</h2>
            <ul>
                <li>2026-03-01: SpeedGrader redesign ships</li>
                <li>sometime in spring: Gradebook tweaks</li>
            </ul>
        "#;
        let page = parse_release_note_page(html, NaiveDate::from_ymd_opt(2026, 2, 21).unwrap(), &[]).unwrap();
        assert_eq!(page.sections[0].entries.len(), 2);
        let SectionEntry::Upcoming(first) = &page.sections[0].entries[0] else { panic!() };
        assert_eq!(first.change_date, NaiveDate::from_ymd_opt(2026, 3, 1));
        let SectionEntry::Upcoming(second) = &page.sections[0].entries[1] else { panic!() };
        assert_eq!(second.change_date, None);
    }
}
