//! Shared primitives for walking a rendered release-note / deploy-note page
//! in document order (§4.2). Both `release_notes` and `deploy_notes` reuse
//! this: headings divide the page into sections/categories/entries, and
//! the first `<table>` found between one H4 and the next H4/H3/H2 is that
//! entry's configuration table.

use canvas_core::slugify;
use scraper::{ElementRef, Html, Selector};

/// One heading/table/other block encountered in document order.
pub enum Block<'a> {
    H2(String),
    H3(String),
    H4 { title: String, anchor_id: String, added_date_raw: Option<String> },
    Table(ElementRef<'a>),
    /// Any other element at the top level, kept so `raw_content` can be
    /// reconstructed verbatim for the span between two headings.
    Other(ElementRef<'a>),
}

/// Walk every `h2`, `h3`, `h4`, `table`, `p`, `ul`, `ol`, `div` in document
/// order. A single compiled selector preserves document order because
/// `scraper`'s `Select` iterator walks the tree once and tests each node
/// against the (OR'd) component list, rather than running one selector
/// pass per tag and concatenating.
pub fn document_order_blocks(doc: &Html) -> Vec<Block<'_>> {
    let selector = Selector::parse("h2, h3, h4, table, p, ul, ol").unwrap();
    doc.select(&selector)
        .filter(|el| !has_ancestor_tag(*el, "table"))
        .map(|el| match el.value().name() {
            "h2" => Block::H2(text_of(el)),
            "h3" => Block::H3(text_of(el)),
            "h4" => {
                let (title, added_date_raw) = strip_added_marker(&text_of(el));
                let anchor_id = el
                    .value()
                    .attr("data-id")
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| slugify(&title));
                Block::H4 { title, anchor_id, added_date_raw }
            }
            "table" => Block::Table(el),
            _ => Block::Other(el),
        })
        .collect()
}

/// `<p>`/`<ul>`/`<ol>` nodes inside a `<table>` are already reachable via
/// the table's own cell-parsing helpers; exclude them here so they don't
/// also show up as loose `Block::Other` entries in a page's raw content.
fn has_ancestor_tag(el: ElementRef<'_>, tag: &str) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| a.value().name() == tag)
}

pub fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Strip a trailing `[Added YYYY-MM-DD]` marker off an H4 title (§4.2),
/// returning the cleaned title and the raw date text if present.
fn strip_added_marker(title: &str) -> (String, Option<String>) {
    let re = regex_added_marker();
    if let Some(caps) = re.captures(title) {
        let date_raw = caps.get(1).map(|m| m.as_str().to_string());
        let cleaned = re.replace(title, "").trim().to_string();
        (cleaned, date_raw)
    } else {
        (title.to_string(), None)
    }
}

fn regex_added_marker() -> regex::Regex {
    regex::Regex::new(r"\[Added\s+(\d{4}-\d{2}-\d{2})\]\s*$").unwrap()
}

/// Outer HTML of a table's rows, keyed by the first cell of each row
/// (normalized header text) -> second cell's raw HTML (for multi-cell
/// rows) or inner text (§4.2 table rules operate per labeled cell).
pub fn table_cells(table: ElementRef<'_>) -> Vec<(String, ElementRef<'_>)> {
    let row_sel = Selector::parse("tr").unwrap();
    let cell_sel = Selector::parse("th, td").unwrap();

    table
        .select(&row_sel)
        .filter_map(|row| {
            let mut cells = row.select(&cell_sel);
            let header = cells.next()?;
            let value = cells.next()?;
            Some((normalize_header(&text_of(header)), value))
        })
        .collect()
}

fn normalize_header(raw: &str) -> String {
    raw.trim().to_string()
}

/// Text of only the first `<p>` child of a cell (§4.2: "Feature Option to
/// Enable" reads the first paragraph only, ignoring any trailing notes).
pub fn first_paragraph_text(cell: ElementRef<'_>) -> String {
    let p_sel = Selector::parse("p").unwrap();
    match cell.select(&p_sel).next() {
        Some(p) => text_of(p),
        None => text_of(cell),
    }
}

pub fn bool_cell(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "yes" => Some(true),
        "no" => Some(false),
        _ => None,
    }
}

use std::sync::LazyLock;

static LOCATION_LINE_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^(Account|Course)\s*\(([^)]+)\)$").unwrap());

/// Parse the "Enable Feature Option Location & Default Status" cell
/// (§4.2): one matching line per location, each `^(Account|Course)\s*\(…\)$`.
pub fn parse_enable_location(raw: &str) -> (Option<String>, Option<String>) {
    let mut account = None;
    let mut course = None;
    for line in raw.lines() {
        if let Some(caps) = LOCATION_LINE_RE.captures(line.trim()) {
            let status = caps.get(2).unwrap().as_str().to_string();
            match &caps[1] {
                "Account" => account = Some(status),
                "Course" => course = Some(status),
                _ => {}
            }
        }
    }
    (account, course)
}

/// Whether the table's option-name cell resolved this entry to a
/// toggleable option or a non-toggle setting (§4.2 rule, §3 invariant: an
/// announcement links to one xor the other).
#[derive(Debug, Clone)]
pub enum ToggleKind {
    Option { canonical_name: String },
    Setting,
}

/// Resolve the option-vs-setting classification and configuration
/// snapshot for one entry's table (§4.2). `option_header` is the exact
/// header text this source uses for the toggle-name cell — release notes
/// say "Feature Option to Enable", deploy notes say "Feature Option Name
/// to Enable"; every other header is shared between the two formats.
pub fn resolve_toggle_and_config(
    cells: &[(String, ElementRef<'_>)],
    option_header: &str,
) -> (ToggleKind, canvas_types::ConfigSnapshot) {
    use canvas_types::ConfigSnapshot;

    let toggle_name = cells
        .iter()
        .find(|(header, _)| header == option_header)
        .map(|(_, cell)| first_paragraph_text(*cell))
        .unwrap_or_default();

    let toggle = if toggle_name.is_empty() || toggle_name.eq_ignore_ascii_case("n/a") {
        ToggleKind::Setting
    } else {
        ToggleKind::Option { canonical_name: toggle_name }
    };

    let mut config = ConfigSnapshot::default();

    for (header, cell) in cells {
        let text = text_of(*cell);
        match header.as_str() {
            "Enable Feature Option Location & Default Status" => {
                let (account, course) = parse_enable_location(&text);
                config.enable_location_account = account;
                config.enable_location_course = course;
            }
            "Subaccount Configuration" => config.subaccount_config = bool_cell(&text),
            "Affects User Interface" => config.affects_ui = bool_cell(&text),
            "Affected Areas" => {
                config.affected_areas =
                    text.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect();
            }
            "Permissions" => config.permissions = Some(text),
            _ => {}
        }
    }

    (toggle, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_added_marker_and_captures_date() {
        let (title, date) = strip_added_marker("Document Processor [Added 2026-02-21]");
        assert_eq!(title, "Document Processor");
        assert_eq!(date.as_deref(), Some("2026-02-21"));
    }

    #[test]
    fn leaves_title_without_marker_untouched() {
        let (title, date) = strip_added_marker("Document Processor");
        assert_eq!(title, "Document Processor");
        assert_eq!(date, None);
    }
}
