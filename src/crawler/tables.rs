//! Leaf-page classification and dose-table extraction
//!
//! A leaf page carries a dosage specification table instead of further child
//! links. The table's header names vary across the index, so recognized
//! synonyms are mapped to canonical columns; unknown headers are preserved
//! verbatim but never selected. The source visually merges repeated code and
//! name cells across consecutive rows, which is undone here by filling the
//! last seen value downward.

use crate::crawler::parser::squish;
use crate::model::DoseRow;
use scraper::{ElementRef, Html, Selector};

/// Canonical dose-table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Code,
    Name,
    DoseValue,
    Unit,
    Route,
    Note,
}

/// Maps a header cell to its canonical column, `None` for unknown headers
fn canonical_column(header: &str) -> Option<Column> {
    match squish(header).to_lowercase().as_str() {
        "atc code" | "code" => Some(Column::Code),
        "name" => Some(Column::Name),
        "ddd" | "dose" => Some(Column::DoseValue),
        "u" | "unit" => Some(Column::Unit),
        "adm.r" | "adm.r." | "adm. r" | "route" => Some(Column::Route),
        "note" | "notes" | "comment" => Some(Column::Note),
        _ => None,
    }
}

/// True when the page carries a dosage table rather than child links
pub fn is_leaf(document: &Html) -> bool {
    find_dose_table(document).is_some()
}

/// Extracts the dosage rows from a leaf page
///
/// Scans all tables and takes the first whose header row has both a
/// code-like and a name-like column, falling back to the first table on the
/// page when none qualifies. Cells are trimmed and whitespace-squished, with
/// empty strings becoming absent. The code and name columns are then filled
/// downward, and rows still lacking a code are dropped.
///
/// # Returns
///
/// * `Some(rows)` - The extracted rows, possibly empty
/// * `None` - The page has no tables at all
pub fn parse_dose_table(document: &Html) -> Option<Vec<DoseRow>> {
    let tables = collect_tables(document);
    let table = match find_dose_table(document) {
        Some(table) => table,
        None => *tables.first()?,
    };

    let columns: Vec<Option<Column>> = header_cells(&table)
        .iter()
        .map(|h| canonical_column(h))
        .collect();

    let mut rows = Vec::new();
    if let (Ok(row_selector), Ok(cell_selector)) =
        (Selector::parse("tr"), Selector::parse("th, td"))
    {
        for tr in table.select(&row_selector).skip(1) {
            let cells: Vec<Option<String>> =
                tr.select(&cell_selector).map(|c| cell_text(&c)).collect();
            if cells.is_empty() {
                continue;
            }

            let mut row = RawRow::default();
            for (index, cell) in cells.into_iter().enumerate() {
                let column = match columns.get(index) {
                    Some(Some(column)) => *column,
                    _ => continue,
                };
                match column {
                    Column::Code => row.code = cell,
                    Column::Name => row.name = cell,
                    Column::DoseValue => row.dose_value = cell,
                    Column::Unit => row.unit = cell,
                    Column::Route => row.route = cell,
                    Column::Note => row.note = cell,
                }
            }
            rows.push(row);
        }
    }

    fill_down(&mut rows);

    Some(rows.into_iter().filter_map(RawRow::into_dose_row).collect())
}

/// A table row before fill-down; every column may still be absent
#[derive(Debug, Clone, Default)]
struct RawRow {
    code: Option<String>,
    name: Option<String>,
    dose_value: Option<String>,
    unit: Option<String>,
    route: Option<String>,
    note: Option<String>,
}

impl RawRow {
    /// Rows with no resolvable code are dropped
    fn into_dose_row(self) -> Option<DoseRow> {
        let code = self.code?;
        Some(DoseRow {
            code,
            name: self.name,
            dose_value: self.dose_value,
            unit: self.unit,
            route: self.route,
            note: self.note,
        })
    }
}

/// Carries the last seen code and name downward into rows whose cells were
/// blank, reconstructing values from visually merged table cells
///
/// Applies to the code and name columns only; the idempotent fill leaves an
/// already-filled table unchanged.
fn fill_down(rows: &mut [RawRow]) {
    let mut last_code: Option<String> = None;
    let mut last_name: Option<String> = None;

    for row in rows.iter_mut() {
        match &row.code {
            Some(code) => last_code = Some(code.clone()),
            None => row.code = last_code.clone(),
        }
        match &row.name {
            Some(name) => last_name = Some(name.clone()),
            None => row.name = last_name.clone(),
        }
    }
}

fn collect_tables(document: &Html) -> Vec<ElementRef<'_>> {
    match Selector::parse("table") {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// First table whose header row has both a code and a name column
fn find_dose_table(document: &Html) -> Option<ElementRef<'_>> {
    for table in collect_tables(document) {
        let columns: Vec<Option<Column>> = header_cells(&table)
            .iter()
            .map(|h| canonical_column(h))
            .collect();
        if columns.contains(&Some(Column::Code)) && columns.contains(&Some(Column::Name)) {
            return Some(table);
        }
    }
    None
}

/// Squished text of the first row's cells
fn header_cells(table: &ElementRef) -> Vec<String> {
    if let (Ok(row_selector), Ok(cell_selector)) =
        (Selector::parse("tr"), Selector::parse("th, td"))
    {
        if let Some(header_row) = table.select(&row_selector).next() {
            return header_row
                .select(&cell_selector)
                .map(|c| squish(&c.text().collect::<String>()))
                .collect();
        }
    }
    Vec::new()
}

/// Cell text with whitespace squished; empty cells are absent
fn cell_text(cell: &ElementRef) -> Option<String> {
    let text = squish(&cell.text().collect::<String>());
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOSE_PAGE: &str = r#"<html><body>
        <table>
            <tr><th>ATC code</th><th>Name</th><th>DDD</th><th>U</th><th>Adm.R</th><th>Note</th></tr>
            <tr><td>D01AA01</td><td>Nystatin</td><td>1</td><td>g</td><td>O</td><td></td></tr>
            <tr><td></td><td></td><td>0.5</td><td>g</td><td>V</td><td></td></tr>
            <tr><td>D01AA02</td><td>Natamycin</td><td></td><td></td><td></td><td>topical</td></tr>
        </table>
    </body></html>"#;

    #[test]
    fn test_is_leaf_with_dose_table() {
        assert!(is_leaf(&Html::parse_document(DOSE_PAGE)));
    }

    #[test]
    fn test_is_leaf_false_for_link_page() {
        let html = r#"<html><body><a href="?code=D01A">D01A</a></body></html>"#;
        assert!(!is_leaf(&Html::parse_document(html)));
    }

    #[test]
    fn test_is_leaf_false_for_non_dose_table() {
        let html = r#"<table><tr><th>Year</th><th>Change</th></tr></table>"#;
        assert!(!is_leaf(&Html::parse_document(html)));
    }

    #[test]
    fn test_fill_down_from_merged_cells() {
        let rows = parse_dose_table(&Html::parse_document(DOSE_PAGE)).unwrap();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].code, "D01AA01");
        assert_eq!(rows[0].name.as_deref(), Some("Nystatin"));
        assert_eq!(rows[0].dose_value.as_deref(), Some("1"));
        assert_eq!(rows[0].route.as_deref(), Some("O"));
        assert_eq!(rows[0].note, None);

        // Second row inherits code and name from the merged cells above.
        assert_eq!(rows[1].code, "D01AA01");
        assert_eq!(rows[1].name.as_deref(), Some("Nystatin"));
        assert_eq!(rows[1].dose_value.as_deref(), Some("0.5"));
        assert_eq!(rows[1].route.as_deref(), Some("V"));

        assert_eq!(rows[2].code, "D01AA02");
        assert_eq!(rows[2].dose_value, None);
        assert_eq!(rows[2].note.as_deref(), Some("topical"));
    }

    #[test]
    fn test_fill_down_idempotent() {
        let mut rows = vec![
            RawRow {
                code: Some("D01AA01".to_string()),
                name: Some("Nystatin".to_string()),
                ..RawRow::default()
            },
            RawRow::default(),
        ];
        fill_down(&mut rows);
        let once: Vec<(Option<String>, Option<String>)> = rows
            .iter()
            .map(|r| (r.code.clone(), r.name.clone()))
            .collect();

        fill_down(&mut rows);
        let twice: Vec<(Option<String>, Option<String>)> = rows
            .iter()
            .map(|r| (r.code.clone(), r.name.clone()))
            .collect();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_rows_before_any_code_are_dropped() {
        let html = r#"<table>
            <tr><th>ATC code</th><th>Name</th><th>DDD</th></tr>
            <tr><td></td><td></td><td>2</td></tr>
            <tr><td>D01AA01</td><td>Nystatin</td><td>1</td></tr>
        </table>"#;
        let rows = parse_dose_table(&Html::parse_document(html)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].code, "D01AA01");
    }

    #[test]
    fn test_header_synonyms() {
        let html = r#"<table>
            <tr><th>Code</th><th>Name</th><th>Dose</th><th>Unit</th><th>Route</th><th>Comment</th></tr>
            <tr><td>N05BA01</td><td>Diazepam</td><td>10</td><td>mg</td><td>O</td><td>also rectal</td></tr>
        </table>"#;
        let rows = parse_dose_table(&Html::parse_document(html)).unwrap();
        assert_eq!(rows[0].code, "N05BA01");
        assert_eq!(rows[0].dose_value.as_deref(), Some("10"));
        assert_eq!(rows[0].unit.as_deref(), Some("mg"));
        assert_eq!(rows[0].route.as_deref(), Some("O"));
        assert_eq!(rows[0].note.as_deref(), Some("also rectal"));
    }

    #[test]
    fn test_unknown_headers_excluded_not_fatal() {
        let html = r#"<table>
            <tr><th>ATC code</th><th>Name</th><th>Last updated</th></tr>
            <tr><td>D01AA01</td><td>Nystatin</td><td>2024-01-01</td></tr>
        </table>"#;
        let rows = parse_dose_table(&Html::parse_document(html)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].dose_value, None);
        assert_eq!(rows[0].note, None);
    }

    #[test]
    fn test_falls_back_to_first_table() {
        // No table qualifies; the first one is parsed positionally.
        let html = r#"<table>
            <tr><th>ATC code</th><th>DDD</th></tr>
            <tr><td>D01AA01</td><td>1</td></tr>
        </table>"#;
        let rows = parse_dose_table(&Html::parse_document(html)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].code, "D01AA01");
        assert_eq!(rows[0].dose_value.as_deref(), Some("1"));
    }

    #[test]
    fn test_skips_preceding_navigation_table() {
        let html = r#"
            <table><tr><th>Search</th><th>Menu</th></tr><tr><td>x</td><td>y</td></tr></table>
            <table>
                <tr><th>ATC code</th><th>Name</th></tr>
                <tr><td>D01AA01</td><td>Nystatin</td></tr>
            </table>"#;
        let rows = parse_dose_table(&Html::parse_document(html)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].code, "D01AA01");
    }

    #[test]
    fn test_no_tables_is_absent() {
        let html = "<html><body><p>nothing tabular</p></body></html>";
        assert!(parse_dose_table(&Html::parse_document(html)).is_none());
    }

    #[test]
    fn test_empty_cells_become_absent() {
        let html = r#"<table>
            <tr><th>ATC code</th><th>Name</th><th>Note</th></tr>
            <tr><td>D01AA01</td><td>Nystatin</td><td>   </td></tr>
        </table>"#;
        let rows = parse_dose_table(&Html::parse_document(html)).unwrap();
        assert_eq!(rows[0].note, None);
    }
}
