//! HTML table extraction shared by the scraping sources.

use scraper::{ElementRef, Html, Selector};

use crate::domain::RawBatch;
use crate::error::AppError;

fn collect_rows<'a>(
    rows: impl Iterator<Item = ElementRef<'a>>,
    cell_sel: &Selector,
    width: usize,
) -> Vec<Vec<String>> {
    let mut out = Vec::new();
    for tr in rows {
        let cells: Vec<String> = tr
            .select(cell_sel)
            .map(|td| td.text().collect::<String>().trim().to_string())
            .collect();
        if cells.len() == width {
            out.push(cells);
        }
    }
    out
}

/// Extract `<td>` cell text from every row matching `row_selector`, keeping
/// only rows with exactly `columns.len()` cells. Header rows fall out
/// naturally (`<th>` cells don't match), as do layout rows.
///
/// Zero surviving rows is a fetch failure: it means the page rendered without
/// the expected table (layout change, bot interstitial, empty response).
pub fn extract_table(
    html: &str,
    row_selector: &str,
    columns: &[&str],
) -> Result<RawBatch, AppError> {
    let document = Html::parse_document(html);
    let rows_sel = Selector::parse(row_selector)
        .map_err(|_| AppError::fetch(format!("Invalid row selector '{row_selector}'.")))?;
    let cell_sel = Selector::parse("td")
        .map_err(|_| AppError::fetch("Invalid cell selector 'td'."))?;

    let rows = collect_rows(document.select(&rows_sel), &cell_sel, columns.len());
    if rows.is_empty() {
        return Err(AppError::fetch(format!(
            "No rows extracted with selector '{row_selector}'."
        )));
    }

    Ok(RawBatch {
        columns: columns.iter().map(|s| s.to_string()).collect(),
        rows,
    })
}

/// Like `extract_table`, but reads `<tr>` rows only from the *first* element
/// matching `scope_selector`. Listing pages can carry more than one table;
/// only the first holds the data.
pub fn extract_scoped_table(
    html: &str,
    scope_selector: &str,
    columns: &[&str],
) -> Result<RawBatch, AppError> {
    let document = Html::parse_document(html);
    let scope_sel = Selector::parse(scope_selector)
        .map_err(|_| AppError::fetch(format!("Invalid scope selector '{scope_selector}'.")))?;
    let row_sel =
        Selector::parse("tr").map_err(|_| AppError::fetch("Invalid row selector 'tr'."))?;
    let cell_sel = Selector::parse("td")
        .map_err(|_| AppError::fetch("Invalid cell selector 'td'."))?;

    let scope = document.select(&scope_sel).next().ok_or_else(|| {
        AppError::fetch(format!("No element matched selector '{scope_selector}'."))
    })?;

    let rows = collect_rows(scope.select(&row_sel), &cell_sel, columns.len());
    if rows.is_empty() {
        return Err(AppError::fetch(format!(
            "No rows extracted under selector '{scope_selector}'."
        )));
    }

    Ok(RawBatch {
        columns: columns.iter().map(|s| s.to_string()).collect(),
        rows,
    })
}
