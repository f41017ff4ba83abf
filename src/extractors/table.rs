// src/extractors/table.rs

use crate::extractors::money;
use crate::extractors::section::{self, FACILITY_KEYWORD, ORG_PREFIXES};
use crate::extractors::ExtractConfig;
use crate::utils::error::ExtractError;

/// A detected table: rows of cell strings, in reading order.
pub type Table = Vec<Vec<String>>;

/// Table-mode pipeline: applies the section/row location logic to table rows
/// and cells. Tried across all detected tables; the first matching table
/// wins. `NoTableMatch` signals the caller to fall back to the text pipeline.
pub fn price_from_tables(tables: &[Table], cfg: &ExtractConfig) -> Result<f64, ExtractError> {
    for (i, table) in tables.iter().enumerate() {
        match price_from_table(table, cfg) {
            Ok(price) => return Ok(price),
            Err(e) => tracing::trace!("Table {} skipped: {}", i, e),
        }
    }
    Err(ExtractError::NoTableMatch)
}

fn price_from_table(table: &Table, cfg: &ExtractConfig) -> Result<f64, ExtractError> {
    let anchor_row = table
        .iter()
        .position(|row| row.iter().any(|cell| cell.contains(&cfg.terminal_anchor)))
        .ok_or_else(|| ExtractError::AnchorNotFound(cfg.terminal_anchor.clone()))?;
    let start = anchor_row + 1;

    let end = table
        .get(start..)
        .unwrap_or(&[])
        .iter()
        .position(|row| is_terminal_header_row(row))
        .map(|offset| start + offset)
        .unwrap_or(table.len());

    let block = &table[start..end];
    let product_offset = block
        .iter()
        .position(|row| row_starts_with(row, &cfg.product_prefix))
        .ok_or_else(|| ExtractError::ProductRowNotFound(cfg.product_prefix.clone()))?;
    let product_row = &block[product_offset];

    // Column-header resolution beats positional selection when it applies:
    // a header row anywhere above the product row naming the price column
    // pins down the exact cell.
    if let Some(label) = &cfg.price_column_label {
        let header_rows = &table[..start + product_offset];
        for row in header_rows {
            let Some(column) = row.iter().position(|cell| cell.contains(label.as_str())) else {
                continue;
            };
            if let Some(value) = product_row
                .get(column)
                .map(|cell| money::find_money_values(cell))
                .and_then(|values| values.first().copied())
            {
                tracing::debug!("Resolved price column {} via header '{}'", column, label);
                return Ok(value);
            }
        }
        tracing::trace!("Price column label '{}' not matched, using strategy", label);
    }

    let values = money::find_money_values(&product_row.join(" "));
    section::select_value(&values, &cfg.strategy)
}

fn is_terminal_header_row(row: &[String]) -> bool {
    let Some(first) = row.iter().find(|cell| !cell.trim().is_empty()) else {
        return false;
    };
    let trimmed = first.trim();
    ORG_PREFIXES.iter().any(|p| trimmed.starts_with(p))
        && row.iter().any(|cell| cell.contains(FACILITY_KEYWORD))
}

fn row_starts_with(row: &[String], prefix: &str) -> bool {
    row.iter()
        .find(|cell| !cell.trim().is_empty())
        .is_some_and(|cell| cell.trim().starts_with(prefix))
}
