// src/extractors/section.rs

use crate::extractors::money;
use crate::extractors::{ExtractConfig, SelectionStrategy};
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use regex::Regex;

// --- Constants ---
// A terminal block is closed by the next terminal's header line: an
// organizational prefix followed somewhere by the facility keyword.
pub(crate) const ORG_PREFIXES: [&str; 2] = ["UAB ", "AB "];
pub(crate) const FACILITY_KEYWORD: &str = "terminalas";

// --- Regex Patterns (Lazy Static) ---
// "Kainos galioja nuo 2024-08-15 10:00" — the effective-from phrase the
// protocols print once near the top of the document.
static EFFECTIVE_FROM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Kainos\s+galioja\s+nuo\s+(\d{4}-\d{2}-\d{2})\s+(\d{1,2}:\d{2})")
        .expect("Failed to compile EFFECTIVE_FROM_RE")
});

/// Half-open line-index range of one terminal's block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionBounds {
    pub start: usize,
    pub end: usize,
}

/// Locates the block belonging to the terminal named by `anchor`.
///
/// The block starts on the line after the first line containing the anchor
/// and runs to the next terminal header, or to the end of the document.
/// Because the end scan begins at `start`, an anchor line that itself looks
/// like a terminal header can never close its own section.
pub fn locate_section(lines: &[&str], anchor: &str) -> Result<SectionBounds, ExtractError> {
    let anchor_line = lines
        .iter()
        .position(|l| l.contains(anchor))
        .ok_or_else(|| ExtractError::AnchorNotFound(anchor.to_string()))?;
    let start = anchor_line + 1;

    let end = lines
        .get(start..)
        .unwrap_or(&[])
        .iter()
        .position(|l| is_terminal_header(l))
        .map(|offset| start + offset)
        .unwrap_or(lines.len());

    Ok(SectionBounds { start, end })
}

fn is_terminal_header(line: &str) -> bool {
    let trimmed = line.trim();
    ORG_PREFIXES.iter().any(|p| trimmed.starts_with(p)) && trimmed.contains(FACILITY_KEYWORD)
}

/// Returns the index (relative to `section`) of the first line whose trimmed
/// content starts with the product prefix.
pub fn locate_product_row(section: &[&str], prefix: &str) -> Result<usize, ExtractError> {
    section
        .iter()
        .position(|l| l.trim().starts_with(prefix))
        .ok_or_else(|| ExtractError::ProductRowNotFound(prefix.to_string()))
}

/// Applies the selection strategy to the ordered money values of a row.
pub fn select_value(values: &[f64], strategy: &SelectionStrategy) -> Result<f64, ExtractError> {
    match strategy {
        SelectionStrategy::Ordinal { index } => {
            values
                .get(*index)
                .copied()
                .ok_or(ExtractError::InsufficientValues {
                    found: values.len(),
                    needed: index + 1,
                })
        }
        SelectionStrategy::ExciseAnchor { min, max, fallback } => {
            let anchored = values
                .iter()
                .position(|v| *v >= *min && *v <= *max)
                .and_then(|pos| values.get(pos + 1).copied());
            match anchored {
                Some(value) => Ok(value),
                None => select_value(values, &SelectionStrategy::Ordinal { index: *fallback }),
            }
        }
    }
}

/// Matches the effective-from phrase anywhere in the document text.
/// The match is accepted only if chrono agrees it is a real timestamp.
pub fn find_effective_date(text: &str) -> Option<String> {
    let caps = EFFECTIVE_FROM_RE.captures(text)?;
    let stamp = format!("{} {}", &caps[1], &caps[2]);
    chrono::NaiveDateTime::parse_from_str(&stamp, "%Y-%m-%d %H:%M").ok()?;
    Some(stamp)
}

/// Text-mode pipeline: locate the terminal block, find the product row, and
/// apply the selection strategy to its money values.
///
/// If the row alone yields fewer values than the strategy needs, the window
/// is widened line by line (up to `cfg.lookahead` extra lines) to recover
/// columns the PDF renderer wrapped onto the next physical line.
pub fn price_from_text(text: &str, cfg: &ExtractConfig) -> Result<f64, ExtractError> {
    if text.trim().is_empty() {
        return Err(ExtractError::EmptyDocument);
    }

    let lines: Vec<&str> = text.lines().collect();
    let bounds = locate_section(&lines, &cfg.terminal_anchor)?;
    let block = &lines[bounds.start..bounds.end];
    let row = locate_product_row(block, &cfg.product_prefix)?;
    tracing::debug!(
        "Product row at line {} inside section [{}, {})",
        bounds.start + row,
        bounds.start,
        bounds.end
    );

    let needed = cfg.strategy.min_values();
    let mut values = Vec::new();
    for extra in 0..=cfg.lookahead {
        let upper = (row + 1 + extra).min(block.len());
        values = money::find_money_values(&block[row..upper].join(" "));
        if values.len() >= needed {
            break;
        }
    }
    tracing::debug!("Recovered money values: {:?}", values);

    select_value(&values, &cfg.strategy)
}
