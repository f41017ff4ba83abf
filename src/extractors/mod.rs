// src/extractors/mod.rs
pub mod money;
pub mod pdf;
pub mod section;
pub mod table;

use crate::utils::error::ExtractError;

/// Strategy for choosing one value out of the ordered money tokens found on
/// the product row.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionStrategy {
    /// Fixed position in the sequence (zero-based). The production protocols
    /// carry the gross price in the third numeric column.
    Ordinal { index: usize },
    /// The value immediately following the first token inside the excise-tax
    /// band; falls back to `Ordinal { index: fallback }` when no token lands
    /// in the band (or the anchor is the last token).
    ExciseAnchor { min: f64, max: f64, fallback: usize },
}

impl SelectionStrategy {
    /// Minimum token count before the text pipeline stops widening its
    /// look-ahead window over wrapped lines.
    pub(crate) fn min_values(&self) -> usize {
        match self {
            SelectionStrategy::Ordinal { index } => index + 1,
            SelectionStrategy::ExciseAnchor { fallback, .. } => fallback + 1,
        }
    }
}

/// Configuration for one extraction run. Anchors and strategy are explicit
/// parameters so the core stays free of I/O and global state.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Literal anchor naming the terminal whose section is wanted.
    pub terminal_anchor: String,
    /// Prefix of the product line within that section.
    pub product_prefix: String,
    /// Maximum number of extra lines appended when the product row alone
    /// yields too few values (wrapped columns).
    pub lookahead: usize,
    pub strategy: SelectionStrategy,
    /// Table mode only: header fragment naming the price column. A matching
    /// column overrides positional selection.
    pub price_column_label: Option<String>,
}

/// Extraction outcome: effective timestamp when the document states one, and
/// the selected price rounded to two decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub effective: Option<String>,
    pub price: f64,
}

/// A document rendered for extraction: flattened page text, plus any tables
/// the renderer detected.
#[derive(Debug, Default)]
pub struct RenderedDocument {
    pub text: String,
    pub tables: Vec<table::Table>,
}

/// Extracts the price quote from a rendered document.
///
/// Table mode is attempted first when tables are present; any table-mode
/// failure falls back to the text-line pipeline. All failures are local to
/// this document and carry no side effects, so the caller can move on to
/// the next candidate PDF.
pub fn extract_quote(
    doc: &RenderedDocument,
    cfg: &ExtractConfig,
) -> Result<PriceQuote, ExtractError> {
    if doc.text.trim().is_empty() && doc.tables.is_empty() {
        return Err(ExtractError::EmptyDocument);
    }

    let effective = section::find_effective_date(&doc.text);

    if !doc.tables.is_empty() {
        match table::price_from_tables(&doc.tables, cfg) {
            Ok(price) => {
                return Ok(PriceQuote {
                    effective,
                    price: money::round2(price),
                });
            }
            Err(e) => {
                tracing::debug!("Table-mode extraction failed, falling back to text: {}", e);
            }
        }
    }

    let price = section::price_from_text(&doc.text, cfg)?;
    Ok(PriceQuote {
        effective,
        price: money::round2(price),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ExtractConfig {
        ExtractConfig {
            terminal_anchor: "Juodeikių naftos terminalas".to_string(),
            product_prefix: "Automobilinis 95 markės benzinas".to_string(),
            lookahead: 2,
            strategy: SelectionStrategy::Ordinal { index: 2 },
            price_column_label: Some("Kaina su akcizu".to_string()),
        }
    }

    #[test]
    fn empty_document_is_rejected_before_section_location() {
        let doc = RenderedDocument::default();
        assert!(matches!(
            extract_quote(&doc, &cfg()),
            Err(ExtractError::EmptyDocument)
        ));
    }

    #[test]
    fn table_mode_wins_when_a_table_matches() {
        let doc = RenderedDocument {
            // Text pipeline would yield 761.23; the table column gives 764.00.
            text: "AB „ORLEN Lietuva“ Juodeikių naftos terminalas\n\
                   Automobilinis 95 markės benzinas E10 500.10 513.00 761.23\n"
                .to_string(),
            tables: vec![vec![
                vec![
                    "Produktas".to_string(),
                    "Bazinė kaina".to_string(),
                    "Kaina su akcizu".to_string(),
                ],
                vec!["AB „ORLEN Lietuva“ Juodeikių naftos terminalas".to_string()],
                vec![
                    "Automobilinis 95 markės benzinas E10".to_string(),
                    "500.10".to_string(),
                    "764.00".to_string(),
                ],
            ]],
        };
        let quote = extract_quote(&doc, &cfg()).unwrap();
        assert_eq!(quote.price, 764.00);
    }

    #[test]
    fn falls_back_to_text_when_no_table_matches() {
        let doc = RenderedDocument {
            text: "Kainos galioja nuo 2024-08-15 10:00\n\
                   AB „ORLEN Lietuva“ Juodeikių naftos terminalas\n\
                   Automobilinis 95 markės benzinas E10 500.10 513.00 761.23\n"
                .to_string(),
            tables: vec![vec![vec!["nieko bendro".to_string()]]],
        };
        let quote = extract_quote(&doc, &cfg()).unwrap();
        assert_eq!(quote.price, 761.23);
        assert_eq!(quote.effective.as_deref(), Some("2024-08-15 10:00"));
    }
}
