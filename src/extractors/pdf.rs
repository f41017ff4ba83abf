// src/extractors/pdf.rs

use crate::utils::error::ExtractError;
use lopdf::Document;

/// Renders a PDF byte buffer to flat document text: page-level text
/// extraction, pages concatenated with line breaks. No page boundaries are
/// retained downstream.
pub fn render_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let doc = Document::load_mem(bytes).map_err(|e| ExtractError::PdfRender(e.to_string()))?;

    let mut text = String::new();
    for (page_number, _) in doc.get_pages() {
        let page_text = doc
            .extract_text(&[page_number])
            .map_err(|e| ExtractError::PdfRender(format!("page {}: {}", page_number, e)))?;
        text.push_str(&page_text);
        if !text.ends_with('\n') {
            text.push('\n');
        }
    }
    Ok(text)
}
