// src/utils/text_debug.rs
use std::fs;
use std::path::Path;

use crate::extractors::money;
use crate::extractors::section::{self, SectionBounds};
use crate::extractors::ExtractConfig;
use crate::utils::error::AppError;

/// Saves the rendered document text with per-line markers showing what the
/// extractor would see: the anchor line, the located section, the product
/// row and the money values recovered from each line.
pub fn dump_annotated_text(text: &str, cfg: &ExtractConfig, filename: &str) -> Result<(), AppError> {
    let lines: Vec<&str> = text.lines().collect();
    let bounds = section::locate_section(&lines, &cfg.terminal_anchor).ok();

    let mut out = String::with_capacity(text.len() * 2);
    for (i, line) in lines.iter().enumerate() {
        let mut tags: Vec<String> = Vec::new();
        if line.contains(&cfg.terminal_anchor) {
            tags.push("ANCHOR".to_string());
        }
        if let Some(SectionBounds { start, end }) = bounds {
            if i >= start && i < end {
                tags.push("SECTION".to_string());
                if line.trim().starts_with(&cfg.product_prefix) {
                    tags.push("PRODUCT".to_string());
                }
            }
            if i == end && end < lines.len() {
                tags.push("NEXT-TERMINAL".to_string());
            }
        }
        let values = money::find_money_values(line);
        if !values.is_empty() {
            tags.push(format!("MONEY{:?}", values));
        }

        if tags.is_empty() {
            out.push_str(&format!("{:4} | {}\n", i, line));
        } else {
            out.push_str(&format!("{:4} | {}    <-- {}\n", i, line, tags.join(" ")));
        }
    }

    fs::write(Path::new(filename), out)?;
    tracing::info!("Saved annotated text dump to {}", filename);
    Ok(())
}
