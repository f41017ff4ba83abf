// src/utils/error.rs
#![allow(dead_code)]
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // e.g., 404 Not Found, 403 Forbidden

    #[error("Protocol document not found: {0}")]
    DocumentNotFound(String),

    #[error("No protocol PDF links found on listing page: {0}")]
    NoProtocolLinks(String),

    #[error("Failed to parse listing page: {0}")]
    Parse(String),
}

/// Failures of the extraction core. All are local to a single candidate
/// document; the caller decides whether to try the next one.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Document text is empty (scanned or image-only PDF?)")]
    EmptyDocument,

    #[error("Terminal anchor not found in document: {0}")]
    AnchorNotFound(String),

    #[error("Product row not found for prefix: {0}")]
    ProductRowNotFound(String),

    #[error("Too few money values on product row: found {found}, need {needed}")]
    InsufficientValues { found: usize, needed: usize },

    #[error("No detected table matched the terminal/product anchors")]
    NoTableMatch,

    #[error("PDF text rendering failed: {0}")]
    PdfRender(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Fetching failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}
