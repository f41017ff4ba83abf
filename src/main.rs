// src/main.rs
mod extractors;
mod protocol;
mod utils;

use clap::{Parser, ValueEnum};
use extractors::{extract_quote, ExtractConfig, RenderedDocument, SelectionStrategy};
use protocol::client;
use protocol::models::PriceReport;
use utils::AppError;

const DEFAULT_LISTING_URL: &str = "https://www.orlenlietuva.lt/LT/Wholesale/Pages/Protocols.aspx";
const DEFAULT_TERMINAL_ANCHOR: &str = "Juodeikių naftos terminalas";
const DEFAULT_PRODUCT_PREFIX: &str = "Automobilinis 95 markės benzinas";
const DEFAULT_PRICE_COLUMN_LABEL: &str = "Kaina su akcizu";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Fixed numeric column: the third money value on the product row
    Ordinal,
    /// Value immediately after the excise-tax figure, ordinal as fallback
    ExciseAnchor,
}

/// Command Line Interface for the fuel price protocol extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// URL of the page listing protocol PDFs (newest first)
    #[arg(long, default_value = DEFAULT_LISTING_URL)]
    listing_url: String,

    /// Webhook to POST the {date, price} report to; prints to stdout when omitted
    #[arg(long)]
    webhook_url: Option<String>,

    /// Terminal anchor string locating the wanted section
    #[arg(long, default_value = DEFAULT_TERMINAL_ANCHOR)]
    terminal: String,

    /// Product line prefix within the terminal section
    #[arg(long, default_value = DEFAULT_PRODUCT_PREFIX)]
    product: String,

    /// Value selection strategy
    #[arg(long, value_enum, default_value_t = Strategy::Ordinal)]
    strategy: Strategy,

    /// Zero-based position used by ordinal selection (and as excise fallback)
    #[arg(long, default_value_t = 2)]
    ordinal_index: usize,

    /// Lower bound of the excise-tax band scanned by the excise-anchor strategy
    #[arg(long, default_value_t = 500.0)]
    excise_min: f64,

    /// Upper bound of the excise-tax band
    #[arg(long, default_value_t = 530.0)]
    excise_max: f64,

    /// Extra wrapped lines appended when the product row yields too few values
    #[arg(long, default_value_t = 2)]
    lookahead: usize,

    /// Table-mode column header fragment naming the price column
    #[arg(long, default_value = DEFAULT_PRICE_COLUMN_LABEL)]
    price_column: String,

    /// How many of the newest protocol PDFs to try before giving up
    #[arg(long, default_value_t = 3)]
    max_candidates: usize,

    /// Debug mode - save the rendered text with extraction annotations
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn extract_config(&self) -> ExtractConfig {
        let strategy = match self.strategy {
            Strategy::Ordinal => SelectionStrategy::Ordinal {
                index: self.ordinal_index,
            },
            Strategy::ExciseAnchor => SelectionStrategy::ExciseAnchor {
                min: self.excise_min,
                max: self.excise_max,
                fallback: self.ordinal_index,
            },
        };
        ExtractConfig {
            terminal_anchor: self.terminal.clone(),
            product_prefix: self.product.clone(),
            lookahead: self.lookahead,
            strategy,
            price_column_label: Some(self.price_column.clone()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting extraction run for args: {:?}", args);

    let cfg = args.extract_config();

    // 3. Discover candidate protocol PDFs (newest first)
    let links = client::fetch_protocol_links(&args.listing_url).await?;

    // 4. Try candidates in order; every failure is local to one document
    let mut report = None;
    for (i, link) in links.iter().take(args.max_candidates).enumerate() {
        tracing::info!("Candidate {}: {} ({})", i + 1, link.title, link.url);

        let bytes = match client::download_pdf(&link.url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!("Failed to download {}: {}", link.url, e);
                continue;
            }
        };
        tracing::info!("Downloaded document ({} bytes)", bytes.len());

        let text = match extractors::pdf::render_text(&bytes) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Failed to render text from {}: {}", link.url, e);
                continue;
            }
        };

        if args.debug {
            let dump_path = format!("protocol_{}_annotated.txt", i + 1);
            if let Err(e) = utils::text_debug::dump_annotated_text(&text, &cfg, &dump_path) {
                tracing::warn!("Failed to write debug dump: {}", e);
            }
        }

        // lopdf yields no table structure; table mode engages only when a
        // renderer supplies detected tables.
        let doc = RenderedDocument {
            text,
            tables: Vec::new(),
        };
        match extract_quote(&doc, &cfg) {
            Ok(quote) => {
                tracing::info!(
                    "Extracted price {} (effective {:?}) from {}",
                    quote.price,
                    quote.effective,
                    link.url
                );
                report = Some(PriceReport::new(quote.effective, quote.price));
                break;
            }
            Err(e) => {
                tracing::error!("Extraction failed for {}: {}", link.url, e);
            }
        }
    }

    let Some(report) = report else {
        return Err(AppError::Processing(format!(
            "No price extracted from the {} newest protocol PDFs",
            args.max_candidates
        )));
    };

    // 5. Forward the result
    match &args.webhook_url {
        Some(url) => client::post_report(url, &report).await?,
        None => {
            let json = serde_json::to_string(&report)
                .map_err(|e| AppError::Processing(e.to_string()))?;
            println!("{}", json);
        }
    }

    Ok(())
}
