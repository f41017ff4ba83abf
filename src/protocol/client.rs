// src/protocol/client.rs
use crate::protocol::models::{PriceReport, ProtocolLink};
use crate::utils::error::FetchError;
use once_cell::sync::Lazy;
use reqwest::header;
use scraper::{Html, Selector};
use std::time::Duration;

const USER_AGENT: &str = "fuel-price-extractor/0.1";
// Single attempt per request, bounded by a fixed timeout (no retry policy).
const REQUEST_TIMEOUT_SECS: u64 = 30;

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("Failed to compile ANCHOR_SELECTOR"));

fn build_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
}

/// Fetches the listing page and collects the protocol PDF links it carries,
/// preserving document order.
pub async fn fetch_protocol_links(listing_url: &str) -> Result<Vec<ProtocolLink>, FetchError> {
    let client = build_client()?;
    tracing::info!("Fetching protocol listing: {}", listing_url);

    let response = client
        .get(listing_url)
        .header(header::ACCEPT, "text/html,*/*")
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        tracing::error!("HTTP error status {} for listing page {}", status, listing_url);
        return Err(FetchError::Http(status));
    }
    let body = response.text().await?;

    let links = collect_pdf_links(&body, listing_url)?;
    if links.is_empty() {
        return Err(FetchError::NoProtocolLinks(listing_url.to_string()));
    }
    tracing::info!("Found {} protocol PDF links", links.len());
    Ok(links)
}

/// Collects anchors whose href ends in ".pdf", resolving relative hrefs
/// against the listing page URL.
fn collect_pdf_links(body: &str, listing_url: &str) -> Result<Vec<ProtocolLink>, FetchError> {
    let base = reqwest::Url::parse(listing_url)
        .map_err(|e| FetchError::Parse(format!("Bad listing URL '{}': {}", listing_url, e)))?;

    let document = Html::parse_document(body);
    let mut links = Vec::new();
    for element in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if !href.to_lowercase().ends_with(".pdf") {
            continue;
        }
        let url = match base.join(href) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Skipping unresolvable href '{}': {}", href, e);
                continue;
            }
        };
        let title = element.text().collect::<String>().trim().to_string();
        links.push(ProtocolLink {
            title,
            url: url.to_string(),
        });
    }
    Ok(links)
}

/// Downloads one protocol PDF. Single attempt; a 404 is reported
/// distinguishably so the caller can move to the next candidate.
pub async fn download_pdf(url: &str) -> Result<Vec<u8>, FetchError> {
    let client = build_client()?;
    tracing::info!("Downloading protocol PDF: {}", url);

    let response = client
        .get(url)
        .header(header::ACCEPT, "application/pdf,*/*")
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        tracing::error!("HTTP error status {} for {}", status, url);
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::DocumentNotFound(url.to_string()));
        }
        return Err(FetchError::Http(status));
    }

    let bytes = response.bytes().await?;
    tracing::debug!("Downloaded {} bytes from {}", bytes.len(), url);
    Ok(bytes.to_vec())
}

/// Posts the price report to the webhook as JSON.
pub async fn post_report(webhook_url: &str, report: &PriceReport) -> Result<(), FetchError> {
    let client = build_client()?;
    tracing::info!("Posting report to webhook: {}", webhook_url);

    let response = client.post(webhook_url).json(report).send().await?;
    let status = response.status();
    if !status.is_success() {
        tracing::error!("Webhook rejected report with status {}", status);
        return Err(FetchError::Http(status));
    }
    tracing::info!(
        "Webhook accepted report: date={} price={}",
        report.date,
        report.price
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html><body>
          <a href="/docs/protokolas_165.PDF">Protokolas Nr. 165</a>
          <a href="https://cdn.example.lt/protokolas_164.pdf">Protokolas Nr. 164</a>
          <a href="/docs/archyvas.zip">Archyvas</a>
          <a href="/naujienos">Naujienos</a>
        </body></html>
    "#;

    #[test]
    fn collects_only_pdf_links_in_document_order() {
        let links = collect_pdf_links(LISTING, "https://www.example.lt/kainos").unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].title, "Protokolas Nr. 165");
        assert_eq!(links[0].url, "https://www.example.lt/docs/protokolas_165.PDF");
        assert_eq!(links[1].url, "https://cdn.example.lt/protokolas_164.pdf");
    }

    #[test]
    fn bad_listing_url_is_a_parse_failure() {
        let err = collect_pdf_links(LISTING, "not a url").unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }
}
