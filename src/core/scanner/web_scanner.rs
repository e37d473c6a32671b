// src/core/scanner/web_scanner.rs

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, error, info};

use crate::core::models::{CollectorError, ScanResult, WebInfo};

const NO_TITLE: &str = "No title found";

/// Loose e-mail shape: word, dot or hyphen characters on both sides of an `@`.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\w.-]+@[\w.-]+").unwrap());
static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());

/// A fetched HTTP response, reduced to what the web collector needs.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status_code: u16,
    pub body: String,
}

#[async_trait]
pub trait HttpFetcher: Send + Sync {
    async fn get(&self, url: &str) -> Result<FetchedPage, CollectorError>;
}

/// `HttpFetcher` backed by a `reqwest::Client`. Redirects are followed with
/// reqwest's default policy, so the recorded status is the final one.
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn get(&self, url: &str) -> Result<FetchedPage, CollectorError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            error!(url, error = %e, "HTTP request failed");
            CollectorError::Transport(format!("HTTP request failed: {}", e))
        })?;
        let status_code = response.status().as_u16();
        info!(status = status_code, "Received HTTP response.");

        let body = response.text().await.map_err(|e| {
            error!(error = %e, "Failed to read response body");
            CollectorError::Transport(format!("Failed to read response body: {}", e))
        })?;
        debug!(bytes = body.len(), "Read response body.");
        Ok(FetchedPage { status_code, body })
    }
}

/// Fetches `http://{target}` and extracts the page title and any e-mail
/// addresses in the raw body. Non-2xx responses are recorded, not treated
/// as failures.
pub async fn gather_web_info(fetcher: &dyn HttpFetcher, target: &str) -> ScanResult<WebInfo> {
    let url = format!("http://{}", target);
    info!(url = %url, "Starting web collection.");

    let page = fetcher.get(&url).await?;
    let info = WebInfo {
        title: extract_title(&page.body),
        emails: extract_emails(&page.body),
        status_code: page.status_code,
    };
    info!(status = info.status_code, emails = info.emails.len(), "Web collection finished.");
    Ok(info)
}

fn extract_title(body: &str) -> String {
    let document = Html::parse_document(body);
    match document.select(&TITLE_SELECTOR).next() {
        Some(title) => title.text().collect::<String>(),
        None => {
            debug!("No <title> element in page.");
            NO_TITLE.to_string()
        }
    }
}

// Duplicates are kept, in order of first appearance in the body.
fn extract_emails(body: &str) -> Vec<String> {
    EMAIL_RE.find_iter(body).map(|m| m.as_str().to_string()).collect()
}
