// src/core/scanner/shodan_scanner.rs

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::core::models::{CollectorError, HostSearchInfo, ScanResult};

/// The subset of a `/shodan/host/search` response the collector reads.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub matches: Vec<SearchMatch>,
}

#[derive(Debug, Deserialize)]
pub struct SearchMatch {
    #[serde(default)]
    pub vulns: Value,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

#[async_trait]
pub trait HostSearch: Send + Sync {
    async fn search(&self, query: &str, api_key: &str) -> Result<SearchResponse, CollectorError>;
}

/// Client for the Shodan REST API.
pub struct ShodanClient {
    client: reqwest::Client,
    base_url: String,
}

impl ShodanClient {
    pub fn new(base_url: impl Into<String>, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl HostSearch for ShodanClient {
    async fn search(&self, query: &str, api_key: &str) -> Result<SearchResponse, CollectorError> {
        let url = format!("{}/shodan/host/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("key", api_key), ("query", query)])
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Shodan request failed");
                CollectorError::Transport(format!("Shodan request failed: {}", e))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            CollectorError::Transport(format!("Failed to read Shodan response: {}", e))
        })?;

        if !status.is_success() {
            // Shodan reports auth and quota problems as `{"error": "..."}`.
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown error").to_string());
            warn!(status = status.as_u16(), message = %message, "Shodan returned an error.");
            return Err(CollectorError::Api { status: status.as_u16(), message });
        }

        serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "Shodan response did not match the expected shape");
            CollectorError::Malformed(e.to_string())
        })
    }
}

/// Shodan lists vulnerabilities either as an object keyed by CVE id or as
/// a plain array of ids. Anything else counts as no vulnerabilities.
fn vuln_ids(vulns: &Value) -> Vec<String> {
    match vulns {
        Value::Object(map) => map.keys().cloned().collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// Searches the host index for `target`. One vulnerability list is returned
/// per match, in the order the index returned the matches.
pub async fn search_hosts(
    search: &dyn HostSearch,
    target: &str,
    credential: &str,
) -> ScanResult<HostSearchInfo> {
    info!(target, "Starting host search.");
    let response = search.search(target, credential).await?;
    let vulns: Vec<Vec<String>> = response.matches.iter().map(|m| vuln_ids(&m.vulns)).collect();
    debug!(matches = vulns.len(), "Collected per-match vulnerabilities.");

    info!(total = response.total, "Host search finished.");
    Ok(HostSearchInfo { total_results: response.total, vulns })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct FailingSearch;

    #[async_trait]
    impl HostSearch for FailingSearch {
        async fn search(&self, _query: &str, _api_key: &str) -> Result<SearchResponse, CollectorError> {
            Err(CollectorError::Api { status: 401, message: "Invalid API key".to_string() })
        }
    }

    #[tokio::test]
    async fn search_failure_becomes_error() {
        let result = search_hosts(&FailingSearch, "example.com", "bad").await;
        assert_eq!(
            result,
            Err(CollectorError::Api { status: 401, message: "Invalid API key".to_string() })
        );
    }

    #[test]
    fn vuln_shapes() {
        assert_eq!(
            vuln_ids(&json!({"CVE-2021-44228": {"cvss": 10.0}, "CVE-2014-0160": {}})),
            vec!["CVE-2021-44228", "CVE-2014-0160"]
        );
        assert_eq!(vuln_ids(&json!(["CVE-1", 7, "CVE-2"])), vec!["CVE-1", "CVE-2"]);
        assert!(vuln_ids(&Value::Null).is_empty());
    }

    #[tokio::test]
    async fn client_reads_total_and_matches() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/shodan/host/search"))
            .and(query_param("key", "secret"))
            .and(query_param("query", "example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 3,
                "matches": [
                    {"port": 80, "vulns": {"CVE-2019-0211": {}}},
                    {"port": 443},
                    {"port": 22, "vulns": ["CVE-2018-15473"]}
                ]
            })))
            .mount(&server)
            .await;

        let client = ShodanClient::new(server.uri(), "digital-sleuth-test").unwrap();
        let info = search_hosts(&client, "example.com", "secret").await.unwrap();

        assert_eq!(info.total_results, 3);
        assert_eq!(
            info.vulns,
            vec![
                vec!["CVE-2019-0211".to_string()],
                vec![],
                vec!["CVE-2018-15473".to_string()],
            ]
        );
    }

    #[tokio::test]
    async fn client_surfaces_api_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/shodan/host/search"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"error": "Please provide a valid API key"})),
            )
            .mount(&server)
            .await;

        let client = ShodanClient::new(format!("{}/", server.uri()), "digital-sleuth-test").unwrap();
        let result = search_hosts(&client, "example.com", "nope").await;
        assert_eq!(
            result,
            Err(CollectorError::Api {
                status: 401,
                message: "Please provide a valid API key".to_string()
            })
        );
    }

    #[tokio::test]
    async fn client_rejects_unexpected_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let client = ShodanClient::new(server.uri(), "digital-sleuth-test").unwrap();
        let result = client.search("example.com", "k").await;
        assert!(matches!(result, Err(CollectorError::Malformed(_))));
    }
}
