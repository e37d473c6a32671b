// src/core/scanner/whois_scanner.rs

//! Registration lookups over the WHOIS protocol (TCP port 43).
//!
//! The live client starts at IANA, follows its `refer:` line to the registry
//! and, for thin registries, the `Registrar WHOIS Server:` line to the
//! registrar. Only the authoritative responses are parsed; IANA's own record
//! describes the TLD, not the domain.

use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::core::dates::parse_whois_timestamp;
use crate::core::models::{CollectorError, RawDate, RawTimestamp, RegistrationRecord, ScanResult};

const WHOIS_PORT: u16 = 43;
const IO_TIMEOUT: Duration = Duration::from_secs(10);

static RE_REFER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?im)^[ \t]*refer:[ \t]*(\S+)").unwrap());
static RE_REGISTRAR_SERVER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^[ \t]*Registrar WHOIS Server:[ \t]*(\S+)").unwrap());
static RE_REGISTRAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:Registrar|Sponsoring Registrar|Registrar Name):[ \t]*(\S[^\r\n]*)").unwrap()
});
static RE_CREATION_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)^[ \t]*(?:Creation Date|Created On|Created Date|Registered on|Registration Time|created):[ \t]*(\S[^\r\n]*)",
    )
    .unwrap()
});
static RE_EXPIRATION_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)^[ \t]*(?:Registry Expiry Date|Registrar Registration Expiration Date|Expiry Date|Expiration Date|Expires On|Expiration Time|paid-till|expires):[ \t]*(\S[^\r\n]*)",
    )
    .unwrap()
});

const NOT_FOUND_MARKERS: &[&str] = &[
    "no match for",
    "not found",
    "no data found",
    "no entries found",
    "status: free",
];

#[async_trait]
pub trait WhoisLookup: Send + Sync {
    /// Returns the raw authoritative WHOIS text for `domain`.
    async fn query(&self, domain: &str) -> Result<String, CollectorError>;
}

pub struct TcpWhoisClient {
    root_server: String,
    io_timeout: Duration,
}

impl TcpWhoisClient {
    /// `root_server` is `host` or `host:port`.
    pub fn new(root_server: impl Into<String>) -> Self {
        Self { root_server: root_server.into(), io_timeout: IO_TIMEOUT }
    }

    #[cfg(test)]
    fn with_timeout(mut self, io_timeout: Duration) -> Self {
        self.io_timeout = io_timeout;
        self
    }

    async fn query_server(&self, server: &str, domain: &str) -> Result<String, CollectorError> {
        debug!(server, domain, "Sending WHOIS query.");
        let transport = |e: std::io::Error| {
            CollectorError::Transport(format!("WHOIS query to {} failed: {}", server, e))
        };
        let timed_out =
            |_| CollectorError::Transport(format!("WHOIS query to {} timed out", server));

        let mut stream = timeout(self.io_timeout, TcpStream::connect(server_address(server)))
            .await
            .map_err(timed_out)?
            .map_err(transport)?;
        timeout(self.io_timeout, stream.write_all(format!("{}\r\n", domain).as_bytes()))
            .await
            .map_err(timed_out)?
            .map_err(transport)?;

        let mut response = Vec::new();
        timeout(self.io_timeout, stream.read_to_end(&mut response))
            .await
            .map_err(timed_out)?
            .map_err(transport)?;
        debug!(server, bytes = response.len(), "WHOIS response received.");
        Ok(String::from_utf8_lossy(&response).into_owned())
    }
}

#[async_trait]
impl WhoisLookup for TcpWhoisClient {
    async fn query(&self, domain: &str) -> Result<String, CollectorError> {
        let root = self.query_server(&self.root_server, domain).await?;
        let Some(registry) = capture_first(&RE_REFER, &root) else {
            return Ok(root);
        };

        let mut text = self.query_server(&registry, domain).await?;
        if let Some(registrar) = capture_first(&RE_REGISTRAR_SERVER, &text) {
            if !registrar.eq_ignore_ascii_case(&registry) {
                match self.query_server(&registrar, domain).await {
                    Ok(extra) => {
                        text.push('\n');
                        text.push_str(&extra);
                    }
                    // The registry record is enough on its own.
                    Err(e) => warn!(server = %registrar, error = %e, "Registrar WHOIS query failed."),
                }
            }
        }
        Ok(text)
    }
}

// `host:port` or a bare host on the default WHOIS port.
fn server_address(server: &str) -> (&str, u16) {
    match server.rsplit_once(':') {
        Some((host, port)) => match port.parse() {
            Ok(port) => (host, port),
            Err(_) => (server, WHOIS_PORT),
        },
        None => (server, WHOIS_PORT),
    }
}

/// Reduces a target such as `www.example.co.uk` or `example.com:8080` to the
/// name a registry holds a record for (`example.co.uk`, `example.com`).
/// Names without a known public suffix are returned as given.
pub fn registrable_domain(target: &str) -> String {
    let trimmed = target.trim().trim_end_matches('.');
    let host = match trimmed.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => trimmed,
    }
    .to_lowercase();
    psl::domain_str(&host).map(str::to_string).unwrap_or(host)
}

fn capture_first(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

// Every distinct value of a date field, in order of appearance.
fn collect_dates(re: &Regex, text: &str) -> Option<RawDate> {
    let mut values: Vec<RawTimestamp> = Vec::new();
    for caps in re.captures_iter(text) {
        let Some(raw) = caps.get(1).map(|m| m.as_str().trim()) else { continue };
        let parsed = parse_whois_timestamp(raw);
        if !values.contains(&parsed) {
            values.push(parsed);
        }
    }
    match values.len() {
        0 => None,
        1 => values.pop().map(RawDate::Single),
        _ => Some(RawDate::Multiple(values)),
    }
}

/// Extracts the registrar and the two date fields from raw WHOIS text.
pub fn parse_registration(text: &str) -> RegistrationRecord {
    RegistrationRecord {
        registrar: capture_first(&RE_REGISTRAR, text),
        creation_date: collect_dates(&RE_CREATION_DATE, text),
        expiration_date: collect_dates(&RE_EXPIRATION_DATE, text),
    }
}

/// Queries the registration record for the registrable domain of `target`. Dates are returned as the
/// registry reported them; normalization happens in the aggregator.
pub async fn lookup_registration(
    client: &dyn WhoisLookup,
    target: &str,
) -> ScanResult<RegistrationRecord> {
    let domain = registrable_domain(target);
    info!(target, domain = %domain, "Starting WHOIS collection.");
    let text = client.query(&domain).await?;
    let record = parse_registration(&text);

    let empty = record.registrar.is_none()
        && record.creation_date.is_none()
        && record.expiration_date.is_none();
    if empty {
        let lowered = text.to_lowercase();
        if NOT_FOUND_MARKERS.iter().any(|marker| lowered.contains(marker)) {
            warn!(domain = %domain, "WHOIS server has no record for target.");
            return Err(CollectorError::NotFound(domain));
        }
    }

    info!(registrar = ?record.registrar, "WHOIS collection finished.");
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    const VERISIGN_SAMPLE: &str = "   Domain Name: EXAMPLE.COM\r\n\
   Registry Domain ID: 2336799_DOMAIN_COM-VRSN\r\n\
   Registrar WHOIS Server: whois.iana.org\r\n\
   Updated Date: 2024-08-14T07:01:34Z\r\n\
   Creation Date: 1995-08-14T04:00:00Z\r\n\
   Registry Expiry Date: 2025-08-13T04:00:00Z\r\n\
   Registrar: RESERVED-Internet Assigned Numbers Authority\r\n\
   Registrar IANA ID: 376\r\n";

    const REGISTRAR_SAMPLE: &str = "Domain Name: example.com\n\
Registrar: Example Registrar, Inc.\n\
Creation Date: 1995-08-14T04:00:00Z\n\
Registrar Registration Expiration Date: 2025-08-12T00:00:00Z\n";

    struct CannedWhois(Result<String, CollectorError>);

    #[async_trait]
    impl WhoisLookup for CannedWhois {
        async fn query(&self, _domain: &str) -> Result<String, CollectorError> {
            self.0.clone()
        }
    }

    struct RecordingWhois {
        queried: Mutex<Vec<String>>,
        response: String,
    }

    #[async_trait]
    impl WhoisLookup for RecordingWhois {
        async fn query(&self, domain: &str) -> Result<String, CollectorError> {
            self.queried.lock().unwrap().push(domain.to_string());
            Ok(self.response.clone())
        }
    }

    type Queries = Arc<Mutex<Vec<String>>>;

    async fn bind() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        (listener, address)
    }

    // Answers every connection with `response` and records the query line.
    fn serve(listener: TcpListener, response: String) -> Queries {
        let queries: Queries = Arc::default();
        let seen = Arc::clone(&queries);
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 512];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                seen.lock().unwrap().push(String::from_utf8_lossy(&buf[..n]).trim().to_string());
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        queries
    }

    async fn whois_server(response: String) -> (String, Queries) {
        let (listener, address) = bind().await;
        (address, serve(listener, response))
    }

    // An address nothing listens on.
    async fn unused_address() -> String {
        bind().await.1
    }

    fn ts(y: i32, m: u32, d: u32, h: u32) -> RawTimestamp {
        RawTimestamp::Parsed(NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap())
    }

    #[test]
    fn parses_thick_registry_record() {
        let record = parse_registration(VERISIGN_SAMPLE);
        assert_eq!(
            record.registrar.as_deref(),
            Some("RESERVED-Internet Assigned Numbers Authority")
        );
        assert_eq!(record.creation_date, Some(RawDate::Single(ts(1995, 8, 14, 4))));
        assert_eq!(record.expiration_date, Some(RawDate::Single(ts(2025, 8, 13, 4))));
    }

    #[test]
    fn distinct_dates_across_hops_become_a_sequence() {
        let combined = format!("{}\n{}", VERISIGN_SAMPLE, REGISTRAR_SAMPLE);
        let record = parse_registration(&combined);

        // Same creation date on both hops collapses to one value.
        assert_eq!(record.creation_date, Some(RawDate::Single(ts(1995, 8, 14, 4))));
        assert_eq!(
            record.expiration_date,
            Some(RawDate::Multiple(vec![ts(2025, 8, 13, 4), ts(2025, 8, 12, 0)]))
        );
        assert_eq!(
            record.registrar.as_deref(),
            Some("RESERVED-Internet Assigned Numbers Authority")
        );
    }

    #[test]
    fn unknown_date_layouts_are_kept_as_text() {
        let record = parse_registration("created: sometime in 1996\nexpires: 2031-02-03\n");
        assert_eq!(
            record.creation_date,
            Some(RawDate::Single(RawTimestamp::Text("sometime in 1996".to_string())))
        );
        assert_eq!(record.expiration_date, Some(RawDate::Single(ts(2031, 2, 3, 0))));
        assert_eq!(record.registrar, None);
    }

    #[test]
    fn referral_line_is_found() {
        let iana = "% IANA WHOIS server\nrefer:        whois.verisign-grs.com\n\ndomain:       COM\n";
        assert_eq!(capture_first(&RE_REFER, iana).as_deref(), Some("whois.verisign-grs.com"));
        assert_eq!(capture_first(&RE_REFER, "domain: COM\n"), None);
    }

    #[tokio::test]
    async fn not_found_response_becomes_error() {
        let client = CannedWhois(Ok("No match for \"NOPE-EXAMPLE.COM\".\r\n".to_string()));
        let result = lookup_registration(&client, "nope-example.com").await;
        assert_eq!(result, Err(CollectorError::NotFound("nope-example.com".to_string())));
    }

    #[tokio::test]
    async fn client_failure_becomes_error() {
        let err = CollectorError::Transport("WHOIS query to whois.iana.org timed out".to_string());
        let client = CannedWhois(Err(err.clone()));
        assert_eq!(lookup_registration(&client, "example.com").await, Err(err));
    }

    #[tokio::test]
    async fn record_without_dates_is_still_a_success() {
        let client = CannedWhois(Ok("Registrar: Somebody\n".to_string()));
        let record = lookup_registration(&client, "example.com").await.unwrap();
        assert_eq!(record.registrar.as_deref(), Some("Somebody"));
        assert_eq!(record.expiration_date, None);
    }

    #[test]
    fn subdomains_reduce_to_the_registrable_domain() {
        assert_eq!(registrable_domain("www.example.com"), "example.com");
        assert_eq!(registrable_domain("a.b.example.co.uk"), "example.co.uk");
        assert_eq!(registrable_domain("Example.COM."), "example.com");
        assert_eq!(registrable_domain("www.example.com:8080"), "example.com");
        assert_eq!(registrable_domain("example.com"), "example.com");
    }

    #[test]
    fn server_setting_may_carry_a_port() {
        assert_eq!(server_address("whois.iana.org"), ("whois.iana.org", 43));
        assert_eq!(server_address("127.0.0.1:4343"), ("127.0.0.1", 4343));
        assert_eq!(server_address("whois.example:x"), ("whois.example:x", 43));
    }

    #[tokio::test]
    async fn subdomain_target_is_queried_as_registrable_domain() {
        let client = RecordingWhois {
            queried: Mutex::new(Vec::new()),
            response: VERISIGN_SAMPLE.to_string(),
        };
        let record = lookup_registration(&client, "www.example.com").await.unwrap();
        assert_eq!(*client.queried.lock().unwrap(), vec!["example.com".to_string()]);
        assert!(record.expiration_date.is_some());
    }

    #[tokio::test]
    async fn follows_referral_to_registry_and_registrar() {
        let (registrar, registrar_queries) = whois_server(REGISTRAR_SAMPLE.to_string()).await;
        let (registry, registry_queries) = whois_server(format!(
            "Domain Name: EXAMPLE.COM\r\n\
             Registrar WHOIS Server: {}\r\n\
             Creation Date: 1995-08-14T04:00:00Z\r\n\
             Registry Expiry Date: 2025-08-13T04:00:00Z\r\n",
            registrar
        ))
        .await;
        let (iana, iana_queries) =
            whois_server(format!("% IANA WHOIS server\nrefer:        {}\n\ndomain:       COM\n", registry)).await;

        let client = TcpWhoisClient::new(iana);
        let record = lookup_registration(&client, "www.example.com").await.unwrap();

        for queries in [&iana_queries, &registry_queries, &registrar_queries] {
            assert_eq!(*queries.lock().unwrap(), vec!["example.com".to_string()]);
        }
        assert_eq!(record.registrar.as_deref(), Some("Example Registrar, Inc."));
        assert_eq!(
            record.expiration_date,
            Some(RawDate::Multiple(vec![ts(2025, 8, 13, 4), ts(2025, 8, 12, 0)]))
        );
    }

    #[tokio::test]
    async fn registry_naming_itself_is_queried_once() {
        let (listener, registry) = bind().await;
        let registry_queries = serve(
            listener,
            format!(
                "Registrar WHOIS Server: {}\r\nRegistry Expiry Date: 2025-08-13T04:00:00Z\r\n",
                registry
            ),
        );
        let (iana, _) = whois_server(format!("refer: {}\n", registry)).await;

        let text = TcpWhoisClient::new(iana).query("example.com").await.unwrap();
        assert!(text.contains("Registry Expiry Date"));
        assert_eq!(registry_queries.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn registrar_failure_keeps_registry_record() {
        let dead = unused_address().await;
        let (registry, _) = whois_server(format!(
            "Registrar WHOIS Server: {}\r\nRegistry Expiry Date: 2025-08-13T04:00:00Z\r\n",
            dead
        ))
        .await;
        let (iana, _) = whois_server(format!("refer: {}\n", registry)).await;

        let record = lookup_registration(&TcpWhoisClient::new(iana), "example.com").await.unwrap();
        assert_eq!(record.expiration_date, Some(RawDate::Single(ts(2025, 8, 13, 4))));
    }

    #[tokio::test]
    async fn answer_without_referral_is_returned_as_is() {
        let (iana, _) = whois_server("Registrar: Somebody\n".to_string()).await;
        let text = TcpWhoisClient::new(iana).query("example.com").await.unwrap();
        assert_eq!(text, "Registrar: Somebody\n");
    }

    #[tokio::test]
    async fn silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            let Ok((socket, _)) = listener.accept().await else { return };
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let client = TcpWhoisClient::new(address.clone()).with_timeout(Duration::from_millis(100));
        let result = client.query("example.com").await;
        assert_eq!(
            result,
            Err(CollectorError::Transport(format!("WHOIS query to {} timed out", address)))
        );
    }

    #[tokio::test]
    async fn unreachable_root_server_is_a_transport_error() {
        let client = TcpWhoisClient::new(unused_address().await);
        let result = lookup_registration(&client, "example.com").await;
        assert!(matches!(result, Err(CollectorError::Transport(_))));
    }
}
