// src/core/models.rs

use chrono::NaiveDateTime;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use thiserror::Error;

// --- Reusable Result Types ---

/// The outcome of a single collector sub-routine: either its normalized
/// payload or the error that stopped it.
pub type ScanResult<T> = Result<T, CollectorError>;

/// Errors a collector can hit while talking to its data source.
///
/// These never escape a collector sub-routine: they are stored in the
/// `Report` and serialized as `{"error": "<message>"}`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CollectorError {
    /// The connection failed, timed out, or the response could not be read.
    #[error("{0}")]
    Transport(String),
    /// Name resolution failed, for example NXDOMAIN or no A records.
    #[error("{0}")]
    Lookup(String),
    /// The WHOIS server has no record for the queried domain.
    #[error("No registration record found: {0}")]
    NotFound(String),
    /// The host search API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    /// The response arrived but did not have the expected shape.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Preconditions the operator must satisfy before an analysis can start.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SessionError {
    /// No target domain has been entered.
    #[error("Please set a target domain first.")]
    MissingTarget,
    /// No Shodan API key has been entered or configured.
    #[error("Please set your Shodan API key first.")]
    MissingCredential,
}

// --- Session ---

/// The operator-controlled inputs of one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Domain under analysis, as entered by the operator.
    pub target: String,
    /// Shodan API key.
    pub credential: String,
}

impl Session {
    pub fn new(target: impl Into<String>, credential: impl Into<String>) -> Self {
        Self { target: target.into(), credential: credential.into() }
    }

    /// Checks that both the target and the credential are set.
    /// The target is checked first, matching the order of the menu.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.target.is_empty() {
            return Err(SessionError::MissingTarget);
        }
        if self.credential.is_empty() {
            return Err(SessionError::MissingCredential);
        }
        Ok(())
    }
}

// --- Web Collector Models ---

/// What the plain-HTTP fetch of the target revealed.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WebInfo {
    /// Text of the first `<title>` element, or "No title found".
    pub title: String,
    /// Every e-mail-like string in the body, in order of appearance.
    pub emails: Vec<String>,
    /// HTTP status of the final response.
    pub status_code: u16,
}

// --- Registration Collector Models ---

/// One date value as reported by a WHOIS server.
///
/// `Text` holds values that did not match any known date layout; they are
/// carried through normalization untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawTimestamp {
    /// A value in one of the known layouts, in UTC.
    Parsed(NaiveDateTime),
    /// A value kept verbatim.
    Text(String),
}

/// A registration date field before normalization. Registries report
/// either one value or several candidates for the same field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawDate {
    Single(RawTimestamp),
    Multiple(Vec<RawTimestamp>),
}

/// The registration record exactly as the collector parsed it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationRecord {
    pub registrar: Option<String>,
    pub creation_date: Option<RawDate>,
    pub expiration_date: Option<RawDate>,
}

/// A normalized date field: only strings remain.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum DateField {
    Single(String),
    Multiple(Vec<String>),
}

impl DateField {
    /// The value the expiration heuristic looks at: the string itself, or the
    /// first candidate of a sequence.
    pub fn primary(&self) -> Option<&str> {
        match self {
            DateField::Single(value) => Some(value),
            DateField::Multiple(values) => values.first().map(String::as_str),
        }
    }
}

/// The registration record as it appears in the report, dates as strings.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct RegistrationInfo {
    pub registrar: Option<String>,
    pub creation_date: Option<DateField>,
    pub expiration_date: Option<DateField>,
}

// --- DNS Collector Models ---

/// IPv4 addresses of the target's A records, in resolver order.
pub type DnsInfo = Vec<String>;

// --- Host Search Collector Models ---

/// Summary of a Shodan host search for the target.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct HostSearchInfo {
    /// Total number of matches Shodan reports, not just the returned page.
    pub total_results: u64,
    /// One list of vulnerability ids per returned match, in match order.
    pub vulns: Vec<Vec<String>>,
}

// --- Flags ---

/// A heuristic finding raised against the combined report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    /// The site answered plain HTTP with status 200.
    PubliclyAccessible,
    /// The registration expires in under 30 days.
    ExpirationApproaching,
    /// Shodan indexed this many services for the target.
    ExposedServices(u64),
}

impl Flag {
    /// The stable code used to look the flag up in the knowledge base.
    pub fn code(&self) -> &'static str {
        match self {
            Flag::PubliclyAccessible => "WEB_PUBLICLY_ACCESSIBLE",
            Flag::ExpirationApproaching => "WHOIS_EXPIRATION_APPROACHING",
            Flag::ExposedServices(_) => "SHODAN_EXPOSED_SERVICES",
        }
    }
}

impl std::fmt::Display for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Flag::PubliclyAccessible => write!(f, "Website is publicly accessible"),
            Flag::ExpirationApproaching => write!(f, "Domain expiration is approaching"),
            Flag::ExposedServices(count) => write!(f, "Found {} open ports/services", count),
        }
    }
}

impl Serialize for Flag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// --- Main Report ---

/// The complete result of one analysis run. Field order is the order of
/// the serialized report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    #[serde(serialize_with = "serialize_scan_result")]
    pub web_info: ScanResult<WebInfo>,
    #[serde(serialize_with = "serialize_scan_result")]
    pub whois_info: ScanResult<RegistrationInfo>,
    #[serde(serialize_with = "serialize_scan_result")]
    pub dns_info: ScanResult<DnsInfo>,
    #[serde(serialize_with = "serialize_scan_result")]
    pub shodan_info: ScanResult<HostSearchInfo>,
    pub vulnerabilities: Vec<Flag>,
}

// Success payloads serialize as themselves, failures as `{"error": "..."}`.
fn serialize_scan_result<T, S>(result: &ScanResult<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match result {
        Ok(value) => value.serialize(serializer),
        Err(e) => {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry("error", &e.to_string())?;
            map.end()
        }
    }
}
