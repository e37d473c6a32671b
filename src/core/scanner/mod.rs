// src/core/scanner/mod.rs

pub mod dns_scanner;
pub mod shodan_scanner;
pub mod web_scanner;
pub mod whois_scanner;

use chrono::Utc;
use tracing::{info, warn};

use crate::config::Config;
use crate::core::dates::normalize_registration;
use crate::core::heuristics;
use crate::core::models::{Report, Session, SessionError};
use self::dns_scanner::{DnsLookup, HickoryDnsLookup, resolve_dns};
use self::shodan_scanner::{HostSearch, ShodanClient, search_hosts};
use self::web_scanner::{HttpFetcher, ReqwestFetcher, gather_web_info};
use self::whois_scanner::{TcpWhoisClient, WhoisLookup, lookup_registration};

/// The four data-source collaborators an analysis talks to.
pub struct Collectors {
    pub web: Box<dyn HttpFetcher>,
    pub whois: Box<dyn WhoisLookup>,
    pub dns: Box<dyn DnsLookup>,
    pub hosts: Box<dyn HostSearch>,
}

impl Collectors {
    /// Builds the network-backed collaborators from the configuration.
    pub fn live(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self {
            web: Box::new(ReqwestFetcher::new(&config.user_agent)?),
            whois: Box::new(TcpWhoisClient::new(config.whois_server.clone())),
            dns: Box::new(HickoryDnsLookup::new()),
            hosts: Box::new(ShodanClient::new(config.shodan_api_url.clone(), &config.user_agent)?),
        })
    }
}

/// Runs one complete analysis of the session's target.
///
/// The collectors run one after the other (web, registration, DNS, host
/// search); a failing source never stops the others. Heuristics are only
/// evaluated once all four have returned. If the session is incomplete,
/// nothing is queried and the precondition error is returned instead.
pub async fn run_full_scan(collectors: &Collectors, session: &Session) -> Result<Report, SessionError> {
    if let Err(e) = session.validate() {
        warn!(error = %e, "Analysis refused.");
        return Err(e);
    }
    let target = session.target.as_str();
    info!(target, "Starting analysis.");

    let web_info = gather_web_info(collectors.web.as_ref(), target).await;
    info!(ok = web_info.is_ok(), "Web information gathered.");

    let whois_info = lookup_registration(collectors.whois.as_ref(), target)
        .await
        .map(normalize_registration);
    info!(ok = whois_info.is_ok(), "WHOIS information retrieved.");

    let dns_info = resolve_dns(collectors.dns.as_ref(), target).await;
    info!(ok = dns_info.is_ok(), "DNS information collected.");

    let shodan_info = search_hosts(collectors.hosts.as_ref(), target, &session.credential).await;
    info!(ok = shodan_info.is_ok(), "Shodan information acquired.");

    let vulnerabilities =
        heuristics::evaluate(&web_info, &whois_info, &shodan_info, Utc::now().naive_utc());
    info!(flags = vulnerabilities.len(), "Analysis finished.");

    Ok(Report { web_info, whois_info, dns_info, shodan_info, vulnerabilities })
}
