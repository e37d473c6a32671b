//! Static, read-only descriptions of every flag the heuristics can raise.
//! The UI uses these to explain a selected flag and suggest what to do about it.

use crate::core::models::Flag;
use std::fmt;

/// Severity used to colour a flag in the interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

/// The data source a flag is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FindingCategory {
    Web,
    Whois,
    Shodan,
}

impl fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindingCategory::Web => write!(f, "WEB"),
            FindingCategory::Whois => write!(f, "WHOIS"),
            FindingCategory::Shodan => write!(f, "SHODAN"),
        }
    }
}

/// Human-readable context for one flag code.
pub struct FindingDetail {
    pub code: &'static str,
    /// Short heading shown above the flag text.
    pub title: &'static str,
    pub category: FindingCategory,
    pub severity: Severity,
    pub description: &'static str,
    pub remediation: &'static str,
}

static FINDINGS: &[FindingDetail] = &[
    FindingDetail {
        code: "WEB_PUBLICLY_ACCESSIBLE",
        title: "Site Publicly Reachable over HTTP",
        category: FindingCategory::Web,
        severity: Severity::Info,
        description: "The site answered a plain HTTP request with status 200. Anything served there, including e-mail addresses embedded in the page, is visible to anyone.",
        remediation: "Review the page for contact details or internal information that should not be public, and redirect plain HTTP to HTTPS.",
    },
    FindingDetail {
        code: "WHOIS_EXPIRATION_APPROACHING",
        title: "Domain Registration Expiring",
        category: FindingCategory::Whois,
        severity: Severity::Critical,
        description: "The registration expires in less than 30 days, or has already expired. A lapsed domain can be re-registered by a third party and used to impersonate the owner.",
        remediation: "Renew the domain with the registrar and enable automatic renewal.",
    },
    FindingDetail {
        code: "SHODAN_EXPOSED_SERVICES",
        title: "Services Exposed to the Internet",
        category: FindingCategory::Shodan,
        severity: Severity::Warning,
        description: "Shodan's index lists open ports or services associated with this domain. Indexed services are the first thing opportunistic attackers try.",
        remediation: "Check each listed service, close the ones that do not need to be reachable from the internet, and patch any listed vulnerabilities.",
    },
];

/// Looks up the detail record for a flag code.
pub fn get_finding_detail(code: &str) -> Option<&'static FindingDetail> {
    FINDINGS.iter().find(|f| f.code == code)
}

pub fn detail_for(flag: &Flag) -> Option<&'static FindingDetail> {
    get_finding_detail(flag.code())
}
