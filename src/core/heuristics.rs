// src/core/heuristics.rs

use chrono::NaiveDateTime;
use tracing::debug;

use crate::core::dates::parse_iso8601;
use crate::core::models::{Flag, HostSearchInfo, RegistrationInfo, ScanResult, WebInfo};

/// Domains expiring in fewer days than this are flagged.
const EXPIRATION_WARNING_DAYS: i64 = 30;

/// Evaluates the heuristic rules against the collected payloads.
///
/// The rules run in a fixed order (accessibility, expiration, exposure) and
/// each adds at most one flag. A source that errored turns its rule into a
/// no-op.
pub fn evaluate(
    web_info: &ScanResult<WebInfo>,
    whois_info: &ScanResult<RegistrationInfo>,
    shodan_info: &ScanResult<HostSearchInfo>,
    now: NaiveDateTime,
) -> Vec<Flag> {
    let mut flags = Vec::new();

    if let Ok(web) = web_info {
        if check_accessibility(web) {
            debug!(status = web.status_code, "Accessibility rule matched.");
            flags.push(Flag::PubliclyAccessible);
        }
    }

    if let Ok(whois) = whois_info {
        if check_expiration(whois, now) {
            debug!("Expiration rule matched.");
            flags.push(Flag::ExpirationApproaching);
        }
    }

    if let Ok(shodan) = shodan_info {
        if let Some(flag) = check_exposure(shodan) {
            debug!(total = shodan.total_results, "Exposure rule matched.");
            flags.push(flag);
        }
    }

    flags
}

// Only an exact 200 counts; redirects and other 2xx codes do not.
fn check_accessibility(web: &WebInfo) -> bool {
    web.status_code == 200
}

fn check_expiration(whois: &RegistrationInfo, now: NaiveDateTime) -> bool {
    let Some(raw) = whois.expiration_date.as_ref().and_then(|d| d.primary()) else {
        return false;
    };
    match parse_iso8601(raw) {
        Some(expires) => (expires - now).num_days() < EXPIRATION_WARNING_DAYS,
        None => {
            debug!(value = raw, "Expiration date is not ISO-8601, skipping rule.");
            false
        }
    }
}

fn check_exposure(shodan: &HostSearchInfo) -> Option<Flag> {
    (shodan.total_results > 0).then_some(Flag::ExposedServices(shodan.total_results))
}
