// src/core/scanner/dns_scanner.rs

use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use tracing::{debug, info, warn};

use crate::core::models::{CollectorError, DnsInfo, ScanResult};

#[async_trait]
pub trait DnsLookup: Send + Sync {
    /// Returns the A-record addresses for `host`, in resolver order.
    async fn lookup_a(&self, host: &str) -> Result<Vec<String>, CollectorError>;
}

/// `DnsLookup` backed by a Tokio hickory resolver with the default
/// upstream configuration.
pub struct HickoryDnsLookup {
    resolver: TokioAsyncResolver,
}

impl HickoryDnsLookup {
    pub fn new() -> Self {
        Self {
            resolver: TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default()),
        }
    }
}

impl Default for HickoryDnsLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DnsLookup for HickoryDnsLookup {
    async fn lookup_a(&self, host: &str) -> Result<Vec<String>, CollectorError> {
        debug!(host, "Looking up A records.");
        match self.resolver.ipv4_lookup(host).await {
            Ok(lookup) => Ok(lookup.iter().map(|a| a.to_string()).collect()),
            Err(e) => {
                warn!(host, error = %e, "A lookup failed.");
                Err(CollectorError::Lookup(format!("DNS Error: {}", e)))
            }
        }
    }
}

/// Resolves the target's A records. The addresses are not re-sorted.
pub async fn resolve_dns(resolver: &dyn DnsLookup, target: &str) -> ScanResult<DnsInfo> {
    info!(target, "Starting DNS collection.");
    let addresses = resolver.lookup_a(target).await?;
    info!(count = addresses.len(), "DNS collection finished.");
    Ok(addresses)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedLookup(Result<Vec<String>, CollectorError>);

    #[async_trait]
    impl DnsLookup for FixedLookup {
        async fn lookup_a(&self, _host: &str) -> Result<Vec<String>, CollectorError> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn keeps_resolver_order() {
        let lookup = FixedLookup(Ok(vec!["10.0.0.9".to_string(), "10.0.0.1".to_string()]));
        let addresses = resolve_dns(&lookup, "example.com").await.unwrap();
        assert_eq!(addresses, vec!["10.0.0.9", "10.0.0.1"]);
    }

    #[tokio::test]
    async fn resolution_failure_becomes_error() {
        let err = CollectorError::Lookup("DNS Error: no record found".to_string());
        let lookup = FixedLookup(Err(err.clone()));
        assert_eq!(resolve_dns(&lookup, "nxdomain.invalid").await, Err(err));
    }
}
