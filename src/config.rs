// src/config.rs

//! Application settings, loaded with `figment` from built-in defaults, an
//! optional `digital-sleuth.toml` in the user's config directory, and
//! `DIGITAL_SLEUTH_*` environment variables, in that order.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::logging::project_directory;

pub const CONFIG_FILE: &str = "digital-sleuth.toml";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Config {
    /// Log filter used when neither `RUST_LOG` nor `DIGITAL_SLEUTH_LOGLEVEL` is set.
    pub log_level: String,
    /// Pre-fills the Shodan API key in the session.
    pub shodan_api_key: Option<String>,
    /// Directory saved reports are written to.
    pub report_dir: PathBuf,
    pub user_agent: String,
    /// First WHOIS server queried, as `host` or `host:port` (port 43 when
    /// omitted). Referrals are followed from there.
    pub whois_server: String,
    pub shodan_api_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            shodan_api_key: None,
            report_dir: PathBuf::from("."),
            user_agent: format!("DigitalSleuth/{}", env!("CARGO_PKG_VERSION")),
            whois_server: "whois.iana.org".to_string(),
            shodan_api_url: "https://api.shodan.io".to_string(),
        }
    }
}

impl Config {
    /// Loads the configuration from the default file location and the environment.
    pub fn load() -> Result<Self, figment::Error> {
        let path = project_directory().map(|dirs| dirs.config_dir().join(CONFIG_FILE));
        Self::load_from(path.as_deref())
    }

    /// Loads the configuration, reading `path` if it is given and exists.
    pub fn load_from(path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed("DIGITAL_SLEUTH_")).extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_services() {
        let config = Config::default();
        assert_eq!(config.whois_server, "whois.iana.org");
        assert_eq!(config.shodan_api_url, "https://api.shodan.io");
        assert_eq!(config.shodan_api_key, None);
        assert!(config.user_agent.starts_with("DigitalSleuth/"));
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            "shodan_api_key = \"abc123\"\nreport_dir = \"/tmp/reports\"\nlog_level = \"debug\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.shodan_api_key.as_deref(), Some("abc123"));
        assert_eq!(config.report_dir, PathBuf::from("/tmp/reports"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.whois_server, "whois.iana.org");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.whois_server, Config::default().whois_server);
    }
}
