//! # Node Configuration
//!
//! Loaded from a JSON file, then overridden from the environment.
//!
//! | Variable | Overrides | Default |
//! |----------|-----------|---------|
//! | `AS2_HOME` | `server.home` | `.` |
//! | `AS2_CONFIG` | config file path | `{home}/config.json` |
//! | `AS2_FILE_PORT` | `server.file_port` | 10080 |
//! | `AS2_MDN_PORT` | `server.mdn_port` | 10081 |
//! | `AS2_URL` | `server.url` | `http://localhost` |
//!
//! A missing config file is not an error: the node starts with defaults and
//! no partners.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use as2_06_scheduler::SchedulerConfig;
use serde::{Deserialize, Serialize};
use shared_types::{CompanyRecord, PartnerRecord};
use thiserror::Error;
use tracing::{info, warn};

/// Complete node configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub server: ServerConfig,
    pub company: CompanyRecord,
    pub partners: Vec<PartnerRecord>,
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Root of the directory tree (inbox, outbox, certs, system).
    pub home: PathBuf,
    /// Public base URL, without port. The async MDN URL is `{url}:{mdn_port}`.
    pub url: String,
    pub file_port: u16,
    pub mdn_port: u16,
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            home: PathBuf::from("."),
            url: "http://localhost".to_string(),
            file_port: 10080,
            mdn_port: 10081,
            bind_address: "0.0.0.0".to_string(),
        }
    }
}

impl ServerConfig {
    /// Advertised in `Receipt-Delivery-Option` for async sends.
    pub fn async_mdn_url(&self) -> String {
        format!("{}:{}", self.url.trim_end_matches('/'), self.mdn_port)
    }

    pub fn file_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.addr(self.file_port)
    }

    pub fn mdn_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.addr(self.mdn_port)
    }

    fn addr(&self, port: u16) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_address, port)
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddress(self.bind_address.clone()))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Invalid config file {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("Company AS2 id is not configured")]
    MissingCompanyId,

    #[error("Partner AS2 id must not be blank")]
    BlankPartnerId,

    #[error("Partner {0} is configured more than once")]
    DuplicatePartner(String),

    #[error("Partner {0} has no URL to send to")]
    MissingPartnerUrl(String),

    #[error("File and MDN listeners cannot share port {0}")]
    PortClash(u16),

    #[error("Invalid bind address {0}")]
    InvalidBindAddress(String),
}

impl NodeConfig {
    /// Reads a JSON config file. Unspecified fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Checks what the node cannot run without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.company.as2id.trim().is_empty() {
            return Err(ConfigError::MissingCompanyId);
        }
        // Port 0 lets the OS pick, so two zeros do not clash.
        if self.server.file_port != 0 && self.server.file_port == self.server.mdn_port {
            return Err(ConfigError::PortClash(self.server.file_port));
        }
        self.server.file_addr()?;

        let mut seen = HashSet::new();
        for partner in &self.partners {
            let id = partner.as2id.trim();
            if id.is_empty() {
                return Err(ConfigError::BlankPartnerId);
            }
            if !seen.insert(id.to_ascii_lowercase()) {
                return Err(ConfigError::DuplicatePartner(id.to_string()));
            }
            if partner.send_settings.url.trim().is_empty() {
                return Err(ConfigError::MissingPartnerUrl(id.to_string()));
            }
        }
        Ok(())
    }
}

/// Load configuration from the process environment and the config file.
pub fn load_config() -> Result<NodeConfig, ConfigError> {
    load_config_from(|key| std::env::var(key).ok())
}

/// Same as `load_config()` with an explicit variable lookup.
pub fn load_config_from(env: impl Fn(&str) -> Option<String>) -> Result<NodeConfig, ConfigError> {
    let home = env("AS2_HOME").map(PathBuf::from);
    let path = env("AS2_CONFIG").map(PathBuf::from).unwrap_or_else(|| {
        home.clone()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.json")
    });

    let mut config = if path.exists() {
        info!("Loading configuration from {}", path.display());
        NodeConfig::from_file(&path)?
    } else {
        warn!("Config file {} not found, using defaults", path.display());
        NodeConfig::default()
    };

    // Override from environment
    if let Some(home) = home {
        config.server.home = home;
    }
    if let Some(url) = env("AS2_URL") {
        config.server.url = url;
    }
    if let Some(port) = env("AS2_FILE_PORT") {
        match port.parse() {
            Ok(p) => config.server.file_port = p,
            Err(_) => warn!("AS2_FILE_PORT is not a port number: {}", port),
        }
    }
    if let Some(port) = env("AS2_MDN_PORT") {
        match port.parse() {
            Ok(p) => config.server.mdn_port = p,
            Err(_) => warn!("AS2_MDN_PORT is not a port number: {}", port),
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    fn valid() -> NodeConfig {
        let mut config = NodeConfig::default();
        config.company.as2id = "MyCompany".to_string();
        let mut partner = PartnerRecord::new("PartnerA");
        partner.send_settings.url = "http://partner-a.example:10080".to_string();
        config.partners.push(partner);
        config
    }

    #[test]
    fn test_default_config() {
        let config = NodeConfig::default();
        assert_eq!(config.server.file_port, 10080);
        assert_eq!(config.server.mdn_port, 10081);
        assert_eq!(config.server.async_mdn_url(), "http://localhost:10081");
        assert_eq!(config.scheduler.flush_interval_ms, 30_000);
    }

    #[test]
    fn test_validate() {
        assert!(valid().validate().is_ok());

        assert!(matches!(
            NodeConfig::default().validate(),
            Err(ConfigError::MissingCompanyId)
        ));

        let mut clash = valid();
        clash.server.mdn_port = clash.server.file_port;
        assert!(matches!(clash.validate(), Err(ConfigError::PortClash(10080))));

        let mut duplicate = valid();
        let mut again = duplicate.partners[0].clone();
        again.as2id = "partnera".to_string();
        duplicate.partners.push(again);
        assert!(matches!(
            duplicate.validate(),
            Err(ConfigError::DuplicatePartner(_))
        ));

        let mut no_url = valid();
        no_url.partners[0].send_settings.url.clear();
        assert!(matches!(
            no_url.validate(),
            Err(ConfigError::MissingPartnerUrl(_))
        ));
    }

    #[test]
    fn test_load_from_file_with_env_overrides() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("config.json"),
            r#"{
                "server": { "url": "http://as2.mycompany.example", "file_port": 4080 },
                "company": { "as2id": "MyCompany", "email": "as2@mycompany.example" },
                "partners": [
                    { "as2id": "PartnerA", "send_settings": { "url": "http://partner-a.example:10080" } }
                ]
            }"#,
        )
        .unwrap();
        let home = tmp.path().to_string_lossy().into_owned();

        let config = load_config_from(env(&[("AS2_HOME", home.as_str()), ("AS2_MDN_PORT", "4081")])).unwrap();

        assert_eq!(config.server.home, tmp.path());
        assert_eq!(config.server.file_port, 4080);
        assert_eq!(config.server.mdn_port, 4081);
        assert_eq!(
            config.server.async_mdn_url(),
            "http://as2.mycompany.example:4081"
        );
        assert_eq!(config.company.email, "as2@mycompany.example");
        assert_eq!(config.partners.len(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("absent.json").to_string_lossy().into_owned();
        let config =
            load_config_from(env(&[("AS2_CONFIG", path.as_str()), ("AS2_FILE_PORT", "nope")])).unwrap();
        assert_eq!(config.server.file_port, 10080);
        assert!(config.partners.is_empty());
    }

    #[test]
    fn test_malformed_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = NodeConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
