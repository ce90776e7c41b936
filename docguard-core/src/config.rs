//! Configuration management for docguard
//!
//! Every list the validator works from (packages, accounts, URLs, patterns)
//! has a built-in default. A TOML file can override any subset of keys; keys
//! it leaves out keep their defaults.

use std::path::{
    Path,
    PathBuf,
};

use serde::{
    Deserialize,
    Serialize,
};
use tracing::debug;

use crate::error::{
    DocGuardError,
    DocGuardResult,
};

/// File names probed under the docs root when no config path is given
pub const CONFIG_FILE_NAMES: [&str; 3] = [
    ".docguard.toml",
    "docguard.toml",
    ".config/docguard.toml",
];

/// Top-level validator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocGuardConfig {
    /// Document whose first line must be the frontmatter marker
    pub entry_document:     String,
    /// Expected first line of the entry document
    pub frontmatter_marker: String,
    /// File extensions treated as documents (without the dot)
    pub extensions:         Vec<String>,
    /// Whether relative Markdown links are resolved against the filesystem
    pub check_local_links:  bool,
    /// Package registry settings
    pub registry:           RegistryConfig,
    /// Chain-info endpoint settings
    pub chain:              ChainConfig,
    /// URL reachability settings
    pub http:               HttpConfig,
    /// Secret-leak scan settings
    pub secrets:            SecretsConfig,
    /// Personal-reference scan settings
    pub personal:           PersonalConfig,
    /// Stale-reference scan settings
    pub stale:              StaleConfig,
    /// Endpoint-shape scan settings
    pub endpoints:          EndpointConfig,
}

impl Default for DocGuardConfig {
    fn default() -> Self {
        Self {
            entry_document:     "SKILL.md".to_string(),
            frontmatter_marker: "---".to_string(),
            extensions:         vec!["md".to_string()],
            check_local_links:  true,
            registry:           RegistryConfig::default(),
            chain:              ChainConfig::default(),
            http:               HttpConfig::default(),
            secrets:            SecretsConfig::default(),
            personal:           PersonalConfig::default(),
            stale:              StaleConfig::default(),
            endpoints:          EndpointConfig::default(),
        }
    }
}

/// Package registry queried for published versions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Registry base URL
    pub url:      String,
    /// Package names that must exist
    pub packages: Vec<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url:      "https://registry.npmjs.org".to_string(),
            packages: vec!["@proton/js".to_string(), "@proton/web-sdk".to_string()],
        }
    }
}

/// HTTP method used for account lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountMethod {
    /// `GET {endpoint}{path}`
    Get,
    /// `POST {endpoint}{path}` with `body` as JSON
    Post,
}

/// Chain-info endpoint queried for account existence
///
/// `{id}` in `path` and `body` is replaced with the account identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Node base URL
    pub endpoint:       String,
    /// Request method
    pub method:         AccountMethod,
    /// Request path template
    pub path:           String,
    /// JSON body template, sent only with `post`
    pub body:           String,
    /// Account identifiers that must exist
    pub accounts:       Vec<String>,
    /// Field the account response must contain
    pub expected_field: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            endpoint:       "https://proton.eosusa.io".to_string(),
            method:         AccountMethod::Post,
            path:           "/v1/chain/get_account".to_string(),
            body:           r#"{"account_name":"{id}"}"#.to_string(),
            accounts:       vec!["eosio".to_string(), "eosio.token".to_string()],
            expected_field: "account_name".to_string(),
        }
    }
}

/// URLs that must answer HTTP 200
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// URLs to probe
    pub urls:             Vec<String>,
    /// Per-request timeout in seconds
    pub timeout_secs:     u64,
    /// Follow redirects before comparing the status with 200
    pub follow_redirects: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            urls:             vec![
                "https://xprnetwork.org".to_string(),
                "https://explorer.xprnetwork.org".to_string(),
                "https://proton.eosusa.io/v1/chain/get_info".to_string(),
            ],
            timeout_secs:     15,
            follow_redirects: true,
        }
    }
}

/// A named secret-key textual format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretFormat {
    /// Label used in check output
    pub name:    String,
    /// Regex matching the format
    pub pattern: String,
}

impl SecretFormat {
    /// Create a new secret format
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name:    name.into(),
            pattern: pattern.into(),
        }
    }
}

/// Secret-leak scan settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretsConfig {
    /// Formats scanned for; each yields its own result
    pub formats:      Vec<SecretFormat>,
    /// Lines containing any of these substrings are known-fake examples
    pub placeholders: Vec<String>,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            formats:      vec![
                SecretFormat::new("PVT_K1 private key", r"PVT_K1_[1-9A-HJ-NP-Za-km-z]{40,}"),
                SecretFormat::new("WIF private key", r"\b5[HJK][1-9A-HJ-NP-Za-km-z]{49}\b"),
            ],
            placeholders: vec![
                "YOUR_".to_string(),
                "your_".to_string(),
                "xxxx".to_string(),
                "EXAMPLE".to_string(),
                "PLACEHOLDER".to_string(),
            ],
        }
    }
}

/// Personal-reference scan settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalConfig {
    /// Regexes for personal identifiers (home paths, user names)
    pub patterns: Vec<String>,
}

impl Default for PersonalConfig {
    fn default() -> Self {
        Self {
            patterns: vec![
                r"/Users/[A-Za-z0-9_.-]+".to_string(),
                r"/home/[a-z_][a-z0-9_-]*/".to_string(),
            ],
        }
    }
}

/// Stale-reference scan settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StaleConfig {
    /// Deprecated domain names, matched literally
    pub domains:           Vec<String>,
    /// Lines containing this word describe history and are skipped
    pub historical_marker: String,
}

impl Default for StaleConfig {
    fn default() -> Self {
        Self {
            domains:           vec!["protonchain.com".to_string(), "proton.bloks.io".to_string()],
            historical_marker: "formerly".to_string(),
        }
    }
}

/// Endpoint-shape scan settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Description of the malformed shape
    pub description: String,
    /// Regex matching the malformed shape
    pub pattern:     String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            description: "chain API URL missing /v1".to_string(),
            pattern:     r"https?://[A-Za-z0-9.-]+(:[0-9]+)?/chain/get_[a-z_]+".to_string(),
        }
    }
}

impl DocGuardConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> DocGuardResult<Self> {
        toml::from_str(content).map_err(|e| DocGuardError::Config(e.to_string()))
    }

    /// Load configuration from an explicit file
    pub fn load_file(path: &Path) -> DocGuardResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DocGuardError::io(path, e))?;
        Self::from_toml(&content)
            .map_err(|e| DocGuardError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load configuration for a docs root
    ///
    /// An explicit path must exist. Without one, the first of
    /// [`CONFIG_FILE_NAMES`] found under `docs_root` is used, and the
    /// built-in defaults apply when none exists.
    pub fn load(docs_root: &Path, explicit: Option<&Path>) -> DocGuardResult<Self> {
        if let Some(path) = explicit {
            debug!("Loading config from {}", path.display());
            return Self::load_file(path);
        }

        match Self::discover(docs_root) {
            Some(path) => {
                debug!("Found config file {}", path.display());
                Self::load_file(&path)
            },
            None => {
                debug!("No config file under {}, using defaults", docs_root.display());
                Ok(Self::default())
            },
        }
    }

    /// Find a config file under the docs root
    pub fn discover(docs_root: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES.iter().map(|name| docs_root.join(name)).find(|path| path.is_file())
    }
}
