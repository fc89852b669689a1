//! Gateway configuration.
//!
//! Loaded from a TOML file; every field has a default so a partial file (or
//! none at all) is valid. Command-line flags are applied on top by the binary.
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0:10080"
//! realm = "zowe"
//!
//! [auth]
//! profiles = ["zos"]
//!
//! [auth.token]
//! request_header = "Authorization-Token"
//! secret_key = "change-me"
//! expiration_secs = 28800
//! issuer = "zowe-gateway"
//! blank_subject = "reject"
//!
//! [auth.platform]
//! timeout_ms = 10000
//! ```

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use zowe_auth::DEFAULT_TOKEN_HEADER;
use zowe_auth_jwt::BlankSubject;

use crate::{Error, Result};

/// Top-level gateway configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Authentication settings.
    pub auth: AuthSettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind: String,
    /// Realm advertised in `WWW-Authenticate` challenges.
    pub realm: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:10080".to_string(),
            realm: "zowe".to_string(),
        }
    }
}

/// Authentication settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Active deployment profiles. `zos` selects the SAF authority.
    pub profiles: Vec<String>,
    /// Token settings.
    pub token: TokenSettings,
    /// Platform authority settings.
    pub platform: PlatformSettings,
}

/// Token settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenSettings {
    /// Header carrying the token on requests and login responses.
    pub request_header: String,
    /// Shared secret used to sign and verify tokens.
    pub secret_key: String,
    /// Lifetime of issued tokens, in seconds.
    pub expiration_secs: u64,
    /// Issuer stamped on and required from tokens.
    pub issuer: Option<String>,
    /// Policy for signed tokens with a blank subject.
    pub blank_subject: BlankSubject,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            request_header: DEFAULT_TOKEN_HEADER.as_str().to_string(),
            secret_key: String::new(),
            expiration_secs: zowe_auth_jwt::DEFAULT_EXPIRATION.as_secs(),
            issuer: None,
            blank_subject: BlankSubject::default(),
        }
    }
}

/// Platform authority settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlatformSettings {
    /// Bound on a single platform call, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            timeout_ms: zowe_auth_platform::provider::DEFAULT_TIMEOUT.as_millis() as u64,
        }
    }
}

impl PlatformSettings {
    /// Timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl GatewayConfig {
    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content =
                    std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
                Self::from_toml_str(&content)
                    .map_err(|e| Error::config(format!("{}: {e}", path.display())))
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse config: {e}")))
    }

    /// Render as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Check the values needed to start the gateway.
    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;
        self.token_header()?;
        let realm = &self.server.realm;
        if realm.is_empty() || !realm.chars().all(|c| c == ' ' || c.is_ascii_graphic()) {
            return Err(Error::config("server.realm must be non-empty printable ASCII"));
        }
        if self.auth.token.secret_key.is_empty() {
            return Err(Error::config("auth.token.secret_key must be set"));
        }
        if self.auth.token.expiration_secs == 0 {
            return Err(Error::config("auth.token.expiration_secs must be positive"));
        }
        if self.auth.platform.timeout_ms == 0 {
            return Err(Error::config("auth.platform.timeout_ms must be positive"));
        }
        Ok(())
    }

    /// The listener address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .map_err(|e| Error::config(format!("invalid server.bind '{}': {e}", self.server.bind)))
    }

    /// The token header as an HTTP header name.
    pub fn token_header(&self) -> Result<http::HeaderName> {
        http::HeaderName::from_bytes(self.auth.token.request_header.as_bytes()).map_err(|e| {
            Error::config(format!(
                "invalid auth.token.request_header '{}': {e}",
                self.auth.token.request_header
            ))
        })
    }
}
