//! Credentials and the extractors that pull them out of a request.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::request::Parts;

/// Default header carrying the gateway token (`Authorization-Token`).
pub const DEFAULT_TOKEN_HEADER: http::HeaderName =
    http::HeaderName::from_static("authorization-token");

/// A candidate credential found on an inbound request.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// A signed token string.
    Token(String),
    /// A user id and password pair.
    Password {
        /// The user id.
        userid: String,
        /// The password.
        password: String,
    },
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Token(_) => f.write_str("Token(***)"),
            Credential::Password { userid, .. } => f
                .debug_struct("Password")
                .field("userid", userid)
                .field("password", &"***")
                .finish(),
        }
    }
}

/// Pulls a credential out of a request.
///
/// Never fails: a request without a recognizable credential yields `None`.
pub trait CredentialExtractor: Send + Sync + 'static {
    /// Extract a credential from the request head.
    fn extract(&self, parts: &Parts) -> Option<Credential>;
}

/// Reads a token from a single configured header.
#[derive(Debug, Clone)]
pub struct HeaderTokenExtractor {
    header: http::HeaderName,
}

impl HeaderTokenExtractor {
    /// Extractor reading the given header.
    pub fn new(header: http::HeaderName) -> Self {
        Self { header }
    }
}

impl Default for HeaderTokenExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_HEADER)
    }
}

impl CredentialExtractor for HeaderTokenExtractor {
    fn extract(&self, parts: &Parts) -> Option<Credential> {
        // Opaque bytes are still a token; the validator gets to reject them.
        let raw = String::from_utf8_lossy(parts.headers.get(&self.header)?.as_bytes());
        let value = raw.trim();
        let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
        if token.is_empty() {
            return None;
        }
        Some(Credential::Token(token.to_string()))
    }
}

/// Reads `Authorization: Basic` credentials.
#[derive(Debug, Clone, Default)]
pub struct BasicAuthExtractor;

impl CredentialExtractor for BasicAuthExtractor {
    fn extract(&self, parts: &Parts) -> Option<Credential> {
        let value = parts
            .headers
            .get(http::header::AUTHORIZATION)?
            .to_str()
            .ok()?;
        let (scheme, encoded) = value.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }
        let encoded = encoded.trim();
        let decoded = STANDARD.decode(encoded).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (userid, password) = decoded.split_once(':')?;
        if userid.is_empty() {
            return None;
        }
        Some(Credential::Password {
            userid: userid.to_string(),
            password: password.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut builder = http::Request::builder();
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn basic(raw: &str) -> String {
        format!("Basic {}", STANDARD.encode(raw))
    }

    #[test]
    fn test_header_token_present() {
        let p = parts(&[("Authorization-Token", "abc.def.ghi")]);
        assert_eq!(
            HeaderTokenExtractor::default().extract(&p),
            Some(Credential::Token("abc.def.ghi".to_string()))
        );
    }

    #[test]
    fn test_header_token_strips_bearer() {
        let p = parts(&[("Authorization-Token", "Bearer abc.def.ghi")]);
        assert_eq!(
            HeaderTokenExtractor::default().extract(&p),
            Some(Credential::Token("abc.def.ghi".to_string()))
        );
    }

    #[test]
    fn test_header_token_missing() {
        assert_eq!(HeaderTokenExtractor::default().extract(&parts(&[])), None);
    }

    #[test]
    fn test_header_token_empty_is_absent() {
        let p = parts(&[("Authorization-Token", "  ")]);
        assert_eq!(HeaderTokenExtractor::default().extract(&p), None);
    }

    #[test]
    fn test_header_token_custom_header() {
        let extractor = HeaderTokenExtractor::new(http::HeaderName::from_static("x-zowe-token"));
        let p = parts(&[("X-Zowe-Token", "t")]);
        assert_eq!(extractor.extract(&p), Some(Credential::Token("t".to_string())));
        let p = parts(&[("Authorization-Token", "t")]);
        assert_eq!(extractor.extract(&p), None);
    }

    #[test]
    fn test_basic_valid() {
        let p = parts(&[("Authorization", basic("alice:s3cr:et").as_str())]);
        assert_eq!(
            BasicAuthExtractor.extract(&p),
            Some(Credential::Password {
                userid: "alice".to_string(),
                password: "s3cr:et".to_string(),
            })
        );
    }

    #[test]
    fn test_header_token_opaque_bytes_still_extracted() {
        let mut p = parts(&[]);
        p.headers.insert(
            "authorization-token",
            http::HeaderValue::from_bytes(b"garb\xffage").unwrap(),
        );
        match HeaderTokenExtractor::default().extract(&p) {
            Some(Credential::Token(token)) => assert!(token.starts_with("garb")),
            other => panic!("expected a token credential, got {other:?}"),
        }
    }

    #[test]
    fn test_default_header_matches_constant() {
        assert_eq!(HeaderTokenExtractor::default().header, DEFAULT_TOKEN_HEADER);
    }

    #[test]
    fn test_basic_scheme_is_case_insensitive() {
        let encoded = STANDARD.encode("alice:pw");
        for scheme in ["basic", "BASIC", "bAsIc"] {
            let value = format!("{scheme} {encoded}");
            let p = parts(&[("Authorization", value.as_str())]);
            assert_eq!(
                BasicAuthExtractor.extract(&p),
                Some(Credential::Password {
                    userid: "alice".to_string(),
                    password: "pw".to_string(),
                })
            );
        }
    }

    #[test]
    fn test_basic_wrong_scheme() {
        let p = parts(&[("Authorization", "Bearer abc")]);
        assert_eq!(BasicAuthExtractor.extract(&p), None);
    }

    #[test]
    fn test_basic_not_base64() {
        let p = parts(&[("Authorization", "Basic !!!")]);
        assert_eq!(BasicAuthExtractor.extract(&p), None);
    }

    #[test]
    fn test_basic_missing_colon() {
        let p = parts(&[("Authorization", basic("alice").as_str())]);
        assert_eq!(BasicAuthExtractor.extract(&p), None);
    }

    #[test]
    fn test_basic_empty_userid() {
        let p = parts(&[("Authorization", basic(":pw").as_str())]);
        assert_eq!(BasicAuthExtractor.extract(&p), None);
    }

    #[test]
    fn test_debug_hides_secrets() {
        let token = format!("{:?}", Credential::Token("secret-token".into()));
        assert!(!token.contains("secret-token"));
        let pw = format!(
            "{:?}",
            Credential::Password {
                userid: "alice".into(),
                password: "hunter2".into(),
            }
        );
        assert!(pw.contains("alice"));
        assert!(!pw.contains("hunter2"));
    }
}
