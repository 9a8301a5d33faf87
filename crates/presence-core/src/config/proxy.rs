//! Outbound HTTP proxy configuration.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Outbound proxy used for the gateway connection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Proxy URL, e.g. `http://127.0.0.1:8080`.
    #[serde(default)]
    pub url: Option<String>,
    /// Basic auth credentials in `user:password` form.
    #[serde(default)]
    pub auth: Option<String>,
}

/// Parsed proxy endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxySettings {
    /// Proxy host name or address.
    pub host: String,
    /// Proxy port.
    pub port: u16,
    /// Optional basic auth credentials.
    pub auth: Option<ProxyAuth>,
}

/// Basic auth credentials for the proxy.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyAuth {
    /// User name.
    pub username: String,
    /// Password.
    pub password: String,
}

impl std::fmt::Debug for ProxyAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyAuth")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl ProxyAuth {
    /// Value for the `Proxy-Authorization` header.
    pub fn header_value(&self) -> String {
        let raw = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(raw))
    }
}

impl ProxySettings {
    /// `host:port` authority for the TCP connection to the proxy.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ProxyConfig {
    /// Parse the configured proxy, returning `None` when no proxy is set.
    ///
    /// Credentials without a proxy URL are ignored. Only plain `http://`
    /// proxies are supported; the gateway's own TLS runs inside the tunnel.
    pub fn settings(&self) -> AppResult<Option<ProxySettings>> {
        let Some(url) = self.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) else {
            return Ok(None);
        };

        let rest = match url.split_once("://") {
            Some(("http", rest)) => rest,
            Some((scheme, _)) => {
                return Err(AppError::configuration(format!(
                    "Unsupported proxy scheme '{scheme}', only http:// is supported"
                )));
            }
            None => url,
        };
        let authority = rest.split('/').next().unwrap_or_default();
        if authority.is_empty() {
            return Err(AppError::configuration(format!("Proxy URL '{url}' has no host")));
        }

        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| {
                    AppError::configuration(format!("Proxy URL '{url}' has an invalid port"))
                })?;
                (host.to_string(), port)
            }
            None => (authority.to_string(), 80),
        };

        let auth = match self.auth.as_deref().filter(|a| !a.is_empty()) {
            Some(raw) => {
                let (username, password) = raw.split_once(':').ok_or_else(|| {
                    AppError::configuration("PROXY_AUTH must be in `user:password` form")
                })?;
                Some(ProxyAuth {
                    username: username.to_string(),
                    password: password.to_string(),
                })
            }
            None => None,
        };

        Ok(Some(ProxySettings { host, port, auth }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proxy(url: Option<&str>, auth: Option<&str>) -> ProxyConfig {
        ProxyConfig {
            url: url.map(String::from),
            auth: auth.map(String::from),
        }
    }

    #[test]
    fn test_no_proxy() {
        assert_eq!(proxy(None, Some("u:p")).settings().unwrap(), None);
        assert_eq!(proxy(Some(""), None).settings().unwrap(), None);
    }

    #[test]
    fn test_parses_host_port_and_auth() {
        let settings = proxy(Some("http://10.0.0.2:3128/"), Some("alice:s3:cret"))
            .settings()
            .unwrap()
            .expect("proxy set");
        assert_eq!(settings.authority(), "10.0.0.2:3128");
        let auth = settings.auth.expect("auth set");
        assert_eq!(auth.username, "alice");
        assert_eq!(auth.password, "s3:cret");
        assert_eq!(auth.header_value(), "Basic YWxpY2U6czM6Y3JldA==");
    }

    #[test]
    fn test_default_port_without_scheme() {
        let settings = proxy(Some("proxy.local"), None).settings().unwrap().unwrap();
        assert_eq!(settings.port, 80);
        assert!(settings.auth.is_none());
    }

    #[test]
    fn test_rejects_malformed_values() {
        assert!(proxy(Some("socks5://h:1"), None).settings().is_err());
        assert!(proxy(Some("http://h:notaport"), None).settings().is_err());
        assert!(proxy(Some("http://h:1"), Some("nocolon")).settings().is_err());
    }
}
