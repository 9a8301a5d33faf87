//! TCP, optional proxy tunnel, TLS, and WebSocket handshake.

use std::time::Duration;

use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::http::Uri;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, client_async_tls_with_config};
use tracing::{debug, info};

use presence_core::config::ProxySettings;

use super::proxy::establish_tunnel;
use crate::error::GatewayError;

/// WebSocket stream to the gateway.
pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Host and port the socket should reach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Host name.
    pub host: String,
    /// Port, defaulted from the scheme.
    pub port: u16,
}

impl Endpoint {
    /// Parse a `ws://` or `wss://` URL.
    pub fn parse(url: &str) -> Result<Self, GatewayError> {
        let uri: Uri = url
            .parse()
            .map_err(|_| GatewayError::InvalidUrl(url.to_string()))?;
        let default_port = match uri.scheme_str() {
            Some("wss") => 443,
            Some("ws") => 80,
            _ => return Err(GatewayError::InvalidUrl(url.to_string())),
        };
        let host = uri
            .host()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| GatewayError::InvalidUrl(url.to_string()))?;
        Ok(Self {
            host: host.to_string(),
            port: uri.port_u16().unwrap_or(default_port),
        })
    }

    /// `host:port`.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Build the URL for resuming against `resume_base`, keeping the query
/// (version and encoding) of the configured gateway URL.
pub fn resume_url(resume_base: &str, configured: &str) -> String {
    let base = resume_base.trim_end_matches('/');
    match configured.split_once('?') {
        Some((_, query)) if !base.contains('?') => format!("{base}/?{query}"),
        _ => base.to_string(),
    }
}

/// Open a WebSocket to `url`, optionally through `proxy`, bounded by
/// `timeout`.
pub async fn connect(
    url: &str,
    proxy: Option<&ProxySettings>,
    timeout: Duration,
) -> Result<WsStream, GatewayError> {
    let endpoint = Endpoint::parse(url)?;
    install_crypto_provider();

    tokio::time::timeout(timeout, async {
        let stream = match proxy {
            Some(proxy) => {
                debug!(proxy = %proxy.authority(), target = %endpoint.authority(), "Connecting through proxy");
                let mut stream = TcpStream::connect(proxy.authority()).await?;
                establish_tunnel(&mut stream, &endpoint.authority(), proxy.auth.as_ref()).await?;
                stream
            }
            None => TcpStream::connect(endpoint.authority()).await?,
        };
        stream.set_nodelay(true)?;

        let (ws, response) = client_async_tls_with_config(url, stream, None, None).await?;
        info!(host = %endpoint.host, status = %response.status(), "Gateway WebSocket connected");
        Ok::<_, GatewayError>(ws)
    })
    .await
    .map_err(|_| GatewayError::Timeout("gateway connect"))?
}

/// rustls needs a process-wide crypto provider before the first handshake.
fn install_crypto_provider() {
    // Already installed on every call after the first.
    let _ = rustls::crypto::ring::default_provider().install_default();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_defaults() {
        let endpoint = Endpoint::parse("wss://gateway.discord.gg/?v=10&encoding=json").unwrap();
        assert_eq!(endpoint.authority(), "gateway.discord.gg:443");

        let plain = Endpoint::parse("ws://127.0.0.1:9001").unwrap();
        assert_eq!(plain.authority(), "127.0.0.1:9001");
    }

    #[test]
    fn test_endpoint_rejects_other_schemes() {
        assert!(matches!(
            Endpoint::parse("https://gateway.discord.gg"),
            Err(GatewayError::InvalidUrl(_))
        ));
        assert!(Endpoint::parse("not a url").is_err());
    }

    #[test]
    fn test_resume_url_keeps_query() {
        assert_eq!(
            resume_url(
                "wss://gateway-us-east1-b.discord.gg",
                "wss://gateway.discord.gg/?v=10&encoding=json"
            ),
            "wss://gateway-us-east1-b.discord.gg/?v=10&encoding=json"
        );
        assert_eq!(
            resume_url("wss://resume.example/", "wss://gateway.discord.gg"),
            "wss://resume.example"
        );
    }

    #[tokio::test]
    async fn test_connect_timeout() {
        // Listener that accepts but never answers the handshake.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _held = listener.accept().await;
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let err = connect(&format!("ws://{addr}"), None, Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Timeout(_)));
    }
}
