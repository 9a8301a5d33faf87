//! HTTP CONNECT tunnelling through an outbound proxy.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use presence_core::config::ProxyAuth;

use crate::error::GatewayError;

/// Largest proxy response head we are willing to buffer.
const MAX_RESPONSE_HEAD: usize = 8 * 1024;

/// Ask the proxy on the other end of `stream` to open a tunnel to
/// `target` (`host:port`). On success the stream carries raw bytes to the
/// target.
pub async fn establish_tunnel<S>(
    stream: &mut S,
    target: &str,
    auth: Option<&ProxyAuth>,
) -> Result<(), GatewayError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut request = format!("CONNECT {target} HTTP/1.1\r\nHost: {target}\r\n");
    if let Some(auth) = auth {
        request.push_str(&format!("Proxy-Authorization: {}\r\n", auth.header_value()));
    }
    request.push_str("\r\n");

    stream.write_all(request.as_bytes()).await?;
    stream.flush().await?;

    let head = read_response_head(stream).await?;
    let status_line = head.lines().next().unwrap_or_default();
    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| GatewayError::Proxy(format!("malformed response '{status_line}'")))?;

    if status != 200 {
        return Err(GatewayError::Proxy(format!(
            "CONNECT {target} refused: {status_line}"
        )));
    }

    debug!(target = %target, "Proxy tunnel established");
    Ok(())
}

/// Read byte by byte up to the blank line so nothing past the response head
/// is consumed from the tunnel.
async fn read_response_head<S>(stream: &mut S) -> Result<String, GatewayError>
where
    S: AsyncRead + Unpin,
{
    let mut head = Vec::with_capacity(256);
    let mut byte = [0u8; 1];

    while !head.ends_with(b"\r\n\r\n") {
        if head.len() >= MAX_RESPONSE_HEAD {
            return Err(GatewayError::Proxy("response head too large".to_string()));
        }
        let read = stream.read(&mut byte).await?;
        if read == 0 {
            return Err(GatewayError::Proxy(
                "connection closed during CONNECT".to_string(),
            ));
        }
        head.push(byte[0]);
    }

    Ok(String::from_utf8_lossy(&head).into_owned())
}
