//! One-shot local listener for the OAuth redirect. Implements CodeListener.
//!
//! Binds the redirect port, serves exactly one request, answers the browser
//! with a small HTML page, and hands the code back as the return value. The
//! socket is dropped on every exit path (code, bad request, timeout), so the
//! port is never held beyond the one capture.

use crate::domain::DomainError;
use crate::ports::CodeListener;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info};
use url::Url;

const SUCCESS_PAGE: &str = "<html>\
<head><title>Authorization Successful</title></head>\
<body style=\"font-family: Arial, sans-serif; text-align: center; padding: 50px;\">\
<h1 style=\"color: #2D8CFF;\">&#10003; Authorization Successful!</h1>\
<p>You can close this window and return to your terminal.</p>\
</body></html>";

const FAILURE_PAGE: &str = "<html>\
<head><title>Authorization Failed</title></head>\
<body style=\"font-family: Arial, sans-serif; text-align: center; padding: 50px;\">\
<h1 style=\"color: #FF0000;\">&#10007; Authorization Failed</h1>\
<p>No authorization code received. Please try again.</p>\
</body></html>";

/// One-shot OAuth callback server bound to localhost.
pub struct CallbackServer {
    port: u16,
}

impl CallbackServer {
    pub fn new(port: u16) -> Self {
        Self { port }
    }
}

#[async_trait::async_trait]
impl CodeListener for CallbackServer {
    async fn wait_for_code(&self, timeout: Duration) -> Result<String, DomainError> {
        let listener = TcpListener::bind(("127.0.0.1", self.port))
            .await
            .map_err(|e| {
                DomainError::Auth(format!("cannot bind redirect port {}: {e}", self.port))
            })?;
        info!(port = self.port, "waiting for the OAuth redirect");

        match tokio::time::timeout(timeout, serve_once(&listener)).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::Auth(format!(
                "no authorization redirect received within {}s",
                timeout.as_secs()
            ))),
        }
    }
}

/// Accept one connection, parse the request line, answer the browser.
async fn serve_once(listener: &TcpListener) -> Result<String, DomainError> {
    let (mut stream, peer) = listener
        .accept()
        .await
        .map_err(|e| DomainError::Auth(format!("accept failed: {e}")))?;
    debug!(%peer, "redirect connection accepted");

    let request_path = read_request_path(&mut stream).await?;
    match extract_code(&request_path) {
        Some(code) => {
            write_response(&mut stream, 200, "OK", SUCCESS_PAGE).await;
            Ok(code)
        }
        None => {
            write_response(&mut stream, 400, "Bad Request", FAILURE_PAGE).await;
            Err(DomainError::Auth(
                "redirect carried no authorization code".into(),
            ))
        }
    }
}

/// Read up to the end of the request head and return the request-line path.
async fn read_request_path(stream: &mut TcpStream) -> Result<String, DomainError> {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream
            .read(&mut chunk)
            .await
            .map_err(|e| DomainError::Auth(format!("read failed: {e}")))?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") || buf.len() > 8192 {
            break;
        }
    }

    let head = String::from_utf8_lossy(&buf);
    let request_line = head.lines().next().unwrap_or_default();
    // "GET /?code=... HTTP/1.1"
    request_line
        .split_whitespace()
        .nth(1)
        .map(str::to_string)
        .ok_or_else(|| DomainError::Auth("malformed redirect request".into()))
}

/// Pull the `code` query parameter out of the redirect path.
fn extract_code(path: &str) -> Option<String> {
    let url = Url::parse(&format!("http://localhost{path}")).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == "code")
        .map(|(_, v)| v.into_owned())
        .filter(|c| !c.is_empty())
}

async fn write_response(stream: &mut TcpStream, status: u16, reason: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    // Best effort: the code capture matters, the browser page is cosmetic.
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}
