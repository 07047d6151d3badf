//! Secure retrieval of remote media for inline encoding.
//!
//! Every URL is checked before any I/O: it must parse, use http or https,
//! and point at a public address. Responses are capped both by the declared
//! `Content-Length` and by the bytes actually streamed.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures::StreamExt;
use url::{Host, Origin, Url};

use crate::config::MediaConfig;
use crate::error::FetchError;

/// Redirect hops followed before giving up. Every hop is re-validated.
const MAX_REDIRECTS: usize = 5;

/// Fetches media and returns it base64-encoded.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Single attempt, no retry.
    async fn fetch_base64(&self, url: &str) -> Result<String, FetchError>;
}

/// [`MediaFetcher`] with SSRF, size and time limits.
pub struct SecureFetcher {
    client: reqwest::Client,
    max_bytes: u64,
    timeout: Duration,
    /// Origin exempt from host checks, for local test servers.
    exempt_origin: Option<Origin>,
}

impl SecureFetcher {
    /// Create a fetcher with the given limits.
    pub fn new(config: &MediaConfig) -> Result<Self, FetchError> {
        // Redirects are followed by hand so every hop gets the full check.
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!("glif-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            max_bytes: config.max_bytes,
            timeout: config.timeout,
            exempt_origin: None,
        })
    }

    /// Fetcher that skips host checks for one origin only.
    #[cfg(test)]
    fn exempting(config: &MediaConfig, url: &str) -> Self {
        let mut fetcher = Self::new(config).unwrap();
        fetcher.exempt_origin = Some(Url::parse(url).unwrap().origin());
        fetcher
    }

    /// Literal and resolved host checks, applied to the first URL and every hop.
    async fn check_target(&self, url: &Url) -> Result<(), FetchError> {
        if self.exempt_origin.as_ref() == Some(&url.origin()) {
            return Ok(());
        }
        check_host(url)?;
        check_resolved_addrs(url).await
    }

    /// Send the request, following up to [`MAX_REDIRECTS`] validated hops.
    async fn send(&self, raw_url: &str) -> Result<(Url, reqwest::Response), FetchError> {
        let mut url = validate_url(raw_url)?;
        // Range end is inclusive.
        let range = format!("bytes=0-{}", self.max_bytes.saturating_sub(1));

        for hop in 0..=MAX_REDIRECTS {
            if let Err(e) = self.check_target(&url).await {
                if hop > 0 {
                    tracing::warn!(url = %url, hop, "Blocked media redirect: {}", e);
                }
                return Err(e);
            }

            let response = self
                .client
                .get(url.clone())
                .header(reqwest::header::RANGE, &range)
                .send()
                .await
                .map_err(|e| self.map_reqwest_error(e))?;

            if !is_redirect(response.status()) {
                return Ok((url, response));
            }

            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| {
                    FetchError::Request(format!(
                        "HTTP {} redirect without a Location header",
                        response.status().as_u16()
                    ))
                })?;
            let next = url
                .join(location)
                .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
            tracing::debug!(from = %url, to = %next, "Following media redirect");
            url = validate_url(next.as_str())?;
        }

        Err(FetchError::TooManyRedirects(MAX_REDIRECTS))
    }

    async fn fetch_bytes(&self, raw_url: &str) -> Result<Vec<u8>, FetchError> {
        let (url, response) = self.send(raw_url).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        // Reject before reading the body when the server admits the size.
        if let Some(declared) = response.content_length()
            && declared > self.max_bytes
        {
            tracing::warn!(
                url = %url,
                content_length = declared,
                max = self.max_bytes,
                "Rejected media: Content-Length exceeds limit"
            );
            return Err(FetchError::TooLarge {
                size: declared,
                max: self.max_bytes,
            });
        }

        // Content-Length may be absent or wrong, so cap the stream itself.
        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| self.map_reqwest_error(e))?;
            let received = (body.len() + chunk.len()) as u64;
            if received > self.max_bytes {
                return Err(FetchError::TooLarge {
                    size: received,
                    max: self.max_bytes,
                });
            }
            body.extend_from_slice(&chunk);
        }

        tracing::debug!(url = %url, bytes = body.len(), "Fetched media");
        Ok(body)
    }

    fn map_reqwest_error(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

fn is_redirect(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 301 | 302 | 303 | 307 | 308)
}

#[async_trait]
impl MediaFetcher for SecureFetcher {
    async fn fetch_base64(&self, url: &str) -> Result<String, FetchError> {
        let body = tokio::time::timeout(self.timeout, self.fetch_bytes(url))
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))??;
        Ok(STANDARD.encode(&body))
    }
}

/// Parse a URL and require http or https.
pub fn validate_url(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw.trim()).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::UnsupportedScheme(other.to_string())),
    }
}

/// Reject hosts that name loopback, private, link-local or unspecified
/// addresses without resolving anything.
pub fn check_host(url: &Url) -> Result<(), FetchError> {
    let host = url
        .host()
        .ok_or_else(|| FetchError::InvalidUrl("URL missing host".to_string()))?;

    let blocked = match host {
        Host::Domain(domain) => {
            let domain = domain.trim_end_matches('.').to_ascii_lowercase();
            domain == "localhost" || domain.ends_with(".localhost")
        }
        Host::Ipv4(v4) => is_disallowed_ip(&IpAddr::V4(v4)),
        Host::Ipv6(v6) => is_disallowed_ip(&IpAddr::V6(v6)),
    };

    if blocked {
        return Err(FetchError::Blocked(url.host_str().unwrap_or_default().to_string()));
    }
    Ok(())
}

/// Resolve the host and reject it if any address is private.
///
/// Catches public names pointing at internal addresses. Resolution failures
/// are left for the request itself to report.
async fn check_resolved_addrs(url: &Url) -> Result<(), FetchError> {
    let Some(Host::Domain(domain)) = url.host() else {
        return Ok(());
    };
    let port = url.port_or_known_default().unwrap_or(443);

    if let Ok(addrs) = tokio::net::lookup_host((domain, port)).await {
        for addr in addrs {
            if is_disallowed_ip(&addr.ip()) {
                return Err(FetchError::Blocked(format!(
                    "{} resolves to {}",
                    domain,
                    addr.ip()
                )));
            }
        }
    }
    Ok(())
}

fn is_disallowed_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_private()
                || v4.is_loopback()
                || v4.is_link_local()
                || v4.is_multicast()
                || v4.is_unspecified()
                || v4.is_broadcast()
                || *v4 == Ipv4Addr::new(169, 254, 169, 254)
        }
        IpAddr::V6(v6) => {
            if v6.is_loopback()
                || v6.is_unique_local()
                || v6.is_unicast_link_local()
                || v6.is_multicast()
                || v6.is_unspecified()
            {
                return true;
            }
            // Mapped, compatible and NAT64 forms carry an IPv4 address.
            v6.to_ipv4()
                .or_else(|| nat64_embedded(v6))
                .is_some_and(|v4| is_disallowed_ip(&IpAddr::V4(v4)))
        }
    }
}

/// IPv4 address embedded in the `64:ff9b::/96` NAT64 prefix.
fn nat64_embedded(v6: &Ipv6Addr) -> Option<Ipv4Addr> {
    let [a, b, c, d] = [12, 13, 14, 15].map(|i| v6.octets()[i]);
    (v6.segments()[..6] == [0x64, 0xff9b, 0, 0, 0, 0]).then(|| Ipv4Addr::new(a, b, c, d))
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    fn config(max_bytes: u64) -> MediaConfig {
        MediaConfig {
            max_bytes,
            timeout: Duration::from_secs(5),
        }
    }

    /// Serve one canned HTTP response and hand back the raw request.
    async fn serve_once(response: Vec<u8>) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap_or(0);
            let _ = socket.write_all(&response).await;
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&buf[..n]).into_owned()
        });
        (format!("http://{addr}/media.png"), handle)
    }

    /// Serve one canned response per connection, in order.
    async fn serve_each(responses: Vec<String>) -> (String, tokio::task::JoinHandle<usize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let mut served = 0;
            for response in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buf = vec![0u8; 8192];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
                served += 1;
            }
            served
        });
        (format!("http://{addr}/media.png"), handle)
    }

    fn redirect_to(location: &str) -> String {
        format!(
            "HTTP/1.1 302 Found\r\nLocation: {location}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
        )
    }

    #[tokio::test]
    async fn test_blocks_private_literals_without_connecting() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let fetcher = SecureFetcher::new(&config(1024)).unwrap();

        let err = fetcher
            .fetch_base64(&format!("http://127.0.0.1:{port}/x"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Blocked(_)), "got {err:?}");

        let accepted =
            tokio::time::timeout(Duration::from_millis(200), listener.accept()).await;
        assert!(accepted.is_err(), "blocked fetch must not open a connection");
    }

    #[tokio::test]
    async fn test_blocks_private_ranges_and_localhost() {
        let fetcher = SecureFetcher::new(&config(1024)).unwrap();
        for url in [
            "http://192.168.1.5/x",
            "http://10.0.0.1/x",
            "http://172.16.4.2/x",
            "http://172.31.255.255/x",
            "http://169.254.169.254/latest/meta-data/",
            "http://0.0.0.0/x",
            "http://localhost:8080/x",
            "http://api.localhost/x",
            "http://[::1]/x",
            "http://[::ffff:127.0.0.1]/x",
            "http://2130706433/x",
        ] {
            let err = fetcher.fetch_base64(url).await.unwrap_err();
            assert!(matches!(err, FetchError::Blocked(_)), "{url}: got {err:?}");
        }
    }

    #[tokio::test]
    async fn test_rejects_non_http_schemes() {
        let fetcher = SecureFetcher::new(&config(1024)).unwrap();
        let err = fetcher.fetch_base64("ftp://example.com/a.png").await.unwrap_err();
        assert!(matches!(err, FetchError::UnsupportedScheme(ref s) if s == "ftp"));
        let err = fetcher.fetch_base64("file:///etc/passwd").await.unwrap_err();
        assert!(matches!(err, FetchError::UnsupportedScheme(_)));
    }

    #[tokio::test]
    async fn test_rejects_unparsable_url() {
        let fetcher = SecureFetcher::new(&config(1024)).unwrap();
        let err = fetcher.fetch_base64("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[test]
    fn test_check_host_allows_public_hosts() {
        for url in ["https://example.com/a.png", "http://8.8.8.8/a", "https://172.32.0.1/"] {
            assert!(check_host(&Url::parse(url).unwrap()).is_ok(), "{url}");
        }
    }

    #[tokio::test]
    async fn test_declared_length_over_limit_fails_before_body() {
        let (url, server) = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nContent-Length: 20971520\r\n\r\n"
                .to_vec(),
        )
        .await;
        let fetcher = SecureFetcher::exempting(&config(10 * 1024 * 1024), &url);

        let err = fetcher.fetch_base64(&url).await.unwrap_err();
        match err {
            FetchError::TooLarge { size, max } => {
                assert_eq!(size, 20_971_520);
                assert_eq!(max, 10 * 1024 * 1024);
            }
            other => panic!("expected TooLarge, got {other:?}"),
        }
        let _ = server.await;
    }

    #[tokio::test]
    async fn test_streamed_body_over_limit_fails_without_content_length() {
        let mut response = b"HTTP/1.1 200 OK\r\nConnection: close\r\n\r\n".to_vec();
        response.extend(std::iter::repeat_n(b'x', 4096));
        let (url, server) = serve_once(response).await;
        let fetcher = SecureFetcher::exempting(&config(1024), &url);

        let err = fetcher.fetch_base64(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::TooLarge { max: 1024, .. }), "got {err:?}");
        let _ = server.await;
    }

    #[tokio::test]
    async fn test_small_body_is_base64_encoded_and_range_is_sent() {
        let (url, server) =
            serve_once(b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello".to_vec()).await;
        let fetcher = SecureFetcher::exempting(&config(1024), &url);

        let data = fetcher.fetch_base64(&url).await.unwrap();
        assert_eq!(data, "aGVsbG8=");

        let request = server.await.unwrap().to_ascii_lowercase();
        assert!(request.contains("range: bytes=0-1023"), "request was: {request}");
    }

    #[tokio::test]
    async fn test_error_status_fails() {
        let (url, server) =
            serve_once(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n".to_vec()).await;
        let fetcher = SecureFetcher::exempting(&config(1024), &url);

        let err = fetcher.fetch_base64(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Status(404)));
        let _ = server.await;
    }

    #[tokio::test]
    async fn test_redirect_to_private_address_is_blocked_before_connecting() {
        let internal = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let internal_port = internal.local_addr().unwrap().port();

        for location in [
            format!("http://127.0.0.1:{internal_port}/secret.png"),
            format!("http://localhost:{internal_port}/secret.png"),
            "http://169.254.169.254/latest/meta-data/".to_string(),
        ] {
            let (url, server) = serve_each(vec![redirect_to(&location)]).await;
            let fetcher = SecureFetcher::exempting(&config(1024), &url);

            let err = fetcher.fetch_base64(&url).await.unwrap_err();
            assert!(matches!(err, FetchError::Blocked(_)), "{location}: got {err:?}");
            assert_eq!(server.await.unwrap(), 1);
        }

        let accepted =
            tokio::time::timeout(Duration::from_millis(200), internal.accept()).await;
        assert!(accepted.is_err(), "blocked redirect must not open a connection");
    }

    #[tokio::test]
    async fn test_redirect_to_non_http_scheme_is_rejected() {
        let (url, server) = serve_each(vec![redirect_to("file:///etc/passwd")]).await;
        let fetcher = SecureFetcher::exempting(&config(1024), &url);

        let err = fetcher.fetch_base64(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::UnsupportedScheme(_)), "got {err:?}");
        let _ = server.await;
    }

    #[tokio::test]
    async fn test_relative_redirect_is_followed() {
        let (url, server) = serve_each(vec![
            redirect_to("/final.png"),
            "HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok".to_string(),
        ])
        .await;
        let fetcher = SecureFetcher::exempting(&config(1024), &url);

        assert_eq!(fetcher.fetch_base64(&url).await.unwrap(), "b2s=");
        assert_eq!(server.await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_more_than_five_redirects_fails() {
        let (url, server) = serve_each(vec![redirect_to("/again.png"); MAX_REDIRECTS + 1]).await;
        let fetcher = SecureFetcher::exempting(&config(1024), &url);

        let err = fetcher.fetch_base64(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::TooManyRedirects(5)), "got {err:?}");
        assert_eq!(server.await.unwrap(), MAX_REDIRECTS + 1);
    }

    #[test]
    fn test_embedded_ipv4_in_ipv6_is_checked() {
        for ip in [
            "::ffff:127.0.0.1",
            "::127.0.0.1",
            "::10.0.0.1",
            "64:ff9b::7f00:1",
            "64:ff9b::a9fe:a9fe",
        ] {
            assert!(is_disallowed_ip(&ip.parse().unwrap()), "{ip}");
        }
        for ip in ["64:ff9b::808:808", "2001:4860:4860::8888", "::ffff:8.8.8.8"] {
            assert!(!is_disallowed_ip(&ip.parse().unwrap()), "{ip}");
        }
    }

    #[test]
    fn test_is_disallowed_ip_covers_ranges() {
        assert!(is_disallowed_ip(&IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))));
        assert!(is_disallowed_ip(&IpAddr::V4(Ipv4Addr::new(172, 16, 0, 1))));
        assert!(is_disallowed_ip(&IpAddr::V4(Ipv4Addr::new(192, 168, 0, 1))));
        assert!(is_disallowed_ip(&IpAddr::V4(Ipv4Addr::LOCALHOST)));
        assert!(is_disallowed_ip(&IpAddr::V4(Ipv4Addr::UNSPECIFIED)));
        assert!(!is_disallowed_ip(&IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8))));
        assert!(!is_disallowed_ip(&IpAddr::V4(Ipv4Addr::new(172, 32, 0, 1))));
    }
}
