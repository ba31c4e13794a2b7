//! Reachability checks: internet connectivity, HTTP checks and a blocking
//! DNS/TCP network diagnosis.

use anyhow::{Context, Result};
use reqwest::Client;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::LazyLock;
use std::time::{Duration, Instant};

static SHARED_HTTP: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .user_agent("aura-assistant")
        .pool_max_idle_per_host(2)
        .build()
        .unwrap_or_else(|_| Client::new())
});

pub const CONNECTIVITY_URL: &str = "https://www.google.com";
pub const CONNECTIVITY_TIMEOUT: Duration = Duration::from_secs(5);
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Connectivity {
    Online,
    /// Reachable but answered with a non-success status
    Degraded(u16),
    Offline,
}

pub async fn check_connectivity() -> Connectivity {
    match SHARED_HTTP
        .get(CONNECTIVITY_URL)
        .timeout(CONNECTIVITY_TIMEOUT)
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => Connectivity::Online,
        Ok(resp) => Connectivity::Degraded(resp.status().as_u16()),
        Err(e) => {
            tracing::debug!("connectivity check failed: {}", e);
            Connectivity::Offline
        }
    }
}

#[derive(Debug, Clone)]
pub struct SiteCheck {
    pub url: String,
    pub status: u16,
    pub elapsed: Duration,
}

/// HTTP GET `url` and time the response headers.
pub async fn check_site(url: &str) -> Result<SiteCheck> {
    let start = Instant::now();
    let resp = SHARED_HTTP
        .get(url)
        .timeout(PROBE_TIMEOUT)
        .send()
        .await
        .with_context(|| format!("request to {} failed", url))?;

    Ok(SiteCheck {
        url: url.to_string(),
        status: resp.status().as_u16(),
        elapsed: start.elapsed(),
    })
}

/// Prefix `https://` when no scheme is given.
pub fn normalize_url(target: &str) -> String {
    if target.starts_with("http://") || target.starts_with("https://") {
        target.to_string()
    } else {
        format!("https://{}", target)
    }
}

#[derive(Debug, Clone)]
pub struct DiagnosticReport {
    pub summary: String,
    pub details: Vec<String>,
}

impl DiagnosticReport {
    pub fn failures(&self) -> usize {
        self.details.iter().filter(|d| d.contains("FAIL")).count()
    }
}

pub const DIAGNOSTIC_HOST: &str = "example.com";
const PUBLIC_RESOLVERS: [([u8; 4], u16); 2] = [([1, 1, 1, 1], 53), ([8, 8, 8, 8], 53)];

/// One DNS check line for `host`.
fn resolve_line(host: &str) -> String {
    match (host, 80).to_socket_addrs() {
        Ok(addrs) => {
            let ips: Vec<String> = addrs.map(|a| a.ip().to_string()).collect();
            if ips.is_empty() {
                format!("DNS FAIL: {} nemá žiadnu adresu", host)
            } else {
                format!("DNS OK: {} -> {}", host, ips.join(", "))
            }
        }
        Err(e) => format!("DNS FAIL: {} ({})", host, e),
    }
}

fn connect_line(addr: SocketAddr) -> String {
    match TcpStream::connect_timeout(&addr, Duration::from_millis(800)) {
        Ok(_) => format!("TCP OK: {}", addr),
        Err(e) => format!("TCP FAIL: {} ({})", addr, e),
    }
}

/// DNS lookup and TCP connects to public resolvers. Blocking.
pub fn network_diagnostics() -> DiagnosticReport {
    let mut details = vec![resolve_line(DIAGNOSTIC_HOST)];
    for addr in PUBLIC_RESOLVERS {
        details.push(connect_line(SocketAddr::from(addr)));
    }

    let mut report = DiagnosticReport {
        summary: String::new(),
        details,
    };
    let failures = report.failures();
    report.summary = if failures == 0 {
        "Sieť vyzerá v poriadku".into()
    } else {
        format!("Zistené problémy so sieťou: {} kontrol zlyhalo", failures)
    };
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
        assert_eq!(normalize_url("https://a.sk/x"), "https://a.sk/x");
    }

    #[test]
    fn test_failures_counted() {
        let report = DiagnosticReport {
            summary: String::new(),
            details: vec![
                "DNS OK: example.com -> []".into(),
                "TCP FAIL: 1.1.1.1:53 (timed out)".into(),
            ],
        };
        assert_eq!(report.failures(), 1);
    }

    #[test]
    fn test_resolve_line_for_localhost() {
        let line = resolve_line("localhost");
        assert!(line.starts_with("DNS OK: localhost -> "), "{}", line);
    }

    #[test]
    fn test_resolve_line_reports_bad_host() {
        let line = resolve_line("neexistuje.invalid");
        assert!(line.starts_with("DNS FAIL: neexistuje.invalid"), "{}", line);
    }
}
