use anyhow::{Context, Result};
use reqwest::StatusCode;
use tracing::{debug, error};

/// HTTP status probe against `https://<host>`.
///
/// Each call opens its own client, so no connection pool is shared between
/// workers.
#[derive(Debug, Clone, Copy)]
pub struct HttpCheck {
    expected_status: u16,
}

impl HttpCheck {
    pub fn new(expected_status: u16) -> Self {
        Self { expected_status }
    }

    pub fn url(host: &str) -> String {
        format!("https://{host}")
    }

    pub fn probe(&self, host: &str) -> Result<StatusCode> {
        let url = Self::url(host);
        let response = reqwest::blocking::get(&url).with_context(|| format!("GET {url} failed"))?;
        Ok(response.status())
    }

    pub async fn probe_async(&self, host: &str) -> Result<StatusCode> {
        let url = Self::url(host);
        let client = reqwest::Client::new();
        let response = client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?;
        Ok(response.status())
    }

    pub fn check(&self, host: &str) {
        match self.probe(host) {
            Ok(status) => self.report(host, status),
            Err(err) => error!("{host}: website check error ({err:#})"),
        }
    }

    pub async fn check_async(&self, host: &str) {
        match self.probe_async(host).await {
            Ok(status) => self.report(host, status),
            Err(err) => error!("{host}: website check error ({err:#})"),
        }
    }

    pub fn is_healthy(&self, status: StatusCode) -> bool {
        status.as_u16() == self.expected_status
    }

    fn report(&self, host: &str, status: StatusCode) {
        if self.is_healthy(status) {
            debug!("{host}: website status healthy");
        } else {
            debug!("{host}: website status unhealthy ({})", status.as_u16());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_uses_https() {
        assert_eq!(HttpCheck::url("github.com"), "https://github.com");
    }

    #[test]
    fn test_only_expected_status_is_healthy() {
        let check = HttpCheck::new(200);
        assert!(check.is_healthy(StatusCode::OK));
        assert!(!check.is_healthy(StatusCode::MOVED_PERMANENTLY));
        assert!(!check.is_healthy(StatusCode::SERVICE_UNAVAILABLE));
    }

    #[test]
    fn test_malformed_host_is_absorbed() {
        let check = HttpCheck::new(200);
        assert!(check.probe("not a host").is_err());
        check.check("not a host");
    }
}
