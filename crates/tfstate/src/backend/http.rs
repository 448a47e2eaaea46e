//! Remote state over HTTP(S)

use super::Backend;
use crate::error::{Error, Result};

/// Maximum state document size (state files grow with every resource).
const MAX_STATE_SIZE: u64 = 256 * 1024 * 1024;

pub struct HttpBackend {
    agent: ureq::Agent,
    url: String,
}

impl HttpBackend {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Backend for HttpBackend {
    fn read(&self) -> Result<Vec<u8>> {
        log::debug!("fetching state from {}", self.url);

        let mut response = self
            .agent
            .get(&self.url)
            .header("Accept", "application/json")
            .header("User-Agent", "driftscan")
            .call()
            .map_err(|e| Error::http(&self.url, e))?;

        response
            .body_mut()
            .with_config()
            .limit(MAX_STATE_SIZE)
            .read_to_vec()
            .map_err(|e| Error::http(&self.url, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::net::TcpListener;

    #[test]
    fn test_unreachable_host() {
        // Reserve a free port, then release it so nothing listens there
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}/terraform.tfstate");

        let backend = HttpBackend::new(&url);
        assert_eq!(backend.url(), url);
        assert!(matches!(backend.read(), Err(Error::Http { status: None, .. })));
    }
}
