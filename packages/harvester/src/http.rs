//! HTTP client wrapper for fetching guidance pages and documents.
//!
//! Every call is a single `GET`; there is no retry loop. Failures are returned
//! as [`Rejection`] values so that one bad link never aborts its siblings.

use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, USER_AGENT as USER_AGENT_HEADER};
use url::Url;

use crate::config::HarvestOptions;
use crate::error::Result;
use crate::types::Rejection;

/// User agent string identifying this harvester.
const USER_AGENT: &str = concat!("hta-harvester/", env!("CARGO_PKG_VERSION"));

/// A response captured in full, ready for validation.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Final URL after redirects.
    pub url: Url,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Create a configured HTTP client.
///
/// # Returns
/// A `reqwest::blocking::Client` with the configured timeout and the harvester user agent.
pub fn create_client(options: &HarvestOptions) -> Result<Client> {
    let client = Client::builder()
        .timeout(options.timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Issue a `GET` and capture status, content type and body.
///
/// # Arguments
/// * `client` - HTTP client to use
/// * `url` - URL to fetch
/// * `user_agent` - Optional override of the client's user agent
/// * `max_size` - Bodies larger than this many bytes are rejected
pub fn fetch(
    client: &Client,
    url: &Url,
    user_agent: Option<&str>,
    max_size: u64,
) -> std::result::Result<HttpResponse, Rejection> {
    let mut request = client.get(url.as_str());
    if let Some(agent) = user_agent {
        request = request.header(USER_AGENT_HEADER, agent);
    }

    let response = request
        .send()
        .map_err(|e| Rejection::Network(e.to_string()))?;

    if let Some(size) = response.content_length() {
        if size > max_size {
            return Err(Rejection::TooLarge {
                size,
                limit: max_size,
            });
        }
    }

    let final_url = response.url().clone();
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = response
        .bytes()
        .map_err(|e| Rejection::Network(e.to_string()))?;

    let size = body.len() as u64;
    if size > max_size {
        return Err(Rejection::TooLarge {
            size,
            limit: max_size,
        });
    }

    tracing::debug!(url = %final_url, status, size, "Fetched");

    Ok(HttpResponse {
        url: final_url,
        status,
        content_type,
        body: body.to_vec(),
    })
}

/// Fetch an HTML page and decode it as text.
///
/// Invalid UTF-8 sequences are replaced rather than failing the page.
pub fn fetch_page(
    client: &Client,
    url: &Url,
    user_agent: Option<&str>,
    max_size: u64,
) -> std::result::Result<String, Rejection> {
    let response = fetch(client, url, user_agent, max_size)?;
    if !(200..300).contains(&response.status) {
        return Err(Rejection::Status(response.status));
    }
    Ok(bytes_to_string(&response.body, url.as_str()))
}

/// Convert bytes to a string, logging when lossy conversion was needed.
pub fn bytes_to_string(bytes: &[u8], context: &str) -> String {
    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => s,
        Err(_) => {
            tracing::warn!(context, "Response is not valid UTF-8, replacing invalid sequences");
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client() {
        let client = create_client(&HarvestOptions::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_bytes_to_string_lossy() {
        assert_eq!(bytes_to_string(b"<html>", "test"), "<html>");
        let lossy = bytes_to_string(&[b'a', 0xff, b'b'], "test");
        assert!(lossy.starts_with('a'));
        assert!(lossy.ends_with('b'));
    }
}
