use crate::error::{FetchError, MirrorError, Result};
use crate::traits::{Response, Transport};
use crate::types::FetchOutcome;
use async_trait::async_trait;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::Client;
use std::time::{Duration, Instant};
use url::Url;

const REDIRECT_CODES: [u16; 5] = [301, 302, 303, 307, 308];

pub fn is_redirect(status: u16) -> bool {
    REDIRECT_CODES.contains(&status)
}

/// Parse `raw` and reject anything that is not http(s)
pub fn parse_http_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|source| MirrorError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    check_scheme(url)
}

fn check_scheme(url: Url) -> Result<Url> {
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(MirrorError::UnsupportedScheme(url.to_string())),
    }
}

/// Resolve a `Location` header against the URL that produced it.
/// Absolute locations replace the URL, relative ones are joined.
fn resolve_location(current: &Url, location: &str) -> Result<Url> {
    let next = current
        .join(location)
        .map_err(|source| MirrorError::InvalidUrl {
            url: location.to_string(),
            source,
        })?;
    check_scheme(next)
}

/// GET `url`, following redirects by hand.
///
/// At most `max_requests` requests are sent. When the bound is hit while the
/// server is still redirecting, the last redirect is returned as the final
/// status. The timer stops once the final headers arrive; the body is read
/// afterwards only to count bytes. Errors carry the URL being requested when
/// they happened, which is not the starting URL after a redirect.
pub async fn fetch_with_redirects<T>(
    transport: &T,
    url: &str,
    max_requests: u32,
) -> std::result::Result<FetchOutcome, FetchError>
where
    T: Transport + ?Sized,
{
    let max_requests = max_requests.max(1);
    let mut current = parse_http_url(url).map_err(|e| FetchError::new(url, e))?;
    let mut requests = 0;

    let start = Instant::now();
    let response = loop {
        let response = transport
            .get(&current)
            .await
            .map_err(|e| FetchError::new(current.as_str(), e))?;
        requests += 1;

        if !is_redirect(response.status()) || requests >= max_requests {
            break response;
        }

        let next = match response.location() {
            Some(location) => resolve_location(&current, &location),
            None => Err(MirrorError::MissingLocation(current.to_string())),
        }
        .map_err(|e| FetchError::new(current.as_str(), e))?;
        tracing::debug!(from = %current, to = %next, status = response.status(), "following redirect");
        current = next;
    };
    let elapsed = start.elapsed();

    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| FetchError::new(current.as_str(), e))?;

    Ok(FetchOutcome {
        final_url: current,
        status,
        requests,
        elapsed,
        bytes: body.len() as u64,
    })
}

/// Transport backed by a shared reqwest client with automatic redirects disabled
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// `timeout` bounds connecting and each idle gap while reading, not the
    /// whole transfer, so a slow mirror that keeps sending is still measured.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .redirect(Policy::none())
            .user_agent(concat!("xrankmirror/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    type Response = reqwest::Response;

    async fn get(&self, url: &Url) -> Result<reqwest::Response> {
        Ok(self.client.get(url.clone()).send().await?)
    }
}

#[async_trait]
impl Response for reqwest::Response {
    fn status(&self) -> u16 {
        reqwest::Response::status(self).as_u16()
    }

    fn location(&self) -> Option<String> {
        self.headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    async fn bytes(self) -> Result<Vec<u8>> {
        Ok(reqwest::Response::bytes(self).await?.to_vec())
    }
}

/// Scripted in-memory transport for unit tests
#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Clone)]
    pub enum Reply {
        Body(u16, Vec<u8>),
        Redirect(u16, Option<String>),
        ConnectionRefused,
    }

    pub struct FakeResponse {
        status: u16,
        location: Option<String>,
        body: Vec<u8>,
    }

    #[async_trait]
    impl Response for FakeResponse {
        fn status(&self) -> u16 {
            self.status
        }

        fn location(&self) -> Option<String> {
            self.location.clone()
        }

        async fn bytes(self) -> Result<Vec<u8>> {
            Ok(self.body)
        }
    }

    /// Unknown URLs answer 404
    #[derive(Default)]
    pub struct FakeTransport {
        routes: HashMap<String, Reply>,
        hits: Mutex<Vec<String>>,
    }

    impl FakeTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn route(mut self, url: &str, reply: Reply) -> Self {
            self.routes.insert(url.to_string(), reply);
            self
        }

        pub fn hits(&self) -> Vec<String> {
            self.hits.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        type Response = FakeResponse;

        async fn get(&self, url: &Url) -> Result<FakeResponse> {
            self.hits.lock().unwrap().push(url.to_string());
            let reply = self
                .routes
                .get(url.as_str())
                .cloned()
                .unwrap_or(Reply::Body(404, Vec::new()));

            match reply {
                Reply::Body(status, body) => Ok(FakeResponse {
                    status,
                    location: None,
                    body,
                }),
                Reply::Redirect(status, location) => Ok(FakeResponse {
                    status,
                    location,
                    body: b"moved".to_vec(),
                }),
                Reply::ConnectionRefused => Err(MirrorError::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "connection refused",
                ))),
            }
        }
    }
}
