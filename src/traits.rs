use crate::error::Result;
use async_trait::async_trait;
use url::Url;

/// Transport: the only network capability the rest of the crate relies on.
///
/// A transport issues exactly one GET per call and must NOT follow redirects
/// on its own; redirect handling lives in `http::fetch_with_redirects`.
#[async_trait]
pub trait Transport: Sync + Send {
    type Response: Response;

    /// Send a GET and return as soon as the response headers are available
    async fn get(&self, url: &Url) -> Result<Self::Response>;
}

/// A response whose headers have arrived but whose body may still be on the wire
#[async_trait]
pub trait Response: Send {
    fn status(&self) -> u16;

    /// Raw `Location` header, if present and valid UTF-8
    fn location(&self) -> Option<String>;

    /// Read the remaining body to the end
    async fn bytes(self) -> Result<Vec<u8>>;
}
