use thiserror::Error;

#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Invalid url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid url {0}: only http and https are supported")]
    UnsupportedScheme(String),

    #[error("Redirect from {0} has no Location header")]
    MissingLocation(String),

    #[error("Unable to fetch mirror list. failed with status code {0}")]
    MirrorListStatus(u16),

    #[error("Region '{0}' not supported")]
    UnknownRegion(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MirrorError>;

/// A failed fetch, tagged with the URL that was being requested at the time.
/// After a redirect this differs from the URL the fetch started with.
#[derive(Error, Debug)]
#[error("{url}: {source}")]
pub struct FetchError {
    pub url: String,
    #[source]
    pub source: MirrorError,
}

impl FetchError {
    pub fn new(url: &str, source: MirrorError) -> Self {
        Self {
            url: url.to_string(),
            source,
        }
    }

    /// Host part of `url`, or the raw string when it does not parse
    pub fn host(&self) -> String {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| self.url.clone())
    }
}

impl From<FetchError> for MirrorError {
    fn from(err: FetchError) -> Self {
        err.source
    }
}
