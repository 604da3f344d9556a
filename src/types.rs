use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// One entry of the remote mirror list
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Mirror {
    pub base_url: String, // e.g. "https://repo-de.voidlinux.org/"
    pub region: String,   // e.g. "EU"
    pub location: String, // e.g. "Frankfurt, Germany"
    pub tier: u8,
    pub enabled: bool,
    /// Bytes per second, filled in by the benchmark. `None` until measured or on failure.
    #[serde(default)]
    pub speed: Option<f64>,
}

impl Mirror {
    #[cfg(test)]
    pub fn new(base_url: &str, region: &str, location: &str, tier: u8) -> Self {
        Self {
            base_url: base_url.to_string(),
            region: region.to_string(),
            location: location.to_string(),
            tier,
            enabled: true,
            speed: None,
        }
    }

    /// Base URL without trailing slashes, joined with `path`.
    pub fn package_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// What a single instrumented fetch observed
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub final_url: Url,
    pub status: u16,
    pub requests: u32,
    /// Time until the headers of the final response arrived
    pub elapsed: Duration,
    pub bytes: u64,
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    /// Throughput in bytes per second
    pub fn speed(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64().max(f64::EPSILON);
        self.bytes as f64 / secs
    }
}
