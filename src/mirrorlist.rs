use crate::error::{MirrorError, Result};
use crate::http::parse_http_url;
use crate::traits::{Response, Transport};
use crate::types::Mirror;
use std::collections::BTreeSet;

/// Fetch and decode the remote mirror list. Anything but a 200 is an error.
/// The body must be a JSON array; entries that do not decode as a mirror are
/// skipped with a warning so one bad record does not hide the rest.
pub async fn fetch_mirrorlist<T>(transport: &T, url: &str) -> Result<Vec<Mirror>>
where
    T: Transport + ?Sized,
{
    let url = parse_http_url(url)?;
    let response = transport.get(&url).await?;
    if response.status() != 200 {
        return Err(MirrorError::MirrorListStatus(response.status()));
    }

    let body = response.bytes().await?;
    let records: Vec<serde_json::Value> = serde_json::from_slice(&body)?;
    let mirrors: Vec<Mirror> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Mirror>(record) {
            Ok(mirror) => Some(mirror),
            Err(e) => {
                tracing::warn!(index, "skipping malformed mirror record: {}", e);
                None
            }
        })
        .collect();
    tracing::info!(url = %url, count = mirrors.len(), "fetched mirror list");
    Ok(mirrors)
}

pub fn enabled_only(mirrors: Vec<Mirror>) -> Vec<Mirror> {
    mirrors.into_iter().filter(|m| m.enabled).collect()
}

/// Distinct regions, sorted ascending
pub fn available_regions(mirrors: &[Mirror]) -> Vec<String> {
    mirrors
        .iter()
        .map(|m| m.region.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Split a `-r` value such as `"AS,EU"` into region codes.
/// Surrounding spaces and commas are ignored, as are empty items.
pub fn parse_regions(raw: &str) -> Vec<String> {
    raw.trim_matches(|c| c == ' ' || c == ',')
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

/// Restrict `mirrors` to the requested regions and tier.
/// Every requested region must exist in `mirrors`, otherwise the whole call fails.
pub fn apply_filters(mirrors: Vec<Mirror>, regions: &[String], tier: Option<u8>) -> Result<Vec<Mirror>> {
    if !regions.is_empty() {
        let available = available_regions(&mirrors);
        if let Some(bad) = regions.iter().find(|r| !available.contains(r)) {
            return Err(MirrorError::UnknownRegion(bad.clone()));
        }
    }

    Ok(mirrors
        .into_iter()
        .filter(|m| regions.is_empty() || regions.contains(&m.region))
        .filter(|m| tier.map_or(true, |t| m.tier == t))
        .collect())
}
