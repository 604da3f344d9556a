//! Plain-text tables printed to stdout.

use crate::types::Mirror;
use crate::utils::{format_speed, truncate_chars};

const URL_WIDTH: usize = 50;

pub fn render_regions(regions: &[String]) -> String {
    if regions.is_empty() {
        return "No regions available.".to_string();
    }

    let mut out = String::from("Available Regions:");
    for region in regions {
        out.push_str(&format!("\n - {}", region));
    }
    out
}

pub fn render_mirrors(mirrors: &[Mirror]) -> String {
    if mirrors.is_empty() {
        return "No mirrors available.".to_string();
    }

    let mut lines = vec![format!(
        "{:^50}    {:<4}    {:<6}    {:<8}",
        "repo", "tier", "region", "location"
    )];
    for m in mirrors {
        lines.push(format!(
            "{:>50}    {:<4}    {:<6}    {}",
            truncate_chars(&m.base_url, URL_WIDTH),
            m.tier,
            m.region,
            m.location
        ));
    }
    lines.join("\n")
}

/// Ranked benchmark table. Mirrors without a speed are skipped.
pub fn render_results(ranked: &[Mirror]) -> String {
    let rows: Vec<(&Mirror, f64)> = ranked
        .iter()
        .filter_map(|m| m.speed.map(|s| (m, s)))
        .collect();
    if rows.is_empty() {
        return "No working mirrors available".to_string();
    }

    let mut lines = vec![format!(
        "{:^50}    {:<4}    {:<6}    {:<28}    speed",
        "repo", "tier", "region", "location"
    )];
    for (m, speed) in rows {
        lines.push(format!(
            "{:>50}    {:<4}    {:<6}    {:<28}    {}",
            truncate_chars(&m.base_url, URL_WIDTH),
            m.tier,
            m.region,
            m.location,
            format_speed(speed)
        ));
    }
    lines.join("\n")
}
