use crate::config::Config;
use crate::error::FetchError;
use crate::http::fetch_with_redirects;
use crate::traits::Transport;
use crate::types::{FetchOutcome, Mirror};
use indicatif::{ProgressBar, ProgressStyle};
use std::cmp::Ordering;

/// Progress line rewritten after every probe: "Progress:   3/42 "
pub fn progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::with_template("Progress: {pos:>3}/{len:<3}") {
        pb.set_style(style);
    }
    pb
}

/// Download the reference package from one mirror
pub async fn probe_mirror<T>(transport: &T, mirror: &Mirror, config: &Config) -> Result<FetchOutcome, FetchError>
where
    T: Transport + ?Sized,
{
    let url = mirror.package_url(&config.package_path());
    fetch_with_redirects(transport, &url, config.max_redirects).await
}

/// Benchmark every mirror one after another.
///
/// Logic:
/// 1. Probe each mirror in order; a failed probe only affects that mirror
/// 2. Store the throughput of successful probes in `Mirror::speed`
/// 3. Drop mirrors without a speed and sort the rest, fastest first
pub async fn benchmark_mirrors<T>(
    transport: &T,
    mut mirrors: Vec<Mirror>,
    config: &Config,
    pb: &ProgressBar,
) -> Vec<Mirror>
where
    T: Transport + ?Sized,
{
    for mirror in mirrors.iter_mut() {
        mirror.speed = match probe_mirror(transport, mirror, config).await {
            Ok(outcome) if outcome.is_success() => {
                tracing::debug!(
                    mirror = %mirror.base_url,
                    bytes = outcome.bytes,
                    elapsed_ms = outcome.elapsed.as_millis() as u64,
                    requests = outcome.requests,
                    "probe finished"
                );
                Some(outcome.speed())
            }
            Ok(outcome) => {
                let host = outcome.final_url.host_str().unwrap_or("?").to_string();
                pb.suspend(|| {
                    tracing::warn!("{}: failed with status code {}", host, outcome.status)
                });
                None
            }
            Err(e) => {
                // Name the host that failed, which may be a redirect target
                pb.suspend(|| tracing::warn!("{}: failed utterly: {}", e.host(), e.source));
                None
            }
        };
        pb.inc(1);
    }
    pb.finish();

    rank(mirrors)
}

/// Keep measured mirrors only, fastest first
pub fn rank(mirrors: Vec<Mirror>) -> Vec<Mirror> {
    let mut ranked: Vec<Mirror> = mirrors.into_iter().filter(|m| m.speed.is_some()).collect();
    ranked.sort_by(|a, b| match (a.speed, b.speed) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        _ => Ordering::Equal,
    });
    ranked
}
