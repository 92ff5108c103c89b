//! Sequential harvesting driver.
//!
//! URLs are processed one at a time in input order. Each input page is
//! fetched once: if it lists collection children it is treated as a modpack
//! and every child is fetched and extracted in turn, otherwise identifiers
//! are extracted from the page itself. A fixed delay separates successive
//! requests. Per-URL failures are counted and logged, never propagated.

use crate::config::HarvestConfig;
use crate::error::Result;
use crate::extract::{self, ExtractionResult};
use crate::fetcher::{FetchResult, PageFetcher};
use crate::modpack;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{debug, info, warn};

/// Shared flag used to stop a run between (or during) requests.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once [`cancel`](Self::cancel) has been called.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Everything a run produced: the aggregate plus per-URL outcome counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestReport {
    /// All identifiers, in processing order.
    pub identifiers: ExtractionResult,
    /// Item pages whose description was parsed.
    pub processed: usize,
    /// Fetches that ended in an HTTP or network error.
    pub fetch_failures: usize,
    /// Item pages without a description block.
    pub missing_descriptions: usize,
    /// Input pages expanded as modpacks.
    pub modpacks_expanded: usize,
    /// Whether the run was stopped before every URL was handled.
    pub interrupted: bool,
}

/// Inserts the politeness delay before every request but the first.
#[derive(Debug)]
struct Throttle {
    delay: Duration,
    primed: bool,
}

impl Throttle {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            primed: false,
        }
    }

    async fn wait(&mut self) {
        if self.primed && !self.delay.is_zero() {
            debug!(delay_ms = self.delay.as_millis() as u64, "waiting before next request");
            tokio::time::sleep(self.delay).await;
        }
        self.primed = true;
    }
}

/// Drives fetch → (expand) → extract over a list of item references.
pub struct Harvester {
    config: HarvestConfig,
    fetcher: PageFetcher,
}

impl Harvester {
    pub fn new(config: HarvestConfig) -> Result<Self> {
        let fetcher = PageFetcher::new(&config)?;
        Ok(Self { config, fetcher })
    }

    /// Process `urls` in order and return the aggregate.
    ///
    /// Stops early, keeping what was collected so far, once `cancel` fires.
    pub async fn run(&self, urls: &[String], cancel: &CancellationFlag) -> HarvestReport {
        let mut report = HarvestReport::default();
        let mut throttle = Throttle::new(self.config.request_delay);

        'urls: for url in urls {
            let Some(fetched) = self.fetch_politely(url, &mut throttle, cancel).await else {
                report.interrupted = true;
                break;
            };
            let body = match fetched.into_body(url) {
                Ok(body) => body,
                Err(_) => {
                    report.fetch_failures += 1;
                    continue;
                }
            };

            let children = modpack::expand_document(&body, &self.config.item_url_base);
            if children.is_empty() {
                self.record(url, &body, &mut report);
                continue;
            }

            info!(%url, items = children.len(), "expanding modpack");
            report.modpacks_expanded += 1;

            for child in &children {
                let Some(fetched) = self.fetch_politely(child, &mut throttle, cancel).await else {
                    report.interrupted = true;
                    break 'urls;
                };
                match fetched.into_body(child) {
                    Ok(body) => self.record(child, &body, &mut report),
                    Err(_) => report.fetch_failures += 1,
                }
            }
        }

        if report.interrupted {
            warn!(processed = report.processed, "harvest interrupted");
        }
        report
    }

    /// Wait out the delay, then fetch. `None` means the run was cancelled.
    async fn fetch_politely(
        &self,
        url: &str,
        throttle: &mut Throttle,
        cancel: &CancellationFlag,
    ) -> Option<FetchResult> {
        if cancel.is_cancelled() {
            return None;
        }
        tokio::select! {
            _ = throttle.wait() => {}
            _ = cancel.cancelled() => return None,
        }
        tokio::select! {
            result = self.fetcher.fetch(url) => Some(result),
            _ = cancel.cancelled() => None,
        }
    }

    fn record(&self, url: &str, body: &str, report: &mut HarvestReport) {
        match extract::extract(body, url) {
            Ok(ids) => {
                report.identifiers.extend(ids);
                report.processed += 1;
                info!(%url, "processed URL");
            }
            Err(e) => {
                warn!(%url, error = %e, "skipping page");
                report.missing_descriptions += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cancelled_resolves_after_cancel() {
        let flag = CancellationFlag::new();
        let waiter = flag.clone();
        let handle = tokio::spawn(async move { waiter.cancelled().await });
        flag.cancel();
        handle.await.unwrap();
        assert!(flag.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_returns_immediately_when_already_set() {
        let flag = CancellationFlag::new();
        flag.cancel();
        flag.cancelled().await;
    }

    #[tokio::test]
    async fn test_run_with_cancelled_flag_is_interrupted() {
        let harvester = Harvester::new(HarvestConfig::default()).unwrap();
        let flag = CancellationFlag::new();
        flag.cancel();
        let urls = vec!["https://steamcommunity.com/sharedfiles/filedetails/?id=1".to_string()];
        let report = harvester.run(&urls, &flag).await;
        assert!(report.interrupted);
        assert_eq!(report.processed, 0);
        assert!(report.identifiers.is_empty());
    }

    #[tokio::test]
    async fn test_throttle_skips_first_wait() {
        let mut throttle = Throttle::new(Duration::from_secs(60));
        let started = std::time::Instant::now();
        throttle.wait().await;
        assert!(started.elapsed() < Duration::from_secs(1));
        assert!(throttle.primed);
    }

    #[test]
    fn test_report_serializes() {
        let report = HarvestReport {
            processed: 2,
            ..Default::default()
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["processed"], 2);
        assert_eq!(json["identifiers"]["mod_ids"], serde_json::json!([]));
    }
}
