//! Metrics collection module
//!
//! Counts listing runs and, for each of the two document sources, requests,
//! outcomes and a rolling window of response times.

use crate::results::Source;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Response times kept per source
const RESPONSE_TIME_WINDOW: usize = 100;

#[derive(Default)]
struct SourceCounters {
    requests: AtomicU64,
    successes: AtomicU64,
    errors: AtomicU64,
    /// Most recent response times (ms), oldest first
    response_times: Mutex<VecDeque<u64>>,
}

impl SourceCounters {
    fn avg_response_time(&self) -> Option<u64> {
        let times = self.response_times.lock().unwrap();
        if times.is_empty() {
            return None;
        }
        Some(times.iter().sum::<u64>() / times.len() as u64)
    }

    fn reliability(&self) -> f64 {
        let successes = self.successes.load(Ordering::Relaxed);
        let attempts = successes + self.errors.load(Ordering::Relaxed);
        if attempts == 0 {
            return 100.0;
        }
        successes as f64 * 100.0 / attempts as f64
    }
}

/// Process-wide metrics collector
#[derive(Default)]
pub struct Metrics {
    total_listings: AtomicU64,
    search: SourceCounters,
    drafts: SourceCounters,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    fn counters(&self, source: Source) -> &SourceCounters {
        match source {
            Source::Search => &self.search,
            Source::Drafts => &self.drafts,
        }
    }

    pub fn inc_listing(&self) {
        self.total_listings.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_request(&self, source: Source) {
        self.counters(source).requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self, source: Source) {
        self.counters(source).errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful call and how long it took
    pub fn record_success(&self, source: Source, time_ms: u64) {
        let counters = self.counters(source);
        counters.successes.fetch_add(1, Ordering::Relaxed);

        let mut times = counters.response_times.lock().unwrap();
        if times.len() == RESPONSE_TIME_WINDOW {
            times.pop_front();
        }
        times.push_back(time_ms);
    }

    pub fn get_total_listings(&self) -> u64 {
        self.total_listings.load(Ordering::Relaxed)
    }

    /// Mean of the recent successful response times
    pub fn get_avg_response_time(&self, source: Source) -> Option<u64> {
        self.counters(source).avg_response_time()
    }

    /// Share of finished calls that succeeded, in percent
    pub fn get_reliability(&self, source: Source) -> f64 {
        self.counters(source).reliability()
    }

    /// Snapshot of both sources
    pub fn get_source_stats(&self) -> Vec<SourceStats> {
        [Source::Search, Source::Drafts]
            .into_iter()
            .map(|source| {
                let counters = self.counters(source);
                SourceStats {
                    source,
                    requests: counters.requests.load(Ordering::Relaxed),
                    successes: counters.successes.load(Ordering::Relaxed),
                    errors: counters.errors.load(Ordering::Relaxed),
                    avg_response_time: counters.avg_response_time(),
                    reliability: counters.reliability(),
                }
            })
            .collect()
    }
}

/// Statistics for a single source
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceStats {
    pub source: Source,
    pub requests: u64,
    pub successes: u64,
    pub errors: u64,
    pub avg_response_time: Option<u64>,
    pub reliability: f64,
}
