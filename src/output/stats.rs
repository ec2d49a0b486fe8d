//! Crawl counters and the final statistics summary
//!
//! Counters are updated concurrently by fetch and write tasks, so every
//! increment goes through an atomic.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Live counters shared by every task in a crawl
#[derive(Debug, Default)]
pub struct CrawlCounters {
    pages_fetched: AtomicU64,
    fetches_failed: AtomicU64,
    files_written: AtomicU64,
    writes_failed: AtomicU64,
}

impl CrawlCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fetch(&self) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch_failure(&self) {
        self.fetches_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write(&self) {
        self.files_written.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write_failure(&self) {
        self.writes_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn pages_fetched(&self) -> u64 {
        self.pages_fetched.load(Ordering::Relaxed)
    }

    pub fn fetches_failed(&self) -> u64 {
        self.fetches_failed.load(Ordering::Relaxed)
    }

    pub fn files_written(&self) -> u64 {
        self.files_written.load(Ordering::Relaxed)
    }

    pub fn writes_failed(&self) -> u64 {
        self.writes_failed.load(Ordering::Relaxed)
    }
}

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Pages fetched successfully
    pub pages_fetched: u64,

    /// Fetch attempts that failed
    pub fetches_failed: u64,

    /// Pages written to disk
    pub files_written: u64,

    /// Pages fetched but not written
    pub writes_failed: u64,

    /// Number of depth levels whose fetches all completed
    pub levels_completed: u32,

    /// True if the crawl was stopped before exhausting its frontier
    pub interrupted: bool,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Wall-clock time for the whole crawl, including pending writes
    pub elapsed: Duration,
}

impl CrawlStatistics {
    /// Takes a final snapshot of the counters
    pub fn from_counters(
        counters: &CrawlCounters,
        levels_completed: u32,
        interrupted: bool,
        started_at: DateTime<Utc>,
        elapsed: Duration,
    ) -> Self {
        Self {
            pages_fetched: counters.pages_fetched(),
            fetches_failed: counters.fetches_failed(),
            files_written: counters.files_written(),
            writes_failed: counters.writes_failed(),
            levels_completed,
            interrupted,
            started_at,
            finished_at: Utc::now(),
            elapsed,
        }
    }

    /// Total fetch attempts, successful or not
    pub fn fetch_attempts(&self) -> u64 {
        self.pages_fetched + self.fetches_failed
    }

    /// Average wall-clock time per successful fetch
    ///
    /// Returns `None` when nothing was fetched.
    pub fn average_fetch_time(&self) -> Option<Duration> {
        if self.pages_fetched == 0 {
            return None;
        }
        let per_page = self.elapsed.as_secs_f64() / self.pages_fetched as f64;
        Some(Duration::from_secs_f64(per_page))
    }

    /// One-line summary of the crawl
    pub fn summary_line(&self) -> String {
        let average = match self.average_fetch_time() {
            Some(avg) => format!("{:.3}s per page", avg.as_secs_f64()),
            None => "n/a per page".to_string(),
        };

        format!(
            "Fetched {} pages. Failed to fetch {}. Wrote {} files. Failed to write {}. Took {}",
            self.pages_fetched, self.fetches_failed, self.files_written, self.writes_failed, average
        )
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    if stats.interrupted {
        println!("=== Crawl Statistics (interrupted) ===\n");
    } else {
        println!("=== Crawl Statistics ===\n");
    }

    println!("Run:");
    println!("  Started:  {}", stats.started_at.to_rfc3339());
    println!("  Finished: {}", stats.finished_at.to_rfc3339());
    println!("  Elapsed:  {:.2}s", stats.elapsed.as_secs_f64());
    println!("  Levels completed: {}", stats.levels_completed);
    println!();

    println!("Fetches:");
    println!("  Pages fetched: {}", stats.pages_fetched);
    println!("  Fetch failures: {}", stats.fetches_failed);
    println!();

    println!("Files:");
    println!("  Files written: {}", stats.files_written);
    println!("  Write failures: {}", stats.writes_failed);
    println!();

    let success_rate = if stats.fetch_attempts() > 0 {
        (stats.pages_fetched as f64 / stats.fetch_attempts() as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} fetches)",
        success_rate,
        stats.pages_fetched,
        stats.fetch_attempts()
    );
    println!("{}", stats.summary_line());
}
