// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for the paper pipeline
// reference: uses indicatif for progress bars and tracks processing metrics

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    pub records_kept: usize,
    pub files_empty: usize,
    pub files_failed: usize,
    pub total_chars: u64,
    pub duration_secs: u64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files_seen(&self) -> usize {
        self.records_kept + self.files_empty + self.files_failed
    }

    pub fn files_per_second(&self) -> f64 {
        if self.duration_secs == 0 {
            return 0.0;
        }
        self.files_seen() as f64 / self.duration_secs as f64
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.files_seen();
        if total == 0 {
            return 0.0;
        }
        (self.records_kept as f64 / total as f64) * 100.0
    }
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    records_kept: AtomicUsize,
    files_empty: AtomicUsize,
    files_failed: AtomicUsize,
    total_chars: AtomicU64,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new(total_files: usize) -> Self {
        let multi_progress = MultiProgress::new();

        let main_bar = create_progress_bar(&multi_progress, total_files as u64);
        let detail_bar = create_detail_bar(&multi_progress);

        Self {
            main_bar,
            detail_bar,
            records_kept: AtomicUsize::new(0),
            files_empty: AtomicUsize::new(0),
            files_failed: AtomicUsize::new(0),
            total_chars: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_kept(&self, chars: usize) {
        self.records_kept.fetch_add(1, Ordering::SeqCst);
        self.total_chars.fetch_add(chars as u64, Ordering::SeqCst);
        self.advance();
    }

    pub fn inc_files_empty(&self) {
        self.files_empty.fetch_add(1, Ordering::SeqCst);
        self.advance();
    }

    pub fn inc_files_failed(&self) {
        self.files_failed.fetch_add(1, Ordering::SeqCst);
        self.advance();
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Processing complete");
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> PipelineStats {
        PipelineStats {
            records_kept: self.records_kept.load(Ordering::SeqCst),
            files_empty: self.files_empty.load(Ordering::SeqCst),
            files_failed: self.files_failed.load(Ordering::SeqCst),
            total_chars: self.total_chars.load(Ordering::SeqCst),
            duration_secs: self.start_time.elapsed().as_secs(),
        }
    }

    fn advance(&self) {
        self.main_bar.inc(1);

        let message = format!(
            "Kept: {} | Empty: {} | Failed: {}",
            self.records_kept.load(Ordering::SeqCst),
            self.files_empty.load(Ordering::SeqCst),
            self.files_failed.load(Ordering::SeqCst)
        );
        self.detail_bar.set_message(message);
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .map(|style| style.progress_chars("█▓▒░"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    let style = ProgressStyle::default_bar()
        .template("{msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_stats_calculations() {
        let mut stats = PipelineStats::new();
        stats.records_kept = 90;
        stats.files_empty = 5;
        stats.files_failed = 5;
        stats.duration_secs = 10;

        assert_eq!(stats.files_seen(), 100);
        assert_eq!(stats.files_per_second(), 10.0);
        assert!((stats.success_rate() - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_pipeline_stats_zero_duration() {
        let stats = PipelineStats::new();
        assert_eq!(stats.files_per_second(), 0.0);
        assert_eq!(stats.success_rate(), 0.0);
    }

    #[test]
    fn test_progress_tracker_counts() {
        let tracker = ProgressTracker::new(4);

        tracker.record_kept(1024);
        tracker.inc_files_empty();
        tracker.inc_files_failed();
        tracker.inc_files_failed();

        let stats = tracker.get_stats();
        assert_eq!(stats.records_kept, 1);
        assert_eq!(stats.files_empty, 1);
        assert_eq!(stats.files_failed, 2);
        assert_eq!(stats.total_chars, 1024);
    }
}
