//! In-process analysis metrics, exposed in Prometheus text format on `/metrics`.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

/// Prometheus client default buckets, in seconds.
const DURATION_BUCKETS: [f64; 14] = [
    0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

#[derive(Debug, Default, Clone)]
struct Histogram {
    bucket_counts: [u64; DURATION_BUCKETS.len()],
    count: u64,
    sum: f64,
}

impl Histogram {
    fn observe(&mut self, value: f64) {
        for (bound, slot) in DURATION_BUCKETS.iter().zip(self.bucket_counts.iter_mut()) {
            if value <= *bound {
                *slot += 1;
            }
        }
        self.count += 1;
        self.sum += value;
    }
}

#[derive(Debug, Default)]
struct Aggregates {
    /// Index 0: ai_enhanced=false, 1: ai_enhanced=true
    durations: [Histogram; 2],
    score_sum: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatsSnapshot {
    pub total_analyses: u64,
    pub average_match_score: f64,
    pub average_processing_time: f64,
    pub uptime_seconds: f64,
}

pub struct MetricsCollector {
    success_count: AtomicU64,
    error_count: AtomicU64,
    /// f64 bits of the most recent match score
    last_match_score: AtomicU64,
    /// f64 bits of host CPU / memory utilisation, refreshed by the system sampler
    system_cpu_usage: AtomicU64,
    system_memory_usage: AtomicU64,
    aggregates: Mutex<Aggregates>,
    started_at: Instant,
}

impl MetricsCollector {
    #[must_use]
    pub fn new() -> Self {
        Self {
            success_count: AtomicU64::new(0),
            error_count: AtomicU64::new(0),
            last_match_score: AtomicU64::new(0f64.to_bits()),
            system_cpu_usage: AtomicU64::new(0f64.to_bits()),
            system_memory_usage: AtomicU64::new(0f64.to_bits()),
            aggregates: Mutex::new(Aggregates::default()),
            started_at: Instant::now(),
        }
    }

    pub fn record_analysis(
        &self,
        match_percentage: f64,
        processing_secs: f64,
        cv_length: usize,
        job_length: usize,
        ai_enhanced: bool,
    ) {
        self.last_match_score
            .store(match_percentage.to_bits(), Ordering::Relaxed);

        {
            // Count and sums move together so `stats()` never divides a sum by a stale count.
            let mut agg = self.lock_aggregates();
            self.success_count.fetch_add(1, Ordering::Relaxed);
            agg.durations[usize::from(ai_enhanced)].observe(processing_secs);
            agg.score_sum += match_percentage;
        }

        info!(
            cv_length,
            job_length,
            ai_enhanced,
            "Recorded metrics: score={match_percentage:.1}%, time={processing_secs:.2}s"
        );
    }

    pub fn record_error(&self, error_type: &str) {
        self.error_count.fetch_add(1, Ordering::Relaxed);
        warn!("Recorded error metric: {error_type}");
    }

    /// Stores the latest host utilisation sample, both in percent.
    pub fn set_system_usage(&self, cpu_percent: f64, memory_percent: f64) {
        self.system_cpu_usage
            .store(cpu_percent.to_bits(), Ordering::Relaxed);
        self.system_memory_usage
            .store(memory_percent.to_bits(), Ordering::Relaxed);
    }

    pub fn stats(&self) -> StatsSnapshot {
        let agg = self.lock_aggregates();
        let total = self.success_count.load(Ordering::Relaxed);
        let duration_sum: f64 = agg.durations.iter().map(|h| h.sum).sum();

        let (average_match_score, average_processing_time) = if total > 0 {
            (agg.score_sum / total as f64, duration_sum / total as f64)
        } else {
            (0.0, 0.0)
        };

        StatsSnapshot {
            total_analyses: total,
            average_match_score,
            average_processing_time,
            uptime_seconds: self.started_at.elapsed().as_secs_f64(),
        }
    }

    pub fn render_prometheus(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "# HELP cv_analysis_total Total number of CV analyses performed");
        let _ = writeln!(out, "# TYPE cv_analysis_total counter");
        let _ = writeln!(
            out,
            "cv_analysis_total{{status=\"success\"}} {}",
            self.success_count.load(Ordering::Relaxed)
        );
        let _ = writeln!(
            out,
            "cv_analysis_total{{status=\"error\"}} {}",
            self.error_count.load(Ordering::Relaxed)
        );

        let _ = writeln!(
            out,
            "# HELP cv_analysis_duration_seconds Time spent analyzing CV-Job matches"
        );
        let _ = writeln!(out, "# TYPE cv_analysis_duration_seconds histogram");
        {
            let agg = self.lock_aggregates();
            for (label, hist) in ["false", "true"].iter().zip(agg.durations.iter()) {
                for (bound, count) in DURATION_BUCKETS.iter().zip(hist.bucket_counts.iter()) {
                    let _ = writeln!(
                        out,
                        "cv_analysis_duration_seconds_bucket{{ai_enhanced=\"{label}\",le=\"{bound}\"}} {count}"
                    );
                }
                let _ = writeln!(
                    out,
                    "cv_analysis_duration_seconds_bucket{{ai_enhanced=\"{label}\",le=\"+Inf\"}} {}",
                    hist.count
                );
                let _ = writeln!(
                    out,
                    "cv_analysis_duration_seconds_sum{{ai_enhanced=\"{label}\"}} {}",
                    hist.sum
                );
                let _ = writeln!(
                    out,
                    "cv_analysis_duration_seconds_count{{ai_enhanced=\"{label}\"}} {}",
                    hist.count
                );
            }
        }

        let _ = writeln!(out, "# HELP cv_match_score Current match score percentage");
        let _ = writeln!(out, "# TYPE cv_match_score gauge");
        let _ = writeln!(
            out,
            "cv_match_score {}",
            f64::from_bits(self.last_match_score.load(Ordering::Relaxed))
        );

        let _ = writeln!(out, "# HELP system_cpu_usage_percent System CPU usage percentage");
        let _ = writeln!(out, "# TYPE system_cpu_usage_percent gauge");
        let _ = writeln!(
            out,
            "system_cpu_usage_percent {}",
            f64::from_bits(self.system_cpu_usage.load(Ordering::Relaxed))
        );

        let _ = writeln!(out, "# HELP system_memory_usage_percent System memory usage percentage");
        let _ = writeln!(out, "# TYPE system_memory_usage_percent gauge");
        let _ = writeln!(
            out,
            "system_memory_usage_percent {}",
            f64::from_bits(self.system_memory_usage.load(Ordering::Relaxed))
        );

        out
    }

    fn lock_aggregates(&self) -> std::sync::MutexGuard<'_, Aggregates> {
        self.aggregates
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_collector_renders_zeroes() {
        let text = MetricsCollector::new().render_prometheus();
        assert!(text.contains("cv_analysis_total{status=\"success\"} 0"));
        assert!(text.contains("cv_analysis_total{status=\"error\"} 0"));
        assert!(text.contains("cv_match_score 0"));
        assert!(text.contains("system_cpu_usage_percent 0\n"));
        assert!(text.contains("system_memory_usage_percent 0\n"));
    }

    #[test]
    fn test_system_usage_gauges_render_latest_sample() {
        let metrics = MetricsCollector::new();
        metrics.set_system_usage(12.5, 40.0);
        metrics.set_system_usage(37.25, 61.5);

        let text = metrics.render_prometheus();
        assert!(text.contains("# TYPE system_cpu_usage_percent gauge"));
        assert!(text.contains("system_cpu_usage_percent 37.25\n"));
        assert!(text.contains("# TYPE system_memory_usage_percent gauge"));
        assert!(text.contains("system_memory_usage_percent 61.5\n"));
    }

    #[test]
    fn test_record_analysis_updates_counters_histogram_and_gauge() {
        let metrics = MetricsCollector::new();
        metrics.record_analysis(75.5, 0.2, 500, 300, false);

        let text = metrics.render_prometheus();
        assert!(text.contains("cv_analysis_total{status=\"success\"} 1"));
        assert!(text.contains("cv_match_score 75.5"));
        assert!(text.contains("cv_analysis_duration_seconds_bucket{ai_enhanced=\"false\",le=\"0.1\"} 0"));
        assert!(text.contains("cv_analysis_duration_seconds_bucket{ai_enhanced=\"false\",le=\"0.25\"} 1"));
        assert!(text.contains("cv_analysis_duration_seconds_bucket{ai_enhanced=\"false\",le=\"+Inf\"} 1"));
        assert!(text.contains("cv_analysis_duration_seconds_count{ai_enhanced=\"true\"} 0"));
    }

    #[test]
    fn test_record_error_increments_error_counter() {
        let metrics = MetricsCollector::new();
        metrics.record_error("analysis_failed");
        metrics.record_error("analysis_failed");
        assert!(metrics
            .render_prometheus()
            .contains("cv_analysis_total{status=\"error\"} 2"));
        assert_eq!(metrics.stats().total_analyses, 0);
    }

    #[test]
    fn test_stats_averages() {
        let metrics = MetricsCollector::new();
        metrics.record_analysis(80.0, 1.0, 10, 10, false);
        metrics.record_analysis(60.0, 3.0, 10, 10, true);

        let stats = metrics.stats();
        assert_eq!(stats.total_analyses, 2);
        assert!((stats.average_match_score - 70.0).abs() < 1e-9);
        assert!((stats.average_processing_time - 2.0).abs() < 1e-9);
        assert!(stats.uptime_seconds >= 0.0);
    }

    #[test]
    fn test_stats_average_consistent_under_concurrent_writes() {
        let metrics = MetricsCollector::new();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..500 {
                        metrics.record_analysis(50.0, 0.1, 10, 10, false);
                    }
                });
            }
            scope.spawn(|| {
                for _ in 0..2000 {
                    let stats = metrics.stats();
                    assert!(
                        stats.average_match_score == 0.0 || stats.average_match_score == 50.0,
                        "average drifted to {}",
                        stats.average_match_score
                    );
                }
            });
        });

        let stats = metrics.stats();
        assert_eq!(stats.total_analyses, 2000);
        assert_eq!(stats.average_match_score, 50.0);
    }

    #[test]
    fn test_stats_empty_has_zero_averages() {
        let stats = MetricsCollector::new().stats();
        assert_eq!(stats.average_match_score, 0.0);
        assert_eq!(stats.average_processing_time, 0.0);
    }
}
