//! Host resource sampling for the `system_*_usage_percent` gauges.

use std::sync::Arc;

use sysinfo::System;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::debug;

use super::metrics::MetricsCollector;

pub const SYSTEM_SAMPLE_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemUsage {
    pub cpu_percent: f64,
    pub memory_percent: f64,
}

/// Keeps one `sysinfo::System` alive so CPU usage is measured as a delta
/// between consecutive refreshes.
pub struct SystemSampler {
    system: System,
}

impl SystemSampler {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu_usage();
        Self { system }
    }

    pub async fn sample(&mut self) -> SystemUsage {
        // CPU usage is meaningless until two refreshes are this far apart.
        tokio::time::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL).await;
        self.system.refresh_cpu_usage();
        self.system.refresh_memory();

        SystemUsage {
            cpu_percent: clamp_percent(f64::from(self.system.global_cpu_usage())),
            memory_percent: memory_percent(self.system.used_memory(), self.system.total_memory()),
        }
    }
}

impl Default for SystemSampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Samples host CPU and memory every `interval` and publishes them to `metrics`.
pub fn spawn_system_sampler(metrics: Arc<MetricsCollector>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut sampler = SystemSampler::new();
        let mut ticker = tokio::time::interval(interval);

        loop {
            ticker.tick().await;
            let usage = sampler.sample().await;
            metrics.set_system_usage(usage.cpu_percent, usage.memory_percent);
            debug!(
                cpu = usage.cpu_percent,
                memory = usage.memory_percent,
                "System usage sampled"
            );
        }
    })
}

fn memory_percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    clamp_percent(used as f64 / total as f64 * 100.0)
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}
