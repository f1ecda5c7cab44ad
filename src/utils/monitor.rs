#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessesToUpdate, System};

#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct StageStats {
    pub memory_usage_mb: u64,
    pub peak_memory_mb: u64,
    pub elapsed_time: Duration,
}

/// Logs process memory and elapsed time after each conversion stage.
#[cfg(feature = "cli")]
pub struct SystemMonitor {
    system: System,
    pid: Option<Pid>,
    start_time: Instant,
    peak_memory_mb: u64,
    enabled: bool,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let pid = if enabled {
            sysinfo::get_current_pid().ok()
        } else {
            None
        };

        Self {
            system: System::new(),
            pid,
            start_time: Instant::now(),
            peak_memory_mb: 0,
            enabled,
        }
    }

    pub fn sample(&mut self) -> Option<StageStats> {
        if !self.enabled {
            return None;
        }
        let pid = self.pid?;

        self.system
            .refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        let memory_mb = self.system.process(pid)?.memory() / 1024 / 1024;
        self.peak_memory_mb = self.peak_memory_mb.max(memory_mb);

        Some(StageStats {
            memory_usage_mb: memory_mb,
            peak_memory_mb: self.peak_memory_mb,
            elapsed_time: self.start_time.elapsed(),
        })
    }

    pub fn log_stats(&mut self, stage: &str) {
        if let Some(stats) = self.sample() {
            tracing::info!(
                "📊 {} - Memory: {}MB, Peak: {}MB, Time: {:?}",
                stage,
                stats.memory_usage_mb,
                stats.peak_memory_mb,
                stats.elapsed_time
            );
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(feature = "cli")]
impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

// Library builds without the cli feature carry no sysinfo.
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn log_stats(&mut self, _stage: &str) {}

    pub fn is_enabled(&self) -> bool {
        false
    }
}
