use sysinfo::System;
use tracing::trace;

use crate::ResourceInfo;

const MIB: u64 = 1024 * 1024;

/// Something that can produce the metrics an agent reports.
pub trait MetricsSource: Send + Sync {
    fn sample(&mut self) -> ResourceInfo;
}

/// Samples the local machine via `sysinfo`.
///
/// CPU usage is measured between two consecutive refreshes, so construction
/// blocks for [`sysinfo::MINIMUM_CPU_UPDATE_INTERVAL`] to give the first
/// sample a real reading.
pub struct SystemSource {
    sys: System,
    conn: String,
}

impl SystemSource {
    pub fn new(conn: impl Into<String>) -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_all();
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);

        Self {
            sys,
            conn: conn.into(),
        }
    }
}

impl MetricsSource for SystemSource {
    fn sample(&mut self) -> ResourceInfo {
        self.sys.refresh_memory();
        self.sys.refresh_cpu_all();

        let cpu_name = self
            .sys
            .cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_string())
            .unwrap_or_default();

        let info = ResourceInfo {
            mem: format_memory(self.sys.used_memory(), self.sys.total_memory()),
            cpu: format!("{:.1}%", self.sys.global_cpu_usage()),
            cpu_name,
            host: System::host_name().unwrap_or_default(),
            conn: self.conn.clone(),
        };

        trace!("sampled system metrics: {info:?}");

        info
    }
}

/// Formats byte counts as `"<used>/<total> MiB"`.
pub fn format_memory(used: u64, total: u64) -> String {
    format!("{}/{} MiB", used / MIB, total / MIB)
}
