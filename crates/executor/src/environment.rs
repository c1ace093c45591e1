use serde::{Deserialize, Serialize};
use sysinfo::System;

const GB: u64 = 1024 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub timestamp: i64,
    pub os_name: String,
    pub os_version: String,
    pub kernel_version: String,
    pub host_name: String,
    pub memory_total_gb: u64,
    pub memory_used_gb: u64,
    pub cpu_count: usize,
    pub uptime_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    pub cpu_usage: f32,
    pub memory_mb: u64,
}

impl SystemSnapshot {
    pub fn capture() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();

        let unknown = || "Unknown".to_string();
        Self {
            timestamp: chrono::Utc::now().timestamp(),
            os_name: System::name().unwrap_or_else(unknown),
            os_version: System::os_version().unwrap_or_else(unknown),
            kernel_version: System::kernel_version().unwrap_or_else(unknown),
            host_name: System::host_name().unwrap_or_else(unknown),
            memory_total_gb: sys.total_memory() / GB,
            memory_used_gb: sys.used_memory() / GB,
            cpu_count: sys.cpus().len(),
            uptime_seconds: System::uptime(),
        }
    }

    pub fn to_report(&self) -> String {
        format!(
            "SYSTEM:\nOS: {} {}\nKernel: {}\nHost: {}\n\nMEMORY:\nTotal: {} GB\nUsed: {} GB\nFree: {} GB\n\nCPU:\nProcessors: {}\nUptime: {} min",
            self.os_name,
            self.os_version,
            self.kernel_version,
            self.host_name,
            self.memory_total_gb,
            self.memory_used_gb,
            self.memory_total_gb.saturating_sub(self.memory_used_gb),
            self.cpu_count,
            self.uptime_seconds / 60
        )
    }
}

/// Running processes sorted by name, at most `limit` of them.
pub fn process_list(limit: usize) -> Vec<ProcessInfo> {
    let mut sys = System::new_all();
    sys.refresh_all();

    let mut processes: Vec<ProcessInfo> = sys
        .processes()
        .iter()
        .map(|(pid, process)| ProcessInfo {
            pid: pid.as_u32(),
            name: process.name().to_string(),
            cpu_usage: process.cpu_usage(),
            memory_mb: process.memory() / 1024 / 1024,
        })
        .collect();
    processes.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    processes.truncate(limit);
    processes
}

pub fn process_report(processes: &[ProcessInfo]) -> String {
    let lines: Vec<String> = processes
        .iter()
        .map(|p| {
            format!(
                "PID: {} | {} | CPU: {:.1}% | Memory: {} MB",
                p.pid, p.name, p.cpu_usage, p.memory_mb
            )
        })
        .collect();
    format!("Processes (top {}):\n{}", processes.len(), lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture() {
        let snapshot = SystemSnapshot::capture();
        assert!(snapshot.cpu_count > 0);
        let report = snapshot.to_report();
        assert!(report.contains("OS:"));
        assert!(report.contains("Processors:"));
    }

    #[test]
    fn test_process_list_limited() {
        let processes = process_list(3);
        assert!(!processes.is_empty());
        assert!(processes.len() <= 3);
    }

    #[test]
    fn test_process_report_format() {
        let report = process_report(&[ProcessInfo {
            pid: 42,
            name: "lucy".to_string(),
            cpu_usage: 1.5,
            memory_mb: 12,
        }]);
        assert_eq!(
            report,
            "Processes (top 1):\nPID: 42 | lucy | CPU: 1.5% | Memory: 12 MB"
        );
    }
}
