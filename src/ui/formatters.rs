use humansize::{format_size, BINARY};

use crate::core::health::{Metric, Unit};

/// Format a byte count in binary units (KiB, MiB, GiB)
pub fn format_bytes(bytes: f64) -> String {
    format_size(bytes.max(0.0) as u64, BINARY)
}

/// Format an uptime as `3d 4h 12m`
pub fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Integers without a fraction, anything else with two decimals
pub fn format_count(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

/// Human-readable value of a metric, `unknown` when unread
pub fn format_value(metric: &Metric) -> String {
    let Some(value) = metric.value else {
        return "unknown".to_string();
    };

    match metric.unit {
        Unit::Percent => format!("{:.1}%", value),
        Unit::Bytes => format_bytes(value),
        Unit::Count => format_count(value),
        Unit::Seconds => format_uptime(value.max(0.0) as u64),
    }
}

/// Display label for a metric name
pub fn metric_label(metric: &Metric) -> String {
    let subject = metric.subject().unwrap_or_default();

    match metric.kind() {
        "uptime" => "Uptime".to_string(),
        "cpu_cores" => "Cores".to_string(),
        "cpu_usage" => "CPU usage".to_string(),
        "load_1m" => "Load (1m)".to_string(),
        "load_5m" => "Load (5m)".to_string(),
        "load_15m" => "Load (15m)".to_string(),
        "mem_total" => "Memory total".to_string(),
        "mem_used" => "Memory used".to_string(),
        "mem_free" => "Memory free".to_string(),
        "mem_available" => "Memory available".to_string(),
        "mem_usage" => "Memory usage".to_string(),
        "swap_total" => "Swap total".to_string(),
        "swap_used" => "Swap used".to_string(),
        "swap_usage" => "Swap usage".to_string(),
        "disk" => format!("{} usage", subject),
        "inode" => format!("{} inodes", subject),
        "disk_size" => format!("{} size", subject),
        "disk_used" => format!("{} used", subject),
        "disk_avail" => format!("{} available", subject),
        "disks" => "Filesystems".to_string(),
        "net_rx" => format!("{} received", subject),
        "net_tx" => format!("{} sent", subject),
        "net_errors" => format!("{} errors", subject),
        "network" => "Interfaces".to_string(),
        _ => metric.name.clone(),
    }
}
