use colored::*;

use crate::planner::StepStatus;

/// Format bytes into human-readable size string
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format size with color based on magnitude
pub fn format_size_colored(bytes: u64) -> ColoredString {
    let s = format_size(bytes);
    const GB: u64 = 1024 * 1024 * 1024;
    const MB100: u64 = 100 * 1024 * 1024;

    if bytes >= GB {
        s.red().bold()
    } else if bytes >= MB100 {
        s.yellow()
    } else {
        s.white()
    }
}

/// Format package count with appropriate plural
pub fn format_count(count: usize) -> String {
    if count == 1 {
        "1 package".to_string()
    } else {
        format!("{} packages", count)
    }
}

/// Format a path for display, replacing home directory with ~
pub fn format_path(path: &std::path::Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

/// Format milliseconds in human-readable form
pub fn format_millis(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) as f64 / 1000.0;
        format!("{}m {:.0}s", mins, secs)
    }
}

/// Disk capacity, color-coded the way a coach reads a split time
pub fn format_disk_usage(usage: &str) -> ColoredString {
    let pct: Option<u32> = usage.trim_end_matches('%').parse().ok();
    match pct {
        None => "n/a".dimmed(),
        Some(p) if p >= 90 => usage.red().bold(),
        Some(p) if p >= 75 => usage.yellow(),
        Some(_) => usage.green(),
    }
}

/// Colorize a pipeline step status
pub fn format_step_status(status: &StepStatus) -> ColoredString {
    match status {
        StepStatus::Completed => "✓".green(),
        StepStatus::Skipped { .. } => "–".dimmed(),
        StepStatus::Partial { .. } => "!".yellow().bold(),
    }
}

/// Print a section header
pub fn print_header(title: &str) {
    println!();
    println!("{}", title.bold().underline());
    println!();
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Truncate a string to max length with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1048576), "1.00 MB");
        assert_eq!(format_size(1073741824), "1.00 GB");
        assert_eq!(format_size(1099511627776), "1.00 TB");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0 packages");
        assert_eq!(format_count(1), "1 package");
        assert_eq!(format_count(42), "42 packages");
    }

    #[test]
    fn test_format_millis() {
        assert_eq!(format_millis(480), "480ms");
        assert_eq!(format_millis(3700), "3.7s");
        assert_eq!(format_millis(125_000), "2m 5s");
    }

    #[test]
    fn test_format_disk_usage_unknown() {
        colored::control::set_override(false);
        assert_eq!(format_disk_usage("").to_string(), "n/a");
        assert_eq!(format_disk_usage("42%").to_string(), "42%");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("abcd", 3), "...");
    }
}
