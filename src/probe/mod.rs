//! System snapshot: OS version, package managers, disk usage, shell.
//!
//! Each field is probed on its own. A failing sub-probe leaves its field at
//! a sentinel value and never stops the others.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, error};

use crate::managers::{PackageManagerDescriptor, PackageManagerRegistry};
use crate::runner::{CommandError, CommandRunner};

/// Sentinel for facts that could not be determined
pub const UNKNOWN: &str = "Unknown";

/// Shell assumed when `$SHELL` is not set
pub const FALLBACK_SHELL: &str = "/bin/bash";

pub const OS_VERSION_COMMAND: &str = "sw_vers -productVersion";
pub const DISK_USAGE_COMMAND: &str = "df -h /";

static DISK_USAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)(\d+%)\s+(.+)$").expect("disk usage pattern is valid"));

/// Point-in-time facts about the user's environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub os_version: String,
    /// Registry ids of the package managers found on PATH
    pub package_managers: Vec<String>,
    /// Capacity of the root volume, e.g. "42%"; empty when unknown
    pub disk_usage: String,
    /// File name of the login shell, e.g. "zsh"
    pub shell: String,
}

pub struct SystemProbe<'a> {
    runner: &'a dyn CommandRunner,
    registry: PackageManagerRegistry,
    shell_var: Option<String>,
}

impl<'a> SystemProbe<'a> {
    pub fn new(runner: &'a dyn CommandRunner, registry: PackageManagerRegistry) -> Self {
        Self {
            runner,
            registry,
            shell_var: std::env::var("SHELL").ok(),
        }
    }

    /// Use this value instead of the process's `$SHELL`
    pub fn with_shell_var(mut self, shell: Option<String>) -> Self {
        self.shell_var = shell;
        self
    }

    pub fn probe(&self) -> SystemSnapshot {
        let snapshot = SystemSnapshot {
            os_version: self.os_version(),
            package_managers: self.installed_managers(),
            disk_usage: self.disk_usage(),
            shell: shell_name(self.shell_var.as_deref()),
        };
        debug!(?snapshot, "system probe complete");
        snapshot
    }

    pub fn os_version(&self) -> String {
        self.runner
            .run(OS_VERSION_COMMAND)
            .map_err(|e| log_probe_failure("os_version", &e))
            .ok()
            .map(|out| out.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    pub fn installed_managers(&self) -> Vec<String> {
        self.registry
            .iter()
            .filter(|d| is_installed(self.runner, d))
            .map(|d| d.id.to_string())
            .collect()
    }

    pub fn disk_usage(&self) -> String {
        self.runner
            .run(DISK_USAGE_COMMAND)
            .map_err(|e| log_probe_failure("disk_usage", &e))
            .ok()
            .and_then(|out| parse_disk_usage(&out))
            .unwrap_or_default()
    }
}

/// Whether the manager's executable resolves on PATH
pub fn is_installed(runner: &dyn CommandRunner, descriptor: &PackageManagerDescriptor) -> bool {
    match runner.run(&descriptor.locate_command()) {
        Ok(out) => !out.trim().is_empty(),
        Err(e) => {
            log_probe_failure(descriptor.id, &e);
            false
        }
    }
}

/// First `NN%` capacity followed by a mount path in a `df` table
pub fn parse_disk_usage(df_output: &str) -> Option<String> {
    DISK_USAGE_RE
        .captures(df_output)
        .map(|caps| caps[1].to_string())
}

/// Executable name of a shell path, falling back to bash when unset
pub fn shell_name(shell_var: Option<&str>) -> String {
    let path = shell_var
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(FALLBACK_SHELL);
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

fn log_probe_failure(probe: &str, err: &CommandError) {
    if err.is_fatal() {
        error!(probe, error = %err, "probe could not launch command");
    } else {
        debug!(probe, error = %err, "probe returned no data");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAC_DF: &str = "\
Filesystem        Size    Used   Avail Capacity iused ifree %iused  Mounted on
/dev/disk3s1s1   460Gi    10Gi   300Gi     4%  404k  3.1G    0%   /
";

    #[test]
    fn test_parse_disk_usage_mac_layout() {
        assert_eq!(parse_disk_usage(MAC_DF).as_deref(), Some("4%"));
    }

    #[test]
    fn test_parse_disk_usage_first_match_wins() {
        let table = "\
Filesystem      Size  Used Avail Use% Mounted on
/dev/sda1        50G   21G   27G  44% /
tmpfs           7.8G     0  7.8G   0% /dev/shm
";
        assert_eq!(parse_disk_usage(table).as_deref(), Some("44%"));
    }

    #[test]
    fn test_parse_disk_usage_no_match() {
        assert_eq!(parse_disk_usage(""), None);
        assert_eq!(parse_disk_usage("Filesystem Size Used\n"), None);
        // a percentage with nothing after it is not a table row
        assert_eq!(parse_disk_usage("100%"), None);
    }

    #[test]
    fn test_shell_name() {
        assert_eq!(shell_name(Some("/bin/zsh")), "zsh");
        assert_eq!(shell_name(Some("/opt/homebrew/bin/fish")), "fish");
        assert_eq!(shell_name(None), "bash");
        assert_eq!(shell_name(Some("")), "bash");
    }
}
