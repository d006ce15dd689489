pub mod parser;
pub mod registry;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

pub use parser::parse_outdated;
pub use registry::{PackageManagerDescriptor, PackageManagerRegistry};

/// A package as reported by one of the registered package managers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    pub version: Option<String>,
    /// Registry id of the owning manager ("homebrew", "macports")
    pub manager: String,
    pub status: PackageStatus,
    pub last_used: Option<DateTime<Local>>,
}

impl Package {
    pub fn new(name: &str, manager: &str, status: PackageStatus) -> Self {
        Self {
            name: name.to_string(),
            version: None,
            manager: manager.to_string(),
            status,
            last_used: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageStatus {
    Current,
    Outdated,
    Unused,
}

impl std::fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackageStatus::Current => write!(f, "current"),
            PackageStatus::Outdated => write!(f, "outdated"),
            PackageStatus::Unused => write!(f, "unused"),
        }
    }
}
