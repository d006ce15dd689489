//! # SwimCoach
//!
//! A swim-coach themed navigator for the macOS terminal environment.
//!
//! SwimCoach inspects the tools around your shell and coaches you toward a
//! leaner setup. It features:
//!
//! - **System Check**: OS version, Homebrew/MacPorts presence, disk usage, login shell
//! - **Package Efficiency**: outdated packages per package manager, with cleanup
//! - **Safety-First**: dry-run by default, caches are measured and never deleted
//! - **Shell Organization**: dated dotfile backups and a startup-time check
//! - **Navigation Training**: alias script for common directories and commands
//! - **Bounded Commands**: every external command runs under a timeout
//!
//! The [`runner::CommandRunner`] trait is the only way the library talks to
//! external tools, so every planner can be exercised with a
//! [`runner::ScriptedRunner`].

pub mod cli;
pub mod common;
pub mod managers;
pub mod planner;
pub mod probe;
pub mod runner;
