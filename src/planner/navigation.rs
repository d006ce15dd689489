use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::common::paths::expand_tilde;

/// Directories offered as `goto_*` shortcuts, in script order
pub const COMMON_DIRS: &[(&str, &str)] = &[
    ("Documents", "~/Documents"),
    ("Development", "~/Development"),
    ("Downloads", "~/Downloads"),
    ("Applications", "/Applications"),
    ("Home", "~"),
];

const SCRIPT_HEADER: &[&str] = &[
    "#!/bin/bash",
    "# Terminal Navigation Training Plan generated by SwimCoach",
    "# Add these to your .bashrc or .zshrc to improve terminal navigation",
    "",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryAlias {
    pub name: String,
    /// Path as written in the alias, `~` left unexpanded
    pub path: String,
    pub alias_command: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSuggestion {
    pub command: String,
    pub description: String,
    pub alias: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavigationPlan {
    pub directory_aliases: Vec<DirectoryAlias>,
    pub useful_commands: Vec<CommandSuggestion>,
    pub export_script: String,
}

/// Builds shortcut aliases for the directories that exist under `home`.
pub struct NavigationPlanner {
    home: PathBuf,
}

impl NavigationPlanner {
    pub fn new(home: &Path) -> Self {
        Self {
            home: home.to_path_buf(),
        }
    }

    pub fn create_plan(&self) -> NavigationPlan {
        let directory_aliases = directory_aliases(COMMON_DIRS, &self.home);
        let useful_commands = suggested_commands();
        let export_script = render_export_script(&directory_aliases, &useful_commands);
        NavigationPlan {
            directory_aliases,
            useful_commands,
            export_script,
        }
    }
}

/// One alias per entry whose expanded path is an existing directory
pub fn directory_aliases(dirs: &[(&str, &str)], home: &Path) -> Vec<DirectoryAlias> {
    dirs.iter()
        .filter(|(_, path)| expand_tilde(path, home).is_dir())
        .map(|(label, path)| {
            let name = label.to_lowercase();
            DirectoryAlias {
                alias_command: format!("alias goto_{}=\"cd {}\"", name, path),
                name,
                path: path.to_string(),
            }
        })
        .collect()
}

/// Fixed set of handy commands, independent of the system
pub fn suggested_commands() -> Vec<CommandSuggestion> {
    [
        (
            "find . -name \"*.txt\" -type f",
            "Find all text files in the current directory and subdirectories",
            "alias findtxt='find . -name \"*.txt\" -type f'",
        ),
        (
            "grep -r \"search term\" .",
            "Search for text in all files recursively",
            "alias search='grep -r'",
        ),
        (
            "ls -la | grep ^d",
            "List only directories with details",
            "alias lsd='ls -la | grep ^d'",
        ),
    ]
    .into_iter()
    .map(|(command, description, alias)| CommandSuggestion {
        command: command.to_string(),
        description: description.to_string(),
        alias: alias.to_string(),
    })
    .collect()
}

/// Header comment followed by every alias line, newline separated
pub fn render_export_script(aliases: &[DirectoryAlias], commands: &[CommandSuggestion]) -> String {
    SCRIPT_HEADER
        .iter()
        .map(|line| line.to_string())
        .chain(aliases.iter().map(|a| a.alias_command.clone()))
        .chain(commands.iter().map(|c| c.alias.clone()))
        .collect::<Vec<_>>()
        .join("\n")
}
