use serde::Serialize;

use crate::runner::shell_quote;

/// Placeholder substituted with the (quoted) package name
pub const PACKAGE_PLACEHOLDER: &str = "{package}";

/// Command templates for one package manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageManagerDescriptor {
    /// Registry key, e.g. "homebrew"
    pub id: &'static str,
    /// Display name, e.g. "Homebrew"
    pub name: &'static str,
    /// Executable looked up on PATH to decide whether the manager is present
    pub executable: &'static str,
    pub install: &'static str,
    pub uninstall: &'static str,
    pub list: &'static str,
    pub update: &'static str,
    pub upgrade: &'static str,
    pub cleanup: &'static str,
    pub info: &'static str,
    pub outdated: &'static str,
}

impl PackageManagerDescriptor {
    pub fn install_command(&self, package: &str) -> String {
        render(self.install, package)
    }

    pub fn uninstall_command(&self, package: &str) -> String {
        render(self.uninstall, package)
    }

    pub fn info_command(&self, package: &str) -> String {
        render(self.info, package)
    }

    /// Command used to check whether the executable is on PATH
    pub fn locate_command(&self) -> String {
        format!("which {}", shell_quote(self.executable))
    }
}

/// Substitute the package placeholder in a template
pub fn render(template: &str, package: &str) -> String {
    template.replace(PACKAGE_PLACEHOLDER, &shell_quote(package))
}

static BUILTIN: [PackageManagerDescriptor; 2] = [
    PackageManagerDescriptor {
        id: "homebrew",
        name: "Homebrew",
        executable: "brew",
        install: "brew install {package}",
        uninstall: "brew uninstall {package}",
        list: "brew list",
        update: "brew update",
        upgrade: "brew upgrade",
        cleanup: "brew cleanup",
        info: "brew info {package}",
        outdated: "brew outdated",
    },
    PackageManagerDescriptor {
        id: "macports",
        name: "MacPorts",
        executable: "port",
        install: "port install {package}",
        uninstall: "port uninstall {package}",
        list: "port installed",
        update: "port selfupdate",
        upgrade: "port upgrade outdated",
        cleanup: "port clean --all installed",
        info: "port info {package}",
        outdated: "port outdated",
    },
];

/// Read-only table of known package managers, in display order
#[derive(Debug, Clone, Copy)]
pub struct PackageManagerRegistry {
    descriptors: &'static [PackageManagerDescriptor],
}

impl Default for PackageManagerRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PackageManagerRegistry {
    pub fn builtin() -> Self {
        Self {
            descriptors: &BUILTIN,
        }
    }

    pub fn lookup(&self, id: &str) -> Option<&'static PackageManagerDescriptor> {
        self.descriptors.iter().find(|d| d.id == id)
    }

    pub fn all_ids(&self) -> Vec<&'static str> {
        self.descriptors.iter().map(|d| d.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static PackageManagerDescriptor> {
        self.descriptors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_ids_in_order() {
        let registry = PackageManagerRegistry::builtin();
        assert_eq!(registry.all_ids(), vec!["homebrew", "macports"]);
    }

    #[test]
    fn test_lookup() {
        let registry = PackageManagerRegistry::builtin();
        let brew = registry.lookup("homebrew").unwrap();
        assert_eq!(brew.name, "Homebrew");
        assert_eq!(brew.cleanup, "brew cleanup");
        assert_eq!(registry.lookup("macports").unwrap().list, "port installed");
        assert!(registry.lookup("apt").is_none());
        assert!(registry.lookup("Homebrew").is_none());
    }

    #[test]
    fn test_package_templates_carry_placeholder() {
        for d in PackageManagerRegistry::builtin().iter() {
            for template in [d.install, d.uninstall, d.info] {
                assert!(template.contains(PACKAGE_PLACEHOLDER), "{}: {}", d.id, template);
            }
        }
    }

    #[test]
    fn test_render_quotes_package() {
        let brew = PackageManagerRegistry::builtin().lookup("homebrew").unwrap();
        assert_eq!(brew.uninstall_command("wget"), "brew uninstall wget");
        assert_eq!(brew.install_command("python@3.12"), "brew install python@3.12");
        assert_eq!(brew.info_command("a;b"), "brew info 'a;b'");
        assert_eq!(brew.locate_command(), "which brew");
    }
}
