use super::{Package, PackageStatus};

/// Turn `outdated` output into package records.
///
/// Best effort: each non-blank line becomes one outdated package named after
/// its first whitespace-separated token. Versions are not parsed and names
/// are not validated. Line order is preserved. Missing output yields nothing.
pub fn parse_outdated(manager_id: &str, raw: Option<&str>) -> Vec<Package> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    raw.lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(|name| Package::new(name, manager_id, PackageStatus::Outdated))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_homebrew_outdated_lines() {
        let raw = "wget 1.21 -> 1.21.1\ncurl 7.80 -> 7.81\n";
        let packages = parse_outdated("homebrew", Some(raw));

        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].name, "wget");
        assert_eq!(packages[1].name, "curl");
        for p in &packages {
            assert_eq!(p.manager, "homebrew");
            assert_eq!(p.status, PackageStatus::Outdated);
            assert!(p.version.is_none());
        }
    }

    #[test]
    fn test_empty_and_missing_input() {
        assert!(parse_outdated("homebrew", None).is_empty());
        assert!(parse_outdated("homebrew", Some("")).is_empty());
        assert!(parse_outdated("homebrew", Some("\n\n  \n")).is_empty());
    }

    #[test]
    fn test_one_record_per_non_empty_line_in_order() {
        let raw = "\n  zlib 1.2\n\r\nopenssl@3 3.1 < 3.2\ngit\n\n";
        let names: Vec<String> = parse_outdated("macports", Some(raw))
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["zlib", "openssl@3", "git"]);
    }

    #[test]
    fn test_first_token_is_taken_verbatim() {
        let packages = parse_outdated("macports", Some("The following ports are outdated:\n"));
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].name, "The");
    }
}
