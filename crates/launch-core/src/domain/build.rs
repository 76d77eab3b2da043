pub const VERSION_PROPERTY: &str = "launch.version";
pub const BUILD_VERSION_PROPERTY: &str = "launch.build.version";
pub const HOME_PROPERTY: &str = "launch.home";

/// Metadata baked in at compile time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    pub name: String,
    pub version: String,
    pub revision: Option<String>,
    pub timestamp: Option<String>,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: "launch".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            revision: option_env!("LAUNCH_BUILD_REVISION").map(str::to_string),
            timestamp: option_env!("LAUNCH_BUILD_TIMESTAMP").map(str::to_string),
        }
    }

    /// `launch 0.2.0 (abc123; 2024-01-01T00:00:00Z)`, omitting unknown parts.
    pub fn version_string(&self) -> String {
        let details: Vec<&str> = [self.revision.as_deref(), self.timestamp.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if details.is_empty() {
            format!("{} {}", self.name, self.version)
        } else {
            format!("{} {} ({})", self.name, self.version, details.join("; "))
        }
    }

    /// Full text printed for `--version` / `--show-version`.
    pub fn version_report(&self, home: Option<&str>) -> String {
        format!(
            "{}\nLaunch home: {}\nOS name: \"{}\", arch: \"{}\", family: \"{}\"",
            self.version_string(),
            home.unwrap_or("(unset)"),
            std::env::consts::OS,
            std::env::consts::ARCH,
            std::env::consts::FAMILY,
        )
    }
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self::current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(revision: Option<&str>, timestamp: Option<&str>) -> BuildInfo {
        BuildInfo {
            name: "launch".to_string(),
            version: "1.2.3".to_string(),
            revision: revision.map(str::to_string),
            timestamp: timestamp.map(str::to_string),
        }
    }

    #[test]
    fn test_version_string_without_metadata() {
        assert_eq!(info(None, None).version_string(), "launch 1.2.3");
    }

    #[test]
    fn test_version_string_with_metadata() {
        assert_eq!(
            info(Some("abc123"), Some("2024-01-01")).version_string(),
            "launch 1.2.3 (abc123; 2024-01-01)"
        );
        assert_eq!(
            info(Some("abc123"), None).version_string(),
            "launch 1.2.3 (abc123)"
        );
    }

    #[test]
    fn test_version_report_mentions_home() {
        let report = info(None, None).version_report(Some("/opt/launch"));
        assert!(report.starts_with("launch 1.2.3\n"));
        assert!(report.contains("Launch home: /opt/launch"));
        assert!(report.contains("OS name:"));
    }
}
