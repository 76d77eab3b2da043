use std::path::PathBuf;

use super::{FlagPrecedence, LaunchOption, ParsedCommandLine, PropertySet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchains {
    pub user: PathBuf,
    pub global: Option<PathBuf>,
}

/// Everything one invocation knows about itself. Built once, filled in by each
/// bootstrap stage, dropped when the invocation ends.
#[derive(Debug, Clone, Default)]
pub struct CliRequest {
    pub args: Vec<String>,
    pub working_directory: Option<PathBuf>,
    pub project_directory: Option<PathBuf>,
    pub command_line: ParsedCommandLine,
    pub system_properties: PropertySet,
    pub user_properties: PropertySet,
    pub debug: bool,
    pub quiet: bool,
    pub show_errors: bool,
    pub color_enabled: bool,
    pub toolchains: Option<Toolchains>,
    pub flag_precedence: FlagPrecedence,
}

impl CliRequest {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_project_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.project_directory = Some(dir.into());
        self
    }

    pub fn has_option(&self, option: LaunchOption) -> bool {
        self.command_line.has_option(option)
    }

    pub fn option_value(&self, option: LaunchOption) -> Option<&str> {
        self.command_line.value_of(option, self.flag_precedence)
    }

    /// User properties first, then system properties.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.user_properties
            .get(name)
            .or_else(|| self.system_properties.get(name))
    }
}
