use serde::{Deserialize, Serialize};

/// How an option consumes tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Flag,
    Single,
    Repeatable,
}

/// The closed set of options the launcher understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaunchOption {
    Help,
    Version,
    ShowVersion,
    Debug,
    Quiet,
    Errors,
    BatchMode,
    LogFile,
    SetSystemProperty,
    UserToolchains,
    GlobalToolchains,
}

impl LaunchOption {
    pub const ALL: [Self; 11] = [
        Self::Help,
        Self::Version,
        Self::ShowVersion,
        Self::Debug,
        Self::Quiet,
        Self::Errors,
        Self::BatchMode,
        Self::LogFile,
        Self::SetSystemProperty,
        Self::UserToolchains,
        Self::GlobalToolchains,
    ];

    pub const fn id(self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Version => "version",
            Self::ShowVersion => "show-version",
            Self::Debug => "debug",
            Self::Quiet => "quiet",
            Self::Errors => "errors",
            Self::BatchMode => "batch-mode",
            Self::LogFile => "log-file",
            Self::SetSystemProperty => "define",
            Self::UserToolchains => "toolchains",
            Self::GlobalToolchains => "global-toolchains",
        }
    }

    pub const fn short(self) -> Option<char> {
        match self {
            Self::Help => Some('h'),
            Self::Version => Some('v'),
            Self::ShowVersion => Some('V'),
            Self::Debug => Some('X'),
            Self::Quiet => Some('q'),
            Self::Errors => Some('e'),
            Self::BatchMode => Some('B'),
            Self::LogFile => Some('l'),
            Self::SetSystemProperty => Some('D'),
            Self::UserToolchains => Some('t'),
            Self::GlobalToolchains => None,
        }
    }

    pub const fn kind(self) -> OptionKind {
        match self {
            Self::LogFile | Self::UserToolchains | Self::GlobalToolchains => OptionKind::Single,
            Self::SetSystemProperty => OptionKind::Repeatable,
            _ => OptionKind::Flag,
        }
    }

    pub const fn value_name(self) -> Option<&'static str> {
        match self {
            Self::LogFile | Self::UserToolchains | Self::GlobalToolchains => Some("FILE"),
            Self::SetSystemProperty => Some("NAME[=VALUE]"),
            _ => None,
        }
    }

    pub const fn help(self) -> &'static str {
        match self {
            Self::Help => "Display help information",
            Self::Version => "Display version information",
            Self::ShowVersion => "Display version information WITHOUT stopping",
            Self::Debug => "Produce execution debug output",
            Self::Quiet => "Quiet output - only show errors",
            Self::Errors => "Produce execution error messages",
            Self::BatchMode => "Run in non-interactive (batch) mode (disables output color)",
            Self::LogFile => "Log file where all output will go (disables output color)",
            Self::SetSystemProperty => "Define a system property",
            Self::UserToolchains => "Alternate path for the user toolchains file",
            Self::GlobalToolchains => "Alternate path for the global toolchains file",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|opt| opt.id() == id)
    }
}

/// One option as it was encountered, in encounter order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionOccurrence {
    pub option: LaunchOption,
    pub value: Option<String>,
}

impl OptionOccurrence {
    pub const fn flag(option: LaunchOption) -> Self {
        Self {
            option,
            value: None,
        }
    }

    pub fn with_value(option: LaunchOption, value: impl Into<String>) -> Self {
        Self {
            option,
            value: Some(value.into()),
        }
    }
}

/// Which occurrence a consumer reads when a single-valued option appears more
/// than once in a merged command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlagPrecedence {
    #[default]
    FirstWins,
    LastWins,
}

impl std::str::FromStr for FlagPrecedence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first-wins" => Ok(Self::FirstWins),
            "last-wins" => Ok(Self::LastWins),
            other => Err(format!(
                "unknown flag precedence '{other}', expected first-wins or last-wins"
            )),
        }
    }
}

/// Options and positional arguments, both kept as ordered append lists.
///
/// Nothing is deduplicated here: if an option shows up twice it is stored twice
/// and the reader picks one with a [`FlagPrecedence`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCommandLine {
    options: Vec<OptionOccurrence>,
    args: Vec<String>,
}

impl ParsedCommandLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_option(&mut self, occurrence: OptionOccurrence) {
        self.options.push(occurrence);
    }

    pub fn push_arg(&mut self, arg: impl Into<String>) {
        self.args.push(arg.into());
    }

    pub fn options(&self) -> &[OptionOccurrence] {
        &self.options
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn has_option(&self, option: LaunchOption) -> bool {
        self.options.iter().any(|o| o.option == option)
    }

    /// Every value supplied for `option`, in encounter order.
    pub fn values_of(&self, option: LaunchOption) -> Vec<&str> {
        self.options
            .iter()
            .filter(|o| o.option == option)
            .filter_map(|o| o.value.as_deref())
            .collect()
    }

    pub fn value_of(&self, option: LaunchOption, precedence: FlagPrecedence) -> Option<&str> {
        let mut values = self.values_of(option).into_iter();
        match precedence {
            FlagPrecedence::FirstWins => values.next(),
            FlagPrecedence::LastWins => values.next_back(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id_round_trips() {
        for opt in LaunchOption::ALL {
            assert_eq!(LaunchOption::from_id(opt.id()), Some(opt));
        }
        assert_eq!(LaunchOption::from_id("nope"), None);
    }

    #[test]
    fn test_value_of_respects_precedence() {
        let mut cmd = ParsedCommandLine::new();
        cmd.push_option(OptionOccurrence::with_value(LaunchOption::LogFile, "cli.log"));
        cmd.push_option(OptionOccurrence::flag(LaunchOption::Debug));
        cmd.push_option(OptionOccurrence::with_value(
            LaunchOption::LogFile,
            "config.log",
        ));

        assert_eq!(
            cmd.value_of(LaunchOption::LogFile, FlagPrecedence::FirstWins),
            Some("cli.log")
        );
        assert_eq!(
            cmd.value_of(LaunchOption::LogFile, FlagPrecedence::LastWins),
            Some("config.log")
        );
        assert_eq!(cmd.values_of(LaunchOption::LogFile).len(), 2);
        assert!(cmd.has_option(LaunchOption::Debug));
        assert!(!cmd.has_option(LaunchOption::Quiet));
    }

    #[test]
    fn test_flag_precedence_parsing() {
        assert_eq!(
            "last-wins".parse::<FlagPrecedence>().unwrap(),
            FlagPrecedence::LastWins
        );
        assert!("middle".parse::<FlagPrecedence>().is_err());
    }
}
