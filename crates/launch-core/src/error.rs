use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while turning tokens into a [`ParsedCommandLine`].
///
/// [`ParsedCommandLine`]: crate::domain::ParsedCommandLine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unrecognized option: {0}")]
    UnrecognizedOption(String),

    #[error("Malformed option {option}: {reason}")]
    MalformedOption { option: String, reason: String },
}

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Unable to parse {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("Unrecognized launch.config entries: {args:?}")]
    ConfigArguments { path: PathBuf, args: Vec<String> },

    #[error("Invalid property definition: '{0}'")]
    InvalidPropertyDefinition(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("The specified {kind} toolchains file does not exist: {}", path.display())]
    ToolchainsNotFound { kind: &'static str, path: PathBuf },

    #[error("Exit requested with code {0}")]
    Exit(i32),

    #[error("{0}")]
    Aborted(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Service(#[from] anyhow::Error),
}

impl LaunchError {
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Exit(code) => *code,
            Self::Aborted(_) => 2,
            Self::Parse(_)
            | Self::ConfigParse { .. }
            | Self::ConfigArguments { .. }
            | Self::InvalidPropertyDefinition(_)
            | Self::InvalidConfiguration(_)
            | Self::ToolchainsNotFound { .. }
            | Self::Settings(_)
            | Self::Io(_)
            | Self::Service(_) => 1,
        }
    }

    /// True for pure user errors that were already reported while parsing.
    pub const fn is_unrecognized_option(&self) -> bool {
        matches!(
            self,
            Self::Parse(ParseError::UnrecognizedOption(_))
                | Self::ConfigParse {
                    source: ParseError::UnrecognizedOption(_),
                    ..
                }
        )
    }
}

pub type Result<T> = std::result::Result<T, LaunchError>;
