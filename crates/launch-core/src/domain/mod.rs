pub mod build;
pub mod command_line;
pub mod properties;
pub mod request;

pub use build::BuildInfo;
pub use command_line::{
    FlagPrecedence, LaunchOption, OptionKind, OptionOccurrence, ParsedCommandLine,
};
pub use properties::PropertySet;
pub use request::{CliRequest, Toolchains};
