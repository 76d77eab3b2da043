pub mod cli;
pub mod config;
pub mod console;
pub mod domain;
pub mod error;
pub mod launcher;
pub mod ports;
pub mod services;

pub use config::Settings;
pub use self::console::{Console, SharedWriter};
pub use domain::{BuildInfo, CliRequest, LaunchOption, ParsedCommandLine, PropertySet};
pub use error::{LaunchError, ParseError, Result};
pub use launcher::Launcher;
pub use ports::{LaunchContext, ServiceLayer};
pub use services::{DefaultService, SystemPropertyView};
