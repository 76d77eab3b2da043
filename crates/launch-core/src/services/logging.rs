use std::path::PathBuf;
use std::str::FromStr;

use tracing::level_filters::LevelFilter;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;

use super::paths::resolve_file;
use crate::console::Console;
use crate::domain::{CliRequest, LaunchOption};
use crate::error::{LaunchError, Result};

pub const STYLE_COLOR_PROPERTY: &str = "style.color";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl FromStr for ColorMode {
    type Err = LaunchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            other => Err(LaunchError::InvalidConfiguration(format!(
                "Invalid color configuration value '{other}'. Supported values are (auto|always|never)."
            ))),
        }
    }
}

/// Logging decisions derived from the merged command line and user properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub debug: bool,
    pub quiet: bool,
    pub show_errors: bool,
    pub color_mode: ColorMode,
    /// `None` leaves color to the terminal.
    pub color: Option<bool>,
    pub log_file: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn derive(request: &CliRequest) -> Result<Self> {
        let debug = request.has_option(LaunchOption::Debug);
        let quiet = !debug && request.has_option(LaunchOption::Quiet);
        let show_errors = debug || request.has_option(LaunchOption::Errors);

        let color_mode: ColorMode = request
            .user_properties
            .get_or(STYLE_COLOR_PROPERTY, "auto")
            .parse()?;

        let log_file = request
            .option_value(LaunchOption::LogFile)
            .map(|path| resolve_file(path, request.working_directory.as_deref()));

        let color = match color_mode {
            ColorMode::Always => Some(true),
            ColorMode::Never => Some(false),
            ColorMode::Auto
                if request.has_option(LaunchOption::BatchMode)
                    || request.has_option(LaunchOption::LogFile) =>
            {
                Some(false)
            }
            ColorMode::Auto => None,
        };

        Ok(Self {
            debug,
            quiet,
            show_errors,
            color_mode,
            color,
            log_file,
        })
    }

    pub const fn level(&self) -> LevelFilter {
        if self.debug {
            LevelFilter::DEBUG
        } else if self.quiet {
            LevelFilter::ERROR
        } else {
            LevelFilter::INFO
        }
    }

    pub fn color_enabled(&self) -> bool {
        self.color.unwrap_or_else(::console::colors_enabled_stderr)
    }

    pub fn apply_to(&self, request: &mut CliRequest) {
        request.debug = self.debug;
        request.quiet = self.quiet;
        request.show_errors = self.show_errors;
        request.color_enabled = self.color_enabled();
    }

    /// Point the console at the log file, if one was asked for. Failing to
    /// open it keeps the current streams.
    pub fn redirect(&self, console: &mut Console) {
        let Some(path) = &self.log_file else {
            return;
        };
        if let Err(e) = console.redirect_to_file(path) {
            tracing::debug!(path = %path.display(), error = %e, "log file redirection skipped");
        }
    }

    /// Install a subscriber for the current thread until the guard drops.
    pub fn install(&self, console: &Console, extra_filter: Option<&str>) -> DefaultGuard {
        let filter = EnvFilter::builder()
            .with_default_directive(self.level().into())
            .parse_lossy(extra_filter.unwrap_or_default());

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(console.err())
            .with_ansi(self.color_enabled())
            .with_target(false)
            .finish();

        tracing::subscriber::set_default(subscriber)
    }
}
