use std::ffi::OsString;

use clap::error::{ContextKind, ErrorKind};
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::domain::{LaunchOption, OptionKind, OptionOccurrence, ParsedCommandLine};
use crate::error::ParseError;

mod merge;

pub use merge::merge;

const ARGS_ID: &str = "args";

/// Declares the launcher's option set and parses token lists against it.
///
/// Help and version are plain flags here; clap's own handling of them is
/// switched off so that parsing never prints or exits.
#[derive(Debug, Clone)]
pub struct CommandLineParser {
    command: Command,
}

impl CommandLineParser {
    pub fn new(binary_name: &'static str) -> Self {
        let mut command = Command::new(binary_name)
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .args_override_self(true)
            .override_usage(format!("{binary_name} [options] [<arg1>] [<arg2>] ..."));

        for option in LaunchOption::ALL {
            command = command.arg(option_arg(option));
        }

        command = command.arg(
            Arg::new(ARGS_ID)
                .action(ArgAction::Append)
                .value_name("ARG")
                .help("Arguments handed to the service layer"),
        );

        Self { command }
    }

    pub fn parse<I, S>(&self, tokens: I) -> Result<ParsedCommandLine, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString> + Clone,
    {
        let matches = self
            .command
            .clone()
            .try_get_matches_from(tokens)
            .map_err(|e| map_error(&e))?;
        Ok(collect(&matches))
    }

    pub fn help(&self) -> String {
        self.command.clone().render_help().to_string()
    }
}

impl Default for CommandLineParser {
    fn default() -> Self {
        Self::new("launch")
    }
}

fn option_arg(option: LaunchOption) -> Arg {
    let mut arg = Arg::new(option.id()).long(option.id()).help(option.help());
    if let Some(short) = option.short() {
        arg = arg.short(short);
    }
    if let Some(value_name) = option.value_name() {
        arg = arg.value_name(value_name);
    }
    match option.kind() {
        OptionKind::Flag => arg.action(ArgAction::SetTrue),
        OptionKind::Single => arg.action(ArgAction::Set),
        OptionKind::Repeatable => arg.action(ArgAction::Append),
    }
}

// Rebuild encounter order across options from clap's argument indices.
fn collect(matches: &ArgMatches) -> ParsedCommandLine {
    let mut indexed: Vec<(usize, OptionOccurrence)> = Vec::new();

    for option in LaunchOption::ALL {
        let id = option.id();
        if matches.value_source(id) != Some(ValueSource::CommandLine) {
            continue;
        }
        match option.kind() {
            OptionKind::Flag => {
                let index = matches.index_of(id).unwrap_or(usize::MAX);
                indexed.push((index, OptionOccurrence::flag(option)));
            }
            OptionKind::Single | OptionKind::Repeatable => {
                let indices = matches.indices_of(id).into_iter().flatten();
                let values = matches.get_many::<String>(id).into_iter().flatten();
                for (index, value) in indices.zip(values) {
                    indexed.push((index, OptionOccurrence::with_value(option, value.clone())));
                }
            }
        }
    }

    indexed.sort_by_key(|(index, _)| *index);

    let mut parsed = ParsedCommandLine::new();
    for (_, occurrence) in indexed {
        parsed.push_option(occurrence);
    }
    for arg in matches.get_many::<String>(ARGS_ID).into_iter().flatten() {
        parsed.push_arg(arg.clone());
    }
    parsed
}

fn map_error(err: &clap::Error) -> ParseError {
    let token = err
        .get(ContextKind::InvalidArg)
        .map(ToString::to_string)
        .unwrap_or_default();
    match err.kind() {
        ErrorKind::UnknownArgument => ParseError::UnrecognizedOption(token),
        ErrorKind::InvalidValue | ErrorKind::NoEquals => ParseError::MalformedOption {
            option: option_name(&token).to_string(),
            reason: "missing value".to_string(),
        },
        kind => ParseError::MalformedOption {
            option: option_name(&token).to_string(),
            reason: kind.as_str().unwrap_or("invalid option").to_string(),
        },
    }
}

// clap renders the offending arg with its value name, e.g. `--log-file <FILE>`.
fn option_name(rendered: &str) -> &str {
    rendered
        .split([' ', '=', '<'])
        .next()
        .unwrap_or(rendered)
}
