use crate::domain::{LaunchOption, ParsedCommandLine};

/// Fold a config-file command line into the one given on the command line.
///
/// Positionals: command line first, then config file. Options: command line
/// options except `-D`, then every config-file option, then the command line
/// `-D` values. Applying `-D` in that order lets command line properties
/// overwrite config-file properties of the same name.
pub fn merge(cli: ParsedCommandLine, config: Option<ParsedCommandLine>) -> ParsedCommandLine {
    let Some(config) = config else {
        return cli;
    };

    let mut merged = ParsedCommandLine::new();

    for arg in cli.args().iter().chain(config.args()) {
        merged.push_arg(arg.clone());
    }

    let (properties, others): (Vec<_>, Vec<_>) = cli
        .options()
        .iter()
        .cloned()
        .partition(|o| o.option == LaunchOption::SetSystemProperty);

    for occurrence in others {
        merged.push_option(occurrence);
    }
    for occurrence in config.options() {
        merged.push_option(occurrence.clone());
    }
    for occurrence in properties {
        merged.push_option(occurrence);
    }

    merged
}
