use std::path::Path;

use crate::cli::CommandLineParser;
use crate::domain::ParsedCommandLine;
use crate::error::{LaunchError, Result};

pub const DEFAULT_CONFIG_FILE: &str = ".launch/launch.config";

/// Read the project-local options file under `base`, if there is one.
///
/// The file holds whitespace separated options only; a bare argument is an
/// error of its own, distinct from an unparseable option.
pub fn load_project_config(
    base: &Path,
    relative: &Path,
    parser: &CommandLineParser,
) -> Result<Option<ParsedCommandLine>> {
    let path = base.join(relative);
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "no project config file");
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path)?;
    let tokens: Vec<&str> = content.split_whitespace().collect();
    tracing::debug!(path = %path.display(), tokens = tokens.len(), "loading project config");

    let parsed = parser
        .parse(tokens)
        .map_err(|source| LaunchError::ConfigParse {
            path: path.clone(),
            source,
        })?;

    if !parsed.args().is_empty() {
        return Err(LaunchError::ConfigArguments {
            path,
            args: parsed.args().to_vec(),
        });
    }

    Ok(Some(parsed))
}
