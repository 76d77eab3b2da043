use std::path::{Path, PathBuf};

use super::paths::resolve_file;
use crate::domain::build::HOME_PROPERTY;
use crate::domain::{CliRequest, LaunchOption, Toolchains};
use crate::error::{LaunchError, Result};

pub const USER_TOOLCHAINS_FILE: &str = ".launch/toolchains.xml";
pub const GLOBAL_TOOLCHAINS_FILE: &str = "conf/toolchains.xml";

/// Pick the user and global toolchains files for this invocation.
///
/// Explicit paths must name an existing file. Defaults are not checked;
/// whoever reads them decides what a missing default means.
pub fn resolve_toolchains(request: &CliRequest, user_home: Option<&Path>) -> Result<Toolchains> {
    let working_directory = request.working_directory.as_deref();

    let user = match request.option_value(LaunchOption::UserToolchains) {
        Some(path) => existing_file("user", resolve_file(path, working_directory))?,
        None => user_home
            .map(|home| home.join(USER_TOOLCHAINS_FILE))
            .unwrap_or_else(|| PathBuf::from(USER_TOOLCHAINS_FILE)),
    };

    let global = match request.option_value(LaunchOption::GlobalToolchains) {
        Some(path) => Some(existing_file("global", resolve_file(path, working_directory))?),
        None => request
            .system_properties
            .get(HOME_PROPERTY)
            .map(|home| Path::new(home).join(GLOBAL_TOOLCHAINS_FILE)),
    };

    tracing::debug!(user = %user.display(), global = ?global, "toolchains resolved");
    Ok(Toolchains { user, global })
}

fn existing_file(kind: &'static str, path: PathBuf) -> Result<PathBuf> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(LaunchError::ToolchainsNotFound { kind, path })
    }
}
