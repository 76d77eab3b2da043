use anyhow::{Context, Result};
use launch_core::{DefaultService, Launcher, Settings};

fn main() -> Result<()> {
    let settings = Settings::load().context("Failed to load launch settings")?;

    let args = std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned());

    let code = Launcher::new(DefaultService::new())
        .with_settings(settings)
        .main(args);
    std::process::exit(code);
}
