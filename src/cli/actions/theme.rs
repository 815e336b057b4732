use crate::{
    cli::globals::GlobalArgs,
    preferences::{self, ThemeMode},
};
use anyhow::{anyhow, Result};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Set(ThemeMode),
    Toggle,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        if value == "toggle" {
            return Ok(Mode::Toggle);
        }
        value.parse().map(Mode::Set).map_err(|err| anyhow!("{err}"))
    }
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub mode: Option<Mode>,
}

/// Show or change the theme preference. Never touches the session.
/// # Errors
/// Returns an error if the preference cannot be persisted.
pub fn execute(args: &Args) -> Result<()> {
    let storage = args.globals.storage();

    let mode = match args.mode {
        None => preferences::load(storage.as_ref()),
        Some(Mode::Toggle) => preferences::toggle(storage.as_ref())?,
        Some(Mode::Set(mode)) => {
            preferences::save(storage.as_ref(), mode)?;
            mode
        }
    };

    println!("{mode}");
    Ok(())
}
