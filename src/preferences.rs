//! Theme preference, persisted across sessions and untouched by logout.

use crate::storage::{self, Storage, THEME_KEY};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

impl ThemeMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!("invalid theme mode: {other}")),
        }
    }
}

/// Saved theme, falling back to dark when unset or unreadable.
#[must_use]
pub fn load(storage: &dyn Storage) -> ThemeMode {
    storage
        .get(THEME_KEY)
        .ok()
        .flatten()
        .and_then(|value| value.parse().ok())
        .unwrap_or_default()
}

/// # Errors
/// Returns an error if the preference cannot be persisted.
pub fn save(storage: &dyn Storage, mode: ThemeMode) -> Result<(), storage::Error> {
    storage.set(THEME_KEY, mode.as_str())
}

/// # Errors
/// Returns an error if the preference cannot be persisted.
pub fn toggle(storage: &dyn Storage) -> Result<ThemeMode, storage::Error> {
    let mode = load(storage).toggled();
    save(storage, mode)?;
    Ok(mode)
}
