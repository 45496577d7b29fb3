//! Runtime settings for builder contexts.
//!
//! Settings are layered with `figment`: built-in defaults first, then
//! `workbench.toml` in the working directory, then `WORKBENCH_*`
//! environment variables.

use camino::Utf8Path;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default settings file name, looked up in the working directory.
pub const SETTINGS_FILE: &str = "workbench.toml";

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "WORKBENCH_";

/// What to do with a class or counter override that no declaration consumed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DroppedOverridePolicy {
    /// Drop it silently.
    #[default]
    Ignore,
    /// Drop it and emit a `tracing` warning.
    Warn,
}

/// Settings consulted by [`Builders`](crate::Builders).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Handling of unconsumed `use_class`/`count_with` overrides.
    pub dropped_override: DroppedOverridePolicy,
}

impl Settings {
    /// Loads settings from `workbench.toml` and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`WorkbenchError::Settings`](crate::WorkbenchError::Settings)
    /// when a provider yields values that do not deserialize.
    pub fn load() -> Result<Self> {
        Self::load_from(Utf8Path::new(SETTINGS_FILE))
    }

    /// Loads settings using `path` as the settings file.
    ///
    /// A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`WorkbenchError::Settings`](crate::WorkbenchError::Settings)
    /// when a provider yields values that do not deserialize.
    pub fn load_from(path: &Utf8Path) -> Result<Self> {
        Self::from_figment(&Self::figment(path))
    }

    /// Extracts settings from an already assembled figment.
    ///
    /// # Errors
    ///
    /// Returns [`WorkbenchError::Settings`](crate::WorkbenchError::Settings)
    /// when extraction fails.
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        figment.extract().map_err(|err| Box::new(err).into())
    }

    /// The provider stack used by [`Settings::load_from`].
    #[must_use]
    pub fn figment(path: &Utf8Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_std_path()))
            .merge(Env::prefixed(ENV_PREFIX))
    }
}
