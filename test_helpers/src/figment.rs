//! Shared helpers for loading workbench settings inside `figment::Jail`.
//!
//! A jail changes into a scratch directory and restores the environment when
//! it ends, so settings files and `WORKBENCH_*` variables created in the
//! closure never leak into other tests.

use anyhow::{Result, anyhow};
use workbench::{SETTINGS_FILE, Settings};

/// Executes `f` inside a [`figment::Jail`], returning the closure's output.
///
/// # Errors
///
/// Returns an error if the jail initialisation fails or the closure returns a
/// [`figment::error::Error`].
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> figment::error::Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|j| {
        output = Some(f(j)?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure did not return a value"))
}

/// Converts any error implementing [`ToString`] into a [`figment::Error`].
#[expect(
    clippy::needless_pass_by_value,
    reason = "used with map_err, which hands over the error by value"
)]
pub fn figment_error<E: ToString>(err: E) -> figment::Error {
    figment::Error::from(err.to_string())
}

/// Writes `contents` to the settings file in the jail's directory.
///
/// # Errors
///
/// Returns an error when the file cannot be created.
pub fn write_settings(jail: &mut figment::Jail, contents: &str) -> figment::error::Result<()> {
    jail.create_file(SETTINGS_FILE, contents).map(drop)
}

/// Loads [`Settings`] from the jail's working directory and environment.
///
/// # Errors
///
/// Returns the settings failure as a [`figment::Error`].
pub fn load_settings() -> figment::error::Result<Settings> {
    Settings::load().map_err(figment_error)
}
