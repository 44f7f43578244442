mod features;

use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

pub use features::FeatureSettings;

/// Environment variables overriding file settings start with `DECL__`.
pub const ENV_PREFIX: &str = "DECL";
const DEFAULT_PATH: &str = "decl";

/// Custom error type for settings loading.
#[decl_derive::decl_error]
pub enum SettingsError {
    #[error("Settings error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads settings from a file overlaid with environment overrides.
///
/// 1. **Base File**: `path`, or `decl` in the working directory. The extension picks the format
///    (`decl.toml`, `decl.json`, `decl.yaml`, ...).
/// 2. **Environment Overrides**: variables prefixed with `DECL__`; nested keys are separated by
///    double underscores (`DECL__FEATURES__DISABLE_ALL=true` maps to `features.disable_all`).
///
/// # Errors
/// Returns [`SettingsError::Config`] if the file is missing or the merged settings do not match
/// `T`.
///
/// # Example
/// ```rust
/// use decl_kernel::settings::{FeatureSettings, load_settings};
///
/// #[derive(Default, serde::Deserialize)]
/// struct Settings {
///     #[serde(default)]
///     features: FeatureSettings,
/// }
///
/// let settings: Settings = load_settings(Some("config/missing")).unwrap_or_default();
/// assert!(!settings.features.disable_all);
/// ```
pub fn load_settings<T>(path: Option<impl AsRef<Path>>) -> Result<T, SettingsError>
where
    T: DeserializeOwned,
{
    load_settings_with(path, environment())
}

/// The environment source [`load_settings`] overlays on the file.
///
/// Feature lists are comma separated: `DECL__FEATURES__DISABLED_ENTRIES=lamp,torch`.
#[must_use]
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("features.disabled_entries")
        .with_list_parse_key("features.disabled_compounds")
        .convert_case(config::Case::Snake)
}

/// Like [`load_settings`], with an explicit environment source.
///
/// # Errors
/// See [`load_settings`].
pub fn load_settings_with<T>(path: Option<impl AsRef<Path>>, environment: Environment) -> Result<T, SettingsError>
where
    T: DeserializeOwned,
{
    let effective_path = path.map_or_else(|| PathBuf::from(DEFAULT_PATH), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(environment);

    info!("Loading settings from {}", effective_path.display());

    let settings = builder
        .build()
        .context("Failed to build settings")?
        .try_deserialize::<T>()
        .context("Failed to deserialize settings")?;

    Ok(settings)
}
