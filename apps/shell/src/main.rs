mod demo;

use anyhow::Context;
use decl_kernel::SettingsGate;
use decl_kernel::settings::{FeatureSettings, load_settings};
use decl_registry::{MemoryStore, NamespaceRegistry, Registrar};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_subscriber::fmt::layer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const NAMESPACE: &str = "workshop";

#[derive(Debug, Default, Deserialize)]
struct ShellSettings {
    #[serde(default)]
    features: FeatureSettings,
}

fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let settings = shell_settings(std::env::args().nth(1).as_deref())?;

    let registry = NamespaceRegistry::new();
    let store = MemoryStore::new();
    let config = registry.register(NAMESPACE, store.clone(), demo::WorkshopSettings::default())?;
    for category in config.categories() {
        for name in config.names(&category) {
            if let Some(property) = config.property(&category, &name) {
                info!(category = %category, name = %name, value = %property.value(), "Property");
            }
        }
    }

    let registrar = Registrar::new(NAMESPACE, SettingsGate::new(&settings.features));
    let factory = demo::factory();
    let mut target = demo::LoggingTarget::default();

    let mut gadgets = demo::Gadgets::default();
    let report = registrar.register_entries(&mut gadgets, &demo::gadgets(), &factory, &mut target)?;
    info!(constructed = ?report.constructed, disabled = ?report.disabled, "Gadgets scanned");
    if let Some(torch) = &gadgets.torch {
        info!(label = %torch.label(), "Torch display name");
    }

    let mut machines = demo::Machines::default();
    let report = registrar.register_compounds(&mut machines, &demo::machines(), &factory, &mut target)?;
    info!(constructed = ?report.constructed, disabled = ?report.disabled, "Machines scanned");
    if let Some(smelter) = &machines.smelter {
        info!(label = %smelter.label(), "Smelter display name");
    }
    if let Some(lamp) = &gadgets.lamp {
        info!(label = %lamp.label(), "Lamp display name");
    }

    let saved = config.save()?;
    info!(
        saved,
        flushes = store.flush_count(),
        registered = target.registered,
        namespaces = ?registry.namespaces(),
        "Done"
    );

    Ok(())
}

/// Settings named on the command line must load; without one, a missing default file is tolerated.
fn shell_settings(path: Option<&str>) -> anyhow::Result<ShellSettings> {
    match path {
        Some(path) => load_settings::<ShellSettings>(Some(path))
            .with_context(|| format!("Critical: settings at {path} are malformed")),
        None => Ok(load_settings::<ShellSettings>(None::<&str>).unwrap_or_else(|err| {
            warn!(error = %err, "No settings file, every entry stays enabled");
            ShellSettings::default()
        })),
    }
}

fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).from_env_lossy();
    tracing_subscriber::registry().with(filter).with(layer().compact().with_ansi(true)).try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    #[serial]
    fn named_settings_file_must_parse() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shell.toml");
        fs::write(&path, "[features]\ndisabled_entries = 42\n").unwrap();

        let err = shell_settings(path.to_str()).unwrap_err();
        assert!(err.to_string().starts_with("Critical: settings at"), "unexpected error: {err}");
    }

    #[test]
    #[serial]
    fn named_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        assert!(shell_settings(path.to_str()).is_err());
    }

    #[test]
    #[serial]
    fn named_settings_file_drives_features() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shell.toml");
        fs::write(&path, "[features]\ndisabled_entries = [\"torch\"]\n").unwrap();

        let settings = shell_settings(path.to_str()).unwrap();
        assert_eq!(settings.features.disabled_entries, ["torch"]);
    }
}
