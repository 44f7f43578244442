use decl_domain::features::FeatureKind;
use decl_kernel::SettingsGate;
use config::Map;
use decl_kernel::settings::{
    FeatureSettings, SettingsError, environment, load_settings, load_settings_with,
};
use decl_registry::FeatureGate;
use serde::Deserialize;
use serial_test::serial;
use std::fs;
use tempfile::tempdir;

#[derive(Debug, Default, Deserialize)]
struct HostSettings {
    #[serde(default)]
    features: FeatureSettings,
    #[serde(default)]
    name: String,
}

const SETTINGS: &str = r#"
name = "demo"

[features]
disabled_entries = ["Shovel"]
disabled_compounds = ["furnace"]
"#;

#[test]
#[serial]
fn file_settings_drive_the_gate() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("decl.toml");
    fs::write(&path, SETTINGS)?;

    let settings: HostSettings = load_settings(Some(&path))?;
    assert_eq!(settings.name, "demo");
    assert_eq!(settings.features.disabled_entries, ["Shovel"]);
    assert!(!settings.features.disable_all);

    let gate = SettingsGate::new(&settings.features);
    assert!(!gate.is_enabled(FeatureKind::Entry, "shovel"));
    assert!(gate.is_enabled(FeatureKind::Entry, "pickaxe"));
    assert!(!gate.is_enabled(FeatureKind::Compound, "Furnace"));

    Ok(())
}

#[test]
#[serial]
fn format_follows_the_extension() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("decl.yaml");
    fs::write(&path, "name: yaml\nfeatures:\n  disable_all: true\n")?;

    let settings: HostSettings = load_settings(Some(&path))?;
    assert_eq!(settings.name, "yaml");
    assert!(settings.features.disable_all);
    assert!(!SettingsGate::new(&settings.features).is_enabled(FeatureKind::Entry, "pickaxe"));

    Ok(())
}

#[test]
#[serial]
fn missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    let result = load_settings::<HostSettings>(Some(dir.path().join("absent.toml")));

    assert!(matches!(result, Err(SettingsError::Config { .. })));
}

#[test]
#[serial]
fn empty_feature_table_defaults_to_everything_enabled() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("decl.json");
    fs::write(&path, r#"{ "name": "json" }"#)?;

    let settings: HostSettings = load_settings(Some(&path))?;
    assert_eq!(settings.features, FeatureSettings::default());
    assert!(SettingsGate::new(&settings.features).is_enabled(FeatureKind::Compound, "furnace"));

    Ok(())
}

fn overrides(vars: &[(&str, &str)]) -> config::Environment {
    let vars: Map<String, String> =
        vars.iter().map(|(key, value)| ((*key).to_owned(), (*value).to_owned())).collect();
    environment().source(Some(vars))
}

#[test]
#[serial]
fn environment_overrides_lists_and_scalars() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("decl.toml");
    fs::write(&path, SETTINGS)?;

    let env = overrides(&[
        ("DECL__FEATURES__DISABLED_ENTRIES", "shovel,Hoe"),
        ("DECL__FEATURES__DISABLED_COMPOUNDS", "chest"),
        ("DECL__NAME", "overridden"),
    ]);
    let settings: HostSettings = load_settings_with(Some(&path), env)?;
    assert_eq!(settings.name, "overridden");
    assert_eq!(settings.features.disabled_entries, ["shovel", "Hoe"]);
    assert_eq!(settings.features.disabled_compounds, ["chest"]);

    let gate = SettingsGate::new(&settings.features);
    assert!(!gate.is_enabled(FeatureKind::Entry, "hoe"));
    assert!(gate.is_enabled(FeatureKind::Compound, "furnace"));
    assert!(!gate.is_enabled(FeatureKind::Compound, "chest"));

    Ok(())
}

#[test]
#[serial]
fn single_list_item_and_boolean_from_environment() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("decl.toml");
    fs::write(&path, SETTINGS)?;

    let env = overrides(&[
        ("DECL__FEATURES__DISABLED_ENTRIES", "pickaxe"),
        ("DECL__FEATURES__DISABLE_ALL", "true"),
    ]);
    let settings: HostSettings = load_settings_with(Some(&path), env)?;
    assert_eq!(settings.features.disabled_entries, ["pickaxe"]);
    assert_eq!(settings.features.disabled_compounds, ["furnace"]);
    assert!(settings.features.disable_all);

    Ok(())
}
