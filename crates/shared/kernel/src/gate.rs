use crate::settings::FeatureSettings;
use decl_domain::features::FeatureKind;
use decl_registry::FeatureGate;
use fxhash::FxHashSet;

/// A [`FeatureGate`] driven by [`FeatureSettings`]. Names match case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct SettingsGate {
    entries: FxHashSet<String>,
    compounds: FxHashSet<String>,
    disable_all: bool,
}

impl SettingsGate {
    #[must_use]
    pub fn new(settings: &FeatureSettings) -> Self {
        let fold = |names: &[String]| -> FxHashSet<String> {
            names.iter().map(|name| name.to_lowercase()).collect()
        };
        Self {
            entries: fold(&settings.disabled_entries),
            compounds: fold(&settings.disabled_compounds),
            disable_all: settings.disable_all,
        }
    }
}

impl From<&FeatureSettings> for SettingsGate {
    fn from(settings: &FeatureSettings) -> Self {
        Self::new(settings)
    }
}

impl FeatureGate for SettingsGate {
    fn is_enabled(&self, kind: FeatureKind, name: &str) -> bool {
        if self.disable_all {
            return false;
        }
        let disabled = match kind {
            FeatureKind::Entry => &self.entries,
            FeatureKind::Compound => &self.compounds,
        };
        !disabled.contains(&name.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_gated_separately() {
        let gate = SettingsGate::new(&FeatureSettings {
            disabled_entries: vec!["Pickaxe".to_owned()],
            disabled_compounds: vec!["furnace".to_owned()],
            disable_all: false,
        });

        assert!(!gate.is_enabled(FeatureKind::Entry, "pickaxe"));
        assert!(gate.is_enabled(FeatureKind::Compound, "pickaxe"));
        assert!(!gate.is_enabled(FeatureKind::Compound, "FURNACE"));
        assert!(gate.is_enabled(FeatureKind::Entry, "shovel"));
    }

    #[test]
    fn disable_all_wins() {
        let gate = SettingsGate::new(&FeatureSettings { disable_all: true, ..Default::default() });
        assert!(!gate.is_enabled(FeatureKind::Entry, "anything"));
        assert!(!gate.is_enabled(FeatureKind::Compound, "anything"));
    }
}
