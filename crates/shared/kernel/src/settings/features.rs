use serde::{Deserialize, Serialize};

/// Which object entries the host turned off, by bare entry name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureSettings {
    /// Simple entries that are never registered.
    pub disabled_entries: Vec<String>,
    /// Compound entries that are never registered.
    pub disabled_compounds: Vec<String>,
    /// Turns every entry off; configuration properties are unaffected.
    pub disable_all: bool,
}
