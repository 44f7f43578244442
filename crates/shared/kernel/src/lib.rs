//! Kernel utilities shared by hosts of the declaration engine.
//! Keep this crate lightweight: settings loading and the settings-driven feature gate.
//!
//! ## Settings loading
//! ```rust,ignore
//! use decl_kernel::settings::{FeatureSettings, load_settings};
//!
//! let features: FeatureSettings = load_settings(Some("decl.toml"))?;
//! let gate = decl_kernel::SettingsGate::new(&features);
//! ```

pub mod gate;
pub mod settings;

pub use decl_domain as domain;
pub use decl_registry as registry;
pub use gate::SettingsGate;
