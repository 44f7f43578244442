use crate::config::namespace::NamespaceConfig;
use crate::config::values::ConfigValues;
use crate::error::RegistryError;
use crate::scanner::ScanReport;
use crate::store::ConfigStore;
use decl_domain::holder::Holder;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;
use tracing::info;

struct RegistryInner {
    values: ConfigValues,
    namespaces: RwLock<FxHashMap<String, NamespaceConfig>>,
}

/// All configuration namespaces of the process, keyed by lower-cased namespace id.
///
/// Create one registry at startup and pass clones to whoever registers or reads configuration.
/// A namespace is registered once and never removed.
#[derive(Clone)]
pub struct NamespaceRegistry {
    inner: Arc<RegistryInner>,
}

impl Default for NamespaceRegistry {
    fn default() -> Self {
        Self::with_values(ConfigValues::standard())
    }
}

impl NamespaceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry that binds fields of the types in `values` instead of the standard set.
    #[must_use]
    pub fn with_values(values: ConfigValues) -> Self {
        Self {
            inner: Arc::new(RegistryInner { values, namespaces: RwLock::new(FxHashMap::default()) }),
        }
    }

    /// Registers `holder` under `namespace`, binding its properties to `store`.
    ///
    /// # Errors
    /// Returns [`RegistryError::DuplicateNamespace`] if the namespace (ignoring case) is already
    /// registered; nothing is scanned in that case. Errors from the scan are returned as-is and
    /// leave the registry unchanged. The store is not rolled back: properties bound before the
    /// failing field have already been loaded, so their defaults may be seeded and the store
    /// left dirty without ever being flushed.
    pub fn register<S, H>(&self, namespace: &str, store: S, holder: H) -> Result<NamespaceConfig, RegistryError>
    where
        S: ConfigStore + 'static,
        H: Holder,
    {
        self.register_with_report(namespace, store, holder).map(|(config, _)| config)
    }

    /// Like [`Self::register`], also returning what the scan did with each field.
    ///
    /// # Errors
    /// See [`Self::register`].
    pub fn register_with_report<S, H>(
        &self,
        namespace: &str,
        store: S,
        holder: H,
    ) -> Result<(NamespaceConfig, ScanReport), RegistryError>
    where
        S: ConfigStore + 'static,
        H: Holder,
    {
        let key = namespace.to_lowercase();
        if self.inner.namespaces.read().contains_key(&key) {
            return Err(duplicate(namespace));
        }

        let (config, report) =
            NamespaceConfig::build(namespace, Box::new(store), Box::new(holder), &self.inner.values)?;

        match self.inner.namespaces.write().entry(key) {
            Entry::Occupied(_) => return Err(duplicate(namespace)),
            Entry::Vacant(slot) => {
                slot.insert(config.clone());
            },
        }

        info!(
            namespace,
            holder = %config.holder_type(),
            properties = report.constructed.len(),
            "Configuration namespace registered"
        );
        Ok((config, report))
    }

    /// Looks a namespace up, ignoring case.
    #[must_use]
    pub fn get(&self, namespace: &str) -> Option<NamespaceConfig> {
        self.inner.namespaces.read().get(&namespace.to_lowercase()).cloned()
    }

    /// Registered namespace ids as they were registered, sorted.
    #[must_use]
    pub fn namespaces(&self) -> Vec<String> {
        let mut ids: Vec<_> =
            self.inner.namespaces.read().values().map(|config| config.id().to_owned()).collect();
        ids.sort_unstable();
        ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.namespaces.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.namespaces.read().is_empty()
    }
}

impl fmt::Debug for NamespaceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamespaceRegistry")
            .field("namespaces", &self.namespaces())
            .field("values", &self.inner.values)
            .finish()
    }
}

fn duplicate(namespace: &str) -> RegistryError {
    RegistryError::DuplicateNamespace { message: namespace.to_owned().into(), context: None }
}
