use crate::config::property::{PropertyBinding, PropertyKey};
use fxhash::FxHashMap;

/// The properties of one namespace, in registration order.
///
/// Lookups fold case; enumeration returns categories and names as they were declared. When two
/// declarations of a category differ only in case, the first one seen is reported.
#[derive(Debug, Default)]
pub struct PropertyTable {
    bindings: Vec<PropertyBinding>,
    index: FxHashMap<PropertyKey, usize>,
    categories: Vec<String>,
}

impl PropertyTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a binding; hands it back if its key is already taken.
    ///
    /// # Errors
    /// Returns the rejected binding when another binding has the same key.
    pub fn insert(&mut self, binding: PropertyBinding) -> Result<(), PropertyBinding> {
        if self.index.contains_key(binding.key()) {
            return Err(binding);
        }

        if !self.has_category(binding.category()) {
            self.categories.push(binding.category().to_owned());
        }
        self.index.insert(binding.key().clone(), self.bindings.len());
        self.bindings.push(binding);
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, key: &PropertyKey) -> bool {
        self.index.contains_key(key)
    }

    #[must_use]
    pub fn get(&self, category: &str, name: &str) -> Option<&PropertyBinding> {
        self.index.get(&PropertyKey::new(category, name)).map(|&slot| &self.bindings[slot])
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }

    /// Names declared under `category`, which is matched case-insensitively.
    pub fn names<'t>(&'t self, category: &str) -> impl Iterator<Item = &'t str> + use<'t> {
        let category = category.to_lowercase();
        self.bindings
            .iter()
            .filter(move |binding| binding.key().category() == category)
            .map(PropertyBinding::name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyBinding> {
        self.bindings.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn has_category(&self, category: &str) -> bool {
        let folded = category.to_lowercase();
        self.bindings.iter().any(|binding| binding.key().category() == folded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::values::ValueAccessor;
    use decl_domain::value::PropertyValue;

    fn binding(category: &str, name: &str) -> PropertyBinding {
        PropertyBinding::new(
            "mod",
            category,
            name,
            "field",
            ValueAccessor::of::<i32>(),
            PropertyValue::Int(1),
            "",
        )
    }

    #[test]
    fn enumeration_keeps_declared_case() {
        let mut table = PropertyTable::new();
        table.insert(binding("General", "maxSize")).unwrap();
        table.insert(binding("general", "minSize")).unwrap();
        table.insert(binding("Client", "scale")).unwrap();

        assert_eq!(table.categories().collect::<Vec<_>>(), ["General", "Client"]);
        assert_eq!(table.names("GENERAL").collect::<Vec<_>>(), ["maxSize", "minSize"]);
        assert_eq!(table.names("missing").count(), 0);
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let mut table = PropertyTable::new();
        let first = binding("general", "size");
        table.insert(first.clone()).unwrap();

        let rejected = table.insert(binding("GENERAL", "Size")).unwrap_err();
        assert_ne!(rejected, first);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("General", "SIZE"), Some(&first));
    }
}
