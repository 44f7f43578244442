use decl_domain::features::FeatureKind;

/// Decides whether a named entry of a given kind should be registered at all.
///
/// Entries are queried by their bare name, before any namespace is prepended.
pub trait FeatureGate: Send + Sync {
    fn is_enabled(&self, kind: FeatureKind, name: &str) -> bool;
}

impl<F> FeatureGate for F
where
    F: Fn(FeatureKind, &str) -> bool + Send + Sync,
{
    fn is_enabled(&self, kind: FeatureKind, name: &str) -> bool {
        self(kind, name)
    }
}

/// A gate that enables everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl FeatureGate for AllowAll {
    fn is_enabled(&self, _kind: FeatureKind, _name: &str) -> bool {
        true
    }
}
