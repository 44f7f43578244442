//! The generic field scan shared by every registration kind.
//!
//! A scan walks the fields of a [`Holder`] once, in declaration order. For every field whose
//! slot the [`ElementKind`] accepts it:
//!
//! 1. skips fields marked ignored;
//! 2. requires a tag of the processor's tag kind (warning when missing, unless the processor
//!    opts out);
//! 3. resolves the entry name and consults the processor's enablement policy;
//! 4. asks the [`Factory`] for an instance, where "no instance" is a silent skip;
//! 5. binds the instance into the field, where failure aborts the scan;
//! 6. hands the instance to [`Processor::on_constructed`].
//!
//! Re-running a scan constructs and processes everything again; callers scan each holder once.

use crate::bind::BindError;
use crate::error::RegistryError;
use decl_domain::descriptor::TypeDescriptor;
use decl_domain::holder::{Field, Holder};
use decl_domain::tags::FieldTag;
use std::any::Any;
use tracing::{debug, info, warn};

/// Decides which fields are candidates and how values are written into them.
pub trait ElementKind {
    /// What factories produce for this kind.
    type Raw;
    /// What processors receive once the value is bound.
    type Instance;

    /// Name of the accepted element type, for diagnostics.
    fn describe(&self) -> &str;

    /// The element type a candidate field declares, or `None` if the field is not a candidate.
    fn declared(&self, field: &Field<'_>) -> Option<TypeDescriptor>;

    /// Writes `raw` into the field.
    ///
    /// # Errors
    /// Returns a [`BindError`] when the field is frozen or the value does not fit its slot.
    fn bind(&self, field: &mut Field<'_>, raw: Self::Raw) -> Result<Self::Instance, BindError>;
}

/// The field a factory is asked to fill.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub field: &'static str,
    pub declared: TypeDescriptor,
    current: &'a (dyn Any + 'static),
}

impl Candidate<'_> {
    /// The value currently held by the field.
    #[must_use]
    pub fn current<T: Any>(&self) -> Option<&T> {
        self.current.downcast_ref::<T>()
    }

    #[must_use]
    pub fn current_any(&self) -> &(dyn Any + 'static) {
        self.current
    }
}

/// Builds values for named entries.
pub trait Factory<R> {
    /// Returns `None` to skip the entry; this is a policy decision, not a failure.
    fn construct(&self, name: &str, candidate: &Candidate<'_>) -> Option<R>;
}

impl<R, F> Factory<R> for F
where
    F: Fn(&str, &Candidate<'_>) -> Option<R>,
{
    fn construct(&self, name: &str, candidate: &Candidate<'_>) -> Option<R> {
        self(name, candidate)
    }
}

/// The per-kind side of a scan: naming, gating and what happens after binding.
pub trait Processor {
    type Instance;
    type Tag: FieldTag;

    /// Whether a candidate without a tag deserves a warning.
    fn warn_untagged(&self) -> bool {
        true
    }

    fn entry_name(&self, tag: &Self::Tag) -> String;

    fn is_enabled(&self, name: &str) -> bool;

    /// Finishes registration of a bound instance.
    ///
    /// # Errors
    /// Any error aborts the scan and is returned to the caller unchanged.
    fn on_constructed(
        &mut self,
        instance: Self::Instance,
        tag: &Self::Tag,
        field: &mut Field<'_>,
    ) -> Result<(), RegistryError>;
}

/// What a scan did with the fields of a holder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Fields that were bound and processed, in scan order.
    pub constructed: Vec<&'static str>,
    /// Candidate fields skipped because of the ignore marker.
    pub ignored: Vec<&'static str>,
    /// Candidate fields without the required tag.
    pub untagged: Vec<&'static str>,
    /// Entry names turned off by the enablement policy.
    pub disabled: Vec<String>,
    /// Entry names the factory declined to build.
    pub declined: Vec<String>,
}

impl ScanReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constructed.is_empty()
            && self.ignored.is_empty()
            && self.untagged.is_empty()
            && self.disabled.is_empty()
            && self.declined.is_empty()
    }
}

/// Runs one scan over `holder`.
///
/// # Errors
/// Returns [`RegistryError::FieldBinding`] when a constructed value cannot be written into its
/// field, or whatever [`Processor::on_constructed`] fails with. Fields after the failing one are
/// not visited.
pub fn scan<K, F, P>(
    holder: &mut dyn Holder,
    kind: &K,
    factory: &F,
    processor: &mut P,
) -> Result<ScanReport, RegistryError>
where
    K: ElementKind + ?Sized,
    F: Factory<K::Raw> + ?Sized,
    P: Processor<Instance = K::Instance>,
{
    let holder_type = holder.descriptor();
    let mut report = ScanReport::default();

    for mut field in holder.fields() {
        let Some(declared) = kind.declared(&field) else { continue };

        if field.is_ignored() {
            report.ignored.push(field.name());
            continue;
        }

        let Some(tag) = field.tag::<P::Tag>().cloned() else {
            if processor.warn_untagged() {
                warn!(
                    holder = %holder_type,
                    field = field.name(),
                    capability = kind.describe(),
                    tag = P::Tag::KIND,
                    "Field has a registrable type but no tag"
                );
            }
            report.untagged.push(field.name());
            continue;
        };

        let name = processor.entry_name(&tag);
        if !processor.is_enabled(&name) {
            info!(entry = %name, field = field.name(), "Entry is disabled");
            report.disabled.push(name);
            continue;
        }

        let candidate = Candidate { field: field.name(), declared, current: field.slot() };
        let Some(raw) = factory.construct(&name, &candidate) else {
            debug!(entry = %name, field = field.name(), "Factory produced no instance");
            report.declined.push(name);
            continue;
        };

        let instance = kind.bind(&mut field, raw).map_err(|source| RegistryError::FieldBinding {
            source,
            context: Some(format!("{holder_type}::{}", field.name()).into()),
        })?;

        processor.on_constructed(instance, &tag, &mut field)?;
        report.constructed.push(field.name());
    }

    Ok(report)
}
