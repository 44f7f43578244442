use crate::bind::BindError;
use crate::scanner::ElementKind;
use decl_domain::descriptor::TypeDescriptor;
use decl_domain::holder::Field;
use fxhash::FxHashMap;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A type-erased instance as produced by factories.
pub type RawInstance = Arc<dyn Any + Send + Sync>;

type Binder<E> =
    Box<dyn Fn(&mut (dyn Any + 'static), RawInstance) -> Result<Arc<E>, BindError> + Send + Sync>;

struct Admitted<E: ?Sized> {
    declared: TypeDescriptor,
    bind: Binder<E>,
}

/// The object element capability: which concrete types count as an `E`.
///
/// Rust has no runtime subtyping query, so every concrete type is admitted explicitly together
/// with its upcast. A field is a candidate when its slot is `Option<Arc<T>>` for an admitted `T`.
///
/// # Example
/// ```rust
/// use decl_registry::Capability;
/// use std::sync::Arc;
///
/// trait Item: Send + Sync {}
/// struct Pickaxe;
/// impl Item for Pickaxe {}
///
/// let items = Capability::<dyn Item>::new("Item").admit::<Pickaxe>(|item| item as Arc<dyn Item>);
/// assert!(items.admits::<Pickaxe>());
/// ```
pub struct Capability<E: ?Sized + 'static> {
    name: &'static str,
    admitted: FxHashMap<TypeId, Admitted<E>>,
}

impl<E: ?Sized + 'static> Capability<E> {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self { name, admitted: FxHashMap::default() }
    }

    /// Admits `T`, stored in fields of type `Option<Arc<T>>`.
    #[must_use]
    pub fn admit<T: Any + Send + Sync>(mut self, upcast: fn(Arc<T>) -> Arc<E>) -> Self {
        let bind: Binder<E> = Box::new(move |slot, raw| {
            let slot = slot.downcast_mut::<Option<Arc<T>>>().ok_or_else(|| {
                BindError::SlotMismatch {
                    message: std::any::type_name::<Option<Arc<T>>>().into(),
                    context: Some("Unexpected field storage".into()),
                }
            })?;
            let instance = raw.downcast::<T>().map_err(|_| BindError::InstanceMismatch {
                message: format!("expected {}", std::any::type_name::<T>()).into(),
                context: None,
            })?;

            *slot = Some(Arc::clone(&instance));
            Ok(upcast(instance))
        });

        self.admitted.insert(
            TypeId::of::<Option<Arc<T>>>(),
            Admitted { declared: TypeDescriptor::of::<T>(), bind },
        );
        self
    }

    #[must_use]
    pub fn admits<T: Any>(&self) -> bool {
        self.admitted.contains_key(&TypeId::of::<Option<Arc<T>>>())
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<E: ?Sized + 'static> ElementKind for Capability<E> {
    type Raw = RawInstance;
    type Instance = Arc<E>;

    fn describe(&self) -> &str {
        self.name
    }

    fn declared(&self, field: &Field<'_>) -> Option<TypeDescriptor> {
        self.admitted.get(&field.slot_type().id()).map(|admitted| admitted.declared)
    }

    fn bind(&self, field: &mut Field<'_>, raw: RawInstance) -> Result<Arc<E>, BindError> {
        let admitted = self.admitted.get(&field.slot_type().id()).ok_or_else(|| {
            BindError::SlotMismatch {
                message: field.slot_type().name().into(),
                context: Some(format!("not a {} slot", self.name).into()),
            }
        })?;
        let name = field.name();
        let slot = field
            .slot_mut()
            .ok_or_else(|| BindError::ReadOnly { message: name.into(), context: None })?;

        (admitted.bind)(slot, raw)
    }
}

impl<E: ?Sized + 'static> fmt::Debug for Capability<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.admitted.values().map(|admitted| admitted.declared.name()).collect();
        types.sort_unstable();
        f.debug_struct("Capability").field("name", &self.name).field("admitted", &types).finish()
    }
}
