use crate::bind::BindError;
use std::borrow::Cow;

/// Boxed error raised by an external collaborator (persisted store, registration target).
pub type ExternalError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A specialized [`RegistryError`] enum of this crate.
#[decl_derive::decl_error]
pub enum RegistryError {
    /// A namespace id (compared case-insensitively) was registered twice.
    #[error("Namespace already registered{}: {message}", format_context(.context))]
    DuplicateNamespace { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Two fields of one holder resolve to the same (category, name) key.
    #[error("Duplicate property{}: {message}", format_context(.context))]
    DuplicateProperty { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Unknown property{}: {message}", format_context(.context))]
    UnknownProperty { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A value does not fit the kind or range of its property.
    #[error("Invalid property value{}: {message}", format_context(.context))]
    InvalidValue { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A constructed value could not be written into its field; the holder breaks its contract.
    #[error("Field binding failure{}: {source}", format_context(.context))]
    FieldBinding { source: BindError, context: Option<Cow<'static, str>> },

    #[error("External collaborator failure{}: {source}", format_context(.context))]
    External { source: ExternalError, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal registry error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
