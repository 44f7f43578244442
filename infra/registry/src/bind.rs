use std::borrow::Cow;

/// Reasons a value cannot be written back into a holder field.
#[decl_derive::decl_error]
pub enum BindError {
    #[error("Field is read-only{}: {message}", format_context(.context))]
    ReadOnly { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The field's storage is not the type the capability expected.
    #[error("Slot type mismatch{}: {message}", format_context(.context))]
    SlotMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The factory produced an instance of a different type than the field declares.
    #[error("Instance type mismatch{}: {message}", format_context(.context))]
    InstanceMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
