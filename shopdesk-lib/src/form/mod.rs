//! Schema-driven forms.
//!
//! A form is a list of [`FormField`]s plus a submit function. The
//! [`FormController`] tracks values and errors, validates before submitting
//! and can keep unsaved create-form edits as a draft.

mod field;
mod result;
pub mod rules;
mod state;
mod value;

pub use field::{
    CustomRenderer, FieldKind, FieldView, FormField, InputType, RenderedField, SelectOption,
    TextInput,
};
pub use result::{FieldError, ValidationResult};
pub use rules::Validator;
pub use state::{
    DEFAULT_DRAFT_QUIET_PERIOD, FormConfig, FormController, FormDraftState, SubmitError,
    SubmitOutcome,
};
pub use value::{FieldValue, FieldValues};
