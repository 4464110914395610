//! Error types

mod api;

pub use api::*;
pub use crate::form::SubmitError;
pub use crate::prefs::PreferenceError;
