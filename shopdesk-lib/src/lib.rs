//! Shopdesk back-office library
//!
//! Headless building blocks for the e-commerce admin screens: a
//! server-paginated grid controller with persisted layout preferences, a
//! schema-driven form controller, the preference store both rely on, and the
//! wire contracts of the REST backend.

pub mod api;
pub mod debounce;
pub mod error;
pub mod form;
pub mod grid;
pub mod prefs;

pub use debounce::Debouncer;
pub use form::{FormController, SubmitOutcome};
pub use grid::{GridController, GridParams};
pub use prefs::PreferenceStore;
