//! Form controller state.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::debounce::Debouncer;
use crate::error::ApiError;
use crate::prefs::PreferenceStore;

use super::field::{FieldView, FormField, RenderedField};
use super::result::{FieldError, ValidationResult};
use super::value::{FieldValue, FieldValues};

/// Quiet period before an edited draft is written.
pub const DEFAULT_DRAFT_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Failure reported by a submit function.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct SubmitError {
    pub message: String,
}

impl SubmitError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for SubmitError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for SubmitError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<ApiError> for SubmitError {
    fn from(err: ApiError) -> Self {
        Self::new(err.to_string())
    }
}

/// What happened to a submit attempt.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The submit function succeeded. The owner should close the form.
    Saved,
    /// Validation failed; the submit function was not called.
    Invalid(Vec<FieldError>),
    /// A previous submit is still in flight.
    AlreadySubmitting,
    /// The submit function failed. Values are kept for a retry.
    Failed(SubmitError),
}

impl SubmitOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}

/// Configuration for a form instance.
#[derive(Debug, Clone)]
pub struct FormConfig {
    pub title: String,
    /// Keep unsaved edits under `draft_key`. Set for create forms only.
    pub persist_draft: bool,
    pub draft_key: Option<String>,
    pub draft_quiet_period: Duration,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            persist_draft: false,
            draft_key: None,
            draft_quiet_period: DEFAULT_DRAFT_QUIET_PERIOD,
        }
    }
}

impl FormConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Persist drafts under `key`.
    pub fn with_draft(mut self, key: impl Into<String>) -> Self {
        self.draft_key = Some(key.into());
        self.persist_draft = true;
        self
    }

    pub fn with_draft_quiet_period(mut self, period: Duration) -> Self {
        self.draft_quiet_period = period;
        self
    }
}

/// Snapshot of a form's editable state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormDraftState {
    pub field_values: FieldValues,
    pub field_errors: BTreeMap<String, String>,
    pub is_submitting: bool,
}

type SubmitFn = Arc<dyn Fn(FieldValues) -> BoxFuture<'static, Result<(), SubmitError>> + Send + Sync>;

#[derive(Debug, Default)]
struct FormInner {
    open: bool,
    values: FieldValues,
    errors: BTreeMap<String, String>,
}

/// Draft values tagged with the clear epoch they were edited in.
type DraftWrite = (u64, FieldValues);

/// Orders draft writes against draft removal.
///
/// `epoch` only changes while `io` is held, so a write that reaches the
/// store after a removal sees the bump and is skipped.
#[derive(Debug, Default)]
struct DraftSync {
    io: Mutex<()>,
    epoch: AtomicU64,
}

/// Clears the submitting flag when a submit settles or is dropped.
struct SubmittingGuard<'a>(&'a AtomicBool);

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Controller for a schema-driven form.
///
/// Owns field values and errors, gates submission behind validation, and
/// optionally keeps an unsaved draft in the [`PreferenceStore`]. Cheap to
/// clone; clones share state.
///
/// # Example
///
/// ```ignore
/// let form = FormController::new(
///     vec![
///         FormField::text("name").label("Name").required(),
///         FormField::email("email").validator(rules::email("Invalid email")),
///     ],
///     FormConfig::new("New user"),
///     move |values| {
///         let client = client.clone();
///         async move { client.create(Resource::Users, &values).await.map(|_| ()).map_err(Into::into) }
///     },
/// );
///
/// form.open(None).await;
/// form.set_field_value("name", "Ada");
/// if form.submit().await.is_saved() {
///     form.close().await;
/// }
/// ```
#[derive(Clone)]
pub struct FormController {
    schema: Arc<Vec<FormField>>,
    config: Arc<FormConfig>,
    inner: Arc<RwLock<FormInner>>,
    submitting: Arc<AtomicBool>,
    persist_draft: Arc<AtomicBool>,
    on_submit: SubmitFn,
    store: Option<PreferenceStore>,
    draft_writer: Option<Arc<Debouncer<DraftWrite>>>,
    draft_sync: Arc<DraftSync>,
}

impl std::fmt::Debug for FormController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormController")
            .field("title", &self.config.title)
            .field("state", &self.draft_state())
            .finish_non_exhaustive()
    }
}

impl FormController {
    /// Create a closed form whose fields hold their defaults.
    pub fn new<F, Fut>(schema: Vec<FormField>, config: FormConfig, on_submit: F) -> Self
    where
        F: Fn(FieldValues) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), SubmitError>> + Send + 'static,
    {
        let persist_draft = config.persist_draft;
        let form = Self {
            schema: Arc::new(schema),
            config: Arc::new(config),
            inner: Arc::new(RwLock::new(FormInner::default())),
            submitting: Arc::new(AtomicBool::new(false)),
            persist_draft: Arc::new(AtomicBool::new(persist_draft)),
            on_submit: Arc::new(move |values| on_submit(values).boxed()),
            store: None,
            draft_writer: None,
            draft_sync: Arc::default(),
        };
        form.initialize(&FieldValues::new());
        form
    }

    /// Attach the store drafts are kept in.
    pub fn with_store(mut self, store: PreferenceStore) -> Self {
        if let Some(key) = self.config.draft_key.clone() {
            let writer_store = store.clone();
            let sync = Arc::clone(&self.draft_sync);
            let writer = Debouncer::new_async(
                self.config.draft_quiet_period,
                move |(epoch, values): DraftWrite| {
                    let store = writer_store.clone();
                    let key = key.clone();
                    let sync = Arc::clone(&sync);
                    async move {
                        let _io = sync.io.lock().await;
                        if sync.epoch.load(Ordering::SeqCst) != epoch {
                            log::debug!("skipping draft write for `{key}`: draft was cleared");
                            return;
                        }
                        store.set(&key, &values).await;
                    }
                },
            );
            self.draft_writer = Some(Arc::new(writer));
        }
        self.store = Some(store);
        self
    }

    pub fn title(&self) -> &str {
        &self.config.title
    }

    pub fn schema(&self) -> &[FormField] {
        &self.schema
    }

    fn field(&self, name: &str) -> Option<&FormField> {
        self.schema.iter().find(|f| f.name == name)
    }

    fn read<R>(&self, f: impl FnOnce(&FormInner) -> R) -> R {
        match self.inner.read() {
            Ok(guard) => f(&guard),
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }

    fn drafts_enabled(&self) -> bool {
        self.persist_draft.load(Ordering::SeqCst) && self.draft_writer.is_some()
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Choose whether edits are kept as a draft. Enable for create, disable
    /// for edit.
    pub fn set_persist_draft(&self, persist: bool) {
        self.persist_draft.store(persist, Ordering::SeqCst);
        if !persist && let Some(writer) = &self.draft_writer {
            writer.cancel();
        }
    }

    pub fn persists_draft(&self) -> bool {
        self.persist_draft.load(Ordering::SeqCst)
    }

    /// Seed every schema field from `initial`, falling back to its default,
    /// and clear all errors.
    pub fn initialize(&self, initial: &FieldValues) {
        let values = self
            .schema
            .iter()
            .map(|field| {
                let value = match initial.get(&field.name) {
                    Some(FieldValue::Null) | None => field.initial_value(),
                    Some(value) => value.clone(),
                };
                (field.name.clone(), value)
            })
            .collect();
        if let Ok(mut guard) = self.inner.write() {
            guard.values = values;
            guard.errors.clear();
        }
    }

    /// Open the form.
    ///
    /// With `initial` (edit mode) the fields take those values. Without, a
    /// stored draft is restored when drafts are enabled, otherwise defaults.
    pub async fn open(&self, initial: Option<FieldValues>) {
        let seed = match initial {
            Some(values) => values,
            None => self.load_draft().await.unwrap_or_default(),
        };
        self.initialize(&seed);
        if let Ok(mut guard) = self.inner.write() {
            guard.open = true;
        }
    }

    /// Close the form, saving any pending draft write, and discard its state.
    pub async fn close(&self) {
        if let Some(writer) = &self.draft_writer {
            if self.drafts_enabled() {
                writer.flush().await;
            } else {
                writer.cancel();
            }
        }
        self.initialize(&FieldValues::new());
        if let Ok(mut guard) = self.inner.write() {
            guard.open = false;
        }
    }

    pub fn is_open(&self) -> bool {
        self.read(|inner| inner.open)
    }

    // -------------------------------------------------------------------------
    // Values & errors
    // -------------------------------------------------------------------------

    /// Update a field and clear its error. Unknown fields are ignored.
    pub fn set_field_value(&self, name: &str, value: impl Into<FieldValue>) {
        if self.field(name).is_none() {
            log::warn!("form `{}`: ignoring unknown field `{name}`", self.config.title);
            return;
        }
        let snapshot = match self.inner.write() {
            Ok(mut guard) => {
                guard.values.insert(name.to_string(), value.into());
                guard.errors.remove(name);
                guard.values.clone()
            }
            Err(_) => return,
        };
        if self.drafts_enabled()
            && let Some(writer) = &self.draft_writer
        {
            writer.trigger((self.draft_sync.epoch.load(Ordering::SeqCst), snapshot));
        }
    }

    pub fn value(&self, name: &str) -> Option<FieldValue> {
        self.read(|inner| inner.values.get(name).cloned())
    }

    pub fn values(&self) -> FieldValues {
        self.read(|inner| inner.values.clone())
    }

    pub fn error(&self, name: &str) -> Option<String> {
        self.read(|inner| inner.errors.get(name).cloned())
    }

    pub fn errors(&self) -> BTreeMap<String, String> {
        self.read(|inner| inner.errors.clone())
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    /// Snapshot of values, errors and the submitting flag.
    pub fn draft_state(&self) -> FormDraftState {
        let (field_values, field_errors) =
            self.read(|inner| (inner.values.clone(), inner.errors.clone()));
        FormDraftState {
            field_values,
            field_errors,
            is_submitting: self.is_submitting(),
        }
    }

    // -------------------------------------------------------------------------
    // Validation & submit
    // -------------------------------------------------------------------------

    /// Check every field, replacing the stored errors with the result.
    pub fn validation_result(&self) -> ValidationResult {
        let values = self.values();
        let errors: Vec<FieldError> = self
            .schema
            .iter()
            .filter_map(|field| {
                let value = values
                    .get(&field.name)
                    .cloned()
                    .unwrap_or_else(|| field.initial_value());
                field.check(&value).map(|message| FieldError {
                    field_name: field.name.clone(),
                    message,
                })
            })
            .collect();

        if let Ok(mut guard) = self.inner.write() {
            guard.errors = errors
                .iter()
                .map(|e| (e.field_name.clone(), e.message.clone()))
                .collect();
        }
        ValidationResult::from_errors(errors)
    }

    /// Validate all fields. Returns `true` if none produced an error.
    pub fn validate(&self) -> bool {
        self.validation_result().is_valid()
    }

    /// Validate, then hand the values to the submit function.
    ///
    /// Only one submit runs at a time. On failure the values stay as they
    /// are so the user can retry; on success a stored draft is removed.
    pub async fn submit(&self) -> SubmitOutcome {
        if self.is_submitting() {
            return SubmitOutcome::AlreadySubmitting;
        }
        if let ValidationResult::Invalid(errors) = self.validation_result() {
            return SubmitOutcome::Invalid(errors);
        }
        if self
            .submitting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return SubmitOutcome::AlreadySubmitting;
        }
        let _guard = SubmittingGuard(&self.submitting);

        match (self.on_submit)(self.values()).await {
            Ok(()) => {
                if self.drafts_enabled() {
                    self.remove_draft().await;
                }
                SubmitOutcome::Saved
            }
            Err(e) => {
                log::error!("form `{}` submit failed: {e}", self.config.title);
                SubmitOutcome::Failed(e)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Drafts
    // -------------------------------------------------------------------------

    async fn load_draft(&self) -> Option<FieldValues> {
        if !self.drafts_enabled() {
            return None;
        }
        let store = self.store.as_ref()?;
        let key = self.config.draft_key.as_deref()?;
        let mut draft: FieldValues = store.get(key).await?;
        draft.retain(|name, _| self.field(name).is_some());
        Some(draft)
    }

    async fn remove_draft(&self) {
        if let Some(writer) = &self.draft_writer {
            writer.cancel();
        }
        let _io = self.draft_sync.io.lock().await;
        self.draft_sync.epoch.fetch_add(1, Ordering::SeqCst);
        if let (Some(store), Some(key)) = (&self.store, self.config.draft_key.as_deref()) {
            store.remove(key).await;
        }
    }

    /// Drop the stored draft and reset every field to its default.
    pub async fn clear_draft(&self) {
        self.remove_draft().await;
        self.initialize(&FieldValues::new());
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Describe one field for a rendering surface.
    pub fn render_field(&self, name: &str) -> Option<RenderedField> {
        let field = self.field(name)?;
        let disabled = self.is_submitting();
        self.read(|inner| {
            let fallback = field.initial_value();
            let value = inner.values.get(name).unwrap_or(&fallback);
            let view = FieldView {
                name: &field.name,
                label: &field.label,
                value,
                error: inner.errors.get(name).map(String::as_str),
                required: field.required,
                disabled,
            };
            Some(field.render(&view))
        })
    }

    /// Describe every field, in schema order.
    pub fn render(&self) -> Vec<RenderedField> {
        self.schema
            .iter()
            .filter_map(|field| self.render_field(&field.name))
            .collect()
    }
}
