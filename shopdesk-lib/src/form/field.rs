//! Form field schema and headless render descriptors.

use std::sync::Arc;

use super::rules::Validator;
use super::value::FieldValue;

/// Flavor of a text input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextInput {
    #[default]
    Plain,
    Email,
    Password,
    Multiline,
}

/// A choice offered by a select field.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub value: FieldValue,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<FieldValue>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Renders a custom field. The caller reports edits back through
/// `FormController::set_field_value`.
pub type CustomRenderer = Arc<dyn Fn(&FieldView<'_>) -> RenderedField + Send + Sync>;

/// What kind of input a field is.
#[derive(Clone)]
pub enum FieldKind {
    Text(TextInput),
    Number,
    Boolean,
    Select(Vec<SelectOption>),
    Date,
    Custom(CustomRenderer),
}

impl std::fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(input) => f.debug_tuple("Text").field(input).finish(),
            Self::Number => f.write_str("Number"),
            Self::Boolean => f.write_str("Boolean"),
            Self::Select(options) => f.debug_tuple("Select").field(options).finish(),
            Self::Date => f.write_str("Date"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl FieldKind {
    /// Value a field of this kind starts with.
    pub fn default_value(&self) -> FieldValue {
        match self {
            Self::Boolean => FieldValue::Bool(false),
            Self::Number => FieldValue::Number(0.0),
            Self::Text(_) | Self::Select(_) | Self::Date | Self::Custom(_) => {
                FieldValue::Text(String::new())
            }
        }
    }
}

/// A form field definition.
#[derive(Clone)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    /// Overrides the kind default.
    pub default: Option<FieldValue>,
    pub validator: Option<Validator>,
}

impl std::fmt::Debug for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormField")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("default", &self.default)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

impl FormField {
    /// A field of the given kind, labelled with its name.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            kind,
            required: false,
            default: None,
            validator: None,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text(TextInput::Plain))
    }

    pub fn email(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text(TextInput::Email))
    }

    pub fn password(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text(TextInput::Password))
    }

    pub fn multiline(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text(TextInput::Multiline))
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Date)
    }

    pub fn select(name: impl Into<String>, options: Vec<SelectOption>) -> Self {
        Self::new(name, FieldKind::Select(options))
    }

    pub fn custom<F>(name: impl Into<String>, renderer: F) -> Self
    where
        F: Fn(&FieldView<'_>) -> RenderedField + Send + Sync + 'static,
    {
        Self::new(name, FieldKind::Custom(Arc::new(renderer)))
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Attach a validator built with [`rules`](super::rules).
    pub fn validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Attach an ad-hoc validator closure.
    pub fn validate_with<F>(self, f: F) -> Self
    where
        F: Fn(&FieldValue) -> Option<String> + Send + Sync + 'static,
    {
        self.validator(Arc::new(f))
    }

    /// Value this field starts with in a fresh form.
    pub fn initial_value(&self) -> FieldValue {
        self.default
            .clone()
            .unwrap_or_else(|| self.kind.default_value())
    }

    /// Error for `value`, if any: required first, then the validator.
    pub fn check(&self, value: &FieldValue) -> Option<String> {
        if self.required && value.is_empty() {
            return Some(format!("{} is required", self.label));
        }
        self.validator.as_ref().and_then(|validate| validate(value))
    }
}

/// What a renderer gets to see about a field.
#[derive(Debug, Clone, Copy)]
pub struct FieldView<'a> {
    pub name: &'a str,
    pub label: &'a str,
    pub value: &'a FieldValue,
    pub error: Option<&'a str>,
    pub required: bool,
    /// Interactive elements are disabled while a submit is in flight.
    pub disabled: bool,
}

/// Headless description of how to draw a field.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedField {
    Input {
        name: String,
        label: String,
        input: InputType,
        value: String,
        error: Option<String>,
        required: bool,
        disabled: bool,
    },
    Toggle {
        name: String,
        label: String,
        checked: bool,
        disabled: bool,
    },
    Select {
        name: String,
        label: String,
        options: Vec<SelectOption>,
        selected: Option<usize>,
        error: Option<String>,
        disabled: bool,
    },
    /// Free-form output of a custom renderer.
    Custom {
        name: String,
        content: String,
        error: Option<String>,
    },
}

/// HTML-ish input type of a rendered input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Text,
    Email,
    Password,
    Textarea,
    Number,
    Date,
}

impl FormField {
    /// Describe this field for a rendering surface.
    pub fn render(&self, view: &FieldView<'_>) -> RenderedField {
        let input = |input: InputType| RenderedField::Input {
            name: view.name.to_string(),
            label: view.label.to_string(),
            input,
            value: view.value.display(),
            error: view.error.map(str::to_string),
            required: view.required,
            disabled: view.disabled,
        };
        match &self.kind {
            FieldKind::Text(TextInput::Plain) => input(InputType::Text),
            FieldKind::Text(TextInput::Email) => input(InputType::Email),
            FieldKind::Text(TextInput::Password) => input(InputType::Password),
            FieldKind::Text(TextInput::Multiline) => input(InputType::Textarea),
            FieldKind::Number => input(InputType::Number),
            FieldKind::Date => input(InputType::Date),
            FieldKind::Boolean => RenderedField::Toggle {
                name: view.name.to_string(),
                label: view.label.to_string(),
                checked: view.value.as_bool().unwrap_or(false),
                disabled: view.disabled,
            },
            FieldKind::Select(options) => RenderedField::Select {
                name: view.name.to_string(),
                label: view.label.to_string(),
                options: options.clone(),
                selected: options.iter().position(|o| &o.value == view.value),
                error: view.error.map(str::to_string),
                disabled: view.disabled,
            },
            FieldKind::Custom(renderer) => renderer(view),
        }
    }
}
