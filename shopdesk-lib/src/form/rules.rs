//! Built-in field validators.
//!
//! A validator looks at a field's value and returns an error message, or
//! `None` when the value is acceptable. Emptiness is the job of the field's
//! `required` flag, so every rule here accepts an empty value.

use std::sync::Arc;

use regex::Regex;

use super::value::FieldValue;

/// A field validator.
pub type Validator = Arc<dyn Fn(&FieldValue) -> Option<String> + Send + Sync>;

/// Wrap a predicate into a validator with a fixed message.
pub fn rule<F>(f: F, msg: impl Into<String>) -> Validator
where
    F: Fn(&FieldValue) -> bool + Send + Sync + 'static,
{
    let msg = msg.into();
    Arc::new(move |value| {
        if value.is_empty() || f(value) {
            None
        } else {
            Some(msg.clone())
        }
    })
}

/// Require a valid email address.
pub fn email(msg: impl Into<String>) -> Validator {
    rule(
        |v| v.as_str().is_some_and(email_address::EmailAddress::is_valid),
        msg,
    )
}

/// Require minimum length (in characters).
pub fn min_length(min: usize, msg: impl Into<String>) -> Validator {
    rule(
        move |v| v.as_str().is_some_and(|s| s.chars().count() >= min),
        msg,
    )
}

/// Require maximum length (in characters).
pub fn max_length(max: usize, msg: impl Into<String>) -> Validator {
    rule(
        move |v| v.as_str().is_some_and(|s| s.chars().count() <= max),
        msg,
    )
}

/// Require the text to match a regex pattern.
///
/// An invalid pattern yields a validator that rejects every non-empty value
/// with the regex error, so the mistake shows up on first use.
pub fn pattern(pattern: &str, msg: impl Into<String>) -> Validator {
    match Regex::new(pattern) {
        Ok(re) => rule(move |v| v.as_str().is_some_and(|s| re.is_match(s)), msg),
        Err(e) => {
            let msg = format!("invalid pattern: {e}");
            Arc::new(move |value| (!value.is_empty()).then(|| msg.clone()))
        }
    }
}

/// Require a number within `min..=max`.
pub fn range(min: f64, max: f64, msg: impl Into<String>) -> Validator {
    rule(
        move |v| v.as_f64().is_some_and(|n| (min..=max).contains(&n)),
        msg,
    )
}
