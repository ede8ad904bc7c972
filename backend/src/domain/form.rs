//! Bound forms: submitted values plus per-field validation messages.
//!
//! Rejected submissions are re-rendered with the user's input intact, so the
//! domain hands back everything the page needs instead of a bare error.

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

/// Key under which errors not tied to a single field are reported.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Validation messages grouped by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    /// Empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Record a message not bound to any field.
    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.add(NON_FIELD_ERRORS, message);
    }

    /// `true` when no messages were recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`.
    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Submitted form values alongside their validation errors.
///
/// # Examples
/// ```
/// use ya_backend::domain::BoundForm;
///
/// let form = BoundForm::empty()
///     .with_value("title", "Заметка")
///     .with_error("slug", "taken");
/// assert_eq!(form.value("title"), Some("Заметка"));
/// assert_eq!(form.errors().field("slug"), ["taken"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct BoundForm {
    data: BTreeMap<String, String>,
    errors: FormErrors,
}

impl BoundForm {
    /// Unbound form with no values.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Form bound to `data` with no errors yet.
    pub fn bound(data: BTreeMap<String, String>) -> Self {
        Self {
            data,
            errors: FormErrors::new(),
        }
    }

    /// Set an initial or submitted value.
    pub fn with_value(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(field.into(), value.into());
        self
    }

    /// Attach a field error.
    pub fn with_error(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.errors.add(field, message);
        self
    }

    /// Replace the error set.
    pub fn with_errors(mut self, errors: FormErrors) -> Self {
        self.errors = errors;
        self
    }

    /// Submitted value for `field`.
    pub fn value(&self, field: &str) -> Option<&str> {
        self.data.get(field).map(String::as_str)
    }

    /// Validation messages.
    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    /// `true` when the form carries no errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Result of processing a form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome<T> {
    /// Input was accepted and persisted.
    Saved(T),
    /// Input was rejected; re-render the bound form.
    Invalid(BoundForm),
}

impl<T> FormOutcome<T> {
    /// Saved value, if the submission was accepted.
    pub fn saved(self) -> Option<T> {
        match self {
            Self::Saved(value) => Some(value),
            Self::Invalid(_) => None,
        }
    }

    /// Rejected form, if the submission failed validation.
    pub fn invalid(self) -> Option<BoundForm> {
        match self {
            Self::Saved(_) => None,
            Self::Invalid(form) => Some(form),
        }
    }
}

/// Field value with surrounding whitespace removed; blank input counts as
/// missing.
pub(crate) fn cleaned(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Message used when a required field is missing.
pub(crate) const REQUIRED: &str = "This field is required.";
