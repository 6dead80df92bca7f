//! Request-body validation.
//!
//! A resource kind declares an ordered list of [`FieldRule`]s. [`validate`]
//! runs in two passes over that list:
//!
//! 1. **Type pass**: every present field must have the declared JSON type.
//!    In [`Mode::Create`] an absent or `null` field is an error; in
//!    [`Mode::Update`] it is skipped. Stops at the first failure.
//! 2. **Range pass**: only reached when the type pass succeeded for all
//!    present fields. Stops at the first failure.
//!
//! Type failures map to 400 and range failures to 422 at the HTTP boundary, so
//! a negative value of the wrong type is always reported as a type failure.

use serde_json::{Map, Value};

/// Whether every field is required or only present fields are considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Update,
}

/// JSON type a field must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Integer,
}

impl FieldType {
    const fn expected(self) -> &'static str {
        match self {
            Self::Text => "a string",
            Self::Integer => "an integer",
        }
    }
}

/// A field value that passed its type check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
}

/// A range rule: `Err` carries the human-readable reason.
pub type RangeCheck = fn(&FieldValue) -> Result<(), &'static str>;

/// Declaration of one body field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub field_type: FieldType,
    pub range: RangeCheck,
}

/// Validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Request body must be a JSON object.")]
    NotAnObject,

    #[error("Missing required field '{field}'.")]
    MissingField { field: &'static str },

    #[error("Field '{field}' must be {expected}.")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Field '{field}' {reason}.")]
    OutOfRange {
        field: &'static str,
        reason: &'static str,
    },
}

impl ValidationError {
    /// `true` for semantic (range) failures, `false` for shape/type failures.
    #[must_use]
    pub fn is_range_violation(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }
}

/// Fields that passed both passes, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    values: Vec<(&'static str, FieldValue)>,
}

impl FieldSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn take(&mut self, name: &str) -> Option<FieldValue> {
        let index = self.values.iter().position(|(field, _)| *field == name)?;
        Some(self.values.remove(index).1)
    }

    /// Remove a text field if it was present.
    pub fn take_text(&mut self, name: &str) -> Option<String> {
        match self.take(name)? {
            FieldValue::Text(value) => Some(value),
            FieldValue::Integer(_) => None,
        }
    }

    /// Remove an integer field if it was present, narrowed to `i32`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OutOfRange`] when the value does not fit.
    pub fn take_i32(&mut self, name: &'static str) -> Result<Option<i32>, ValidationError> {
        match self.take(name) {
            Some(FieldValue::Integer(value)) => i32::try_from(value).map(Some).map_err(|_| {
                ValidationError::OutOfRange {
                    field: name,
                    reason: "is too large",
                }
            }),
            _ => Ok(None),
        }
    }

    /// Like [`FieldSet::take_text`] but the field must be present.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] when absent.
    pub fn require_text(&mut self, name: &'static str) -> Result<String, ValidationError> {
        self.take_text(name)
            .ok_or(ValidationError::MissingField { field: name })
    }

    /// Like [`FieldSet::take_i32`] but the field must be present.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] when absent, or
    /// [`ValidationError::OutOfRange`] when the value does not fit.
    pub fn require_i32(&mut self, name: &'static str) -> Result<i32, ValidationError> {
        self.take_i32(name)?
            .ok_or(ValidationError::MissingField { field: name })
    }
}

/// Validate `body` against `rules`.
///
/// # Errors
///
/// Returns the first type failure found in declaration order, or, when all
/// present fields are well-typed, the first range failure.
pub fn validate(body: &Value, rules: &[FieldRule], mode: Mode) -> Result<FieldSet, ValidationError> {
    let object = body.as_object().ok_or(ValidationError::NotAnObject)?;

    let typed = type_pass(object, rules, mode)?;

    for (rule, value) in &typed {
        (rule.range)(value).map_err(|reason| ValidationError::OutOfRange {
            field: rule.name,
            reason,
        })?;
    }

    Ok(FieldSet {
        values: typed
            .into_iter()
            .map(|(rule, value)| (rule.name, value))
            .collect(),
    })
}

fn type_pass<'r>(
    object: &Map<String, Value>,
    rules: &'r [FieldRule],
    mode: Mode,
) -> Result<Vec<(&'r FieldRule, FieldValue)>, ValidationError> {
    let mut typed = Vec::with_capacity(rules.len());
    for rule in rules {
        match object.get(rule.name) {
            None | Some(Value::Null) => {
                if mode == Mode::Create {
                    return Err(ValidationError::MissingField { field: rule.name });
                }
            }
            Some(raw) => typed.push((rule, coerce(rule, raw)?)),
        }
    }
    Ok(typed)
}

fn coerce(rule: &FieldRule, raw: &Value) -> Result<FieldValue, ValidationError> {
    let mismatch = || ValidationError::TypeMismatch {
        field: rule.name,
        expected: rule.field_type.expected(),
    };
    match (rule.field_type, raw) {
        (FieldType::Text, Value::String(text)) => Ok(FieldValue::Text(text.clone())),
        (FieldType::Integer, Value::Number(number)) => number
            .as_i64()
            // up to u64::MAX: saturate, every range rule rejects it; larger
            // literals arrive as floats and fail the type check
            .or_else(|| number.as_u64().map(|_| i64::MAX))
            .map(FieldValue::Integer)
            .ok_or_else(mismatch),
        _ => Err(mismatch()),
    }
}

/// Range rule: text must not be empty.
///
/// # Errors
///
/// Returns the reason when the text is empty.
pub fn non_empty(value: &FieldValue) -> Result<(), &'static str> {
    match value {
        FieldValue::Text(text) if text.is_empty() => Err("must not be empty"),
        _ => Ok(()),
    }
}

/// Range rule: integer must be strictly positive and fit in 32 bits.
///
/// # Errors
///
/// Returns the reason when the value is zero, negative, or too large.
pub fn positive_i32(value: &FieldValue) -> Result<(), &'static str> {
    match value {
        FieldValue::Integer(n) if *n <= 0 => Err("must be greater than 0"),
        FieldValue::Integer(n) if *n > i64::from(i32::MAX) => Err("is too large"),
        _ => Ok(()),
    }
}
