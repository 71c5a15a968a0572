//! Field-level validation shared by order requests and stored orders.
//!
//! Validators collect every failing field instead of stopping at the first one,
//! so a form can report all of its problems in a single round trip.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("validation failed: {}", join_messages(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

fn join_messages(errors: &[FieldError]) -> String {
    errors.iter().map(|e| e.message.as_str()).collect::<Vec<_>>().join("; ")
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.iter().map(|e| e.field)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Implemented by anything that carries declarative field constraints.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;

    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Orders may not be dated before 2000-01-01T00:00:00Z.
pub fn min_order_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

pub fn required_text(
    errs: &mut ValidationErrors,
    field: &'static str,
    label: &str,
    value: Option<&str>,
    max_len: usize,
) {
    match value.map(str::trim) {
        None | Some("") => errs.add(field, format!("{label} can't be blank")),
        Some(v) if v.chars().count() > max_len => {
            errs.add(field, format!("{label} can't be longer than {max_len} characters"))
        }
        Some(_) => {}
    }
}

pub fn int_range(errs: &mut ValidationErrors, field: &'static str, label: &str, value: i64, min: i64, max: i64) {
    if value < min || value > max {
        errs.add(field, format!("{label} must be between {min} and {max}"));
    }
}

pub fn decimal_range(
    errs: &mut ValidationErrors,
    field: &'static str,
    label: &str,
    value: Decimal,
    min: Decimal,
    max: Decimal,
) {
    if value < min || value > max {
        errs.add(field, format!("{label} must be between {min} and {max}"));
    }
}

pub fn min_date(errs: &mut ValidationErrors, field: &'static str, label: &str, value: DateTime<Utc>, min: DateTime<Utc>) {
    if value < min {
        errs.add(
            field,
            format!("{label} should not be older than {}", min.format("%Y-%m-%d")),
        );
    }
}
