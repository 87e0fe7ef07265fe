use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder NDBC writes in place of a measurement it does not have.
pub const MISSING: &str = "MM";

/// Static description of one column of a realtime file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Column header as printed by NDBC, e.g. `WSPD`.
    pub column: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
}

impl FieldSpec {
    pub const fn new(column: &'static str, label: &'static str, unit: &'static str) -> Self {
        Self { column, label, unit }
    }
}

/// A single measured value with its label and unit.
///
/// The value is `None` when the provider reported the measurement as missing
/// or the raw text could not be read as the datum's type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationDatum<T> {
    pub label: String,
    pub unit: String,
    pub value: Option<T>,
}

pub type ObservationFloatDatum = ObservationDatum<f64>;
pub type ObservationStringDatum = ObservationDatum<String>;

impl<T> ObservationDatum<T> {
    pub fn new(label: impl Into<String>, unit: impl Into<String>, value: Option<T>) -> Self {
        Self {
            label: label.into(),
            unit: unit.into(),
            value,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.value.is_none()
    }
}

impl ObservationFloatDatum {
    /// Coerce a raw column into a float datum.
    pub fn from_field(raw: &str, spec: &FieldSpec) -> Self {
        Self::new(spec.label, spec.unit, parse_float(raw))
    }
}

impl ObservationStringDatum {
    /// Coerce a raw column into a string datum.
    pub fn from_field(raw: &str, spec: &FieldSpec) -> Self {
        let raw = raw.trim();
        let value = (!raw.is_empty() && raw != MISSING).then(|| raw.to_string());
        Self::new(spec.label, spec.unit, value)
    }
}

/// `MM`, empty text and anything that is not a finite number read as `None`.
pub(crate) fn parse_float(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() || raw == MISSING {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl<T: fmt::Display> fmt::Display for ObservationDatum<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(v) if self.unit.is_empty() => write!(f, "{v}"),
            Some(v) => write!(f, "{v} {}", self.unit),
            None => f.write_str("-"),
        }
    }
}

/// Borrowed view over either datum kind, used when walking an observation's
/// fields generically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DatumRef<'a> {
    Float(&'a ObservationFloatDatum),
    Text(&'a ObservationStringDatum),
}

impl DatumRef<'_> {
    pub fn is_missing(&self) -> bool {
        match self {
            DatumRef::Float(d) => d.is_missing(),
            DatumRef::Text(d) => d.is_missing(),
        }
    }
}

impl fmt::Display for DatumRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatumRef::Float(d) => fmt::Display::fmt(d, f),
            DatumRef::Text(d) => fmt::Display::fmt(d, f),
        }
    }
}
