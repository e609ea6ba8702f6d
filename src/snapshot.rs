//! Decoded telemetry values and snapshots

use std::fmt;

/// A decoded field value
///
/// Scalar fields decode to `Int` / `Float`; fixed-size array fields to
/// `Ints` / `Floats` with elements in wire order.
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryValue {
    Int(i32),
    Float(f32),
    Ints(Vec<i32>),
    Floats(Vec<f32>),
}

impl TelemetryValue {
    /// Try to get as a scalar integer
    pub fn as_int(&self) -> Option<i32> {
        match self {
            TelemetryValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as a scalar float
    pub fn as_float(&self) -> Option<f32> {
        match self {
            TelemetryValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as a float slice
    pub fn as_floats(&self) -> Option<&[f32]> {
        match self {
            TelemetryValue::Floats(v) => Some(v),
            _ => None,
        }
    }

    /// Check if this is an array value
    pub fn is_array(&self) -> bool {
        matches!(self, TelemetryValue::Ints(_) | TelemetryValue::Floats(_))
    }
}

impl fmt::Display for TelemetryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
            write!(f, "[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{item}")?;
            }
            write!(f, "]")
        }

        match self {
            TelemetryValue::Int(v) => write!(f, "{v}"),
            TelemetryValue::Float(v) => write!(f, "{v}"),
            TelemetryValue::Ints(v) => list(f, v),
            TelemetryValue::Floats(v) => list(f, v),
        }
    }
}

/// One decoded telemetry record: field name to value, in wire order
///
/// Holds exactly the available fields of the layout it was decoded from.
/// Iteration order is insertion order; lookups are by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetrySnapshot {
    entries: Vec<(&'static str, TelemetryValue)>,
}

impl TelemetrySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn insert(&mut self, name: &'static str, value: TelemetryValue) {
        self.entries.push((name, value));
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&TelemetryValue> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    /// Iterate fields in wire order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &TelemetryValue)> {
        self.entries.iter().map(|(n, v)| (*n, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
