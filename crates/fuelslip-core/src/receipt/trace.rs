//! Record of which strategy produced each field.

use serde::Serialize;
use tracing::debug;

/// Purchase record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Location,
    DateTime,
    FuelType,
    Amount,
    Volume,
    Rate,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Location,
        Field::DateTime,
        Field::FuelType,
        Field::Amount,
        Field::Volume,
        Field::Rate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Location => "location",
            Field::DateTime => "date_time",
            Field::FuelType => "fuel_type",
            Field::Amount => "amount",
            Field::Volume => "volume",
            Field::Rate => "rate",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A field resolved by a named strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEntry {
    pub field: Field,
    pub strategy: &'static str,
    /// Source text the value was read from.
    pub source: String,
}

/// Ordered log of an extraction run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractionTrace {
    entries: Vec<TraceEntry>,
    misses: Vec<Field>,
}

impl ExtractionTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn resolved(&mut self, field: Field, strategy: &'static str, source: impl Into<String>) {
        let entry = TraceEntry {
            field,
            strategy,
            source: source.into(),
        };
        debug!("{} <- {} ({:?})", entry.field, entry.strategy, entry.source);
        self.entries.push(entry);
    }

    pub(crate) fn missed(&mut self, field: Field) {
        debug!("{} not found", field);
        self.misses.push(field);
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// Fields no strategy could fill.
    pub fn misses(&self) -> &[Field] {
        &self.misses
    }

    /// Strategy that produced `field`, if any.
    pub fn strategy_for(&self, field: Field) -> Option<&'static str> {
        self.entries.iter().find(|e| e.field == field).map(|e| e.strategy)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.misses.is_empty()
    }
}
