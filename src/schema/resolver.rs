//! Reduction of type tallies to one declared type per field

use super::tally::{count_samples, TypeCounts, TypeTally};
use super::types::{FieldSchema, FieldType};
use crate::convert::PrimitiveType;
use crate::types::RawRecord;
use once_cell::sync::Lazy;
use std::collections::BTreeSet;
use tracing::debug;

static STANDARD_LATTICE: Lazy<WideningLattice> = Lazy::new(WideningLattice::standard);

/// Widening table keyed by the set of observed types
///
/// A set with no rule resolves to the fallback type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WideningLattice {
    rules: Vec<(BTreeSet<PrimitiveType>, PrimitiveType)>,
    fallback: PrimitiveType,
}

impl Default for WideningLattice {
    fn default() -> Self {
        Self::standard()
    }
}

impl WideningLattice {
    /// Create a lattice with no rules
    pub fn new(fallback: PrimitiveType) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
        }
    }

    /// The standard table
    ///
    /// | observed              | resolved  |
    /// |-----------------------|-----------|
    /// | {integer}             | integer   |
    /// | {number}              | number    |
    /// | {date-time}           | date-time |
    /// | {string}              | string    |
    /// | {integer, number}     | number    |
    /// | anything else, or {}  | string    |
    pub fn standard() -> Self {
        use PrimitiveType::{Integer, Number, String, Timestamp};

        Self::new(String)
            .with_rule([Integer], Integer)
            .with_rule([Number], Number)
            .with_rule([Timestamp], Timestamp)
            .with_rule([String], String)
            .with_rule([Integer, Number], Number)
    }

    /// Add a rule, replacing any rule for the same observed set
    ///
    /// The resolved type must be wide enough to hold every observed type.
    #[must_use]
    pub fn with_rule(
        mut self,
        observed: impl IntoIterator<Item = PrimitiveType>,
        resolved: PrimitiveType,
    ) -> Self {
        let observed: BTreeSet<_> = observed.into_iter().collect();
        debug_assert!(
            observed.iter().all(|t| t.widens_to(&resolved)),
            "{resolved} does not widen {observed:?}"
        );
        self.rules.retain(|(set, _)| *set != observed);
        self.rules.push((observed, resolved));
        self
    }

    /// Type used when no rule matches
    pub fn fallback(&self) -> PrimitiveType {
        self.fallback
    }

    /// Resolve a set of observed types
    pub fn resolve_set(&self, observed: &BTreeSet<PrimitiveType>) -> PrimitiveType {
        self.rules
            .iter()
            .find(|(set, _)| set == observed)
            .map_or(self.fallback, |(_, resolved)| *resolved)
    }

    /// Resolve one field's counts
    pub fn resolve(&self, counts: &TypeCounts) -> PrimitiveType {
        self.resolve_set(&counts.observed())
    }
}

/// Turns tallies into field schemas
#[derive(Debug, Clone, Default)]
pub struct SchemaResolver {
    lattice: WideningLattice,
}

impl SchemaResolver {
    /// Create a resolver using the standard lattice
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom lattice
    #[must_use]
    pub fn with_lattice(mut self, lattice: WideningLattice) -> Self {
        self.lattice = lattice;
        self
    }

    /// Resolve every field of a tally; each entry is nullable
    pub fn resolve_tally(&self, tally: &TypeTally) -> FieldSchema {
        tally
            .iter()
            .map(|(field, counts)| {
                let resolved = self.lattice.resolve(counts);
                debug!(
                    field = %field,
                    counts = ?counts,
                    resolved = %resolved,
                    "resolved field type"
                );
                (field.clone(), FieldType::for_primitive(resolved))
            })
            .collect()
    }

    /// Tally a batch and resolve it
    pub fn generate_schema<'a, I>(&self, records: I) -> FieldSchema
    where
        I: IntoIterator<Item = &'a RawRecord>,
    {
        self.resolve_tally(&count_samples(records))
    }
}

/// Resolve one field's counts with the standard lattice
pub fn pick_datatype(counts: &TypeCounts) -> PrimitiveType {
    STANDARD_LATTICE.resolve(counts)
}

/// Resolve a tally with the standard lattice
pub fn resolve_tally(tally: &TypeTally) -> FieldSchema {
    SchemaResolver::new().resolve_tally(tally)
}

/// Infer a field schema from a batch of records
///
/// ```
/// use solidafy_smart_csv::raw_record;
/// use solidafy_smart_csv::schema::generate_schema;
///
/// let records = vec![raw_record([("a", "1")]), raw_record([("a", "2.5")])];
/// let schema = generate_schema(&records);
/// assert_eq!(schema.to_json(), serde_json::json!({"a": {"type": ["null", "number"]}}));
/// ```
pub fn generate_schema<'a, I>(records: I) -> FieldSchema
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    SchemaResolver::new().generate_schema(records)
}
