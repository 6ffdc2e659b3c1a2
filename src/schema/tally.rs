//! Per-field type tallies over a sample batch

use crate::convert::{convert, PrimitiveType};
use crate::types::RawRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::iter::Sum;

/// Occurrence count per primitive type for one field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeCounts {
    counts: BTreeMap<PrimitiveType, u64>,
}

impl TypeCounts {
    /// Create empty counts
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence
    pub fn increment(&mut self, kind: PrimitiveType) {
        self.add(kind, 1);
    }

    /// Count `n` occurrences; adding zero records nothing
    pub fn add(&mut self, kind: PrimitiveType, n: u64) {
        if n > 0 {
            *self.counts.entry(kind).or_insert(0) += n;
        }
    }

    /// Occurrences of one type
    pub fn get(&self, kind: PrimitiveType) -> u64 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Set of types seen at least once
    pub fn observed(&self) -> BTreeSet<PrimitiveType> {
        self.counts.keys().copied().collect()
    }

    /// Total non-null occurrences
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Check whether nothing was observed
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate `(type, count)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (PrimitiveType, u64)> + '_ {
        self.counts.iter().map(|(k, v)| (*k, *v))
    }

    /// Add every count from `other`
    pub fn merge_from(&mut self, other: &TypeCounts) {
        for (kind, n) in other.iter() {
            self.add(kind, n);
        }
    }
}

impl FromIterator<(PrimitiveType, u64)> for TypeCounts {
    fn from_iter<I: IntoIterator<Item = (PrimitiveType, u64)>>(iter: I) -> Self {
        let mut counts = TypeCounts::new();
        for (kind, n) in iter {
            counts.add(kind, n);
        }
        counts
    }
}

/// Per-field, per-type counts accumulated over a batch
///
/// Counts only ever grow. Tallies built from disjoint shards of a batch can
/// be combined with [`TypeTally::merge`] in any order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeTally {
    fields: BTreeMap<String, TypeCounts>,
}

impl TypeTally {
    /// Create an empty tally
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure a field is known, even if none of its values are counted
    pub fn register(&mut self, field: &str) -> &mut TypeCounts {
        self.fields.entry(field.to_string()).or_default()
    }

    /// Count one occurrence of `kind` for `field`
    pub fn record(&mut self, field: &str, kind: PrimitiveType) {
        self.register(field).increment(kind);
    }

    /// Classify one raw value and count it
    ///
    /// Absent and empty values register the field but count nothing.
    pub fn observe(&mut self, field: &str, raw: Option<&str>) {
        let counts = self.register(field);
        if let (_, Some(kind)) = convert(raw) {
            counts.increment(kind);
        }
    }

    /// Classify and count every field of one record
    pub fn observe_record(&mut self, record: &RawRecord) {
        for (field, raw) in record {
            self.observe(field, raw.as_deref());
        }
    }

    /// Counts for one field
    pub fn counts(&self, field: &str) -> Option<&TypeCounts> {
        self.fields.get(field)
    }

    /// Iterate fields in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &TypeCounts)> {
        self.fields.iter()
    }

    /// Number of fields seen
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check whether no field was seen
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Sum two tallies; the field set is the union of both
    #[must_use]
    pub fn merge(mut self, other: TypeTally) -> TypeTally {
        self.merge_from(&other);
        self
    }

    /// Add every count from `other` into this tally
    pub fn merge_from(&mut self, other: &TypeTally) {
        for (field, counts) in &other.fields {
            self.register(field).merge_from(counts);
        }
    }
}

impl Sum for TypeTally {
    fn sum<I: Iterator<Item = TypeTally>>(iter: I) -> Self {
        iter.fold(TypeTally::new(), TypeTally::merge)
    }
}

impl<'a> Extend<&'a RawRecord> for TypeTally {
    fn extend<I: IntoIterator<Item = &'a RawRecord>>(&mut self, records: I) {
        for record in records {
            self.observe_record(record);
        }
    }
}

/// Count one record into a tally and hand the tally back
pub fn count_sample(record: &RawRecord, mut tally: TypeTally) -> TypeTally {
    tally.observe_record(record);
    tally
}

/// Tally every record of a batch, starting from empty
pub fn count_samples<'a, I>(records: I) -> TypeTally
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    records
        .into_iter()
        .fold(TypeTally::new(), |tally, record| count_sample(record, tally))
}
