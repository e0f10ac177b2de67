// 📚 Catalog - every Record loaded this run, in ingestion order

use crate::normalizer::Record;
use std::collections::HashMap;

/// Insertion-ordered store of Records.
///
/// Grows during ingestion and is only read afterwards. Nothing is ever
/// removed or edited; search hands out borrowed views.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<Record>,
}

/// Per-file totals for the sources view
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSummary {
    pub source_label: String,
    pub count: usize,
    pub avg_unit_price: f64,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch at the end, keeping its order. No deduplication.
    pub fn append<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = Record>,
    {
        self.records.extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in insertion order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Records whose name contains `substring`, cheapest unit price first.
    ///
    /// The query is used as given: stored names are lower-case, so callers
    /// lower-case their query for case-insensitive lookup. `""` matches all.
    /// Equal unit prices keep insertion order.
    pub fn search(&self, substring: &str) -> Vec<&Record> {
        let mut found: Vec<&Record> = self
            .records
            .iter()
            .filter(|r| r.name().contains(substring))
            .collect();

        // sort_by is stable
        found.sort_by(|a, b| a.unit_price().total_cmp(&b.unit_price()));
        found
    }

    /// Record count and mean unit price per source file, ordered by first appearance
    pub fn source_summary(&self) -> Vec<SourceSummary> {
        let mut order: Vec<&str> = Vec::new();
        let mut totals: HashMap<&str, (usize, f64)> = HashMap::new();

        for rec in &self.records {
            let entry = totals.entry(rec.source_label()).or_insert_with(|| {
                order.push(rec.source_label());
                (0, 0.0)
            });
            entry.0 += 1;
            entry.1 += rec.unit_price();
        }

        order
            .into_iter()
            .map(|label| {
                let (count, sum) = totals[label];
                SourceSummary {
                    source_label: label.to_string(),
                    count,
                    avg_unit_price: sum / count as f64,
                }
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
