// 🧹 Record Normalization
// Raw CSV row + resolved headers → immutable Record with derived unit price

use crate::error::PriceError;
use crate::headers::{Field, HeaderMap};
use serde::Serialize;

// ============================================================================
// RECORD
// ============================================================================

/// One product entry.
///
/// Fields are private: a Record is built once by normalization and never
/// edited, so `unit_price` can't drift away from `price / weight`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    name: String,
    price: i64,
    weight: i64,
    source_label: String,
    unit_price: f64,
}

impl Record {
    /// Build a record from already-parsed values.
    ///
    /// The name is lower-cased and trimmed. Fails when price is negative,
    /// weight is negative, or weight is zero.
    pub fn new(
        name: &str,
        price: i64,
        weight: i64,
        source_label: impl Into<String>,
    ) -> Result<Self, PriceError> {
        Self::derive(name, price, weight, source_label.into(), 0)
    }

    fn derive(
        name: &str,
        price: i64,
        weight: i64,
        source_label: String,
        line: usize,
    ) -> Result<Self, PriceError> {
        if price < 0 {
            return Err(PriceError::Parse {
                field: Field::Price,
                value: price.to_string(),
                line,
                reason: "is negative",
            });
        }
        if weight < 0 {
            return Err(PriceError::Parse {
                field: Field::Weight,
                value: weight.to_string(),
                line,
                reason: "is negative",
            });
        }
        if weight == 0 {
            return Err(PriceError::Division { line });
        }

        Ok(Record {
            name: normalize_name(name),
            price,
            weight,
            source_label,
            unit_price: unit_price(price, weight),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> i64 {
        self.price
    }

    pub fn weight(&self) -> i64 {
        self.weight
    }

    /// File this record came from
    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }
}

/// Lower-case and trim, the form names are stored and searched in
pub fn normalize_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// price / weight rounded to one decimal.
///
/// Rounds the exact binary value of the quotient: 0.45 is stored just above
/// the half and goes up, 0.35 just below and goes down. Only exact ties such
/// as 0.25 go to even.
pub fn unit_price(price: i64, weight: i64) -> f64 {
    let ratio = price as f64 / weight as f64;
    format!("{:.1}", ratio).parse().unwrap_or(ratio)
}

// ============================================================================
// NORMALIZER
// ============================================================================

/// Turns data rows of one file into Records.
///
/// Construction fails with `Schema` when the header map is incomplete, which
/// is how a file without a usable name/price/weight column gets skipped.
#[derive(Debug, Clone)]
pub struct RecordNormalizer {
    name_index: usize,
    price_index: usize,
    weight_index: usize,
    source_label: String,
}

impl RecordNormalizer {
    pub fn new(headers: &HeaderMap, source_label: impl Into<String>) -> Result<Self, PriceError> {
        match (headers.name, headers.price, headers.weight) {
            (Some(name_index), Some(price_index), Some(weight_index)) => Ok(RecordNormalizer {
                name_index,
                price_index,
                weight_index,
                source_label: source_label.into(),
            }),
            _ => Err(PriceError::Schema {
                missing: headers.missing(),
            }),
        }
    }

    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    /// Normalize one data row. `line` is the 1-based line in the source file,
    /// used only for error reporting.
    pub fn normalize<S: AsRef<str>>(&self, row: &[S], line: usize) -> Result<Record, PriceError> {
        let name = cell(row, self.name_index);
        let price = parse_int(row, self.price_index, Field::Price, line)?;
        let weight = parse_int(row, self.weight_index, Field::Weight, line)?;

        Record::derive(name, price, weight, self.source_label.clone(), line)
    }
}

/// One-shot form: check the header map, then normalize a single row
pub fn normalize_row<S: AsRef<str>>(
    row: &[S],
    headers: &HeaderMap,
    source_label: &str,
    line: usize,
) -> Result<Record, PriceError> {
    RecordNormalizer::new(headers, source_label)?.normalize(row, line)
}

fn cell<S: AsRef<str>>(row: &[S], index: usize) -> &str {
    row.get(index).map(|c| c.as_ref()).unwrap_or("")
}

fn parse_int<S: AsRef<str>>(
    row: &[S],
    index: usize,
    field: Field,
    line: usize,
) -> Result<i64, PriceError> {
    let raw = match row.get(index) {
        Some(c) => c.as_ref(),
        None => {
            return Err(PriceError::Parse {
                field,
                value: String::new(),
                line,
                reason: "is missing (row too short)",
            })
        }
    };

    raw.trim().parse::<i64>().map_err(|_| PriceError::Parse {
        field,
        value: raw.to_string(),
        line,
        reason: "is not an integer",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_map() -> HeaderMap {
        HeaderMap {
            name: Some(0),
            price: Some(1),
            weight: Some(2),
        }
    }

    #[test]
    fn test_normalize_basic_row() {
        let rec = normalize_row(&["Яблоко", "100", "2"], &full_map(), "price1.csv", 2).unwrap();
        assert_eq!(rec.name(), "яблоко");
        assert_eq!(rec.price(), 100);
        assert_eq!(rec.weight(), 2);
        assert_eq!(rec.source_label(), "price1.csv");
        assert_eq!(rec.unit_price(), 50.0);
    }

    #[test]
    fn test_name_trimmed_and_lowercased() {
        let rec = normalize_row(&["  Сыр ГАУДА \t", "450", "1"], &full_map(), "p.csv", 2).unwrap();
        assert_eq!(rec.name(), "сыр гауда");
    }

    #[test]
    fn test_empty_name_accepted() {
        let rec = normalize_row(&["   ", "10", "1"], &full_map(), "p.csv", 2).unwrap();
        assert_eq!(rec.name(), "");
    }

    #[test]
    fn test_unit_price_rounding() {
        assert_eq!(unit_price(100, 3), 33.3);
        assert_eq!(unit_price(200, 3), 66.7);
        assert_eq!(unit_price(1, 4), 0.2);
        assert_eq!(unit_price(3, 4), 0.8);
        assert_eq!(unit_price(0, 5), 0.0);
    }

    #[test]
    fn test_unit_price_near_halves() {
        assert_eq!(unit_price(90, 200), 0.5);
        assert_eq!(unit_price(1, 20), 0.1);
        assert_eq!(unit_price(7, 20), 0.3);
        assert_eq!(unit_price(1, 8), 0.1);
        assert_eq!(unit_price(5, 4), 1.2);
    }

    #[test]
    fn test_numbers_with_spaces() {
        let rec = normalize_row(&["хлеб", " 45 ", " 1 "], &full_map(), "p.csv", 2).unwrap();
        assert_eq!(rec.price(), 45);
        assert_eq!(rec.weight(), 1);
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let map = HeaderMap {
            name: Some(0),
            price: Some(1),
            weight: None,
        };
        let err = normalize_row(&["хлеб", "45", "1"], &map, "p.csv", 2).unwrap_err();
        match err {
            PriceError::Schema { missing } => assert_eq!(missing, vec![Field::Weight]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_integer_price_is_parse_error() {
        let err = normalize_row(&["хлеб", "45.5", "1"], &full_map(), "p.csv", 7).unwrap_err();
        match err {
            PriceError::Parse { field, line, .. } => {
                assert_eq!(field, Field::Price);
                assert_eq!(line, 7);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_weight_is_division_error() {
        let err = normalize_row(&["хлеб", "45", "0"], &full_map(), "p.csv", 3).unwrap_err();
        assert!(matches!(err, PriceError::Division { line: 3 }));
    }

    #[test]
    fn test_negative_values_rejected() {
        let err = normalize_row(&["хлеб", "-1", "1"], &full_map(), "p.csv", 2).unwrap_err();
        assert!(matches!(err, PriceError::Parse { field: Field::Price, .. }));

        let err = normalize_row(&["хлеб", "1", "-1"], &full_map(), "p.csv", 2).unwrap_err();
        assert!(matches!(err, PriceError::Parse { field: Field::Weight, .. }));
    }

    #[test]
    fn test_short_row_is_parse_error() {
        let err = normalize_row(&["хлеб", "45"], &full_map(), "p.csv", 5).unwrap_err();
        assert!(matches!(err, PriceError::Parse { field: Field::Weight, line: 5, .. }));
    }

    #[test]
    fn test_record_new_consistent_unit_price() {
        for (price, weight) in [(100, 2), (7, 3), (999, 7), (1, 1)] {
            let rec = Record::new("x", price, weight, "f.csv").unwrap();
            assert_eq!(rec.unit_price(), unit_price(price, weight));
        }
    }
}
