// 🏷️ Header Resolution
// Maps a vendor's header row onto the three columns we care about

use crate::error::PriceError;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// FIELDS
// ============================================================================

/// Semantic column a price list must provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Price,
    Weight,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Price, Field::Weight];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Price => "price",
            Field::Weight => "weight",
        }
    }
}

// ============================================================================
// SYNONYM TABLE
// ============================================================================

/// Accepted header spellings per field.
///
/// Matching is exact and case-sensitive. The table is plain data so new
/// spellings can be loaded from JSON without touching [`resolve`]:
///
/// ```json
/// { "name": ["товар", "item"], "price": ["цена"], "weight": ["вес"] }
/// ```
///
/// A key left out of the JSON keeps its default list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymTable {
    #[serde(default = "default_name_synonyms")]
    pub name: Vec<String>,

    #[serde(default = "default_price_synonyms")]
    pub price: Vec<String>,

    #[serde(default = "default_weight_synonyms")]
    pub weight: Vec<String>,
}

fn default_name_synonyms() -> Vec<String> {
    to_owned(&["название", "продукт", "товар", "наименование"])
}

fn default_price_synonyms() -> Vec<String> {
    to_owned(&["цена", "розница"])
}

fn default_weight_synonyms() -> Vec<String> {
    to_owned(&["фасовка", "масса", "вес"])
}

fn to_owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for SynonymTable {
    fn default() -> Self {
        SynonymTable {
            name: default_name_synonyms(),
            price: default_price_synonyms(),
            weight: default_weight_synonyms(),
        }
    }
}

impl SynonymTable {
    /// Table with no accepted spellings at all
    pub fn empty() -> Self {
        SynonymTable {
            name: Vec::new(),
            price: Vec::new(),
            weight: Vec::new(),
        }
    }

    /// Builder: accept one more spelling for a field
    pub fn with_synonym(mut self, field: Field, header: impl Into<String>) -> Self {
        let header = header.into();
        let list = self.synonyms_mut(field);
        if !list.contains(&header) {
            list.push(header);
        }
        self
    }

    pub fn synonyms(&self, field: Field) -> &[String] {
        match field {
            Field::Name => &self.name,
            Field::Price => &self.price,
            Field::Weight => &self.weight,
        }
    }

    fn synonyms_mut(&mut self, field: Field) -> &mut Vec<String> {
        match field {
            Field::Name => &mut self.name,
            Field::Price => &mut self.price,
            Field::Weight => &mut self.weight,
        }
    }

    pub fn matches(&self, field: Field, header: &str) -> bool {
        self.synonyms(field).iter().any(|s| s == header)
    }

    pub fn from_json_str(json: &str) -> Result<Self, PriceError> {
        serde_json::from_str(json)
            .map_err(|e| PriceError::Config(format!("invalid synonym table: {}", e)))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, PriceError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

// ============================================================================
// HEADER MAP
// ============================================================================

/// Column positions resolved from one file's header row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderMap {
    pub name: Option<usize>,
    pub price: Option<usize>,
    pub weight: Option<usize>,
}

impl HeaderMap {
    pub fn index(&self, field: Field) -> Option<usize> {
        match field {
            Field::Name => self.name,
            Field::Price => self.price,
            Field::Weight => self.weight,
        }
    }

    /// Fields for which no column was found
    pub fn missing(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.index(*f).is_none())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }
}

/// Header cell as compared against the table: outer whitespace and a BOM stripped
fn clean_header(raw: &str) -> &str {
    raw.trim_start_matches('\u{feff}').trim()
}

/// Resolve the header row.
///
/// For each field, the first header (left to right) that exactly matches one
/// of the field's synonyms wins. A field with no match stays `None`; that is
/// reported later by normalization, not here.
pub fn resolve<S: AsRef<str>>(headers: &[S], synonyms: &SynonymTable) -> HeaderMap {
    let find = |field: Field| {
        headers
            .iter()
            .position(|h| synonyms.matches(field, clean_header(h.as_ref())))
    };

    HeaderMap {
        name: find(Field::Name),
        price: find(Field::Price),
        weight: find(Field::Weight),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_default_synonyms() {
        let map = resolve(&["товар", "цена", "вес"], &SynonymTable::default());
        assert_eq!(map.name, Some(0));
        assert_eq!(map.price, Some(1));
        assert_eq!(map.weight, Some(2));
        assert!(map.is_complete());
    }

    #[test]
    fn test_resolve_any_order_and_spelling() {
        let headers = ["№", "фасовка", "наименование", "артикул", "розница"];
        let map = resolve(&headers, &SynonymTable::default());
        assert_eq!(map.name, Some(2));
        assert_eq!(map.price, Some(4));
        assert_eq!(map.weight, Some(1));
    }

    #[test]
    fn test_first_match_wins() {
        let headers = ["продукт", "цена", "масса", "товар", "розница", "вес"];
        let map = resolve(&headers, &SynonymTable::default());
        assert_eq!(map.name, Some(0));
        assert_eq!(map.price, Some(1));
        assert_eq!(map.weight, Some(2));
    }

    #[test]
    fn test_missing_field_is_none() {
        let map = resolve(&["товар", "цена", "количество"], &SynonymTable::default());
        assert_eq!(map.weight, None);
        assert_eq!(map.missing(), vec![Field::Weight]);
        assert!(!map.is_complete());
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let map = resolve(&["Товар", "ЦЕНА", "вес"], &SynonymTable::default());
        assert_eq!(map.name, None);
        assert_eq!(map.price, None);
        assert_eq!(map.weight, Some(2));
    }

    #[test]
    fn test_whitespace_and_bom_ignored() {
        let map = resolve(&["\u{feff}товар", " цена ", "вес"], &SynonymTable::default());
        assert!(map.is_complete());
    }

    #[test]
    fn test_empty_header_row() {
        let headers: Vec<String> = Vec::new();
        let map = resolve(&headers, &SynonymTable::default());
        assert_eq!(map, HeaderMap::default());
    }

    #[test]
    fn test_custom_synonym() {
        let table = SynonymTable::default().with_synonym(Field::Name, "item");
        let map = resolve(&["item", "цена", "вес"], &table);
        assert_eq!(map.name, Some(0));
    }

    #[test]
    fn test_json_partial_override_keeps_defaults() {
        let table = SynonymTable::from_json_str(r#"{ "price": ["price", "cost"] }"#).unwrap();
        assert_eq!(table.price, vec!["price".to_string(), "cost".to_string()]);
        assert_eq!(table.name, SynonymTable::default().name);
        assert!(table.matches(Field::Weight, "вес"));
        assert!(!table.matches(Field::Price, "цена"));
    }

    #[test]
    fn test_json_invalid() {
        let result = SynonymTable::from_json_str("{ not json");
        assert!(matches!(result, Err(PriceError::Config(_))));
    }
}
