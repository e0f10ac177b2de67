// Error taxonomy for ingestion and export

use crate::headers::Field;
use std::fmt;
use std::path::PathBuf;

/// Everything that can go wrong between a directory of price lists and a Catalog.
///
/// `DirectoryNotFound` and `NoPriceFiles` abort a run. `Schema` and `Io` cost
/// one file. `Parse`, `Division`, `Encoding` and a malformed-row `Csv` cost one row.
#[derive(Debug)]
pub enum PriceError {
    DirectoryNotFound(PathBuf),
    NoPriceFiles(PathBuf),
    /// Header row has no recognised column for these fields
    Schema { missing: Vec<Field> },
    /// Cell could not be read as the integer the field requires
    Parse {
        field: Field,
        value: String,
        line: usize,
        reason: &'static str,
    },
    /// Weight of zero leaves price-per-unit undefined
    Division { line: usize },
    /// Row bytes are not valid UTF-8
    Encoding { line: usize },
    Io(std::io::Error),
    Csv(csv::Error),
    Config(String),
}

impl PriceError {
    /// True when the error should stop the whole run rather than one file or row.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PriceError::DirectoryNotFound(_) | PriceError::NoPriceFiles(_)
        )
    }
}

impl fmt::Display for PriceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceError::DirectoryNotFound(dir) => {
                write!(f, "directory not found: {}", dir.display())
            }
            PriceError::NoPriceFiles(dir) => {
                write!(f, "no price CSV files found in {}", dir.display())
            }
            PriceError::Schema { missing } => {
                let names: Vec<&str> = missing.iter().map(|field| field.name()).collect();
                write!(f, "missing required column(s): {}", names.join(", "))
            }
            PriceError::Parse {
                field,
                value,
                line,
                reason,
            } => write!(
                f,
                "line {}: {} value {:?} {}",
                line,
                field.name(),
                value,
                reason
            ),
            PriceError::Division { line } => {
                write!(f, "line {}: weight is zero, unit price undefined", line)
            }
            PriceError::Encoding { line } => {
                write!(f, "line {}: row is not valid UTF-8", line)
            }
            PriceError::Io(err) => write!(f, "I/O error: {}", err),
            PriceError::Csv(err) => write!(f, "CSV error: {}", err),
            PriceError::Config(msg) => write!(f, "configuration error: {}", msg),
        }
    }
}

impl std::error::Error for PriceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PriceError::Io(err) => Some(err),
            PriceError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PriceError {
    fn from(err: std::io::Error) -> Self {
        PriceError::Io(err)
    }
}

impl From<csv::Error> for PriceError {
    fn from(err: csv::Error) -> Self {
        PriceError::Csv(err)
    }
}
