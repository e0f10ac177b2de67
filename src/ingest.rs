// 📥 Ingestion
// Directory scan → CSV read → header resolution → normalization → Catalog

use crate::catalog::Catalog;
use crate::error::PriceError;
use crate::headers::{self, SynonymTable};
use crate::normalizer::{Record, RecordNormalizer};
use csv::ReaderBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// ============================================================================
// CONFIG
// ============================================================================

/// Where to look and what counts as a price list
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Directory scanned (not recursively) for price lists
    pub root: PathBuf,
    /// Literal substring a file name must contain
    pub name_contains: String,
    /// Literal suffix a file name must end with
    pub extension: String,
    pub synonyms: SynonymTable,
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            root: PathBuf::from("."),
            name_contains: "price".to_string(),
            extension: ".csv".to_string(),
            synonyms: SynonymTable::default(),
        }
    }
}

impl IngestConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        IngestConfig {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Builder: replace the synonym table
    pub fn with_synonyms(mut self, synonyms: SynonymTable) -> Self {
        self.synonyms = synonyms;
        self
    }

    /// Case-sensitive literal checks, not a glob
    pub fn is_price_file(&self, file_name: &str) -> bool {
        file_name.contains(&self.name_contains) && file_name.ends_with(&self.extension)
    }
}

// ============================================================================
// OUTCOMES
// ============================================================================

/// A data row that was dropped while the rest of its file loaded
#[derive(Debug)]
pub struct RowIssue {
    pub line: usize,
    pub error: PriceError,
}

/// What happened to one candidate file
#[derive(Debug)]
pub enum FileOutcome {
    Loaded {
        file: String,
        records: usize,
        skipped: Vec<RowIssue>,
    },
    /// No rows at all, not even a header
    Empty { file: String },
    /// Whole file skipped
    Failed { file: String, error: PriceError },
}

impl FileOutcome {
    pub fn file(&self) -> &str {
        match self {
            FileOutcome::Loaded { file, .. }
            | FileOutcome::Empty { file }
            | FileOutcome::Failed { file, .. } => file,
        }
    }

    pub fn records(&self) -> usize {
        match self {
            FileOutcome::Loaded { records, .. } => *records,
            _ => 0,
        }
    }
}

#[derive(Debug, Default)]
pub struct IngestReport {
    pub files: Vec<FileOutcome>,
    /// Records in the Catalog after this run
    pub total_records: usize,
}

impl IngestReport {
    pub fn loaded_files(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f, FileOutcome::Loaded { .. }))
            .count()
    }

    pub fn failed_files(&self) -> impl Iterator<Item = &FileOutcome> {
        self.files
            .iter()
            .filter(|f| matches!(f, FileOutcome::Failed { .. }))
    }

    pub fn skipped_rows(&self) -> usize {
        self.files
            .iter()
            .map(|f| match f {
                FileOutcome::Loaded { skipped, .. } => skipped.len(),
                _ => 0,
            })
            .sum()
    }
}

/// Records salvaged from one file plus the rows that didn't make it
#[derive(Debug, Default)]
pub struct FileBatch {
    pub records: Vec<Record>,
    pub skipped: Vec<RowIssue>,
}

impl FileBatch {
    fn skip(&mut self, label: &str, line: usize, error: PriceError) {
        warn!("{}: skipping row: {}", label, error);
        self.skipped.push(RowIssue { line, error });
    }
}

// ============================================================================
// INGESTOR
// ============================================================================

pub struct Ingestor {
    config: IngestConfig,
}

impl Ingestor {
    pub fn new(config: IngestConfig) -> Self {
        Ingestor { config }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Candidate price files under the root, sorted by file name.
    ///
    /// Fails with `DirectoryNotFound` or `NoPriceFiles`; both end the run.
    pub fn list_price_files(&self) -> Result<Vec<PathBuf>, PriceError> {
        let root = &self.config.root;
        if !root.is_dir() {
            return Err(PriceError::DirectoryNotFound(root.clone()));
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(root)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                debug!("skipping non UTF-8 file name {:?}", name);
                continue;
            };
            if !self.config.is_price_file(name) {
                continue;
            }
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }
            files.push(entry.path());
        }

        if files.is_empty() {
            return Err(PriceError::NoPriceFiles(root.clone()));
        }

        files.sort();
        Ok(files)
    }

    /// Load every price file into `catalog`.
    ///
    /// A file is appended all at once or not at all. Problems with one file
    /// are recorded in the report and the scan moves on.
    pub fn ingest(&self, catalog: &mut Catalog) -> Result<IngestReport, PriceError> {
        let files = self.list_price_files()?;
        info!(
            "found {} price file(s) in {}",
            files.len(),
            self.config.root.display()
        );

        let mut report = IngestReport::default();

        for path in &files {
            let label = source_label(path);

            let outcome = match self.load_file(path) {
                Ok(None) => {
                    warn!("file {} is empty, skipping", label);
                    FileOutcome::Empty { file: label }
                }
                Ok(Some(batch)) => {
                    let records = batch.records.len();
                    catalog.append(batch.records);
                    info!(
                        "loaded {} record(s) from {} ({} row(s) skipped)",
                        records,
                        label,
                        batch.skipped.len()
                    );
                    FileOutcome::Loaded {
                        file: label,
                        records,
                        skipped: batch.skipped,
                    }
                }
                Err(error) => {
                    warn!("error processing file {}: {}", label, error);
                    FileOutcome::Failed { file: label, error }
                }
            };

            report.files.push(outcome);
        }

        report.total_records = catalog.len();
        info!(
            "catalog holds {} record(s) from {} file(s)",
            report.total_records,
            report.loaded_files()
        );

        Ok(report)
    }

    /// Read and normalize one file. `Ok(None)` means the file has no rows.
    ///
    /// Bad data rows are dropped individually; an unreadable file or a header
    /// row without name/price/weight columns fails the whole file.
    pub fn load_file(&self, path: &Path) -> Result<Option<FileBatch>, PriceError> {
        let label = source_label(path);

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(b',')
            .from_path(path)?;

        let mut rows = reader.byte_records();

        let header = match rows.next() {
            None => return Ok(None),
            Some(result) => result?,
        };
        // undecodable header cells match no synonym
        let header: Vec<String> = header
            .iter()
            .map(|c| String::from_utf8_lossy(c).into_owned())
            .collect();

        let map = headers::resolve(&header, &self.config.synonyms);
        debug!("{}: resolved headers {:?}", label, map);
        let normalizer = RecordNormalizer::new(&map, label.as_str())?;

        let mut batch = FileBatch::default();

        for (index, result) in rows.enumerate() {
            // header is line 1
            let fallback_line = index + 2;

            let row = match result {
                Ok(row) => row,
                Err(err) if matches!(err.kind(), csv::ErrorKind::Io(_)) => return Err(err.into()),
                Err(err) => {
                    let line = err
                        .position()
                        .map(|p| p.line() as usize)
                        .unwrap_or(fallback_line);
                    batch.skip(&label, line, PriceError::Csv(err));
                    continue;
                }
            };

            let line = row
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(fallback_line);

            let decoded: Result<Vec<&str>, _> = row.iter().map(std::str::from_utf8).collect();
            let Ok(cells) = decoded else {
                batch.skip(&label, line, PriceError::Encoding { line });
                continue;
            };

            match normalizer.normalize(&cells, line) {
                Ok(record) => batch.records.push(record),
                Err(error) => batch.skip(&label, line, error),
            }
        }

        Ok(Some(batch))
    }
}

/// Load all price files under `root` into `catalog` with default settings.
/// Returns the number of records the Catalog holds afterwards.
pub fn ingest(root: impl Into<PathBuf>, catalog: &mut Catalog) -> Result<usize, PriceError> {
    let report = Ingestor::new(IngestConfig::new(root)).ingest(catalog)?;
    Ok(report.total_records)
}

/// File name without the directory, used as the provenance label
pub fn source_label(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_string())
        .unwrap_or_else(|| path.display().to_string())
}
