// ⚙️ Run settings
// price-analyzer [tui] [SOURCE_DIR] [OUTPUT_FILE] [--synonyms FILE.json]

use crate::error::PriceError;
use crate::export::DEFAULT_OUTPUT;
use crate::headers::SynonymTable;
use crate::ingest::IngestConfig;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Line-by-line console search
    Shell,
    /// Full-screen browser
    Tui,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub mode: Mode,
    pub source_dir: PathBuf,
    pub output_file: PathBuf,
    pub synonyms: SynonymTable,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            mode: Mode::Shell,
            source_dir: PathBuf::from("."),
            output_file: PathBuf::from(DEFAULT_OUTPUT),
            synonyms: SynonymTable::default(),
        }
    }
}

impl Settings {
    /// Parse arguments, program name excluded
    pub fn from_args<I, S>(args: I) -> Result<Self, PriceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut settings = Settings::default();
        let mut positional = Vec::new();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--synonyms" => {
                    let path = args.next().ok_or_else(|| {
                        PriceError::Config("--synonyms needs a file path".to_string())
                    })?;
                    settings.synonyms = SynonymTable::from_json_file(&PathBuf::from(path))?;
                }
                "tui" if positional.is_empty() && settings.mode == Mode::Shell => {
                    settings.mode = Mode::Tui;
                }
                flag if flag.starts_with("--") => {
                    return Err(PriceError::Config(format!("unknown option {}", flag)));
                }
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        if let Some(dir) = positional.next() {
            settings.source_dir = PathBuf::from(dir);
        }
        if let Some(out) = positional.next() {
            settings.output_file = PathBuf::from(out);
        }
        if let Some(extra) = positional.next() {
            return Err(PriceError::Config(format!("unexpected argument {}", extra)));
        }

        Ok(settings)
    }

    pub fn ingest_config(&self) -> IngestConfig {
        IngestConfig::new(self.source_dir.clone()).with_synonyms(self.synonyms.clone())
    }
}
