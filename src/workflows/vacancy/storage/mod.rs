//! File-backed persistence for serialized vacancies.
//!
//! Every operation is a full read-modify-write of the target file without
//! locking. Running two processes against the same file can lose data.

mod json;
mod tabular;

pub use json::JsonVacancyStore;
pub use tabular::CsvVacancyStore;

use super::domain::VacancyRecord;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Storage abstraction shared by the JSON and CSV backends.
pub trait VacancyStore {
    fn path(&self) -> &Path;

    fn load(&self) -> Result<Vec<VacancyRecord>, StorageError>;

    /// Replaces the whole persisted collection.
    fn save(&self, records: &[VacancyRecord]) -> Result<(), StorageError>;

    /// Adds one record to the existing file. The file must already exist.
    fn append(&self, record: &VacancyRecord) -> Result<(), StorageError> {
        let mut records = self.load()?;
        records.push(record.clone());
        self.save(&records)
    }

    /// Drops every stored record equal to `record`.
    fn delete(&self, record: &VacancyRecord) -> Result<(), StorageError> {
        let mut records = self.load()?;
        records.retain(|stored| stored != record);
        self.save(&records)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid CSV in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{} has no header row", .path.display())]
    MissingHeader { path: PathBuf },
    #[error("column `{column}` is not part of the stored header")]
    UnknownColumn { column: String },
    #[error("cannot derive a CSV header from an empty record set")]
    EmptyTabularSave,
}

impl StorageError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StorageFormat {
    Json,
    Csv,
}

impl StorageFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    pub fn default_file_name(self) -> String {
        format!("vacancies.{}", self.extension())
    }
}

impl fmt::Display for StorageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for StorageFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unsupported storage format '{other}'")),
        }
    }
}

pub fn open_store(format: StorageFormat, path: impl Into<PathBuf>) -> Box<dyn VacancyStore> {
    match format {
        StorageFormat::Json => Box::new(JsonVacancyStore::new(path)),
        StorageFormat::Csv => Box::new(CsvVacancyStore::new(path)),
    }
}
