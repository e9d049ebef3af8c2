use super::{StorageError, VacancyStore};
use crate::workflows::vacancy::domain::VacancyRecord;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores vacancies as a single indented JSON array.
#[derive(Debug, Clone)]
pub struct JsonVacancyStore {
    path: PathBuf,
}

impl JsonVacancyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn json_error(&self, source: serde_json::Error) -> StorageError {
        StorageError::Json {
            path: self.path.clone(),
            source,
        }
    }
}

impl VacancyStore for JsonVacancyStore {
    fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<VacancyRecord>, StorageError> {
        let contents =
            fs::read_to_string(&self.path).map_err(|err| StorageError::io(&self.path, err))?;
        serde_json::from_str(&contents).map_err(|err| self.json_error(err))
    }

    fn save(&self, records: &[VacancyRecord]) -> Result<(), StorageError> {
        let mut buffer = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
        records
            .serialize(&mut serializer)
            .map_err(|err| self.json_error(err))?;

        fs::write(&self.path, buffer).map_err(|err| StorageError::io(&self.path, err))
    }
}
