use super::{StorageError, VacancyStore};
use crate::workflows::vacancy::domain::VacancyRecord;
use serde_json::Value;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Stores vacancies as CSV with a header row.
///
/// Text cells are written verbatim, `null` becomes an empty cell and any other
/// value (the salary object, numbers) is written as compact JSON. Reading uses
/// the vacancy record layout: `name` and `url` are always text, `salary` is JSON
/// and the remaining known columns are optional text. Cells of other columns
/// come back as plain strings.
#[derive(Debug, Clone)]
pub struct CsvVacancyStore {
    path: PathBuf,
}

impl CsvVacancyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn csv_error(&self, source: csv::Error) -> StorageError {
        StorageError::Csv {
            path: self.path.clone(),
            source,
        }
    }

    fn read(&self) -> Result<(Vec<String>, Vec<VacancyRecord>), StorageError> {
        let file = File::open(&self.path).map_err(|err| StorageError::io(&self.path, err))?;
        let mut reader = csv::Reader::from_reader(file);

        let header: Vec<String> = reader
            .headers()
            .map_err(|err| self.csv_error(err))?
            .iter()
            .map(str::to_string)
            .collect();
        if header.is_empty() {
            return Err(StorageError::MissingHeader {
                path: self.path.clone(),
            });
        }

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|err| self.csv_error(err))?;
            let record: VacancyRecord = header
                .iter()
                .zip(row.iter())
                .map(|(column, cell)| (column.clone(), decode_cell(column, cell)))
                .collect();
            records.push(record);
        }

        Ok((header, records))
    }

    fn write(&self, header: &[String], records: &[VacancyRecord]) -> Result<(), StorageError> {
        let file = File::create(&self.path).map_err(|err| StorageError::io(&self.path, err))?;
        let mut writer = csv::Writer::from_writer(file);

        writer
            .write_record(header)
            .map_err(|err| self.csv_error(err))?;
        for record in records {
            let row = encode_row(header, record)?;
            writer
                .write_record(&row)
                .map_err(|err| self.csv_error(err))?;
        }

        writer
            .flush()
            .map_err(|err| StorageError::io(&self.path, err))
    }
}

impl VacancyStore for CsvVacancyStore {
    fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<VacancyRecord>, StorageError> {
        self.read().map(|(_, records)| records)
    }

    /// The header comes from the first record, so an empty slice is rejected.
    fn save(&self, records: &[VacancyRecord]) -> Result<(), StorageError> {
        let first = records.first().ok_or(StorageError::EmptyTabularSave)?;
        let header: Vec<String> = first.keys().cloned().collect();
        self.write(&header, records)
    }

    fn append(&self, record: &VacancyRecord) -> Result<(), StorageError> {
        let (header, mut records) = self.read()?;
        records.push(record.clone());
        self.write(&header, &records)
    }

    fn delete(&self, record: &VacancyRecord) -> Result<(), StorageError> {
        let (header, mut records) = self.read()?;
        records.retain(|stored| stored != record);
        self.write(&header, &records)
    }
}

fn encode_row(header: &[String], record: &VacancyRecord) -> Result<Vec<String>, StorageError> {
    if let Some(column) = record.keys().find(|key| !header.contains(key)) {
        return Err(StorageError::UnknownColumn {
            column: column.clone(),
        });
    }

    Ok(header
        .iter()
        .map(|column| record.get(column).map_or_else(String::new, encode_cell))
        .collect())
}

fn encode_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn decode_cell(column: &str, cell: &str) -> Value {
    let text = || Value::String(cell.to_string());
    match column {
        "salary" | "description" | "requirements" if cell.is_empty() => Value::Null,
        "salary" => serde_json::from_str(cell).unwrap_or_else(|_| text()),
        _ => text(),
    }
}
