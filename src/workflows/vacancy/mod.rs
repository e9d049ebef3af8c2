pub mod domain;
pub mod filter;
mod parser;
pub mod storage;

pub use domain::{
    serialize_vacancies, SalaryComparison, SalaryRange, Vacancy, VacancyError, VacancyRecord,
    RECORD_KEYS,
};
pub use filter::{filter, rank_by_salary, truncate, FilterCriteria, FilterPolicy};
pub use parser::{from_raw_collection, from_raw_item};
pub use storage::{
    open_store, CsvVacancyStore, JsonVacancyStore, StorageError, StorageFormat, VacancyStore,
};
