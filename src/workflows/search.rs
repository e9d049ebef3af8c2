use crate::workflows::hh::FetchError;
use crate::workflows::vacancy::{
    filter, from_raw_collection, rank_by_salary, serialize_vacancies, truncate, FilterCriteria,
    FilterPolicy, StorageError, VacancyError, VacancyRecord, VacancyStore,
};
use serde_json::Value;
use tracing::info;

/// Anything that can answer a keyword search with an hh.ru shaped payload.
pub trait VacancySource {
    fn fetch(&self, keyword: &str, page: Option<u32>) -> Result<Value, FetchError>;
}

#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub keyword: String,
    pub page: Option<u32>,
    pub criteria: FilterCriteria,
    pub top: i64,
    pub rank_by_salary: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Vacancy(#[from] VacancyError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Fetch, filter, truncate and persist a single search.
pub struct VacancySearch<'a, S: VacancySource> {
    source: &'a S,
    policy: FilterPolicy,
}

impl<'a, S: VacancySource> VacancySearch<'a, S> {
    pub fn new(source: &'a S, policy: FilterPolicy) -> Self {
        Self { source, policy }
    }

    /// Runs the search and writes the result through `store`, returning what
    /// was written.
    pub fn run(
        &self,
        request: &SearchRequest,
        store: &dyn VacancyStore,
    ) -> Result<Vec<VacancyRecord>, SearchError> {
        let payload = self.source.fetch(&request.keyword, request.page)?;
        let vacancies = from_raw_collection(&payload)?;
        let fetched = vacancies.len();

        let mut selected = filter(&vacancies, &request.criteria, self.policy);
        let matched = selected.len();
        if request.rank_by_salary {
            selected = rank_by_salary(selected);
        }
        let selected = truncate(selected, request.top);

        let records = serialize_vacancies(&selected);
        store.save(&records)?;

        info!(
            keyword = %request.keyword,
            fetched,
            matched,
            saved = records.len(),
            path = %store.path().display(),
            "vacancies saved"
        );
        Ok(records)
    }
}
