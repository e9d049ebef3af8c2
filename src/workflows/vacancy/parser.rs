use super::domain::{SalaryRange, Vacancy, VacancyError};
use serde::Deserialize;
use serde_json::Value;

/// Builds vacancies from an hh.ru search payload, preserving item order.
pub fn from_raw_collection(payload: &Value) -> Result<Vec<Vacancy>, VacancyError> {
    let items = payload
        .get("items")
        .and_then(Value::as_array)
        .ok_or(VacancyError::MissingItems)?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            RawVacancy::deserialize(item)
                .map(Vacancy::from)
                .map_err(|source| VacancyError::MalformedItem { index, source })
        })
        .collect()
}

/// Builds a single vacancy from one raw item.
pub fn from_raw_item(item: &Value) -> Result<Vacancy, VacancyError> {
    RawVacancy::deserialize(item)
        .map(Vacancy::from)
        .map_err(VacancyError::MalformedRecord)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawVacancy {
    name: Option<String>,
    url: Option<String>,
    salary: Option<RawSalary>,
    description: Option<String>,
    snippet: Option<RawSnippet>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSalary {
    from: Option<i64>,
    to: Option<i64>,
    currency: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSnippet {
    requirement: Option<String>,
}

impl From<RawVacancy> for Vacancy {
    fn from(raw: RawVacancy) -> Self {
        Self {
            name: raw.name.unwrap_or_default(),
            url: raw.url.unwrap_or_default(),
            salary: raw.salary.map(|salary| SalaryRange {
                from: salary.from,
                to: salary.to,
                currency: salary.currency,
            }),
            description: raw.description,
            requirements: raw.snippet.and_then(|snippet| snippet.requirement),
        }
    }
}
