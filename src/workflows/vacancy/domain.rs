use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// Serialized form of a vacancy as it is printed and persisted.
pub type VacancyRecord = Map<String, Value>;

/// Keys of a serialized vacancy, in output order.
pub const RECORD_KEYS: [&str; 5] = ["name", "url", "salary", "description", "requirements"];

/// Advertised salary bounds. Either bound may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRange {
    #[serde(default)]
    pub from: Option<i64>,
    #[serde(default)]
    pub to: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl SalaryRange {
    pub fn new(from: Option<i64>, to: Option<i64>) -> Self {
        Self {
            from,
            to,
            currency: None,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// A range with no bounds carries no information about pay.
    pub fn is_disclosed(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    /// Range check against a requested salary.
    pub fn admits(&self, threshold: i64) -> bool {
        match (self.from, self.to) {
            (Some(from), None) => threshold >= from,
            (None, Some(to)) => threshold <= to,
            (Some(from), Some(to)) => from <= threshold && threshold <= to,
            (None, None) => false,
        }
    }

    fn to_value(&self) -> Value {
        let mut range = Map::new();
        range.insert("from".to_string(), self.from.map_or(Value::Null, Value::from));
        range.insert("to".to_string(), self.to.map_or(Value::Null, Value::from));
        if let Some(currency) = &self.currency {
            range.insert("currency".to_string(), Value::String(currency.clone()));
        }
        Value::Object(range)
    }
}

/// A single job posting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vacancy {
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub salary: Option<SalaryRange>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub requirements: Option<String>,
}

/// Outcome of ranking two vacancies by their upper salary bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalaryComparison<'a> {
    Greater(&'a Vacancy),
    Lesser(&'a Vacancy),
    /// At least one side has no upper salary bound.
    Unorderable,
}

impl Vacancy {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_salary(mut self, salary: SalaryRange) -> Self {
        self.salary = Some(salary);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_requirements(mut self, requirements: impl Into<String>) -> Self {
        self.requirements = Some(requirements.into());
        self
    }

    pub fn upper_salary(&self) -> Option<i64> {
        self.salary.as_ref().and_then(|salary| salary.to)
    }

    /// Orders two vacancies by upper salary bound, `None` when either is missing.
    pub fn salary_cmp(&self, other: &Vacancy) -> Option<Ordering> {
        Some(self.upper_salary()?.cmp(&other.upper_salary()?))
    }

    /// Picks the vacancy with the higher upper bound. Ties go to `other`.
    pub fn greater<'a>(&'a self, other: &'a Vacancy) -> SalaryComparison<'a> {
        match self.salary_cmp(other) {
            Some(Ordering::Greater) => SalaryComparison::Greater(self),
            Some(_) => SalaryComparison::Greater(other),
            None => SalaryComparison::Unorderable,
        }
    }

    /// Picks the vacancy with the lower upper bound. Ties go to `other`.
    pub fn less<'a>(&'a self, other: &'a Vacancy) -> SalaryComparison<'a> {
        match self.salary_cmp(other) {
            Some(Ordering::Less) => SalaryComparison::Lesser(self),
            Some(_) => SalaryComparison::Lesser(other),
            None => SalaryComparison::Unorderable,
        }
    }

    pub fn to_record(&self) -> VacancyRecord {
        let mut record = Map::new();
        record.insert("name".to_string(), Value::String(self.name.clone()));
        record.insert("url".to_string(), Value::String(self.url.clone()));
        record.insert(
            "salary".to_string(),
            self.salary
                .as_ref()
                .map_or(Value::Null, SalaryRange::to_value),
        );
        record.insert("description".to_string(), optional_text(&self.description));
        record.insert("requirements".to_string(), optional_text(&self.requirements));
        record
    }
}

pub fn serialize_vacancies(vacancies: &[Vacancy]) -> Vec<VacancyRecord> {
    vacancies.iter().map(Vacancy::to_record).collect()
}

fn optional_text(value: &Option<String>) -> Value {
    value.clone().map_or(Value::Null, Value::String)
}

#[derive(Debug, thiserror::Error)]
pub enum VacancyError {
    #[error("vacancy payload has no `items` array")]
    MissingItems,
    #[error("vacancy item #{index} is malformed: {source}")]
    MalformedItem {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("vacancy item is malformed: {0}")]
    MalformedRecord(#[source] serde_json::Error),
}
