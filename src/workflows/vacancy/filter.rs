use super::domain::Vacancy;
use tracing::debug;

/// Optional per-field constraints collected from the user.
///
/// Blank values impose no constraint. `salary` is kept as text and parsed when
/// the filter runs; unparseable text also means "no salary constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub name: Option<String>,
    pub url: Option<String>,
    pub salary: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
}

/// What to return when the criteria match nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterPolicy {
    pub fallback_to_unfiltered: bool,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self {
            fallback_to_unfiltered: true,
        }
    }
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        [
            &self.name,
            &self.url,
            &self.salary,
            &self.description,
            &self.requirements,
        ]
        .iter()
        .all(|value| supplied(value).is_none())
    }

    /// Parsed salary threshold. Zero counts as no threshold.
    pub fn salary_threshold(&self) -> Option<i64> {
        let raw = supplied(&self.salary)?;
        match raw.trim().parse::<i64>() {
            Ok(0) => None,
            Ok(value) => Some(value),
            Err(err) => {
                debug!(value = raw, error = %err, "ignoring non-numeric salary threshold");
                None
            }
        }
    }

    pub fn matches(&self, vacancy: &Vacancy) -> bool {
        self.matches_with_threshold(vacancy, self.salary_threshold())
    }

    fn matches_with_threshold(&self, vacancy: &Vacancy, threshold: Option<i64>) -> bool {
        text_matches(&self.name, Some(&vacancy.name))
            && text_matches(&self.url, Some(&vacancy.url))
            && salary_matches(threshold, vacancy)
            && text_matches(&self.description, vacancy.description.as_ref())
            && text_matches(&self.requirements, vacancy.requirements.as_ref())
    }
}

/// Keeps the vacancies that satisfy every supplied criterion.
pub fn filter(vacancies: &[Vacancy], criteria: &FilterCriteria, policy: FilterPolicy) -> Vec<Vacancy> {
    if criteria.is_empty() {
        return vacancies.to_vec();
    }

    let threshold = criteria.salary_threshold();
    let matched: Vec<Vacancy> = vacancies
        .iter()
        .filter(|vacancy| criteria.matches_with_threshold(vacancy, threshold))
        .cloned()
        .collect();

    if matched.is_empty() && policy.fallback_to_unfiltered {
        debug!(
            total = vacancies.len(),
            "no vacancy matched the filters, returning the unfiltered list"
        );
        return vacancies.to_vec();
    }

    matched
}

/// Salary rule for a single vacancy against an optional threshold.
pub fn salary_matches(threshold: Option<i64>, vacancy: &Vacancy) -> bool {
    let Some(threshold) = threshold else {
        return true;
    };

    vacancy
        .salary
        .as_ref()
        .filter(|salary| salary.is_disclosed())
        .is_some_and(|salary| salary.admits(threshold))
}

/// First `top_n` vacancies; non-positive counts yield nothing.
pub fn truncate(mut vacancies: Vec<Vacancy>, top_n: i64) -> Vec<Vacancy> {
    let keep = usize::try_from(top_n.max(0)).unwrap_or(usize::MAX);
    vacancies.truncate(keep);
    vacancies
}

/// Stable sort by [`Vacancy::salary_cmp`], highest first. Vacancies without an
/// upper bound keep their relative order at the end.
pub fn rank_by_salary(mut vacancies: Vec<Vacancy>) -> Vec<Vacancy> {
    vacancies.sort_by(|left, right| {
        right.salary_cmp(left).unwrap_or_else(|| {
            let ranked = |vacancy: &Vacancy| vacancy.upper_salary().is_some();
            ranked(right).cmp(&ranked(left))
        })
    });
    vacancies
}

fn supplied(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

fn text_matches(criterion: &Option<String>, field: Option<&String>) -> bool {
    match supplied(criterion) {
        Some(expected) => field.is_some_and(|actual| actual == expected),
        None => true,
    }
}
