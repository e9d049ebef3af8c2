use crate::config::ApiConfig;
use crate::workflows::search::VacancySource;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} responded with {status}")]
    Status { url: String, status: StatusCode },
    #[error("response from {url} is not valid JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Blocking client for the hh.ru vacancy search endpoint.
#[derive(Debug, Clone)]
pub struct HhClient {
    http: Client,
    config: ApiConfig,
}

impl HhClient {
    pub fn new(config: ApiConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { http, config })
    }

    /// Fetches one page of search results as raw JSON.
    pub fn get_vacancies(&self, keyword: &str, page: Option<u32>) -> Result<Value, FetchError> {
        let url = self.config.vacancies_url.as_str();
        let query = search_query(keyword, page, self.config.per_page);
        debug!(url, ?query, "requesting vacancies");

        let response = self
            .http
            .get(url)
            .query(&query)
            .send()
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let payload: Value = response.json().map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })?;
        let items = payload
            .get("items")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        info!(keyword, items, "vacancies fetched");
        Ok(payload)
    }
}

impl VacancySource for HhClient {
    fn fetch(&self, keyword: &str, page: Option<u32>) -> Result<Value, FetchError> {
        self.get_vacancies(keyword, page)
    }
}

fn search_query(keyword: &str, page: Option<u32>, per_page: u32) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("text", keyword.to_string()),
        ("per_page", per_page.to_string()),
    ];
    if let Some(page) = page {
        query.push(("page", page.to_string()));
    }
    query
}
