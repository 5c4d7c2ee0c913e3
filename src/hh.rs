use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::vacancy::Salary;

const PAGE_SIZE: u32 = 100;

/// Hard cap on accumulated records per employer, to bound ingestion time
/// against very large employers.
const MAX_RESULTS: usize = 500;

/// Fixed pause between page requests; the API has informal rate limits.
const PAGE_DELAY: Duration = Duration::from_millis(200);

/// The HH API rejects default client user agents.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// One page of the vacancy search response.
#[derive(Debug, Deserialize)]
pub struct SearchPage {
    pub items: Vec<VacancyItem>,
    pub found: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VacancyItem {
    pub name: String,
    pub salary: Option<Salary>,
    pub alternate_url: String,
    #[serde(default)]
    pub snippet: Snippet,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snippet {
    #[serde(default)]
    pub requirement: Option<String>,
    #[serde(default)]
    pub responsibility: Option<String>,
}

/// A source of vacancy listings for one employer.
#[async_trait]
pub trait VacancySource: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch every vacancy for the given employer. Failures mid-way yield
    /// whatever was accumulated so far, never an error.
    async fn fetch_all(&self, employer_hh_id: &str) -> Vec<VacancyItem>;
}

pub struct HhClient {
    http: reqwest::Client,
    base_url: String,
    page_delay: Duration,
}

impl HhClient {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            page_delay: PAGE_DELAY,
        })
    }

    #[cfg(test)]
    fn without_delay(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            page_delay: Duration::ZERO,
        }
    }

    async fn fetch_page(&self, employer_hh_id: &str, page: u32) -> Result<SearchPage, AppError> {
        let resp = self
            .http
            .get(format!("{}/vacancies", self.base_url))
            .query(&[
                ("employer_id", employer_hh_id.to_string()),
                ("per_page", PAGE_SIZE.to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(AppError::ApiStatus(resp.status()));
        }

        Ok(resp.json().await?)
    }
}

#[async_trait]
impl VacancySource for HhClient {
    fn name(&self) -> &str {
        "hh"
    }

    /// Paginates until the accumulated count reaches the API-reported total
    /// or the hard cap, whichever comes first. A failed page logs a warning
    /// and ends pagination for this employer (partial-result policy).
    async fn fetch_all(&self, employer_hh_id: &str) -> Vec<VacancyItem> {
        let mut items: Vec<VacancyItem> = Vec::new();

        for page in 0u32.. {
            if page > 0 {
                tokio::time::sleep(self.page_delay).await;
            }

            let body = match self.fetch_page(employer_hh_id, page).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(
                        "Pagination for employer {employer_hh_id} aborted on page {page}: {e}"
                    );
                    break;
                }
            };

            // An empty page means the API will make no further progress.
            if body.items.is_empty() {
                break;
            }
            items.extend(body.items);

            if items.len() >= body.found || items.len() >= MAX_RESULTS {
                break;
            }
        }

        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn page_body(count: usize, found: usize) -> serde_json::Value {
        let items: Vec<serde_json::Value> = (0..count)
            .map(|i| {
                serde_json::json!({
                    "name": format!("Vacancy {i}"),
                    "salary": null,
                    "alternate_url": format!("https://hh.ru/vacancy/{i}"),
                    "snippet": {"requirement": null, "responsibility": null}
                })
            })
            .collect();
        serde_json::json!({"items": items, "found": found})
    }

    async fn mount_page(server: &MockServer, page: u32, response: ResponseTemplate, expect: u64) {
        Mock::given(method("GET"))
            .and(path("/vacancies"))
            .and(query_param("employer_id", "3529"))
            .and(query_param("per_page", "100"))
            .and(query_param("page", page.to_string()))
            .respond_with(response)
            .expect(expect)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn stops_at_hard_cap_before_reported_total() {
        let server = MockServer::start().await;
        for page in 0..5 {
            let resp = ResponseTemplate::new(200).set_body_json(page_body(100, 650));
            mount_page(&server, page, resp, 1).await;
        }
        // Page 5 must never be requested once the cap is reached.
        let resp = ResponseTemplate::new(200).set_body_json(page_body(100, 650));
        mount_page(&server, 5, resp, 0).await;

        let client = HhClient::without_delay(server.uri());
        let items = client.fetch_all("3529").await;
        assert_eq!(items.len(), 500);
    }

    #[tokio::test]
    async fn stops_once_reported_total_is_reached() {
        let server = MockServer::start().await;
        let resp = ResponseTemplate::new(200).set_body_json(page_body(3, 3));
        mount_page(&server, 0, resp, 1).await;
        mount_page(&server, 1, ResponseTemplate::new(200), 0).await;

        let client = HhClient::without_delay(server.uri());
        let items = client.fetch_all("3529").await;
        assert_eq!(items.len(), 3);
    }

    #[tokio::test]
    async fn failed_page_yields_partial_results() {
        let server = MockServer::start().await;
        let resp = ResponseTemplate::new(200).set_body_json(page_body(100, 250));
        mount_page(&server, 0, resp, 1).await;
        mount_page(&server, 1, ResponseTemplate::new(500), 1).await;

        let client = HhClient::without_delay(server.uri());
        let items = client.fetch_all("3529").await;
        assert_eq!(items.len(), 100);
    }

    #[tokio::test]
    async fn empty_first_page_yields_nothing() {
        let server = MockServer::start().await;
        let resp = ResponseTemplate::new(200).set_body_json(page_body(0, 0));
        mount_page(&server, 0, resp, 1).await;

        let client = HhClient::without_delay(server.uri());
        assert!(client.fetch_all("3529").await.is_empty());
    }

    #[test]
    fn deserializes_item_with_missing_optional_fields() {
        let item: VacancyItem = serde_json::from_value(serde_json::json!({
            "name": "Rust Developer",
            "salary": null,
            "alternate_url": "https://hh.ru/vacancy/1"
        }))
        .unwrap();
        assert!(item.salary.is_none());
        assert!(item.snippet.requirement.is_none());

        let item: VacancyItem = serde_json::from_value(serde_json::json!({
            "name": "Rust Developer",
            "salary": {"from": 100000, "to": null, "currency": "RUR"},
            "alternate_url": "https://hh.ru/vacancy/2",
            "snippet": {"requirement": "Rust experience", "responsibility": null}
        }))
        .unwrap();
        assert_eq!(item.salary.unwrap().from, Some(100_000));
        assert_eq!(item.snippet.requirement.as_deref(), Some("Rust experience"));
    }
}
