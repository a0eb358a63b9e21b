use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;
use crate::error::{DashError, Result};
use crate::models::{validate_issues, Issue, Summary};

pub const SUMMARY_ENDPOINT: &str = "api/summary";
pub const ISSUES_ENDPOINT: &str = "api/issues";

pub struct ApiClient {
    client: Client,
    api_url: Url,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| DashError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
        })
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        self.api_url
            .join(endpoint)
            .map_err(|e| DashError::Config(format!("Invalid endpoint URL '{endpoint}': {e}")))
    }

    /// GET an endpoint and decode its JSON body.
    ///
    /// The body is read as text first so a decoding failure surfaces as
    /// `MalformedBody` rather than as a transport error.
    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self.endpoint_url(endpoint)?;
        debug!("GET {url}");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DashError::HttpStatus {
                endpoint: endpoint.to_string(),
                status,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| malformed(endpoint, e.to_string()))
    }

    pub async fn fetch_summary(&self) -> Result<Summary> {
        let summary: Summary = self.get_json(SUMMARY_ENDPOINT).await?;
        summary
            .validate()
            .map_err(|reason| malformed(SUMMARY_ENDPOINT, reason))?;
        Ok(summary)
    }

    pub async fn fetch_issues(&self) -> Result<Vec<Issue>> {
        let issues: Vec<Issue> = self.get_json(ISSUES_ENDPOINT).await?;
        validate_issues(&issues).map_err(|reason| malformed(ISSUES_ENDPOINT, reason))?;
        Ok(issues)
    }
}

fn malformed(endpoint: &str, reason: String) -> DashError {
    DashError::MalformedBody {
        endpoint: endpoint.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMARY_BODY: &str = r#"{
        "project": "CORE",
        "total_issues": 3,
        "throughput_last_7_days": 1,
        "avg_cycle_time_days": 2.0,
        "status_counts": {"Done": 1, "To Do": 2}
    }"#;

    fn client_for(url: &str) -> ApiClient {
        let config = Config::new(url, None).unwrap();
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_url_joins_under_prefix() {
        let client = client_for("http://localhost:5000/dash");
        let url = client.endpoint_url(SUMMARY_ENDPOINT).unwrap();

        assert_eq!(url.as_str(), "http://localhost:5000/dash/api/summary");
    }

    #[tokio::test]
    async fn test_fetch_summary_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/summary")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(SUMMARY_BODY)
            .create_async()
            .await;

        let summary = client_for(&server.url()).fetch_summary().await.unwrap();

        mock.assert_async().await;
        assert_eq!(summary.project, "CORE");
        assert_eq!(summary.total_issues, 3);
        assert_eq!(summary.status_counts.get("To Do"), Some(&2));
    }

    #[tokio::test]
    async fn test_fetch_summary_http_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/summary")
            .with_status(500)
            .create_async()
            .await;

        let err = client_for(&server.url()).fetch_summary().await.unwrap_err();

        match err {
            DashError::HttpStatus { endpoint, status } => {
                assert_eq!(endpoint, SUMMARY_ENDPOINT);
                assert_eq!(status.as_u16(), 500);
            }
            other => panic!("expected HttpStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_issues_malformed_json() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/issues")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let err = client_for(&server.url()).fetch_issues().await.unwrap_err();

        assert!(matches!(err, DashError::MalformedBody { .. }));
    }

    #[tokio::test]
    async fn test_fetch_issues_wrong_shape() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/issues")
            .with_status(200)
            .with_body(r#"{"issues": []}"#)
            .create_async()
            .await;

        let err = client_for(&server.url()).fetch_issues().await.unwrap_err();

        assert!(matches!(err, DashError::MalformedBody { .. }));
    }

    #[tokio::test]
    async fn test_fetch_issues_duplicate_keys_are_malformed() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/issues")
            .with_status(200)
            .with_body(
                r#"[
                    {"key":"X-1","summary":"a","status":"Done","assignee":"A","cycle_time_days":1},
                    {"key":"X-1","summary":"b","status":"Done","assignee":"B","cycle_time_days":2}
                ]"#,
            )
            .create_async()
            .await;

        let err = client_for(&server.url()).fetch_issues().await.unwrap_err();

        assert!(err.to_string().contains("duplicate issue key X-1"));
    }

    #[tokio::test]
    async fn test_fetch_issues_preserves_order() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/issues")
            .with_status(200)
            .with_body(
                r#"[
                    {"key":"X-9","summary":"a","status":"Done","assignee":"A","cycle_time_days":1},
                    {"key":"X-2","summary":"b","status":"To Do","assignee":"B","cycle_time_days":0}
                ]"#,
            )
            .create_async()
            .await;

        let issues = client_for(&server.url()).fetch_issues().await.unwrap();
        let keys: Vec<_> = issues.iter().map(|i| i.key.as_str()).collect();

        assert_eq!(keys, vec!["X-9", "X-2"]);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let client = client_for("http://127.0.0.1:1");

        let err = client.fetch_summary().await.unwrap_err();

        assert!(matches!(err, DashError::Network(_)));
    }
}
