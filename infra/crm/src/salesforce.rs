use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dormant_domain::constants::DEFAULT_API_VERSION;
use dormant_domain::model::ResourceDescriptor;
use dormant_vault::Credential;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::api::CrmApi;
use crate::endpoint::OrgEndpoint;
use crate::error::{CrmError, CrmErrorExt};
use crate::soql;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// `GET /sobjects` payload; only the fields the scanner needs are kept.
#[derive(Debug, Deserialize)]
struct DescribeGlobal {
    sobjects: Vec<ResourceDescriptor>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    total_size: u64,
    #[serde(default)]
    records: Vec<serde_json::Value>,
}

/// One element of the `[{"message", "errorCode"}]` body Salesforce returns on errors.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiFault {
    message: String,
    #[serde(default)]
    error_code: Option<String>,
}

/// Salesforce REST client. Cloning shares the connection pool.
#[derive(Debug, Clone)]
pub struct SalesforceClient {
    http: reqwest::Client,
    api_version: Arc<str>,
}

#[derive(Debug, Clone)]
pub struct SalesforceClientBuilder {
    api_version: String,
    connect_timeout: Duration,
    request_timeout: Option<Duration>,
}

impl Default for SalesforceClientBuilder {
    fn default() -> Self {
        Self {
            api_version: DEFAULT_API_VERSION.to_owned(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

impl SalesforceClientBuilder {
    #[must_use = "Sets the REST API version, e.g. `59.0`"]
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    #[must_use = "Sets the TCP/TLS connect timeout"]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Overall per-request timeout. Unset by default; the scanner bounds each
    /// query itself.
    #[must_use = "Sets the overall per-request timeout"]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<SalesforceClient, CrmError> {
        let version = self.api_version.trim().trim_start_matches(['v', 'V']);
        if version.is_empty() || !version.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return Err(CrmError::InvalidEndpoint {
                message: format!("`{}` is not an API version", self.api_version).into(),
                context: Some("crm.api_version".into()),
            });
        }

        let mut http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(self.connect_timeout);
        if let Some(timeout) = self.request_timeout {
            http = http.timeout(timeout);
        }
        let http = http.build().context("HTTP client initialization")?;

        Ok(SalesforceClient { http, api_version: Arc::from(version) })
    }
}

impl SalesforceClient {
    #[must_use]
    pub fn builder() -> SalesforceClientBuilder {
        SalesforceClientBuilder::default()
    }

    #[must_use]
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    fn data_url(&self, endpoint: &OrgEndpoint, resource: &str) -> Result<Url, CrmError> {
        endpoint.join(&format!("services/data/v{}/{resource}", self.api_version))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        credential: &Credential,
        request: reqwest::RequestBuilder,
    ) -> Result<T, CrmError> {
        let response = request
            .bearer_auth(credential.expose())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await.context("reading response body")?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        serde_json::from_slice(&body).map_err(CrmError::from)
    }
}

#[async_trait]
impl CrmApi for SalesforceClient {
    async fn list_resources(
        &self,
        credential: &Credential,
        endpoint: &OrgEndpoint,
    ) -> Result<Vec<ResourceDescriptor>, CrmError> {
        let url = self.data_url(endpoint, "sobjects")?;
        let describe: DescribeGlobal = self
            .get_json(credential, self.http.get(url))
            .await
            .context("listing objects")?;

        debug!(org = %endpoint, objects = describe.sobjects.len(), "Listed org objects");
        Ok(describe.sobjects)
    }

    async fn has_recent_activity(
        &self,
        credential: &Credential,
        endpoint: &OrgEndpoint,
        resource: &str,
        since: DateTime<Utc>,
    ) -> Result<bool, CrmError> {
        let query = soql::existence_query(resource, since)?;
        let url = self.data_url(endpoint, "query")?;

        let result: QueryResponse =
            self.get_json(credential, self.http.get(url).query(&[("q", query.as_str())])).await?;

        Ok(result.total_size > 0 || !result.records.is_empty())
    }
}

fn status_error(status: StatusCode, body: &[u8]) -> CrmError {
    let message = serde_json::from_slice::<Vec<ApiFault>>(body)
        .ok()
        .and_then(|faults| faults.into_iter().next())
        .map_or_else(
            || status.canonical_reason().unwrap_or("unexpected status").to_owned(),
            |fault| match fault.error_code {
                Some(code) => format!("{code}: {}", fault.message),
                None => fault.message,
            },
        );

    CrmError::Status { status: status.as_u16(), message: message.into(), context: None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_prefers_salesforce_fault() {
        let body = br#"[{"message":"sObject type 'Gone__c' is not supported.","errorCode":"INVALID_TYPE"}]"#;
        let err = status_error(StatusCode::BAD_REQUEST, body);

        assert_eq!(err.status(), Some(400));
        assert!(err.to_string().contains("INVALID_TYPE: sObject type 'Gone__c' is not supported."));
    }

    #[test]
    fn status_error_falls_back_to_reason_phrase() {
        let err = status_error(StatusCode::SERVICE_UNAVAILABLE, b"<html>maintenance</html>");
        assert!(err.to_string().contains("Service Unavailable"));
        assert!(!err.to_string().contains("maintenance"));
    }

    #[test]
    fn builder_normalizes_version() {
        let client = SalesforceClient::builder().api_version("v60.0").build().unwrap();
        assert_eq!(client.api_version(), "60.0");
        assert!(SalesforceClient::builder().api_version("latest").build().is_err());
    }
}
