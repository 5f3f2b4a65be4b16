//! HTTP binding of [`DataClient`].

use crate::{
    BatchResponse, ClientError, ClientResult, DataClient, DeleteRequest, FetchQuery,
    FetchResponse, RecordQuery, RecordResponse, RecordsRequest,
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use ward_types::RecordId;

const PROJECT_HEADER: &str = "x-project-id";
const PUBLIC_KEY_HEADER: &str = "x-public-key";

/// Longest response body quoted back in a [`ClientError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Talks to the hosted platform over HTTP.
///
/// Every operation is a JSON `POST` to `{base}/tables/{table}/{action}`, authenticated by
/// the project id and public key headers.
#[derive(Clone, Debug)]
pub struct HttpDataClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct GetRequest<'a> {
    #[serde(rename = "RecordId")]
    record_id: RecordId,
    #[serde(flatten)]
    query: &'a RecordQuery,
}

impl HttpDataClient {
    /// Build a client for one project.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidConfig` if the base URL is blank or a credential cannot be
    /// sent as a header, and `ClientError::Http` if the underlying client cannot be built.
    pub fn new(
        base_url: &str,
        project_id: &str,
        public_key: &str,
        timeout: Duration,
    ) -> ClientResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ClientError::InvalidConfig("base URL is empty".into()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(PROJECT_HEADER),
            header_value("project id", project_id)?,
        );
        let mut key = header_value("public key", public_key)?;
        key.set_sensitive(true);
        headers.insert(HeaderName::from_static(PUBLIC_KEY_HEADER), key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_owned(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, table: &str, action: &str) -> String {
        format!("{}/tables/{}/{}", self.base_url, table, action)
    }

    async fn call<B, R>(&self, table: &str, action: &str, body: &B) -> ClientResult<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(table, action);
        tracing::debug!(table, action, "-- POST {}", url);

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(table, action, status = status.as_u16(), "platform call failed");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: truncate(text, MAX_ERROR_BODY),
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| ClientError::Decode(format!("{action} on {table}: {e}")))
    }
}

#[async_trait]
impl DataClient for HttpDataClient {
    async fn fetch_records(&self, table: &str, query: &FetchQuery) -> ClientResult<FetchResponse> {
        self.call(table, "fetch", query).await
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: RecordId,
        query: &RecordQuery,
    ) -> ClientResult<RecordResponse> {
        let body = GetRequest {
            record_id: id,
            query,
        };
        self.call(table, "get", &body).await
    }

    async fn create_records(
        &self,
        table: &str,
        request: &RecordsRequest,
    ) -> ClientResult<BatchResponse> {
        self.call(table, "create", request).await
    }

    async fn update_records(
        &self,
        table: &str,
        request: &RecordsRequest,
    ) -> ClientResult<BatchResponse> {
        self.call(table, "update", request).await
    }

    async fn delete_records(
        &self,
        table: &str,
        request: &DeleteRequest,
    ) -> ClientResult<BatchResponse> {
        self.call(table, "delete", request).await
    }
}

fn header_value(what: &str, raw: &str) -> ClientResult<HeaderValue> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ClientError::InvalidConfig(format!("{what} is empty")));
    }
    HeaderValue::from_str(raw)
        .map_err(|_| ClientError::InvalidConfig(format!("{what} contains invalid characters")))
}

fn truncate(mut text: String, max: usize) -> String {
    if text.len() > max {
        let mut cut = max;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push('…');
    }
    text
}
