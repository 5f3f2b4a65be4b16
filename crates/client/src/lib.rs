//! # Ward client
//!
//! Remote CRUD access to the hosted data platform.
//!
//! Every operation addresses one named table and answers with a uniform envelope:
//! `success`, then either `data` (reads) or per-record `results` (writes), plus an
//! optional `message`. A transport-level failure (the call could not be made, or the
//! body could not be understood) is a [`ClientError`]; a call the platform answered
//! with `success: false` is *not* an error at this layer and is left to the caller.
//!
//! Two bindings ship with the crate:
//! - [`HttpDataClient`] talks to the platform over HTTP
//! - [`MemoryDataClient`] keeps tables in process, for development and tests

#![warn(rust_2018_idioms)]

mod envelope;
mod http;
mod memory;
mod query;

pub use envelope::{
    BatchResponse, DeleteRequest, FetchResponse, FieldError, RecordResponse, RecordResult,
    RecordsRequest,
};
pub use http::HttpDataClient;
pub use memory::MemoryDataClient;
pub use query::{
    Condition, ConditionGroup, FetchQuery, FieldName, FieldSelector, GroupCondition, GroupOperator,
    Operator, OrderBy, PagingInfo, RecordQuery, SortType, SubGroup,
};

use async_trait::async_trait;
use ward_types::RecordId;

/// Errors raised when a call to the platform cannot complete.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("platform answered with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode platform response: {0}")]
    Decode(String),

    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

/// Type alias for Results that can fail with a [`ClientError`].
pub type ClientResult<T> = Result<T, ClientError>;

/// The five table operations of the hosted platform.
#[async_trait]
pub trait DataClient: Send + Sync {
    /// Read records matching `query`.
    async fn fetch_records(&self, table: &str, query: &FetchQuery) -> ClientResult<FetchResponse>;

    /// Read one record.
    async fn get_record_by_id(
        &self,
        table: &str,
        id: RecordId,
        query: &RecordQuery,
    ) -> ClientResult<RecordResponse>;

    /// Create every record in `request`; results come back in submission order.
    async fn create_records(
        &self,
        table: &str,
        request: &RecordsRequest,
    ) -> ClientResult<BatchResponse>;

    /// Apply every assignment set in `request`. Each record carries its `Id`.
    async fn update_records(
        &self,
        table: &str,
        request: &RecordsRequest,
    ) -> ClientResult<BatchResponse>;

    async fn delete_records(
        &self,
        table: &str,
        request: &DeleteRequest,
    ) -> ClientResult<BatchResponse>;
}
