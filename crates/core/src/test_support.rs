//! Scripted [`DataClient`] for service tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use ward_client::{
    BatchResponse, ClientError, ClientResult, DataClient, DeleteRequest, FetchQuery,
    FetchResponse, RecordQuery, RecordResponse, RecordsRequest,
};
use ward_types::RecordId;

pub(crate) enum Reply {
    Fetch(FetchResponse),
    Record(RecordResponse),
    Batch(BatchResponse),
    /// The call itself fails.
    Fail,
}

#[derive(Clone, Debug)]
pub(crate) struct Call {
    pub(crate) operation: &'static str,
    pub(crate) table: String,
    pub(crate) body: Value,
}

/// Answers each call with the next scripted reply and records what was sent.
#[derive(Default)]
pub(crate) struct ScriptedClient {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedClient {
    pub(crate) fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn next(&self, operation: &'static str, table: &str, body: Value) -> Reply {
        self.calls.lock().unwrap().push(Call {
            operation,
            table: table.to_owned(),
            body,
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted reply left for {operation}"))
    }
}

fn scripted_failure() -> ClientError {
    ClientError::Decode("scripted failure".into())
}

#[async_trait]
impl DataClient for ScriptedClient {
    async fn fetch_records(&self, table: &str, query: &FetchQuery) -> ClientResult<FetchResponse> {
        match self.next("fetch", table, serde_json::to_value(query).unwrap()) {
            Reply::Fetch(response) => Ok(response),
            Reply::Fail => Err(scripted_failure()),
            _ => panic!("fetch expects a fetch reply"),
        }
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: RecordId,
        _query: &RecordQuery,
    ) -> ClientResult<RecordResponse> {
        match self.next("get", table, Value::from(id.get())) {
            Reply::Record(response) => Ok(response),
            Reply::Fail => Err(scripted_failure()),
            _ => panic!("get expects a record reply"),
        }
    }

    async fn create_records(
        &self,
        table: &str,
        request: &RecordsRequest,
    ) -> ClientResult<BatchResponse> {
        match self.next("create", table, serde_json::to_value(request).unwrap()) {
            Reply::Batch(response) => Ok(response),
            Reply::Fail => Err(scripted_failure()),
            _ => panic!("create expects a batch reply"),
        }
    }

    async fn update_records(
        &self,
        table: &str,
        request: &RecordsRequest,
    ) -> ClientResult<BatchResponse> {
        match self.next("update", table, serde_json::to_value(request).unwrap()) {
            Reply::Batch(response) => Ok(response),
            Reply::Fail => Err(scripted_failure()),
            _ => panic!("update expects a batch reply"),
        }
    }

    async fn delete_records(
        &self,
        table: &str,
        request: &DeleteRequest,
    ) -> ClientResult<BatchResponse> {
        match self.next("delete", table, serde_json::to_value(request).unwrap()) {
            Reply::Batch(response) => Ok(response),
            Reply::Fail => Err(scripted_failure()),
            _ => panic!("delete expects a batch reply"),
        }
    }
}
