//! Generic entity service.
//!
//! Every entity goes through the same five operations. Reads that return a list never
//! fail: a transport failure is logged and yields an empty list. Single-record reads
//! normalise every failure into `NotFound`. Writes surface the first failed sub-result
//! of the batch.

use crate::{ServiceError, ServiceResult, TransportError};
use chrono::Utc;
use std::marker::PhantomData;
use std::sync::Arc;
use ward_client::{
    BatchResponse, DataClient, DeleteRequest, FetchQuery, RecordQuery, RecordsRequest, SortType,
};
use ward_types::{RecordId, ToRecordId};
use ward_wire::{Entity, RecordInput};

/// CRUD over one remote table, mapping records to the view shape of `E`.
pub struct EntityService<E> {
    client: Arc<dyn DataClient>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for EntityService<E> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            _entity: PhantomData,
        }
    }
}

impl<E> std::fmt::Debug for EntityService<E>
where
    E: Entity,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityService")
            .field("table", &E::TABLE)
            .finish_non_exhaustive()
    }
}

impl<E: Entity> EntityService<E> {
    pub fn new(client: Arc<dyn DataClient>) -> Self {
        Self {
            client,
            _entity: PhantomData,
        }
    }

    pub fn table(&self) -> &'static str {
        E::TABLE
    }

    /// Full field set in the entity's list order.
    pub(crate) fn list_query(&self) -> FetchQuery {
        self.ordered(FetchQuery::new(E::FIELDS))
    }

    /// Append the entity's list order to `query`.
    pub(crate) fn ordered(&self, query: FetchQuery) -> FetchQuery {
        E::ORDER.iter().fold(query, |query, key| {
            let sort = if key.descending {
                SortType::Desc
            } else {
                SortType::Asc
            };
            query.order(key.field, sort)
        })
    }

    /// Every record in the table.
    pub async fn get_all(&self) -> Vec<E> {
        self.fetch("get_all", self.list_query()).await
    }

    /// One page of the table in list order, skipping `offset` records.
    pub async fn get_page(&self, limit: usize, offset: usize) -> Vec<E> {
        self.fetch("get_page", self.list_query().page(limit, offset))
            .await
    }

    /// Run a list read, logging and swallowing any failure.
    pub(crate) async fn fetch(&self, operation: &'static str, query: FetchQuery) -> Vec<E> {
        let response = match self.client.fetch_records(E::TABLE, &query).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(entity = E::LABEL, operation, error = %e, "list read failed");
                return Vec::new();
            }
        };

        if !response.success {
            tracing::error!(
                entity = E::LABEL,
                operation,
                error = response.message.as_deref().unwrap_or("unknown error"),
                "list read rejected"
            );
            return Vec::new();
        }

        response
            .data
            .unwrap_or_default()
            .into_iter()
            .filter_map(|raw| match E::decode(raw) {
                Ok(view) => Some(view),
                Err(e) => {
                    tracing::warn!(entity = E::LABEL, operation, error = %e, "skipping record");
                    None
                }
            })
            .collect()
    }

    /// One record by identifier.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` when the record does not exist and for every other
    /// failure, including an identifier that is not numeric.
    pub async fn get_by_id(&self, id: impl ToRecordId) -> ServiceResult<E> {
        let id = match id.to_record_id() {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(
                    entity = E::LABEL,
                    operation = "get_by_id",
                    error = %e,
                    "bad identifier"
                );
                return Err(self.not_found(e.raw()));
            }
        };

        let query = RecordQuery::new(E::FIELDS);
        let response = match self.client.get_record_by_id(E::TABLE, id, &query).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    entity = E::LABEL,
                    operation = "get_by_id",
                    %id,
                    error = %e,
                    "read failed"
                );
                return Err(self.not_found(id));
            }
        };

        if !response.success {
            tracing::warn!(
                entity = E::LABEL,
                operation = "get_by_id",
                %id,
                error = response.message.as_deref().unwrap_or("unknown error"),
                "read rejected"
            );
            return Err(self.not_found(id));
        }

        match response.data.filter(|d| !d.is_null()) {
            Some(raw) => E::decode(raw).map_err(|e| {
                tracing::warn!(
                    entity = E::LABEL,
                    operation = "get_by_id",
                    %id,
                    error = %e,
                    "undecodable record"
                );
                self.not_found(id)
            }),
            None => Err(self.not_found(id)),
        }
    }

    /// Create one record from input in either naming convention.
    ///
    /// Returns the created record, or `None` when the platform reports success without
    /// returning it.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` if the input cannot be encoded,
    /// `ServiceError::Transport` if the call fails, and `ServiceError::BatchPartialFailure`
    /// carrying the first failure message if the platform rejects the record.
    pub async fn create(&self, input: E::Input) -> ServiceResult<Option<E>> {
        let record = input.into_new_record(Utc::now()).map_err(|e| {
            tracing::warn!(entity = E::LABEL, operation = "create", error = %e, "invalid input");
            ServiceError::Validation(e)
        })?;

        let response = self
            .client
            .create_records(E::TABLE, &RecordsRequest::single(record))
            .await
            .map_err(|e| self.transport_failure("create", e))?;

        self.reconcile("create", response)
    }

    /// Apply a partial update; only fields present in `input` are written.
    ///
    /// # Errors
    ///
    /// As [`EntityService::create`]; a non-numeric identifier is a validation error.
    pub async fn update(&self, id: impl ToRecordId, input: E::Input) -> ServiceResult<Option<E>> {
        let id = self.write_id("update", id)?;
        let patch = input.into_patch(id).map_err(|e| {
            tracing::warn!(
                entity = E::LABEL,
                operation = "update",
                %id,
                error = %e,
                "invalid input"
            );
            ServiceError::Validation(e)
        })?;
        tracing::debug!(entity = E::LABEL, %id, fields = patch.len(), "-- Updating");

        let response = self
            .client
            .update_records(E::TABLE, &RecordsRequest::single(patch.into_record()))
            .await
            .map_err(|e| self.transport_failure("update", e))?;

        self.reconcile("update", response)
    }

    /// Delete one record.
    ///
    /// # Errors
    ///
    /// As [`EntityService::update`].
    pub async fn delete(&self, id: impl ToRecordId) -> ServiceResult<()> {
        let id = self.write_id("delete", id)?;
        let response = self
            .client
            .delete_records(E::TABLE, &DeleteRequest::single(id))
            .await
            .map_err(|e| self.transport_failure("delete", e))?;

        self.reconcile("delete", response).map(|_| ())
    }

    fn write_id(&self, operation: &'static str, id: impl ToRecordId) -> ServiceResult<RecordId> {
        id.to_record_id().map_err(|e| {
            tracing::warn!(entity = E::LABEL, operation, error = %e, "bad identifier");
            ServiceError::Validation(e.into())
        })
    }

    /// Split a batch answer into succeeded and failed results.
    ///
    /// Any failure fails the call with the first failure's message; otherwise the first
    /// succeeded record is decoded.
    fn reconcile(
        &self,
        operation: &'static str,
        response: BatchResponse,
    ) -> ServiceResult<Option<E>> {
        if !response.success {
            let message = response
                .message
                .unwrap_or_else(|| "unknown error".to_owned());
            tracing::error!(entity = E::LABEL, operation, error = %message, "write rejected");
            return Err(TransportError::Rejected(message).into());
        }

        let (succeeded, failed): (Vec<_>, Vec<_>) = response
            .results
            .unwrap_or_default()
            .into_iter()
            .partition(|r| r.success);

        if let Some(first) = failed.first() {
            for result in &failed {
                tracing::error!(
                    entity = E::LABEL,
                    operation,
                    error = %result.failure_message(),
                    "record rejected"
                );
            }
            return Err(ServiceError::BatchPartialFailure {
                entity: E::LABEL,
                operation,
                message: first.failure_message(),
            });
        }

        let Some(data) = succeeded.into_iter().next().and_then(|r| r.data) else {
            return Ok(None);
        };
        if !data.is_object() {
            return Ok(None);
        }
        match E::decode(data) {
            Ok(view) => Ok(Some(view)),
            Err(e) => {
                tracing::warn!(entity = E::LABEL, operation, error = %e, "undecodable result");
                Ok(None)
            }
        }
    }

    fn transport_failure(
        &self,
        operation: &'static str,
        err: ward_client::ClientError,
    ) -> ServiceError {
        tracing::error!(entity = E::LABEL, operation, error = %err, "write failed");
        TransportError::Client(err).into()
    }

    fn not_found(&self, id: impl ToString) -> ServiceError {
        ServiceError::NotFound {
            entity: E::LABEL,
            id: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Reply, ScriptedClient};
    use crate::PatientService;
    use serde_json::{json, Value};
    use ward_client::{FetchResponse, MemoryDataClient, RecordResponse, RecordResult};
    use ward_wire::{Patient, PatientInput};

    fn input(value: Value) -> PatientInput {
        serde_json::from_value(value).expect("patient input should deserialize")
    }

    fn scripted(replies: Vec<Reply>) -> (Arc<ScriptedClient>, PatientService) {
        let client = Arc::new(ScriptedClient::new(replies));
        let service = PatientService::new(client.clone());
        (client, service)
    }

    fn memory() -> (Arc<MemoryDataClient>, PatientService) {
        let client = Arc::new(MemoryDataClient::new());
        let service = PatientService::new(client.clone());
        (client, service)
    }

    #[tokio::test]
    async fn test_get_by_id_missing_is_not_found() {
        let (_, service) = memory();
        let err = service.get_by_id("999").await.expect_err("should be missing");
        assert!(matches!(err, ServiceError::NotFound { entity: "patient", ref id } if id == "999"));
    }

    #[tokio::test]
    async fn test_get_by_id_non_numeric_is_not_found_without_a_call() {
        let (client, service) = scripted(vec![]);
        let err = service.get_by_id("abc").await.expect_err("should fail");
        assert!(matches!(err, ServiceError::NotFound { .. }));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_get_by_id_transport_failure_is_not_found() {
        let (_, service) = scripted(vec![Reply::Fail]);
        let err = service.get_by_id(7i64).await.expect_err("should fail");
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_by_id_maps_record() {
        let (_, service) = scripted(vec![Reply::Record(RecordResponse::ok(json!({
            "Id": 7, "first_name_c": "Ada", "allergies_c": "Latex"
        })))]);
        let patient = service.get_by_id(RecordId::new(7)).await.expect("should be found");
        assert_eq!(patient.first_name.as_deref(), Some("Ada"));
        assert_eq!(patient.allergies, vec!["Latex"]);
    }

    #[tokio::test]
    async fn test_get_all_swallows_failures() {
        let (_, service) = scripted(vec![
            Reply::Fail,
            Reply::Fetch(FetchResponse::rejected("quota exceeded")),
        ]);
        assert!(service.get_all().await.is_empty());
        assert!(service.get_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_get_all_skips_undecodable_records() {
        let (_, service) = scripted(vec![Reply::Fetch(FetchResponse::ok(vec![
            json!({"Id": 1, "first_name_c": "Ada"}),
            json!({"first_name_c": "no id"}),
            json!({"Id": 3, "first_name_c": "Alan"}),
        ]))]);
        let patients: Vec<Patient> = service.get_all().await;
        assert_eq!(patients.len(), 2);
    }

    #[tokio::test]
    async fn test_get_all_requests_full_field_set_in_order() {
        let (client, service) = scripted(vec![Reply::Fetch(FetchResponse::ok(vec![]))]);
        service.get_all().await;

        let call = &client.calls()[0];
        assert_eq!(call.operation, "fetch");
        assert_eq!(call.table, "patient_c");
        assert_eq!(call.body["fields"].as_array().map(Vec::len), Some(Patient::FIELDS.len()));
        assert_eq!(call.body["orderBy"][0]["fieldName"], json!("last_name_c"));
    }

    #[tokio::test]
    async fn test_get_page_follows_list_order() {
        let (client, service) = memory();
        client.seed(
            "patient_c",
            [
                json!({"first_name_c": "Alan", "last_name_c": "Turing"}),
                json!({"first_name_c": "Ada", "last_name_c": "Lovelace"}),
                json!({"first_name_c": "Grace", "last_name_c": "Hopper"}),
            ],
        );

        let page = service.get_page(2, 1).await;
        let names: Vec<_> = page.iter().filter_map(|p| p.last_name.as_deref()).collect();
        assert_eq!(names, vec!["Lovelace", "Turing"]);
    }

    #[tokio::test]
    async fn test_get_page_sends_paging_info() {
        let (client, service) = scripted(vec![Reply::Fetch(FetchResponse::ok(vec![]))]);
        service.get_page(20, 40).await;

        let call = &client.calls()[0];
        assert_eq!(call.body["pagingInfo"], json!({"limit": 20, "offset": 40}));
    }

    #[tokio::test]
    async fn test_create_fails_with_first_failure_message() {
        let (_, service) = scripted(vec![Reply::Batch(BatchResponse::ok(vec![
            RecordResult::succeeded(json!({"Id": 1})),
            RecordResult::failed("Email is not valid"),
        ]))]);
        let err = service
            .create(input(json!({"firstName": "Ada"})))
            .await
            .expect_err("should fail");

        match err {
            ServiceError::BatchPartialFailure {
                entity,
                operation,
                message,
            } => {
                assert_eq!(entity, "patient");
                assert_eq!(operation, "create");
                assert_eq!(message, "Email is not valid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_without_results_returns_none() {
        let (_, service) = scripted(vec![
            Reply::Batch(BatchResponse {
                success: true,
                results: None,
                message: None,
            }),
            Reply::Batch(BatchResponse::ok(vec![])),
        ]);
        assert_eq!(service.create(input(json!({}))).await.unwrap(), None);
        assert_eq!(service.create(input(json!({}))).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rejected_write_is_a_transport_failure() {
        let (_, service) = scripted(vec![Reply::Batch(BatchResponse::rejected("invalid key"))]);
        let err = service.create(input(json!({}))).await.expect_err("should fail");
        assert!(matches!(
            err,
            ServiceError::Transport(TransportError::Rejected(ref m)) if m == "invalid key"
        ));
    }

    #[tokio::test]
    async fn test_failed_call_is_a_transport_failure() {
        let (_, service) = scripted(vec![Reply::Fail]);
        let err = service.delete(3i64).await.expect_err("should fail");
        assert!(matches!(err, ServiceError::Transport(TransportError::Client(_))));
    }

    #[tokio::test]
    async fn test_create_writes_defaults_and_returns_view() {
        let (client, service) = memory();
        let created = service
            .create(input(json!({"first_name_c": "Ada", "lastName": "Lovelace"})))
            .await
            .expect("create should succeed")
            .expect("record should be returned");

        assert_eq!(created.last_name.as_deref(), Some("Lovelace"));
        assert_eq!(created.current_status.as_deref(), Some("Stable"));

        let stored = client.record("patient_c", created.id).expect("stored");
        assert_eq!(stored.get("allergies_c"), Some(&json!("")));
        assert!(stored.get("admission_date_c").is_some());
    }

    #[tokio::test]
    async fn test_update_sends_only_supplied_fields() {
        let (client, service) = scripted(vec![Reply::Batch(BatchResponse::ok(vec![
            RecordResult::succeeded(json!({"Id": 7, "phone_c": "555-0100"})),
        ]))]);
        let updated = service
            .update("7", input(json!({"phone": "555-0100", "bedNumber": null})))
            .await
            .expect("update should succeed");

        assert_eq!(updated.map(|p| p.phone), Some(Some("555-0100".to_owned())));
        assert_eq!(
            client.calls()[0].body,
            json!({"records": [{"Id": 7, "phone_c": "555-0100", "bed_number_c": null}]})
        );
    }

    #[tokio::test]
    async fn test_update_rejects_non_numeric_id() {
        let (client, service) = scripted(vec![]);
        let err = service
            .update("seven", input(json!({"phone": "1"})))
            .await
            .expect_err("should fail");
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_record_fails() {
        let (_, service) = memory();
        let err = service
            .update(41i64, input(json!({"phone": "1"})))
            .await
            .expect_err("should fail");
        assert!(matches!(err, ServiceError::BatchPartialFailure { operation: "update", .. }));
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let (client, service) = memory();
        let ids = client.seed("patient_c", [json!({"first_name_c": "Ada"})]);

        service.delete(ids[0]).await.expect("delete should succeed");
        assert!(client.is_empty("patient_c"));

        let err = service.delete(ids[0]).await.expect_err("second delete should fail");
        assert!(matches!(err, ServiceError::BatchPartialFailure { operation: "delete", .. }));
    }
}
