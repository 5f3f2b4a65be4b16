use super::{create_one, delete_one, fetch_one, query_id, update_one};
use crate::error::{ApiResult, ErrorBody};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;
use ward_wire::{MedicalRecord, MedicalRecordInput};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase", parameter_in = Query)]
pub(crate) struct MedicalRecordFilter {
    /// Only records for this patient.
    patient_id: Option<String>,
}

#[utoipa::path(
    get,
    path = "/medical-records",
    params(MedicalRecordFilter),
    responses(
        (
            status = 200,
            description = "Medical records, most recent visit first",
            body = [MedicalRecord]
        ),
        (status = 400, description = "Malformed patient identifier", body = ErrorBody)
    )
)]
pub(crate) async fn list_medical_records(
    State(state): State<AppState>,
    Query(filter): Query<MedicalRecordFilter>,
) -> ApiResult<Json<Vec<MedicalRecord>>> {
    let records = &state.services.medical_records;
    let found = match filter.patient_id {
        Some(raw) => {
            let patient = query_id("patientId", &raw)?;
            records.get_by_patient_id(patient).await
        }
        None => records.get_all().await,
    };
    Ok(Json(found))
}

#[utoipa::path(
    get,
    path = "/medical-records/{id}",
    params(("id" = i64, Path, description = "Medical record identifier")),
    responses(
        (status = 200, description = "Medical record", body = MedicalRecord),
        (status = 404, description = "No such medical record", body = ErrorBody)
    )
)]
pub(crate) async fn get_medical_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MedicalRecord>> {
    fetch_one(&state.services.medical_records, id).await
}

#[utoipa::path(
    post,
    path = "/medical-records",
    request_body(
        content = MedicalRecord,
        description = "Record fields; patient and doctor are required"
    ),
    responses(
        (status = 201, description = "Medical record created", body = MedicalRecord),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 422, description = "Rejected by the data platform", body = ErrorBody)
    )
)]
/// Create a medical record. The visit date defaults to today.
pub(crate) async fn create_medical_record(
    State(state): State<AppState>,
    Json(input): Json<MedicalRecordInput>,
) -> ApiResult<(StatusCode, Json<Option<MedicalRecord>>)> {
    create_one(&state.services.medical_records, input).await
}

#[utoipa::path(
    put,
    path = "/medical-records/{id}",
    params(("id" = i64, Path, description = "Medical record identifier")),
    request_body(content = MedicalRecord, description = "Only the fields to change"),
    responses(
        (status = 200, description = "Medical record updated", body = MedicalRecord),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 422, description = "Rejected by the data platform", body = ErrorBody)
    )
)]
pub(crate) async fn update_medical_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<MedicalRecordInput>,
) -> ApiResult<Json<Option<MedicalRecord>>> {
    update_one(&state.services.medical_records, id, input).await
}

#[utoipa::path(
    delete,
    path = "/medical-records/{id}",
    params(("id" = i64, Path, description = "Medical record identifier")),
    responses(
        (status = 204, description = "Medical record deleted"),
        (status = 422, description = "Rejected by the data platform", body = ErrorBody)
    )
)]
pub(crate) async fn delete_medical_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    delete_one(&state.services.medical_records, id).await
}
