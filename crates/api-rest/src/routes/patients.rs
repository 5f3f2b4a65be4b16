use super::{create_one, delete_one, fetch_one, update_one};
use crate::error::{ApiResult, ErrorBody};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;
use ward_wire::{Patient, PatientInput};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct PatientFilter {
    /// Case-insensitive match on name, phone or email.
    q: Option<String>,
}

#[utoipa::path(
    get,
    path = "/patients",
    params(PatientFilter),
    responses(
        (status = 200, description = "Patients, by last name", body = [Patient])
    )
)]
/// List patients, or search them when `q` is given.
pub(crate) async fn list_patients(
    State(state): State<AppState>,
    Query(filter): Query<PatientFilter>,
) -> Json<Vec<Patient>> {
    let patients = &state.services.patients;
    Json(match filter.q {
        Some(term) => patients.search(&term).await,
        None => patients.get_all().await,
    })
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(("id" = i64, Path, description = "Patient identifier")),
    responses(
        (status = 200, description = "Patient", body = Patient),
        (status = 404, description = "No such patient", body = ErrorBody)
    )
)]
pub(crate) async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Patient>> {
    fetch_one(&state.services.patients, id).await
}

#[utoipa::path(
    post,
    path = "/patients",
    request_body(content = Patient, description = "Patient fields, in stored or view naming"),
    responses(
        (status = 201, description = "Patient created", body = Patient),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 422, description = "Rejected by the data platform", body = ErrorBody),
        (status = 502, description = "Data platform unreachable", body = ErrorBody)
    )
)]
/// Create a patient. Status defaults to `Stable` and the admission date to now.
pub(crate) async fn create_patient(
    State(state): State<AppState>,
    Json(input): Json<PatientInput>,
) -> ApiResult<(StatusCode, Json<Option<Patient>>)> {
    create_one(&state.services.patients, input).await
}

#[utoipa::path(
    put,
    path = "/patients/{id}",
    params(("id" = i64, Path, description = "Patient identifier")),
    request_body(content = Patient, description = "Only the fields to change; null clears a field"),
    responses(
        (status = 200, description = "Patient updated", body = Patient),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 422, description = "Rejected by the data platform", body = ErrorBody)
    )
)]
pub(crate) async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<PatientInput>,
) -> ApiResult<Json<Option<Patient>>> {
    update_one(&state.services.patients, id, input).await
}

#[utoipa::path(
    delete,
    path = "/patients/{id}",
    params(("id" = i64, Path, description = "Patient identifier")),
    responses(
        (status = 204, description = "Patient deleted"),
        (status = 422, description = "Rejected by the data platform", body = ErrorBody)
    )
)]
pub(crate) async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    delete_one(&state.services.patients, id).await
}
