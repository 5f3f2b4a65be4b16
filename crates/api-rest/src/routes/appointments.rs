use super::{create_one, delete_one, fetch_one, query_id, update_one};
use crate::error::{ApiResult, ErrorBody};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;
use ward_wire::{Appointment, AppointmentInput};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase", parameter_in = Query)]
pub(crate) struct AppointmentFilter {
    /// Exact appointment date, `YYYY-MM-DD`.
    date: Option<String>,
    /// Only appointments with this doctor.
    doctor_id: Option<String>,
}

#[utoipa::path(
    get,
    path = "/appointments",
    params(AppointmentFilter),
    responses(
        (status = 200, description = "Appointments, by date and time", body = [Appointment]),
        (status = 400, description = "Malformed doctor identifier", body = ErrorBody)
    )
)]
/// List appointments. With both filters the date query runs first and the doctor
/// filter is applied to its results.
pub(crate) async fn list_appointments(
    State(state): State<AppState>,
    Query(filter): Query<AppointmentFilter>,
) -> ApiResult<Json<Vec<Appointment>>> {
    let appointments = &state.services.appointments;
    let doctor = filter
        .doctor_id
        .as_deref()
        .map(|raw| query_id("doctorId", raw))
        .transpose()?;

    let found = match (filter.date, doctor) {
        (Some(date), Some(doctor)) => {
            let mut on_date = appointments.get_by_date(&date).await;
            on_date.retain(|a| a.doctor_id == Some(doctor));
            on_date
        }
        (Some(date), None) => appointments.get_by_date(&date).await,
        (None, Some(doctor)) => appointments.get_by_doctor(doctor).await,
        (None, None) => appointments.get_all().await,
    };
    Ok(Json(found))
}

#[utoipa::path(
    get,
    path = "/appointments/{id}",
    params(("id" = i64, Path, description = "Appointment identifier")),
    responses(
        (status = 200, description = "Appointment", body = Appointment),
        (status = 404, description = "No such appointment", body = ErrorBody)
    )
)]
pub(crate) async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Appointment>> {
    fetch_one(&state.services.appointments, id).await
}

#[utoipa::path(
    post,
    path = "/appointments",
    request_body(
        content = Appointment,
        description = "Appointment fields; patient and doctor are required"
    ),
    responses(
        (status = 201, description = "Appointment created", body = Appointment),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 422, description = "Rejected by the data platform", body = ErrorBody)
    )
)]
/// Book an appointment. Duration defaults to 30 minutes and status to `Scheduled`.
pub(crate) async fn create_appointment(
    State(state): State<AppState>,
    Json(input): Json<AppointmentInput>,
) -> ApiResult<(StatusCode, Json<Option<Appointment>>)> {
    create_one(&state.services.appointments, input).await
}

#[utoipa::path(
    put,
    path = "/appointments/{id}",
    params(("id" = i64, Path, description = "Appointment identifier")),
    request_body(content = Appointment, description = "Only the fields to change"),
    responses(
        (status = 200, description = "Appointment updated", body = Appointment),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 422, description = "Rejected by the data platform", body = ErrorBody)
    )
)]
pub(crate) async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<AppointmentInput>,
) -> ApiResult<Json<Option<Appointment>>> {
    update_one(&state.services.appointments, id, input).await
}

#[utoipa::path(
    delete,
    path = "/appointments/{id}",
    params(("id" = i64, Path, description = "Appointment identifier")),
    responses(
        (status = 204, description = "Appointment cancelled and removed"),
        (status = 422, description = "Rejected by the data platform", body = ErrorBody)
    )
)]
pub(crate) async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    delete_one(&state.services.appointments, id).await
}
