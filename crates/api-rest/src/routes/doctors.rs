use super::{create_one, delete_one, fetch_one, update_one};
use crate::error::{ApiResult, ErrorBody};
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use ward_wire::{Doctor, DoctorInput};

#[utoipa::path(
    get,
    path = "/doctors",
    responses(
        (status = 200, description = "Doctors, by name", body = [Doctor])
    )
)]
pub(crate) async fn list_doctors(State(state): State<AppState>) -> Json<Vec<Doctor>> {
    Json(state.services.doctors.get_all().await)
}

#[utoipa::path(
    get,
    path = "/doctors/{id}",
    params(("id" = i64, Path, description = "Doctor identifier")),
    responses(
        (status = 200, description = "Doctor", body = Doctor),
        (status = 404, description = "No such doctor", body = ErrorBody)
    )
)]
pub(crate) async fn get_doctor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Doctor>> {
    fetch_one(&state.services.doctors, id).await
}

#[utoipa::path(
    post,
    path = "/doctors",
    request_body(content = Doctor, description = "Doctor fields, in stored or view naming"),
    responses(
        (status = 201, description = "Doctor created", body = Doctor),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 422, description = "Rejected by the data platform", body = ErrorBody)
    )
)]
pub(crate) async fn create_doctor(
    State(state): State<AppState>,
    Json(input): Json<DoctorInput>,
) -> ApiResult<(StatusCode, Json<Option<Doctor>>)> {
    create_one(&state.services.doctors, input).await
}

#[utoipa::path(
    put,
    path = "/doctors/{id}",
    params(("id" = i64, Path, description = "Doctor identifier")),
    request_body(content = Doctor, description = "Only the fields to change"),
    responses(
        (status = 200, description = "Doctor updated", body = Doctor),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 422, description = "Rejected by the data platform", body = ErrorBody)
    )
)]
pub(crate) async fn update_doctor(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<DoctorInput>,
) -> ApiResult<Json<Option<Doctor>>> {
    update_one(&state.services.doctors, id, input).await
}

#[utoipa::path(
    delete,
    path = "/doctors/{id}",
    params(("id" = i64, Path, description = "Doctor identifier")),
    responses(
        (status = 204, description = "Doctor deleted"),
        (status = 422, description = "Rejected by the data platform", body = ErrorBody)
    )
)]
pub(crate) async fn delete_doctor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    delete_one(&state.services.doctors, id).await
}
