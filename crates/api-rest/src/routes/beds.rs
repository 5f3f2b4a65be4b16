use super::{create_one, delete_one, fetch_one, update_one};
use crate::error::{ApiResult, ErrorBody};
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use utoipa::ToSchema;
use ward_types::IntLike;
use ward_wire::{Bed, BedInput};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignBedRequest {
    #[schema(value_type = i64)]
    pub patient_id: IntLike,
}

#[utoipa::path(
    get,
    path = "/beds",
    responses(
        (status = 200, description = "Beds, by bed number", body = [Bed])
    )
)]
pub(crate) async fn list_beds(State(state): State<AppState>) -> Json<Vec<Bed>> {
    Json(state.services.beds.get_all().await)
}

#[utoipa::path(
    get,
    path = "/beds/{id}",
    params(("id" = i64, Path, description = "Bed identifier")),
    responses(
        (status = 200, description = "Bed", body = Bed),
        (status = 404, description = "No such bed", body = ErrorBody)
    )
)]
pub(crate) async fn get_bed(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Bed>> {
    fetch_one(&state.services.beds, id).await
}

#[utoipa::path(
    post,
    path = "/beds",
    request_body(
        content = Bed,
        description = "Bed fields; status follows the patient link when omitted"
    ),
    responses(
        (status = 201, description = "Bed created", body = Bed),
        (status = 400, description = "Status and patient link disagree", body = ErrorBody),
        (status = 422, description = "Rejected by the data platform", body = ErrorBody)
    )
)]
pub(crate) async fn create_bed(
    State(state): State<AppState>,
    Json(input): Json<BedInput>,
) -> ApiResult<(StatusCode, Json<Option<Bed>>)> {
    create_one(&state.services.beds, input).await
}

#[utoipa::path(
    put,
    path = "/beds/{id}",
    params(("id" = i64, Path, description = "Bed identifier")),
    request_body(content = Bed, description = "Status and patient link must change together"),
    responses(
        (status = 200, description = "Bed updated", body = Bed),
        (status = 400, description = "Status and patient link disagree", body = ErrorBody),
        (status = 422, description = "Rejected by the data platform", body = ErrorBody)
    )
)]
pub(crate) async fn update_bed(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<BedInput>,
) -> ApiResult<Json<Option<Bed>>> {
    update_one(&state.services.beds, id, input).await
}

#[utoipa::path(
    delete,
    path = "/beds/{id}",
    params(("id" = i64, Path, description = "Bed identifier")),
    responses(
        (status = 204, description = "Bed deleted"),
        (status = 422, description = "Rejected by the data platform", body = ErrorBody)
    )
)]
pub(crate) async fn delete_bed(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    delete_one(&state.services.beds, id).await
}

#[utoipa::path(
    post,
    path = "/beds/{id}/assign",
    params(("id" = i64, Path, description = "Bed identifier")),
    request_body = AssignBedRequest,
    responses(
        (status = 200, description = "Bed now occupied by the patient", body = Bed),
        (status = 400, description = "Malformed identifier", body = ErrorBody),
        (status = 422, description = "Rejected by the data platform", body = ErrorBody)
    )
)]
pub(crate) async fn assign_bed(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AssignBedRequest>,
) -> ApiResult<Json<Option<Bed>>> {
    Ok(Json(
        state.services.beds.assign_patient(id, req.patient_id).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/beds/{id}/release",
    params(("id" = i64, Path, description = "Bed identifier")),
    responses(
        (status = 200, description = "Bed available again", body = Bed),
        (status = 422, description = "Rejected by the data platform", body = ErrorBody)
    )
)]
pub(crate) async fn release_bed(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Option<Bed>>> {
    Ok(Json(state.services.beds.release_patient(id).await?))
}
