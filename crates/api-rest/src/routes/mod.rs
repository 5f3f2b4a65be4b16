//! Route handlers, one module per resource.
//!
//! The handlers are thin: each one documents its endpoint and delegates to the shared
//! helpers below, which talk to the entity service and shape the response.

pub(crate) mod appointments;
pub(crate) mod beds;
pub(crate) mod doctors;
pub(crate) mod medical_records;
pub(crate) mod patients;

use crate::error::{ApiError, ApiResult};
use axum::http::StatusCode;
use axum::Json;
use ward_core::EntityService;
use ward_types::RecordId;
use ward_wire::Entity;

pub(crate) async fn fetch_one<E: Entity>(
    service: &EntityService<E>,
    id: String,
) -> ApiResult<Json<E>> {
    Ok(Json(service.get_by_id(id).await?))
}

pub(crate) async fn create_one<E: Entity>(
    service: &EntityService<E>,
    input: E::Input,
) -> ApiResult<(StatusCode, Json<Option<E>>)> {
    let created = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(crate) async fn update_one<E: Entity>(
    service: &EntityService<E>,
    id: String,
    input: E::Input,
) -> ApiResult<Json<Option<E>>> {
    Ok(Json(service.update(id, input).await?))
}

pub(crate) async fn delete_one<E: Entity>(
    service: &EntityService<E>,
    id: String,
) -> ApiResult<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Parse an identifier given as a query parameter.
pub(crate) fn query_id(name: &str, raw: &str) -> ApiResult<RecordId> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("{name} must be a numeric identifier")))
}
