//! # API REST
//!
//! REST surface of the ward front office.
//!
//! Handles:
//! - HTTP endpoints with axum, one resource module per entity
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, status codes, CORS)
//!
//! All business behaviour lives in `ward-core`; handlers only translate between HTTP and
//! the entity services.

#![warn(rust_2018_idioms)]

mod error;
mod routes;

pub use error::{ApiError, ApiResult, ErrorBody};
pub use routes::beds::AssignBedRequest;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;
use ward_core::Services;
use ward_wire::{Appointment, Bed, Doctor, MedicalRecord, Patient};

use routes::{appointments, beds, doctors, medical_records, patients};

/// Shared state handed to every handler.
#[derive(Clone)]
pub(crate) struct AppState {
    services: Arc<Services>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        patients::list_patients,
        patients::get_patient,
        patients::create_patient,
        patients::update_patient,
        patients::delete_patient,
        doctors::list_doctors,
        doctors::get_doctor,
        doctors::create_doctor,
        doctors::update_doctor,
        doctors::delete_doctor,
        beds::list_beds,
        beds::get_bed,
        beds::create_bed,
        beds::update_bed,
        beds::delete_bed,
        beds::assign_bed,
        beds::release_bed,
        appointments::list_appointments,
        appointments::get_appointment,
        appointments::create_appointment,
        appointments::update_appointment,
        appointments::delete_appointment,
        medical_records::list_medical_records,
        medical_records::get_medical_record,
        medical_records::create_medical_record,
        medical_records::update_medical_record,
        medical_records::delete_medical_record,
    ),
    components(schemas(
        HealthRes,
        ErrorBody,
        AssignBedRequest,
        Patient,
        Doctor,
        Bed,
        Appointment,
        MedicalRecord,
    ))
)]
pub struct ApiDoc;

/// Build the full router: resource routes, Swagger UI and a permissive CORS layer.
pub fn router(services: Services) -> Router {
    let state = AppState {
        services: Arc::new(services),
    };

    Router::new()
        .route("/health", get(health))
        .route(
            "/patients",
            get(patients::list_patients).post(patients::create_patient),
        )
        .route(
            "/patients/:id",
            get(patients::get_patient)
                .put(patients::update_patient)
                .delete(patients::delete_patient),
        )
        .route(
            "/doctors",
            get(doctors::list_doctors).post(doctors::create_doctor),
        )
        .route(
            "/doctors/:id",
            get(doctors::get_doctor)
                .put(doctors::update_doctor)
                .delete(doctors::delete_doctor),
        )
        .route("/beds", get(beds::list_beds).post(beds::create_bed))
        .route(
            "/beds/:id",
            get(beds::get_bed)
                .put(beds::update_bed)
                .delete(beds::delete_bed),
        )
        .route("/beds/:id/assign", post(beds::assign_bed))
        .route("/beds/:id/release", post(beds::release_bed))
        .route(
            "/appointments",
            get(appointments::list_appointments).post(appointments::create_appointment),
        )
        .route(
            "/appointments/:id",
            get(appointments::get_appointment)
                .put(appointments::update_appointment)
                .delete(appointments::delete_appointment),
        )
        .route(
            "/medical-records",
            get(medical_records::list_medical_records)
                .post(medical_records::create_medical_record),
        )
        .route(
            "/medical-records/:id",
            get(medical_records::get_medical_record)
                .put(medical_records::update_medical_record)
                .delete(medical_records::delete_medical_record),
        )
        .merge(
            SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `addr` and serve [`router`] until the server fails.
///
/// # Errors
///
/// Returns the I/O error if the address cannot be bound or the server stops with one.
pub async fn serve(addr: &str, services: Services) -> std::io::Result<()> {
    tracing::info!("-- Starting ward REST API on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(services)).await
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Liveness probe. Does not touch the data platform.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Ward REST API is alive".into(),
    })
}
