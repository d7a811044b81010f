use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::catalog::router::audit_context;
use crate::catalog::{CatalogStore, FacultyId, StoreError};

use super::domain::{AdminUpdateRequest, ApplicationId, ApplicationSubmission, PaymentStatus};
use super::repository::{ApplicationFilter, ApplicationRepository, RepositoryError};
use super::service::{IntakeError, IntakeService};

/// Router builder exposing public intake and dashboard administration.
pub fn application_router<C, R>(service: Arc<IntakeService<C, R>>) -> Router
where
    C: CatalogStore + 'static,
    R: ApplicationRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/applications",
            get(list_applications::<C, R>).post(submit_application::<C, R>),
        )
        .route(
            "/api/v1/applications/:application_id",
            get(get_application::<C, R>)
                .put(update_application::<C, R>)
                .delete(delete_application::<C, R>),
        )
        .route(
            "/api/v1/applications/lookup/:phone",
            get(lookup_application::<C, R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
struct ApplicationListQuery {
    #[serde(default)]
    page: Option<usize>,
    #[serde(default)]
    limit: Option<usize>,
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    faculty_id: Option<u64>,
    #[serde(default)]
    payment_status: Option<PaymentStatus>,
    #[serde(default)]
    start_date: Option<NaiveDate>,
    #[serde(default)]
    end_date: Option<NaiveDate>,
}

fn intake_error_response(error: IntakeError) -> Response {
    let status = match &error {
        IntakeError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        IntakeError::Repository(RepositoryError::NotFound)
        | IntakeError::Catalog(StoreError::NotFound) => StatusCode::NOT_FOUND,
        IntakeError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        IntakeError::Repository(RepositoryError::Unavailable(_))
        | IntakeError::Catalog(StoreError::Unavailable(_)) => StatusCode::BAD_GATEWAY,
    };
    (status, axum::Json(json!({ "error": error.to_string() }))).into_response()
}

async fn submit_application<C, R>(
    State(service): State<Arc<IntakeService<C, R>>>,
    headers: HeaderMap,
    axum::Json(submission): axum::Json<ApplicationSubmission>,
) -> Response
where
    C: CatalogStore + 'static,
    R: ApplicationRepository + 'static,
{
    let ctx = audit_context(&headers);
    match service.submit(submission, &ctx) {
        Ok(application) => (
            StatusCode::CREATED,
            axum::Json(json!({
                "id": application.id,
                "payment_status": application.payment_status.label(),
            })),
        )
            .into_response(),
        Err(error) => intake_error_response(error),
    }
}

async fn list_applications<C, R>(
    State(service): State<Arc<IntakeService<C, R>>>,
    Query(query): Query<ApplicationListQuery>,
) -> Response
where
    C: CatalogStore + 'static,
    R: ApplicationRepository + 'static,
{
    let filter = ApplicationFilter {
        search: query.search,
        faculty_id: query.faculty_id.map(FacultyId),
        payment_status: query.payment_status,
        submitted_from: query.start_date,
        submitted_to: query.end_date,
    };

    match service.list(&filter, query.page, query.limit) {
        Ok(page) => (StatusCode::OK, axum::Json(page)).into_response(),
        Err(error) => intake_error_response(error),
    }
}

async fn get_application<C, R>(
    State(service): State<Arc<IntakeService<C, R>>>,
    Path(application_id): Path<u64>,
) -> Response
where
    C: CatalogStore + 'static,
    R: ApplicationRepository + 'static,
{
    match service.view(ApplicationId(application_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => intake_error_response(error),
    }
}

async fn update_application<C, R>(
    State(service): State<Arc<IntakeService<C, R>>>,
    Path(application_id): Path<u64>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<AdminUpdateRequest>,
) -> Response
where
    C: CatalogStore + 'static,
    R: ApplicationRepository + 'static,
{
    let ctx = audit_context(&headers);
    let id = ApplicationId(application_id);
    match service.apply_admin_update(id, request, &ctx) {
        Ok(_) => match service.view(id) {
            Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
            Err(error) => intake_error_response(error),
        },
        Err(error) => intake_error_response(error),
    }
}

async fn delete_application<C, R>(
    State(service): State<Arc<IntakeService<C, R>>>,
    Path(application_id): Path<u64>,
    headers: HeaderMap,
) -> Response
where
    C: CatalogStore + 'static,
    R: ApplicationRepository + 'static,
{
    let ctx = audit_context(&headers);
    match service.delete(ApplicationId(application_id), &ctx) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => intake_error_response(error),
    }
}

async fn lookup_application<C, R>(
    State(service): State<Arc<IntakeService<C, R>>>,
    Path(phone): Path<String>,
) -> Response
where
    C: CatalogStore + 'static,
    R: ApplicationRepository + 'static,
{
    match service.lookup_by_phone(&phone) {
        Ok(application) => match service.view(application.id) {
            Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
            Err(error) => intake_error_response(error),
        },
        Err(error) => intake_error_response(error),
    }
}
