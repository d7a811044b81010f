use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::context::AuditContext;

use super::domain::{
    CreateExamDateRequest, CreateFacultyRequest, ExamDateId, FacultyId, FacultyOverview,
    UpdateExamDateRequest, UpdateFacultyRequest,
};
use super::service::{CatalogError, CatalogService};
use super::store::{CatalogStore, StoreError};

/// Router builder exposing the faculty registry and exam-date ledger.
pub fn catalog_router<S>(service: Arc<CatalogService<S>>) -> Router
where
    S: CatalogStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/faculties",
            get(list_faculties::<S>).post(create_faculty::<S>),
        )
        .route(
            "/api/v1/faculties/:faculty_id",
            axum::routing::put(update_faculty::<S>).delete(delete_faculty::<S>),
        )
        .route(
            "/api/v1/exam-dates",
            get(list_exam_dates::<S>).post(create_exam_date::<S>),
        )
        .route(
            "/api/v1/exam-dates/:exam_date_id",
            axum::routing::put(update_exam_date::<S>).delete(delete_exam_date::<S>),
        )
        .with_state(service)
}

/// Grouped faculty listing as served on the wire: program label plus the
/// faculties of that group.
#[derive(Debug, Serialize)]
struct ProgramGroupView {
    program: &'static str,
    faculty_list: Vec<FacultyOverview>,
}

#[derive(Debug, Deserialize)]
struct ExamDateQuery {
    faculty_id: Option<u64>,
}

/// Actor identity injected per request; absent headers fall back to an
/// anonymous administrator rather than a baked-in user constant.
pub(crate) fn audit_context(headers: &HeaderMap) -> AuditContext {
    let actor = headers
        .get("x-admission-actor")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("anonymous");
    AuditContext::at_wall_clock(actor)
}

pub(crate) fn catalog_error_response(error: CatalogError) -> Response {
    let (status, message) = match &error {
        CatalogError::Validation(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
        CatalogError::Store(StoreError::NotFound) => {
            (StatusCode::NOT_FOUND, error.to_string())
        }
        CatalogError::Store(StoreError::Unavailable(_)) => {
            (StatusCode::BAD_GATEWAY, error.to_string())
        }
    };
    (status, axum::Json(json!({ "error": message }))).into_response()
}

async fn list_faculties<S>(State(service): State<Arc<CatalogService<S>>>) -> Response
where
    S: CatalogStore + 'static,
{
    match service.load_all() {
        Ok(groups) => {
            let view: Vec<ProgramGroupView> = groups
                .into_iter()
                .map(|group| ProgramGroupView {
                    program: group.program.display_label(),
                    faculty_list: group.faculty_list,
                })
                .collect();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => catalog_error_response(error),
    }
}

async fn create_faculty<S>(
    State(service): State<Arc<CatalogService<S>>>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<CreateFacultyRequest>,
) -> Response
where
    S: CatalogStore + 'static,
{
    let ctx = audit_context(&headers);
    match service.create_faculty(request, &ctx) {
        Ok(faculty) => (
            StatusCode::CREATED,
            axum::Json(json!({ "id": faculty.id })),
        )
            .into_response(),
        Err(error) => catalog_error_response(error),
    }
}

async fn update_faculty<S>(
    State(service): State<Arc<CatalogService<S>>>,
    Path(faculty_id): Path<u64>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<UpdateFacultyRequest>,
) -> Response
where
    S: CatalogStore + 'static,
{
    let ctx = audit_context(&headers);
    match service.update_faculty(FacultyId(faculty_id), request, &ctx) {
        Ok(faculty) => (StatusCode::OK, axum::Json(faculty)).into_response(),
        Err(error) => catalog_error_response(error),
    }
}

async fn delete_faculty<S>(
    State(service): State<Arc<CatalogService<S>>>,
    Path(faculty_id): Path<u64>,
    headers: HeaderMap,
) -> Response
where
    S: CatalogStore + 'static,
{
    let ctx = audit_context(&headers);
    match service.delete_faculty(FacultyId(faculty_id), &ctx) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => catalog_error_response(error),
    }
}

async fn list_exam_dates<S>(
    State(service): State<Arc<CatalogService<S>>>,
    Query(query): Query<ExamDateQuery>,
) -> Response
where
    S: CatalogStore + 'static,
{
    match service.exam_dates(query.faculty_id.map(FacultyId)) {
        Ok(exam_dates) => (StatusCode::OK, axum::Json(exam_dates)).into_response(),
        Err(error) => catalog_error_response(error),
    }
}

async fn create_exam_date<S>(
    State(service): State<Arc<CatalogService<S>>>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<CreateExamDateRequest>,
) -> Response
where
    S: CatalogStore + 'static,
{
    let ctx = audit_context(&headers);
    match service.create_exam_date(request, &ctx) {
        Ok(exam_date) => (
            StatusCode::CREATED,
            axum::Json(json!({ "id": exam_date.id })),
        )
            .into_response(),
        Err(error) => catalog_error_response(error),
    }
}

async fn update_exam_date<S>(
    State(service): State<Arc<CatalogService<S>>>,
    Path(exam_date_id): Path<u64>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<UpdateExamDateRequest>,
) -> Response
where
    S: CatalogStore + 'static,
{
    let ctx = audit_context(&headers);
    match service.update_exam_date(ExamDateId(exam_date_id), request, &ctx) {
        Ok(exam_date) => (StatusCode::OK, axum::Json(exam_date)).into_response(),
        Err(error) => catalog_error_response(error),
    }
}

async fn delete_exam_date<S>(
    State(service): State<Arc<CatalogService<S>>>,
    Path(exam_date_id): Path<u64>,
    headers: HeaderMap,
) -> Response
where
    S: CatalogStore + 'static,
{
    let ctx = audit_context(&headers);
    match service.delete_exam_date(ExamDateId(exam_date_id), &ctx) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => catalog_error_response(error),
    }
}
