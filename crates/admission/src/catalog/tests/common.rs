use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::catalog::domain::{CreateExamDateRequest, CreateFacultyRequest, ExamDate, Faculty, FacultyId};
use crate::catalog::service::CatalogService;
use crate::context::AuditContext;

pub(super) use crate::testing::{MemoryCatalogStore, UnavailableCatalogStore};

/// Fixed operation instant so timestamps are assertable.
pub(super) fn ctx() -> AuditContext {
    AuditContext::new(
        "registrar",
        Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).single().expect("valid instant"),
    )
}

pub(super) fn instant(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).single().expect("valid instant")
}

pub(super) fn build_service() -> (CatalogService<MemoryCatalogStore>, Arc<MemoryCatalogStore>) {
    let store = Arc::new(MemoryCatalogStore::default());
    (CatalogService::new(store.clone()), store)
}

pub(super) fn create_faculty(
    service: &CatalogService<MemoryCatalogStore>,
    name: &str,
    program: &str,
) -> Faculty {
    service
        .create_faculty(
            CreateFacultyRequest {
                name: name.to_string(),
                program: program.to_string(),
            },
            &ctx(),
        )
        .expect("faculty created")
}

pub(super) fn create_exam_date(
    service: &CatalogService<MemoryCatalogStore>,
    date: DateTime<Utc>,
    spots: u32,
    linked: &[FacultyId],
) -> ExamDate {
    service
        .create_exam_date(
            CreateExamDateRequest {
                date,
                available_spots: spots,
                faculty_ids: linked.to_vec(),
                faculty_ids_str: joined(linked),
            },
            &ctx(),
        )
        .expect("exam date created")
}

pub(super) fn joined(ids: &[FacultyId]) -> String {
    ids.iter()
        .map(|id| id.0.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
