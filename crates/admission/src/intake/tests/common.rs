use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::catalog::domain::{
    CreateExamDateRequest, CreateFacultyRequest, ExamDate, Faculty, FacultyId,
    UpdateExamDateRequest,
};
use crate::catalog::service::CatalogService;
use crate::config::PagingConfig;
use crate::context::AuditContext;
use crate::intake::domain::{ApplicationSubmission, EnglishCertType, Gender};
use crate::intake::service::IntakeService;

pub(super) use crate::testing::{MemoryApplicationRepository, MemoryCatalogStore};

pub(super) fn ctx() -> AuditContext {
    AuditContext::new(
        "registrar",
        Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).single().expect("valid instant"),
    )
}

pub(super) fn instant(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).single().expect("valid instant")
}

/// Seeded catalog plus an intake service over shared in-memory stores.
pub(super) struct World {
    pub(super) service: IntakeService<MemoryCatalogStore, MemoryApplicationRepository>,
    pub(super) catalog: CatalogService<MemoryCatalogStore>,
    pub(super) repository: Arc<MemoryApplicationRepository>,
    pub(super) physics: Faculty,
    pub(super) chemistry: Faculty,
    pub(super) data_science: Faculty,
    pub(super) physics_slot: ExamDate,
    pub(super) shared_slot: ExamDate,
    pub(super) data_science_slot: ExamDate,
    pub(super) sold_out_slot: ExamDate,
}

pub(super) fn build_world() -> World {
    let store = Arc::new(MemoryCatalogStore::default());
    let repository = Arc::new(MemoryApplicationRepository::default());
    let catalog = CatalogService::new(store.clone());

    let physics = create_faculty(&catalog, "Physics", "bachelor");
    let chemistry = create_faculty(&catalog, "Chemistry", "bachelor");
    let data_science = create_faculty(&catalog, "Data Science", "master");

    let physics_slot = create_exam_date(&catalog, instant(2025, 6, 1), 50, &[physics.id]);
    let shared_slot = create_exam_date(
        &catalog,
        instant(2025, 6, 15),
        30,
        &[physics.id, chemistry.id],
    );
    let data_science_slot =
        create_exam_date(&catalog, instant(2025, 7, 10), 20, &[data_science.id]);

    // Capacity can only reach zero through an update.
    let sold_out_slot = create_exam_date(&catalog, instant(2025, 6, 20), 5, &[physics.id]);
    let sold_out_slot = catalog
        .update_exam_date(
            sold_out_slot.id,
            UpdateExamDateRequest {
                date: None,
                available_spots: Some(0),
                is_active: None,
                faculty_ids: vec![physics.id],
                faculty_ids_str: physics.id.0.to_string(),
            },
            &ctx(),
        )
        .expect("slot sold out");

    let service = IntakeService::new(store, repository.clone(), PagingConfig::default());

    World {
        service,
        catalog,
        repository,
        physics,
        chemistry,
        data_science,
        physics_slot,
        shared_slot,
        data_science_slot,
        sold_out_slot,
    }
}

pub(super) fn create_faculty(
    catalog: &CatalogService<MemoryCatalogStore>,
    name: &str,
    program: &str,
) -> Faculty {
    catalog
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
    catalog: &CatalogService<MemoryCatalogStore>,
    date: DateTime<Utc>,
    spots: u32,
    linked: &[FacultyId],
) -> ExamDate {
    let faculty_ids_str = linked
        .iter()
        .map(|id| id.0.to_string())
        .collect::<Vec<_>>()
        .join(",");
    catalog
        .create_exam_date(
            CreateExamDateRequest {
                date,
                available_spots: spots,
                faculty_ids: linked.to_vec(),
                faculty_ids_str,
            },
            &ctx(),
        )
        .expect("exam date created")
}

pub(super) fn submission(world: &World) -> ApplicationSubmission {
    ApplicationSubmission {
        first_name: "Aziza".to_string(),
        last_name: "Karimova".to_string(),
        middle_name: None,
        gender: Gender::Female,
        phone: "+998901234567".to_string(),
        school: "Tashkent School 110".to_string(),
        program_degree: crate::catalog::Program::Bachelor,
        faculty_id: world.physics.id,
        exam_date_id: world.physics_slot.id,
        has_english_cert: true,
        english_cert_type: Some(EnglishCertType::Ielts),
        cert_score: Some(7),
        documents: Vec::new(),
        terms_accepted: true,
    }
}
