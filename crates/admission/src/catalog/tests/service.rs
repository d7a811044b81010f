use std::sync::Arc;

use super::common::*;
use crate::catalog::domain::{
    CreateExamDateRequest, CreateFacultyRequest, ExamDateId, FacultyId, Program,
    UpdateExamDateRequest, UpdateFacultyRequest,
};
use crate::catalog::service::{CatalogError, CatalogService, ValidationError};
use crate::catalog::store::{CatalogStore, StoreError};

#[test]
fn created_faculty_is_prefixed_and_timestamped() {
    let (service, _) = build_service();
    let faculty = create_faculty(&service, "Physics", "bachelor");

    assert_eq!(faculty.name, "Bachelor's degree - Physics");
    assert_eq!(faculty.program, Program::Bachelor);
    assert!(faculty.is_active);
    assert_eq!(faculty.created_at, ctx().now);
    assert_eq!(faculty.updated_at, ctx().now);
}

#[test]
fn create_rejects_blank_name_and_unknown_program() {
    let (service, _) = build_service();

    let err = service
        .create_faculty(
            CreateFacultyRequest {
                name: "   ".to_string(),
                program: "bachelor".to_string(),
            },
            &ctx(),
        )
        .expect_err("blank name rejected");
    assert!(matches!(
        err,
        CatalogError::Validation(ValidationError::EmptyFacultyName)
    ));

    let err = service
        .create_faculty(
            CreateFacultyRequest {
                name: "Physics".to_string(),
                program: "doctorate".to_string(),
            },
            &ctx(),
        )
        .expect_err("unknown program rejected");
    assert!(matches!(
        err,
        CatalogError::Validation(ValidationError::UnknownProgram(_))
    ));
}

#[test]
fn update_reformats_the_name_under_the_new_program() {
    let (service, _) = build_service();
    let faculty = create_faculty(&service, "Physics", "bachelor");

    // The edit dialog submits the stripped name with a new program choice.
    let updated = service
        .update_faculty(
            faculty.id,
            UpdateFacultyRequest {
                name: "Physics".to_string(),
                program: "Master's degree".to_string(),
                is_active: false,
            },
            &ctx(),
        )
        .expect("faculty updated");

    assert_eq!(updated.name, "Master's degree - Physics");
    assert_eq!(updated.program, Program::Master);
    assert!(!updated.is_active);
    assert_eq!(updated.created_at, faculty.created_at);
}

#[test]
fn deleting_a_faculty_scrubs_ledger_linkage() {
    let (service, store) = build_service();
    let physics = create_faculty(&service, "Physics", "bachelor");
    let chemistry = create_faculty(&service, "Chemistry", "bachelor");
    let shared = create_exam_date(
        &service,
        instant(2025, 6, 1),
        40,
        &[physics.id, chemistry.id],
    );

    service
        .delete_faculty(physics.id, &ctx())
        .expect("faculty deleted");

    let slot = store
        .exam_date(shared.id)
        .expect("ledger read")
        .expect("slot still present");
    assert_eq!(slot.faculty_ids, vec![chemistry.id]);
    assert!(service
        .exam_dates(Some(physics.id))
        .expect("query succeeds")
        .is_empty());
}

#[test]
fn deleting_a_missing_faculty_reports_not_found() {
    let (service, _) = build_service();
    let err = service
        .delete_faculty(FacultyId(7), &ctx())
        .expect_err("missing id rejected");
    assert!(matches!(err, CatalogError::Store(StoreError::NotFound)));
}

#[test]
fn exam_date_with_zero_spots_is_rejected() {
    let (service, _) = build_service();
    let faculty = create_faculty(&service, "Physics", "bachelor");

    let err = service
        .create_exam_date(
            CreateExamDateRequest {
                date: instant(2025, 6, 1),
                available_spots: 0,
                faculty_ids: vec![faculty.id],
                faculty_ids_str: joined(&[faculty.id]),
            },
            &ctx(),
        )
        .expect_err("zero spots rejected");
    assert!(matches!(
        err,
        CatalogError::Validation(ValidationError::ZeroSpots)
    ));
}

#[test]
fn exam_date_in_the_past_is_rejected() {
    let (service, _) = build_service();
    let faculty = create_faculty(&service, "Physics", "bachelor");

    let err = service
        .create_exam_date(
            CreateExamDateRequest {
                date: instant(2024, 6, 1),
                available_spots: 25,
                faculty_ids: vec![faculty.id],
                faculty_ids_str: joined(&[faculty.id]),
            },
            &ctx(),
        )
        .expect_err("past date rejected");
    assert!(matches!(
        err,
        CatalogError::Validation(ValidationError::PastExamDate { .. })
    ));
}

#[test]
fn empty_linkage_is_rejected_before_any_store_call() {
    // A store whose every call fails: reaching it would surface Unavailable
    // instead of the expected validation error.
    let service = CatalogService::new(Arc::new(UnavailableCatalogStore));

    let err = service
        .create_exam_date(
            CreateExamDateRequest {
                date: instant(2025, 6, 1),
                available_spots: 25,
                faculty_ids: Vec::new(),
                faculty_ids_str: String::new(),
            },
            &ctx(),
        )
        .expect_err("empty linkage rejected");
    assert!(matches!(
        err,
        CatalogError::Validation(ValidationError::EmptyFacultyLinkage)
    ));
}

#[test]
fn mismatched_linkage_fields_are_rejected() {
    let (service, _) = build_service();
    let faculty = create_faculty(&service, "Physics", "bachelor");

    let err = service
        .create_exam_date(
            CreateExamDateRequest {
                date: instant(2025, 6, 1),
                available_spots: 25,
                faculty_ids: vec![faculty.id],
                faculty_ids_str: "1,2".to_string(),
            },
            &ctx(),
        )
        .expect_err("mismatched ids rejected");
    assert!(matches!(
        err,
        CatalogError::Validation(ValidationError::LinkageMismatch { .. })
    ));
}

#[test]
fn linkage_to_a_missing_faculty_is_rejected() {
    let (service, _) = build_service();

    let err = service
        .create_exam_date(
            CreateExamDateRequest {
                date: instant(2025, 6, 1),
                available_spots: 25,
                faculty_ids: vec![FacultyId(42)],
                faculty_ids_str: "42".to_string(),
            },
            &ctx(),
        )
        .expect_err("dangling linkage rejected");
    assert!(matches!(
        err,
        CatalogError::Validation(ValidationError::UnknownFaculty(FacultyId(42)))
    ));
}

#[test]
fn update_replaces_the_linkage_set_wholesale() {
    let (service, _) = build_service();
    let physics = create_faculty(&service, "Physics", "bachelor");
    let chemistry = create_faculty(&service, "Chemistry", "bachelor");
    let slot = create_exam_date(&service, instant(2025, 6, 1), 40, &[physics.id]);

    let updated = service
        .update_exam_date(
            slot.id,
            UpdateExamDateRequest {
                date: None,
                available_spots: Some(0),
                is_active: Some(false),
                faculty_ids: vec![chemistry.id],
                faculty_ids_str: joined(&[chemistry.id]),
            },
            &ctx(),
        )
        .expect("exam date updated");

    assert_eq!(updated.faculty_ids, vec![chemistry.id]);
    assert_eq!(updated.available_spots, 0);
    assert!(!updated.is_active);
    assert_eq!(updated.date, slot.date);
}

#[test]
fn updating_a_missing_exam_date_reports_not_found() {
    let (service, _) = build_service();
    let faculty = create_faculty(&service, "Physics", "bachelor");

    let err = service
        .update_exam_date(
            ExamDateId(99),
            UpdateExamDateRequest {
                date: None,
                available_spots: None,
                is_active: None,
                faculty_ids: vec![faculty.id],
                faculty_ids_str: joined(&[faculty.id]),
            },
            &ctx(),
        )
        .expect_err("missing slot rejected");
    assert!(matches!(err, CatalogError::Store(StoreError::NotFound)));
}

#[test]
fn load_all_groups_bachelor_before_master() {
    let (service, _) = build_service();
    create_faculty(&service, "Data Science", "master");
    create_faculty(&service, "Physics", "bachelor");

    let groups = service.load_all().expect("grouped listing");
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].program, Program::Bachelor);
    assert_eq!(groups[1].program, Program::Master);
    assert_eq!(groups[0].faculty_list.len(), 1);
    assert_eq!(groups[1].faculty_list.len(), 1);
}

#[test]
fn load_all_nests_linked_exam_dates() {
    let (service, _) = build_service();
    let physics = create_faculty(&service, "Physics", "bachelor");
    let slot = create_exam_date(&service, instant(2025, 6, 1), 50, &[physics.id]);

    let groups = service.load_all().expect("grouped listing");
    let listed = &groups[0].faculty_list[0];
    assert_eq!(listed.exam_dates.len(), 1);
    assert_eq!(listed.exam_dates[0].id, slot.id);
    assert_eq!(listed.exam_dates[0].available_spots, 50);
}

#[test]
fn load_all_surfaces_store_failure() {
    let service = CatalogService::new(Arc::new(UnavailableCatalogStore));
    let err = service.load_all().expect_err("store failure surfaces");
    assert!(matches!(
        err,
        CatalogError::Store(StoreError::Unavailable(_))
    ));
}
