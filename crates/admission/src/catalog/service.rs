use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::context::AuditContext;

use super::domain::{
    format_faculty_name, CreateExamDateRequest, CreateFacultyRequest, ExamDate, ExamDateId,
    ExamDateSummary, Faculty, FacultyId, FacultyOverview, Program, ProgramGroup,
    UnknownProgramLabel, UpdateExamDateRequest, UpdateFacultyRequest,
};
use super::resolver;
use super::store::{CatalogStore, StoreError};

/// Service owning faculty and exam-date writes plus the grouped read view.
///
/// All validation runs before the first store call, so malformed input never
/// reaches the wire.
pub struct CatalogService<S> {
    store: Arc<S>,
}

impl<S> CatalogService<S>
where
    S: CatalogStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Full faculty listing partitioned by program, each faculty carrying its
    /// linked exam dates ascending by date. Groups appear in a fixed fetch
    /// order: bachelor first, then master.
    pub fn load_all(&self) -> Result<Vec<ProgramGroup>, CatalogError> {
        let faculties = self.store.faculties()?;
        let exam_dates = self.store.exam_dates()?;

        let groups = [Program::Bachelor, Program::Master]
            .into_iter()
            .map(|program| ProgramGroup {
                program,
                faculty_list: faculties
                    .iter()
                    .filter(|faculty| faculty.program == program)
                    .map(|faculty| overview(faculty, &exam_dates))
                    .collect(),
            })
            .collect();

        Ok(groups)
    }

    pub fn faculty(&self, id: FacultyId) -> Result<Faculty, CatalogError> {
        match self.store.faculty(id)? {
            Some(faculty) => Ok(faculty),
            None => Err(StoreError::NotFound.into()),
        }
    }

    pub fn create_faculty(
        &self,
        request: CreateFacultyRequest,
        ctx: &AuditContext,
    ) -> Result<Faculty, CatalogError> {
        let (name, program) = validate_faculty_fields(&request.name, &request.program)?;

        let faculty = Faculty {
            id: FacultyId::default(),
            name,
            program,
            is_active: true,
            created_at: ctx.now,
            updated_at: ctx.now,
        };

        let stored = self.store.insert_faculty(faculty)?;
        info!(actor = %ctx.actor, faculty_id = stored.id.0, "faculty created");
        Ok(stored)
    }

    pub fn update_faculty(
        &self,
        id: FacultyId,
        request: UpdateFacultyRequest,
        ctx: &AuditContext,
    ) -> Result<Faculty, CatalogError> {
        let (name, program) = validate_faculty_fields(&request.name, &request.program)?;

        let existing = self.store.faculty(id)?.ok_or(StoreError::NotFound)?;

        let updated = Faculty {
            id,
            name,
            program,
            is_active: request.is_active,
            created_at: existing.created_at,
            updated_at: ctx.now,
        };

        self.store.update_faculty(updated.clone())?;
        info!(actor = %ctx.actor, faculty_id = id.0, "faculty updated");
        Ok(updated)
    }

    /// Remove a faculty and scrub it from every exam date's linkage set, so
    /// the ledger never reports a deleted faculty as a member. Deleting an
    /// already-deleted id fails with a not-found error, not a crash.
    pub fn delete_faculty(&self, id: FacultyId, ctx: &AuditContext) -> Result<(), CatalogError> {
        if self.store.faculty(id)?.is_none() {
            return Err(StoreError::NotFound.into());
        }

        for exam_date in self.store.exam_dates()? {
            if exam_date.is_linked_to(id) {
                let mut scrubbed = exam_date;
                scrubbed.faculty_ids.retain(|linked| *linked != id);
                self.store.update_exam_date(scrubbed)?;
            }
        }

        self.store.remove_faculty(id)?;
        info!(actor = %ctx.actor, faculty_id = id.0, "faculty deleted");
        Ok(())
    }

    /// All exam dates, or only those linked to `faculty_id` when supplied,
    /// ascending by date. An unlinked faculty yields an empty list.
    pub fn exam_dates(
        &self,
        faculty_id: Option<FacultyId>,
    ) -> Result<Vec<ExamDate>, CatalogError> {
        let all = self.store.exam_dates()?;
        match faculty_id {
            Some(id) => Ok(resolver::exam_dates_for_faculty(id, &all)),
            None => {
                let mut all = all;
                all.sort_by_key(|exam_date| (exam_date.date, exam_date.id));
                Ok(all)
            }
        }
    }

    pub fn exam_date(&self, id: ExamDateId) -> Result<ExamDate, CatalogError> {
        match self.store.exam_date(id)? {
            Some(exam_date) => Ok(exam_date),
            None => Err(StoreError::NotFound.into()),
        }
    }

    pub fn create_exam_date(
        &self,
        request: CreateExamDateRequest,
        ctx: &AuditContext,
    ) -> Result<ExamDate, CatalogError> {
        if request.available_spots < 1 {
            return Err(ValidationError::ZeroSpots.into());
        }
        if request.date < ctx.now {
            return Err(ValidationError::PastExamDate {
                requested: request.date,
            }
            .into());
        }
        let faculty_ids =
            validate_linkage(&request.faculty_ids, &request.faculty_ids_str, false)?;
        self.ensure_faculties_exist(&faculty_ids)?;

        let exam_date = ExamDate {
            id: ExamDateId::default(),
            date: request.date,
            available_spots: request.available_spots,
            is_active: true,
            faculty_ids,
        };

        let stored = self.store.insert_exam_date(exam_date)?;
        info!(actor = %ctx.actor, exam_date_id = stored.id.0, "exam date created");
        Ok(stored)
    }

    /// Partial update; the linkage set is always sent in full and replaced
    /// wholesale. Capacity may be lowered to zero here but never below.
    pub fn update_exam_date(
        &self,
        id: ExamDateId,
        request: UpdateExamDateRequest,
        ctx: &AuditContext,
    ) -> Result<ExamDate, CatalogError> {
        let faculty_ids =
            validate_linkage(&request.faculty_ids, &request.faculty_ids_str, true)?;
        self.ensure_faculties_exist(&faculty_ids)?;

        let existing = self.store.exam_date(id)?.ok_or(StoreError::NotFound)?;

        let updated = ExamDate {
            id,
            date: request.date.unwrap_or(existing.date),
            available_spots: request.available_spots.unwrap_or(existing.available_spots),
            is_active: request.is_active.unwrap_or(existing.is_active),
            faculty_ids,
        };

        self.store.update_exam_date(updated.clone())?;
        info!(actor = %ctx.actor, exam_date_id = id.0, "exam date updated");
        Ok(updated)
    }

    /// Remove an exam date and its linkages. Applications still referencing
    /// it are not cascaded; assignment views flag them instead.
    pub fn delete_exam_date(&self, id: ExamDateId, ctx: &AuditContext) -> Result<(), CatalogError> {
        if self.store.exam_date(id)?.is_none() {
            return Err(StoreError::NotFound.into());
        }
        self.store.remove_exam_date(id)?;
        info!(actor = %ctx.actor, exam_date_id = id.0, "exam date deleted");
        Ok(())
    }

    fn ensure_faculties_exist(&self, faculty_ids: &[FacultyId]) -> Result<(), CatalogError> {
        for id in faculty_ids {
            if self.store.faculty(*id)?.is_none() {
                return Err(ValidationError::UnknownFaculty(*id).into());
            }
        }
        Ok(())
    }
}

fn overview(faculty: &Faculty, exam_dates: &[ExamDate]) -> FacultyOverview {
    FacultyOverview {
        id: faculty.id,
        name: faculty.name.clone(),
        program: faculty.program,
        is_active: faculty.is_active,
        created_at: faculty.created_at,
        updated_at: faculty.updated_at,
        exam_dates: resolver::exam_dates_for_faculty(faculty.id, exam_dates)
            .iter()
            .map(ExamDateSummary::from)
            .collect(),
    }
}

fn validate_faculty_fields(
    name: &str,
    program_label: &str,
) -> Result<(String, Program), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyFacultyName);
    }
    let program = Program::parse_label(program_label)?;
    Ok((format_faculty_name(trimmed, program), program))
}

/// Cross-check the redundant linkage fields the transport contract sends and
/// normalize them to a duplicate-free id set in request order.
fn validate_linkage(
    faculty_ids: &[FacultyId],
    faculty_ids_str: &str,
    allow_empty: bool,
) -> Result<Vec<FacultyId>, ValidationError> {
    if faculty_ids.is_empty() && !allow_empty {
        return Err(ValidationError::EmptyFacultyLinkage);
    }

    let parsed: Result<Vec<FacultyId>, _> = faculty_ids_str
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<u64>().map(FacultyId))
        .collect();

    let parsed = parsed.map_err(|_| ValidationError::LinkageMismatch {
        faculty_ids_str: faculty_ids_str.to_string(),
    })?;

    if parsed != faculty_ids {
        return Err(ValidationError::LinkageMismatch {
            faculty_ids_str: faculty_ids_str.to_string(),
        });
    }

    let mut deduped = Vec::with_capacity(faculty_ids.len());
    for id in faculty_ids {
        if !deduped.contains(id) {
            deduped.push(*id);
        }
    }
    Ok(deduped)
}

/// Malformed or logically inconsistent catalog input, rejected before any
/// store call.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("faculty name must not be empty")]
    EmptyFacultyName,
    #[error(transparent)]
    UnknownProgram(#[from] UnknownProgramLabel),
    #[error("available_spots must be at least 1")]
    ZeroSpots,
    #[error("exam date {requested} is in the past")]
    PastExamDate { requested: DateTime<Utc> },
    #[error("an exam date must be linked to at least one faculty")]
    EmptyFacultyLinkage,
    #[error("faculty_ids_str '{faculty_ids_str}' does not match faculty_ids")]
    LinkageMismatch { faculty_ids_str: String },
    #[error("faculty {0} does not exist")]
    UnknownFaculty(FacultyId),
}

/// Error raised by catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
