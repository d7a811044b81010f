use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::catalog::{
    resolver, CatalogStore, ExamDate, ExamDateId, Faculty, FacultyId, Program, StoreError,
};
use crate::config::PagingConfig;
use crate::context::AuditContext;

use super::domain::{
    AdminUpdateRequest, Application, ApplicationId, ApplicationSubmission, DocumentRef,
    EnglishCertificate, Gender, PaymentStatus,
};
use super::repository::{
    ApplicationFilter, ApplicationPage, ApplicationRepository, RepositoryError,
};

/// Service composing the catalog (for assignment validation) and the
/// application repository.
pub struct IntakeService<C, R> {
    catalog: Arc<C>,
    repository: Arc<R>,
    paging: PagingConfig,
}

impl<C, R> IntakeService<C, R>
where
    C: CatalogStore + 'static,
    R: ApplicationRepository + 'static,
{
    pub fn new(catalog: Arc<C>, repository: Arc<R>, paging: PagingConfig) -> Self {
        Self {
            catalog,
            repository,
            paging,
        }
    }

    /// Accept a public-form submission. Field validation runs before any
    /// store access; the assignment chain (program → faculty → exam date)
    /// is then checked against the current catalog, including the advisory
    /// remaining-capacity check.
    pub fn submit(
        &self,
        submission: ApplicationSubmission,
        ctx: &AuditContext,
    ) -> Result<Application, IntakeError> {
        let certificate = validate_submission_fields(&submission)?;

        let exam_date = self.validate_assignment(
            submission.program_degree,
            submission.faculty_id,
            submission.exam_date_id,
        )?;
        if resolver::remaining_spots(&exam_date) == 0 {
            return Err(ValidationError::NoSpotsRemaining(exam_date.id).into());
        }

        let application = Application {
            id: ApplicationId::default(),
            first_name: submission.first_name.trim().to_string(),
            last_name: submission.last_name.trim().to_string(),
            middle_name: submission
                .middle_name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
            gender: submission.gender,
            phone: submission.phone.trim().to_string(),
            school: submission.school.trim().to_string(),
            program: submission.program_degree,
            faculty_id: submission.faculty_id,
            exam_date_id: submission.exam_date_id,
            english_certificate: certificate,
            documents: submission.documents,
            payment_status: PaymentStatus::Pending,
            created_at: ctx.now,
            updated_at: ctx.now,
        };

        let stored = self.repository.insert(application)?;
        info!(actor = %ctx.actor, application_id = stored.id.0, "application submitted");
        Ok(stored)
    }

    pub fn get(&self, id: ApplicationId) -> Result<Application, IntakeError> {
        match self.repository.fetch(id)? {
            Some(application) => Ok(application),
            None => Err(RepositoryError::NotFound.into()),
        }
    }

    pub fn lookup_by_phone(&self, phone: &str) -> Result<Application, IntakeError> {
        match self.repository.find_by_phone(phone.trim())? {
            Some(application) => Ok(application),
            None => Err(RepositoryError::NotFound.into()),
        }
    }

    pub fn delete(&self, id: ApplicationId, ctx: &AuditContext) -> Result<(), IntakeError> {
        self.repository.remove(id)?;
        info!(actor = %ctx.actor, application_id = id.0, "application deleted");
        Ok(())
    }

    /// Filtered, paginated listing with assignment views resolved against
    /// one catalog snapshot.
    pub fn list(
        &self,
        filter: &ApplicationFilter,
        page: Option<usize>,
        limit: Option<usize>,
    ) -> Result<ApplicationPage<ApplicationView>, IntakeError> {
        let matches = self.repository.search(filter)?;
        let faculties = self.catalog.faculties()?;
        let exam_dates = self.catalog.exam_dates()?;

        let limit = limit
            .unwrap_or(self.paging.default_limit)
            .clamp(1, self.paging.max_limit);
        let page = page.unwrap_or(1).max(1);
        let total = matches.len();
        let pages = (total + limit - 1) / limit;

        let items = matches
            .into_iter()
            .skip((page - 1) * limit)
            .take(limit)
            .map(|application| application_view(&application, &faculties, &exam_dates))
            .collect();

        Ok(ApplicationPage {
            items,
            total,
            page,
            pages,
        })
    }

    /// Assignment-resolved view of a single application.
    pub fn view(&self, id: ApplicationId) -> Result<ApplicationView, IntakeError> {
        let application = self.get(id)?;
        let faculties = self.catalog.faculties()?;
        let exam_dates = self.catalog.exam_dates()?;
        Ok(application_view(&application, &faculties, &exam_dates))
    }

    /// Rebind an application to a (faculty, exam date) pair, subject to the
    /// same chain rules as submission. On failure the stored assignment is
    /// untouched. Capacity on either slot is deliberately not adjusted.
    pub fn reassign(
        &self,
        id: ApplicationId,
        faculty_id: FacultyId,
        exam_date_id: ExamDateId,
        ctx: &AuditContext,
    ) -> Result<Application, IntakeError> {
        self.apply_admin_update(
            id,
            AdminUpdateRequest {
                faculty_id: Some(faculty_id),
                exam_date_id: Some(exam_date_id),
                payment_status: None,
            },
            ctx,
        )
    }

    /// Advance the payment ledger along one of its legal edges.
    pub fn set_payment_status(
        &self,
        id: ApplicationId,
        next: PaymentStatus,
        ctx: &AuditContext,
    ) -> Result<Application, IntakeError> {
        self.apply_admin_update(
            id,
            AdminUpdateRequest {
                faculty_id: None,
                exam_date_id: None,
                payment_status: Some(next),
            },
            ctx,
        )
    }

    /// Administrator edit: any combination of reassignment and payment
    /// transition, validated together and persisted as one write.
    pub fn apply_admin_update(
        &self,
        id: ApplicationId,
        request: AdminUpdateRequest,
        ctx: &AuditContext,
    ) -> Result<Application, IntakeError> {
        let mut application = self.get(id)?;

        if request.faculty_id.is_some() || request.exam_date_id.is_some() {
            let faculty_id = request.faculty_id.unwrap_or(application.faculty_id);
            let exam_date_id = request.exam_date_id.unwrap_or(application.exam_date_id);
            self.validate_assignment(application.program, faculty_id, exam_date_id)?;
            application.faculty_id = faculty_id;
            application.exam_date_id = exam_date_id;
        }

        if let Some(next) = request.payment_status {
            if !application.payment_status.can_transition(next) {
                return Err(ValidationError::InvalidPaymentTransition {
                    from: application.payment_status,
                    to: next,
                }
                .into());
            }
            application.payment_status = next;
        }

        application.updated_at = ctx.now;
        self.repository.update(application.clone())?;
        info!(actor = %ctx.actor, application_id = id.0, "application updated");
        Ok(application)
    }

    /// Check the full chain: the faculty must exist, its program must match
    /// the application's, and the exam date must currently be linked to it.
    /// Returns the resolved exam date for capacity inspection.
    fn validate_assignment(
        &self,
        program: Program,
        faculty_id: FacultyId,
        exam_date_id: ExamDateId,
    ) -> Result<ExamDate, IntakeError> {
        let faculty = self
            .catalog
            .faculty(faculty_id)?
            .ok_or(ValidationError::UnknownFaculty(faculty_id))?;

        if faculty.program != program {
            return Err(ValidationError::ProgramMismatch {
                faculty_id,
                faculty_program: faculty.program,
                application_program: program,
            }
            .into());
        }

        let exam_date = self
            .catalog
            .exam_date(exam_date_id)?
            .ok_or(ValidationError::UnknownExamDate(exam_date_id))?;

        if !exam_date.is_linked_to(faculty_id) {
            return Err(ValidationError::ExamDateNotLinked {
                exam_date_id,
                faculty_id,
            }
            .into());
        }

        Ok(exam_date)
    }
}

fn validate_submission_fields(
    submission: &ApplicationSubmission,
) -> Result<Option<EnglishCertificate>, ValidationError> {
    for (field, value) in [
        ("first_name", &submission.first_name),
        ("last_name", &submission.last_name),
        ("phone", &submission.phone),
        ("school", &submission.school),
    ] {
        if value.trim().is_empty() {
            return Err(ValidationError::MissingField(field));
        }
    }

    if !submission.terms_accepted {
        return Err(ValidationError::TermsNotAccepted);
    }

    match (
        submission.has_english_cert,
        submission.english_cert_type,
        submission.cert_score,
    ) {
        (true, Some(cert_type), Some(score)) => {
            Ok(Some(EnglishCertificate { cert_type, score }))
        }
        (true, _, _) => Err(ValidationError::CertificateDetailsMissing),
        (false, None, None) => Ok(None),
        (false, _, _) => Err(ValidationError::CertificateNotDeclared),
    }
}

/// Resolve an application's stored assignment against a catalog snapshot.
/// Dangling references surface as warnings, never as errors.
fn application_view(
    application: &Application,
    faculties: &[Faculty],
    exam_dates: &[ExamDate],
) -> ApplicationView {
    let faculty = faculties
        .iter()
        .find(|faculty| faculty.id == application.faculty_id);
    let exam_date = exam_dates
        .iter()
        .find(|exam_date| exam_date.id == application.exam_date_id);

    let mut warnings = Vec::new();
    match (faculty, exam_date) {
        (None, _) => warnings.push(ConsistencyWarning::FacultyUnavailable {
            faculty_id: application.faculty_id,
        }),
        (Some(_), None) => {}
        (Some(faculty), Some(exam_date)) => {
            if !exam_date.is_linked_to(faculty.id) {
                warnings.push(ConsistencyWarning::LinkageBroken {
                    faculty_id: faculty.id,
                    exam_date_id: exam_date.id,
                });
            }
        }
    }
    if exam_date.is_none() {
        warnings.push(ConsistencyWarning::ExamDateUnavailable {
            exam_date_id: application.exam_date_id,
        });
    }

    ApplicationView {
        id: application.id,
        first_name: application.first_name.clone(),
        last_name: application.last_name.clone(),
        middle_name: application.middle_name.clone(),
        gender: application.gender,
        phone: application.phone.clone(),
        school: application.school.clone(),
        program: application.program,
        english_certificate: application.english_certificate,
        documents: application.documents.clone(),
        payment_status: application.payment_status,
        created_at: application.created_at,
        updated_at: application.updated_at,
        assignment: AssignmentView {
            faculty_id: application.faculty_id,
            faculty_name: faculty.map(|faculty| faculty.name.clone()),
            exam_date_id: application.exam_date_id,
            exam_date: exam_date.map(|exam_date| exam_date.date),
            remaining_spots: exam_date.map(resolver::remaining_spots),
            warnings,
        },
    }
}

/// The stored (faculty, exam date) pair resolved against the live catalog.
/// Missing pieces render as "unavailable" via `warnings`.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentView {
    pub faculty_id: FacultyId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty_name: Option<String>,
    pub exam_date_id: ExamDateId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exam_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_spots: Option<u32>,
    pub warnings: Vec<ConsistencyWarning>,
}

impl AssignmentView {
    pub fn is_consistent(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Application as served to the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationView {
    pub id: ApplicationId,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    pub gender: Gender,
    pub phone: String,
    pub school: String,
    pub program: Program,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub english_certificate: Option<EnglishCertificate>,
    pub documents: Vec<DocumentRef>,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub assignment: AssignmentView,
}

/// Not a hard error: the application still renders, with the dangling side
/// of its assignment marked unavailable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConsistencyWarning {
    #[error("assigned faculty {faculty_id} is no longer available")]
    FacultyUnavailable { faculty_id: FacultyId },
    #[error("assigned exam date {exam_date_id} is no longer available")]
    ExamDateUnavailable { exam_date_id: ExamDateId },
    #[error("exam date {exam_date_id} is no longer linked to faculty {faculty_id}")]
    LinkageBroken {
        faculty_id: FacultyId,
        exam_date_id: ExamDateId,
    },
}

/// Malformed or logically inconsistent intake input.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    MissingField(&'static str),
    #[error("terms must be accepted before submission")]
    TermsNotAccepted,
    #[error("english certificate type and score are required when a certificate is declared")]
    CertificateDetailsMissing,
    #[error("certificate details were supplied without declaring a certificate")]
    CertificateNotDeclared,
    #[error("faculty {0} does not exist")]
    UnknownFaculty(FacultyId),
    #[error("exam date {0} does not exist")]
    UnknownExamDate(ExamDateId),
    #[error(
        "faculty {faculty_id} belongs to the {} program but the application targets {}",
        faculty_program.label(),
        application_program.label()
    )]
    ProgramMismatch {
        faculty_id: FacultyId,
        faculty_program: Program,
        application_program: Program,
    },
    #[error("exam date {exam_date_id} is not linked to faculty {faculty_id}")]
    ExamDateNotLinked {
        exam_date_id: ExamDateId,
        faculty_id: FacultyId,
    },
    #[error("exam date {0} has no spots remaining")]
    NoSpotsRemaining(ExamDateId),
    #[error(
        "payment status cannot move from {} to {}",
        from.label(),
        to.label()
    )]
    InvalidPaymentTransition {
        from: PaymentStatus,
        to: PaymentStatus,
    },
}

/// Error raised by the intake service.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Catalog(#[from] StoreError),
}
