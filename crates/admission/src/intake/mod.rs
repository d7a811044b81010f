//! Application intake, administration, and assignment.
//!
//! Submissions bind an applicant to exactly one (faculty, exam date) pair.
//! Administrators can reassign that pair and advance the payment ledger;
//! both paths re-validate the program → faculty → exam-date chain against
//! the live catalog at write time.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AdminUpdateRequest, Application, ApplicationId, ApplicationSubmission, DocumentKind,
    DocumentRef, EnglishCertType, EnglishCertificate, Gender, PaymentStatus,
};
pub use repository::{
    ApplicationFilter, ApplicationPage, ApplicationRepository, RepositoryError,
};
pub use router::application_router;
pub use service::{
    ApplicationView, AssignmentView, ConsistencyWarning, IntakeError, IntakeService,
    ValidationError,
};
