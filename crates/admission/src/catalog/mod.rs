//! Faculty registry and exam-date ledger.
//!
//! The registry groups faculties by program; the ledger tracks exam slots,
//! their capacity, and the many-to-many faculty linkage. The resolver
//! derives the filtered views both selection surfaces consume.

pub mod domain;
pub mod import;
pub mod resolver;
pub mod router;
pub mod service;
pub mod snapshot;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    format_faculty_name, parse_instant, strip_program_prefix, CreateExamDateRequest,
    CreateFacultyRequest, ExamDate, ExamDateId, ExamDateSummary, Faculty, FacultyId,
    FacultyOverview, Program, ProgramGroup, UnknownProgramLabel, UpdateExamDateRequest,
    UpdateFacultyRequest,
};
pub use import::{seed_from_reader, CatalogSeedReport, ImportError};
pub use router::catalog_router;
pub use service::{CatalogError, CatalogService, ValidationError};
pub use snapshot::{SnapshotApply, SnapshotCell};
pub use store::{CatalogStore, StoreError};
