use super::domain::{ExamDate, ExamDateId, Faculty, FacultyId};

/// Storage abstraction over the external catalog data store, so services and
/// routers can be exercised against in-memory fakes.
///
/// Identifiers are assigned by the store: `insert_*` ignores the id on the
/// way in and returns the stored row carrying the assigned one.
pub trait CatalogStore: Send + Sync {
    fn insert_faculty(&self, faculty: Faculty) -> Result<Faculty, StoreError>;
    fn update_faculty(&self, faculty: Faculty) -> Result<(), StoreError>;
    fn remove_faculty(&self, id: FacultyId) -> Result<(), StoreError>;
    fn faculty(&self, id: FacultyId) -> Result<Option<Faculty>, StoreError>;
    fn faculties(&self) -> Result<Vec<Faculty>, StoreError>;

    fn insert_exam_date(&self, exam_date: ExamDate) -> Result<ExamDate, StoreError>;
    fn update_exam_date(&self, exam_date: ExamDate) -> Result<(), StoreError>;
    fn remove_exam_date(&self, id: ExamDateId) -> Result<(), StoreError>;
    fn exam_date(&self, id: ExamDateId) -> Result<Option<ExamDate>, StoreError>;
    fn exam_dates(&self) -> Result<Vec<ExamDate>, StoreError>;
}

/// Error enumeration for catalog store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("catalog store unavailable: {0}")]
    Unavailable(String),
}
