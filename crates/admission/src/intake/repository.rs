use chrono::NaiveDate;

use crate::catalog::FacultyId;

use super::domain::{Application, ApplicationId, PaymentStatus};

/// Storage abstraction for submitted applications.
///
/// `insert` assigns the identifier and returns the stored row. `search`
/// returns matches newest-first; the service layers pagination on top.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError>;
    fn update(&self, application: Application) -> Result<(), RepositoryError>;
    fn fetch(&self, id: ApplicationId) -> Result<Option<Application>, RepositoryError>;
    fn remove(&self, id: ApplicationId) -> Result<(), RepositoryError>;
    fn search(&self, filter: &ApplicationFilter) -> Result<Vec<Application>, RepositoryError>;
    fn find_by_phone(&self, phone: &str) -> Result<Option<Application>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("application already exists")]
    Conflict,
    #[error("application not found")]
    NotFound,
    #[error("application store unavailable: {0}")]
    Unavailable(String),
}

/// Dashboard listing filter. All criteria are conjunctive; `search` matches
/// case-insensitively against applicant names and the phone number.
#[derive(Debug, Clone, Default)]
pub struct ApplicationFilter {
    pub search: Option<String>,
    pub faculty_id: Option<FacultyId>,
    pub payment_status: Option<PaymentStatus>,
    pub submitted_from: Option<NaiveDate>,
    pub submitted_to: Option<NaiveDate>,
}

impl ApplicationFilter {
    /// Shared predicate so every repository implementation filters the same
    /// way.
    pub fn matches(&self, application: &Application) -> bool {
        if let Some(needle) = &self.search {
            let needle = needle.trim().to_lowercase();
            if !needle.is_empty() {
                let haystacks = [
                    application.first_name.to_lowercase(),
                    application.last_name.to_lowercase(),
                    application
                        .middle_name
                        .clone()
                        .unwrap_or_default()
                        .to_lowercase(),
                    application.phone.clone(),
                ];
                if !haystacks.iter().any(|value| value.contains(&needle)) {
                    return false;
                }
            }
        }

        if let Some(faculty_id) = self.faculty_id {
            if application.faculty_id != faculty_id {
                return false;
            }
        }

        if let Some(status) = self.payment_status {
            if application.payment_status != status {
                return false;
            }
        }

        let submitted_on = application.created_at.date_naive();
        if let Some(from) = self.submitted_from {
            if submitted_on < from {
                return false;
            }
        }
        if let Some(to) = self.submitted_to {
            if submitted_on > to {
                return false;
            }
        }

        true
    }
}

/// One page of a filtered listing.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ApplicationPage<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub pages: usize,
}
