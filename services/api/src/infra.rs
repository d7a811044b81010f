use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use admission::catalog::{CatalogStore, ExamDate, ExamDateId, Faculty, FacultyId, StoreError};
use admission::intake::{
    Application, ApplicationFilter, ApplicationId, ApplicationRepository, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// In-memory catalog store standing in for the external data service.
#[derive(Default)]
pub(crate) struct InMemoryCatalogStore {
    faculties: Mutex<BTreeMap<u64, Faculty>>,
    exam_dates: Mutex<BTreeMap<u64, ExamDate>>,
    next_faculty_id: AtomicU64,
    next_exam_date_id: AtomicU64,
}

impl CatalogStore for InMemoryCatalogStore {
    fn insert_faculty(&self, mut faculty: Faculty) -> Result<Faculty, StoreError> {
        let id = self.next_faculty_id.fetch_add(1, Ordering::Relaxed) + 1;
        faculty.id = FacultyId(id);
        let mut guard = self.faculties.lock().expect("faculty mutex poisoned");
        guard.insert(id, faculty.clone());
        Ok(faculty)
    }

    fn update_faculty(&self, faculty: Faculty) -> Result<(), StoreError> {
        let mut guard = self.faculties.lock().expect("faculty mutex poisoned");
        if guard.contains_key(&faculty.id.0) {
            guard.insert(faculty.id.0, faculty);
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    fn remove_faculty(&self, id: FacultyId) -> Result<(), StoreError> {
        let mut guard = self.faculties.lock().expect("faculty mutex poisoned");
        guard.remove(&id.0).map(|_| ()).ok_or(StoreError::NotFound)
    }

    fn faculty(&self, id: FacultyId) -> Result<Option<Faculty>, StoreError> {
        let guard = self.faculties.lock().expect("faculty mutex poisoned");
        Ok(guard.get(&id.0).cloned())
    }

    fn faculties(&self) -> Result<Vec<Faculty>, StoreError> {
        let guard = self.faculties.lock().expect("faculty mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn insert_exam_date(&self, mut exam_date: ExamDate) -> Result<ExamDate, StoreError> {
        let id = self.next_exam_date_id.fetch_add(1, Ordering::Relaxed) + 1;
        exam_date.id = ExamDateId(id);
        let mut guard = self.exam_dates.lock().expect("exam date mutex poisoned");
        guard.insert(id, exam_date.clone());
        Ok(exam_date)
    }

    fn update_exam_date(&self, exam_date: ExamDate) -> Result<(), StoreError> {
        let mut guard = self.exam_dates.lock().expect("exam date mutex poisoned");
        if guard.contains_key(&exam_date.id.0) {
            guard.insert(exam_date.id.0, exam_date);
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    fn remove_exam_date(&self, id: ExamDateId) -> Result<(), StoreError> {
        let mut guard = self.exam_dates.lock().expect("exam date mutex poisoned");
        guard.remove(&id.0).map(|_| ()).ok_or(StoreError::NotFound)
    }

    fn exam_date(&self, id: ExamDateId) -> Result<Option<ExamDate>, StoreError> {
        let guard = self.exam_dates.lock().expect("exam date mutex poisoned");
        Ok(guard.get(&id.0).cloned())
    }

    fn exam_dates(&self) -> Result<Vec<ExamDate>, StoreError> {
        let guard = self.exam_dates.lock().expect("exam date mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

/// In-memory application repository behind the intake service.
#[derive(Default)]
pub(crate) struct InMemoryApplicationRepository {
    records: Mutex<BTreeMap<u64, Application>>,
    next_id: AtomicU64,
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, mut application: Application) -> Result<Application, RepositoryError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        application.id = ApplicationId(id);
        let mut guard = self.records.lock().expect("application mutex poisoned");
        guard.insert(id, application.clone());
        Ok(application)
    }

    fn update(&self, application: Application) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("application mutex poisoned");
        if guard.contains_key(&application.id.0) {
            guard.insert(application.id.0, application);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        Ok(guard.get(&id.0).cloned())
    }

    fn remove(&self, id: ApplicationId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("application mutex poisoned");
        guard
            .remove(&id.0)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn search(&self, filter: &ApplicationFilter) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        let mut matches: Vec<Application> = guard
            .values()
            .filter(|application| filter.matches(application))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.0.cmp(&a.id.0)));
        Ok(matches)
    }

    fn find_by_phone(&self, phone: &str) -> Result<Option<Application>, RepositoryError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        Ok(guard
            .values()
            .find(|application| application.phone == phone)
            .cloned())
    }
}
