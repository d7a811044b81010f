//! CSV catalog seeding for demos and fixtures.
//!
//! One row per faculty: `Program,Faculty,Exam Date,Available Spots`. Rows
//! sharing the same `Exam Date` value merge into a single slot linked to all
//! of their faculties, so shared exam slots can be expressed in flat files.

use std::io::Read;

use serde::{Deserialize, Deserializer};

use crate::context::AuditContext;

use super::domain::{parse_instant, CreateExamDateRequest, CreateFacultyRequest, FacultyId};
use super::service::{CatalogError, CatalogService};
use super::store::CatalogStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogSeedReport {
    pub faculties: usize,
    pub exam_dates: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read catalog csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("row for faculty '{faculty}' has unparseable exam date '{value}'")]
    InvalidDate { faculty: String, value: String },
    #[error("row for faculty '{faculty}' declares an exam date without available spots")]
    MissingSpots { faculty: String },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug)]
struct Slot {
    raw_date: String,
    date: chrono::DateTime<chrono::Utc>,
    spots: u32,
    linked: Vec<FacultyId>,
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "Program")]
    program: String,
    #[serde(rename = "Faculty")]
    faculty: String,
    #[serde(rename = "Exam Date", default, deserialize_with = "empty_string_as_none")]
    exam_date: Option<String>,
    #[serde(rename = "Available Spots", default)]
    available_spots: Option<u32>,
}

/// Seed the catalog from a CSV reader through the regular service write
/// paths, so every row passes the same validation as the admin dialogs.
pub fn seed_from_reader<R, S>(
    reader: R,
    service: &CatalogService<S>,
    ctx: &AuditContext,
) -> Result<CatalogSeedReport, ImportError>
where
    R: Read,
    S: CatalogStore,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut slots: Vec<Slot> = Vec::new();
    let mut faculties = 0usize;

    for record in csv_reader.deserialize::<CatalogRow>() {
        let row = record?;

        let faculty = service.create_faculty(
            CreateFacultyRequest {
                name: row.faculty.clone(),
                program: row.program.clone(),
            },
            ctx,
        )?;
        faculties += 1;

        let Some(raw_date) = row.exam_date else {
            continue;
        };
        let Some(date) = parse_instant(&raw_date) else {
            return Err(ImportError::InvalidDate {
                faculty: row.faculty,
                value: raw_date,
            });
        };
        let Some(spots) = row.available_spots else {
            return Err(ImportError::MissingSpots {
                faculty: row.faculty,
            });
        };

        match slots.iter_mut().find(|slot| slot.raw_date == raw_date) {
            Some(slot) => slot.linked.push(faculty.id),
            None => slots.push(Slot {
                raw_date,
                date,
                spots,
                linked: vec![faculty.id],
            }),
        }
    }

    let mut exam_dates = 0usize;
    for slot in slots {
        let faculty_ids_str = slot
            .linked
            .iter()
            .map(|id| id.0.to_string())
            .collect::<Vec<_>>()
            .join(",");
        service.create_exam_date(
            CreateExamDateRequest {
                date: slot.date,
                available_spots: slot.spots,
                faculty_ids: slot.linked,
                faculty_ids_str,
            },
            ctx,
        )?;
        exam_dates += 1;
    }

    Ok(CatalogSeedReport {
        faculties,
        exam_dates,
    })
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
