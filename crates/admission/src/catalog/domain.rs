use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier wrapper for faculties, assigned by the backing store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct FacultyId(pub u64);

impl std::fmt::Display for FacultyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier wrapper for exam-date slots.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct ExamDateId(pub u64);

impl std::fmt::Display for ExamDateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Academic track partitioning faculties. Closed set: anything else on the
/// wire is a data error, resolved once at the ingestion boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Program {
    Bachelor,
    Master,
}

impl Program {
    pub const fn label(self) -> &'static str {
        match self {
            Program::Bachelor => "bachelor",
            Program::Master => "master",
        }
    }

    /// Label used by the transport contract and embedded in faculty names.
    pub const fn display_label(self) -> &'static str {
        match self {
            Program::Bachelor => "Bachelor's degree",
            Program::Master => "Master's degree",
        }
    }

    /// Resolve a transport label (`"bachelor"`, `"Bachelor's degree"`, ...)
    /// into the closed enum. Unmapped labels are rejected, never defaulted.
    pub fn parse_label(label: &str) -> Result<Self, UnknownProgramLabel> {
        let folded = label.trim().to_ascii_lowercase();
        if folded.contains("bachelor") {
            Ok(Program::Bachelor)
        } else if folded.contains("master") {
            Ok(Program::Master)
        } else {
            Err(UnknownProgramLabel(label.trim().to_string()))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized program label '{0}'")]
pub struct UnknownProgramLabel(pub String);

const BACHELOR_PREFIX: &str = "Bachelor's degree - ";
const MASTER_PREFIX: &str = "Master's degree - ";

/// Prepend the program prefix to a display name. Idempotent: a name already
/// carrying either recognized prefix is returned unchanged.
pub fn format_faculty_name(name: &str, program: Program) -> String {
    let trimmed = name.trim();
    if trimmed.starts_with(BACHELOR_PREFIX) || trimmed.starts_with(MASTER_PREFIX) {
        return trimmed.to_string();
    }
    format!("{} - {}", program.display_label(), trimmed)
}

/// Remove a recognized program prefix for editing. Exact inverse of
/// [`format_faculty_name`] for any name it produced.
pub fn strip_program_prefix(name: &str) -> &str {
    name.strip_prefix(BACHELOR_PREFIX)
        .or_else(|| name.strip_prefix(MASTER_PREFIX))
        .unwrap_or(name)
}

/// An admissions department/major, owned by exactly one program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faculty {
    pub id: FacultyId,
    pub name: String,
    pub program: Program,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A scheduled admission-exam slot with a capacity, linkable to several
/// faculties. `available_spots` cannot go negative by construction; write
/// paths additionally reject zero-capacity creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamDate {
    pub id: ExamDateId,
    pub date: DateTime<Utc>,
    pub available_spots: u32,
    pub is_active: bool,
    pub faculty_ids: Vec<FacultyId>,
}

impl ExamDate {
    pub fn is_linked_to(&self, faculty_id: FacultyId) -> bool {
        self.faculty_ids.contains(&faculty_id)
    }
}

/// Exam-date slot as nested under a faculty in the grouped listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamDateSummary {
    pub id: ExamDateId,
    pub date: DateTime<Utc>,
    pub available_spots: u32,
    pub is_active: bool,
}

impl From<&ExamDate> for ExamDateSummary {
    fn from(exam_date: &ExamDate) -> Self {
        Self {
            id: exam_date.id,
            date: exam_date.date,
            available_spots: exam_date.available_spots,
            is_active: exam_date.is_active,
        }
    }
}

/// Faculty with its currently linked exam dates, as served to selection UIs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacultyOverview {
    pub id: FacultyId,
    pub name: String,
    pub program: Program,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub exam_dates: Vec<ExamDateSummary>,
}

/// One partition of the faculty listing: a program and its faculties, in
/// fetch order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramGroup {
    pub program: Program,
    pub faculty_list: Vec<FacultyOverview>,
}

/// Inbound payload for `POST /faculties`. The program arrives as a free-text
/// transport label and is resolved during validation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFacultyRequest {
    pub name: String,
    pub program: String,
}

/// Inbound payload for `PUT /faculties/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateFacultyRequest {
    pub name: String,
    pub program: String,
    pub is_active: bool,
}

/// Inbound payload for `POST /exam-dates`. The transport contract sends the
/// linkage twice: as an id list and as a comma-joined string.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateExamDateRequest {
    #[serde(deserialize_with = "deserialize_instant")]
    pub date: DateTime<Utc>,
    pub available_spots: u32,
    pub faculty_ids: Vec<FacultyId>,
    pub faculty_ids_str: String,
}

/// Inbound payload for `PUT /exam-dates/{id}`. Partial except for the
/// linkage set, which is always replaced in full.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateExamDateRequest {
    #[serde(default, deserialize_with = "deserialize_optional_instant")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub available_spots: Option<u32>,
    #[serde(default)]
    pub is_active: Option<bool>,
    pub faculty_ids: Vec<FacultyId>,
    pub faculty_ids_str: String,
}

/// Parse a transport instant. Accepts RFC 3339, the `datetime-local` shape
/// the admin dialogs submit, and a bare date (midnight UTC).
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    None
}

pub(crate) fn deserialize_instant<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_instant(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("failed to parse '{raw}' as a date/time"))
    })
}

pub(crate) fn deserialize_optional_instant<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|raw| {
        parse_instant(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("failed to parse '{raw}' as a date/time"))
        })
    })
    .transpose()
}
