//! Pure derivations over catalog snapshots. No I/O: everything operates on
//! the caller's last-fetched registry and ledger state.

use super::domain::{ExamDate, FacultyId, FacultyOverview, Program, ProgramGroup};

/// Faculties offered under a program. The first matching group in fetch
/// order wins when several groups resolve to the same program.
pub fn faculties_for_program(program: Program, groups: &[ProgramGroup]) -> &[FacultyOverview] {
    groups
        .iter()
        .find(|group| group.program == program)
        .map(|group| group.faculty_list.as_slice())
        .unwrap_or(&[])
}

/// Exam dates currently linked to a faculty, ascending by date. Absence of
/// linkage yields an empty sequence, not an error.
pub fn exam_dates_for_faculty(faculty_id: FacultyId, exam_dates: &[ExamDate]) -> Vec<ExamDate> {
    let mut linked: Vec<ExamDate> = exam_dates
        .iter()
        .filter(|exam_date| exam_date.is_linked_to(faculty_id))
        .cloned()
        .collect();
    linked.sort_by_key(|exam_date| (exam_date.date, exam_date.id));
    linked
}

/// Remaining capacity as last fetched. Never negative by construction; the
/// ledger guards the floor at write time.
pub const fn remaining_spots(exam_date: &ExamDate) -> u32 {
    exam_date.available_spots
}

/// The faculty side of the linkage, for symmetry checks and admin views.
pub fn linked_faculties(exam_date: &ExamDate) -> &[FacultyId] {
    &exam_date.faculty_ids
}
