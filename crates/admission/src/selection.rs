//! Dependent-selection chain shared by the public intake form and the admin
//! assignment dialogs: choosing a program filters faculties, choosing a
//! faculty filters exam dates, and changing an upstream choice always clears
//! everything downstream of it.

use serde::Serialize;

use crate::catalog::{ExamDateId, FacultyId, Program};

/// Progress through the ordered selection slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionState {
    Empty,
    ProgramChosen,
    FacultyChosen,
    ExamDateChosen,
}

/// Three ordered selection slots with downstream invalidation.
///
/// Invariant after every transition: an exam date is only ever set while a
/// faculty is set, and a faculty only while a program is set. Out-of-order
/// attempts are no-ops (the UI renders those controls disabled), not errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SelectionChain {
    program: Option<Program>,
    faculty: Option<FacultyId>,
    exam_date: Option<ExamDateId>,
}

impl SelectionChain {
    pub const fn new() -> Self {
        Self {
            program: None,
            faculty: None,
            exam_date: None,
        }
    }

    /// Choose a program, discarding any faculty and exam-date choice.
    pub fn set_program(&mut self, program: Program) {
        self.program = Some(program);
        self.faculty = None;
        self.exam_date = None;
    }

    /// Choose a faculty, discarding any exam-date choice. No-op while the
    /// program slot is empty; returns whether the choice was taken.
    pub fn set_faculty(&mut self, faculty: FacultyId) -> bool {
        if self.program.is_none() {
            return false;
        }
        self.faculty = Some(faculty);
        self.exam_date = None;
        true
    }

    /// Choose an exam date. No-op while the faculty slot is empty.
    pub fn set_exam_date(&mut self, exam_date: ExamDateId) -> bool {
        if self.faculty.is_none() {
            return false;
        }
        self.exam_date = Some(exam_date);
        true
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub const fn program(&self) -> Option<Program> {
        self.program
    }

    pub const fn faculty(&self) -> Option<FacultyId> {
        self.faculty
    }

    pub const fn exam_date(&self) -> Option<ExamDateId> {
        self.exam_date
    }

    pub const fn state(&self) -> SelectionState {
        match (self.program, self.faculty, self.exam_date) {
            (None, _, _) => SelectionState::Empty,
            (Some(_), None, _) => SelectionState::ProgramChosen,
            (Some(_), Some(_), None) => SelectionState::FacultyChosen,
            (Some(_), Some(_), Some(_)) => SelectionState::ExamDateChosen,
        }
    }

    pub const fn is_complete(&self) -> bool {
        matches!(self.state(), SelectionState::ExamDateChosen)
    }
}

/// Multi-select faculty checklist used by the admin create-exam-date dialog,
/// which links one slot to several faculties at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacultyChecklist {
    selected: Vec<FacultyId>,
}

impl FacultyChecklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle a faculty in or out of the selection, preserving click order.
    pub fn toggle(&mut self, faculty: FacultyId) {
        match self.selected.iter().position(|id| *id == faculty) {
            Some(index) => {
                self.selected.remove(index);
            }
            None => self.selected.push(faculty),
        }
    }

    pub fn selected(&self) -> &[FacultyId] {
        &self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Comma-joined ids, as the transport contract duplicates the linkage.
    pub fn joined(&self) -> String {
        self.selected
            .iter()
            .map(|id| id.0.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}
