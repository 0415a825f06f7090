//! Class (teaching group) model.
//!
//! A class owns its timetable and the codes of its enrolled students. The
//! students themselves live in the registry's [`StudentRoster`]; enrollment
//! changes push or pull the class's lectures into the affected students'
//! timetables so that a student's schedule is always the union of the
//! schedules of the classes they belong to.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{Lecture, Schedule, Student, StudentRoster};

/// A teaching group inside a unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    code: String,
    unit_code: String,
    schedule: Schedule,
    enrolled: BTreeSet<String>,
}

impl Class {
    /// Creates an empty class.
    pub fn new(code: impl Into<String>, unit_code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            unit_code: unit_code.into(),
            schedule: Schedule::new(),
            enrolled: BTreeSet::new(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn unit_code(&self) -> &str {
        &self.unit_code
    }

    /// Curricular year: the first character of the class code (`"1LEIC01"` → `"1"`).
    pub fn year(&self) -> &str {
        self.code
            .char_indices()
            .nth(1)
            .map_or(self.code.as_str(), |(end, _)| &self.code[..end])
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Codes of enrolled students, sorted.
    pub fn enrolled(&self) -> &BTreeSet<String> {
        &self.enrolled
    }

    /// Number of enrolled students.
    pub fn occupation(&self) -> usize {
        self.enrolled.len()
    }

    pub fn has_student(&self, student_code: &str) -> bool {
        self.enrolled.contains(student_code)
    }

    /// Ordering key `(code, unit_code)`.
    pub fn key(&self) -> (&str, &str) {
        (&self.code, &self.unit_code)
    }

    /// Enrolls a student and copies every class lecture into their timetable.
    pub fn add_student(&mut self, student: &mut Student) {
        self.enrolled.insert(student.code.clone());
        for lecture in &self.schedule {
            student.add_lecture(lecture.clone());
        }
    }

    /// Removes a student and drops every class lecture from their timetable.
    ///
    /// Returns `false` if the student was not enrolled.
    pub fn remove_student(&mut self, student: &mut Student) -> bool {
        if !self.enrolled.remove(&student.code) {
            return false;
        }
        for lecture in &self.schedule {
            student.remove_lecture(lecture);
        }
        true
    }

    /// Adds a lecture and propagates it to every enrolled student.
    pub fn add_lecture(&mut self, lecture: Lecture, roster: &mut StudentRoster) {
        for code in &self.enrolled {
            if let Some(student) = roster.get_mut(code) {
                student.add_lecture(lecture.clone());
            }
        }
        self.schedule.add(lecture);
    }
}
