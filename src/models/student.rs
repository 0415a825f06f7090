//! Student model and the code-sorted student roster.

use serde::{Deserialize, Serialize};

use super::{Lecture, Schedule};
use crate::error::EnrollError;

/// A registered student.
///
/// The student's timetable is derived from class membership: lectures
/// arrive and leave only through [`Class`](super::Class) enrollment changes.
/// Unit membership is implied by the timetable and never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    /// Unique student code.
    pub code: String,
    /// Display name.
    pub name: String,
    schedule: Schedule,
}

impl Student {
    /// Creates a student with an empty timetable.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            schedule: Schedule::new(),
        }
    }

    /// The student's timetable.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Number of distinct units the student attends.
    pub fn number_of_units(&self) -> usize {
        self.schedule.number_of_units()
    }

    /// Whether the timetable contains a lecture of `unit_code`.
    pub fn attends_unit(&self, unit_code: &str) -> bool {
        self.schedule.iter().any(|l| l.unit_code() == unit_code)
    }

    pub(crate) fn add_lecture(&mut self, lecture: Lecture) {
        self.schedule.add(lecture);
    }

    pub(crate) fn remove_lecture(&mut self, lecture: &Lecture) {
        self.schedule.remove(lecture);
    }
}

/// Students kept sorted by code for binary-search lookup.
///
/// Deserialized rosters are re-sorted; duplicate codes are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "RosterRecord")]
pub struct StudentRoster {
    students: Vec<Student>,
}

#[derive(Deserialize)]
struct RosterRecord {
    students: Vec<Student>,
}

impl TryFrom<RosterRecord> for StudentRoster {
    type Error = EnrollError;

    fn try_from(record: RosterRecord) -> Result<Self, Self::Error> {
        let mut students = record.students;
        students.sort_by(|a, b| a.code.cmp(&b.code));
        if let Some(pair) = students.windows(2).find(|w| w[0].code == w[1].code) {
            return Err(EnrollError::DuplicateStudent(pair[0].code.clone()));
        }
        Ok(Self { students })
    }
}

impl StudentRoster {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, code: &str) -> Result<usize, usize> {
        self.students
            .binary_search_by(|s| s.code.as_str().cmp(code))
    }

    /// Finds a student by code in O(log n).
    pub fn get(&self, code: &str) -> Option<&Student> {
        self.position(code).ok().map(|i| &self.students[i])
    }

    pub fn get_mut(&mut self, code: &str) -> Option<&mut Student> {
        match self.position(code) {
            Ok(i) => Some(&mut self.students[i]),
            Err(_) => None,
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.position(code).is_ok()
    }

    /// Returns the student with `code`, registering it first if absent.
    ///
    /// An existing student keeps its original name.
    pub fn get_or_insert(&mut self, code: &str, name: &str) -> &mut Student {
        let index = match self.position(code) {
            Ok(i) => i,
            Err(i) => {
                self.students.insert(i, Student::new(code, name));
                i
            }
        };
        &mut self.students[index]
    }

    /// Students in code order.
    pub fn iter(&self) -> impl Iterator<Item = &Student> {
        self.students.iter()
    }

    pub fn as_slice(&self) -> &[Student] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}
