//! Schedule (timetable) model.
//!
//! A schedule is an ordered set of lectures, unique by the lecture ordering
//! key. The same type serves as a student's, a class's, and a unit's
//! timetable.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{Lecture, LectureKind, Weekday};

/// An ordered, deduplicated set of lectures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    lectures: BTreeSet<Lecture>,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a lecture. Returns `false` if an equal lecture was already present.
    pub fn add(&mut self, lecture: Lecture) -> bool {
        self.lectures.insert(lecture)
    }

    /// Removes a lecture. Returns `false` if it was not present.
    pub fn remove(&mut self, lecture: &Lecture) -> bool {
        self.lectures.remove(lecture)
    }

    /// Whether the schedule holds this lecture.
    pub fn contains(&self, lecture: &Lecture) -> bool {
        self.lectures.contains(lecture)
    }

    /// Inserts every lecture of `other`.
    pub fn merge(&mut self, other: &Schedule) {
        self.lectures.extend(other.lectures.iter().cloned());
    }

    /// Removes every lecture of `other`.
    pub fn subtract(&mut self, other: &Schedule) {
        for lecture in &other.lectures {
            self.lectures.remove(lecture);
        }
    }

    /// Lectures in key order.
    pub fn iter(&self) -> impl Iterator<Item = &Lecture> {
        self.lectures.iter()
    }

    /// Number of lectures.
    pub fn len(&self) -> usize {
        self.lectures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lectures.is_empty()
    }

    /// Distinct unit codes appearing in this schedule.
    pub fn unit_codes(&self) -> BTreeSet<&str> {
        self.lectures.iter().map(Lecture::unit_code).collect()
    }

    /// Number of distinct units appearing in this schedule.
    pub fn number_of_units(&self) -> usize {
        self.unit_codes().len()
    }

    /// The lectures belonging to one unit.
    pub fn for_unit(&self, unit_code: &str) -> Schedule {
        self.lectures
            .iter()
            .filter(|l| l.unit_code() == unit_code)
            .cloned()
            .collect()
    }

    /// Lectures held on `weekday`, ordered by start hour.
    pub fn lectures_on(&self, weekday: Weekday) -> impl Iterator<Item = &Lecture> {
        self.lectures.iter().filter(move |l| l.weekday() == weekday)
    }

    /// Finds the first pair of overlapping lectures `(mine, theirs)`.
    ///
    /// Lectures whose kind is in `exempt` are ignored on both sides.
    pub fn first_conflict<'a>(
        &'a self,
        other: &'a Schedule,
        exempt: &[LectureKind],
    ) -> Option<(&'a Lecture, &'a Lecture)> {
        let checked = |l: &&Lecture| !exempt.contains(&l.kind());
        self.lectures.iter().filter(checked).find_map(|mine| {
            other
                .lectures
                .iter()
                .filter(checked)
                .find(|theirs| mine.overlaps(theirs))
                .map(|theirs| (mine, theirs))
        })
    }

    /// Whether any non-exempt lecture overlaps a non-exempt lecture of `other`.
    pub fn conflicts_with(&self, other: &Schedule, exempt: &[LectureKind]) -> bool {
        self.first_conflict(other, exempt).is_some()
    }
}

impl FromIterator<Lecture> for Schedule {
    fn from_iter<I: IntoIterator<Item = Lecture>>(iter: I) -> Self {
        Self {
            lectures: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a Lecture;
    type IntoIter = std::collections::btree_set::Iter<'a, Lecture>;

    fn into_iter(self) -> Self::IntoIter {
        self.lectures.iter()
    }
}
