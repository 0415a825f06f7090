//! Unit (curricular unit, "UC") model.
//!
//! A unit is a named subject made of classes. Classes are stored by code
//! and mutated in place, so the container ordering never depends on
//! mutable class state.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::{Class, Lecture, Schedule, Student, StudentRoster};
use crate::error::{EnrollError, Result};

/// A curricular unit and its classes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    code: String,
    classes: BTreeMap<String, Class>,
}

impl Unit {
    /// Creates a unit with no classes.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            classes: BTreeMap::new(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Curricular year, taken from the first class.
    ///
    /// `None` for a unit without classes.
    pub fn year(&self) -> Option<&str> {
        self.classes.values().next().map(Class::year)
    }

    /// Adds a class unless one with the same code exists. Returns `true` if added.
    pub fn add_class(&mut self, class_code: &str) -> bool {
        if self.classes.contains_key(class_code) {
            return false;
        }
        self.classes
            .insert(class_code.to_string(), Class::new(class_code, &self.code));
        true
    }

    pub fn class(&self, class_code: &str) -> Option<&Class> {
        self.classes.get(class_code)
    }

    pub(crate) fn class_mut(&mut self, class_code: &str) -> Result<&mut Class> {
        let unit = &self.code;
        self.classes
            .get_mut(class_code)
            .ok_or_else(|| EnrollError::ClassNotFound {
                unit: unit.clone(),
                class: class_code.to_string(),
            })
    }

    /// Classes in code order.
    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        self.classes.values()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// The class holding `student_code`, if any.
    pub fn class_of(&self, student_code: &str) -> Option<&Class> {
        self.classes.values().find(|c| c.has_student(student_code))
    }

    /// Sum of class occupations.
    pub fn occupation(&self) -> usize {
        self.classes.values().map(Class::occupation).sum()
    }

    /// Union of all class timetables.
    pub fn schedule(&self) -> Schedule {
        let mut schedule = Schedule::new();
        for class in self.classes.values() {
            schedule.merge(class.schedule());
        }
        schedule
    }

    /// Codes of all students enrolled in any class of the unit.
    pub fn student_codes(&self) -> BTreeSet<&str> {
        self.classes
            .values()
            .flat_map(|c| c.enrolled().iter().map(String::as_str))
            .collect()
    }

    /// Enrolls a student in the named class.
    pub fn add_student(&mut self, student: &mut Student, class_code: &str) -> Result<()> {
        self.class_mut(class_code)?.add_student(student);
        Ok(())
    }

    /// Removes a student from whichever class holds them.
    ///
    /// Returns the class code the student left, or `None` if they held no
    /// class in this unit.
    pub fn remove_student(&mut self, student: &mut Student) -> Option<String> {
        let class = self
            .classes
            .values_mut()
            .find(|c| c.has_student(&student.code))?;
        class.remove_student(student);
        Some(class.code().to_string())
    }

    /// Adds a lecture to the named class, propagating it to enrolled students.
    pub fn add_lecture(&mut self, lecture: Lecture, roster: &mut StudentRoster) -> Result<()> {
        let class_code = lecture.class_code().to_string();
        self.class_mut(&class_code)?.add_lecture(lecture, roster);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LectureKind, Weekday};

    fn sample_unit(roster: &mut StudentRoster) -> Unit {
        let mut unit = Unit::new("L.EIC001");
        unit.add_class("1LEIC01");
        unit.add_class("1LEIC02");
        unit.add_lecture(
            Lecture::new("1LEIC01", "L.EIC001", Weekday::Monday, 9.0, 2.0, LectureKind::TP).unwrap(),
            roster,
        )
        .unwrap();
        unit.add_lecture(
            Lecture::new("1LEIC02", "L.EIC001", Weekday::Tuesday, 9.0, 2.0, LectureKind::TP).unwrap(),
            roster,
        )
        .unwrap();
        unit
    }

    #[test]
    fn test_year_absent_without_classes() {
        let unit = Unit::new("L.EIC001");
        assert_eq!(unit.year(), None);
    }

    #[test]
    fn test_year_from_class() {
        let mut roster = StudentRoster::new();
        let unit = sample_unit(&mut roster);
        assert_eq!(unit.year(), Some("1"));
    }

    #[test]
    fn test_add_class_idempotent() {
        let mut unit = Unit::new("L.EIC001");
        assert!(unit.add_class("1LEIC01"));
        assert!(!unit.add_class("1LEIC01"));
        assert_eq!(unit.class_count(), 1);
    }

    #[test]
    fn test_add_student_unknown_class() {
        let mut roster = StudentRoster::new();
        let mut unit = sample_unit(&mut roster);
        let student = roster.get_or_insert("1", "Ana");
        let err = unit.add_student(student, "9LEIC99").unwrap_err();
        assert!(matches!(err, EnrollError::ClassNotFound { .. }));
        assert!(student.schedule().is_empty());
    }

    #[test]
    fn test_occupation_and_schedule() {
        let mut roster = StudentRoster::new();
        let mut unit = sample_unit(&mut roster);
        unit.add_student(roster.get_or_insert("1", "Ana"), "1LEIC01").unwrap();
        unit.add_student(roster.get_or_insert("2", "Rui"), "1LEIC02").unwrap();

        assert_eq!(unit.occupation(), 2);
        assert_eq!(unit.schedule().len(), 2);
        assert_eq!(unit.student_codes().len(), 2);
        assert_eq!(unit.class_of("2").unwrap().code(), "1LEIC02");
    }

    #[test]
    fn test_remove_student() {
        let mut roster = StudentRoster::new();
        let mut unit = sample_unit(&mut roster);
        unit.add_student(roster.get_or_insert("1", "Ana"), "1LEIC02").unwrap();

        let student = roster.get_mut("1").unwrap();
        assert_eq!(unit.remove_student(student), Some("1LEIC02".to_string()));
        assert!(student.schedule().is_empty());
        assert_eq!(unit.remove_student(student), None);
    }
}
