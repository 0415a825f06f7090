//! Read-only query surface used by presentation layers.

use std::collections::{BTreeMap, BTreeSet};

use super::Registry;
use crate::error::Result;
use crate::models::{Class, Schedule, Student, Unit};

impl Registry {
    /// All students, ordered by code.
    pub fn students(&self) -> &[Student] {
        self.students.as_slice()
    }

    /// All units, ordered by code.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    /// Every class of every unit, ordered by unit then class code.
    pub fn classes(&self) -> Vec<&Class> {
        self.units.values().flat_map(Unit::classes).collect()
    }

    /// A student's timetable.
    pub fn student_schedule(&self, student_code: &str) -> Result<&Schedule> {
        Ok(self.find_student(student_code)?.schedule())
    }

    /// Combined timetable of every class with this code, across all units.
    ///
    /// Class codes name a student group; the group attends one class per unit.
    pub fn class_schedule(&self, class_code: &str) -> Schedule {
        let mut schedule = Schedule::new();
        for class in self.units.values().filter_map(|u| u.class(class_code)) {
            schedule.merge(class.schedule());
        }
        schedule
    }

    /// Union of all class timetables of a unit.
    pub fn unit_schedule(&self, unit_code: &str) -> Result<Schedule> {
        Ok(self.find_unit(unit_code)?.schedule())
    }

    /// Students of one class, ordered by code.
    pub fn students_in_class(&self, class_code: &str, unit_code: &str) -> Result<Vec<&Student>> {
        let class = self.find_class(class_code, unit_code)?;
        Ok(self.resolve_students(class.enrolled().iter().map(String::as_str)))
    }

    /// Students of any class of a unit, ordered by code.
    pub fn students_in_unit(&self, unit_code: &str) -> Result<Vec<&Student>> {
        let unit = self.find_unit(unit_code)?;
        Ok(self.resolve_students(unit.student_codes()))
    }

    /// Students enrolled in at least one class of the given curricular year.
    pub fn students_in_year(&self, year: &str) -> Vec<&Student> {
        let codes: BTreeSet<&str> = self
            .units
            .values()
            .flat_map(Unit::classes)
            .filter(|c| c.year() == year)
            .flat_map(|c| c.enrolled().iter().map(String::as_str))
            .collect();
        self.resolve_students(codes)
    }

    /// Students attending at least `n` units.
    pub fn students_in_at_least(&self, n: usize) -> Vec<&Student> {
        self.students
            .iter()
            .filter(|s| s.number_of_units() >= n)
            .collect()
    }

    /// Units whose year is `year`. Units without classes have no year and never match.
    pub fn units_in_year(&self, year: &str) -> Vec<&Unit> {
        self.units
            .values()
            .filter(|u| u.year() == Some(year))
            .collect()
    }

    /// Classes of one unit, ordered by code.
    pub fn classes_in_unit(&self, unit_code: &str) -> Result<Vec<&Class>> {
        Ok(self.find_unit(unit_code)?.classes().collect())
    }

    /// Classes a student attends, resolved from the lectures in their timetable.
    pub fn student_classes(&self, student_code: &str) -> Result<Vec<&Class>> {
        let student = self.find_student(student_code)?;
        let keys: BTreeSet<(&str, &str)> = student
            .schedule()
            .iter()
            .map(|l| (l.unit_code(), l.class_code()))
            .collect();
        keys.into_iter()
            .map(|(unit, class)| self.find_class(class, unit))
            .collect()
    }

    /// Number of distinct students per curricular year.
    pub fn year_occupation(&self) -> BTreeMap<String, usize> {
        self.units
            .values()
            .filter_map(Unit::year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|year| (year.to_string(), self.students_in_year(year).len()))
            .collect()
    }

    /// Number of registered students.
    pub fn occupation(&self) -> usize {
        self.students.len()
    }

    fn resolve_students<'a>(&self, codes: impl IntoIterator<Item = &'a str>) -> Vec<&Student> {
        codes
            .into_iter()
            .filter_map(|code| self.students.get(code))
            .collect()
    }
}
