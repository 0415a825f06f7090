//! Enrollment registry: the aggregate root.
//!
//! The registry exclusively owns every unit and student. Units are stored
//! by code; students are kept in a code-sorted roster for binary-search
//! lookup. All mutation after the initial load goes through
//! [`Registry::assess_request`].
//!
//! # Initial Load
//!
//! ```
//! use u_enroll::models::{LectureKind, Weekday};
//! use u_enroll::registry::Registry;
//!
//! let mut registry = Registry::new("LEIC");
//! registry.add_unit("L.EIC001");
//! registry.add_class("1LEIC01", "L.EIC001").unwrap();
//! registry
//!     .add_lecture("1LEIC01", "L.EIC001", LectureKind::TP, Weekday::Monday, 9.0, 2.0)
//!     .unwrap();
//! registry.add_student("202020047", "Ana", "L.EIC001", "1LEIC01").unwrap();
//!
//! assert_eq!(registry.find_student("202020047").unwrap().schedule().len(), 1);
//! ```

mod assess;
mod query;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EnrollmentPolicy;
use crate::error::{EnrollError, Result};
use crate::models::{Class, Lecture, LectureKind, Student, StudentRoster, Unit, Weekday};

/// The set of units and students of one course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registry {
    name: String,
    policy: EnrollmentPolicy,
    units: BTreeMap<String, Unit>,
    students: StudentRoster,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new("LEIC")
    }
}

impl Registry {
    /// Creates an empty registry with the default policy.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_policy(name, EnrollmentPolicy::default())
    }

    /// Creates an empty registry with a custom policy.
    pub fn with_policy(name: impl Into<String>, policy: EnrollmentPolicy) -> Self {
        Self {
            name: name.into(),
            policy,
            units: BTreeMap::new(),
            students: StudentRoster::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> &EnrollmentPolicy {
        &self.policy
    }

    /// Registers a unit. Does nothing if the code is already known.
    pub fn add_unit(&mut self, unit_code: &str) {
        self.units
            .entry(unit_code.to_string())
            .or_insert_with(|| Unit::new(unit_code));
    }

    /// Adds a class to an existing unit. Idempotent by class code.
    pub fn add_class(&mut self, class_code: &str, unit_code: &str) -> Result<()> {
        let unit = self.unit_mut(unit_code)?;
        if unit.add_class(class_code) {
            debug!(unit = %unit_code, class = %class_code, "class added");
        }
        Ok(())
    }

    /// Registers a student on first sight and enrolls them in a class.
    pub fn add_student(
        &mut self,
        student_code: &str,
        name: &str,
        unit_code: &str,
        class_code: &str,
    ) -> Result<()> {
        let unit = self
            .units
            .get_mut(unit_code)
            .ok_or_else(|| EnrollError::UnitNotFound(unit_code.to_string()))?;
        if unit.class(class_code).is_none() {
            return Err(EnrollError::ClassNotFound {
                unit: unit_code.to_string(),
                class: class_code.to_string(),
            });
        }
        let student = self.students.get_or_insert(student_code, name);
        unit.add_student(student, class_code)
    }

    /// Adds a lecture to a class, propagating it to the enrolled students.
    pub fn add_lecture(
        &mut self,
        class_code: &str,
        unit_code: &str,
        kind: LectureKind,
        weekday: Weekday,
        start_hour: f64,
        duration: f64,
    ) -> Result<()> {
        let lecture = Lecture::new(class_code, unit_code, weekday, start_hour, duration, kind)?;
        let unit = self
            .units
            .get_mut(unit_code)
            .ok_or_else(|| EnrollError::UnitNotFound(unit_code.to_string()))?;
        unit.add_lecture(lecture, &mut self.students)
    }

    /// Finds a student by code (binary search).
    pub fn find_student(&self, student_code: &str) -> Result<&Student> {
        self.students
            .get(student_code)
            .ok_or_else(|| EnrollError::StudentNotFound(student_code.to_string()))
    }

    /// Finds a unit by code.
    pub fn find_unit(&self, unit_code: &str) -> Result<&Unit> {
        self.units
            .get(unit_code)
            .ok_or_else(|| EnrollError::UnitNotFound(unit_code.to_string()))
    }

    /// Finds a class by its code and its unit's code.
    pub fn find_class(&self, class_code: &str, unit_code: &str) -> Result<&Class> {
        self.find_unit(unit_code)?
            .class(class_code)
            .ok_or_else(|| EnrollError::ClassNotFound {
                unit: unit_code.to_string(),
                class: class_code.to_string(),
            })
    }

    fn unit_mut(&mut self, unit_code: &str) -> Result<&mut Unit> {
        self.units
            .get_mut(unit_code)
            .ok_or_else(|| EnrollError::UnitNotFound(unit_code.to_string()))
    }

    /// Borrows a student and a unit mutably at the same time.
    fn student_and_unit_mut(
        &mut self,
        student_code: &str,
        unit_code: &str,
    ) -> Result<(&mut Student, &mut Unit)> {
        let student = self
            .students
            .get_mut(student_code)
            .ok_or_else(|| EnrollError::StudentNotFound(student_code.to_string()))?;
        let unit = self
            .units
            .get_mut(unit_code)
            .ok_or_else(|| EnrollError::UnitNotFound(unit_code.to_string()))?;
        Ok((student, unit))
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::small_registry;
    use super::*;

    #[test]
    fn test_load_order_independent_lectures() {
        // Students added before lectures still receive them.
        let mut r = Registry::new("LEIC");
        r.add_unit("U1");
        r.add_class("1A", "U1").unwrap();
        r.add_student("S1", "Ana", "U1", "1A").unwrap();
        r.add_lecture("1A", "U1", LectureKind::PL, Weekday::Friday, 8.0, 2.0).unwrap();
        assert_eq!(r.find_student("S1").unwrap().schedule().len(), 1);
    }

    #[test]
    fn test_add_unit_idempotent() {
        let mut r = small_registry();
        r.add_unit("U1");
        assert_eq!(r.find_unit("U1").unwrap().class_count(), 2);
    }

    #[test]
    fn test_add_student_twice_keeps_one_record() {
        let mut r = small_registry();
        r.add_student("S1", "Other", "U2", "1C").unwrap();
        let s = r.find_student("S1").unwrap();
        assert_eq!(s.name, "Ana");
        assert_eq!(s.number_of_units(), 2);
        assert_eq!(r.students().len(), 1);
    }

    #[test]
    fn test_lookup_misses() {
        let r = small_registry();
        assert!(matches!(r.find_student("nope"), Err(EnrollError::StudentNotFound(_))));
        assert!(matches!(r.find_unit("U9"), Err(EnrollError::UnitNotFound(_))));
        assert!(matches!(
            r.find_class("9Z", "U1"),
            Err(EnrollError::ClassNotFound { .. })
        ));
        assert!(matches!(
            r.find_class("1A", "U9"),
            Err(EnrollError::UnitNotFound(_))
        ));
    }

    #[test]
    fn test_add_student_unknown_class_registers_nothing() {
        let mut r = small_registry();
        let err = r.add_student("S9", "Zé", "U1", "9Z").unwrap_err();
        assert!(matches!(err, EnrollError::ClassNotFound { .. }));
        assert!(r.find_student("S9").is_err());
    }

    #[test]
    fn test_add_class_unknown_unit() {
        let mut r = small_registry();
        assert!(matches!(
            r.add_class("1A", "U9"),
            Err(EnrollError::UnitNotFound(_))
        ));
    }

    #[test]
    fn test_invalid_lecture() {
        let mut r = small_registry();
        let err = r
            .add_lecture("1A", "U1", LectureKind::T, Weekday::Monday, 9.0, 0.0)
            .unwrap_err();
        assert!(matches!(err, EnrollError::InvalidLecture(_)));
    }

    #[test]
    fn test_deserialize_resorts_roster() {
        let mut r = small_registry();
        r.add_student("S0", "Rui", "U2", "1C").unwrap();
        r.add_student("S2", "Eva", "U2", "1A").unwrap();
        let mut value = serde_json::to_value(&r).unwrap();
        value["students"]["students"].as_array_mut().unwrap().reverse();

        let back: Registry = serde_json::from_value(value).unwrap();
        for code in ["S0", "S1", "S2"] {
            assert!(back.find_student(code).is_ok(), "{code} not found");
        }
        assert_eq!(
            serde_json::to_string(&back).unwrap(),
            serde_json::to_string(&r).unwrap()
        );
    }

    #[test]
    fn test_deserialize_rejects_duplicate_student() {
        let r = small_registry();
        let mut value = serde_json::to_value(&r).unwrap();
        let students = value["students"]["students"].as_array_mut().unwrap();
        let copy = students[0].clone();
        students.push(copy);
        let err = serde_json::from_value::<Registry>(value).unwrap_err();
        assert!(err.to_string().contains("duplicate student 'S1'"));
    }
}
