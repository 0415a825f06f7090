//! Integrity checks for a loaded registry.
//!
//! Run after the initial load (or after replay) to detect data that the
//! request engine assumes never happens:
//! - Units without classes (no curricular year)
//! - Classes above capacity
//! - Students enrolled in more than one class of the same unit
//! - Classes referencing unregistered students
//! - Student timetables that differ from the union of their classes' timetables

use std::collections::BTreeMap;

use crate::models::Schedule;
use crate::registry::Registry;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A unit has no classes, so its year is undefined.
    EmptyUnit,
    /// A class holds more students than the policy capacity.
    OverCapacity,
    /// A student holds more than one class in the same unit.
    DuplicateEnrollment,
    /// A class lists a student code the registry does not know.
    UnknownStudent,
    /// A student's timetable is not the union of their classes' timetables.
    ScheduleMismatch,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the structural integrity of a registry.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_registry(registry: &Registry) -> ValidationResult {
    let mut errors = Vec::new();
    let capacity = registry.policy().class_capacity;

    // Expected timetable per student, rebuilt from class membership
    let mut expected: BTreeMap<&str, Schedule> = BTreeMap::new();

    for unit in registry.units() {
        if unit.class_count() == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyUnit,
                format!("UC '{}' has no classes", unit.code()),
            ));
        }

        let mut holders: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for class in unit.classes() {
            if class.occupation() > capacity {
                errors.push(ValidationError::new(
                    ValidationErrorKind::OverCapacity,
                    format!(
                        "Class '{}' of UC '{}' holds {} students (capacity {})",
                        class.code(),
                        unit.code(),
                        class.occupation(),
                        capacity
                    ),
                ));
            }

            for code in class.enrolled() {
                if registry.find_student(code).is_err() {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::UnknownStudent,
                        format!(
                            "Class '{}' of UC '{}' references unknown student '{}'",
                            class.code(),
                            unit.code(),
                            code
                        ),
                    ));
                }
                holders.entry(code).or_default().push(class.code());
                expected.entry(code).or_default().merge(class.schedule());
            }
        }

        for (student, classes) in holders {
            if classes.len() > 1 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateEnrollment,
                    format!(
                        "Student '{}' is in {} classes of UC '{}': {}",
                        student,
                        classes.len(),
                        unit.code(),
                        classes.join(", ")
                    ),
                ));
            }
        }
    }

    // Check timetables
    let empty = Schedule::new();
    for student in registry.students() {
        let wanted = expected.get(student.code.as_str()).unwrap_or(&empty);
        if student.schedule() != wanted {
            errors.push(ValidationError::new(
                ValidationErrorKind::ScheduleMismatch,
                format!(
                    "Student '{}' has {} lectures, classes imply {}",
                    student.code,
                    student.schedule().len(),
                    wanted.len()
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
