//! Enrollment policy configuration.
//!
//! All limits default to the values the registry has always enforced, so an
//! empty policy document yields [`EnrollmentPolicy::default`].
//!
//! ```
//! use u_enroll::config::{ClassSelection, EnrollmentPolicy};
//!
//! let policy = EnrollmentPolicy::from_toml_str(
//!     r#"
//!     class_capacity = 30
//!     selection = "FirstEligible"
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(policy.class_capacity, 30);
//! assert_eq!(policy.max_units, 7);
//! assert_eq!(policy.selection, ClassSelection::FirstEligible);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::LectureKind;

/// How a class is picked when a student joins or switches into a unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassSelection {
    /// Only the least-occupied class is considered; if it fails the
    /// conflict or capacity check the request is rejected.
    #[default]
    LeastOccupiedOnly,
    /// Classes are tried in ascending occupation order until one passes.
    FirstEligible,
}

/// Limits and rules applied to every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrollmentPolicy {
    /// Maximum students per class.
    pub class_capacity: usize,
    /// Maximum units a student may attend.
    pub max_units: usize,
    /// Maximum allowed spread (max − min) of class occupations in a unit
    /// after a class switch.
    pub balance_tolerance: usize,
    /// Class selection strategy for joins and unit switches.
    pub selection: ClassSelection,
    /// Lecture kinds exempt from timetable conflict checks.
    pub conflict_exempt_kinds: Vec<LectureKind>,
}

impl Default for EnrollmentPolicy {
    fn default() -> Self {
        Self {
            class_capacity: 26,
            max_units: 7,
            balance_tolerance: 4,
            selection: ClassSelection::LeastOccupiedOnly,
            conflict_exempt_kinds: vec![LectureKind::T],
        }
    }
}

impl EnrollmentPolicy {
    /// Parses a policy from TOML. Missing keys take their defaults.
    pub fn from_toml_str(document: &str) -> Result<Self, ConfigError> {
        let policy: Self = toml::from_str(document)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Checks that the limits are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.class_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "class_capacity",
                reason: "must be at least 1".into(),
            });
        }
        if self.max_units == 0 {
            return Err(ConfigError::Invalid {
                field: "max_units",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Sets the class capacity.
    pub fn with_class_capacity(mut self, capacity: usize) -> Self {
        self.class_capacity = capacity;
        self
    }

    /// Sets the unit limit per student.
    pub fn with_max_units(mut self, max_units: usize) -> Self {
        self.max_units = max_units;
        self
    }

    /// Sets the balance tolerance.
    pub fn with_balance_tolerance(mut self, tolerance: usize) -> Self {
        self.balance_tolerance = tolerance;
        self
    }

    /// Sets the class selection strategy.
    pub fn with_selection(mut self, selection: ClassSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Sets the lecture kinds exempt from conflict checks.
    pub fn with_conflict_exempt_kinds(mut self, kinds: Vec<LectureKind>) -> Self {
        self.conflict_exempt_kinds = kinds;
        self
    }
}
