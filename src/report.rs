//! Occupation metrics.
//!
//! Summarizes how students are spread over the registry after a batch of
//! requests.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total occupation | Registered students |
//! | Year occupation | Distinct students holding a class of that year |
//! | Unit occupation | Students enrolled in the unit |
//! | Class occupation | Students enrolled in the class |
//! | Spread | max − min class occupation within a unit |
//! | Fill rate | Enrolled seats / offered seats |

use std::collections::BTreeMap;

use serde::Serialize;

use crate::registry::Registry;

/// Per-unit occupation figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitOccupation {
    /// Students enrolled in the unit.
    pub students: usize,
    /// Occupation per class code.
    pub by_class: BTreeMap<String, usize>,
    /// Largest minus smallest class occupation.
    pub spread: usize,
}

/// Registry occupation indicators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupationReport {
    /// Registered students.
    pub total_students: usize,
    /// Distinct students per curricular year.
    pub by_year: BTreeMap<String, usize>,
    /// Figures per unit code.
    pub by_unit: BTreeMap<String, UnitOccupation>,
    /// Largest spread of any unit.
    pub max_spread: usize,
    /// Enrolled seats over offered seats (0.0..1.0 when nothing is over capacity).
    pub fill_rate: f64,
}

impl OccupationReport {
    /// Computes the report from the current registry state.
    pub fn calculate(registry: &Registry) -> Self {
        let mut by_unit = BTreeMap::new();
        let mut seats_taken = 0usize;
        let mut seats_offered = 0usize;

        for unit in registry.units() {
            let by_class: BTreeMap<String, usize> = unit
                .classes()
                .map(|class| (class.code().to_string(), class.occupation()))
                .collect();

            let spread = match (by_class.values().max(), by_class.values().min()) {
                (Some(max), Some(min)) => max - min,
                _ => 0,
            };

            seats_taken += by_class.values().sum::<usize>();
            seats_offered += by_class.len() * registry.policy().class_capacity;

            by_unit.insert(
                unit.code().to_string(),
                UnitOccupation {
                    students: unit.occupation(),
                    by_class,
                    spread,
                },
            );
        }

        let max_spread = by_unit.values().map(|u| u.spread).max().unwrap_or(0);

        let fill_rate = if seats_offered == 0 {
            0.0
        } else {
            seats_taken as f64 / seats_offered as f64
        };

        Self {
            total_students: registry.occupation(),
            by_year: registry.year_occupation(),
            by_unit,
            max_spread,
            fill_rate,
        }
    }

    /// Whether every unit stays within the given spread.
    pub fn is_balanced(&self, tolerance: usize) -> bool {
        self.max_spread <= tolerance
    }

    /// Occupation of one class, if it exists.
    pub fn class_occupation(&self, unit_code: &str, class_code: &str) -> Option<usize> {
        self.by_unit
            .get(unit_code)
            .and_then(|u| u.by_class.get(class_code))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnrollmentPolicy;
    use crate::models::{LectureKind, Weekday};
    use crate::registry::fixtures::{fill_class, small_registry};

    #[test]
    fn test_report_small_registry() {
        let mut r = small_registry();
        r.add_student("S2", "Rui", "U2", "1C").unwrap();

        let report = OccupationReport::calculate(&r);
        assert_eq!(report.total_students, 2);
        assert_eq!(report.by_year["1"], 2);
        assert_eq!(report.by_unit["U1"].students, 1);
        assert_eq!(report.by_unit["U1"].spread, 1);
        assert_eq!(report.class_occupation("U2", "1C"), Some(1));
        assert_eq!(report.class_occupation("U2", "1A"), Some(0));
        assert_eq!(report.class_occupation("U9", "1A"), None);
        assert_eq!(report.max_spread, 1);
    }

    #[test]
    fn test_report_spread_and_fill() {
        let mut r = Registry::with_policy("LEIC", EnrollmentPolicy::default().with_class_capacity(10));
        r.add_unit("U");
        r.add_class("2A", "U").unwrap();
        r.add_class("2B", "U").unwrap();
        r.add_lecture("2A", "U", LectureKind::TP, Weekday::Monday, 9.0, 2.0).unwrap();
        fill_class(&mut r, "U", "2A", "A", 6);
        fill_class(&mut r, "U", "2B", "B", 1);

        let report = OccupationReport::calculate(&r);
        assert_eq!(report.by_unit["U"].spread, 5);
        assert_eq!(report.by_year["2"], 7);
        // 7 of 20 seats
        assert!((report.fill_rate - 0.35).abs() < 1e-10);
        assert!(report.is_balanced(5));
        assert!(!report.is_balanced(4));
    }

    #[test]
    fn test_report_empty() {
        let report = OccupationReport::calculate(&Registry::default());
        assert_eq!(report.total_students, 0);
        assert!(report.by_unit.is_empty());
        assert_eq!(report.max_spread, 0);
        assert!((report.fill_rate - 0.0).abs() < 1e-10);
    }
}
