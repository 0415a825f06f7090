//! Request assessment: the guards that gate every enrollment change.
//!
//! # Guards
//!
//! | Guard | Rejects when |
//! |-------|--------------|
//! | Unit limit | the student already attends `max_units` units |
//! | Class capacity | the class holds `class_capacity` students |
//! | Schedule conflict | a non-exempt class lecture overlaps a non-exempt student lecture |
//! | Unit balance | after the move, max − min class occupation exceeds `balance_tolerance` |
//!
//! # Speculative Checks
//! Switches are evaluated against a working copy of the student's timetable
//! with the lectures being given up already removed. The registry is only
//! touched once every guard has passed, so a rejected request leaves all
//! state exactly as it was.

use tracing::{debug, info};

use super::Registry;
use crate::config::ClassSelection;
use crate::error::{EnrollError, Rejection, RejectionReason, Result};
use crate::models::{Class, Request, RequestKind, Schedule, Student, Unit};

impl Registry {
    /// Validates a request and applies it if every guard passes.
    ///
    /// Returns `Ok(true)` when the registry changed and `Ok(false)` for an
    /// accepted request with nothing to do (a Leave for a unit the student
    /// does not hold). Returns `Err(EnrollError::Rejected)` when a rule
    /// forbids the change, or a not-found error when a code names nothing.
    /// On error the registry is unchanged.
    pub fn assess_request(&mut self, request: &Request) -> Result<bool> {
        let student = request.student_code();
        let outcome = match request.kind() {
            RequestKind::Join { unit } => self.join(student, unit).map(|()| true),
            RequestKind::Leave { unit } => self.leave(student, unit),
            RequestKind::SwitchUnit { from, to } => {
                self.switch_unit(student, from, to).map(|()| true)
            }
            RequestKind::SwitchClass { unit, from, to } => {
                self.switch_class(student, unit, from, to).map(|()| true)
            }
        };

        match &outcome {
            Ok(true) => info!(student = %student, undo = request.is_undo(), "{}", request.describe()),
            Ok(false) => debug!(student = %student, request = %request, "accepted without changes"),
            Err(err) => debug!(student = %student, error = %err, "request not applied"),
        }
        outcome
    }

    fn join(&mut self, student_code: &str, unit_code: &str) -> Result<()> {
        let student = self.find_student(student_code)?;
        let unit = self.find_unit(unit_code)?;
        if unit.class_of(student_code).is_some() {
            return Err(already_in_unit(student_code, unit_code).into());
        }
        self.check_unit_limit(student)?;
        let class_code = self
            .choose_class_from_unit(student.schedule(), unit)?
            .code()
            .to_string();

        let (student, unit) = self.student_and_unit_mut(student_code, unit_code)?;
        unit.add_student(student, &class_code)
    }

    fn leave(&mut self, student_code: &str, unit_code: &str) -> Result<bool> {
        let (student, unit) = self.student_and_unit_mut(student_code, unit_code)?;
        match unit.remove_student(student) {
            Some(class) => {
                debug!(student = %student_code, unit = %unit_code, class = %class, "left class");
                Ok(true)
            }
            None => {
                debug!(student = %student_code, unit = %unit_code, "not enrolled, nothing to leave");
                Ok(false)
            }
        }
    }

    fn switch_unit(&mut self, student_code: &str, from: &str, to: &str) -> Result<()> {
        let student = self.find_student(student_code)?;
        let current = self.find_unit(from)?;
        let next = self.find_unit(to)?;
        if current.class_of(student_code).is_none() {
            return Err(EnrollError::StudentNotInUnit {
                student: student_code.to_string(),
                unit: from.to_string(),
            });
        }
        if next.class_of(student_code).is_some() {
            return Err(already_in_unit(student_code, to).into());
        }

        let mut working = student.schedule().clone();
        working.subtract(&student.schedule().for_unit(from));
        let class_code = self
            .choose_class_from_unit(&working, next)?
            .code()
            .to_string();

        let (student, current) = self.student_and_unit_mut(student_code, from)?;
        current.remove_student(student);
        let (student, next) = self.student_and_unit_mut(student_code, to)?;
        next.add_student(student, &class_code)
    }

    fn switch_class(&mut self, student_code: &str, unit_code: &str, from: &str, to: &str) -> Result<()> {
        let student = self.find_student(student_code)?;
        let unit = self.find_unit(unit_code)?;
        let current = self.find_class(from, unit_code)?;
        let next = self.find_class(to, unit_code)?;
        if !current.has_student(student_code) {
            return Err(EnrollError::StudentNotInClass {
                student: student_code.to_string(),
                unit: unit_code.to_string(),
                class: from.to_string(),
            });
        }
        if from == to {
            return Err(Rejection::new(
                RejectionReason::AlreadyEnrolled,
                format!("Student {student_code} is already in class {to}."),
            )
            .into());
        }

        let mut working = student.schedule().clone();
        working.subtract(current.schedule());
        self.can_choose_class(&working, unit, current, next)?;

        let (student, unit) = self.student_and_unit_mut(student_code, unit_code)?;
        unit.class_mut(from)?.remove_student(student);
        unit.class_mut(to)?.add_student(student);
        Ok(())
    }

    /// Rejects if the student already attends the maximum number of units.
    pub fn check_unit_limit(&self, student: &Student) -> std::result::Result<(), Rejection> {
        if student.number_of_units() < self.policy.max_units {
            return Ok(());
        }
        debug!(student = %student.code, units = student.number_of_units(), "unit limit reached");
        Err(Rejection::unit_limit(self.policy.max_units))
    }

    /// Rejects if the class is at capacity.
    pub fn check_class_capacity(&self, class: &Class) -> std::result::Result<(), Rejection> {
        if class.occupation() < self.policy.class_capacity {
            return Ok(());
        }
        debug!(class = %class.code(), unit = %class.unit_code(), "class full");
        Err(Rejection::class_full(class.code()))
    }

    /// Rejects if a non-exempt lecture in `schedule` overlaps a non-exempt
    /// lecture of `class`.
    pub fn check_schedule_conflicts(
        &self,
        schedule: &Schedule,
        class: &Class,
    ) -> std::result::Result<(), Rejection> {
        match schedule.first_conflict(class.schedule(), &self.policy.conflict_exempt_kinds) {
            None => Ok(()),
            Some((mine, theirs)) => {
                debug!(class = %class.code(), held = %mine, wanted = %theirs, "schedule conflict");
                Err(Rejection::schedule_conflict(class.code()))
            }
        }
    }

    /// Rejects a move from `current` to `next` if it would spread the unit's
    /// class occupations beyond the balance tolerance.
    ///
    /// The simulated occupations are `next + 1`, `current − 1`, others unchanged.
    pub fn check_unit_balance(
        &self,
        unit: &Unit,
        current: &Class,
        next: &Class,
    ) -> std::result::Result<(), Rejection> {
        let simulated: Vec<usize> = unit
            .classes()
            .map(|class| {
                let occupation = class.occupation();
                if class.code() == next.code() {
                    occupation + 1
                } else if class.code() == current.code() {
                    occupation.saturating_sub(1)
                } else {
                    occupation
                }
            })
            .collect();

        let (Some(min), Some(max)) = (simulated.iter().min(), simulated.iter().max()) else {
            return Ok(());
        };
        if max - min <= self.policy.balance_tolerance {
            return Ok(());
        }
        debug!(unit = %unit.code(), spread = max - min, "class balance violated");
        Err(Rejection::imbalance(next.code()))
    }

    /// Conflict, capacity and balance checks for a class switch.
    pub fn can_choose_class(
        &self,
        schedule: &Schedule,
        unit: &Unit,
        current: &Class,
        next: &Class,
    ) -> std::result::Result<(), Rejection> {
        self.check_schedule_conflicts(schedule, next)?;
        self.check_class_capacity(next)?;
        self.check_unit_balance(unit, current, next)
    }

    /// Picks a class of `unit` for a student whose timetable is `schedule`.
    ///
    /// Candidates are ordered by ascending occupation, ties by class key.
    /// Under [`ClassSelection::LeastOccupiedOnly`] only the first candidate
    /// is evaluated; under [`ClassSelection::FirstEligible`] the first one
    /// passing the conflict and capacity checks is returned.
    pub fn choose_class_from_unit<'u>(
        &self,
        schedule: &Schedule,
        unit: &'u Unit,
    ) -> std::result::Result<&'u Class, Rejection> {
        let mut candidates: Vec<&Class> = unit.classes().collect();
        candidates.sort_by(|a, b| {
            a.occupation()
                .cmp(&b.occupation())
                .then_with(|| a.key().cmp(&b.key()))
        });

        for class in candidates {
            let verdict = self
                .check_schedule_conflicts(schedule, class)
                .and_then(|()| self.check_class_capacity(class));
            match verdict {
                Ok(()) => return Ok(class),
                Err(rejection) if self.policy.selection == ClassSelection::LeastOccupiedOnly => {
                    return Err(rejection)
                }
                Err(_) => continue,
            }
        }

        let message = if unit.class_count() == 0 {
            format!("UC {} has no classes.", unit.code())
        } else {
            format!(
                "No class of UC {} fits the student's schedule and capacity limits.",
                unit.code()
            )
        };
        Err(Rejection::new(RejectionReason::NoClassAvailable, message))
    }
}

fn already_in_unit(student_code: &str, unit_code: &str) -> Rejection {
    Rejection::new(
        RejectionReason::AlreadyEnrolled,
        format!("Student {student_code} is already enrolled in UC {unit_code}."),
    )
}
