//! Enrollment domain models.
//!
//! Leaf-first: lectures form schedules; students and classes own
//! schedules; units group classes; requests describe changes.
//!
//! # Domain Mappings
//!
//! | u-enroll | University | Training center | Sports club |
//! |----------|-----------|-----------------|-------------|
//! | Unit | Curricular unit (UC) | Course | Discipline |
//! | Class | Teaching group | Cohort | Squad |
//! | Lecture | Weekly session | Workshop slot | Practice slot |
//! | Student | Student | Trainee | Member |

mod class;
mod lecture;
mod request;
mod schedule;
mod student;
mod unit;

pub use class::Class;
pub use lecture::{Lecture, LectureKind, Weekday};
pub use request::{Request, RequestKind};
pub use schedule::Schedule;
pub use student::{Student, StudentRoster};
pub use unit::Unit;
