//! Class enrollment engine.
//!
//! Keeps the units, classes and students of a course in one registry and
//! decides whether enrollment change requests (join, leave, switch unit,
//! switch class) are admissible under capacity, load, timetable and
//! balance rules. Accepted requests are logged so the last one can be
//! undone and the whole history replayed on the next start.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Lecture`, `Schedule`, `Student`, `Class`,
//!   `Unit`, `Request`
//! - **`registry`**: The aggregate root, request assessment and queries
//! - **`journal`**: Request log, history record format, `EnrollmentSession`
//! - **`config`**: `EnrollmentPolicy` (capacity, unit limit, balance tolerance)
//! - **`validation`**: Integrity checks (over-capacity classes, duplicate
//!   enrollments, timetable drift)
//! - **`report`**: Occupation metrics per year, unit and class
//! - **`error`**: Error and rejection types
//!
//! # Assessment Rules
//!
//! | Rule | Applies to | Default |
//! |------|-----------|---------|
//! | Unit limit | Join | 7 units |
//! | Class capacity | Join, SwitchUc, SwitchClass | 26 students |
//! | Timetable conflict | Join, SwitchUc, SwitchClass | `T` lectures exempt |
//! | Occupation balance | SwitchClass | spread ≤ 4 |

pub mod config;
pub mod error;
pub mod journal;
pub mod models;
pub mod registry;
pub mod report;
pub mod validation;
