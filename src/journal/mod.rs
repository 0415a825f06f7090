//! Request journal: the log of accepted requests, its on-disk record
//! format, and the session that ties a registry to its log.
//!
//! # Usage
//!
//! ```
//! use u_enroll::journal::EnrollmentSession;
//! use u_enroll::models::{LectureKind, Request, Weekday};
//! use u_enroll::registry::Registry;
//!
//! let mut registry = Registry::new("LEIC");
//! registry.add_unit("L.EIC001");
//! registry.add_class("1LEIC01", "L.EIC001").unwrap();
//! registry.add_class("1LEIC02", "L.EIC001").unwrap();
//! registry
//!     .add_lecture("1LEIC02", "L.EIC001", LectureKind::PL, Weekday::Monday, 9.0, 2.0)
//!     .unwrap();
//! registry.add_student("202020047", "Ana", "L.EIC001", "1LEIC01").unwrap();
//!
//! let mut session = EnrollmentSession::new(registry);
//! session
//!     .submit(Request::switch_class("202020047", "L.EIC001", "1LEIC01", "1LEIC02"))
//!     .unwrap();
//! session.undo().unwrap();
//! assert_eq!(session.log().history().len(), 2);
//! ```

mod log;
mod record;
mod session;

pub use log::RequestLog;
pub use record::{load_history_file, read_history, save_history_file, write_history};
pub use session::{EnrollmentSession, ReplaySummary};
