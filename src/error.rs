//! Error types for enrollment operations.
//!
//! Two families of failure exist:
//! - **Rejections**: a request was well-formed but violates an enrollment
//!   rule (capacity, conflict, unit limit, balance). State is unchanged and
//!   the caller may retry with different parameters.
//! - **Lookup and I/O errors**: a code names nothing in the registry, a
//!   history record is malformed, or the history file cannot be accessed.

use std::fmt;

use thiserror::Error;

/// Why a request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionReason {
    /// The student already takes the maximum number of units.
    UnitLimit,
    /// The target class is at capacity.
    ClassFull,
    /// A non-exempt lecture of the target class overlaps the student's timetable.
    ScheduleConflict,
    /// The move would spread class occupations in the unit beyond the tolerance.
    Imbalance,
    /// The student already holds the enrollment the request asks for.
    AlreadyEnrolled,
    /// The unit has no class the student could be placed in.
    NoClassAvailable,
}

/// A validation rejection carrying a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Rejection category.
    pub reason: RejectionReason,
    /// Human-readable description.
    pub message: String,
}

impl Rejection {
    pub(crate) fn new(reason: RejectionReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
        }
    }

    pub(crate) fn unit_limit(max_units: usize) -> Self {
        Self::new(
            RejectionReason::UnitLimit,
            format!("Student is already registered in maximum number of UC's ({max_units})."),
        )
    }

    pub(crate) fn class_full(class_code: &str) -> Self {
        Self::new(
            RejectionReason::ClassFull,
            format!("Can't join class {class_code} because it's full."),
        )
    }

    pub(crate) fn schedule_conflict(class_code: &str) -> Self {
        Self::new(
            RejectionReason::ScheduleConflict,
            format!(
                "Can't join class {class_code} since this class's schedule overlaps with the student's schedule."
            ),
        )
    }

    pub(crate) fn imbalance(class_code: &str) -> Self {
        Self::new(
            RejectionReason::Imbalance,
            format!(
                "Can't switch to class {class_code} because it disturbs the class occupation balance."
            ),
        )
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A malformed history record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("history line {line}: {kind}")]
pub struct RecordError {
    /// 1-based line number (0 when parsing a standalone record).
    pub line: usize,
    /// What was wrong with the record.
    pub kind: RecordErrorKind,
}

/// Categories of history record errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordErrorKind {
    /// The leading tag is not one of `Join`, `Leave`, `SwitchUc`, `SwitchClass`.
    #[error("unknown request type '{0}'")]
    UnknownTag(String),
    /// The record has the wrong number of comma-separated fields.
    #[error("'{tag}' expects {expected} fields, found {found}")]
    FieldCount {
        tag: String,
        expected: usize,
        found: usize,
    },
    /// A field is empty.
    #[error("empty field at position {0}")]
    EmptyField(usize),
}

/// Invalid enrollment policy configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("invalid policy document: {0}")]
    Parse(#[from] toml::de::Error),
    /// A numeric limit is out of range.
    #[error("invalid policy value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum EnrollError {
    /// No student with this code is registered.
    #[error("student '{0}' not found")]
    StudentNotFound(String),

    /// No unit with this code exists.
    #[error("UC '{0}' not found")]
    UnitNotFound(String),

    /// The unit has no class with this code.
    #[error("class '{class}' not found in UC '{unit}'")]
    ClassNotFound { unit: String, class: String },

    /// The student holds no class in the unit.
    #[error("student '{student}' is not enrolled in UC '{unit}'")]
    StudentNotInUnit { student: String, unit: String },

    /// The student is not a member of the named class.
    #[error("student '{student}' is not enrolled in class '{class}' of UC '{unit}'")]
    StudentNotInClass {
        student: String,
        unit: String,
        class: String,
    },

    /// Two stored students share a code.
    #[error("duplicate student '{0}'")]
    DuplicateStudent(String),

    /// A lecture violates its time invariants.
    #[error("invalid lecture: {0}")]
    InvalidLecture(String),

    /// An enrollment rule rejected the request.
    #[error("request rejected: {0}")]
    Rejected(Rejection),

    /// Undo was requested with nothing to undo.
    #[error("no request to undo")]
    EmptyLog,

    /// Policy configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Malformed history record.
    #[error(transparent)]
    Record(#[from] RecordError),

    /// History file access failed.
    #[error("history I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EnrollError {
    /// Returns the rejection if this error is a rule rejection.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }

    /// Whether this error is a rule rejection (as opposed to a lookup miss or I/O failure).
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

impl From<Rejection> for EnrollError {
    fn from(rejection: Rejection) -> Self {
        Self::Rejected(rejection)
    }
}

/// Result type alias for enrollment operations.
pub type Result<T> = std::result::Result<T, EnrollError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_messages() {
        let r = Rejection::unit_limit(7);
        assert_eq!(r.reason, RejectionReason::UnitLimit);
        assert!(r.message.contains("maximum number"));

        let r = Rejection::class_full("1LEIC01");
        assert_eq!(r.to_string(), "Can't join class 1LEIC01 because it's full.");

        let r = Rejection::schedule_conflict("1LEIC02");
        assert!(r.message.contains("overlaps"));

        let r = Rejection::imbalance("1LEIC03");
        assert!(r.message.contains("balance"));
    }

    #[test]
    fn test_rejection_accessors() {
        let err = EnrollError::from(Rejection::class_full("X"));
        assert!(err.is_rejection());
        assert_eq!(err.rejection().unwrap().reason, RejectionReason::ClassFull);

        let err = EnrollError::UnitNotFound("L.EIC999".into());
        assert!(!err.is_rejection());
        assert!(err.rejection().is_none());
        assert_eq!(err.to_string(), "UC 'L.EIC999' not found");
    }

    #[test]
    fn test_record_error_display() {
        let err = RecordError {
            line: 3,
            kind: RecordErrorKind::UnknownTag("Swap".into()),
        };
        assert_eq!(err.to_string(), "history line 3: unknown request type 'Swap'");
    }
}
