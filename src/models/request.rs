//! Enrollment request model.
//!
//! A request is a student-initiated change to their enrollment. Requests
//! are created by the caller, assessed by the
//! [`Registry`](crate::registry::Registry), and, once accepted, owned by the
//! [`RequestLog`](crate::journal::RequestLog).
//!
//! `Display` writes the one-line history record
//! (`SwitchClass,<student>,<unit>,<from>,<to>`); the journal parses it back.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The operation a request asks for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
    /// Enroll in a unit; the class is chosen by the registry.
    Join { unit: String },
    /// Leave a unit entirely.
    Leave { unit: String },
    /// Replace one unit with another.
    SwitchUnit { from: String, to: String },
    /// Move to another class within the same unit.
    SwitchClass {
        unit: String,
        from: String,
        to: String,
    },
}

/// A student enrollment request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Request {
    student_code: String,
    kind: RequestKind,
    undo: bool,
}

impl Request {
    pub fn new(student_code: impl Into<String>, kind: RequestKind) -> Self {
        Self {
            student_code: student_code.into(),
            kind,
            undo: false,
        }
    }

    /// Join `unit`.
    pub fn join(student_code: impl Into<String>, unit: impl Into<String>) -> Self {
        Self::new(student_code, RequestKind::Join { unit: unit.into() })
    }

    /// Leave `unit`.
    pub fn leave(student_code: impl Into<String>, unit: impl Into<String>) -> Self {
        Self::new(student_code, RequestKind::Leave { unit: unit.into() })
    }

    /// Switch from unit `from` to unit `to`.
    pub fn switch_unit(
        student_code: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self::new(
            student_code,
            RequestKind::SwitchUnit {
                from: from.into(),
                to: to.into(),
            },
        )
    }

    /// Switch from class `from` to class `to` within `unit`.
    pub fn switch_class(
        student_code: impl Into<String>,
        unit: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self::new(
            student_code,
            RequestKind::SwitchClass {
                unit: unit.into(),
                from: from.into(),
                to: to.into(),
            },
        )
    }

    pub fn student_code(&self) -> &str {
        &self.student_code
    }

    pub fn kind(&self) -> &RequestKind {
        &self.kind
    }

    /// Whether this request reverses an earlier one.
    pub fn is_undo(&self) -> bool {
        self.undo
    }

    /// Marks this request as an undo.
    pub fn into_undo(mut self) -> Self {
        self.undo = true;
        self
    }

    /// The structural inverse, flagged as an undo.
    ///
    /// Join ↔ Leave on the same unit; switches swap their endpoints.
    pub fn inverse(&self) -> Self {
        let kind = match &self.kind {
            RequestKind::Join { unit } => RequestKind::Leave { unit: unit.clone() },
            RequestKind::Leave { unit } => RequestKind::Join { unit: unit.clone() },
            RequestKind::SwitchUnit { from, to } => RequestKind::SwitchUnit {
                from: to.clone(),
                to: from.clone(),
            },
            RequestKind::SwitchClass { unit, from, to } => RequestKind::SwitchClass {
                unit: unit.clone(),
                from: to.clone(),
                to: from.clone(),
            },
        };
        Self::new(self.student_code.clone(), kind).into_undo()
    }

    /// Human-readable summary of the accepted change.
    pub fn describe(&self) -> String {
        let student = &self.student_code;
        match &self.kind {
            RequestKind::Join { unit } => format!("Student {student} joined UC {unit}"),
            RequestKind::Leave { unit } => format!("Student {student} left UC {unit}"),
            RequestKind::SwitchUnit { from, to } => {
                format!("Student {student} switched from UC {from} to UC {to}")
            }
            RequestKind::SwitchClass { unit, from, to } => {
                format!("Student {student} switched from class {from} to class {to} in UC {unit}")
            }
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let student = self.student_code();
        match self.kind() {
            RequestKind::Join { unit } => write!(f, "Join,{student},{unit}"),
            RequestKind::Leave { unit } => write!(f, "Leave,{student},{unit}"),
            RequestKind::SwitchUnit { from, to } => write!(f, "SwitchUc,{student},{from},{to}"),
            RequestKind::SwitchClass { unit, from, to } => {
                write!(f, "SwitchClass,{student},{unit},{from},{to}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_join_leave() {
        let join = Request::join("1", "L.EIC001");
        let inv = join.inverse();
        assert!(inv.is_undo());
        assert_eq!(inv.kind(), &RequestKind::Leave { unit: "L.EIC001".into() });
        assert_eq!(inv.student_code(), "1");

        let back = inv.inverse();
        assert_eq!(back.kind(), join.kind());
    }

    #[test]
    fn test_inverse_switches_swap_endpoints() {
        let r = Request::switch_unit("1", "A", "B").inverse();
        assert_eq!(r.kind(), &RequestKind::SwitchUnit { from: "B".into(), to: "A".into() });

        let r = Request::switch_class("1", "U", "C1", "C2").inverse();
        assert_eq!(
            r.kind(),
            &RequestKind::SwitchClass {
                unit: "U".into(),
                from: "C2".into(),
                to: "C1".into()
            }
        );
    }

    #[test]
    fn test_describe() {
        assert_eq!(Request::join("7", "U1").describe(), "Student 7 joined UC U1");
        assert_eq!(
            Request::switch_class("7", "U1", "C1", "C2").describe(),
            "Student 7 switched from class C1 to class C2 in UC U1"
        );
    }

    #[test]
    fn test_format_each_kind() {
        assert_eq!(Request::join("1", "U1").to_string(), "Join,1,U1");
        assert_eq!(Request::leave("1", "U1").to_string(), "Leave,1,U1");
        assert_eq!(Request::switch_unit("1", "U1", "U2").to_string(), "SwitchUc,1,U1,U2");
        assert_eq!(
            Request::switch_class("1", "U1", "1A", "1B").to_string(),
            "SwitchClass,1,U1,1A,1B"
        );
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(Request::leave("7", "U1")).unwrap();
        assert_eq!(json["student_code"], "7");
        assert_eq!(json["kind"]["Leave"]["unit"], "U1");
        assert_eq!(json["undo"], false);
    }
}
