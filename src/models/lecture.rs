//! Lecture (weekly time slot) model.
//!
//! A lecture is one recurring weekly meeting of a class: a weekday, a start
//! hour, a duration, and a kind. Hours are fractional (`10.5` = 10:30).
//!
//! # Interval Model
//! A lecture occupies the half-open interval `[start_hour, end_hour)` on its
//! weekday. Two lectures overlap iff they share a weekday and their intervals
//! intersect; back-to-back lectures do not overlap.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EnrollError;

/// Teaching day of the week. Sunday has no lectures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// All teaching days, Monday first.
    pub const ALL: [Weekday; 6] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Day index (Monday = 0 .. Saturday = 5).
    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Day for an index in `0..=5`.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    /// English day name.
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = EnrollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|day| day.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EnrollError::InvalidLecture(format!("unknown weekday '{s}'")))
    }
}

/// Lecture kind.
///
/// Theoretical (`T`) sessions run in large halls and are exempt from
/// student timetable conflict checks under the default policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LectureKind {
    /// Theoretical lecture.
    T,
    /// Theoretical-practical session.
    TP,
    /// Laboratory practice.
    PL,
}

impl LectureKind {
    /// Short code as it appears in timetable data.
    pub fn code(self) -> &'static str {
        match self {
            LectureKind::T => "T",
            LectureKind::TP => "TP",
            LectureKind::PL => "PL",
        }
    }

    /// Whether this is a theoretical lecture.
    #[inline]
    pub fn is_theoretical(self) -> bool {
        self == LectureKind::T
    }
}

impl fmt::Display for LectureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for LectureKind {
    type Err = EnrollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "T" => Ok(LectureKind::T),
            "TP" => Ok(LectureKind::TP),
            "PL" => Ok(LectureKind::PL),
            other => Err(EnrollError::InvalidLecture(format!(
                "unknown lecture kind '{other}'"
            ))),
        }
    }
}

/// A scheduled weekly lecture of one class.
///
/// Immutable once constructed. Ordered by
/// `(start_hour, end_hour, weekday, kind descending, class_code, unit_code)`,
/// which is also the deduplication key inside a [`Schedule`](super::Schedule).
///
/// Deserialization goes through [`Lecture::new`]; a stored `end_hour` is
/// ignored and recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "LectureRecord")]
pub struct Lecture {
    class_code: String,
    unit_code: String,
    weekday: Weekday,
    start_hour: f64,
    duration: f64,
    end_hour: f64,
    kind: LectureKind,
}

impl Lecture {
    /// Creates a lecture.
    ///
    /// Fails if `duration` is not strictly positive or either hour is not finite.
    pub fn new(
        class_code: impl Into<String>,
        unit_code: impl Into<String>,
        weekday: Weekday,
        start_hour: f64,
        duration: f64,
        kind: LectureKind,
    ) -> Result<Self, EnrollError> {
        if !start_hour.is_finite() || !duration.is_finite() {
            return Err(EnrollError::InvalidLecture(format!(
                "non-finite time (start {start_hour}, duration {duration})"
            )));
        }
        if duration <= 0.0 {
            return Err(EnrollError::InvalidLecture(format!(
                "duration must be positive, got {duration}"
            )));
        }
        Ok(Self {
            class_code: class_code.into(),
            unit_code: unit_code.into(),
            weekday,
            start_hour,
            duration,
            end_hour: start_hour + duration,
            kind,
        })
    }

    /// Owning class code.
    pub fn class_code(&self) -> &str {
        &self.class_code
    }

    /// Owning unit code.
    pub fn unit_code(&self) -> &str {
        &self.unit_code
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn start_hour(&self) -> f64 {
        self.start_hour
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// `start_hour + duration`.
    pub fn end_hour(&self) -> f64 {
        self.end_hour
    }

    pub fn kind(&self) -> LectureKind {
        self.kind
    }

    /// Whether `hour` falls within `[start_hour, end_hour)`.
    #[inline]
    pub fn is_occurring(&self, hour: f64) -> bool {
        hour >= self.start_hour && hour < self.end_hour
    }

    /// Whether two lectures happen at the same time on the same weekday.
    pub fn overlaps(&self, other: &Self) -> bool {
        if self.weekday != other.weekday {
            return false;
        }
        !(self.start_hour >= other.end_hour || self.end_hour <= other.start_hour)
    }
}

#[derive(Deserialize)]
struct LectureRecord {
    class_code: String,
    unit_code: String,
    weekday: Weekday,
    start_hour: f64,
    duration: f64,
    kind: LectureKind,
}

impl TryFrom<LectureRecord> for Lecture {
    type Error = EnrollError;

    fn try_from(r: LectureRecord) -> Result<Self, Self::Error> {
        Lecture::new(r.class_code, r.unit_code, r.weekday, r.start_hour, r.duration, r.kind)
    }
}

impl Ord for Lecture {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start_hour
            .total_cmp(&other.start_hour)
            .then_with(|| self.end_hour.total_cmp(&other.end_hour))
            .then_with(|| self.weekday.cmp(&other.weekday))
            // Kind sorts descending by its code.
            .then_with(|| other.kind.code().cmp(self.kind.code()))
            .then_with(|| self.class_code.cmp(&other.class_code))
            .then_with(|| self.unit_code.cmp(&other.unit_code))
    }
}

impl PartialOrd for Lecture {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Lecture {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Lecture {}

impl fmt::Display for Lecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {:.1}-{:.1} ({})",
            self.unit_code, self.class_code, self.weekday, self.start_hour, self.end_hour, self.kind
        )
    }
}
