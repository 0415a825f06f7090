//! Enrollment session: a registry paired with its request log.
//!
//! # Lifecycle
//! 1. Build the baseline [`Registry`] from the initial data set.
//! 2. [`EnrollmentSession::restore`] (or [`replay`](EnrollmentSession::replay))
//!    re-applies the persisted history, oldest first.
//! 3. Callers [`submit`](EnrollmentSession::submit) requests and
//!    [`undo`](EnrollmentSession::undo) the most recent one.
//! 4. [`EnrollmentSession::save`] persists the history.

use std::collections::VecDeque;
use std::path::Path;

use tracing::{info, warn};

use super::{load_history_file, save_history_file, RequestLog};
use crate::error::{EnrollError, Result};
use crate::models::Request;
use crate::registry::Registry;

/// Outcome of replaying a history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Requests re-applied successfully.
    pub applied: usize,
    /// Requests accepted without changing anything; not re-logged.
    pub unchanged: usize,
    /// Requests that no longer pass assessment, with their errors.
    pub skipped: Vec<(Request, String)>,
}

/// A registry plus the log of requests applied to it.
#[derive(Debug, Clone)]
pub struct EnrollmentSession {
    registry: Registry,
    log: RequestLog,
}

impl EnrollmentSession {
    /// Starts a session over a freshly loaded registry.
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            log: RequestLog::new(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn log(&self) -> &RequestLog {
        &self.log
    }

    /// Assesses a request and records it if it changed the registry.
    ///
    /// Returns the acceptance description. An accepted no-op is not
    /// recorded, so it can never be undone into an enrollment the student
    /// never had.
    pub fn submit(&mut self, request: Request) -> Result<String> {
        let changed = self.registry.assess_request(&request)?;
        let description = request.describe();
        if changed {
            self.log.record(request);
        }
        Ok(description)
    }

    /// Reverses the most recent undoable request.
    ///
    /// The inverse goes through the same checks as any request. If it is
    /// rejected the original entry is put back, so a failed undo loses
    /// nothing.
    pub fn undo(&mut self) -> Result<String> {
        let original = self.log.pop().ok_or(EnrollError::EmptyLog)?;
        let inverse = original.inverse();
        match self.registry.assess_request(&inverse) {
            Ok(changed) => {
                let description = inverse.describe();
                if changed {
                    self.log.record(inverse);
                }
                Ok(description)
            }
            Err(err) => {
                warn!(request = %original, error = %err, "undo failed, keeping log entry");
                self.log.restore(original);
                Err(err)
            }
        }
    }

    /// Re-applies historical requests, oldest first.
    ///
    /// Entries that no longer pass assessment are skipped and reported.
    pub fn replay(&mut self, mut queue: VecDeque<Request>) -> ReplaySummary {
        let mut summary = ReplaySummary::default();
        while let Some(request) = queue.pop_front() {
            match self.registry.assess_request(&request) {
                Ok(true) => {
                    self.log.record(request);
                    summary.applied += 1;
                }
                Ok(false) => summary.unchanged += 1,
                Err(err) => {
                    warn!(request = %request, error = %err, "skipping history entry");
                    summary.skipped.push((request, err.to_string()));
                }
            }
        }
        info!(
            applied = summary.applied,
            unchanged = summary.unchanged,
            skipped = summary.skipped.len(),
            "history replayed"
        );
        summary
    }

    /// Loads and replays a history file. A missing file replays nothing.
    pub fn restore(&mut self, path: impl AsRef<Path>) -> Result<ReplaySummary> {
        let queue = load_history_file(path)?;
        Ok(self.replay(queue))
    }

    /// Persists the history, oldest first.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_history_file(path, &self.log)
    }

    /// Ends the session, returning the registry and log.
    pub fn into_parts(self) -> (Registry, RequestLog) {
        (self.registry, self.log)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::config::EnrollmentPolicy;
    use crate::error::RejectionReason;
    use crate::models::{LectureKind, Weekday};
    use crate::registry::fixtures::{fill_class, small_registry};
    use crate::validation::validate_registry;

    fn fingerprint(registry: &Registry) -> String {
        serde_json::to_string(registry).unwrap()
    }

    #[test]
    fn test_submit_records_and_describes() {
        let mut session = EnrollmentSession::new(small_registry());
        let text = session.submit(Request::switch_class("S1", "U1", "1A", "1B")).unwrap();
        assert_eq!(text, "Student S1 switched from class 1A to class 1B in UC U1");
        assert_eq!(session.log().depth(), 1);
    }

    #[test]
    fn test_rejected_submit_not_recorded() {
        let mut session = EnrollmentSession::new(small_registry());
        let err = session.submit(Request::join("S1", "U2")).unwrap_err();
        assert!(err.is_rejection());
        assert_eq!(session.log().depth(), 0);
        assert!(session.log().history().is_empty());
    }

    #[test]
    fn test_join_then_undo_restores_state() {
        let mut registry = small_registry();
        registry.add_student("S2", "Rui", "U2", "1C").unwrap();
        let baseline = fingerprint(&registry);
        let mut session = EnrollmentSession::new(registry);

        session.submit(Request::join("S2", "U1")).unwrap();
        assert_ne!(fingerprint(session.registry()), baseline);

        let text = session.undo().unwrap();
        assert_eq!(text, "Student S2 left UC U1");
        assert_eq!(fingerprint(session.registry()), baseline);
        assert_eq!(session.log().depth(), 0);

        let history: Vec<String> = session.log().history().iter().map(ToString::to_string).collect();
        assert_eq!(history, vec!["Join,S2,U1", "Leave,S2,U1"]);
    }

    #[test]
    fn test_noop_leave_not_undoable() {
        let mut registry = small_registry();
        registry.add_student("S2", "Rui", "U2", "1C").unwrap();
        let baseline = fingerprint(&registry);
        let mut session = EnrollmentSession::new(registry);

        let text = session.submit(Request::leave("S2", "U1")).unwrap();
        assert_eq!(text, "Student S2 left UC U1");
        assert_eq!(session.log().depth(), 0);
        assert!(session.log().history().is_empty());

        assert!(matches!(session.undo(), Err(EnrollError::EmptyLog)));
        assert_eq!(fingerprint(session.registry()), baseline);
        assert!(!session.registry().find_student("S2").unwrap().attends_unit("U1"));
    }

    #[test]
    fn test_undo_is_not_undoable() {
        let mut session = EnrollmentSession::new(small_registry());
        session.submit(Request::switch_class("S1", "U1", "1A", "1B")).unwrap();
        session.undo().unwrap();
        assert!(matches!(session.undo(), Err(EnrollError::EmptyLog)));
    }

    #[test]
    fn test_failed_undo_keeps_entry() {
        let policy = EnrollmentPolicy::default().with_class_capacity(2);
        let mut registry = Registry::with_policy("LEIC", policy);
        registry.add_unit("U");
        registry.add_class("1A", "U").unwrap();
        registry.add_class("1B", "U").unwrap();
        registry
            .add_lecture("1A", "U", LectureKind::PL, Weekday::Monday, 9.0, 1.0)
            .unwrap();
        fill_class(&mut registry, "U", "1A", "A", 2);
        let mut session = EnrollmentSession::new(registry);

        session.submit(Request::switch_class("A000", "U", "1A", "1B")).unwrap();
        // The freed seat in 1A is taken before the undo.
        session.registry.add_student("Z", "Zoe", "U", "1A").unwrap();

        let depth = session.log().depth();
        let top = session.log().peek().cloned();
        let err = session.undo().unwrap_err();
        assert_eq!(err.rejection().unwrap().reason, RejectionReason::ClassFull);
        assert_eq!(session.log().depth(), depth);
        assert_eq!(session.log().peek().cloned(), top);
        assert!(session.registry().find_class("1B", "U").unwrap().has_student("A000"));
    }

    #[test]
    fn test_replay_rebuilds_state() {
        let mut live = EnrollmentSession::new(small_registry());
        live.submit(Request::switch_class("S1", "U1", "1A", "1B")).unwrap();
        live.submit(Request::join("S1", "U2")).unwrap();
        live.undo().unwrap();
        let queue: VecDeque<Request> = live.log().history().iter().cloned().collect();

        let mut replayed = EnrollmentSession::new(small_registry());
        let summary = replayed.replay(queue);
        assert_eq!(summary.applied, 3);
        assert!(summary.skipped.is_empty());
        assert_eq!(fingerprint(replayed.registry()), fingerprint(live.registry()));
    }

    #[test]
    fn test_replay_skips_stale_entries() {
        let mut session = EnrollmentSession::new(small_registry());
        let queue: VecDeque<Request> = vec![
            Request::join("GHOST", "U1"),
            Request::switch_class("S1", "U1", "1A", "1B"),
        ]
        .into();
        let summary = session.replay(queue);
        assert_eq!(summary.applied, 1);
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(session.log().depth(), 1);
    }

    #[test]
    fn test_replay_counts_noop_entries() {
        let mut session = EnrollmentSession::new(small_registry());
        let queue: VecDeque<Request> = vec![Request::leave("S1", "U2"), Request::leave("S1", "U1")].into();
        let summary = session.replay(queue);
        assert_eq!(summary.applied, 1);
        assert_eq!(summary.unchanged, 1);
        assert_eq!(session.log().history(), &[Request::leave("S1", "U1")]);
    }

    fn random_request(rng: &mut StdRng) -> Request {
        let students = ["S1", "S2", "S3", "S4"];
        let units = ["U1", "U2", "U3"];
        let classes = ["1A", "1B", "1C"];
        let student = students[rng.random_range(0..students.len())];
        let unit = units[rng.random_range(0..units.len())];
        match rng.random_range(0..4) {
            0 => Request::join(student, unit),
            1 => Request::leave(student, unit),
            2 => Request::switch_unit(student, unit, units[rng.random_range(0..units.len())]),
            _ => Request::switch_class(
                student,
                unit,
                classes[rng.random_range(0..classes.len())],
                classes[rng.random_range(0..classes.len())],
            ),
        }
    }

    fn random_baseline() -> Registry {
        let mut r = small_registry();
        r.add_unit("U3");
        r.add_class("1A", "U3").unwrap();
        r.add_class("1B", "U3").unwrap();
        r.add_lecture("1A", "U3", LectureKind::TP, Weekday::Friday, 9.0, 2.0).unwrap();
        r.add_lecture("1B", "U3", LectureKind::PL, Weekday::Monday, 9.5, 1.0).unwrap();
        r.add_student("S2", "Rui", "U2", "1C").unwrap();
        r.add_student("S3", "Eva", "U3", "1B").unwrap();
        r.add_student("S4", "Leo", "U1", "1B").unwrap();
        r
    }

    #[test]
    fn test_random_streams_replay_deterministically() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..20 {
            let mut live = EnrollmentSession::new(random_baseline());
            for _ in 0..40 {
                if rng.random_bool(0.2) {
                    let _ = live.undo();
                } else {
                    let _ = live.submit(random_request(&mut rng));
                }
                assert!(validate_registry(live.registry()).is_ok());
            }
            let history: VecDeque<Request> = live.log().history().iter().cloned().collect();

            let mut first = EnrollmentSession::new(random_baseline());
            let mut second = EnrollmentSession::new(random_baseline());
            first.replay(history.clone());
            second.replay(history);
            assert_eq!(fingerprint(first.registry()), fingerprint(second.registry()));
            assert_eq!(fingerprint(first.registry()), fingerprint(live.registry()));
        }
    }
}
