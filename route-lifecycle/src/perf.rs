//! Best-effort navigation timing
//!
//! Everything here is optional. When no timing API is configured, or the
//! start mark of the current navigation cannot be found, the calls report
//! `false` and do nothing else.

use crate::Route;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

/// Suffix of the mark recorded when a navigation starts.
pub const START_MARK_SUFFIX: &str = ":start";

/// Kind of timing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Point in time
    Mark,
    /// Span between a mark and now
    Measure,
}

/// A recorded mark or measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerfEntry {
    /// Entry name
    pub name: String,
    /// Mark or measure
    pub kind: EntryKind,
    /// Milliseconds since the timing origin
    pub start_time: f64,
    /// Milliseconds; zero for marks
    pub duration: f64,
}

/// A performance timeline (marks and measures).
pub trait Timing: Send + Sync {
    /// Record a mark named `name`.
    fn mark(&self, name: &str);

    /// Record a measure from the latest mark named `start_mark` until now.
    /// Returns `false` if no such mark exists.
    fn measure(&self, name: &str, start_mark: &str) -> bool;

    /// All entries of one kind, in recording order.
    fn entries_by_type(&self, kind: EntryKind) -> Vec<PerfEntry>;

    /// Remove marks named `name`.
    fn clear_marks(&self, name: &str);

    /// Remove measures named `name`.
    fn clear_measures(&self, name: &str);
}

/// Timeline backed by a monotonic clock.
#[derive(Debug)]
pub struct InstantTiming {
    origin: Instant,
    entries: Mutex<Vec<PerfEntry>>,
}

impl Default for InstantTiming {
    fn default() -> Self {
        Self::new()
    }
}

impl InstantTiming {
    /// Start a timeline whose origin is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            entries: Mutex::new(Vec::new()),
        }
    }

    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    fn clear(&self, kind: EntryKind, name: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|e| !(e.kind == kind && e.name == name));
    }
}

impl Timing for InstantTiming {
    fn mark(&self, name: &str) {
        let start_time = self.now();
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(PerfEntry {
                name: name.to_string(),
                kind: EntryKind::Mark,
                start_time,
                duration: 0.0,
            });
    }

    fn measure(&self, name: &str, start_mark: &str) -> bool {
        let now = self.now();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(start) = entries
            .iter()
            .rev()
            .find(|e| e.kind == EntryKind::Mark && e.name == start_mark)
            .map(|e| e.start_time)
        else {
            return false;
        };
        entries.push(PerfEntry {
            name: name.to_string(),
            kind: EntryKind::Measure,
            start_time: start,
            duration: now - start,
        });
        true
    }

    fn entries_by_type(&self, kind: EntryKind) -> Vec<PerfEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect()
    }

    fn clear_marks(&self, name: &str) {
        self.clear(EntryKind::Mark, name);
    }

    fn clear_measures(&self, name: &str) {
        self.clear(EntryKind::Measure, name);
    }
}

/// Records the marks and measures of client navigations.
#[derive(Clone)]
pub struct PerfTracker {
    timing: Option<Arc<dyn Timing>>,
    prefix: String,
}

impl PerfTracker {
    /// Track on `timing` (or nowhere), naming entries with `prefix`.
    pub fn new(timing: Option<Arc<dyn Timing>>, prefix: impl Into<String>) -> Self {
        Self {
            timing,
            prefix: prefix.into(),
        }
    }

    /// A tracker that records nothing.
    pub fn disabled() -> Self {
        Self::new(None, "")
    }

    /// True if a timing API is configured.
    pub fn is_enabled(&self) -> bool {
        self.timing.is_some()
    }

    /// Clear earlier entries carrying the prefix and mark the start of the
    /// `from` → `to` navigation.
    pub fn start_navigation(&self, from: &Route, to: &Route) -> bool {
        let Some(timing) = &self.timing else {
            return false;
        };
        for entry in timing.entries_by_type(EntryKind::Mark) {
            if entry.name.starts_with(&self.prefix) {
                timing.clear_marks(&entry.name);
            }
        }
        for entry in timing.entries_by_type(EntryKind::Measure) {
            if entry.name.starts_with(&self.prefix) {
                timing.clear_measures(&entry.name);
            }
        }
        timing.mark(&format!(
            "{}{}->{}{}",
            self.prefix,
            from.label(),
            to.label(),
            START_MARK_SUFFIX
        ));
        true
    }

    /// Measure from the latest start mark to now as `"<transition>:<label>"`.
    pub fn measure(&self, label: &str) -> bool {
        let Some(timing) = &self.timing else {
            return false;
        };
        let Some(start) = timing
            .entries_by_type(EntryKind::Mark)
            .into_iter()
            .filter(|e| e.name.starts_with(&self.prefix) && e.name.ends_with(START_MARK_SUFFIX))
            .max_by(|a, b| a.start_time.total_cmp(&b.start_time))
        else {
            return false;
        };
        let transition = &start.name[..start.name.len() - START_MARK_SUFFIX.len()];
        timing.measure(&format!("{transition}:{label}"), &start.name)
    }
}

impl std::fmt::Debug for PerfTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerfTracker")
            .field("enabled", &self.is_enabled())
            .field("prefix", &self.prefix)
            .finish()
    }
}
