//! Ring-buffer log of recently handled clipboard requests.
//!
//! Systems push one entry per request so tests and tooling can inspect what
//! happened without listening to every event type.

use std::collections::BTreeMap;

use bevy::prelude::*;

use crate::capture::CaptureError;
use crate::config::LOG_CAPACITY;
use crate::materials::MaterialId;
use crate::paste::{PasteError, PastePreview, PasteSummary};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardOutcome {
    Captured {
        name: String,
        cells: usize,
        /// Materials a full paste of the capture would consume.
        bill: BTreeMap<MaterialId, u64>,
    },
    CaptureFailed(CaptureError),
    Pasted(PasteSummary),
    Rejected(PasteError),
    Previewed(PastePreview),
}

#[derive(Resource, Debug, Clone, Default)]
pub struct ClipboardLog {
    entries: Vec<ClipboardOutcome>,
}

impl ClipboardLog {
    /// Record an outcome, evicting the oldest entry when full.
    pub fn push(&mut self, outcome: ClipboardOutcome) {
        if self.entries.len() >= LOG_CAPACITY {
            self.entries.remove(0);
        }
        self.entries.push(outcome);
    }

    pub fn last(&self) -> Option<&ClipboardOutcome> {
        self.entries.last()
    }

    /// The last `n` entries (or fewer if the log is shorter).
    pub fn last_n(&self, n: usize) -> &[ClipboardOutcome] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_last_n() {
        let mut log = ClipboardLog::default();
        log.push(ClipboardOutcome::CaptureFailed(CaptureError::EmptyArea));
        log.push(ClipboardOutcome::Rejected(PasteError::NoActiveBlueprint));
        assert_eq!(
            log.last(),
            Some(&ClipboardOutcome::Rejected(PasteError::NoActiveBlueprint))
        );
        assert_eq!(log.last_n(10).len(), 2);
    }

    #[test]
    fn evicts_oldest_when_full() {
        let mut log = ClipboardLog::default();
        for i in 0..LOG_CAPACITY + 6 {
            log.push(ClipboardOutcome::Captured {
                name: format!("bp{i}"),
                cells: i,
                bill: BTreeMap::new(),
            });
        }
        assert_eq!(log.len(), LOG_CAPACITY);
        assert_eq!(
            log.last_n(LOG_CAPACITY)[0],
            ClipboardOutcome::Captured {
                name: "bp6".into(),
                cells: 6,
                bill: BTreeMap::new(),
            }
        );
        log.clear();
        assert!(log.is_empty());
    }
}
