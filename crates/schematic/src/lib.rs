//! Structure clipboard: capture a cluster of cells into a relocatable
//! blueprint, then paste it elsewhere with any quarter-turn rotation as an
//! all-or-nothing resource transaction.
//!
//! The pipeline is `capture` → `plan` → `resolve` → `commit`, with the
//! `paste` module tying the last three together and `ClipboardPlugin`
//! exposing everything to a Bevy app through events.

use bevy::prelude::*;

pub mod agent;
pub mod aux_record;
pub mod blueprint;
pub mod capture;
pub mod cell;
pub mod clipboard;
pub mod codec;
pub mod commit;
pub mod config;
pub mod fluids;
pub mod footprint;
pub mod geometry;
pub mod library;
pub mod materials;
pub mod outcome_log;
pub mod paste;
pub mod placement;
pub mod planner;
pub mod plugin;
pub mod pools;
pub mod resolver;
pub mod rotation;
pub mod sanitize;
pub mod saveable;
pub mod world;

#[cfg(test)]
pub mod test_harness;

pub use agent::{AgentId, CostMode};
pub use aux_record::AuxRecord;
pub use blueprint::{Blueprint, FatalInvariantViolation};
pub use capture::{capture, capture_footprint, CaptureError};
pub use cell::{BlockId, CellKind, CellState, FluidId, Orientation};
pub use clipboard::Clipboard;
pub use commit::{commit, CommitWarning, PlacementReport};
pub use geometry::{Axis, Cardinal, CellPos, Direction};
pub use library::BlueprintLibrary;
pub use paste::{paste, PasteError, PasteRequest, PasteSummary, RotationRequest};
pub use planner::{plan, Plan, PlanOutcome};
pub use plugin::ClipboardPlugin;
pub use resolver::{preview, resolve, CommitTicket, ResolveError, ShortfallReport};
pub use sanitize::sanitize;
pub use saveable::{LoadReport, Saveable, SaveableRegistry};

/// Ordering of the clipboard systems within `Update`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClipboardSet {
    /// Captures land first so a paste in the same frame sees them.
    Capture,
    Paste,
}
