//! Clipboard events, systems, and Bevy plugin registration.

use std::collections::BTreeMap;

use bevy::prelude::*;

use crate::clipboard::Clipboard;
use crate::fluids::FluidReservoir;
use crate::footprint::{FootprintRegistry, StructureHandle};
use crate::geometry::{Cardinal, CellPos};
use crate::library::BlueprintLibrary;
use crate::materials::{MaterialCatalog, MaterialId};
use crate::outcome_log::{ClipboardLog, ClipboardOutcome};
use crate::paste::{
    paste, preview_paste, AgentAccount, AgentPools, PasteContext, PasteError, PastePreview,
    PasteRequest, PasteSummary,
};
use crate::planner::bill_of_materials;
use crate::resolver::PreviewConfig;
use crate::world::CellGrid;
use crate::{ClipboardSet, SaveableRegistry};

// =============================================================================
// Events
// =============================================================================

/// What to capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureTarget {
    /// Explicit positions around an origin.
    Positions {
        positions: Vec<CellPos>,
        origin: CellPos,
        facing: Cardinal,
    },
    /// A structure known to the `FootprintRegistry`.
    Structure(StructureHandle),
}

/// Capture into the active clipboard slot.
#[derive(Event, Debug, Clone)]
pub struct CaptureStructure {
    pub target: CaptureTarget,
    pub name: Option<String>,
}

/// Paste the active blueprint.
#[derive(Event, Debug, Clone)]
pub struct PasteBlueprint {
    pub request: PasteRequest,
}

/// Estimate a paste of the active blueprint without changing anything.
#[derive(Event, Debug, Clone)]
pub struct PreviewPaste {
    pub request: PasteRequest,
}

/// Fired after the active blueprint was replaced by a capture.
#[derive(Event, Debug, Clone)]
pub struct StructureCaptured {
    pub name: String,
    pub cells: usize,
    pub bill: BTreeMap<MaterialId, u64>,
}

#[derive(Event, Debug, Clone)]
pub struct BlueprintPasted {
    pub summary: PasteSummary,
}

/// Fired when a paste placed nothing.
#[derive(Event, Debug, Clone)]
pub struct PasteRejected {
    pub request: PasteRequest,
    pub error: PasteError,
}

#[derive(Event, Debug, Clone)]
pub struct PastePreviewed {
    pub request: PasteRequest,
    pub result: Result<PastePreview, PasteError>,
}

// =============================================================================
// Systems
// =============================================================================

fn handle_capture(
    mut events: EventReader<CaptureStructure>,
    mut clipboard: ResMut<Clipboard>,
    grid: Res<CellGrid>,
    footprints: Res<FootprintRegistry>,
    catalog: Res<MaterialCatalog>,
    mut captured: EventWriter<StructureCaptured>,
    mut log: ResMut<ClipboardLog>,
) {
    for ev in events.read() {
        let result = match &ev.target {
            CaptureTarget::Positions {
                positions,
                origin,
                facing,
            } => clipboard
                .capture_into(positions.iter().copied(), *origin, *facing, &*grid)
                .map(|bp| bp.cell_count()),
            CaptureTarget::Structure(handle) => clipboard
                .capture_structure_into(&*footprints, *handle, &*grid)
                .map(|bp| bp.cell_count()),
        };
        match result {
            Ok(cells) => {
                if let Some(name) = &ev.name {
                    clipboard.rename(name.clone());
                }
                let (name, bill) = clipboard
                    .get_active()
                    .map(|bp| (bp.name.clone(), bill_of_materials(bp, &*catalog)))
                    .unwrap_or_default();
                info!(
                    "Captured '{}' ({} cells, {} materials) into the clipboard",
                    name,
                    cells,
                    bill.values().sum::<u64>()
                );
                log.push(ClipboardOutcome::Captured {
                    name: name.clone(),
                    cells,
                    bill: bill.clone(),
                });
                captured.send(StructureCaptured { name, cells, bill });
            }
            Err(e) => {
                warn!("Capture failed: {}", e);
                log.push(ClipboardOutcome::CaptureFailed(e));
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_paste(
    mut events: EventReader<PasteBlueprint>,
    clipboard: Res<Clipboard>,
    mut grid: ResMut<CellGrid>,
    catalog: Res<MaterialCatalog>,
    mut fluids: ResMut<FluidReservoir>,
    mut pools: ResMut<AgentPools>,
    mut pasted: EventWriter<BlueprintPasted>,
    mut rejected: EventWriter<PasteRejected>,
    mut log: ResMut<ClipboardLog>,
) {
    for ev in events.read() {
        let request = &ev.request;
        let result = match clipboard.get_active() {
            None => Err(PasteError::NoActiveBlueprint),
            Some(blueprint) => paste(
                request,
                blueprint,
                PasteContext {
                    world: &mut *grid,
                    materials: &*catalog,
                    fluids: &mut *fluids,
                    account: pools.account_mut(&request.agent),
                },
            ),
        };
        match result {
            Ok(summary) => {
                info!(
                    "Paste by {}: {} ({} materials spent)",
                    summary.agent,
                    summary,
                    summary.materials_spent.values().sum::<u64>()
                );
                log.push(ClipboardOutcome::Pasted(summary.clone()));
                pasted.send(BlueprintPasted { summary });
            }
            Err(error) => {
                warn!(
                    "Paste by {} at {} rejected: {}",
                    request.agent, request.anchor, error
                );
                log.push(ClipboardOutcome::Rejected(error.clone()));
                rejected.send(PasteRejected {
                    request: request.clone(),
                    error,
                });
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_preview(
    mut events: EventReader<PreviewPaste>,
    clipboard: Res<Clipboard>,
    grid: Res<CellGrid>,
    catalog: Res<MaterialCatalog>,
    pools: Res<AgentPools>,
    config: Res<PreviewConfig>,
    mut previewed: EventWriter<PastePreviewed>,
    mut log: ResMut<ClipboardLog>,
) {
    let no_account = AgentAccount::default();
    for ev in events.read() {
        let request = &ev.request;
        let account = pools.account(&request.agent).unwrap_or(&no_account);
        let result = match clipboard.get_active() {
            None => Err(PasteError::NoActiveBlueprint),
            Some(blueprint) => {
                preview_paste(request, blueprint, &*grid, &*catalog, account, &*config)
            }
        };
        match &result {
            Ok(preview) => log.push(ClipboardOutcome::Previewed(preview.clone())),
            Err(e) => log.push(ClipboardOutcome::Rejected(e.clone())),
        }
        previewed.send(PastePreviewed {
            request: request.clone(),
            result,
        });
    }
}

// =============================================================================
// Plugin
// =============================================================================

pub struct ClipboardPlugin;

impl Plugin for ClipboardPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Clipboard>()
            .init_resource::<BlueprintLibrary>()
            .init_resource::<CellGrid>()
            .init_resource::<MaterialCatalog>()
            .init_resource::<AgentPools>()
            .init_resource::<FluidReservoir>()
            .init_resource::<FootprintRegistry>()
            .init_resource::<PreviewConfig>()
            .init_resource::<ClipboardLog>()
            .init_resource::<SaveableRegistry>()
            .add_event::<CaptureStructure>()
            .add_event::<PasteBlueprint>()
            .add_event::<PreviewPaste>()
            .add_event::<StructureCaptured>()
            .add_event::<BlueprintPasted>()
            .add_event::<PasteRejected>()
            .add_event::<PastePreviewed>()
            .configure_sets(Update, (ClipboardSet::Capture, ClipboardSet::Paste).chain())
            .add_systems(Update, handle_capture.in_set(ClipboardSet::Capture))
            .add_systems(
                Update,
                (handle_preview, handle_paste)
                    .chain()
                    .in_set(ClipboardSet::Paste),
            );

        let mut registry = app.world_mut().resource_mut::<SaveableRegistry>();
        registry.register::<Clipboard>();
        registry.register::<BlueprintLibrary>();
    }
}
