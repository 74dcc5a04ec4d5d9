//! Build a `Blueprint` from a set of occupied world positions.

use std::fmt;

use bevy::log::debug;

use crate::blueprint::{Blueprint, UNNAMED_BLUEPRINT};
use crate::footprint::{FootprintProvider, StructureHandle};
use crate::geometry::{Cardinal, CellPos};
use crate::sanitize::sanitize;
use crate::world::WorldAccess;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// Every position was void.
    EmptyArea,
    /// The footprint provider does not know the structure.
    UnknownStructure(StructureHandle),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::EmptyArea => write!(f, "nothing to capture: all positions are empty"),
            CaptureError::UnknownStructure(h) => write!(f, "unknown structure {}", h.0),
        }
    }
}

impl std::error::Error for CaptureError {}

/// Snapshot the cells at `positions` relative to `origin`.
///
/// Void positions are skipped. Auxiliary documents are sanitized according to
/// each cell's kind; a record that sanitizes to nothing is not stored. Does
/// not touch the world.
pub fn capture<W, I>(
    positions: I,
    origin: CellPos,
    origin_orientation: Cardinal,
    world: &W,
) -> Result<Blueprint, CaptureError>
where
    W: WorldAccess + ?Sized,
    I: IntoIterator<Item = CellPos>,
{
    let mut blueprint = Blueprint::new(UNNAMED_BLUEPRINT, origin_orientation);
    for pos in positions {
        let Some(state) = world.state(pos) else {
            continue;
        };
        let Some(key) = pos.checked_sub(origin) else {
            debug!("capture: {} is too far from origin {}, skipped", pos, origin);
            continue;
        };
        if let Some(raw) = world.aux(pos) {
            let clean = sanitize(&raw, &state.kind);
            if !clean.is_empty() {
                blueprint.auxiliary.insert(key, clean);
            }
        }
        blueprint.cells.insert(key, state);
    }
    if blueprint.is_empty() {
        return Err(CaptureError::EmptyArea);
    }
    debug!(
        "capture: {} cells, {} aux records, origin {}",
        blueprint.cell_count(),
        blueprint.auxiliary.len(),
        origin
    );
    Ok(blueprint)
}

/// Capture a structure known to `provider`, using its origin, facing and
/// source kind.
pub fn capture_footprint<P, W>(
    provider: &P,
    handle: StructureHandle,
    world: &W,
) -> Result<Blueprint, CaptureError>
where
    P: FootprintProvider + ?Sized,
    W: WorldAccess + ?Sized,
{
    let footprint = provider
        .footprint(handle)
        .ok_or(CaptureError::UnknownStructure(handle))?;
    let blueprint = capture(
        footprint.positions.iter().copied(),
        footprint.origin,
        footprint.facing,
        world,
    )?;
    Ok(blueprint.with_source_kind(footprint.source_kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aux_record::AuxRecord;
    use crate::cell::{CellKind, CellState};
    use crate::footprint::{Footprint, FootprintRegistry};
    use crate::world::CellGrid;
    use serde_json::json;

    fn grid_with_pair() -> CellGrid {
        let mut grid = CellGrid::default();
        grid.place(CellPos::new(5, 1, 5), CellState::plain("stone"));
        grid.place(CellPos::new(6, 1, 5), CellState::plain("stone"));
        grid
    }

    #[test]
    fn test_capture_relativizes_positions() {
        let grid = grid_with_pair();
        let positions = [CellPos::new(5, 1, 5), CellPos::new(6, 1, 5)];
        let bp = capture(positions, CellPos::new(5, 1, 5), Cardinal::South, &grid).unwrap();
        let keys: Vec<_> = bp.cells.keys().copied().collect();
        assert_eq!(keys, vec![CellPos::new(0, 0, 0), CellPos::new(1, 0, 0)]);
        assert_eq!(bp.origin_orientation, Cardinal::South);
        assert_eq!(bp.name, UNNAMED_BLUEPRINT);
    }

    #[test]
    fn test_capture_skips_void() {
        let grid = grid_with_pair();
        let positions = [
            CellPos::new(5, 1, 5),
            CellPos::new(5, 2, 5),
            CellPos::new(6, 1, 5),
        ];
        let bp = capture(positions, CellPos::new(5, 1, 5), Cardinal::North, &grid).unwrap();
        assert_eq!(bp.cell_count(), 2);
    }

    #[test]
    fn test_capture_all_void_is_empty_area() {
        let grid = CellGrid::default();
        let err = capture(
            [CellPos::new(0, 0, 0)],
            CellPos::ORIGIN,
            Cardinal::North,
            &grid,
        )
        .unwrap_err();
        assert_eq!(err, CaptureError::EmptyArea);
    }

    #[test]
    fn test_capture_skips_positions_too_far_from_origin() {
        let mut grid = CellGrid::new(crate::world::GridBounds::new(
            CellPos::new(i32::MIN, i32::MIN, i32::MIN),
            CellPos::new(i32::MAX, i32::MAX, i32::MAX),
        ));
        grid.place(CellPos::new(i32::MAX, 0, 0), CellState::plain("stone"));
        grid.place(CellPos::new(0, 0, 0), CellState::plain("stone"));
        let bp = capture(
            [CellPos::new(i32::MAX, 0, 0), CellPos::new(0, 0, 0)],
            CellPos::new(-1, 0, 0),
            Cardinal::North,
            &grid,
        )
        .unwrap();
        assert_eq!(bp.cell_count(), 1);
        assert!(bp.cells.contains_key(&CellPos::new(1, 0, 0)));
    }

    #[test]
    fn test_capture_sanitizes_aux() {
        let mut grid = CellGrid::default();
        let chest = CellPos::new(0, 0, 0);
        let lamp = CellPos::new(1, 0, 0);
        grid.place(chest, CellState::plain("chest").with_kind(CellKind::Composite));
        grid.place_aux(
            chest,
            AuxRecord::from_value(json!({"slots": [{"config": "f", "stock": 9}], "stock": 3}))
                .unwrap(),
        );
        grid.place(lamp, CellState::plain("lamp"));
        grid.place_aux(lamp, AuxRecord::from_value(json!({"energy": 50})).unwrap());

        let bp = capture([chest, lamp], CellPos::ORIGIN, Cardinal::North, &grid).unwrap();
        assert_eq!(
            bp.auxiliary.get(&chest).unwrap(),
            &AuxRecord::from_value(json!({"slots": [{"config": "f"}]})).unwrap()
        );
        assert!(
            !bp.auxiliary.contains_key(&lamp),
            "empty sanitized record must not be stored"
        );
        assert!(bp.validate().is_ok());
    }

    #[test]
    fn test_capture_footprint_uses_provider() {
        let grid = grid_with_pair();
        let mut registry = FootprintRegistry::default();
        registry.register(
            StructureHandle(7),
            Footprint {
                positions: [CellPos::new(5, 1, 5), CellPos::new(6, 1, 5)].into(),
                origin: CellPos::new(6, 1, 5),
                facing: Cardinal::West,
                source_kind: "wall".into(),
            },
        );
        let bp = capture_footprint(&registry, StructureHandle(7), &grid).unwrap();
        assert_eq!(bp.source_kind, "wall");
        assert_eq!(bp.origin_orientation, Cardinal::West);
        assert!(bp.cells.contains_key(&CellPos::new(-1, 0, 0)));

        assert_eq!(
            capture_footprint(&registry, StructureHandle(8), &grid),
            Err(CaptureError::UnknownStructure(StructureHandle(8)))
        );
    }
}
