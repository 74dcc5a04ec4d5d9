//! Quarter-turn rotation about the vertical axis.
//!
//! One step maps `(x, y, z)` to `(-z, y, x)` and turns every horizontal
//! facing one cardinal clockwise (N→E→S→W). Positions and states must always
//! be rotated by the same step count or the structure comes out inconsistent.

use crate::cell::{CellState, Orientation};
use crate::geometry::CellPos;

pub fn normalize_steps(steps: i32) -> u8 {
    steps.rem_euclid(4) as u8
}

pub fn rotate_position(p: CellPos, steps: u8) -> CellPos {
    match steps % 4 {
        0 => p,
        1 => CellPos::new(-p.z, p.y, p.x),
        2 => CellPos::new(-p.x, p.y, -p.z),
        _ => CellPos::new(p.z, p.y, -p.x),
    }
}

/// `rotate_position`, or `None` when a component cannot be negated
/// (`i32::MIN`).
pub fn checked_rotate_position(p: CellPos, steps: u8) -> Option<CellPos> {
    Some(match steps % 4 {
        0 => p,
        1 => CellPos::new(p.z.checked_neg()?, p.y, p.x),
        2 => CellPos::new(p.x.checked_neg()?, p.y, p.z.checked_neg()?),
        _ => CellPos::new(p.z, p.y, p.x.checked_neg()?),
    })
}

pub fn rotate_orientation(orientation: Orientation, steps: u8) -> Orientation {
    match orientation {
        Orientation::None => Orientation::None,
        Orientation::Horizontal(c) => Orientation::Horizontal(c.rotated(steps)),
        Orientation::Facing(d) => Orientation::Facing(d.rotated(steps)),
        Orientation::Axis(a) => Orientation::Axis(a.rotated(steps)),
    }
}

/// Rotate the orientation-valued property of `state`. Everything else is
/// copied unchanged.
pub fn rotate_cell_state(state: &CellState, steps: u8) -> CellState {
    let mut out = state.clone();
    out.orientation = rotate_orientation(state.orientation, steps);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Axis, Cardinal, Direction};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_checked_rotation_rejects_unnegatable_components() {
        let edge = CellPos::new(i32::MIN, 4, 7);
        assert_eq!(checked_rotate_position(edge, 0), Some(edge));
        assert_eq!(checked_rotate_position(edge, 1), Some(CellPos::new(-7, 4, i32::MIN)));
        assert_eq!(checked_rotate_position(edge, 2), None);
        assert_eq!(checked_rotate_position(edge, 3), None);
        let p = CellPos::new(3, -2, 9);
        for steps in 0..4 {
            assert_eq!(checked_rotate_position(p, steps), Some(rotate_position(p, steps)));
        }
    }

    #[test]
    fn test_single_step_matches_formula() {
        assert_eq!(
            rotate_position(CellPos::new(1, 0, 0), 1),
            CellPos::new(0, 0, 1)
        );
        assert_eq!(
            rotate_position(CellPos::new(2, 7, 3), 1),
            CellPos::new(-3, 7, 2)
        );
    }

    #[test]
    fn test_closed_forms_match_repeated_steps() {
        let p = CellPos::new(4, -2, 9);
        let mut q = p;
        for steps in 0..4u8 {
            assert_eq!(rotate_position(p, steps), q, "steps={steps}");
            q = rotate_position(q, 1);
        }
        assert_eq!(q, p);
    }

    #[test]
    fn test_rotation_is_cyclic_group_action() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..500 {
            let p = CellPos::new(
                rng.gen_range(-1000..1000),
                rng.gen_range(-64..320),
                rng.gen_range(-1000..1000),
            );
            let a: u8 = rng.gen_range(0..4);
            let b: u8 = rng.gen_range(0..4);
            assert_eq!(
                rotate_position(rotate_position(p, a), b),
                rotate_position(p, (a + b) % 4)
            );
            assert_eq!(rotate_position(p, 0), p);
            assert_eq!(rotate_position(p, 4), p);
        }
    }

    #[test]
    fn test_orientation_follows_position() {
        // A cell facing east one unit east of the origin still points away
        // from the origin after any rotation.
        for steps in 0..4u8 {
            let facing = Cardinal::East.rotated(steps);
            let pos = rotate_position(Cardinal::East.offset(), steps);
            assert_eq!(facing.offset(), pos, "steps={steps}");
        }
    }

    #[test]
    fn test_state_rotation() {
        let stairs = CellState::plain("oak_stairs").facing(Cardinal::North);
        assert_eq!(
            rotate_cell_state(&stairs, 1).orientation,
            Orientation::Horizontal(Cardinal::East)
        );
        let piston = CellState::plain("piston").with_orientation(Orientation::Facing(Direction::Up));
        assert_eq!(rotate_cell_state(&piston, 3), piston);
        let log = CellState::plain("oak_log").with_orientation(Orientation::Axis(Axis::X));
        assert_eq!(
            rotate_cell_state(&log, 1).orientation,
            Orientation::Axis(Axis::Z)
        );
        assert_eq!(
            rotate_cell_state(&log, 2).orientation,
            Orientation::Axis(Axis::X)
        );
    }

    #[test]
    fn test_four_steps_restore_state() {
        let states = [
            CellState::plain("door").facing(Cardinal::West),
            CellState::plain("observer").with_orientation(Orientation::Facing(Direction::South)),
            CellState::plain("pillar").with_orientation(Orientation::Axis(Axis::Z)),
            CellState::plain("stone"),
        ];
        for s in &states {
            let mut r = s.clone();
            for _ in 0..4 {
                r = rotate_cell_state(&r, 1);
            }
            assert_eq!(&r, s);
        }
    }

    #[test]
    fn test_normalize_steps() {
        assert_eq!(normalize_steps(-1), 3);
        assert_eq!(normalize_steps(9), 1);
        assert_eq!(normalize_steps(0), 0);
    }
}
