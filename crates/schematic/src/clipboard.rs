//! The single active blueprint slot.
//!
//! A capture unconditionally replaces the active blueprint; a failed capture
//! leaves it as it was. Pastes read it and use it within one call.

use bevy::prelude::Resource;
use bitcode::{Decode, Encode};

use crate::blueprint::Blueprint;
use crate::capture::{capture, capture_footprint, CaptureError};
use crate::codec::{BlueprintSave, CodecError};
use crate::config::CLIPBOARD_SAVE_KEY;
use crate::footprint::{FootprintProvider, StructureHandle};
use crate::geometry::{Cardinal, CellPos};
use crate::world::WorldAccess;
use crate::Saveable;

#[derive(Resource, Debug, Clone, Default)]
pub struct Clipboard {
    active: Option<Blueprint>,
}

impl Clipboard {
    /// Replace the active blueprint, returning the previous one.
    pub fn set_active(&mut self, blueprint: Blueprint) -> Option<Blueprint> {
        self.active.replace(blueprint)
    }

    pub fn get_active(&self) -> Option<&Blueprint> {
        self.active.as_ref()
    }

    pub fn clear(&mut self) -> Option<Blueprint> {
        self.active.take()
    }

    pub fn has_active(&self) -> bool {
        self.active.is_some()
    }

    /// Capture `positions` and make the result active.
    pub fn capture_into<W, I>(
        &mut self,
        positions: I,
        origin: CellPos,
        origin_orientation: Cardinal,
        world: &W,
    ) -> Result<&Blueprint, CaptureError>
    where
        W: WorldAccess + ?Sized,
        I: IntoIterator<Item = CellPos>,
    {
        let blueprint = capture(positions, origin, origin_orientation, world)?;
        Ok(self.active.insert(blueprint))
    }

    /// Capture a structure by handle and make the result active.
    pub fn capture_structure_into<P, W>(
        &mut self,
        provider: &P,
        handle: StructureHandle,
        world: &W,
    ) -> Result<&Blueprint, CaptureError>
    where
        P: FootprintProvider + ?Sized,
        W: WorldAccess + ?Sized,
    {
        let blueprint = capture_footprint(provider, handle, world)?;
        Ok(self.active.insert(blueprint))
    }

    /// Turn the active blueprint by `delta` quarter turns. Returns the new
    /// offset, or `None` when nothing is active.
    pub fn rotate_offset(&mut self, delta: i32) -> Option<u8> {
        let active = self.active.as_mut()?;
        active.rotate_offset(delta);
        Some(active.user_rotation_offset)
    }

    pub fn rename(&mut self, name: impl Into<String>) -> bool {
        match self.active.as_mut() {
            Some(active) => {
                active.name = name.into();
                true
            }
            None => false,
        }
    }
}

#[derive(Encode, Decode, Default)]
struct ClipboardSave {
    active: Option<BlueprintSave>,
}

impl Saveable for Clipboard {
    const SAVE_KEY: &'static str = CLIPBOARD_SAVE_KEY;

    fn save_to_bytes(&self) -> Option<Vec<u8>> {
        let active = self.active.as_ref()?;
        Some(bitcode::encode(&ClipboardSave {
            active: Some(BlueprintSave::from(active)),
        }))
    }

    fn load_from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let save: ClipboardSave = bitcode::decode(bytes)?;
        let active = save.active.map(Blueprint::try_from).transpose()?;
        Ok(Clipboard { active })
    }
}
