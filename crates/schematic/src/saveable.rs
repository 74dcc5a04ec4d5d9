//! Clipboard state as entries of a host save file's extension map.
//!
//! The host owns the save file; the clipboard contributes one opaque blob per
//! resource under a stable key. An entry that fails to decode resets its
//! resource and is reported, so a damaged clipboard never blocks loading the
//! rest of a save.

use std::collections::BTreeMap;

use bevy::prelude::*;

use crate::codec::CodecError;

/// A clipboard resource persisted under `SAVE_KEY`.
pub trait Saveable: Resource + Default {
    /// Stable key in the extension map.
    const SAVE_KEY: &'static str;

    /// `None` when there is nothing worth writing.
    fn save_to_bytes(&self) -> Option<Vec<u8>>;

    fn load_from_bytes(bytes: &[u8]) -> Result<Self, CodecError>;
}

struct Entry {
    key: &'static str,
    save: fn(&World) -> Option<Vec<u8>>,
    load: fn(&mut World, &[u8]) -> Result<(), CodecError>,
    reset: fn(&mut World),
}

fn save_entry<T: Saveable>(world: &World) -> Option<Vec<u8>> {
    world.get_resource::<T>().and_then(T::save_to_bytes)
}

fn load_entry<T: Saveable>(world: &mut World, bytes: &[u8]) -> Result<(), CodecError> {
    let value = T::load_from_bytes(bytes)?;
    world.insert_resource(value);
    Ok(())
}

fn reset_entry<T: Saveable>(world: &mut World) {
    world.insert_resource(T::default());
}

/// What `load_all` did with an extension map.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub restored: Vec<&'static str>,
    /// Entries whose bytes were rejected. Their resources were reset.
    pub failed: Vec<(&'static str, CodecError)>,
    /// Registered keys absent from the map. Their resources are untouched.
    pub missing: Vec<&'static str>,
    /// Keys in the map that belong to something other than the clipboard.
    pub foreign: Vec<String>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// The clipboard resources a host save must carry, registered by
/// `ClipboardPlugin`.
#[derive(Resource, Default)]
pub struct SaveableRegistry {
    entries: Vec<Entry>,
}

impl SaveableRegistry {
    /// Register `T`. Returns `false` and changes nothing if its key is taken.
    pub fn register<T: Saveable>(&mut self) -> bool {
        if self.entries.iter().any(|e| e.key == T::SAVE_KEY) {
            warn!("SaveableRegistry: '{}' is already registered", T::SAVE_KEY);
            return false;
        }
        self.entries.push(Entry {
            key: T::SAVE_KEY,
            save: save_entry::<T>,
            load: load_entry::<T>,
            reset: reset_entry::<T>,
        });
        true
    }

    /// Registered keys, in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.key)
    }

    pub fn save_all(&self, world: &World) -> BTreeMap<String, Vec<u8>> {
        self.entries
            .iter()
            .filter_map(|entry| Some((entry.key.to_string(), (entry.save)(world)?)))
            .collect()
    }

    /// Restore every registered resource present in `extensions`.
    pub fn load_all(
        &self,
        world: &mut World,
        extensions: &BTreeMap<String, Vec<u8>>,
    ) -> LoadReport {
        let mut report = LoadReport::default();
        for entry in &self.entries {
            let Some(bytes) = extensions.get(entry.key) else {
                report.missing.push(entry.key);
                continue;
            };
            match (entry.load)(world, bytes) {
                Ok(()) => report.restored.push(entry.key),
                Err(e) => {
                    warn!(
                        "SaveableRegistry: '{}' ({} bytes) could not be restored, resetting: {}",
                        entry.key,
                        bytes.len(),
                        e
                    );
                    (entry.reset)(world);
                    report.failed.push((entry.key, e));
                }
            }
        }
        report.foreign = extensions
            .keys()
            .filter(|k| !self.entries.iter().any(|e| e.key == k.as_str()))
            .cloned()
            .collect();
        debug!(
            "SaveableRegistry: restored {:?}, {} foreign entries left alone",
            report.restored,
            report.foreign.len()
        );
        report
    }

    pub fn reset_all(&self, world: &mut World) {
        for entry in &self.entries {
            (entry.reset)(world);
        }
    }
}
