//! `BlueprintLibrary` resource: named blueprints kept alongside the
//! clipboard. Persisted through the `Saveable` extension map, and on disk by
//! the `save` crate.

use std::collections::BTreeMap;

use bevy::log::warn;
use bevy::prelude::Resource;
use bitcode::{Decode, Encode};

use crate::blueprint::Blueprint;
use crate::codec::{BlueprintSave, CodecError};
use crate::config::LIBRARY_SAVE_KEY;
use crate::Saveable;

#[derive(Resource, Debug, Clone, Default)]
pub struct BlueprintLibrary {
    blueprints: BTreeMap<String, Blueprint>,
}

impl BlueprintLibrary {
    /// Store `blueprint` under `name`, overwriting any previous entry. The
    /// stored copy takes `name` as its display name.
    pub fn save(&mut self, name: impl Into<String>, mut blueprint: Blueprint) -> Option<Blueprint> {
        let name = name.into();
        blueprint.name = name.clone();
        self.blueprints.insert(name, blueprint)
    }

    pub fn load(&self, name: &str) -> Option<&Blueprint> {
        self.blueprints.get(name)
    }

    pub fn delete(&mut self, name: &str) -> Option<Blueprint> {
        self.blueprints.remove(name)
    }

    /// Names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.blueprints.keys().map(String::as_str)
    }

    pub fn count(&self) -> usize {
        self.blueprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blueprints.is_empty()
    }
}

#[derive(Encode, Decode, Default)]
struct BlueprintLibrarySave {
    blueprints: Vec<BlueprintSave>,
}

impl Saveable for BlueprintLibrary {
    const SAVE_KEY: &'static str = LIBRARY_SAVE_KEY;

    fn save_to_bytes(&self) -> Option<Vec<u8>> {
        if self.is_empty() {
            return None;
        }
        let save = BlueprintLibrarySave {
            blueprints: self.blueprints.values().map(BlueprintSave::from).collect(),
        };
        Some(bitcode::encode(&save))
    }

    /// Entries that fail validation are dropped one by one; only an
    /// undecodable library as a whole is an error.
    fn load_from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let save: BlueprintLibrarySave = bitcode::decode(bytes)?;
        let mut library = BlueprintLibrary::default();
        for entry in save.blueprints {
            let name = entry.name.clone();
            match Blueprint::try_from(entry) {
                Ok(bp) => {
                    library.blueprints.insert(name, bp);
                }
                Err(e) => warn!("BlueprintLibrary: skipping '{}': {}", name, e),
            }
        }
        Ok(library)
    }
}
