//! Directory-backed blueprint storage.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bevy::log::{debug, info};
use bevy::prelude::Resource;
use schematic::Blueprint;

use crate::atomic_write::atomic_write;
use crate::blueprint_file::{decode_file, encode_file};
use crate::save_error::SaveError;

/// File extension for stored blueprints.
pub const EXTENSION: &str = "schm";

/// Longest file stem a name is reduced to.
pub const MAX_STEM_LEN: usize = 64;

/// Reduce a display name to a file stem that cannot escape the store root.
///
/// ASCII letters, digits, `-` and `_` are kept; whitespace becomes `_`;
/// everything else is dropped.
pub fn file_stem_for(name: &str) -> Result<String, SaveError> {
    let stem: String = name
        .trim()
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .take(MAX_STEM_LEN)
        .collect();

    if stem.chars().all(|c| c == '_' || c == '-') {
        return Err(SaveError::InvalidName(name.to_string()));
    }
    Ok(stem)
}

/// Blueprints stored as one file each under `root`.
#[derive(Resource, Debug, Clone)]
pub struct BlueprintStore {
    root: PathBuf,
}

impl BlueprintStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, name: &str) -> Result<PathBuf, SaveError> {
        let stem = file_stem_for(name)?;
        Ok(self.root.join(format!("{stem}.{EXTENSION}")))
    }

    /// Write `blueprint` under `name`, replacing any earlier file with the
    /// same stem. The stored blueprint takes `name` as its display name.
    pub fn save(&self, name: &str, blueprint: &Blueprint) -> Result<PathBuf, SaveError> {
        let path = self.path_for(name)?;
        let bytes = if blueprint.name == name {
            encode_file(blueprint)?
        } else {
            let mut named = blueprint.clone();
            named.name = name.to_string();
            encode_file(&named)?
        };
        atomic_write(&path, &bytes)?;
        info!(
            "Stored blueprint '{}' ({} cells, {} bytes) at {}",
            name,
            blueprint.cell_count(),
            bytes.len(),
            path.display()
        );
        Ok(path)
    }

    pub fn load(&self, name: &str) -> Result<Blueprint, SaveError> {
        let path = self.path_for(name)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SaveError::NotFound(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        let blueprint = decode_file(&bytes)?;
        debug!(
            "Loaded blueprint '{}' ({} cells) from {}",
            blueprint.name,
            blueprint.cell_count(),
            path.display()
        );
        Ok(blueprint)
    }

    pub fn delete(&self, name: &str) -> Result<(), SaveError> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(SaveError::NotFound(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// File stems of every stored blueprint, sorted. An absent root is an
    /// empty store.
    pub fn list(&self) -> Result<Vec<String>, SaveError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.path_for(name).map(|p| p.is_file()).unwrap_or(false)
    }
}
