//! Binary encoding of blueprints.
//!
//! `BlueprintSave` is the bitcode mirror of `Blueprint`. Auxiliary records
//! travel as JSON text so arbitrary documents survive the round trip with
//! their field order intact.

use std::fmt;

use bitcode::{Decode, Encode};

use crate::aux_record::AuxRecord;
use crate::blueprint::{Blueprint, FatalInvariantViolation};
use crate::cell::CellState;
use crate::geometry::{Cardinal, CellPos};

/// Serializable form of a `Blueprint`.
#[derive(Debug, Clone, PartialEq, Encode, Decode, Default)]
pub struct BlueprintSave {
    pub name: String,
    pub origin_orientation: Cardinal,
    pub source_kind: String,
    pub user_rotation_offset: u8,
    pub cells: Vec<(CellPos, CellState)>,
    pub auxiliary: Vec<(CellPos, String)>,
}

#[derive(Debug)]
pub enum CodecError {
    Bitcode(bitcode::Error),
    Aux {
        key: CellPos,
        source: serde_json::Error,
    },
    Invariant(FatalInvariantViolation),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Bitcode(e) => write!(f, "bitcode decode error: {e}"),
            CodecError::Aux { key, source } => {
                write!(f, "auxiliary record at {key} is not a JSON object: {source}")
            }
            CodecError::Invariant(v) => write!(f, "decoded blueprint is invalid: {v}"),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodecError::Bitcode(e) => Some(e),
            CodecError::Aux { source, .. } => Some(source),
            CodecError::Invariant(v) => Some(v),
        }
    }
}

impl From<bitcode::Error> for CodecError {
    fn from(e: bitcode::Error) -> Self {
        CodecError::Bitcode(e)
    }
}

impl From<FatalInvariantViolation> for CodecError {
    fn from(v: FatalInvariantViolation) -> Self {
        CodecError::Invariant(v)
    }
}

impl From<&Blueprint> for BlueprintSave {
    fn from(bp: &Blueprint) -> Self {
        Self {
            name: bp.name.clone(),
            origin_orientation: bp.origin_orientation,
            source_kind: bp.source_kind.clone(),
            user_rotation_offset: bp.user_rotation_offset,
            cells: bp.cells.iter().map(|(k, v)| (*k, v.clone())).collect(),
            auxiliary: bp
                .auxiliary
                .iter()
                .map(|(k, v)| (*k, v.to_json_string()))
                .collect(),
        }
    }
}

impl TryFrom<BlueprintSave> for Blueprint {
    type Error = CodecError;

    fn try_from(save: BlueprintSave) -> Result<Self, Self::Error> {
        let mut bp = Blueprint::new(save.name, save.origin_orientation)
            .with_source_kind(save.source_kind);
        bp.user_rotation_offset = save.user_rotation_offset;
        bp.cells = save.cells.into_iter().collect();
        for (key, text) in save.auxiliary {
            let record = AuxRecord::from_json_str(&text)
                .map_err(|source| CodecError::Aux { key, source })?;
            bp.auxiliary.insert(key, record);
        }
        bp.validate()?;
        Ok(bp)
    }
}

pub fn encode_blueprint(bp: &Blueprint) -> Vec<u8> {
    bitcode::encode(&BlueprintSave::from(bp))
}

/// Decode and validate a blueprint.
pub fn decode_blueprint(bytes: &[u8]) -> Result<Blueprint, CodecError> {
    let save: BlueprintSave = bitcode::decode(bytes)?;
    Blueprint::try_from(save)
}
