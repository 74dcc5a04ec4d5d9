//! Blueprint <-> file bytes.
//!
//! On write: bitcode-encode -> lz4 (when it pays off) -> prepend header.
//! On read: validate header -> decompress if flagged -> decode and validate.

use bevy::log::debug;
use schematic::codec::{decode_blueprint, encode_blueprint};
use schematic::Blueprint;

use crate::file_header::{unwrap_header, wrap_with_header, FLAG_COMPRESSED};
use crate::save_error::SaveError;

/// Payloads smaller than this are stored raw.
pub const COMPRESSION_THRESHOLD: usize = 256;

pub fn encode_file(blueprint: &Blueprint) -> Result<Vec<u8>, SaveError> {
    let encoded = encode_blueprint(blueprint);
    if encoded.len() > u32::MAX as usize {
        return Err(SaveError::Encode(format!(
            "blueprint '{}' encodes to {} bytes, more than a file can describe",
            blueprint.name,
            encoded.len()
        )));
    }

    if encoded.len() >= COMPRESSION_THRESHOLD {
        let compressed = lz4_flex::compress(&encoded);
        if compressed.len() < encoded.len() {
            debug!(
                "blueprint '{}': compressed {} -> {} bytes",
                blueprint.name,
                encoded.len(),
                compressed.len()
            );
            return Ok(wrap_with_header(
                &compressed,
                encoded.len(),
                FLAG_COMPRESSED,
            ));
        }
    }
    Ok(wrap_with_header(&encoded, encoded.len(), 0))
}

pub fn decode_file(bytes: &[u8]) -> Result<Blueprint, SaveError> {
    let (header, payload) = unwrap_header(bytes)?;
    if header.is_compressed() {
        let raw = lz4_flex::decompress(payload, header.uncompressed_size as usize)?;
        if raw.len() != header.uncompressed_size as usize {
            return Err(SaveError::Decode(format!(
                "expected {} bytes after decompression, got {}",
                header.uncompressed_size,
                raw.len()
            )));
        }
        Ok(decode_blueprint(&raw)?)
    } else {
        Ok(decode_blueprint(payload)?)
    }
}
