//! On-disk persistence for blueprints.
//!
//! Each blueprint is one file: a fixed 28-byte header (magic, version,
//! flags, timestamp, size, xxHash32 checksum) followed by the bitcode
//! payload, lz4-compressed when that makes it smaller.

mod atomic_write;
pub mod blueprint_file;
pub mod file_header;
pub mod save_error;
pub mod store;
pub mod store_plugin;

pub use blueprint_file::{decode_file, encode_file};
pub use save_error::SaveError;
pub use store::BlueprintStore;
pub use store_plugin::{
    BlueprintExported, BlueprintImported, ExportBlueprint, ExportSource, ImportBlueprint,
    StoreFailed, StorePlugin,
};
