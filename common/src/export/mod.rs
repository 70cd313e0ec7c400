//! Export core modules shared across CLI and WASM wrappers.

pub mod json_core;

pub use json_core::{
    serialize_records, suggested_filename, ExportArtifact, ExportEntry, ExportValidation,
    EXPORT_FILE_PREFIX, EXPORT_MIME_TYPE,
};
