//! Binary codec for IR modules
//!
//! The wire format is dense little-endian binary: a 4-byte magic `SHRD`,
//! a two-byte version, a reserved struct table, then one record per
//! function. Value and block references are function-local `u16` ids
//! assigned in first-write order: arguments first, then each result in
//! emission order.

mod reader;
mod writer;

pub use reader::deserialize;
pub use writer::serialize;

use thiserror::Error;

/// File magic: `S H R D`.
pub const MAGIC: [u8; 4] = *b"SHRD";

/// Format version written and accepted by this codec.
pub const VERSION_MAJOR: u8 = 0x00;
pub const VERSION_MINOR: u8 = 0x01;

/// Errors surfaced by the binary reader and writer.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("invalid format: bad magic")]
    InvalidFormat,

    #[error("unsupported format version {major}.{minor}")]
    UnsupportedVersion { major: u8, minor: u8 },

    #[error("malformed module at byte {offset}: {message}")]
    Malformed { offset: u64, message: String },

    #[error("truncated input at byte {offset}")]
    Truncated { offset: u64 },

    #[error("cannot encode module: {0}")]
    Unencodable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CodecError> for shard_common::ShardError {
    fn from(err: CodecError) -> Self {
        shard_common::ShardError::codec_error(err.to_string())
    }
}
