//! Encoding of [`RepositoryTables`] into snapshot file bytes and back.
//!
//! Pipeline on save: tables -> bitcode -> (optional) lz4 -> header.
//! On load the steps run in reverse, and every check a step can make
//! (magic, version, checksum, decompressed size) is made before decoding.

use territory::repository::RepositoryTables;

use crate::file_header::{unwrap_header, wrap_with_header, FLAG_COMPRESSED};
use crate::save_error::SaveError;

pub fn encode_snapshot(tables: &RepositoryTables, compress: bool) -> Vec<u8> {
    let encoded = bitcode::encode(tables);
    if compress {
        let compressed = lz4_flex::compress_prepend_size(&encoded);
        wrap_with_header(&compressed, FLAG_COMPRESSED, encoded.len())
    } else {
        wrap_with_header(&encoded, 0, encoded.len())
    }
}

pub fn decode_snapshot(bytes: &[u8]) -> Result<RepositoryTables, SaveError> {
    let (header, payload) = unwrap_header(bytes)?;
    let tables: RepositoryTables = if header.is_compressed() {
        let encoded = lz4_flex::decompress_size_prepended(payload)?;
        if encoded.len() != header.uncompressed_size as usize {
            return Err(SaveError::Compression(format!(
                "expected {} bytes, got {}",
                header.uncompressed_size,
                encoded.len()
            )));
        }
        bitcode::decode(&encoded)?
    } else {
        bitcode::decode(payload)?
    };
    Ok(tables)
}
