//! Framing of page bodies: the bounded, decompressing reader over a page's
//! value region.

use std::io::{Cursor, Read};

use tessera_common::{error::Error, Result};
use tessera_format::chunk::CompressionCodec;

use super::read_exact;

/// Collaborator that supplies block decompressors.
///
/// `input` yields exactly `compressed_size` bytes; the returned reader must
/// yield up to `uncompressed_size` bytes of decompressed output.
pub trait CodecRegistry: Send + Sync {
    fn decompress(
        &self,
        codec: CompressionCodec,
        input: Box<dyn Read>,
        compressed_size: u64,
        uncompressed_size: u64,
    ) -> Result<Box<dyn Read>>;
}

/// The registry shipped with the reader: admits only
/// [`CompressionCodec::Uncompressed`] as a bounded pass-through. Real block
/// codecs are registered by the embedding application.
pub struct UncompressedCodecs;

impl CodecRegistry for UncompressedCodecs {
    fn decompress(
        &self,
        codec: CompressionCodec,
        input: Box<dyn Read>,
        _compressed_size: u64,
        uncompressed_size: u64,
    ) -> Result<Box<dyn Read>> {
        match codec {
            CompressionCodec::Uncompressed => Ok(Box::new(input.take(uncompressed_size))),
            other => Err(Error::invalid_operation(format!(
                "codec {other} is not registered"
            ))),
        }
    }
}

/// Consumes the page's remaining body, exactly `compressed_size` bytes,
/// from the stream and returns the bounded decompressing reader over it.
///
/// Negative sizes are rejected before any byte is consumed.
pub(crate) fn page_body_reader(
    reader: &mut dyn Read,
    codec: CompressionCodec,
    codecs: &dyn CodecRegistry,
    compressed_size: i64,
    uncompressed_size: i64,
) -> Result<Box<dyn Read>> {
    if compressed_size < 0 {
        return Err(Error::invalid_size("page compressed size", compressed_size));
    }
    if uncompressed_size < 0 {
        return Err(Error::invalid_size(
            "page uncompressed size",
            uncompressed_size,
        ));
    }
    let mut body = vec![0u8; compressed_size as usize];
    read_exact(reader, &mut body, "page body")?;
    codecs.decompress(
        codec,
        Box::new(Cursor::new(body)),
        compressed_size as u64,
        uncompressed_size as u64,
    )
}
