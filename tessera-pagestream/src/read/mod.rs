//! Decoding of column chunks: offset accounting, page framing, level streams
//! and value encodings.

pub mod chunk;
pub mod codec;
pub mod data_page;
pub mod dictionary_page;
pub mod header;
pub mod levels;
pub mod offset_reader;
pub mod select;
pub mod values;

pub(crate) mod bits;
pub(crate) mod hybrid;

#[cfg(test)]
pub(crate) mod fixtures;

pub use chunk::ColumnChunkReader;
pub use codec::{CodecRegistry, UncompressedCodecs};
pub use data_page::{DataPage, ReadBatch};
pub use dictionary_page::DictionaryPage;
pub use header::PageHeaderDecoder;
pub use levels::{LevelDecoder, LevelFactory};
pub use values::Value;

use std::io::Read;

use tessera_common::{error::Error, Result};

/// Reads exactly `buf.len()` bytes, reporting a short read (rather than a
/// bare EOF) when the stream ends early.
pub(crate) fn read_exact(reader: &mut dyn Read, buf: &mut [u8], element: &str) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => return Err(Error::short_read_count(element, buf.len(), filled)),
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::io(element, e)),
        }
    }
    Ok(())
}
