//! Chunk-level metadata, as resolved from the outer file footer.

use std::fmt;

use crate::schema::PhysicalType;

/// Block compression codec applied to page bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionCodec {
    Uncompressed,
    Snappy,
    Gzip,
    Lzo,
    Brotli,
    Lz4,
    Zstd,
}

impl fmt::Display for CompressionCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CompressionCodec::Uncompressed => "UNCOMPRESSED",
            CompressionCodec::Snappy => "SNAPPY",
            CompressionCodec::Gzip => "GZIP",
            CompressionCodec::Lzo => "LZO",
            CompressionCodec::Brotli => "BROTLI",
            CompressionCodec::Lz4 => "LZ4",
            CompressionCodec::Zstd => "ZSTD",
        };
        f.write_str(name)
    }
}

/// Metadata of a single column chunk.
///
/// `dictionary_page_offset` is present only when the chunk starts with a
/// dictionary page. `file_path` refers to chunks stored outside the current
/// file; the reader rejects such chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkMetaData {
    pub physical_type: PhysicalType,
    pub codec: CompressionCodec,
    pub total_compressed_size: i64,
    pub data_page_offset: i64,
    pub dictionary_page_offset: Option<i64>,
    pub file_path: Option<String>,
}
