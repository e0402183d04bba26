//! Page-level format definitions: value encodings and the serialized page
//! header shapes.

use std::fmt;

/// Encoding of a value stream within a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    Plain,
    /// Deprecated alias of [`Encoding::RleDictionary`], still emitted by old
    /// writers for both dictionary and data pages.
    PlainDictionary,
    Rle,
    RleDictionary,
    DeltaBinaryPacked,
    DeltaLengthByteArray,
    DeltaByteArray,
}

impl Encoding {
    /// Rewrites the deprecated dictionary alias to its modern name. All other
    /// encodings pass through unchanged.
    pub fn normalize(self) -> Encoding {
        match self {
            Encoding::PlainDictionary => Encoding::RleDictionary,
            other => other,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Encoding::Plain => "PLAIN",
            Encoding::PlainDictionary => "PLAIN_DICTIONARY",
            Encoding::Rle => "RLE",
            Encoding::RleDictionary => "RLE_DICTIONARY",
            Encoding::DeltaBinaryPacked => "DELTA_BINARY_PACKED",
            Encoding::DeltaLengthByteArray => "DELTA_LENGTH_BYTE_ARRAY",
            Encoding::DeltaByteArray => "DELTA_BYTE_ARRAY",
        };
        f.write_str(name)
    }
}

/// Header of a dictionary page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryPageHeader {
    /// Number of entries in the dictionary. Serialized as a signed 32-bit
    /// field; negative values are rejected by the reader.
    pub num_values: i32,
    pub encoding: Encoding,
}

/// Header of a first-generation data page. Level streams are embedded in the
/// page body with their own length prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPageHeader {
    pub num_values: i32,
    pub encoding: Encoding,
}

/// Header of a second-generation data page. Level streams sit at the front of
/// the page body, outside the compressed region, with their byte lengths
/// recorded here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPageHeaderV2 {
    pub num_values: i32,
    pub encoding: Encoding,
    pub repetition_levels_byte_length: i32,
    pub definition_levels_byte_length: i32,
}

/// The page-type tag with its type-specific header payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageKind {
    Dictionary(DictionaryPageHeader),
    DataV1(DataPageHeader),
    DataV2(DataPageHeaderV2),
    /// Column/offset index pages are written by some producers between data
    /// pages' metadata; the chunk reader never expects one inside a chunk.
    Index,
}

impl PageKind {
    pub fn name(&self) -> &'static str {
        match self {
            PageKind::Dictionary(_) => "DICTIONARY_PAGE",
            PageKind::DataV1(_) => "DATA_PAGE",
            PageKind::DataV2(_) => "DATA_PAGE_V2",
            PageKind::Index => "INDEX_PAGE",
        }
    }
}

/// A deserialized page header: the common size fields plus the type-specific
/// payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageHeader {
    pub uncompressed_page_size: i32,
    pub compressed_page_size: i32,
    pub kind: PageKind,
}
