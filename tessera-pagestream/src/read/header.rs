//! The page-header deserialization seam.

use std::io::Read;

use tessera_common::Result;
use tessera_format::page::PageHeader;

/// Collaborator that deserializes the next page header from a byte stream,
/// advancing the stream past the serialized header.
///
/// The wire format (typically thrift-compact) is owned by the outer file
/// layer; the chunk reader only relies on the decoded [`PageHeader`] shape
/// and on the stream position ending up at the first body byte.
pub trait PageHeaderDecoder: Send + Sync {
    fn read_header(&self, reader: &mut dyn Read) -> Result<PageHeader>;
}
