//! Definitions of the on-disk column-chunk format: physical types, page
//! encodings, page headers and chunk-level metadata.
//!
//! The layout mirrors the standard columnar convention: a row group holds one
//! column chunk per column, and a chunk is a contiguous run of pages: an
//! optional dictionary page followed by data pages (first- or
//! second-generation layout). These definitions are shared between the page
//! reader and the collaborators that parse outer file metadata.

pub mod chunk;
pub mod page;
pub mod schema;
