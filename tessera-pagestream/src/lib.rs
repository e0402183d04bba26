//! Column-chunk page reading for the tessera columnar format.
//!
//! A column chunk is a contiguous byte region holding an optional dictionary
//! page followed by one or more data pages. [`read::ColumnChunkReader`] walks
//! that page sequence and surfaces decoded values together with the
//! definition and repetition levels that encode nested and optional
//! structure.
//!
//! The outer file footer, the schema catalog, the page-header wire codec and
//! the block compression codecs are collaborators: they are represented here
//! by the [`read::PageHeaderDecoder`] and [`read::CodecRegistry`] traits and
//! by the descriptor types of `tessera-format`.

pub mod read;
