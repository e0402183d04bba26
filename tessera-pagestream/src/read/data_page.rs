//! Data pages: per-variant framing and the shared batch engine.
//!
//! Both on-disk variants reduce to the same in-memory shape once read: a
//! value count, two level decoders and a values decoder over the framed page
//! body. They differ only in where the level streams sit: embedded in the
//! body with their own length prefixes (first generation), or at the front
//! of the page outside the compressed region (second generation).

use std::io::Read;
use std::sync::Arc;

use tessera_common::{error::Error, Result};
use tessera_format::chunk::CompressionCodec;
use tessera_format::page::{DataPageHeader, DataPageHeaderV2, Encoding, PageHeader};
use tessera_format::schema::ColumnDescriptor;

use super::codec::{page_body_reader, CodecRegistry};
use super::levels::{LevelDecoder, LevelFactory};
use super::read_exact;
use super::select::select_values_decoder;
use super::values::{Value, ValuesDecoder};

/// One batch produced by a data page or a chunk reader.
///
/// `count` positions were emitted; `def_levels` and `rep_levels` hold one
/// level per position. Decoded values are packed densely at the front of the
/// caller's slice: slot `i` holds the value for the `i`-th position whose
/// definition level equals the column's maximum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadBatch {
    pub count: usize,
    pub def_levels: Vec<u16>,
    pub rep_levels: Vec<u16>,
}

impl ReadBatch {
    pub fn empty() -> ReadBatch {
        ReadBatch::default()
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// A data page primed for batch reads.
pub struct DataPage {
    num_values: i32,
    encoding: Encoding,
    position: i32,
    d_decoder: LevelDecoder,
    r_decoder: LevelDecoder,
    values_decoder: ValuesDecoder,
}

impl DataPage {
    /// Reads a first-generation data page: both level streams sit at the
    /// start of the body in size-prefixed form, repetition levels first as
    /// laid out on disk, and the remainder is the framed values region.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn read_v1(
        reader: &mut dyn Read,
        header: &PageHeader,
        data_header: &DataPageHeader,
        column: &ColumnDescriptor,
        codec: CompressionCodec,
        codecs: &dyn CodecRegistry,
        d_factory: LevelFactory,
        r_factory: LevelFactory,
        dict: Option<&Arc<[Value]>>,
    ) -> Result<DataPage> {
        if data_header.num_values < 0 {
            return Err(Error::invalid_size(
                "DATA_PAGE num_values",
                data_header.num_values as i64,
            ));
        }
        let mut values_decoder = select_values_decoder(column, data_header.encoding, dict)?;

        let mut r_decoder = r_factory.new_decoder();
        let r_bytes = r_decoder
            .init_size_prefixed(reader)
            .map_err(|e| Error::levels("repetition", e))?;
        let mut d_decoder = d_factory.new_decoder();
        let d_bytes = d_decoder
            .init_size_prefixed(reader)
            .map_err(|e| Error::levels("definition", e))?;

        let levels_len = (r_bytes + d_bytes) as i64;
        let body = page_body_reader(
            reader,
            codec,
            codecs,
            header.compressed_page_size as i64 - levels_len,
            header.uncompressed_page_size as i64 - levels_len,
        )?;
        values_decoder.init(body)?;

        Ok(DataPage {
            num_values: data_header.num_values,
            encoding: data_header.encoding,
            position: 0,
            d_decoder,
            r_decoder,
            values_decoder,
        })
    }

    /// Reads a second-generation data page: the level streams sit at the
    /// front of the page, stored uncompressed regardless of the codec, and
    /// only the remainder of the body is framed through the codec.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn read_v2(
        reader: &mut dyn Read,
        header: &PageHeader,
        data_header: &DataPageHeaderV2,
        column: &ColumnDescriptor,
        codec: CompressionCodec,
        codecs: &dyn CodecRegistry,
        d_factory: LevelFactory,
        r_factory: LevelFactory,
        dict: Option<&Arc<[Value]>>,
    ) -> Result<DataPage> {
        if data_header.num_values < 0 {
            return Err(Error::invalid_size(
                "DATA_PAGE_V2 num_values",
                data_header.num_values as i64,
            ));
        }
        let r_len = data_header.repetition_levels_byte_length;
        if r_len < 0 {
            return Err(Error::invalid_size(
                "repetition levels byte length",
                r_len as i64,
            ));
        }
        let d_len = data_header.definition_levels_byte_length;
        if d_len < 0 {
            return Err(Error::invalid_size(
                "definition levels byte length",
                d_len as i64,
            ));
        }
        let levels_len = r_len as i64 + d_len as i64;
        if levels_len > header.compressed_page_size as i64
            || levels_len > header.uncompressed_page_size as i64
        {
            return Err(Error::invalid_size("levels byte length", levels_len));
        }

        let mut values_decoder = select_values_decoder(column, data_header.encoding, dict)?;

        let mut levels = vec![0u8; levels_len as usize];
        read_exact(reader, &mut levels, "level streams")?;
        let d_levels = levels.split_off(r_len as usize);

        let mut r_decoder = r_factory.new_decoder();
        r_decoder.init_slice(levels);
        let mut d_decoder = d_factory.new_decoder();
        d_decoder.init_slice(d_levels);

        let body = page_body_reader(
            reader,
            codec,
            codecs,
            header.compressed_page_size as i64 - levels_len,
            header.uncompressed_page_size as i64 - levels_len,
        )?;
        values_decoder.init(body)?;

        Ok(DataPage {
            num_values: data_header.num_values,
            encoding: data_header.encoding,
            position: 0,
            d_decoder,
            r_decoder,
            values_decoder,
        })
    }

    /// Emits the next batch of up to `out.len()` positions.
    ///
    /// Levels are decoded first, because the number of values to pull from
    /// the values decoder equals the count of positions defined at the
    /// maximum definition level. Those values land densely at the front of
    /// `out`.
    pub fn read_values(&mut self, out: &mut [Value]) -> Result<ReadBatch> {
        let remaining = (self.num_values - self.position) as usize;
        let count = out.len().min(remaining);
        if count == 0 {
            return Ok(ReadBatch::empty());
        }

        let mut def_levels = vec![0u16; count];
        self.d_decoder
            .decode(&mut def_levels)
            .map_err(|e| Error::levels("definition", e))?;

        let mut rep_levels = vec![0u16; count];
        self.r_decoder
            .decode(&mut rep_levels)
            .map_err(|e| Error::levels("repetition", e))?;

        let max_def = self.d_decoder.max_level();
        let not_null = def_levels.iter().filter(|&&d| d == max_def).count();
        if not_null > 0 {
            self.values_decoder.decode(&mut out[..not_null])?;
        }

        self.position += count as i32;
        Ok(ReadBatch {
            count,
            def_levels,
            rep_levels,
        })
    }

    pub fn num_values(&self) -> i32 {
        self.num_values
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Positions not yet emitted by [`DataPage::read_values`].
    pub fn remaining(&self) -> usize {
        (self.num_values - self.position) as usize
    }
}
