//! Delta decoders: DELTA_BINARY_PACKED integers and the two byte-array
//! encodings layered on top of it.
//!
//! A delta stream starts with a header of four varints (block size,
//! miniblocks per block, total value count and the zigzag-encoded first
//! value) followed by blocks. Each block carries a zigzag min-delta, one
//! bit-width byte per miniblock, then the miniblocks of packed deltas.
//! Values accumulate as `previous + min_delta + packed_delta` with wrapping
//! arithmetic, since deltas may legitimately overflow during encoding.

use std::io::Read;
use std::marker::PhantomData;

use num_traits::{FromPrimitive, WrappingAdd};
use tessera_common::{error::Error, verify_data, Result};

use crate::read::bits::BitReader;

use super::Value;

/// Integer types a delta stream can carry.
pub trait DeltaInt: FromPrimitive + WrappingAdd + Default + Copy {
    /// Reinterprets a packed delta, truncating to the type's width.
    fn from_unpacked(delta: u64) -> Self;
    fn into_value(self) -> Value;
}

impl DeltaInt for i32 {
    fn from_unpacked(delta: u64) -> i32 {
        delta as u32 as i32
    }

    fn into_value(self) -> Value {
        Value::Int32(self)
    }
}

impl DeltaInt for i64 {
    fn from_unpacked(delta: u64) -> i64 {
        delta as i64
    }

    fn into_value(self) -> Value {
        Value::Int64(self)
    }
}

/// Cursor over one complete delta stream held in memory.
pub(crate) struct DeltaBitPackCursor<T> {
    bits: BitReader,
    values_left: usize,
    mini_blocks_per_block: usize,
    values_per_mini_block: usize,
    mini_block_widths: Vec<u8>,
    mini_block_idx: usize,
    mini_block_remaining: usize,
    /// Byte offset just past the current block, used to find the payload that
    /// follows a fully drained stream.
    block_end_offset: usize,
    min_delta: T,
    first_value: Option<T>,
    last_value: T,
}

impl<T: DeltaInt> DeltaBitPackCursor<T> {
    pub fn new(data: Vec<u8>) -> Result<DeltaBitPackCursor<T>> {
        let mut bits = BitReader::new(data);
        let header = |field: &'static str| {
            move || Error::short_read(field, "stream ended inside the delta header")
        };
        let block_size = bits.read_uleb128().ok_or_else(header("block size"))? as usize;
        let mini_blocks_per_block =
            bits.read_uleb128().ok_or_else(header("miniblock count"))? as usize;
        let total_count = bits.read_uleb128().ok_or_else(header("value count"))? as usize;
        let first_value = bits.read_zigzag().ok_or_else(header("first value"))?;
        let first_value = T::from_i64(first_value)
            .ok_or_else(|| Error::invalid_format("delta first value", "out of type range"))?;

        verify_data!(block_size, block_size > 0 && block_size % 128 == 0);
        verify_data!(
            mini_blocks_per_block,
            mini_blocks_per_block > 0 && block_size % mini_blocks_per_block == 0
        );
        let values_per_mini_block = block_size / mini_blocks_per_block;
        verify_data!(values_per_mini_block, values_per_mini_block % 32 == 0);

        let header_end = bits.byte_offset();
        Ok(DeltaBitPackCursor {
            bits,
            values_left: total_count,
            mini_blocks_per_block,
            values_per_mini_block,
            mini_block_widths: Vec::new(),
            mini_block_idx: 0,
            mini_block_remaining: 0,
            block_end_offset: header_end,
            min_delta: T::default(),
            first_value: Some(first_value),
            last_value: T::default(),
        })
    }

    pub fn values_remaining(&self) -> usize {
        self.values_left
    }

    pub fn data(&self) -> &[u8] {
        self.bits.data()
    }

    /// Byte offset of whatever follows the delta stream. Once the stream is
    /// drained this accounts for trailing miniblock padding that was never
    /// read.
    pub fn end_offset(&self) -> usize {
        if self.values_left == 0 {
            self.bits.byte_offset().max(self.block_end_offset)
        } else {
            self.bits.byte_offset()
        }
    }

    pub fn next(&mut self) -> Result<T> {
        if self.values_left == 0 {
            return Err(Error::short_read(
                "delta stream",
                "all encoded values already consumed",
            ));
        }
        if let Some(value) = self.first_value.take() {
            self.last_value = value;
            self.values_left -= 1;
            return Ok(value);
        }
        if self.mini_block_remaining == 0 {
            self.next_mini_block()?;
        }
        let width = self.mini_block_widths[self.mini_block_idx] as u32;
        let delta = self
            .bits
            .read_bits(width)
            .ok_or_else(|| Error::short_read("delta miniblock", "stream ended inside a block"))?;
        let value = self
            .last_value
            .wrapping_add(&self.min_delta)
            .wrapping_add(&T::from_unpacked(delta));
        self.last_value = value;
        self.mini_block_remaining -= 1;
        self.values_left -= 1;
        Ok(value)
    }

    fn next_block(&mut self) -> Result<()> {
        let min_delta = self
            .bits
            .read_zigzag()
            .ok_or_else(|| Error::short_read("delta block", "missing min delta"))?;
        self.min_delta = T::from_i64(min_delta)
            .ok_or_else(|| Error::invalid_format("delta min delta", "out of type range"))?;

        let mut widths = self
            .bits
            .read_aligned(self.mini_blocks_per_block)
            .ok_or_else(|| Error::short_read("delta block", "missing miniblock widths"))?
            .to_vec();

        // Writers may leave arbitrary widths on miniblocks past the value
        // count; treat those as empty when sizing the block.
        let mut offset = self.bits.byte_offset();
        let mut remaining = self.values_left;
        for w in widths.iter_mut() {
            if remaining == 0 {
                *w = 0;
            }
            verify_data!(miniblock_width, *w as u32 <= 64);
            remaining = remaining.saturating_sub(self.values_per_mini_block);
            offset += *w as usize * self.values_per_mini_block / 8;
        }
        self.block_end_offset = offset;
        self.mini_block_widths = widths;
        self.mini_block_idx = 0;
        self.mini_block_remaining = self.values_per_mini_block;
        Ok(())
    }

    fn next_mini_block(&mut self) -> Result<()> {
        if self.mini_block_idx + 1 < self.mini_block_widths.len() {
            self.mini_block_idx += 1;
            self.mini_block_remaining = self.values_per_mini_block;
            Ok(())
        } else {
            self.next_block()
        }
    }
}

/// DELTA_BINARY_PACKED decoder for INT32 / INT64 data pages.
pub struct DeltaBinaryPackedDecoder<T> {
    cursor: Option<DeltaBitPackCursor<T>>,
    _marker: PhantomData<T>,
}

impl<T: DeltaInt> DeltaBinaryPackedDecoder<T> {
    pub fn new() -> Self {
        DeltaBinaryPackedDecoder {
            cursor: None,
            _marker: PhantomData,
        }
    }

    pub(crate) fn init(&mut self, mut reader: Box<dyn Read>) -> Result<()> {
        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .map_err(|e| Error::io("DELTA_BINARY_PACKED stream", e))?;
        self.cursor = Some(DeltaBitPackCursor::new(data)?);
        Ok(())
    }

    pub(crate) fn decode(&mut self, out: &mut [Value]) -> Result<()> {
        let cursor = self
            .cursor
            .as_mut()
            .ok_or_else(|| Error::invalid_operation("values decoder used before init"))?;
        for slot in out.iter_mut() {
            *slot = cursor.next()?.into_value();
        }
        Ok(())
    }
}

impl<T: DeltaInt> Default for DeltaBinaryPackedDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// DELTA_LENGTH_BYTE_ARRAY: delta-packed lengths followed by the
/// concatenated payloads.
#[derive(Default)]
pub struct DeltaLengthByteArrayDecoder {
    lengths: Vec<i32>,
    idx: usize,
    data: Vec<u8>,
    offset: usize,
    initialized: bool,
}

impl DeltaLengthByteArrayDecoder {
    pub fn new() -> Self {
        Default::default()
    }

    pub(crate) fn init(&mut self, mut reader: Box<dyn Read>) -> Result<()> {
        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .map_err(|e| Error::io("DELTA_LENGTH_BYTE_ARRAY stream", e))?;
        self.init_from_buffer(data)
    }

    pub(crate) fn init_from_buffer(&mut self, data: Vec<u8>) -> Result<()> {
        let mut lengths_cursor = DeltaBitPackCursor::<i32>::new(data)?;
        let count = lengths_cursor.values_remaining();
        let mut lengths = Vec::with_capacity(count);
        for _ in 0..count {
            let len = lengths_cursor.next()?;
            if len < 0 {
                return Err(Error::invalid_size("BYTE_ARRAY length", len as i64));
            }
            lengths.push(len);
        }
        let payload_start = lengths_cursor.end_offset();
        self.data = lengths_cursor.data()[payload_start..].to_vec();
        self.lengths = lengths;
        self.idx = 0;
        self.offset = 0;
        self.initialized = true;
        Ok(())
    }

    pub(crate) fn remaining(&self) -> usize {
        self.lengths.len() - self.idx
    }

    pub(crate) fn next_bytes(&mut self) -> Result<Vec<u8>> {
        if !self.initialized {
            return Err(Error::invalid_operation("values decoder used before init"));
        }
        let len = *self.lengths.get(self.idx).ok_or_else(|| {
            Error::short_read("DELTA_LENGTH_BYTE_ARRAY values", "all values consumed")
        })? as usize;
        if self.offset + len > self.data.len() {
            return Err(Error::short_read_count(
                "DELTA_LENGTH_BYTE_ARRAY payload",
                self.offset + len,
                self.data.len(),
            ));
        }
        let bytes = self.data[self.offset..self.offset + len].to_vec();
        self.idx += 1;
        self.offset += len;
        Ok(bytes)
    }

    pub(crate) fn decode(&mut self, out: &mut [Value]) -> Result<()> {
        for slot in out.iter_mut() {
            *slot = Value::Bytes(self.next_bytes()?);
        }
        Ok(())
    }
}

/// DELTA_BYTE_ARRAY: per-entry shared-prefix lengths (delta-packed) plus a
/// DELTA_LENGTH_BYTE_ARRAY stream of suffixes.
#[derive(Default)]
pub struct DeltaByteArrayDecoder {
    prefix_lengths: Vec<i32>,
    idx: usize,
    suffixes: DeltaLengthByteArrayDecoder,
    previous: Vec<u8>,
}

impl DeltaByteArrayDecoder {
    pub fn new() -> Self {
        Default::default()
    }

    pub(crate) fn init(&mut self, mut reader: Box<dyn Read>) -> Result<()> {
        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .map_err(|e| Error::io("DELTA_BYTE_ARRAY stream", e))?;

        let mut prefix_cursor = DeltaBitPackCursor::<i32>::new(data)?;
        let count = prefix_cursor.values_remaining();
        let mut prefix_lengths = Vec::with_capacity(count);
        for _ in 0..count {
            let len = prefix_cursor.next()?;
            if len < 0 {
                return Err(Error::invalid_size("prefix length", len as i64));
            }
            prefix_lengths.push(len);
        }
        let suffix_start = prefix_cursor.end_offset();
        let suffix_data = prefix_cursor.data()[suffix_start..].to_vec();
        self.suffixes.init_from_buffer(suffix_data)?;
        verify_data!(
            suffix_count,
            self.suffixes.remaining() == prefix_lengths.len()
        );
        self.prefix_lengths = prefix_lengths;
        self.idx = 0;
        self.previous.clear();
        Ok(())
    }

    pub(crate) fn decode(&mut self, out: &mut [Value]) -> Result<()> {
        for slot in out.iter_mut() {
            let prefix_len = *self.prefix_lengths.get(self.idx).ok_or_else(|| {
                Error::short_read("DELTA_BYTE_ARRAY values", "all values consumed")
            })? as usize;
            if prefix_len > self.previous.len() {
                return Err(Error::invalid_format(
                    "DELTA_BYTE_ARRAY prefix",
                    format!(
                        "prefix length {prefix_len} exceeds previous value length {}",
                        self.previous.len()
                    ),
                ));
            }
            let suffix = self.suffixes.next_bytes()?;
            let mut value = Vec::with_capacity(prefix_len + suffix.len());
            value.extend_from_slice(&self.previous[..prefix_len]);
            value.extend_from_slice(&suffix);
            self.previous = value.clone();
            *slot = Value::Bytes(value);
            self.idx += 1;
        }
        Ok(())
    }
}
