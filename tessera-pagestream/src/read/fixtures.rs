//! Shared test fixtures: a fixed-layout page-header codec, small encoders
//! for the on-disk value formats, and a byte-level page-stream builder.
//!
//! These exist only for tests; the real header codec and block codecs live
//! outside this repo.

use std::io::{Cursor, Read};

use tessera_common::{error::Error, Result};
use tessera_format::chunk::CompressionCodec;
use tessera_format::page::{
    DataPageHeader, DataPageHeaderV2, DictionaryPageHeader, Encoding, PageHeader, PageKind,
};

use super::codec::CodecRegistry;
use super::header::PageHeaderDecoder;
use super::read_exact;

// ---- header codec ----------------------------------------------------------

/// A transparent little-endian page-header layout standing in for the real
/// wire codec: a one-byte kind tag, both size fields, then the kind-specific
/// fields.
pub struct TestHeaderCodec;

impl PageHeaderDecoder for TestHeaderCodec {
    fn read_header(&self, reader: &mut dyn Read) -> Result<PageHeader> {
        let mut tag = [0u8; 1];
        read_exact(reader, &mut tag, "page header")?;
        let uncompressed_page_size = read_i32(reader)?;
        let compressed_page_size = read_i32(reader)?;
        let kind = match tag[0] {
            0 => PageKind::Dictionary(DictionaryPageHeader {
                num_values: read_i32(reader)?,
                encoding: decode_encoding(read_u8(reader)?)?,
            }),
            1 => PageKind::DataV1(DataPageHeader {
                num_values: read_i32(reader)?,
                encoding: decode_encoding(read_u8(reader)?)?,
            }),
            2 => PageKind::DataV2(DataPageHeaderV2 {
                num_values: read_i32(reader)?,
                encoding: decode_encoding(read_u8(reader)?)?,
                repetition_levels_byte_length: read_i32(reader)?,
                definition_levels_byte_length: read_i32(reader)?,
            }),
            3 => PageKind::Index,
            other => {
                return Err(Error::invalid_format(
                    "page header",
                    format!("unknown page kind tag {other}"),
                ))
            }
        };
        Ok(PageHeader {
            uncompressed_page_size,
            compressed_page_size,
            kind,
        })
    }
}

fn read_u8(reader: &mut dyn Read) -> Result<u8> {
    let mut buf = [0u8; 1];
    read_exact(reader, &mut buf, "page header")?;
    Ok(buf[0])
}

fn read_i32(reader: &mut dyn Read) -> Result<i32> {
    let mut buf = [0u8; 4];
    read_exact(reader, &mut buf, "page header")?;
    Ok(i32::from_le_bytes(buf))
}

fn encoding_code(encoding: Encoding) -> u8 {
    match encoding {
        Encoding::Plain => 0,
        Encoding::PlainDictionary => 1,
        Encoding::Rle => 2,
        Encoding::RleDictionary => 3,
        Encoding::DeltaBinaryPacked => 4,
        Encoding::DeltaLengthByteArray => 5,
        Encoding::DeltaByteArray => 6,
    }
}

fn decode_encoding(code: u8) -> Result<Encoding> {
    Ok(match code {
        0 => Encoding::Plain,
        1 => Encoding::PlainDictionary,
        2 => Encoding::Rle,
        3 => Encoding::RleDictionary,
        4 => Encoding::DeltaBinaryPacked,
        5 => Encoding::DeltaLengthByteArray,
        6 => Encoding::DeltaByteArray,
        other => {
            return Err(Error::invalid_format(
                "page header",
                format!("unknown encoding code {other}"),
            ))
        }
    })
}

pub fn write_page_header(buf: &mut Vec<u8>, header: &PageHeader) {
    let tag = match &header.kind {
        PageKind::Dictionary(_) => 0u8,
        PageKind::DataV1(_) => 1,
        PageKind::DataV2(_) => 2,
        PageKind::Index => 3,
    };
    buf.push(tag);
    buf.extend_from_slice(&header.uncompressed_page_size.to_le_bytes());
    buf.extend_from_slice(&header.compressed_page_size.to_le_bytes());
    match &header.kind {
        PageKind::Dictionary(h) => {
            buf.extend_from_slice(&h.num_values.to_le_bytes());
            buf.push(encoding_code(h.encoding));
        }
        PageKind::DataV1(h) => {
            buf.extend_from_slice(&h.num_values.to_le_bytes());
            buf.push(encoding_code(h.encoding));
        }
        PageKind::DataV2(h) => {
            buf.extend_from_slice(&h.num_values.to_le_bytes());
            buf.push(encoding_code(h.encoding));
            buf.extend_from_slice(&h.repetition_levels_byte_length.to_le_bytes());
            buf.extend_from_slice(&h.definition_levels_byte_length.to_le_bytes());
        }
        PageKind::Index => {}
    }
}

// ---- value-stream encoders -------------------------------------------------

pub fn write_uleb128(buf: &mut Vec<u8>, mut v: u64) {
    loop {
        let byte = (v & 0x7f) as u8;
        v >>= 7;
        if v != 0 {
            buf.push(byte | 0x80);
        } else {
            buf.push(byte);
            return;
        }
    }
}

pub fn write_zigzag(buf: &mut Vec<u8>, v: i64) {
    write_uleb128(buf, ((v << 1) ^ (v >> 63)) as u64);
}

/// Packs values LSB-first at the given width. The caller pads the value
/// count so the total bit count lands on a byte boundary.
pub fn pack_bits(values: &[u64], width: u32) -> Vec<u8> {
    let mut buf = vec![0u8; (values.len() * width as usize).div_ceil(8)];
    let mut bit = 0usize;
    for &v in values {
        for i in 0..width {
            if (v >> i) & 1 == 1 {
                buf[bit / 8] |= 1 << (bit % 8);
            }
            bit += 1;
        }
    }
    buf
}

/// A hybrid stream holding all values in bit-packed groups.
pub fn hybrid_stream(values: &[u64], bit_width: u32) -> Vec<u8> {
    let mut padded = values.to_vec();
    while padded.len() % 8 != 0 {
        padded.push(0);
    }
    let groups = (padded.len() / 8) as u64;
    let mut buf = Vec::new();
    write_uleb128(&mut buf, (groups << 1) | 1);
    buf.extend_from_slice(&pack_bits(&padded, bit_width));
    buf
}

pub fn hybrid_levels(levels: &[u16], bit_width: u32) -> Vec<u8> {
    let values: Vec<u64> = levels.iter().map(|&v| v as u64).collect();
    hybrid_stream(&values, bit_width)
}

/// A V1 level stream: 4-byte little-endian length prefix plus the runs.
pub fn size_prefixed(data: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(4 + data.len());
    buf.extend_from_slice(&(data.len() as u32).to_le_bytes());
    buf.extend_from_slice(data);
    buf
}

/// A dictionary-indexed page body: one bit-width byte plus the index runs.
pub fn dict_index_body(bit_width: u8, indices: &[u32]) -> Vec<u8> {
    let values: Vec<u64> = indices.iter().map(|&v| v as u64).collect();
    let mut buf = vec![bit_width];
    buf.extend_from_slice(&hybrid_stream(&values, bit_width as u32));
    buf
}

pub fn plain_i32(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn plain_i64(values: &[i64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn plain_byte_arrays(values: &[&[u8]]) -> Vec<u8> {
    let mut buf = Vec::new();
    for v in values {
        buf.extend_from_slice(&(v.len() as i32).to_le_bytes());
        buf.extend_from_slice(v);
    }
    buf
}

/// A complete DELTA_BINARY_PACKED stream: 128-value blocks split into four
/// 32-value miniblocks, partial miniblocks padded with zero deltas.
pub fn delta_stream(values: &[i64]) -> Vec<u8> {
    const BLOCK: usize = 128;
    const MINIS: usize = 4;
    const PER_MINI: usize = 32;

    let mut buf = Vec::new();
    write_uleb128(&mut buf, BLOCK as u64);
    write_uleb128(&mut buf, MINIS as u64);
    write_uleb128(&mut buf, values.len() as u64);
    write_zigzag(&mut buf, values.first().copied().unwrap_or(0));
    if values.len() <= 1 {
        return buf;
    }

    let deltas: Vec<i64> = values.windows(2).map(|w| w[1].wrapping_sub(w[0])).collect();
    for block in deltas.chunks(BLOCK) {
        let min_delta = block.iter().copied().min().unwrap();
        write_zigzag(&mut buf, min_delta);
        let adjusted: Vec<u64> = block
            .iter()
            .map(|&d| d.wrapping_sub(min_delta) as u64)
            .collect();

        let mut widths = [0u8; MINIS];
        let mut minis: Vec<Vec<u64>> = Vec::new();
        for (m, width_slot) in widths.iter_mut().enumerate() {
            let start = m * PER_MINI;
            if start >= adjusted.len() {
                minis.push(Vec::new());
                continue;
            }
            let end = (start + PER_MINI).min(adjusted.len());
            let mut vals = adjusted[start..end].to_vec();
            vals.resize(PER_MINI, 0);
            *width_slot = vals
                .iter()
                .map(|&v| 64 - v.leading_zeros())
                .max()
                .unwrap_or(0) as u8;
            minis.push(vals);
        }
        buf.extend_from_slice(&widths);
        for (m, vals) in minis.iter().enumerate() {
            if widths[m] > 0 {
                buf.extend_from_slice(&pack_bits(vals, widths[m] as u32));
            }
        }
    }
    buf
}

/// DELTA_LENGTH_BYTE_ARRAY: delta-packed lengths, then the concatenated
/// payloads.
pub fn delta_length_byte_array_stream(values: &[&[u8]]) -> Vec<u8> {
    let lengths: Vec<i64> = values.iter().map(|v| v.len() as i64).collect();
    let mut buf = delta_stream(&lengths);
    for v in values {
        buf.extend_from_slice(v);
    }
    buf
}

/// DELTA_BYTE_ARRAY: delta-packed shared-prefix lengths, then the suffixes
/// as a DELTA_LENGTH_BYTE_ARRAY stream.
pub fn delta_byte_array_stream(values: &[&[u8]]) -> Vec<u8> {
    let mut prefix_lengths = Vec::with_capacity(values.len());
    let mut suffixes: Vec<Vec<u8>> = Vec::with_capacity(values.len());
    let mut previous: &[u8] = b"";
    for &v in values {
        let common = previous
            .iter()
            .zip(v.iter())
            .take_while(|(a, b)| a == b)
            .count();
        prefix_lengths.push(common as i64);
        suffixes.push(v[common..].to_vec());
        previous = v;
    }
    let mut buf = delta_stream(&prefix_lengths);
    let suffix_refs: Vec<&[u8]> = suffixes.iter().map(|v| v.as_slice()).collect();
    buf.extend_from_slice(&delta_length_byte_array_stream(&suffix_refs));
    buf
}

// ---- codecs ----------------------------------------------------------------

/// Treats every non-trivial codec as a byte-wise NOT transform. Useful for
/// pinning down exactly which byte ranges pass through the codec.
pub struct InvertingCodecs;

impl CodecRegistry for InvertingCodecs {
    fn decompress(
        &self,
        codec: CompressionCodec,
        mut input: Box<dyn Read>,
        _compressed_size: u64,
        uncompressed_size: u64,
    ) -> Result<Box<dyn Read>> {
        match codec {
            CompressionCodec::Uncompressed => Ok(Box::new(input.take(uncompressed_size))),
            _ => {
                let mut data = Vec::new();
                input
                    .read_to_end(&mut data)
                    .map_err(|e| Error::io("inverting codec", e))?;
                let inverted: Vec<u8> = data.iter().map(|b| !b).collect();
                Ok(Box::new(Cursor::new(inverted).take(uncompressed_size)))
            }
        }
    }
}

// ---- page-stream builder ---------------------------------------------------

/// Assembles the byte image of a column chunk (optionally preceded by
/// unrelated file content) and tracks the offsets chunk metadata would
/// record.
pub struct PageStream {
    buf: Vec<u8>,
    dict_offset: Option<usize>,
    data_offset: Option<usize>,
}

impl PageStream {
    /// `lead` bytes of unrelated file content precede the chunk.
    pub fn new(lead: usize) -> PageStream {
        PageStream {
            buf: vec![0xee; lead],
            dict_offset: None,
            data_offset: None,
        }
    }

    pub fn push_dictionary_page(&mut self, num_values: i32, encoding: Encoding, body: Vec<u8>) {
        self.push_raw_page(
            PageHeader {
                uncompressed_page_size: body.len() as i32,
                compressed_page_size: body.len() as i32,
                kind: PageKind::Dictionary(DictionaryPageHeader {
                    num_values,
                    encoding,
                }),
            },
            body,
        );
    }

    pub fn push_data_page_v1(&mut self, num_values: i32, encoding: Encoding, body: Vec<u8>) {
        self.push_raw_page(
            PageHeader {
                uncompressed_page_size: body.len() as i32,
                compressed_page_size: body.len() as i32,
                kind: PageKind::DataV1(DataPageHeader {
                    num_values,
                    encoding,
                }),
            },
            body,
        );
    }

    pub fn push_raw_page(&mut self, header: PageHeader, body: Vec<u8>) {
        match &header.kind {
            PageKind::Dictionary(_) => {
                if self.dict_offset.is_none() {
                    self.dict_offset = Some(self.buf.len());
                }
            }
            _ => {
                if self.data_offset.is_none() {
                    self.data_offset = Some(self.buf.len());
                }
            }
        }
        write_page_header(&mut self.buf, &header);
        self.buf.extend_from_slice(&body);
    }

    /// Dead bytes between pages, as left by writers that realign chunks.
    pub fn push_padding(&mut self, n: usize) {
        self.buf.resize(self.buf.len() + n, 0xee);
    }

    /// Records the current end of the stream as the data-page offset,
    /// overriding the automatic first-data-page position.
    pub fn mark_data_page_offset(&mut self) {
        self.data_offset = Some(self.buf.len());
    }

    fn chunk_start(&self) -> usize {
        self.dict_offset
            .or(self.data_offset)
            .unwrap_or(self.buf.len())
    }

    /// Total compressed size of the chunk, measured from its first page.
    pub fn total_size(&self) -> usize {
        self.buf.len() - self.chunk_start()
    }

    pub fn data_page_offset(&self) -> usize {
        self.data_offset.unwrap_or(self.buf.len())
    }

    pub fn dictionary_page_offset(&self) -> Option<usize> {
        self.dict_offset
    }

    pub fn file_bytes(&self) -> Vec<u8> {
        self.buf.clone()
    }
}
