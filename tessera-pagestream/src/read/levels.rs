//! Definition- and repetition-level decoding.
//!
//! Level streams come in two shapes: a stored hybrid RLE/bit-packed stream,
//! or nothing at all. Non-nested REQUIRED columns omit the definition stream
//! (every value is defined at the maximum level) and non-nested non-REPEATED
//! columns omit the repetition stream (every value starts its own record).
//! The constant variant synthesizes those omitted streams so page code never
//! has to know which case it is in.

use std::io::Read;

use tessera_common::{error::Error, Result};

use super::hybrid::HybridRleDecoder;
use super::read_exact;

/// Bits needed to store levels in `0..=max`.
pub fn level_bit_width(max: u16) -> u32 {
    u16::BITS - max.leading_zeros()
}

/// A decoder for one level stream of one page.
pub enum LevelDecoder {
    /// Synthesizes an omitted stream: yields `value` indefinitely.
    Constant { value: u16, max: u16 },
    /// Decodes a stored hybrid RLE/bit-packed stream.
    Hybrid {
        runs: HybridRleDecoder,
        bit_width: u32,
        max: u16,
    },
}

impl LevelDecoder {
    /// First-generation framing: a 4-byte little-endian length prefix
    /// followed by that many bytes of run data. Returns the number of bytes
    /// consumed from the stream (zero for the constant variant).
    pub(crate) fn init_size_prefixed(&mut self, reader: &mut dyn Read) -> Result<usize> {
        match self {
            LevelDecoder::Constant { .. } => Ok(0),
            // A width-0 stream (max level 0) is never stored on disk.
            LevelDecoder::Hybrid { bit_width: 0, .. } => Ok(0),
            LevelDecoder::Hybrid {
                runs, bit_width, ..
            } => {
                let mut len_buf = [0u8; 4];
                read_exact(reader, &mut len_buf, "level stream length")?;
                let len = u32::from_le_bytes(len_buf) as usize;
                let mut data = vec![0u8; len];
                read_exact(reader, &mut data, "level stream")?;
                *runs = HybridRleDecoder::new(data, *bit_width);
                Ok(4 + len)
            }
        }
    }

    /// Second-generation framing: the page header already delimited the
    /// stream, so the exact byte slice is handed over directly.
    pub(crate) fn init_slice(&mut self, data: Vec<u8>) {
        if let LevelDecoder::Hybrid {
            runs, bit_width, ..
        } = self
        {
            *runs = HybridRleDecoder::new(data, *bit_width);
        }
    }

    /// Fills `out` completely or fails.
    pub fn decode(&mut self, out: &mut [u16]) -> Result<()> {
        match self {
            LevelDecoder::Constant { value, .. } => {
                out.fill(*value);
                Ok(())
            }
            LevelDecoder::Hybrid { bit_width: 0, .. } => {
                out.fill(0);
                Ok(())
            }
            LevelDecoder::Hybrid { runs, max, .. } => {
                for slot in out.iter_mut() {
                    let v = runs.next()?;
                    if v > *max as u64 {
                        return Err(Error::invalid_format(
                            "level stream",
                            format!("level {v} exceeds maximum {max}"),
                        ));
                    }
                    *slot = v as u16;
                }
                Ok(())
            }
        }
    }

    pub fn max_level(&self) -> u16 {
        match self {
            LevelDecoder::Constant { max, .. } => *max,
            LevelDecoder::Hybrid { max, .. } => *max,
        }
    }
}

/// Recipe for building a fresh [`LevelDecoder`] per page.
///
/// The chunk reader decides once, from the column shape, whether a stream is
/// stored or synthesized; every page then gets its own decoder instance
/// without revisiting that decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelFactory {
    Constant { value: u16, max: u16 },
    Hybrid { bit_width: u32, max: u16 },
}

impl LevelFactory {
    pub fn new_decoder(&self) -> LevelDecoder {
        match *self {
            LevelFactory::Constant { value, max } => LevelDecoder::Constant { value, max },
            LevelFactory::Hybrid { bit_width, max } => LevelDecoder::Hybrid {
                runs: HybridRleDecoder::new(Vec::new(), bit_width),
                bit_width,
                max,
            },
        }
    }
}
