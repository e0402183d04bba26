//! The hybrid RLE / bit-packed run format.
//!
//! A stream is a sequence of runs, each introduced by a ULEB128 indicator.
//! An odd indicator announces `(indicator >> 1) * 8` bit-packed values; an
//! even one announces `indicator >> 1` repetitions of a single value stored
//! in `ceil(bit_width / 8)` little-endian bytes. Level streams, boolean RLE
//! values and dictionary index streams all use this format, differing only in
//! bit width and outer framing.

use tessera_common::{error::Error, Result};

use super::bits::BitReader;

pub(crate) struct HybridRleDecoder {
    bits: BitReader,
    bit_width: u32,
    rle_value: u64,
    rle_remaining: usize,
    packed_remaining: usize,
}

impl HybridRleDecoder {
    pub fn new(data: Vec<u8>, bit_width: u32) -> HybridRleDecoder {
        debug_assert!(bit_width <= 32);
        HybridRleDecoder {
            bits: BitReader::new(data),
            bit_width,
            rle_value: 0,
            rle_remaining: 0,
            packed_remaining: 0,
        }
    }

    /// Produces the next value, pulling in a fresh run when the current one
    /// is exhausted. Running out of buffered runs mid-request is a short
    /// read.
    pub fn next(&mut self) -> Result<u64> {
        loop {
            if self.rle_remaining > 0 {
                self.rle_remaining -= 1;
                return Ok(self.rle_value);
            }
            if self.packed_remaining > 0 {
                self.packed_remaining -= 1;
                return self.bits.read_bits(self.bit_width).ok_or_else(|| {
                    Error::short_read("bit-packed run", "stream ended inside a run")
                });
            }
            self.next_run()?;
        }
    }

    fn next_run(&mut self) -> Result<()> {
        let indicator = self
            .bits
            .read_uleb128()
            .ok_or_else(|| Error::short_read("hybrid run header", "stream exhausted"))?;
        if indicator & 1 == 1 {
            let groups = (indicator >> 1) as usize;
            self.packed_remaining = groups.saturating_mul(8);
        } else {
            let count = (indicator >> 1) as usize;
            let value_bytes = self.bit_width.div_ceil(8) as usize;
            let mut value = 0u64;
            if value_bytes > 0 {
                let bytes = self.bits.read_aligned(value_bytes).ok_or_else(|| {
                    Error::short_read("RLE run value", "stream ended inside a run header")
                })?;
                for (i, b) in bytes.iter().enumerate() {
                    value |= (*b as u64) << (8 * i);
                }
            }
            self.rle_value = value;
            self.rle_remaining = count;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::HybridRleDecoder;

    fn collect(decoder: &mut HybridRleDecoder, n: usize) -> Vec<u64> {
        (0..n).map(|_| decoder.next().unwrap()).collect()
    }

    #[test]
    fn test_rle_run() {
        // indicator 10 << 1, value 7 in one byte (width 3)
        let mut decoder = HybridRleDecoder::new(vec![20, 7], 3);
        assert_eq!(collect(&mut decoder, 10), vec![7; 10]);
        assert!(decoder.next().is_err());
    }

    #[test]
    fn test_bit_packed_run() {
        // One group of 8 values at width 1: indicator (1 << 1) | 1 = 3,
        // then 0b01010101.
        let mut decoder = HybridRleDecoder::new(vec![3, 0x55], 1);
        assert_eq!(collect(&mut decoder, 8), vec![1, 0, 1, 0, 1, 0, 1, 0]);
    }

    #[test]
    fn test_mixed_runs() {
        // RLE run of 4 x 2, then one bit-packed group of 8 at width 2:
        // values 0,1,2,3,0,1,2,3 -> bytes 0b11100100 x2.
        let data = vec![8, 2, 3, 0xe4, 0xe4];
        let mut decoder = HybridRleDecoder::new(data, 2);
        assert_eq!(
            collect(&mut decoder, 12),
            vec![2, 2, 2, 2, 0, 1, 2, 3, 0, 1, 2, 3]
        );
    }

    #[test]
    fn test_width_zero_rle_yields_zeros() {
        // Width 0: the RLE value occupies zero bytes.
        let mut decoder = HybridRleDecoder::new(vec![200, 1], 0);
        assert_eq!(collect(&mut decoder, 100), vec![0; 100]);
    }

    #[test]
    fn test_two_byte_rle_value() {
        // Width 9 forces a two-byte LE run value.
        let mut decoder = HybridRleDecoder::new(vec![6, 0x34, 0x01], 9);
        assert_eq!(collect(&mut decoder, 3), vec![0x134; 3]);
    }

    #[test]
    fn test_exhausted_stream_is_short_read() {
        let mut decoder = HybridRleDecoder::new(vec![], 2);
        assert!(decoder.next().is_err());
    }

    #[test]
    fn test_truncated_bit_packed_run() {
        // Two groups announced, only one byte of width-1 data present.
        let mut decoder = HybridRleDecoder::new(vec![5, 0xff], 1);
        assert_eq!(collect(&mut decoder, 8), vec![1; 8]);
        assert!(decoder.next().is_err());
    }
}
