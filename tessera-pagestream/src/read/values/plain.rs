//! PLAIN decoders: fixed-width little-endian numerics, bit-packed booleans
//! and length-prefixed or fixed-length byte arrays. The boolean RLE decoder
//! also lives here since it shares the plain decoders' framing.

use std::io::Read;

use tessera_common::{error::Error, Result};

use crate::read::hybrid::HybridRleDecoder;
use crate::read::read_exact;

use super::Value;

fn body<'a>(reader: &'a mut Option<Box<dyn Read>>) -> Result<&'a mut dyn Read> {
    reader
        .as_mut()
        .map(|r| r.as_mut() as &mut dyn Read)
        .ok_or_else(|| Error::invalid_operation("values decoder used before init"))
}

/// 1-bit packed booleans, LSB-first within each byte.
#[derive(Default)]
pub struct BooleanPlainDecoder {
    reader: Option<Box<dyn Read>>,
    current: u8,
    bits_left: u32,
}

impl BooleanPlainDecoder {
    pub fn new() -> Self {
        Default::default()
    }

    pub(crate) fn init(&mut self, reader: Box<dyn Read>) -> Result<()> {
        self.reader = Some(reader);
        self.current = 0;
        self.bits_left = 0;
        Ok(())
    }

    pub(crate) fn decode(&mut self, out: &mut [Value]) -> Result<()> {
        let reader = body(&mut self.reader)?;
        for slot in out.iter_mut() {
            if self.bits_left == 0 {
                let mut byte = [0u8; 1];
                read_exact(reader, &mut byte, "BOOLEAN values")?;
                self.current = byte[0];
                self.bits_left = 8;
            }
            *slot = Value::Boolean(self.current & 1 == 1);
            self.current >>= 1;
            self.bits_left -= 1;
        }
        Ok(())
    }
}

/// Booleans as a hybrid run stream of width 1, behind a 4-byte length prefix.
#[derive(Default)]
pub struct BooleanRleDecoder {
    runs: Option<HybridRleDecoder>,
}

impl BooleanRleDecoder {
    pub fn new() -> Self {
        Default::default()
    }

    pub(crate) fn init(&mut self, mut reader: Box<dyn Read>) -> Result<()> {
        let mut len_buf = [0u8; 4];
        read_exact(reader.as_mut(), &mut len_buf, "BOOLEAN RLE length")?;
        let len = u32::from_le_bytes(len_buf) as usize;
        let mut data = vec![0u8; len];
        read_exact(reader.as_mut(), &mut data, "BOOLEAN RLE values")?;
        self.runs = Some(HybridRleDecoder::new(data, 1));
        Ok(())
    }

    pub(crate) fn decode(&mut self, out: &mut [Value]) -> Result<()> {
        let runs = self
            .runs
            .as_mut()
            .ok_or_else(|| Error::invalid_operation("values decoder used before init"))?;
        for slot in out.iter_mut() {
            *slot = Value::Boolean(runs.next()? != 0);
        }
        Ok(())
    }
}

macro_rules! fixed_width_plain_decoder {
    ($name:ident, $width:literal, $elem:literal, |$bytes:ident| $make:expr) => {
        #[derive(Default)]
        pub struct $name {
            reader: Option<Box<dyn Read>>,
        }

        impl $name {
            pub fn new() -> Self {
                Default::default()
            }

            pub(crate) fn init(&mut self, reader: Box<dyn Read>) -> Result<()> {
                self.reader = Some(reader);
                Ok(())
            }

            pub(crate) fn decode(&mut self, out: &mut [Value]) -> Result<()> {
                let reader = body(&mut self.reader)?;
                let mut $bytes = [0u8; $width];
                for slot in out.iter_mut() {
                    read_exact(reader, &mut $bytes, $elem)?;
                    *slot = $make;
                }
                Ok(())
            }
        }
    };
}

fixed_width_plain_decoder!(Int32PlainDecoder, 4, "INT32 values", |b| Value::Int32(
    i32::from_le_bytes(b)
));
fixed_width_plain_decoder!(Int64PlainDecoder, 8, "INT64 values", |b| Value::Int64(
    i64::from_le_bytes(b)
));
fixed_width_plain_decoder!(Int96PlainDecoder, 12, "INT96 values", |b| Value::Int96(b));
fixed_width_plain_decoder!(FloatPlainDecoder, 4, "FLOAT values", |b| Value::Float(
    f32::from_le_bytes(b)
));
fixed_width_plain_decoder!(DoublePlainDecoder, 8, "DOUBLE values", |b| Value::Double(
    f64::from_le_bytes(b)
));

/// Byte arrays: 4-byte little-endian length prefix per value, or fixed
/// `type_length`-sized blocks when constructed for a fixed-length column.
pub struct ByteArrayPlainDecoder {
    type_length: Option<usize>,
    reader: Option<Box<dyn Read>>,
}

impl ByteArrayPlainDecoder {
    pub fn new(type_length: Option<usize>) -> Self {
        ByteArrayPlainDecoder {
            type_length,
            reader: None,
        }
    }

    pub(crate) fn init(&mut self, reader: Box<dyn Read>) -> Result<()> {
        self.reader = Some(reader);
        Ok(())
    }

    pub(crate) fn decode(&mut self, out: &mut [Value]) -> Result<()> {
        let type_length = self.type_length;
        let reader = body(&mut self.reader)?;
        for slot in out.iter_mut() {
            let len = match type_length {
                Some(len) => len,
                None => {
                    let mut len_buf = [0u8; 4];
                    read_exact(reader, &mut len_buf, "BYTE_ARRAY length")?;
                    let len = i32::from_le_bytes(len_buf);
                    if len < 0 {
                        return Err(Error::invalid_size("BYTE_ARRAY length", len as i64));
                    }
                    len as usize
                }
            };
            let mut data = vec![0u8; len];
            read_exact(reader, &mut data, "BYTE_ARRAY values")?;
            *slot = Value::Bytes(data);
        }
        Ok(())
    }
}
