//! Type- and encoding-specific value decoders.
//!
//! The decoder set is closed: one variant per supported combination of
//! physical type and page encoding, plus the dictionary-indirect decoder and
//! the UTF-8 view wrapper. [`super::select`] owns the mapping from a page's
//! declared encoding to one of these variants.

pub mod delta;
pub mod dictionary;
pub mod plain;
pub mod string;

use std::io::Read;

use tessera_common::Result;

use self::delta::{DeltaBinaryPackedDecoder, DeltaByteArrayDecoder, DeltaLengthByteArrayDecoder};
use self::dictionary::DictionaryDecoder;
use self::plain::{
    BooleanPlainDecoder, BooleanRleDecoder, ByteArrayPlainDecoder, DoublePlainDecoder,
    FloatPlainDecoder, Int32PlainDecoder, Int64PlainDecoder, Int96PlainDecoder,
};
use self::string::StringDecoder;

/// A single decoded value slot.
///
/// Slots start out as [`Value::Null`]; a batch read overwrites only as many
/// leading slots as there are defined values (positions with the maximum
/// definition level), so callers recover null positions from the definition
/// levels rather than from the slots themselves.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Int96([u8; 12]),
    Float(f32),
    Double(f64),
    Bytes(Vec<u8>),
    Str(String),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// The closed set of value decoders.
///
/// Every decoder is initialized once per page from the framed body reader and
/// then asked to fill caller-sized slices; producing fewer values than
/// requested fails the batch.
pub enum ValuesDecoder {
    BooleanPlain(BooleanPlainDecoder),
    BooleanRle(BooleanRleDecoder),
    Int32Plain(Int32PlainDecoder),
    Int64Plain(Int64PlainDecoder),
    Int96Plain(Int96PlainDecoder),
    FloatPlain(FloatPlainDecoder),
    DoublePlain(DoublePlainDecoder),
    ByteArrayPlain(ByteArrayPlainDecoder),
    Int32Delta(DeltaBinaryPackedDecoder<i32>),
    Int64Delta(DeltaBinaryPackedDecoder<i64>),
    DeltaLengthByteArray(DeltaLengthByteArrayDecoder),
    DeltaByteArray(DeltaByteArrayDecoder),
    Dictionary(DictionaryDecoder),
    String(StringDecoder),
}

impl ValuesDecoder {
    pub(crate) fn init(&mut self, reader: Box<dyn Read>) -> Result<()> {
        match self {
            ValuesDecoder::BooleanPlain(d) => d.init(reader),
            ValuesDecoder::BooleanRle(d) => d.init(reader),
            ValuesDecoder::Int32Plain(d) => d.init(reader),
            ValuesDecoder::Int64Plain(d) => d.init(reader),
            ValuesDecoder::Int96Plain(d) => d.init(reader),
            ValuesDecoder::FloatPlain(d) => d.init(reader),
            ValuesDecoder::DoublePlain(d) => d.init(reader),
            ValuesDecoder::ByteArrayPlain(d) => d.init(reader),
            ValuesDecoder::Int32Delta(d) => d.init(reader),
            ValuesDecoder::Int64Delta(d) => d.init(reader),
            ValuesDecoder::DeltaLengthByteArray(d) => d.init(reader),
            ValuesDecoder::DeltaByteArray(d) => d.init(reader),
            ValuesDecoder::Dictionary(d) => d.init(reader),
            ValuesDecoder::String(d) => d.init(reader),
        }
    }

    pub(crate) fn decode(&mut self, out: &mut [Value]) -> Result<()> {
        match self {
            ValuesDecoder::BooleanPlain(d) => d.decode(out),
            ValuesDecoder::BooleanRle(d) => d.decode(out),
            ValuesDecoder::Int32Plain(d) => d.decode(out),
            ValuesDecoder::Int64Plain(d) => d.decode(out),
            ValuesDecoder::Int96Plain(d) => d.decode(out),
            ValuesDecoder::FloatPlain(d) => d.decode(out),
            ValuesDecoder::DoublePlain(d) => d.decode(out),
            ValuesDecoder::ByteArrayPlain(d) => d.decode(out),
            ValuesDecoder::Int32Delta(d) => d.decode(out),
            ValuesDecoder::Int64Delta(d) => d.decode(out),
            ValuesDecoder::DeltaLengthByteArray(d) => d.decode(out),
            ValuesDecoder::DeltaByteArray(d) => d.decode(out),
            ValuesDecoder::Dictionary(d) => d.decode(out),
            ValuesDecoder::String(d) => d.decode(out),
        }
    }
}
