//! Mapping from a page's declared encoding to a concrete values decoder.

use std::sync::Arc;

use tessera_common::{error::Error, Result};
use tessera_format::page::Encoding;
use tessera_format::schema::{ColumnDescriptor, PhysicalType};

use super::values::delta::{
    DeltaBinaryPackedDecoder, DeltaByteArrayDecoder, DeltaLengthByteArrayDecoder,
};
use super::values::dictionary::DictionaryDecoder;
use super::values::plain::{
    BooleanPlainDecoder, BooleanRleDecoder, ByteArrayPlainDecoder, DoublePlainDecoder,
    FloatPlainDecoder, Int32PlainDecoder, Int64PlainDecoder, Int96PlainDecoder,
};
use super::values::string::StringDecoder;
use super::values::{Value, ValuesDecoder};

/// Selects the values decoder for a data page.
///
/// The deprecated PLAIN_DICTIONARY alias is normalized here, at the single
/// entry point, so nothing downstream ever sees it. Byte-array decoders are
/// wrapped with the UTF-8 view when the column carries a string marker.
pub fn select_values_decoder(
    column: &ColumnDescriptor,
    encoding: Encoding,
    dict: Option<&Arc<[Value]>>,
) -> Result<ValuesDecoder> {
    let encoding = encoding.normalize();
    let decoder = match column.physical_type {
        PhysicalType::Boolean => match encoding {
            Encoding::Plain => ValuesDecoder::BooleanPlain(BooleanPlainDecoder::new()),
            Encoding::Rle => ValuesDecoder::BooleanRle(BooleanRleDecoder::new()),
            Encoding::RleDictionary => dictionary_decoder(dict)?,
            other => return Err(unsupported(other, column)),
        },
        PhysicalType::Int32 => match encoding {
            Encoding::Plain => ValuesDecoder::Int32Plain(Int32PlainDecoder::new()),
            Encoding::DeltaBinaryPacked => {
                ValuesDecoder::Int32Delta(DeltaBinaryPackedDecoder::new())
            }
            Encoding::RleDictionary => dictionary_decoder(dict)?,
            other => return Err(unsupported(other, column)),
        },
        PhysicalType::Int64 => match encoding {
            Encoding::Plain => ValuesDecoder::Int64Plain(Int64PlainDecoder::new()),
            Encoding::DeltaBinaryPacked => {
                ValuesDecoder::Int64Delta(DeltaBinaryPackedDecoder::new())
            }
            Encoding::RleDictionary => dictionary_decoder(dict)?,
            other => return Err(unsupported(other, column)),
        },
        PhysicalType::Int96 => match encoding {
            Encoding::Plain => ValuesDecoder::Int96Plain(Int96PlainDecoder::new()),
            Encoding::RleDictionary => dictionary_decoder(dict)?,
            other => return Err(unsupported(other, column)),
        },
        PhysicalType::Float => match encoding {
            Encoding::Plain => ValuesDecoder::FloatPlain(FloatPlainDecoder::new()),
            Encoding::RleDictionary => dictionary_decoder(dict)?,
            other => return Err(unsupported(other, column)),
        },
        PhysicalType::Double => match encoding {
            Encoding::Plain => ValuesDecoder::DoublePlain(DoublePlainDecoder::new()),
            Encoding::RleDictionary => dictionary_decoder(dict)?,
            other => return Err(unsupported(other, column)),
        },
        PhysicalType::ByteArray => match encoding {
            Encoding::Plain => ValuesDecoder::ByteArrayPlain(ByteArrayPlainDecoder::new(None)),
            Encoding::DeltaLengthByteArray => {
                ValuesDecoder::DeltaLengthByteArray(DeltaLengthByteArrayDecoder::new())
            }
            Encoding::DeltaByteArray => {
                ValuesDecoder::DeltaByteArray(DeltaByteArrayDecoder::new())
            }
            Encoding::RleDictionary => dictionary_decoder(dict)?,
            other => return Err(unsupported(other, column)),
        },
        PhysicalType::FixedLenByteArray => match encoding {
            Encoding::Plain => {
                let len = fixed_type_length(column)?;
                ValuesDecoder::ByteArrayPlain(ByteArrayPlainDecoder::new(Some(len)))
            }
            Encoding::DeltaByteArray => {
                ValuesDecoder::DeltaByteArray(DeltaByteArrayDecoder::new())
            }
            Encoding::RleDictionary => dictionary_decoder(dict)?,
            other => return Err(unsupported(other, column)),
        },
    };

    if matches!(
        column.physical_type,
        PhysicalType::ByteArray | PhysicalType::FixedLenByteArray
    ) && column.is_string()
    {
        return Ok(ValuesDecoder::String(StringDecoder::new(decoder)));
    }
    Ok(decoder)
}

/// Selects the values decoder for a dictionary page.
///
/// Dictionary bodies are always PLAIN-encoded, and boolean dictionaries are
/// not meaningful. No string view is applied here: the dictionary stores raw
/// physical values.
pub fn select_dictionary_decoder(column: &ColumnDescriptor) -> Result<ValuesDecoder> {
    let decoder = match column.physical_type {
        PhysicalType::ByteArray => ValuesDecoder::ByteArrayPlain(ByteArrayPlainDecoder::new(None)),
        PhysicalType::FixedLenByteArray => {
            let len = fixed_type_length(column)?;
            ValuesDecoder::ByteArrayPlain(ByteArrayPlainDecoder::new(Some(len)))
        }
        PhysicalType::Int32 => ValuesDecoder::Int32Plain(Int32PlainDecoder::new()),
        PhysicalType::Int64 => ValuesDecoder::Int64Plain(Int64PlainDecoder::new()),
        PhysicalType::Int96 => ValuesDecoder::Int96Plain(Int96PlainDecoder::new()),
        PhysicalType::Float => ValuesDecoder::FloatPlain(FloatPlainDecoder::new()),
        PhysicalType::Double => ValuesDecoder::DoublePlain(DoublePlainDecoder::new()),
        PhysicalType::Boolean => {
            return Err(Error::unsupported_type(format!(
                "{} for dictionary values",
                column.physical_type
            )))
        }
    };
    Ok(decoder)
}

fn unsupported(encoding: Encoding, column: &ColumnDescriptor) -> Error {
    Error::unsupported_encoding(encoding.to_string(), column.physical_type.to_string())
}

fn dictionary_decoder(dict: Option<&Arc<[Value]>>) -> Result<ValuesDecoder> {
    let dict = dict.ok_or_else(Error::missing_dictionary)?;
    Ok(ValuesDecoder::Dictionary(DictionaryDecoder::new(
        dict.clone(),
    )))
}

fn fixed_type_length(column: &ColumnDescriptor) -> Result<usize> {
    column
        .type_length
        .map(|len| len as usize)
        .ok_or_else(|| Error::invalid_arg("type_length", "fixed-length column without a length"))
}
