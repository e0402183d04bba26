//! Eager materialization of a chunk's dictionary page.

use std::io::Read;
use std::sync::Arc;

use tessera_common::{error::Error, Result};
use tessera_format::chunk::CompressionCodec;
use tessera_format::page::{DictionaryPageHeader, Encoding, PageHeader};
use tessera_format::schema::ColumnDescriptor;

use super::codec::{page_body_reader, CodecRegistry};
use super::select::select_dictionary_decoder;
use super::values::Value;

/// A fully decoded dictionary page.
///
/// The value vector is materialized eagerly (later data pages only borrow
/// it) and holds raw physical values; logical views such as UTF-8 are
/// applied by the data-page decoders on top.
pub struct DictionaryPage {
    num_values: i32,
    values: Arc<[Value]>,
}

impl DictionaryPage {
    /// Decodes the dictionary page whose header was just read from `reader`.
    ///
    /// The page body must hold exactly `num_values` PLAIN-encoded values;
    /// any shortfall, including a clean end of stream, is fatal.
    pub(crate) fn read(
        reader: &mut dyn Read,
        header: &PageHeader,
        dict_header: &DictionaryPageHeader,
        column: &ColumnDescriptor,
        codec: CompressionCodec,
        codecs: &dyn CodecRegistry,
    ) -> Result<DictionaryPage> {
        let num_values = dict_header.num_values;
        if num_values < 0 {
            return Err(Error::invalid_size(
                "DICTIONARY_PAGE num_values",
                num_values as i64,
            ));
        }
        match dict_header.encoding {
            Encoding::Plain | Encoding::PlainDictionary => {}
            other => {
                return Err(Error::invalid_format(
                    "dictionary page encoding",
                    format!("{other} is not allowed for dictionary values"),
                ))
            }
        }

        let mut decoder = select_dictionary_decoder(column)?;
        let body = page_body_reader(
            reader,
            codec,
            codecs,
            header.compressed_page_size as i64,
            header.uncompressed_page_size as i64,
        )?;
        decoder.init(body)?;

        let mut values = vec![Value::Null; num_values as usize];
        decoder.decode(&mut values)?;

        Ok(DictionaryPage {
            num_values,
            values: values.into(),
        })
    }

    pub fn num_values(&self) -> i32 {
        self.num_values
    }

    pub fn values(&self) -> &Arc<[Value]> {
        &self.values
    }
}
