//! The dictionary-indirect decoder.

use std::io::Read;
use std::sync::Arc;

use tessera_common::{error::Error, Result};

use crate::read::hybrid::HybridRleDecoder;
use crate::read::read_exact;

use super::Value;

/// Resolves a hybrid RLE/bit-packed index stream against the chunk's
/// dictionary.
///
/// The dictionary vector is owned by the chunk reader and shared read-only;
/// each data page gets its own index stream. The page body starts with a
/// single bit-width byte, followed by the runs.
pub struct DictionaryDecoder {
    dict: Arc<[Value]>,
    indices: Option<HybridRleDecoder>,
}

impl DictionaryDecoder {
    pub fn new(dict: Arc<[Value]>) -> DictionaryDecoder {
        DictionaryDecoder {
            dict,
            indices: None,
        }
    }

    pub(crate) fn init(&mut self, mut reader: Box<dyn Read>) -> Result<()> {
        let mut width = [0u8; 1];
        read_exact(reader.as_mut(), &mut width, "dictionary index bit width")?;
        let width = width[0] as u32;
        if width > 32 {
            return Err(Error::invalid_size(
                "dictionary index bit width",
                width as i64,
            ));
        }
        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .map_err(|e| Error::io("dictionary index stream", e))?;
        self.indices = Some(HybridRleDecoder::new(data, width));
        Ok(())
    }

    pub(crate) fn decode(&mut self, out: &mut [Value]) -> Result<()> {
        let indices = self
            .indices
            .as_mut()
            .ok_or_else(|| Error::invalid_operation("values decoder used before init"))?;
        for slot in out.iter_mut() {
            let index = indices.next()? as usize;
            let value = self
                .dict
                .get(index)
                .ok_or_else(|| Error::dictionary_out_of_range(index, self.dict.len()))?;
            *slot = value.clone();
        }
        Ok(())
    }
}
