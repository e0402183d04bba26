//! UTF-8 view over byte-array decoders.

use std::io::Read;

use tessera_common::{error::Error, Result};

use super::{Value, ValuesDecoder};

/// Wraps a byte-array-producing decoder so decoded payloads surface as
/// textual values.
///
/// The wrapping is applied at data-page decoder selection; the dictionary
/// keeps raw byte values so other logical views could share it.
pub struct StringDecoder {
    inner: Box<ValuesDecoder>,
}

impl StringDecoder {
    pub fn new(inner: ValuesDecoder) -> StringDecoder {
        StringDecoder {
            inner: Box::new(inner),
        }
    }

    pub(crate) fn init(&mut self, reader: Box<dyn Read>) -> Result<()> {
        self.inner.init(reader)
    }

    pub(crate) fn decode(&mut self, out: &mut [Value]) -> Result<()> {
        self.inner.decode(out)?;
        for slot in out.iter_mut() {
            match std::mem::take(slot) {
                Value::Bytes(bytes) => {
                    let text = String::from_utf8(bytes).map_err(|e| {
                        Error::invalid_format("string value", format!("invalid UTF-8: {e}"))
                    })?;
                    *slot = Value::Str(text);
                }
                other => {
                    *slot = other;
                    return Err(Error::invalid_operation(
                        "string view over a non-byte-array decoder",
                    ));
                }
            }
        }
        Ok(())
    }
}
