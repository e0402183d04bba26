use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_format(element: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidFormat {
                element: element.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn invalid_operation(name: impl Into<String>) -> Error {
        Error(ErrorKind::InvalidOperation { name: name.into() }.into())
    }

    pub fn invalid_size(element: impl Into<String>, size: i64) -> Error {
        Error(
            ErrorKind::InvalidSize {
                element: element.into(),
                size,
            }
            .into(),
        )
    }

    pub fn metadata_mismatch(message: impl Into<String>) -> Error {
        Error(
            ErrorKind::MetadataMismatch {
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn duplicate_dictionary() -> Error {
        Error(ErrorKind::DuplicateDictionary.into())
    }

    pub fn missing_dictionary() -> Error {
        Error(ErrorKind::MissingDictionary.into())
    }

    pub fn dictionary_out_of_range(index: usize, len: usize) -> Error {
        Error(ErrorKind::DictionaryOutOfRange { index, len }.into())
    }

    pub fn unsupported_type(name: impl Into<String>) -> Error {
        Error(ErrorKind::UnsupportedType { name: name.into() }.into())
    }

    pub fn unsupported_encoding(encoding: impl Into<String>, type_name: impl Into<String>) -> Error {
        Error(
            ErrorKind::UnsupportedEncoding {
                encoding: encoding.into(),
                type_name: type_name.into(),
            }
            .into(),
        )
    }

    pub fn short_read(element: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::ShortRead {
                element: element.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn short_read_count(element: impl Into<String>, expected: usize, actual: usize) -> Error {
        Error::short_read(
            element,
            format!("expected {expected} bytes or values, got {actual}"),
        )
    }

    pub fn levels(which: &'static str, source: Error) -> Error {
        Error(
            ErrorKind::Levels {
                which,
                source: Box::new(source),
            }
            .into(),
        )
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Error {
        Error(
            ErrorKind::Io {
                context: context.into(),
                source,
            }
            .into(),
        )
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("invalid operation {name}")]
    InvalidOperation { name: String },

    #[error("invalid storage format for '{element}': {message}")]
    InvalidFormat { element: String, message: String },

    #[error("invalid size for '{element}': {size}")]
    InvalidSize { element: String, size: i64 },

    #[error("metadata mismatch: {message}")]
    MetadataMismatch { message: String },

    #[error("more than one dictionary page in column chunk")]
    DuplicateDictionary,

    #[error("dictionary-encoded page in a chunk without a dictionary page")]
    MissingDictionary,

    #[error("dictionary index {index} out of range for dictionary of {len} values")]
    DictionaryOutOfRange { index: usize, len: usize },

    #[error("unsupported type: {name}")]
    UnsupportedType { name: String },

    #[error("unsupported encoding {encoding} for {type_name} values")]
    UnsupportedEncoding { encoding: String, type_name: String },

    #[error("short read of '{element}': {message}")]
    ShortRead { element: String, message: String },

    #[error("failed to decode {which} levels")]
    Levels {
        which: &'static str,
        #[source]
        source: Box<Error>,
    },

    #[error("IO error for '{context}': {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::io("", e)
    }
}
