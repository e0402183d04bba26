//! Column schema definitions: physical storage types, repetition shapes and
//! the per-column descriptor handed to the page reader by the schema catalog.

use std::fmt;

/// Physical storage type of a column's values.
///
/// This is the on-disk representation only; logical interpretation (strings,
/// decimals, timestamps) is layered on top via [`ConvertedType`] and
/// [`LogicalType`] annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicalType {
    Boolean,
    Int32,
    Int64,
    /// Legacy 12-byte integer, kept for compatibility with old writers.
    Int96,
    Float,
    Double,
    ByteArray,
    FixedLenByteArray,
}

impl fmt::Display for PhysicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PhysicalType::Boolean => "BOOLEAN",
            PhysicalType::Int32 => "INT32",
            PhysicalType::Int64 => "INT64",
            PhysicalType::Int96 => "INT96",
            PhysicalType::Float => "FLOAT",
            PhysicalType::Double => "DOUBLE",
            PhysicalType::ByteArray => "BYTE_ARRAY",
            PhysicalType::FixedLenByteArray => "FIXED_LEN_BYTE_ARRAY",
        };
        f.write_str(name)
    }
}

/// Repetition shape of a column within its enclosing group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Repetition {
    Required,
    Optional,
    Repeated,
}

/// Legacy logical-type annotation carried by older writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConvertedType {
    Utf8,
    Enum,
    Json,
    Bson,
}

/// Logical-type marker used by current writers. Only the markers relevant to
/// byte-array interpretation are modeled here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalType {
    String,
    Json,
    Bson,
    Uuid,
}

/// Descriptor of a single leaf column, as resolved by the schema catalog.
///
/// `path` is the flat dotted path of the column within the schema tree; a dot
/// in the path means the column sits inside a nested group. `max_def_level`
/// and `max_rep_level` bound the definition and repetition level streams
/// stored in this column's data pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub path: String,
    pub physical_type: PhysicalType,
    /// Value length for `FIXED_LEN_BYTE_ARRAY` columns.
    pub type_length: Option<u32>,
    pub converted_type: Option<ConvertedType>,
    pub logical_type: Option<LogicalType>,
    pub repetition: Repetition,
    pub max_def_level: u16,
    pub max_rep_level: u16,
}

impl ColumnDescriptor {
    /// Whether the column sits below at least one nested group.
    pub fn is_nested(&self) -> bool {
        self.path.contains('.')
    }

    /// Whether decoded byte arrays should surface as UTF-8 text.
    pub fn is_string(&self) -> bool {
        self.converted_type == Some(ConvertedType::Utf8)
            || self.logical_type == Some(LogicalType::String)
    }
}
