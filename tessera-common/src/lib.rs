//! Core definitions (error type and common result handling), relied upon by all
//! tessera-* crates.

pub mod error;
pub mod result;

pub use result::Result;
