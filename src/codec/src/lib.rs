#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod baseline;
mod codec;
mod config;
mod dictionary;
mod error;
mod format;
mod index;
mod scan;

#[cfg(test)]
mod tests;

pub use codec::DictionaryCodec;
pub use config::{CodecConfig, QueryStrategy};
pub use dictionary::Dictionary;
pub use error::{CodecError, Result};
pub use index::InvertedIndex;
