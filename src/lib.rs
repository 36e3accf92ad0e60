//! Binary arithmetic entropy coder over a bit addressable stream.
//!
//! Version 0.1.0
//!
//! Two layers:
//! - [`BitStream`]: a bit addressable buffer with independent read and write cursors, over
//!   either an owned or a caller supplied buffer.
//! - [`EntropyCoder`]: a 16 bit precision binary arithmetic coder (CABAC style) that reads
//!   symbols from one BitStream and writes code bits to another. Probabilities come either
//!   from adaptive symbol counts or from a fixed split point.
//!
//! The compressed data carries no header and no symbol count. Whoever decodes it has to know
//! how many symbols were encoded and which model was used.
//!
//! Basic usage to compress a file with the bundled binary is as follows:
//!
//! `$> cabac -z test.txt`
//!
//! This will compress the file and create the file test.txt.cabac, and log the number of
//! symbols needed to decompress it again with `cabac -d -n <symbols> test.txt.cabac`.
//!
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod tools;

pub use bitstream::BitStream;
pub use compression::{EntropyCoder, Model};
pub use error::{CabacError, Result};
