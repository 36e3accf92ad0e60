//! The bitstream module is the I/O subsystem of the entropy coder.
//!
//! A [`BitStream`] is a byte buffer addressed one bit at a time through two independent
//! cursors. Writes only ever append at the write cursor; reads consume from the read cursor,
//! which can be moved with `seek` but never past the written data.
//!
//! Bit `k` of a stream lives in byte `k / 8`, at bit position `k % 8` counted from the least
//! significant bit. A byte written on a byte boundary is therefore stored unchanged.
//!
//! - buffer: the stream itself, its backing storage and cursor bookkeeping.
//! - bitwriter: appending bits, bytes and bulk bit runs.
//! - bitreader: strict single bit/byte reads and lenient bulk reads.
//!
mod bitcopy;
pub mod bitreader;
pub mod bitwriter;
pub mod buffer;

pub use buffer::BitStream;
