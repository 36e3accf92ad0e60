//! BitWriter: the append side of a [`BitStream`].
//!
//! Every write is checked against the capacity before anything is touched, so a rejected
//! write leaves the buffer and both cursors exactly as they were.

use super::bitcopy::{aligned_bit_copy, set_bit, unaligned_bit_copy};
use super::BitStream;
use crate::error::{post, CabacError, Result};

impl BitStream<'_> {
    /// Append the low bit of `value`.
    pub fn write_bit(&mut self, value: u8) -> Result<()> {
        self.check_capacity(1)?;
        let index = self.write_index;
        set_bit(self.writable()?, index, value);
        self.write_index += 1;
        Ok(())
    }

    /// Append 8 bits. Aligned writes store the byte directly.
    pub fn write_byte(&mut self, value: u8) -> Result<()> {
        self.check_capacity(8)?;
        let index = self.write_index;
        let data = self.writable()?;
        if index.is_multiple_of(8) {
            data[index >> 3] = value;
        } else {
            for i in 0..8 {
                set_bit(data, index + i, value >> i);
            }
        }
        self.write_index += 8;
        Ok(())
    }

    /// Append the first `bit_count` bits of `source`, laid out the same way as the stream.
    ///
    /// When the write cursor is byte aligned the whole bytes go over in one copy and only the
    /// trailing bits are written one by one.
    pub fn write_bits(&mut self, source: &[u8], bit_count: usize) -> Result<()> {
        if bit_count == 0 {
            return Err(post(CabacError::InvalidArgument("writing zero bits")));
        }
        if source.len() << 3 < bit_count {
            return Err(post(CabacError::InvalidArgument(
                "source holds fewer bits than requested",
            )));
        }
        self.check_capacity(bit_count)?;

        let index = self.write_index;
        let dest = self.writable()?;
        let mut bits_copied = 0;

        if index.is_multiple_of(8) && bit_count >= 8 {
            bits_copied = aligned_bit_copy(dest, index, source, 0, bit_count);
            if bits_copied == 0 {
                return Err(post(CabacError::ExecutionFailure(
                    "aligned copy moved no bits",
                )));
            }
        }

        if bits_copied < bit_count {
            bits_copied += unaligned_bit_copy(
                dest,
                index + bits_copied,
                source,
                bits_copied,
                bit_count - bits_copied,
            );
        }

        self.write_index += bits_copied;
        Ok(())
    }

    /// Append every byte of `source`.
    pub fn write_bytes(&mut self, source: &[u8]) -> Result<()> {
        self.write_bits(source, source.len() << 3)
    }
}
