//! BitReader: the consuming side of a [`BitStream`].
//!
//! Single bit and byte reads are strict: they fail with `InvalidResource` when the data runs
//! out. Bulk reads are lenient: they read what is there and report how much that was.

use log::trace;

use super::bitcopy::{aligned_bit_copy, get_bit, unaligned_bit_copy};
use super::BitStream;
use crate::error::{post, CabacError, Result};

impl BitStream<'_> {
    /// Read one bit, returned as 0 or 1.
    pub fn read_bit(&mut self) -> Result<u8> {
        if self.read_index >= self.write_index {
            trace!("Bit read at {} past the written data", self.read_index);
            return Err(CabacError::InvalidResource("no unread bits left"));
        }
        let bit = get_bit(self.data(), self.read_index);
        self.read_index += 1;
        Ok(bit)
    }

    /// Read 8 bits. Aligned reads take the byte directly.
    pub fn read_byte(&mut self) -> Result<u8> {
        if self.read_index + 8 > self.write_index {
            trace!(
                "Byte read at {} with only {} bits left",
                self.read_index,
                self.occupancy()
            );
            return Err(CabacError::InvalidResource("fewer than 8 unread bits left"));
        }
        let index = self.read_index;
        let data = self.data();
        let byte = if index.is_multiple_of(8) {
            data[index >> 3]
        } else {
            (0..8).fold(0_u8, |byte, i| byte | (get_bit(data, index + i) << i))
        };
        self.read_index += 8;
        Ok(byte)
    }

    /// Read up to `bit_count` bits into `dest`. Returns the number of bits actually read,
    /// which is smaller than `bit_count` when the stream runs short. Bits of `dest` past the
    /// ones read are left alone.
    pub fn read_bits(&mut self, dest: &mut [u8], bit_count: usize) -> Result<usize> {
        if bit_count == 0 {
            return Err(post(CabacError::InvalidArgument("reading zero bits")));
        }
        if dest.len() << 3 < bit_count {
            return Err(post(CabacError::InvalidArgument(
                "destination holds fewer bits than requested",
            )));
        }

        let bit_count = bit_count.min(self.occupancy());
        let index = self.read_index;
        let source = self.data();
        let mut bits_copied = 0;

        if index.is_multiple_of(8) && bit_count >= 8 {
            bits_copied = aligned_bit_copy(dest, 0, source, index, bit_count);
            if bits_copied == 0 {
                return Err(post(CabacError::ExecutionFailure(
                    "aligned copy moved no bits",
                )));
            }
        }

        if bits_copied < bit_count {
            bits_copied += unaligned_bit_copy(
                dest,
                bits_copied,
                source,
                index + bits_copied,
                bit_count - bits_copied,
            );
        }

        self.read_index += bits_copied;
        Ok(bits_copied)
    }

    /// Read up to `dest.len()` whole bytes. Returns the number of bytes read; a trailing
    /// partial byte is left unread.
    pub fn read_bytes(&mut self, dest: &mut [u8]) -> Result<usize> {
        if dest.is_empty() {
            return Err(post(CabacError::InvalidArgument("reading zero bytes")));
        }
        let byte_count = dest.len().min(self.occupancy() >> 3);
        if byte_count == 0 {
            return Ok(0);
        }
        Ok(self.read_bits(dest, byte_count << 3)? >> 3)
    }
}
