//! BitStream: a bit addressable buffer with independent read and write cursors.
//!
//! The backing bytes are either owned by the stream (allocated or copied by it, released when
//! the stream is cleared or dropped) or borrowed from the caller (never released). Which one
//! applies is tracked per stream by [`Storage`].

use log::trace;

use crate::error::{post, CabacError, Result};

/// Backing bytes of a [`BitStream`].
#[derive(Debug)]
enum Storage<'a> {
    /// Allocated by the stream.
    Owned(Vec<u8>),
    /// Caller buffer the stream may write into.
    Borrowed(&'a mut [u8]),
    /// Caller buffer the stream may only read.
    Shared(&'a [u8]),
}

impl Storage<'_> {
    fn bytes(&self) -> &[u8] {
        match self {
            Storage::Owned(buffer) => buffer.as_slice(),
            Storage::Borrowed(buffer) => &buffer[..],
            Storage::Shared(buffer) => *buffer,
        }
    }

    fn bytes_mut(&mut self) -> Option<&mut [u8]> {
        match self {
            Storage::Owned(buffer) => Some(buffer.as_mut_slice()),
            Storage::Borrowed(buffer) => Some(&mut buffer[..]),
            Storage::Shared(_) => None,
        }
    }
}

/// Allocate a zero filled owned buffer, reporting allocation failure instead of aborting.
fn allocate(bytes: usize) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(bytes)
        .map_err(|_| post(CabacError::OutOfMemory { bytes }))?;
    buffer.resize(bytes, 0);
    Ok(buffer)
}

/// Bit addressable buffer. Invariant: `read_index <= write_index <= capacity()`.
#[derive(Debug)]
pub struct BitStream<'a> {
    storage: Storage<'a>,
    /// Next bit to read.
    pub(super) read_index: usize,
    /// Next bit to write.
    pub(super) write_index: usize,
}

impl BitStream<'static> {
    /// Create an empty stream with no buffer. Both cursors are at 0.
    pub fn new() -> Self {
        Self {
            storage: Storage::Owned(Vec::new()),
            read_index: 0,
            write_index: 0,
        }
    }

    /// Create an empty stream owning a buffer of at least `size_in_bits` bits (rounded up to
    /// whole bytes).
    pub fn with_capacity(size_in_bits: usize) -> Result<Self> {
        let mut stream = Self::new();
        stream.resize_capacity(size_in_bits)?;
        Ok(stream)
    }

    /// Create a fully written stream holding its own copy of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut stream = Self::new();
        stream.assign_bytes(bytes)?;
        Ok(stream)
    }
}

impl Default for BitStream<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> BitStream<'a> {
    /// Create a stream over a caller buffer. With `written` set the buffer counts as fully
    /// written and can be read right away; otherwise the stream starts empty and appends into
    /// it. The buffer is never released by the stream.
    pub fn borrowed(buffer: &'a mut [u8], written: bool) -> Self {
        let write_index = if written { buffer.len() << 3 } else { 0 };
        Self {
            storage: Storage::Borrowed(buffer),
            read_index: 0,
            write_index,
        }
    }

    /// Create a fully written, read-only stream over a caller buffer.
    pub fn shared(buffer: &'a [u8]) -> Self {
        Self {
            write_index: buffer.len() << 3,
            storage: Storage::Shared(buffer),
            read_index: 0,
        }
    }

    /// Backing bytes, including any not yet written.
    pub fn data(&self) -> &[u8] {
        self.storage.bytes()
    }

    /// Capacity in bits.
    pub fn capacity(&self) -> usize {
        self.storage.bytes().len() << 3
    }

    /// Bits written but not yet read.
    pub fn occupancy(&self) -> usize {
        self.write_index - self.read_index
    }

    /// Unread bits rounded up to whole bytes.
    pub fn byte_occupancy(&self) -> usize {
        self.occupancy().div_ceil(8)
    }

    pub fn read_index(&self) -> usize {
        self.read_index
    }

    pub fn write_index(&self) -> usize {
        self.write_index
    }

    /// True when the stream allocated its buffer and will release it.
    pub fn is_owned(&self) -> bool {
        matches!(self.storage, Storage::Owned(_))
    }

    /// Drop the current buffer and allocate a new owned one of `size_in_bits` bits (rounded up
    /// to whole bytes). Both cursors return to 0. Returns the requested size.
    pub fn resize_capacity(&mut self, size_in_bits: usize) -> Result<usize> {
        if size_in_bits == 0 {
            return Err(post(CabacError::InvalidArgument("capacity of zero bits")));
        }
        self.clear();
        self.storage = Storage::Owned(allocate(size_in_bits.div_ceil(8))?);
        Ok(size_in_bits)
    }

    /// Move the read cursor. Offsets past the written data stop at `write_index`.
    /// There is no way to move the write cursor: writes only append.
    pub fn seek(&mut self, bit_offset: usize) {
        self.read_index = bit_offset.min(self.write_index);
    }

    /// Replace the contents with an owned copy of `other`, cursors included.
    pub fn assign(&mut self, other: &BitStream<'_>) -> Result<()> {
        let mut buffer = allocate(other.data().len())?;
        buffer.copy_from_slice(other.data());
        self.storage = Storage::Owned(buffer);
        self.read_index = other.read_index;
        self.write_index = other.write_index;
        Ok(())
    }

    /// Replace the contents with an owned copy of `bytes`. The stream is fully written.
    pub fn assign_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Err(post(CabacError::InvalidArgument("assigning zero bytes")));
        }
        self.clear();
        let mut buffer = allocate(bytes.len())?;
        buffer.copy_from_slice(bytes);
        self.storage = Storage::Owned(buffer);
        self.write_index = bytes.len() << 3;
        Ok(())
    }

    /// Reset both cursors and release the buffer. A borrowed buffer is only let go of.
    pub fn clear(&mut self) {
        self.reset();
        self.storage = Storage::Owned(Vec::new());
    }

    /// Reset both cursors, keeping the buffer and its capacity.
    pub fn reset(&mut self) {
        self.read_index = 0;
        self.write_index = 0;
    }

    /// True when every written bit has been read.
    pub fn is_empty(&self) -> bool {
        self.read_index == self.write_index
    }

    /// True when the write cursor has reached the capacity.
    pub fn is_full(&self) -> bool {
        self.write_index == self.capacity()
    }

    /// Fail with `CapacityLimit` unless `bits` more bits fit behind the write cursor.
    pub(super) fn check_capacity(&self, bits: usize) -> Result<()> {
        let available = self.capacity() - self.write_index;
        if bits > available {
            trace!(
                "Write of {} bits rejected, {} bits available",
                bits,
                available
            );
            return Err(CabacError::CapacityLimit {
                needed: bits,
                available,
            });
        }
        Ok(())
    }

    /// Mutable backing bytes, or `InvalidResource` for a read-only view.
    pub(super) fn writable(&mut self) -> Result<&mut [u8]> {
        self.storage
            .bytes_mut()
            .ok_or_else(|| post(CabacError::InvalidResource("stream is a read-only view")))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn new_test() {
        let bs = BitStream::new();
        assert_eq!(bs.capacity(), 0);
        assert_eq!(bs.read_index(), 0);
        assert_eq!(bs.write_index(), 0);
        assert!(bs.is_empty());
        assert!(bs.is_full());
    }

    #[test]
    fn with_capacity_rounds_up_test() {
        let bs = BitStream::with_capacity(13).unwrap();
        assert_eq!(bs.capacity(), 16);
        assert_eq!(bs.data().len(), 2);
        assert!(bs.is_owned());
        assert!(bs.is_empty());
        assert!(!bs.is_full());
    }

    #[test]
    fn with_capacity_zero_test() {
        assert!(matches!(
            BitStream::with_capacity(0),
            Err(CabacError::InvalidArgument(_))
        ));
    }

    #[test]
    fn borrowed_flag_test() {
        let mut buf = [0xa5_u8, 0x5a];
        {
            let bs = BitStream::borrowed(&mut buf, true);
            assert_eq!(bs.occupancy(), 16);
            assert!(bs.is_full());
            assert!(!bs.is_owned());
        }
        let bs = BitStream::borrowed(&mut buf, false);
        assert_eq!(bs.occupancy(), 0);
        assert_eq!(bs.capacity(), 16);
    }

    #[test]
    fn borrowed_buffer_survives_clear_test() {
        let mut buf = [1_u8, 2, 3];
        {
            let mut bs = BitStream::borrowed(&mut buf, true);
            bs.clear();
            assert_eq!(bs.capacity(), 0);
            assert!(bs.is_owned());
        }
        assert_eq!(buf, [1, 2, 3]);
    }

    #[test]
    fn from_bytes_test() {
        let src = [7_u8, 8, 9];
        let bs = BitStream::from_bytes(&src).unwrap();
        assert_eq!(bs.data(), &src);
        assert_eq!(bs.occupancy(), 24);
        assert!(bs.is_owned());
        assert!(BitStream::from_bytes(&[]).is_err());
    }

    #[test]
    fn occupancy_test() {
        let mut bs = BitStream::from_bytes(&[0_u8; 4]).unwrap();
        bs.seek(3);
        assert_eq!(bs.occupancy(), 29);
        assert_eq!(bs.byte_occupancy(), 4);
        bs.seek(25);
        assert_eq!(bs.occupancy(), 7);
        assert_eq!(bs.byte_occupancy(), 1);
    }

    #[test]
    fn seek_clamp_test() {
        let mut bs = BitStream::from_bytes(&[0xff_u8; 2]).unwrap();
        bs.seek(5);
        assert_eq!(bs.read_index(), 5);
        bs.seek(1000);
        assert_eq!(bs.read_index(), 16);
        assert!(bs.is_empty());
        bs.seek(0);
        assert_eq!(bs.read_index(), 0);
    }

    #[test]
    fn reset_and_clear_test() {
        let mut bs = BitStream::from_bytes(&[1_u8, 2]).unwrap();
        bs.seek(4);
        bs.reset();
        assert_eq!(bs.read_index(), 0);
        assert_eq!(bs.write_index(), 0);
        assert_eq!(bs.capacity(), 16);

        bs.clear();
        assert_eq!(bs.capacity(), 0);
        assert!(bs.data().is_empty());
    }

    #[test]
    fn resize_capacity_test() {
        let mut bs = BitStream::from_bytes(&[1_u8, 2]).unwrap();
        assert_eq!(bs.resize_capacity(33).unwrap(), 33);
        assert_eq!(bs.capacity(), 40);
        assert_eq!(bs.write_index(), 0);
        assert!(bs.resize_capacity(0).is_err());
    }

    #[test]
    fn out_of_memory_test() {
        assert!(matches!(
            BitStream::with_capacity(usize::MAX),
            Err(CabacError::OutOfMemory { .. })
        ));

        // the old buffer is already gone when the new one fails
        let mut bs = BitStream::from_bytes(&[1_u8, 2]).unwrap();
        assert_eq!(
            bs.resize_capacity(usize::MAX - 7),
            Err(CabacError::OutOfMemory {
                bytes: (usize::MAX - 7).div_ceil(8)
            })
        );
        assert_eq!(bs.capacity(), 0);
        assert!(bs.is_empty());
    }

    #[test]
    fn assign_test() {
        let mut src = BitStream::from_bytes(&[0xde_u8, 0xad]).unwrap();
        src.seek(3);
        let mut bs = BitStream::new();
        bs.assign(&src).unwrap();
        assert_eq!(bs.data(), src.data());
        assert_eq!(bs.read_index(), 3);
        assert_eq!(bs.write_index(), 16);

        bs.assign_bytes(&[0xbe]).unwrap();
        assert_eq!(bs.data(), &[0xbe]);
        assert_eq!(bs.read_index(), 0);
        assert_eq!(bs.occupancy(), 8);
    }

    #[test]
    fn shared_is_read_only_test() {
        let buf = [0_u8; 2];
        let mut bs = BitStream::shared(&buf);
        assert!(bs.is_full());
        bs.reset();
        assert!(matches!(bs.writable(), Err(CabacError::InvalidResource(_))));
    }
}
