//! Bit copy helpers shared by the bulk read and write paths.

/// Read bit `index` of `data`.
#[inline]
pub(super) fn get_bit(data: &[u8], index: usize) -> u8 {
    (data[index >> 3] >> (index & 0x7)) & 0x1
}

/// Set bit `index` of `data` to the low bit of `value`. The other bits of the byte are kept,
/// since unused buffer space is not guaranteed to be zero.
#[inline]
pub(super) fn set_bit(data: &mut [u8], index: usize, value: u8) {
    let shift = index & 0x7;
    let byte = &mut data[index >> 3];
    *byte = (*byte & !(1 << shift)) | ((value & 0x1) << shift);
}

/// Copy as many whole bytes of `bit_count` as possible. Both offsets must be byte aligned.
/// Returns the number of bits copied, always a multiple of 8 (0 if `bit_count < 8`).
pub(super) fn aligned_bit_copy(
    dest: &mut [u8],
    dest_offset: usize,
    src: &[u8],
    src_offset: usize,
    bit_count: usize,
) -> usize {
    debug_assert!(
        dest_offset.is_multiple_of(8) && src_offset.is_multiple_of(8)
    );
    let bytes = bit_count >> 3;
    let d = dest_offset >> 3;
    let s = src_offset >> 3;
    dest[d..d + bytes].copy_from_slice(&src[s..s + bytes]);
    bytes << 3
}

/// Copy `bit_count` bits one at a time. Works for any offsets. Returns `bit_count`.
pub(super) fn unaligned_bit_copy(
    dest: &mut [u8],
    dest_offset: usize,
    src: &[u8],
    src_offset: usize,
    bit_count: usize,
) -> usize {
    for i in 0..bit_count {
        set_bit(dest, dest_offset + i, get_bit(src, src_offset + i));
    }
    bit_count
}
