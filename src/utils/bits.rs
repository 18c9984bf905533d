//! Bit arithmetic on single bytes and packed bit segments.
//!
//! Every position in this crate is MSB-first: bit 0 of a byte is its most significant bit, and
//! bit `n` of a key is bit `n % 8` of byte `n / 8`. Nothing outside this module does shift or mask
//! math directly.

/// Returns the bit (0 or 1) at position `pos` of `byte`, where position 0 is the MSB.
#[inline]
pub fn bit_at(byte: u8, pos: usize) -> u8 {
    debug_assert!(pos < 8);
    (byte >> (7 - pos)) & 1
}

/// Zeroes the `n` low-order bits of `byte`, keeping the high-order ones.
#[inline]
pub fn clear_low_bits(byte: u8, n: usize) -> u8 {
    debug_assert!(n <= 8);
    if n >= 8 {
        0
    } else {
        byte & (0xFF << n)
    }
}

/// Zeroes the `n` high-order bits of `byte`, keeping the low-order ones.
#[inline]
pub fn clear_high_bits(byte: u8, n: usize) -> u8 {
    debug_assert!(n <= 8);
    if n >= 8 {
        0
    } else {
        byte & (0xFF >> n)
    }
}

/// Number of identical leading bits of `a` and `b` within the bit range `[begin, end)`.
/// Returns `end - begin` when the whole range matches.
#[inline]
pub fn matching_bit_run(a: u8, b: u8, begin: usize, end: usize) -> usize {
    debug_assert!(begin <= end && end <= 8);
    if begin == end {
        return 0;
    }
    // Shift the range to the top of the byte and drop everything past `end`.
    let diff = ((a ^ b) << begin) & clear_low_bits(0xFF, 8 - (end - begin));
    (diff.leading_zeros() as usize).min(end - begin)
}

/// Bit `pos` of `key`, counted across byte boundaries.
#[inline]
pub fn key_bit(key: &[u8], pos: usize) -> u8 {
    bit_at(key[pos / 8], pos % 8)
}

/// How many bytes a run of `bit_len` bits occupies when it starts at bit `start` of a key.
///
/// Segments are packed against the key's own byte grid, so a segment that starts or ends inside a
/// byte still owns that whole byte, with the foreign bits zeroed.
#[inline]
pub fn span_bytes(start: usize, bit_len: usize) -> usize {
    (start % 8 + bit_len + 7) / 8
}

/// Appends `segment`, which begins at key bit `at`, to `dst`, which holds key bits up to `at`.
/// When `at` falls inside a byte, that byte is shared and the two halves are OR-ed together.
pub fn splice_segment(dst: &mut Vec<u8>, at: usize, segment: &[u8]) {
    let mut rest = segment;
    if at % 8 != 0 {
        if let (Some(last), Some((first, tail))) = (dst.last_mut(), segment.split_first()) {
            *last |= first;
            rest = tail;
        }
    }
    dst.extend_from_slice(rest);
}
