/*!
 * Variable-Length Integers
 *
 * Base-128 little-endian groups: 7 payload bits per byte, high bit set on
 * every group except the last. Signed values use zig-zag
 * (`sign | magnitude << 1`, magnitude = `-v - 1` for negatives).
 */

use crate::core::limits::{VARINT_CONTINUATION, VARINT_MAX_GROUPS, VARINT_PAYLOAD};
use crate::core::{VfsError, VfsResult};

/// Incremental unsigned varint decoder
///
/// Fed one group at a time; completes on the first group without the
/// continuation bit, or after the fifth group.
#[derive(Debug, Default, Clone, Copy)]
pub struct VarintDecoder {
    value: u32,
    groups: usize,
}

impl VarintDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push the next group; returns the value once complete
    #[inline]
    pub fn push(&mut self, group: u8) -> Option<u32> {
        self.value |= u32::from(group & VARINT_PAYLOAD) << (7 * self.groups);
        self.groups += 1;
        if group & VARINT_CONTINUATION == 0 || self.groups == VARINT_MAX_GROUPS {
            Some(self.value)
        } else {
            None
        }
    }

    /// Groups consumed so far
    #[inline]
    pub fn groups(&self) -> usize {
        self.groups
    }
}

/// Map a signed value onto the unsigned zig-zag space
#[inline]
pub const fn zigzag_encode(value: i32) -> u32 {
    let sign = (value < 0) as u32;
    // !v == -v - 1 for negatives
    let magnitude = if value < 0 { !(value as u32) } else { value as u32 };
    (magnitude << 1) | sign
}

#[inline]
pub const fn zigzag_decode(raw: u32) -> i32 {
    let magnitude = raw >> 1;
    if raw & 1 != 0 {
        !magnitude as i32
    } else {
        magnitude as i32
    }
}

/// Number of groups `value` encodes to
#[inline]
pub fn encoded_len(value: u32) -> usize {
    let bits = 32 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

pub fn encode_unsigned(mut value: u32, out: &mut Vec<u8>) {
    loop {
        let group = (value & u32::from(VARINT_PAYLOAD)) as u8;
        value >>= 7;
        if value == 0 {
            out.push(group);
            return;
        }
        out.push(group | VARINT_CONTINUATION);
    }
}

#[inline]
pub fn encode_signed(value: i32, out: &mut Vec<u8>) {
    encode_unsigned(zigzag_encode(value), out);
}

/// Decode an unsigned varint, returning the value and bytes consumed
pub fn decode_unsigned(bytes: &[u8]) -> VfsResult<(u32, usize)> {
    let mut decoder = VarintDecoder::new();
    for &group in bytes {
        if let Some(value) = decoder.push(group) {
            return Ok((value, decoder.groups()));
        }
    }
    Err(VfsError::end_of_data(decoder.groups() + 1, bytes.len()))
}

pub fn decode_signed(bytes: &[u8]) -> VfsResult<(i32, usize)> {
    let (raw, used) = decode_unsigned(bytes)?;
    Ok((zigzag_decode(raw), used))
}
