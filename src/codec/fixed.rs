/*!
 * Fixed-Width Codec
 * Endian-aware integer and float encoding over byte slices
 */

use crate::core::{VfsError, VfsResult};
use serde::{Deserialize, Serialize};

/// Byte order of a fixed-width value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endian {
    Little,
    Big,
}

/// A value with a fixed encoded size
///
/// Decoding fails with `EndOfData` when fewer than `SIZE` bytes are given;
/// a partial value is never produced.
pub trait FixedWidth: Sized + Copy {
    const SIZE: usize;

    fn decode(bytes: &[u8], endian: Endian) -> VfsResult<Self>;

    fn encode_into(self, out: &mut Vec<u8>, endian: Endian);
}

#[inline]
fn take<const N: usize>(bytes: &[u8]) -> VfsResult<[u8; N]> {
    bytes
        .get(..N)
        .and_then(|head| head.try_into().ok())
        .ok_or_else(|| VfsError::end_of_data(N, bytes.len()))
}

macro_rules! impl_fixed_width {
    ($($ty:ty),* $(,)?) => {$(
        impl FixedWidth for $ty {
            const SIZE: usize = std::mem::size_of::<$ty>();

            #[inline]
            fn decode(bytes: &[u8], endian: Endian) -> VfsResult<Self> {
                let raw = take::<{ std::mem::size_of::<$ty>() }>(bytes)?;
                Ok(match endian {
                    Endian::Little => <$ty>::from_le_bytes(raw),
                    Endian::Big => <$ty>::from_be_bytes(raw),
                })
            }

            #[inline]
            fn encode_into(self, out: &mut Vec<u8>, endian: Endian) {
                match endian {
                    Endian::Little => out.extend_from_slice(&self.to_le_bytes()),
                    Endian::Big => out.extend_from_slice(&self.to_be_bytes()),
                }
            }
        }
    )*};
}

impl_fixed_width!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

/// Decode a 24-bit unsigned value
#[inline]
pub fn decode_u24(bytes: &[u8], endian: Endian) -> VfsResult<u32> {
    let [a, b, c] = take::<3>(bytes)?;
    Ok(match endian {
        Endian::Little => u32::from(a) | u32::from(b) << 8 | u32::from(c) << 16,
        Endian::Big => u32::from(a) << 16 | u32::from(b) << 8 | u32::from(c),
    })
}

/// Decode a 24-bit signed value (sign-extended from bit 23)
#[inline]
pub fn decode_i24(bytes: &[u8], endian: Endian) -> VfsResult<i32> {
    let raw = decode_u24(bytes, endian)?;
    Ok(((raw << 8) as i32) >> 8)
}

/// Encode the low 24 bits of `value`
#[inline]
pub fn encode_u24(value: u32, endian: Endian) -> [u8; 3] {
    let [b0, b1, b2, _] = value.to_le_bytes();
    match endian {
        Endian::Little => [b0, b1, b2],
        Endian::Big => [b2, b1, b0],
    }
}

/// Decode `count` consecutive values
pub fn decode_array<T: FixedWidth>(bytes: &[u8], count: usize, endian: Endian) -> VfsResult<Vec<T>> {
    let needed = count * T::SIZE;
    if bytes.len() < needed {
        return Err(VfsError::end_of_data(needed, bytes.len()));
    }
    bytes[..needed]
        .chunks_exact(T::SIZE)
        .map(|chunk| T::decode(chunk, endian))
        .collect()
}

/// Encode a slice of values back to back
pub fn encode_array<T: FixedWidth>(values: &[T], endian: Endian) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * T::SIZE);
    for value in values {
        value.encode_into(&mut out, endian);
    }
    out
}
