/*!
 * Stream Codec Operations
 * Fixed-width, varint and string helpers on the cursor
 */

use super::cursor::Stream;
use crate::codec::fixed::{self, Endian, FixedWidth};
use crate::codec::strings;
use crate::codec::varint::{self, VarintDecoder};
use crate::core::{VfsError, VfsResult};

macro_rules! fixed_accessors {
    ($($ty:ty => $read_le:ident, $read_be:ident, $write_le:ident, $write_be:ident);* $(;)?) => {$(
        #[inline]
        pub async fn $read_le(&mut self) -> VfsResult<$ty> {
            self.read_fixed::<$ty>(Endian::Little).await
        }

        #[inline]
        pub async fn $read_be(&mut self) -> VfsResult<$ty> {
            self.read_fixed::<$ty>(Endian::Big).await
        }

        #[inline]
        pub async fn $write_le(&mut self, value: $ty) -> VfsResult<()> {
            self.write_fixed(value, Endian::Little).await
        }

        #[inline]
        pub async fn $write_be(&mut self, value: $ty) -> VfsResult<()> {
            self.write_fixed(value, Endian::Big).await
        }
    )*};
}

impl Stream {
    // ========================================================================
    // Fixed Width
    // ========================================================================

    /// Read one value; fails with `EndOfData` if fewer than `T::SIZE` bytes remain
    pub async fn read_fixed<T: FixedWidth>(&mut self, endian: Endian) -> VfsResult<T> {
        let bytes = self.read_bytes_exact(T::SIZE).await?;
        T::decode(&bytes, endian)
    }

    pub async fn write_fixed<T: FixedWidth>(&mut self, value: T, endian: Endian) -> VfsResult<()> {
        let mut out = Vec::with_capacity(T::SIZE);
        value.encode_into(&mut out, endian);
        self.write(&out).await
    }

    pub async fn read_u8(&mut self) -> VfsResult<u8> {
        self.read_fixed(Endian::Little).await
    }

    pub async fn read_i8(&mut self) -> VfsResult<i8> {
        self.read_fixed(Endian::Little).await
    }

    pub async fn write_u8(&mut self, value: u8) -> VfsResult<()> {
        self.write(&[value]).await
    }

    pub async fn write_i8(&mut self, value: i8) -> VfsResult<()> {
        self.write(&value.to_le_bytes()).await
    }

    fixed_accessors! {
        u16 => read_u16_le, read_u16_be, write_u16_le, write_u16_be;
        i16 => read_i16_le, read_i16_be, write_i16_le, write_i16_be;
        u32 => read_u32_le, read_u32_be, write_u32_le, write_u32_be;
        i32 => read_i32_le, read_i32_be, write_i32_le, write_i32_be;
        u64 => read_u64_le, read_u64_be, write_u64_le, write_u64_be;
        i64 => read_i64_le, read_i64_be, write_i64_le, write_i64_be;
        f32 => read_f32_le, read_f32_be, write_f32_le, write_f32_be;
        f64 => read_f64_le, read_f64_be, write_f64_le, write_f64_be;
    }

    pub async fn read_u24(&mut self, endian: Endian) -> VfsResult<u32> {
        let bytes = self.read_bytes_exact(3).await?;
        fixed::decode_u24(&bytes, endian)
    }

    /// Sign-extended from bit 23
    pub async fn read_i24(&mut self, endian: Endian) -> VfsResult<i32> {
        let bytes = self.read_bytes_exact(3).await?;
        fixed::decode_i24(&bytes, endian)
    }

    /// Writes the low 24 bits of `value`
    pub async fn write_u24(&mut self, value: u32, endian: Endian) -> VfsResult<()> {
        self.write(&fixed::encode_u24(value, endian)).await
    }

    pub async fn write_i24(&mut self, value: i32, endian: Endian) -> VfsResult<()> {
        self.write_u24(value as u32, endian).await
    }

    /// Read `count` consecutive values of `T`
    pub async fn read_array<T: FixedWidth>(&mut self, count: usize, endian: Endian) -> VfsResult<Vec<T>> {
        let needed = count.checked_mul(T::SIZE).ok_or_else(|| {
            VfsError::InvalidArgument(format!("array of {} elements is too large", count))
        })?;
        let bytes = self.read_bytes_exact(needed).await?;
        fixed::decode_array(&bytes, count, endian)
    }

    pub async fn write_array<T: FixedWidth>(&mut self, values: &[T], endian: Endian) -> VfsResult<()> {
        self.write(&fixed::encode_array(values, endian)).await
    }

    // ========================================================================
    // Varints
    // ========================================================================

    /// Read an unsigned varint one group at a time
    ///
    /// Stops after five groups regardless of the continuation bit.
    pub async fn read_uvarint(&mut self) -> VfsResult<u32> {
        let mut decoder = VarintDecoder::new();
        loop {
            let mut group = [0u8; 1];
            if self.read(&mut group).await? == 0 {
                return Err(VfsError::end_of_data(decoder.groups() + 1, decoder.groups()));
            }
            if let Some(value) = decoder.push(group[0]) {
                return Ok(value);
            }
        }
    }

    pub async fn read_svarint(&mut self) -> VfsResult<i32> {
        Ok(varint::zigzag_decode(self.read_uvarint().await?))
    }

    pub async fn write_uvarint(&mut self, value: u32) -> VfsResult<()> {
        let mut out = Vec::with_capacity(varint::encoded_len(value));
        varint::encode_unsigned(value, &mut out);
        self.write(&out).await
    }

    pub async fn write_svarint(&mut self, value: i32) -> VfsResult<()> {
        self.write_uvarint(varint::zigzag_encode(value)).await
    }

    // ========================================================================
    // Strings
    // ========================================================================

    /// Exactly `len` bytes decoded as UTF-8
    pub async fn read_string(&mut self, len: usize) -> VfsResult<String> {
        strings::decode_utf8(self.read_bytes_exact(len).await?)
    }

    /// Raw UTF-8, no terminator or prefix
    pub async fn write_string(&mut self, value: &str) -> VfsResult<()> {
        self.write(value.as_bytes()).await
    }

    /// Bytes up to the next nul; the nul is consumed, end of data also terminates
    pub async fn read_stringz(&mut self) -> VfsResult<String> {
        let mut out = Vec::new();
        let mut byte = [0u8; 1];
        while self.read(&mut byte).await? == 1 && byte[0] != 0 {
            out.push(byte[0]);
        }
        strings::decode_utf8(out)
    }

    /// Fixed `len`-byte field, cut at the first nul
    pub async fn read_stringz_fixed(&mut self, len: usize) -> VfsResult<String> {
        let bytes = self.read_bytes_exact(len).await?;
        strings::decode_utf8(strings::trim_nul(&bytes).to_vec())
    }

    pub async fn write_stringz(&mut self, value: &str) -> VfsResult<()> {
        self.write(&strings::encode_stringz(value)).await
    }

    /// Truncated or nul-padded to exactly `len` bytes
    pub async fn write_stringz_fixed(&mut self, value: &str, len: usize) -> VfsResult<()> {
        self.write(&strings::encode_stringz_fixed(value, len)).await
    }

    /// Varint byte-length prefix followed by UTF-8 bytes
    ///
    /// A prefix claiming more than the remaining data fails with `EndOfData`
    /// before anything is buffered.
    pub async fn read_string_vl(&mut self) -> VfsResult<String> {
        let len = u64::from(self.read_uvarint().await?);
        match self.available().await {
            Ok(available) if len > available => {
                return Err(VfsError::EndOfData {
                    needed: len,
                    got: available,
                });
            }
            Ok(_) | Err(VfsError::NotSupported(_)) => {}
            Err(e) => return Err(e),
        }
        let len = usize::try_from(len).map_err(|_| {
            VfsError::InvalidArgument(format!("string length {} exceeds addressable memory", len))
        })?;
        self.read_string(len).await
    }

    pub async fn write_string_vl(&mut self, value: &str) -> VfsResult<()> {
        let mut out = Vec::with_capacity(value.len() + 5);
        strings::encode_string_vl(value, &mut out)?;
        self.write(&out).await
    }
}
