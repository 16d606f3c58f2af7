/*!
 * String Codec
 * Nul-terminated, nul-padded and length-prefixed UTF-8 strings
 */

use super::varint;
use crate::core::{VfsError, VfsResult};

/// Decode UTF-8, rejecting malformed sequences
pub fn decode_utf8(bytes: Vec<u8>) -> VfsResult<String> {
    String::from_utf8(bytes)
        .map_err(|e| VfsError::InvalidArgument(format!("invalid UTF-8 string: {}", e)))
}

/// Bytes before the first nul (all bytes if none)
#[inline]
pub fn trim_nul(bytes: &[u8]) -> &[u8] {
    match bytes.iter().position(|&b| b == 0) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}

/// Encode `value` followed by a nul terminator
pub fn encode_stringz(value: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len() + 1);
    out.extend_from_slice(value.as_bytes());
    out.push(0);
    out
}

/// Encode into exactly `len` bytes: truncated or nul-padded
pub fn encode_stringz_fixed(value: &str, len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    let bytes = value.as_bytes();
    let n = bytes.len().min(len);
    out[..n].copy_from_slice(&bytes[..n]);
    out
}

/// Encode with an unsigned varint byte-length prefix
pub fn encode_string_vl(value: &str, out: &mut Vec<u8>) -> VfsResult<()> {
    let len = u32::try_from(value.len()).map_err(|_| {
        VfsError::InvalidArgument(format!("string too long for varint prefix: {}", value.len()))
    })?;
    varint::encode_unsigned(len, out);
    out.extend_from_slice(value.as_bytes());
    Ok(())
}

/// Decode a varint-prefixed string, returning it and the bytes consumed
pub fn decode_string_vl(bytes: &[u8]) -> VfsResult<(String, usize)> {
    let (len, used) = varint::decode_unsigned(bytes)?;
    let len = len as usize;
    let body = &bytes[used..];
    if body.len() < len {
        return Err(VfsError::end_of_data(len, body.len()));
    }
    Ok((decode_utf8(body[..len].to_vec())?, used + len))
}
