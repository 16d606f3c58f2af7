/*!
 * Byte Codec
 * Stateless fixed-width, varint and string encode/decode primitives
 */

pub mod fixed;
pub mod strings;
pub mod varint;

pub use fixed::{decode_array, encode_array, Endian, FixedWidth};
pub use varint::VarintDecoder;
