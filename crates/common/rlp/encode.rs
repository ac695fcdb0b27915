//! Prefix encoding.
//!
//! Only the pieces needed to wrap already encoded items: list headers, and byte
//! strings for building fixtures. Structured values are never re-encoded.
use bytes::BufMut;
use tinyvec::ArrayVec;

use super::constants::{
    RLP_EMPTY_LIST, RLP_LONG_LENGTH_THRESHOLD, RLP_NULL, RLP_SHORT_LIST_MAX,
    RLP_SHORT_STRING_MAX,
};

/// Writes the header of a list whose concatenated children take `total_len` bytes.
pub fn encode_length(total_len: usize, buf: &mut dyn BufMut) {
    encode_header(RLP_EMPTY_LIST, RLP_SHORT_LIST_MAX, total_len, buf);
}

/// Size of the header [`encode_length`] writes for `total_len` bytes of children.
pub fn list_header_length(total_len: usize) -> usize {
    if total_len < RLP_LONG_LENGTH_THRESHOLD {
        1
    } else {
        1 + minimal_be_bytes(total_len).len()
    }
}

/// Encodes `bytes` as an RLP byte string.
pub fn encode_bytes(bytes: &[u8], buf: &mut dyn BufMut) {
    match bytes {
        // for a single byte whose value is in the [0x00, 0x7f] range, that byte is its own RLP encoding.
        [byte] if *byte < RLP_NULL => buf.put_u8(*byte),
        _ => {
            encode_header(RLP_NULL, RLP_SHORT_STRING_MAX, bytes.len(), buf);
            buf.put_slice(bytes);
        }
    }
}

fn encode_header(short_base: u8, long_base: u8, len: usize, buf: &mut dyn BufMut) {
    if len < RLP_LONG_LENGTH_THRESHOLD {
        buf.put_u8(short_base + len as u8);
    } else {
        let len_bytes = minimal_be_bytes(len);
        buf.put_u8(long_base + len_bytes.len() as u8);
        buf.put_slice(&len_bytes);
    }
}

/// Big-endian bytes of `value` without leading zeros.
fn minimal_be_bytes(value: usize) -> ArrayVec<[u8; 8]> {
    let be_bytes = (value as u64).to_be_bytes();
    let start = be_bytes
        .iter()
        .position(|&x| x != 0)
        .unwrap_or(be_bytes.len());
    let mut bytes = ArrayVec::<[u8; 8]>::new();
    bytes.extend_from_slice(&be_bytes[start..]);
    bytes
}
