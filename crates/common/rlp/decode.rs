use super::{
    constants::{
        RLP_EMPTY_LIST, RLP_LONG_LENGTH_THRESHOLD, RLP_NULL, RLP_SHORT_LIST_MAX,
        RLP_SHORT_STRING_MAX,
    },
    error::RLPDecodeError,
};
use bytes::Bytes;
use ethereum_types::{Address, H160, H256, U256};

/// Trait for decoding RLP encoded slices of data.
/// See <https://ethereum.org/en/developers/docs/data-structures-and-encoding/rlp/#rlp-decoding> for more information.
/// The [`decode_unfinished`](RLPDecode::decode_unfinished) method is used to decode an RLP encoded slice of data and return the decoded value along with the remaining bytes.
/// The [`decode`](RLPDecode::decode) method is used to decode an RLP encoded slice of data and return the decoded value.
/// Implementors need to implement the [`decode_unfinished`](RLPDecode::decode_unfinished) method.
/// While consumers can use the [`decode`](RLPDecode::decode) method to decode the RLP encoded data.
///
/// Every implementation in this crate only accepts the canonical encoding of a value.
pub trait RLPDecode: Sized {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError>;

    fn decode(rlp: &[u8]) -> Result<Self, RLPDecodeError> {
        let (decoded, remaining) = Self::decode_unfinished(rlp)?;
        if !remaining.is_empty() {
            return Err(RLPDecodeError::LengthMismatch);
        }

        Ok(decoded)
    }
}

impl RLPDecode for u64 {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (bytes, rest) = decode_bytes(rlp)?;
        let padded_bytes = static_left_pad(bytes)?;
        Ok((u64::from_be_bytes(padded_bytes), rest))
    }
}

impl RLPDecode for U256 {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (bytes, rest) = decode_bytes(rlp)?;
        let padded_bytes: [u8; 32] = static_left_pad(bytes)?;
        Ok((U256::from_big_endian(&padded_bytes), rest))
    }
}

// Decodes a slice of bytes of a fixed size. If you want to decode a list of elements,
// you should use the Vec<T> implementation (for elements of the same type),
// or use the decode implementation for tuples (for elements of different types)
impl<const N: usize> RLPDecode for [u8; N] {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (decoded_bytes, rest) = decode_bytes(rlp)?;
        let value = decoded_bytes
            .try_into()
            .map_err(|_| RLPDecodeError::LengthMismatch)?;

        Ok((value, rest))
    }
}

impl RLPDecode for Bytes {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (decoded, rest) = decode_bytes(rlp)?;
        Ok((Bytes::copy_from_slice(decoded), rest))
    }
}

impl RLPDecode for H256 {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (value, rest) = RLPDecode::decode_unfinished(rlp)?;
        Ok((H256(value), rest))
    }
}

impl RLPDecode for Address {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (value, rest) = RLPDecode::decode_unfinished(rlp)?;
        Ok((H160(value), rest))
    }
}

// Here we interpret a Vec<T> as a list of elements of the same type.
// If you need to decode a slice of bytes, you should decode it via the
// [u8; N] implementation or similar (Bytes, etc).
impl<T: RLPDecode> RLPDecode for Vec<T> {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (is_list, payload, input_rest) = decode_rlp_item(rlp)?;
        if !is_list {
            return Err(RLPDecodeError::expected_list());
        }

        let mut result = Vec::new();
        let mut current_slice = payload;

        while !current_slice.is_empty() {
            let (item, rest_current_list) =
                T::decode_unfinished(current_slice).map_err(span_error)?;
            result.push(item);
            current_slice = rest_current_list;
        }

        Ok((result, input_rest))
    }
}

impl<T1: RLPDecode, T2: RLPDecode> RLPDecode for (T1, T2) {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (is_list, payload, input_rest) = decode_rlp_item(rlp)?;
        if !is_list {
            return Err(RLPDecodeError::expected_list());
        }

        let (first, first_rest) = T1::decode_unfinished(payload).map_err(span_error)?;
        let (second, second_rest) = T2::decode_unfinished(first_rest).map_err(span_error)?;

        // check that there is no more data to parse after the second element.
        if !second_rest.is_empty() {
            return Err(RLPDecodeError::LengthMismatch);
        }

        Ok(((first, second), input_rest))
    }
}

/// A child running past the end of its parent list means the parent's declared
/// length disagrees with its contents, even if the outer buffer has more bytes.
pub(crate) fn span_error(err: RLPDecodeError) -> RLPDecodeError {
    match err {
        RLPDecodeError::TruncatedInput => RLPDecodeError::LengthMismatch,
        other => other,
    }
}

/// Parses the prefix of the first item in `data`.
/// It returns a 3-element tuple with the following elements:
/// - A boolean indicating if the item is a list or not.
/// - The length of the prefix (0 for a single byte in the [0x00, 0x7f] range).
/// - The length of the payload declared by the prefix.
///
/// The declared payload is not checked against the buffer here, but every byte of
/// the prefix itself is.
fn decode_prefix(data: &[u8]) -> Result<(bool, usize, usize), RLPDecodeError> {
    let first_byte = *data.first().ok_or(RLPDecodeError::TruncatedInput)?;

    match first_byte {
        // A single byte in the [0x00, 0x7f] range is its own encoding
        0..=0x7F => Ok((false, 0, 1)),
        RLP_NULL..=RLP_SHORT_STRING_MAX => {
            let length = (first_byte - RLP_NULL) as usize;
            if length == 1 {
                let byte = *data.get(1).ok_or(RLPDecodeError::TruncatedInput)?;
                if byte < RLP_NULL {
                    return Err(RLPDecodeError::NonCanonicalEncoding);
                }
            }
            Ok((false, 1, length))
        }
        0xB8..=0xBF => {
            let length_of_length = (first_byte - RLP_SHORT_STRING_MAX) as usize;
            let length_bytes = data
                .get(1..length_of_length + 1)
                .ok_or(RLPDecodeError::TruncatedInput)?;
            Ok((false, length_of_length + 1, decode_length(length_bytes)?))
        }
        RLP_EMPTY_LIST..=RLP_SHORT_LIST_MAX => {
            Ok((true, 1, (first_byte - RLP_EMPTY_LIST) as usize))
        }
        0xF8..=0xFF => {
            let length_of_length = (first_byte - RLP_SHORT_LIST_MAX) as usize;
            let length_bytes = data
                .get(1..length_of_length + 1)
                .ok_or(RLPDecodeError::TruncatedInput)?;
            Ok((true, length_of_length + 1, decode_length(length_bytes)?))
        }
    }
}

/// Decodes the big-endian length field of a long-form prefix.
/// The field must be minimal and must describe a payload too long for the short form.
fn decode_length(length_bytes: &[u8]) -> Result<usize, RLPDecodeError> {
    if length_bytes.first() == Some(&0) {
        return Err(RLPDecodeError::NonCanonicalEncoding);
    }
    // A length that doesn't fit in a usize can never be backed by a buffer
    let length = length_bytes
        .iter()
        .try_fold(0usize, |acc, byte| {
            acc.checked_mul(256)?.checked_add(*byte as usize)
        })
        .ok_or(RLPDecodeError::TruncatedInput)?;
    if length < RLP_LONG_LENGTH_THRESHOLD {
        return Err(RLPDecodeError::NonCanonicalEncoding);
    }
    Ok(length)
}

/// Splits `data` into the prefix length, the full item and the bytes after it.
fn split_first_item(data: &[u8]) -> Result<(bool, usize, &[u8], &[u8]), RLPDecodeError> {
    let (is_list, prefix_length, payload_length) = decode_prefix(data)?;
    let end = prefix_length
        .checked_add(payload_length)
        .ok_or(RLPDecodeError::TruncatedInput)?;
    if data.len() < end {
        return Err(RLPDecodeError::TruncatedInput);
    }
    let (item, rest) = data.split_at(end);
    Ok((is_list, prefix_length, item, rest))
}

/// Decodes an RLP item from a slice of bytes.
/// It returns a 3-element tuple with the following elements:
/// - A boolean indicating if the item is a list or not.
/// - The payload of the item, without its prefix.
/// - The remaining bytes after the item.
pub fn decode_rlp_item(data: &[u8]) -> Result<(bool, &[u8], &[u8]), RLPDecodeError> {
    let (is_list, prefix_length, item, rest) = split_first_item(data)?;
    Ok((is_list, &item[prefix_length..], rest))
}

/// Splits an RLP item in two:
/// - The first item including its prefix
/// - The remaining bytes after the item
///
/// It returns a 2-element tuple with the following elements:
/// - The payload of the item, including its prefix.
/// - The remaining bytes after the item.
pub fn get_item_with_prefix(data: &[u8]) -> Result<(&[u8], &[u8]), RLPDecodeError> {
    let (_, _, item, rest) = split_first_item(data)?;
    Ok((item, rest))
}

/// Decodes the payload of an RLP item from a slice of bytes.
/// It returns a 2-element tuple with the following elements:
/// - The payload of the item.
/// - The remaining bytes after the item.
pub(crate) fn decode_bytes(data: &[u8]) -> Result<(&[u8], &[u8]), RLPDecodeError> {
    let (is_list, payload, rest) = decode_rlp_item(data)?;
    if is_list {
        return Err(RLPDecodeError::expected_bytes());
    }
    Ok((payload, rest))
}

/// Pads a slice of bytes with zeros on the left to make it a fixed size slice.
/// The data must be a minimal big-endian integer (no leading zero byte) no wider
/// than the output array.
#[inline]
pub(crate) fn static_left_pad<const N: usize>(data: &[u8]) -> Result<[u8; N], RLPDecodeError> {
    let mut result = [0; N];

    if data.is_empty() {
        return Ok(result);
    }
    if data[0] == 0 {
        return Err(RLPDecodeError::NonCanonicalEncoding);
    }
    if data.len() > N {
        return Err(RLPDecodeError::LengthMismatch);
    }
    result[N - data.len()..].copy_from_slice(data);
    Ok(result)
}
