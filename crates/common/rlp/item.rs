use super::{
    constants::DEFAULT_MAX_DEPTH,
    decode::{decode_rlp_item, get_item_with_prefix, span_error, RLPDecode},
    error::RLPDecodeError,
};
use ethereum_types::{Address, U256};

/// # Decoded RLP tree
///
/// An item decoded from an untrusted buffer. Every item keeps the exact sub-slice of
/// the source buffer it was decoded from (see [`raw_encoding`](RLPItem::raw_encoding)),
/// so callers can hash or re-emit the bytes as received instead of re-encoding
/// decoded values.
///
/// Items borrow from the source buffer, which must outlive them.
///
/// # Examples
///
/// ```
/// # use ethguard_rlp::item::RLPItem;
/// let bytes = [0xc5, 0x83, b'c', b'a', b't', 0x05];
/// let item = RLPItem::decode(&bytes).unwrap();
/// let items = item.as_list().unwrap();
///
/// assert_eq!(items[0].as_bytes().unwrap(), b"cat");
/// assert_eq!(items[0].raw_encoding(), &[0x83, b'c', b'a', b't']);
/// assert_eq!(items[1].as_u64().unwrap(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RLPItem<'a> {
    Bytes { raw: &'a [u8], payload: &'a [u8] },
    List { raw: &'a [u8], items: Vec<RLPItem<'a>> },
}

impl<'a> RLPItem<'a> {
    /// Decodes `buf` as exactly one item, allowing at most [`DEFAULT_MAX_DEPTH`]
    /// levels of nested lists.
    pub fn decode(buf: &'a [u8]) -> Result<Self, RLPDecodeError> {
        Self::decode_with_max_depth(buf, DEFAULT_MAX_DEPTH)
    }

    /// Decodes `buf` as exactly one item. Lists nested more than `max_depth` levels
    /// deep (the outermost list being the first level) are rejected before any
    /// recursion into them happens.
    pub fn decode_with_max_depth(
        buf: &'a [u8],
        max_depth: usize,
    ) -> Result<Self, RLPDecodeError> {
        let (item, rest) = Self::decode_unfinished(buf, 0, max_depth)?;
        if !rest.is_empty() {
            return Err(RLPDecodeError::LengthMismatch);
        }
        Ok(item)
    }

    fn decode_unfinished(
        buf: &'a [u8],
        depth: usize,
        max_depth: usize,
    ) -> Result<(Self, &'a [u8]), RLPDecodeError> {
        let (raw, rest) = get_item_with_prefix(buf)?;
        let (is_list, payload, _) = decode_rlp_item(raw)?;
        if !is_list {
            return Ok((RLPItem::Bytes { raw, payload }, rest));
        }
        if depth >= max_depth {
            return Err(RLPDecodeError::DepthLimitExceeded(max_depth));
        }

        let mut items = Vec::new();
        let mut current_slice = payload;
        while !current_slice.is_empty() {
            let (item, rest_current_list) =
                Self::decode_unfinished(current_slice, depth + 1, max_depth)
                    .map_err(span_error)?;
            items.push(item);
            current_slice = rest_current_list;
        }
        Ok((RLPItem::List { raw, items }, rest))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, RLPItem::List { .. })
    }

    /// The bytes this item was decoded from, prefix included.
    pub fn raw_encoding(&self) -> &'a [u8] {
        match self {
            RLPItem::Bytes { raw, .. } | RLPItem::List { raw, .. } => raw,
        }
    }

    /// The content of a byte string item.
    pub fn as_bytes(&self) -> Result<&'a [u8], RLPDecodeError> {
        match self {
            RLPItem::Bytes { payload, .. } => Ok(payload),
            RLPItem::List { .. } => Err(RLPDecodeError::expected_bytes()),
        }
    }

    pub fn as_list(&self) -> Result<&[RLPItem<'a>], RLPDecodeError> {
        match self {
            RLPItem::List { items, .. } => Ok(items),
            RLPItem::Bytes { .. } => Err(RLPDecodeError::expected_list()),
        }
    }

    /// Decodes the item as a canonical big-endian integer of at most 8 bytes.
    pub fn as_u64(&self) -> Result<u64, RLPDecodeError> {
        self.decode_as()
    }

    /// Decodes the item as a canonical big-endian integer of at most 32 bytes.
    pub fn as_u256(&self) -> Result<U256, RLPDecodeError> {
        self.decode_as()
    }

    /// Decodes the item as a byte string of exactly 20 bytes.
    pub fn as_address(&self) -> Result<Address, RLPDecodeError> {
        self.decode_as()
    }

    /// Decodes the item's raw encoding with the [`RLPDecode`] implementation of `T`.
    pub fn decode_as<T: RLPDecode>(&self) -> Result<T, RLPDecodeError> {
        T::decode(self.raw_encoding())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constants::{RLP_EMPTY_LIST, RLP_NULL},
        error::ItemKind,
    };
    use hex_literal::hex;

    fn nested_lists(depth: usize) -> Vec<u8> {
        // Each level wraps the previous one: 0xc0, 0xc1 0xc0, 0xc2 0xc1 0xc0, ...
        let mut rlp = vec![RLP_EMPTY_LIST];
        for _ in 1..depth {
            let mut wrapped = vec![RLP_EMPTY_LIST + rlp.len() as u8];
            wrapped.extend(rlp);
            rlp = wrapped;
        }
        rlp
    }

    #[test]
    fn decode_single_byte() {
        let rlp = [0x42];
        let item = RLPItem::decode(&rlp).unwrap();
        assert_eq!(
            item,
            RLPItem::Bytes {
                raw: &[0x42],
                payload: &[0x42]
            }
        );
        assert_eq!(item.as_u64().unwrap(), 0x42);
    }

    #[test]
    fn decode_empty_string_and_empty_list() {
        let rlp = [RLP_NULL];
        let item = RLPItem::decode(&rlp).unwrap();
        assert!(item.as_bytes().unwrap().is_empty());
        assert_eq!(item.as_u64().unwrap(), 0);

        let rlp = [RLP_EMPTY_LIST];
        let item = RLPItem::decode(&rlp).unwrap();
        assert!(item.as_list().unwrap().is_empty());
        assert_eq!(item.raw_encoding(), &[RLP_EMPTY_LIST]);
    }

    #[test]
    fn decode_nested_keeps_raw_spans() {
        // [ "cat", [1, 2], 0x0400 ]
        let rlp = hex!("ca83636174c20102820400");
        let item = RLPItem::decode(&rlp).unwrap();
        let items = item.as_list().unwrap();
        assert!(item.is_list());
        assert_eq!(items.len(), 3);
        assert!(!items[0].is_list());
        assert!(items[1].is_list());
        assert_eq!(items[0].raw_encoding(), &hex!("83636174"));
        assert_eq!(items[1].raw_encoding(), &hex!("c20102"));
        assert_eq!(items[2].raw_encoding(), &hex!("820400"));
        assert_eq!(items[2].as_u64().unwrap(), 0x0400);
        assert_eq!(item.raw_encoding(), &rlp);

        let inner = items[1].as_list().unwrap();
        assert_eq!(inner[0].as_u64().unwrap(), 1);
        assert_eq!(inner[1].as_u256().unwrap(), U256::from(2));
    }

    #[test]
    fn decode_long_list() {
        // 60 single byte children need the long form
        let mut rlp = vec![0xf8, 60];
        rlp.extend([0x01; 60]);
        let item = RLPItem::decode(&rlp).unwrap();
        assert_eq!(item.as_list().unwrap().len(), 60);
    }

    #[test]
    fn decode_rejects_trailing_bytes() {
        let rlp = [0xc1, 0x01, 0x02];
        assert_eq!(RLPItem::decode(&rlp), Err(RLPDecodeError::LengthMismatch));
    }

    #[test]
    fn decode_rejects_truncated_input() {
        assert_eq!(RLPItem::decode(&[]), Err(RLPDecodeError::TruncatedInput));
        let rlp = hex!("c5836361");
        assert_eq!(RLPItem::decode(&rlp), Err(RLPDecodeError::TruncatedInput));
    }

    #[test]
    fn decode_rejects_child_overrunning_list() {
        // the list declares 3 bytes, its only child claims 4
        let rlp = hex!("c383636174");
        assert_eq!(RLPItem::decode(&rlp), Err(RLPDecodeError::LengthMismatch));
    }

    #[test]
    fn decode_rejects_non_canonical_children() {
        let rlp = hex!("c3810501");
        assert_eq!(
            RLPItem::decode(&rlp),
            Err(RLPDecodeError::NonCanonicalEncoding)
        );
    }

    #[test]
    fn decode_respects_depth_limit() {
        let rlp = nested_lists(4);
        assert!(RLPItem::decode_with_max_depth(&rlp, 4).is_ok());
        assert_eq!(
            RLPItem::decode_with_max_depth(&rlp, 3),
            Err(RLPDecodeError::DepthLimitExceeded(3))
        );
    }

    #[test]
    fn decode_deeply_nested_input_does_not_overflow() {
        // 0xf9 prefixed lists nest far beyond the default cap
        let depth = 10_000;
        let mut rlp = Vec::new();
        for level in 0..depth {
            let remaining = (depth - level - 1) * 3;
            rlp.push(0xf9);
            rlp.extend_from_slice(&(remaining as u16).to_be_bytes());
        }
        assert_eq!(
            RLPItem::decode(&rlp),
            Err(RLPDecodeError::DepthLimitExceeded(DEFAULT_MAX_DEPTH))
        );
    }

    #[test]
    fn accessors_reject_wrong_variant() {
        let rlp = hex!("c20102");
        let item = RLPItem::decode(&rlp).unwrap();
        let expected_bytes = RLPDecodeError::UnexpectedVariant {
            expected: ItemKind::Bytes,
            found: ItemKind::List,
        };
        assert_eq!(item.as_bytes(), Err(expected_bytes.clone()));
        assert_eq!(item.as_address(), Err(expected_bytes));

        let rlp = hex!("820102");
        let item = RLPItem::decode(&rlp).unwrap();
        assert_eq!(
            item.as_list(),
            Err(RLPDecodeError::UnexpectedVariant {
                expected: ItemKind::List,
                found: ItemKind::Bytes,
            })
        );
    }

    #[test]
    fn as_address_requires_twenty_bytes() {
        let rlp = hex!("94aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
        let item = RLPItem::decode(&rlp).unwrap();
        assert_eq!(item.as_address().unwrap(), Address::repeat_byte(0xaa));

        let rlp = hex!("80");
        let item = RLPItem::decode(&rlp).unwrap();
        assert_eq!(item.as_address(), Err(RLPDecodeError::LengthMismatch));
    }
}
