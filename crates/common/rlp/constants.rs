pub const RLP_NULL: u8 = 0x80;
pub const RLP_EMPTY_LIST: u8 = 0xC0;

/// Largest prefix of a string whose length fits in the prefix byte itself.
pub const RLP_SHORT_STRING_MAX: u8 = 0xB7;
/// Largest prefix of a list whose payload length fits in the prefix byte itself.
pub const RLP_SHORT_LIST_MAX: u8 = 0xF7;

/// Payloads of this many bytes or more need the long-form length prefix.
pub const RLP_LONG_LENGTH_THRESHOLD: usize = 56;

/// Default cap on list nesting accepted by [`RLPItem::decode`](crate::item::RLPItem::decode).
pub const DEFAULT_MAX_DEPTH: usize = 16;
