//! Canonical RLP decoding for untrusted input.
//!
//! [`item::RLPItem`] decodes a buffer into a tree that remembers the exact bytes every
//! item came from; [`decode::RLPDecode`] decodes typed values. Both reject every
//! non-canonical encoding.
pub mod constants;
pub mod decode;
pub mod encode;
pub mod error;
pub mod item;
