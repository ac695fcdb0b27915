use ethguard_rlp::error::RLPDecodeError;
use thiserror::Error;

/// Reasons a raw transaction is rejected. None of them are transient: the same
/// input always fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TxDecodeError {
    #[error("TruncatedInput")]
    TruncatedInput,
    #[error("LengthMismatch")]
    LengthMismatch,
    #[error("NonCanonicalEncoding")]
    NonCanonicalEncoding,
    /// The transaction payload is a byte string instead of a list.
    #[error("UnexpectedVariant: {0}")]
    UnexpectedVariant(String),
    #[error("UnsupportedTxType: {0:#04x}")]
    UnsupportedTxType(u8),
    #[error("MalformedTransaction: {0}")]
    MalformedTransaction(String),
    #[error("SignatureRecoveryFailed: {0}")]
    SignatureRecoveryFailed(String),
    #[error("OversizedTransaction: {size} bytes exceeds the limit of {max}")]
    OversizedTransaction { size: usize, max: usize },
}

impl From<RLPDecodeError> for TxDecodeError {
    fn from(err: RLPDecodeError) -> Self {
        match err {
            RLPDecodeError::TruncatedInput => TxDecodeError::TruncatedInput,
            RLPDecodeError::LengthMismatch => TxDecodeError::LengthMismatch,
            RLPDecodeError::NonCanonicalEncoding => TxDecodeError::NonCanonicalEncoding,
            err @ RLPDecodeError::UnexpectedVariant { .. } => {
                TxDecodeError::UnexpectedVariant(err.to_string())
            }
            err @ RLPDecodeError::DepthLimitExceeded(_) => {
                TxDecodeError::MalformedTransaction(err.to_string())
            }
        }
    }
}
