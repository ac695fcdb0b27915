use thiserror::Error;

/// Which kind of item was expected (or found) by a typed accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Bytes,
    List,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKind::Bytes => write!(f, "byte string"),
            ItemKind::List => write!(f, "list"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RLPDecodeError {
    #[error("TruncatedInput")]
    TruncatedInput,
    #[error("LengthMismatch")]
    LengthMismatch,
    #[error("NonCanonicalEncoding")]
    NonCanonicalEncoding,
    #[error("UnexpectedVariant: expected {expected}, found {found}")]
    UnexpectedVariant { expected: ItemKind, found: ItemKind },
    #[error("DepthLimitExceeded: lists nested deeper than {0}")]
    DepthLimitExceeded(usize),
}

impl RLPDecodeError {
    pub(crate) fn expected_bytes() -> Self {
        RLPDecodeError::UnexpectedVariant {
            expected: ItemKind::Bytes,
            found: ItemKind::List,
        }
    }

    pub(crate) fn expected_list() -> Self {
        RLPDecodeError::UnexpectedVariant {
            expected: ItemKind::List,
            found: ItemKind::Bytes,
        }
    }
}
