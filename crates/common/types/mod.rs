pub mod transaction;

#[cfg(test)]
pub(crate) mod test_utils;

pub use transaction::*;
