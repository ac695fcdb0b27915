use std::collections::{BTreeSet, HashSet};

use ethereum_types::Address;

/// Read side of the protected address list. Storage, administration and locking
/// of the list live with the implementor.
pub trait RestrictedAddresses {
    fn is_restricted_address(&self, address: &Address) -> bool;
}

impl RestrictedAddresses for HashSet<Address> {
    fn is_restricted_address(&self, address: &Address) -> bool {
        self.contains(address)
    }
}

impl RestrictedAddresses for BTreeSet<Address> {
    fn is_restricted_address(&self, address: &Address) -> bool {
        self.contains(address)
    }
}
