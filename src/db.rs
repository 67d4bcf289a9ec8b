use bytes::Bytes;
use ethereum_types::{Address, U256};
use rustc_hash::FxHashMap;

/// World-state storage consumed by the frame.
///
/// Transient storage follows EIP-1153: same keyspace shape as persistent
/// storage, cleared by the implementor at transaction end. `set_code` is
/// used by CREATE in the enclosing EVM and carried here for completeness of
/// the contract.
pub trait Database {
    /// Value of a storage slot, zero if absent.
    fn get_storage(&self, address: Address, key: U256) -> U256;

    fn set_storage(&mut self, address: Address, key: U256, value: U256);

    /// Value of a transient storage slot, zero if absent.
    fn get_transient_storage(&self, address: Address, key: U256) -> U256;

    fn set_transient_storage(&mut self, address: Address, key: U256, value: U256);

    /// Deployed code of an account, empty if absent.
    fn get_code_by_address(&self, address: Address) -> Bytes;

    /// Balance of an account, zero if absent.
    fn get_balance(&self, address: Address) -> U256;

    fn account_exists(&self, address: Address) -> bool;

    fn set_code(&mut self, address: Address, code: Bytes);
}

/// Hash-map backed [`Database`] for tests and standalone execution.
#[derive(Clone, Debug, Default)]
pub struct InMemoryDatabase {
    storage: FxHashMap<(Address, U256), U256>,
    transient: FxHashMap<(Address, U256), U256>,
    code: FxHashMap<Address, Bytes>,
    balances: FxHashMap<Address, U256>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_balance(&mut self, address: Address, balance: U256) {
        self.balances.insert(address, balance);
    }

    /// Drop all transient slots, as the enclosing EVM does at transaction
    /// end.
    pub fn clear_transient_storage(&mut self) {
        self.transient.clear();
    }
}

impl Database for InMemoryDatabase {
    fn get_storage(&self, address: Address, key: U256) -> U256 {
        self.storage
            .get(&(address, key))
            .copied()
            .unwrap_or_default()
    }

    fn set_storage(&mut self, address: Address, key: U256, value: U256) {
        self.storage.insert((address, key), value);
    }

    fn get_transient_storage(&self, address: Address, key: U256) -> U256 {
        self.transient
            .get(&(address, key))
            .copied()
            .unwrap_or_default()
    }

    fn set_transient_storage(&mut self, address: Address, key: U256, value: U256) {
        self.transient.insert((address, key), value);
    }

    fn get_code_by_address(&self, address: Address) -> Bytes {
        self.code.get(&address).cloned().unwrap_or_default()
    }

    fn get_balance(&self, address: Address) -> U256 {
        self.balances.get(&address).copied().unwrap_or_default()
    }

    fn account_exists(&self, address: Address) -> bool {
        self.balances.contains_key(&address) || self.code.contains_key(&address)
    }

    fn set_code(&mut self, address: Address, code: Bytes) {
        self.code.insert(address, code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_spaces_are_disjoint() {
        let mut db = InMemoryDatabase::new();
        let addr = Address::from_low_u64_be(1);

        db.set_storage(addr, 1.into(), 10.into());
        db.set_transient_storage(addr, 1.into(), 20.into());

        assert_eq!(db.get_storage(addr, 1.into()), 10.into());
        assert_eq!(db.get_transient_storage(addr, 1.into()), 20.into());

        db.clear_transient_storage();
        assert_eq!(db.get_storage(addr, 1.into()), 10.into());
        assert_eq!(db.get_transient_storage(addr, 1.into()), U256::zero());
    }

    #[test]
    fn accounts() {
        let mut db = InMemoryDatabase::new();
        let addr = Address::from_low_u64_be(2);
        assert!(!db.account_exists(addr));
        assert_eq!(db.get_balance(addr), U256::zero());
        assert_eq!(db.get_code_by_address(addr), Bytes::new());

        db.set_balance(addr, 7.into());
        db.set_code(addr, Bytes::from_static(&[0x00]));
        assert!(db.account_exists(addr));
        assert_eq!(db.get_balance(addr), 7.into());
    }
}
