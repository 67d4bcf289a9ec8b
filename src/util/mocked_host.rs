use crate::{
    host::{Host, TxContext},
    instructions::properties::{
        COLD_ACCOUNT_ACCESS_COST, COLD_SLOAD_COST, WARM_STORAGE_READ_COST,
    },
};
use bytes::Bytes;
use ethereum_types::{Address, U256};
use rustc_hash::FxHashSet;

/// A journaled storage write as recorded by the mocked host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageChange {
    pub address: Address,
    pub key: U256,
    pub prev: U256,
}

/// [`Host`] implementation for tests: configurable environment, EIP-2929
/// warm/cold pricing, and a recording journal.
#[derive(Clone, Debug, Default)]
pub struct MockedHost {
    pub tx_context: TxContext,
    pub input: Bytes,
    pub accessed_accounts: FxHashSet<Address>,
    pub accessed_slots: FxHashSet<(Address, U256)>,
    pub journal: Vec<StorageChange>,
}

impl Host for MockedHost {
    fn tx_context(&self) -> TxContext {
        self.tx_context.clone()
    }

    fn call_input(&self) -> Bytes {
        self.input.clone()
    }

    fn access_address(&mut self, address: Address) -> u64 {
        if self.accessed_accounts.insert(address) {
            COLD_ACCOUNT_ACCESS_COST as u64
        } else {
            WARM_STORAGE_READ_COST as u64
        }
    }

    fn access_storage_slot(&mut self, address: Address, key: U256) -> u64 {
        if self.accessed_slots.insert((address, key)) {
            COLD_SLOAD_COST as u64
        } else {
            WARM_STORAGE_READ_COST as u64
        }
    }

    fn snapshot(&mut self) -> usize {
        self.journal.len()
    }

    fn revert(&mut self, snapshot: usize) {
        self.journal.truncate(snapshot);
    }

    fn record_storage_change(&mut self, address: Address, key: U256, prev: U256) {
        self.journal.push(StorageChange { address, key, prev });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_pricing_warms_up() {
        let mut host = MockedHost::default();
        let addr = Address::from_low_u64_be(1);

        assert_eq!(host.access_address(addr), COLD_ACCOUNT_ACCESS_COST as u64);
        assert_eq!(host.access_address(addr), WARM_STORAGE_READ_COST as u64);

        assert_eq!(
            host.access_storage_slot(addr, 1.into()),
            COLD_SLOAD_COST as u64
        );
        assert_eq!(
            host.access_storage_slot(addr, 1.into()),
            WARM_STORAGE_READ_COST as u64
        );
        assert_eq!(
            host.access_storage_slot(addr, 2.into()),
            COLD_SLOAD_COST as u64
        );
    }

    #[test]
    fn journal_reverts_to_snapshot() {
        let mut host = MockedHost::default();
        let addr = Address::from_low_u64_be(2);

        host.record_storage_change(addr, 1.into(), 0.into());
        let snapshot = host.snapshot();
        host.record_storage_change(addr, 2.into(), 5.into());
        host.record_storage_change(addr, 3.into(), 6.into());
        assert_eq!(host.journal.len(), 3);

        host.revert(snapshot);
        assert_eq!(host.journal.len(), 1);
        assert_eq!(host.journal[0].key, 1.into());
    }
}
