use bytes::Bytes;
use ethereum_types::{Address, H256, U256};

/// The transaction and block data for execution.
#[derive(Clone, Debug)]
pub struct TxContext {
    /// The transaction gas price.
    pub tx_gas_price: U256,
    /// The transaction origin account.
    pub tx_origin: Address,
    /// The miner of the block.
    pub block_coinbase: Address,
    /// The block number.
    pub block_number: u64,
    /// The block timestamp.
    pub block_timestamp: u64,
    /// The block gas limit.
    pub block_gas_limit: u64,
    /// The previous RANDAO mix.
    pub block_prev_randao: H256,
    /// The blockchain's ChainID.
    pub chain_id: U256,
    /// The block base fee per gas (EIP-1559, EIP-3198).
    pub block_base_fee: U256,
}

impl Default for TxContext {
    fn default() -> Self {
        Self {
            tx_gas_price: U256::zero(),
            tx_origin: Address::zero(),
            block_coinbase: Address::zero(),
            block_number: 0,
            block_timestamp: 0,
            block_gas_limit: 0,
            block_prev_randao: H256::zero(),
            chain_id: U256::zero(),
            block_base_fee: U256::zero(),
        }
    }
}

/// Environment services consumed by the frame.
///
/// The frame only reads the transaction context and charges the access-list
/// prices returned here; warm/cold bookkeeping, journaling and snapshot
/// management belong to the implementor (the enclosing EVM).
pub trait Host {
    /// Retrieve transaction context.
    fn tx_context(&self) -> TxContext;

    /// Input bytes of the current call.
    fn call_input(&self) -> Bytes;

    /// Mark an account as accessed, returning the gas to charge for this
    /// access.
    fn access_address(&mut self, address: Address) -> u64;

    /// Mark a storage slot as accessed, returning the gas to charge for
    /// this access.
    fn access_storage_slot(&mut self, address: Address, key: U256) -> u64;

    /// Take a journal snapshot, returning its identifier.
    fn snapshot(&mut self) -> usize;

    /// Revert the journal to a previously taken snapshot.
    fn revert(&mut self, snapshot: usize);

    /// Record the pre-write value of a storage slot in the journal.
    fn record_storage_change(&mut self, address: Address, key: U256, prev: U256);
}

/// Host with no environment: zero context, free access, no journal.
#[derive(Clone, Copy, Debug, Default)]
pub struct DummyHost;

impl Host for DummyHost {
    fn tx_context(&self) -> TxContext {
        TxContext::default()
    }

    fn call_input(&self) -> Bytes {
        Bytes::new()
    }

    fn access_address(&mut self, _: Address) -> u64 {
        0
    }

    fn access_storage_slot(&mut self, _: Address, _: U256) -> u64 {
        0
    }

    fn snapshot(&mut self) -> usize {
        0
    }

    fn revert(&mut self, _: usize) {}

    fn record_storage_change(&mut self, _: Address, _: U256, _: U256) {}
}
