pub mod bytecode;
pub mod mocked_host;
pub mod tester;

pub use bytecode::Bytecode;
pub use mocked_host::{MockedHost, StorageChange};
pub use tester::EvmTester;
