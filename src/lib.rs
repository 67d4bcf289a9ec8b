#![doc = include_str!("../README.md")]

pub use cache::AnalysisCache;
pub use common::{Log, Message, Output, StatusCode, Word};
pub use config::Config;
pub use db::{Database, InMemoryDatabase};
pub use frame::Frame;
pub use host::{DummyHost, Host, TxContext};
pub use memory::Memory;
pub use opcode::OpCode;
pub use plan::{BlockMetadata, MinimalPlan, Plan};
pub use stack::Stack;

/// Maximum allowed EVM bytecode size.
pub const MAX_CODE_SIZE: usize = 0x6000;

#[doc(hidden)]
pub mod analysis;
mod cache;
mod common;
mod config;
pub mod db;
mod frame;
pub mod host;
#[doc(hidden)]
pub mod instructions;
mod interpreter;
mod memory;
pub mod opcode;
mod plan;
mod stack;
pub mod tracing;

#[cfg(feature = "util")]
pub mod util;
