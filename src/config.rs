use crate::MAX_CODE_SIZE;

/// Runtime configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Largest bytecode a frame will accept.
    pub max_bytecode_size: usize,
    /// Ceiling on the logical memory size, in bytes.
    pub memory_limit: usize,
    /// Bytes to pre-reserve for the memory buffer at frame construction.
    pub initial_memory_capacity: usize,
}

impl Config {
    pub const fn new() -> Self {
        Self {
            max_bytecode_size: MAX_CODE_SIZE,
            memory_limit: 0xff_ffff,
            initial_memory_capacity: 4 * 1024,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
