//! Static driver configuration
//!
//! Every tunable of the driver is a compile-time constant. The device
//! table, buffer capacity and node names are fixed when the module is
//! built and never change afterwards.

use log::LevelFilter;

/// Driver version reported in the load banner
pub const VERSION: &str = "0.1.0";

/// Name of the char-device region, also the node-name prefix
pub const DRIVER_NAME: &str = "numcheck";

/// Name of the device class the nodes are created under
pub const DRIVER_CLASS: &str = "numcheck_class";

/// Level for a [`crate::drivers::console::ConsoleLogger`] when the host
/// does not choose one
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

/// Device numbering
pub mod devices {
    /// Number of device nodes (one per check)
    pub const NUM_DEVICES: u32 = 3;
    /// First minor number requested from the host
    pub const FIRST_MINOR: u32 = 0;

    /// Pythagorean-triple check
    pub const PYTHAGOREAN_MINOR: u32 = 0;
    /// Primality check
    pub const PRIME_MINOR: u32 = 1;
    /// Divisibility check
    pub const DIVISIBLE_MINOR: u32 = 2;
}

/// Input buffering
pub mod buffer {
    /// Working buffer size, terminator included
    pub const BUFFER_CAPACITY: usize = 256;
    /// Largest number of data bytes a single write can contribute
    pub const MAX_DATA_LEN: usize = BUFFER_CAPACITY - 1;
}
