use crate::error::{Error, Result};
use crate::handle::MAX_HANDLES;

/// Construction-time parameters of a [`SlotMap`](crate::SlotMap).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Slots allocated up front. For paged storage this is the page size,
    /// and must be a power of two.
    pub initial_capacity: usize,
    /// Low-water mark: the map grows when taking a slot would leave fewer
    /// free indices than this, i.e. an insertion that finds exactly this many
    /// free indices grows first.
    pub minimum_available_handles: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            initial_capacity: 1024,
            minimum_available_handles: 256,
        }
    }
}

impl Config {
    pub fn with_initial_capacity(mut self, n: usize) -> Self {
        self.initial_capacity = n;
        self
    }

    pub fn with_minimum_available_handles(mut self, n: usize) -> Self {
        self.minimum_available_handles = n;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(Error::InvalidConfig("initial capacity must be positive"));
        }
        if self.initial_capacity > MAX_HANDLES as usize {
            return Err(Error::InvalidConfig(
                "initial capacity exceeds the handle index space",
            ));
        }
        if self.initial_capacity <= self.minimum_available_handles {
            return Err(Error::InvalidConfig(
                "initial capacity must exceed the minimum available handles",
            ));
        }
        Ok(())
    }
}
