//! Generational slot map: O(1) insertion, removal and lookup through small
//! copyable handles that detect when the value they pointed to is gone.

pub mod config;
pub mod error;
pub mod free_list;
pub mod handle;
pub mod slot_map;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use free_list::FreeList;
pub use handle::{Generation, Handle, MAX_GENERATIONS, MAX_HANDLES};
pub use slot_map::{PagedSlotMap, SlotMap};
pub use storage::{ContiguousStorage, PagedStorage, Storage};
