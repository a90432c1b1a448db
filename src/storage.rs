//! Backing memory for slot values and their generations.
//!
//! Slots are raw `MaybeUninit<T>`: storages never construct or drop values,
//! the [`SlotMap`](crate::SlotMap) does that through [`Storage::slot_mut`].

use std::mem::MaybeUninit;

use crate::error::{Error, Result};
use crate::handle::Generation;

const RESIZE_MULTIPLIER: usize = 2;

/// Strategy for laying out slots in memory.
pub trait Storage<T>: Sized {
    /// Allocate the first unit, holding `items` slots.
    fn with_unit_size(items: usize) -> Result<Self>;

    /// Number of slots currently provisioned.
    fn capacity_items(&self) -> usize;

    /// Number of slots the next call to [`Storage::grow_one_unit`] adds.
    fn items_per_growth_unit(&self) -> usize;

    /// Provision one more unit. New slots start at generation 0.
    fn grow_one_unit(&mut self);

    fn slot(&self, index: usize) -> (&MaybeUninit<T>, Generation);

    fn slot_mut(&mut self, index: usize) -> (&mut MaybeUninit<T>, &mut Generation);
}

/// All slots in one growable block.
///
/// Growth doubles the block and moves existing values, so references
/// obtained before a growth don't survive it (the borrow checker sees to that).
pub struct ContiguousStorage<T> {
    data: Vec<MaybeUninit<T>>,
    generation: Vec<Generation>,
}

impl<T> Storage<T> for ContiguousStorage<T> {
    fn with_unit_size(items: usize) -> Result<Self> {
        if items == 0 {
            return Err(Error::InvalidConfig("initial capacity must be positive"));
        }
        let mut data = Vec::with_capacity(items);
        data.resize_with(items, MaybeUninit::uninit);
        Ok(ContiguousStorage {
            data,
            generation: vec![0; items],
        })
    }

    #[inline]
    fn capacity_items(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn items_per_growth_unit(&self) -> usize {
        self.data.len() * (RESIZE_MULTIPLIER - 1)
    }

    fn grow_one_unit(&mut self) {
        let new_len = self.data.len() + self.items_per_growth_unit();
        debug_assert_eq!(self.data.len(), self.generation.len());
        self.data.resize_with(new_len, MaybeUninit::uninit);
        self.generation.resize(new_len, 0);
    }

    #[inline]
    fn slot(&self, index: usize) -> (&MaybeUninit<T>, Generation) {
        (&self.data[index], self.generation[index])
    }

    #[inline]
    fn slot_mut(&mut self, index: usize) -> (&mut MaybeUninit<T>, &mut Generation) {
        (&mut self.data[index], &mut self.generation[index])
    }
}

struct Page<T> {
    data: Box<[MaybeUninit<T>]>,
    generation: Box<[Generation]>,
}

impl<T> Page<T> {
    fn new(items: usize) -> Self {
        Page {
            data: (0..items).map(|_| MaybeUninit::uninit()).collect(),
            generation: vec![0; items].into_boxed_slice(),
        }
    }
}

/// Slots split into fixed-size pages.
///
/// Growth appends a page and never moves existing values; the price is one
/// more indirection per access.
pub struct PagedStorage<T> {
    pages: Vec<Page<T>>,
    /// log2 of items per page
    shift: u32,
}

impl<T> PagedStorage<T> {
    #[inline]
    fn items_per_page(&self) -> usize {
        1 << self.shift
    }

    /// `(page, offset)` for a given slot index.
    #[inline]
    fn split(&self, index: usize) -> (usize, usize) {
        (index >> self.shift, index & (self.items_per_page() - 1))
    }
}

impl<T> Storage<T> for PagedStorage<T> {
    fn with_unit_size(items: usize) -> Result<Self> {
        if !items.is_power_of_two() {
            return Err(Error::InvalidConfig(
                "items per page must be a power of two",
            ));
        }
        Ok(PagedStorage {
            pages: vec![Page::new(items)],
            shift: items.trailing_zeros(),
        })
    }

    #[inline]
    fn capacity_items(&self) -> usize {
        self.pages.len() << self.shift
    }

    #[inline]
    fn items_per_growth_unit(&self) -> usize {
        self.items_per_page()
    }

    fn grow_one_unit(&mut self) {
        self.pages.push(Page::new(self.items_per_page()));
    }

    #[inline]
    fn slot(&self, index: usize) -> (&MaybeUninit<T>, Generation) {
        let (page, offset) = self.split(index);
        let page = &self.pages[page];
        (&page.data[offset], page.generation[offset])
    }

    #[inline]
    fn slot_mut(&mut self, index: usize) -> (&mut MaybeUninit<T>, &mut Generation) {
        let (page, offset) = self.split(index);
        let page = &mut self.pages[page];
        (&mut page.data[offset], &mut page.generation[offset])
    }
}
