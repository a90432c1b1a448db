use std::fmt;
use std::marker::PhantomData;

use bit_vec::BitVec;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::free_list::FreeList;
use crate::handle::{Handle, MAX_GENERATIONS, MAX_HANDLES};
use crate::storage::{ContiguousStorage, PagedStorage, Storage};

/// Generational container: values are reached through [`Handle`]s that
/// stop resolving as soon as their value is removed.
///
/// Every index is in exactly one state: free (queued in the free list),
/// live (holds a value), or dead (its generation ran out, never reused).
pub struct SlotMap<T, S: Storage<T> = ContiguousStorage<T>> {
    storage: S,
    /// Which slots hold a value
    present: BitVec,
    free: FreeList,
    /// Number of permanently retired slots
    dead: usize,
    /// Low-water mark for `free`
    min_available: usize,
    _marker: PhantomData<T>,
}

/// A [`SlotMap`] whose values never move when it grows.
pub type PagedSlotMap<T> = SlotMap<T, PagedStorage<T>>;

impl<T, S: Storage<T>> SlotMap<T, S> {
    /// Map with the default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
            .unwrap_or_else(|e| unreachable!("default config rejected: {e}"))
    }

    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        let storage = S::with_unit_size(config.initial_capacity)?;
        let cap = storage.capacity_items();

        let mut free = FreeList::with_capacity(cap);
        for i in 0..cap {
            free.push(i as u32);
        }

        Ok(SlotMap {
            storage,
            present: BitVec::from_elem(cap, false),
            free,
            dead: 0,
            min_available: config.minimum_available_handles,
            _marker: PhantomData,
        })
    }

    /// Number of provisioned slots, whatever their state.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.capacity_items()
    }

    /// Number of live values.
    #[inline]
    pub fn valid_count(&self) -> usize {
        self.capacity() - self.free.len() - self.dead
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.valid_count() == 0
    }

    /// Number of indices waiting to be reused.
    #[inline]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Number of slots retired because their generation ran out.
    #[inline]
    pub fn dead_count(&self) -> usize {
        self.dead
    }

    /// Insert `x`, returning its handle.
    ///
    /// Fails with [`Error::Full`] only once the index space is exhausted.
    pub fn insert(&mut self, x: T) -> Result<Handle<T>> {
        let idx = self.reserve()?;
        Ok(self.fill(idx, x))
    }

    /// Like [`SlotMap::insert`], building the value with `f` once a slot is
    /// secured. If `f` panics the map is left as it was (growth aside).
    #[inline]
    pub fn emplace(&mut self, f: impl FnOnce() -> T) -> Result<Handle<T>> {
        let idx = self.reserve()?;
        Ok(self.fill(idx, f()))
    }

    /// Like [`SlotMap::emplace`], but `f` gets the handle the value will have.
    pub fn insert_with_handle(&mut self, f: impl FnOnce(Handle<T>) -> T) -> Result<Handle<T>> {
        let idx = self.reserve()?;
        let h = Handle::new(idx, self.storage.slot(idx).1);
        let h2 = self.fill(idx, f(h));
        debug_assert_eq!(h, h2);
        Ok(h2)
    }

    /// Remove and drop the value behind `h`.
    ///
    /// A handle that is not live (stale, null, or from another map) is
    /// rejected with an error and the map is not modified.
    pub fn remove(&mut self, h: Handle<T>) -> Result<()> {
        let x = self.take(h)?;
        drop(x);
        Ok(())
    }

    /// Remove the value behind `h` and return it.
    pub fn take(&mut self, h: Handle<T>) -> Result<T> {
        let idx = self.check_live(h)?;
        self.present.set(idx, false);

        let (slot, cur_gen) = self.storage.slot_mut(idx);
        // SAFETY: `present` was true, so the slot is initialized; it is
        // now marked absent so it won't be read again.
        let x = unsafe { slot.assume_init_read() };

        *cur_gen += 1;
        if (*cur_gen as u32) < MAX_GENERATIONS {
            self.free.push(idx as u32);
        } else {
            self.dead += 1;
            log::trace!("retire slot {idx} ({} dead)", self.dead);
        }

        Ok(x)
    }

    pub fn get(&self, h: Handle<T>) -> Option<&T> {
        let idx = self.check_live(h).ok()?;
        // SAFETY: `check_live` saw `present` set
        Some(unsafe { self.storage.slot(idx).0.assume_init_ref() })
    }

    pub fn get_mut(&mut self, h: Handle<T>) -> Option<&mut T> {
        let idx = self.check_live(h).ok()?;
        // SAFETY: `check_live` saw `present` set
        Some(unsafe { self.storage.slot_mut(idx).0.assume_init_mut() })
    }

    #[inline]
    pub fn contains(&self, h: Handle<T>) -> bool {
        self.check_live(h).is_ok()
    }

    fn check_live(&self, h: Handle<T>) -> Result<usize> {
        let idx = h.index();
        if !h.is_valid() || idx >= self.capacity() {
            return Err(Error::InvalidIndex(idx as u32));
        }
        if self.storage.slot(idx).1 != h.generation() {
            return Err(Error::WrongGeneration(idx as u32));
        }
        // generation 0 of a never-used slot can match a foreign handle
        if !self.present[idx] {
            return Err(Error::InvalidIndex(idx as u32));
        }
        Ok(idx)
    }

    /// Index of the next slot to fill, growing first if taking it would
    /// leave the free list under the low-water mark.
    fn reserve(&mut self) -> Result<usize> {
        if self.free.len() <= self.min_available {
            self.grow();
        }
        match self.free.peek() {
            Some(idx) => Ok(idx as usize),
            None => Err(Error::Full),
        }
    }

    fn fill(&mut self, idx: usize, x: T) -> Handle<T> {
        let popped = self.free.pop();
        debug_assert_eq!(popped as usize, idx);
        debug_assert!(!self.present[idx]);

        let (slot, generation) = self.storage.slot_mut(idx);
        slot.write(x);
        let h = Handle::new(idx, *generation);
        self.present.set(idx, true);
        h
    }

    fn grow(&mut self) {
        let old_cap = self.capacity();
        let unit = self.storage.items_per_growth_unit();
        if old_cap + unit > MAX_HANDLES as usize {
            log::warn!(
                "cannot grow past {old_cap} slots ({} free left)",
                self.free.len()
            );
            return;
        }

        self.storage.grow_one_unit();
        let new_cap = self.capacity();
        self.present.grow(new_cap - old_cap, false);
        for i in old_cap..new_cap {
            self.free.push(i as u32);
        }
        log::debug!(
            "grow {old_cap} -> {new_cap} slots ({} free, {} dead)",
            self.free.len(),
            self.dead
        );
    }
}

impl<T, S: Storage<T>> Default for SlotMap<T, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S: Storage<T>> Drop for SlotMap<T, S> {
    fn drop(&mut self) {
        for (i, live) in self.present.iter().enumerate() {
            if live {
                // SAFETY: present is true, so this must be full
                unsafe { self.storage.slot_mut(i).0.assume_init_drop() };
            }
        }
    }
}

impl<T, S: Storage<T>> fmt::Debug for SlotMap<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotMap")
            .field("capacity", &self.capacity())
            .field("valid", &self.valid_count())
            .field("free", &self.free.len())
            .field("dead", &self.dead)
            .finish()
    }
}
