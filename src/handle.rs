use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Per-slot generation counter.
pub type Generation = u8;

/// Out of 32 bits, 24 are for the index, 8 are for the generation
const GENERATION_BITS: u32 = 8;
const GENERATION_MASK: u32 = (1 << GENERATION_BITS) - 1;

/// Number of addressable indices. Indices are in `0..MAX_HANDLES`.
pub const MAX_HANDLES: u32 = (1 << 24) - 1;

/// A slot whose generation reaches this value is retired for good.
pub const MAX_GENERATIONS: u32 = GENERATION_MASK;

const _: () = assert!(MAX_HANDLES <= (u32::MAX >> GENERATION_BITS));
const _: () = assert!(MAX_GENERATIONS <= Generation::MAX as u32);

/// Weak reference to a value stored in a [`SlotMap`](crate::SlotMap).
///
/// The index lives in the high 24 bits, the generation in the low 8.
/// A handle owns nothing; it has to be checked against the map on every use.
pub struct Handle<T> {
    idx: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    /// The null handle, never returned by an insertion.
    pub const NULL: Self = Self {
        idx: u32::MAX,
        _marker: PhantomData,
    };

    #[inline]
    pub(crate) fn new(index: usize, generation: Generation) -> Self {
        debug_assert!(index < MAX_HANDLES as usize);
        debug_assert!((generation as u32) < MAX_GENERATIONS);
        Self {
            idx: ((index as u32) << GENERATION_BITS) | generation as u32,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn null() -> Self {
        Self::NULL
    }

    #[inline]
    pub fn index(self) -> usize {
        (self.idx >> GENERATION_BITS) as usize
    }

    #[inline]
    pub fn generation(self) -> Generation {
        (self.idx & GENERATION_MASK) as Generation
    }

    /// Structural check only: both fields are in the range an insertion
    /// can produce. Says nothing about whether the value is still alive.
    #[inline]
    pub fn is_valid(self) -> bool {
        (self.index() as u32) < MAX_HANDLES && (self.generation() as u32) < MAX_GENERATIONS
    }

    /// Packed representation.
    #[inline]
    pub fn to_u32(self) -> u32 {
        self.idx
    }
}

impl<T> Default for Handle<T> {
    fn default() -> Self {
        Self::NULL
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.idx == other.idx
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.idx.hash(state)
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::NULL {
            return write!(f, "Handle(null)");
        }
        write!(f, "Handle({}v{})", self.index(), self.generation())
    }
}
