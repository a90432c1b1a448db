const RESIZE_MULTIPLIER: usize = 2;

/// FIFO queue of free slot indices, as a growable ring buffer.
///
/// One cell of the buffer always stays unused so that `head == tail`
/// unambiguously means empty. `tail` is kept in `0..buf.len()`.
#[derive(Debug)]
pub struct FreeList {
    buf: Vec<u32>,
    head: usize,
    tail: usize,
}

impl FreeList {
    /// New free list able to hold `capacity` indices before growing.
    pub fn with_capacity(capacity: usize) -> Self {
        FreeList {
            buf: vec![0; capacity.max(1) + 1],
            head: 0,
            tail: 0,
        }
    }

    #[inline]
    fn next(&self, i: usize) -> usize {
        if i + 1 == self.buf.len() {
            0
        } else {
            i + 1
        }
    }

    /// Enqueue `index` at the tail.
    pub fn push(&mut self, index: u32) {
        if self.next(self.tail) == self.head {
            self.grow();
        }

        self.buf[self.tail] = index;
        self.tail = self.next(self.tail);
    }

    fn grow(&mut self) {
        let old_cap = self.buf.len();
        let new_cap = old_cap * RESIZE_MULTIPLIER;
        self.buf.resize(new_cap, 0);

        if self.tail < self.head {
            // entries are `buf[head..old_cap]` then `buf[..tail]`; move the
            // wrapped part right after the old end so they are contiguous again.
            self.buf.copy_within(0..self.tail, old_cap);
            self.tail += old_cap;
            log::debug!(
                "free list: grow {old_cap} -> {new_cap}, relinearized {} entries",
                self.tail - old_cap
            );
        } else {
            debug_assert_eq!(self.head, 0);
            log::debug!("free list: grow {old_cap} -> {new_cap}");
        }
        debug_assert!(self.tail < new_cap);
    }

    /// Dequeue the oldest index.
    ///
    /// Panics if the list is empty: callers check [`FreeList::is_empty`] first.
    pub fn pop(&mut self) -> u32 {
        assert!(!self.is_empty(), "pop on an empty free list");
        let res = self.buf[self.head];
        self.head = self.next(self.head);
        res
    }

    /// The index [`FreeList::pop`] would return next.
    #[inline]
    pub fn peek(&self) -> Option<u32> {
        if self.is_empty() {
            None
        } else {
            Some(self.buf[self.head])
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Number of queued indices.
    #[inline]
    pub fn len(&self) -> usize {
        if self.tail >= self.head {
            self.tail - self.head
        } else {
            self.tail + self.buf.len() - self.head
        }
    }

    /// How many indices fit before the next growth.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len() - 1
    }
}
