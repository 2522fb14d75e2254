//! Reference model of the growable byte buffer.
//!
//! Invariants, after every operation:
//! - `capacity() >= len()`
//! - every byte in `[len(), capacity())` is zero

/// Smallest capacity a buffer is ever created with.
pub const MIN_CAPACITY: usize = 10;

/// Capacity multiplier applied until an index fits.
pub const GROW_FACTOR: usize = 2;

/// A byte sequence with an explicit logical size and an auto-extending
/// physical capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrowableBuffer {
    /// Physical storage; its length is the capacity.
    data: Vec<u8>,
    /// Logical content length.
    size: usize,
}

impl GrowableBuffer {
    /// Empty buffer with at least `requested` bytes of zeroed capacity.
    pub fn new(requested: usize) -> Self {
        Self {
            data: vec![0; requested.max(MIN_CAPACITY)],
            size: 0,
        }
    }

    /// Buffer holding `text`, with one spare byte so the content is
    /// always zero-terminated in storage.
    pub fn from_text(text: &[u8]) -> Self {
        let mut buf = Self::new(text.len() + 1);
        buf.data[..text.len()].copy_from_slice(text);
        buf.size = text.len();
        buf
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The logical content.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.size]
    }

    /// The whole physical storage, including the zero tail.
    pub fn storage(&self) -> &[u8] {
        &self.data
    }

    /// Grow capacity by doubling until `index` is addressable.
    ///
    /// Existing content is preserved and the added region is zero.
    pub fn ensure_capacity_for(&mut self, index: usize) {
        let mut cap = self.data.len();
        if index < cap {
            return;
        }
        while index >= cap {
            cap = match cap.checked_mul(GROW_FACTOR) {
                Some(next) => next,
                None => index.saturating_add(1),
            };
        }
        self.data.resize(cap, 0);
    }

    /// Store `value` at `index`, extending the logical size past it.
    ///
    /// Skipped bytes read as zero.
    pub fn write(&mut self, index: usize, value: u8) {
        self.ensure_capacity_for(index);
        self.data[index] = value;
        if index >= self.size {
            self.size = index + 1;
        }
    }

    /// Byte at `index`, zero if never written.
    ///
    /// Reading past the capacity grows the capacity (not the size), the
    /// same as the C runtime does.
    pub fn read(&mut self, index: usize) -> u8 {
        self.ensure_capacity_for(index);
        self.data[index]
    }

    /// Truncate or extend the logical size to `new_len`.
    pub fn resize(&mut self, new_len: usize) {
        if new_len < self.size {
            self.data[new_len..self.size].fill(0);
        } else {
            self.ensure_capacity_for(new_len);
        }
        self.size = new_len;
    }

    pub fn append_byte(&mut self, value: u8) {
        self.write(self.size, value);
    }

    /// Append the logical content of `other`.
    pub fn append_buffer(&mut self, other: &GrowableBuffer) {
        let n = other.size;
        self.ensure_capacity_for(self.size + n);
        self.data[self.size..self.size + n].copy_from_slice(&other.data[..n]);
        self.size += n;
    }

    /// Append this buffer's own content to itself, doubling it.
    pub fn append_self(&mut self) {
        let n = self.size;
        self.ensure_capacity_for(n + n);
        self.data.copy_within(..n, n);
        self.size += n;
    }

    /// Replace this buffer with an independent copy of `source`.
    pub fn assign_from(&mut self, source: &GrowableBuffer) {
        self.data = source.data.clone();
        self.size = source.size;
    }

    /// Free the storage. The buffer cannot be used afterward.
    pub fn release(self) {}
}
