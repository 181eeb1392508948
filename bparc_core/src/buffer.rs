/// Initial capacity of a freshly created buffer.
const INITIAL_CAPACITY: usize = 5;

/// Growable, cursor-addressed byte sequence.
///
/// Writes always append at the end; reads consume sequentially from a
/// cursor that starts at zero. A read that would run past the written
/// length fails without moving the cursor, so callers can probe for
/// end-of-data safely.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    data: Vec<u8>,
    /// Read position, always `<= data.len()`.
    pos: usize,
}

impl Buffer {
    /// Create an empty buffer with a small non-zero capacity.
    pub fn new() -> Self {
        Self {
            data: Vec::with_capacity(INITIAL_CAPACITY),
            pos: 0,
        }
    }

    /// Take ownership of `bytes` as the buffer contents, cursor at the start.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self { data: bytes, pos: 0 }
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left between the cursor and the end of the written data.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// All written bytes, regardless of cursor position.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Move the read cursor back to the start of the buffer.
    pub fn rewind(&mut self) {
        self.pos = 0;
    }

    /// Append a single byte, growing capacity if needed.
    pub fn append_byte(&mut self, val: u8) {
        self.grow_for(1);
        self.data.push(val);
    }

    /// Append a slice of bytes, growing capacity if needed.
    pub fn append_bytes(&mut self, seq: &[u8]) {
        self.grow_for(seq.len());
        self.data.extend_from_slice(seq);
    }

    /// Read one byte and advance the cursor, or `None` at end of data.
    pub fn read_byte(&mut self) -> Option<u8> {
        let val = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(val)
    }

    /// Read exactly `dst.len()` bytes into `dst` and advance the cursor.
    ///
    /// Returns `false` (cursor unmoved, `dst` untouched) if fewer bytes
    /// remain than requested.
    pub fn read_exact(&mut self, dst: &mut [u8]) -> bool {
        if self.remaining() < dst.len() {
            return false;
        }
        dst.copy_from_slice(&self.data[self.pos..self.pos + dst.len()]);
        self.pos += dst.len();
        true
    }

    /// Read `n` bytes as a borrowed slice and advance the cursor, or `None`
    /// (cursor unmoved) if fewer than `n` bytes remain.
    pub fn read_slice(&mut self, n: usize) -> Option<&[u8]> {
        if self.remaining() < n {
            return None;
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Some(slice)
    }

    /// Grow capacity to fit `additional` more bytes.
    ///
    /// The capacity is multiplied by the smallest integer factor that fits
    /// the new total length, so it never more than roughly doubles past what
    /// was needed, and it never shrinks.
    fn grow_for(&mut self, additional: usize) {
        let needed = self.data.len() + additional;
        let cap = self.data.capacity().max(1);
        if needed > cap {
            let factor = needed.div_ceil(cap);
            self.data.reserve_exact(cap * factor - self.data.len());
        }
    }
}
