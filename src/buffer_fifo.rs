/// A FIFO queue backed by a fixed-size array.
pub struct BufferFifo<T, const N: usize> {
    buffer: [Option<T>; N],
    /// Index of the oldest element
    head: usize,
    len: usize,
}

impl<T: Copy, const N: usize> BufferFifo<T, N> {
    pub fn new() -> Self {
        Self {
            buffer: [None; N],
            head: 0,
            len: 0,
        }
    }

    /// Appends a value, handing it back if the buffer is full.
    pub fn write(&mut self, value: T) -> Result<(), T> {
        if self.is_full() {
            return Err(value);
        }
        self.buffer[(self.head + self.len) % N] = Some(value);
        self.len += 1;
        Ok(())
    }

    /// Removes and returns the oldest value.
    pub fn read(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let value = self.buffer[self.head].take();
        self.head = (self.head + 1) % N;
        self.len -= 1;
        value
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_full(&self) -> bool {
        self.len == N
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T: Copy, const N: usize> Default for BufferFifo<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
