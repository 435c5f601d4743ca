//! Thread-local read-buffer pool.

use std::cell::RefCell;

/// Size of pooled read buffers.
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024; // 64 KiB

/// Maximum number of buffers to keep per thread.
pub const MAX_POOL_SIZE: usize = 4;

/// Upper bound on the bytes a payload driver reserves up front.
///
/// Larger chunks grow the pending vector on demand.
pub fn pending_capacity(max_size: usize) -> usize {
    max_size.min(DEFAULT_BUFFER_SIZE * 4)
}

/// A reusable, fixed-size read buffer.
///
/// Returned to the thread-local pool on drop.
pub struct Buffer {
    data: Vec<u8>,
}

impl Buffer {
    /// Takes a buffer from the thread-local pool or allocates a new one.
    pub fn take() -> Self {
        let mut data = THREAD_BUFFER_POOL
            .with(|pool| pool.borrow_mut().pop())
            .unwrap_or_default();
        data.resize(DEFAULT_BUFFER_SIZE, 0);
        Self { data }
    }

    /// Returns the whole buffer for a read call to fill.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Returns the first `n` bytes, as filled by the last read.
    pub fn filled(&self, n: usize) -> &[u8] {
        &self.data[..n]
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        if self.data.capacity() <= DEFAULT_BUFFER_SIZE * 2 {
            let data = std::mem::take(&mut self.data);
            THREAD_BUFFER_POOL.with(|pool| {
                let mut pool = pool.borrow_mut();
                if pool.len() < MAX_POOL_SIZE {
                    pool.push(data);
                }
            });
        }
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::take()
    }
}

thread_local! {
    static THREAD_BUFFER_POOL: RefCell<Vec<Vec<u8>>> = const { RefCell::new(Vec::new()) };
}
