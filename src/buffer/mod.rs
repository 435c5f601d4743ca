//! Internal buffer management.
//!
//! This module provides a thread-local pool of read buffers so repeated scans
//! on one thread do not reallocate. It is an implementation detail and not
//! part of the public API.

mod pool;

pub(crate) use pool::{Buffer, pending_capacity};
