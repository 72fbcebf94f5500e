//! Fixed-capacity storage over caller-owned memory.
//!
//! The window length is set at construction and never changes. Growth is
//! handled by truncation rather than failure:
//!
//! - insert shifts the tail toward the end and drops whatever crosses it,
//!   and a payload longer than the room left is cut to fit;
//! - remove shifts the tail back and zero-fills the vacated end;
//! - replace writes at most the bytes that fit.

use super::{ChangeMask, Insertion, Replacement, Snapshot};
use crate::error::{Error, Result};

/// Fixed-length window over borrowed memory.
#[derive(Debug)]
pub struct FixedStore<'a> {
    data: &'a mut [u8],
    changed: ChangeMask,
}

impl<'a> FixedStore<'a> {
    /// Wrap caller-owned memory; every byte starts clean.
    #[must_use]
    pub fn new(data: &'a mut [u8]) -> Self {
        let changed = ChangeMask::new(data.len());
        Self { data, changed }
    }

    /// Current content.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..]
    }

    /// Dirty flags.
    #[must_use]
    pub fn changes(&self) -> &ChangeMask {
        &self.changed
    }

    pub(crate) fn changes_mut(&mut self) -> &mut ChangeMask {
        &mut self.changed
    }

    pub(crate) fn insert(&mut self, offset: usize, bytes: &[u8]) -> Result<Insertion> {
        let len = self.data.len();
        if offset > len {
            return Err(Error::out_of_range(offset, len));
        }
        let written = bytes.len().min(len - offset);
        let spilled = Snapshot::capture(&self.data[..], &self.changed, len - written, written);
        if written > 0 {
            self.data.copy_within(offset..len - written, offset + written);
            self.data[offset..offset + written].copy_from_slice(&bytes[..written]);
            self.changed.shift_in(offset, written);
        }
        Ok(Insertion { written, spilled })
    }

    pub(crate) fn remove(&mut self, offset: usize, len: usize) -> Result<Snapshot> {
        let size = self.data.len();
        if offset >= size {
            return Err(Error::out_of_range(offset, size));
        }
        let len = len.min(size - offset);
        let old = Snapshot::capture(&self.data[..], &self.changed, offset, len);
        self.data.copy_within(offset + len..size, offset);
        self.data[size - len..].fill(0);
        self.changed.shift_out(offset, len);
        Ok(old)
    }

    pub(crate) fn replace(
        &mut self,
        offset: usize,
        len: usize,
        bytes: &[u8],
    ) -> Result<Replacement> {
        let size = self.data.len();
        if offset >= size {
            return Err(Error::out_of_range(offset, size));
        }
        let written = len.min(size - offset).min(bytes.len());
        let old = Snapshot::capture(&self.data[..], &self.changed, offset, written);
        self.data[offset..offset + written].copy_from_slice(&bytes[..written]);
        self.changed.fill(offset, written, true);
        Ok(Replacement { written, old })
    }

    /// Overwrite in place; a fixed window only ever restores as many bytes
    /// as it replaced.
    pub(crate) fn restore(&mut self, offset: usize, replaced: usize, snapshot: &Snapshot) {
        debug_assert_eq!(replaced, snapshot.len(), "fixed restore must not resize");
        let start = offset.min(self.data.len());
        let n = snapshot.len().min(self.data.len() - start);
        self.data[start..start + n].copy_from_slice(&snapshot.bytes[..n]);
        self.changed.restore(start, &snapshot.flags);
    }
}
