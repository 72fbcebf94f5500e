//! Editable byte storage.
//!
//! [`ByteStore`] is a closed set of two backing strategies behind one
//! contract:
//!
//! - [`DynamicStore`]: owns a growable `Vec<u8>`; inserts and removes change
//!   the length.
//! - [`FixedStore`]: a window over caller-owned memory. The length never
//!   changes; inserts push bytes off the end and removes zero-fill the tail.
//!
//! Each variant carries its own [`ChangeMask`] and updates it in the same
//! call that touches the bytes, so content and dirty flags always have the
//! same length.
//!
//! Reads are public. Mutations are crate-private: all edits go through
//! [`HexDocument`](crate::HexDocument) so the undo history stays consistent.
//!
//! # Examples
//!
//! ```
//! use hexedit_rust::ByteStore;
//!
//! let mut memory = [0xAA, 0xBB, 0xCC, 0xDD];
//! let store = ByteStore::from_slice(&mut memory);
//! assert!(store.is_fixed_capacity());
//! assert_eq!(store.range(1, 10).unwrap(), &[0xBB, 0xCC, 0xDD]);
//! ```

mod dynamic;
mod fixed;
mod mask;

pub use dynamic::DynamicStore;
pub use fixed::FixedStore;
pub use mask::ChangeMask;

use crate::error::{Error, Result};
use memchr::memmem;

/// Bytes and dirty flags captured before they are overwritten or dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Snapshot {
    pub bytes: Vec<u8>,
    pub flags: Vec<bool>,
}

impl Snapshot {
    pub(crate) fn capture(data: &[u8], mask: &ChangeMask, offset: usize, len: usize) -> Self {
        let start = offset.min(data.len());
        let end = offset.saturating_add(len).min(data.len());
        Self {
            bytes: data[start..end].to_vec(),
            flags: mask.slice(start, end - start).to_vec(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Outcome of an insert.
#[derive(Clone, Debug, Default)]
pub(crate) struct Insertion {
    /// Payload bytes that landed in the store.
    pub written: usize,
    /// Tail pushed past the end of a fixed window (empty when growable).
    pub spilled: Snapshot,
}

/// Outcome of a replace.
#[derive(Clone, Debug, Default)]
pub(crate) struct Replacement {
    /// Payload bytes that landed in the store.
    pub written: usize,
    /// Content and flags that were replaced.
    pub old: Snapshot,
}

/// Byte storage backing a document.
#[derive(Debug)]
pub enum ByteStore<'a> {
    /// Growable, owned storage.
    Dynamic(DynamicStore),
    /// Fixed-length window over caller-owned memory.
    Fixed(FixedStore<'a>),
}

impl Default for ByteStore<'_> {
    fn default() -> Self {
        Self::Dynamic(DynamicStore::default())
    }
}

impl<'a> ByteStore<'a> {
    /// Create a growable store that takes ownership of `data`.
    #[must_use]
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self::Dynamic(DynamicStore::new(data))
    }

    /// Create a fixed-capacity store over caller-owned memory.
    ///
    /// The borrow keeps `data` alive for as long as the store exists.
    #[must_use]
    pub fn from_slice(data: &'a mut [u8]) -> Self {
        Self::Fixed(FixedStore::new(data))
    }

    /// Number of addressable bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// True when the store holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True for the fixed-capacity variant.
    #[must_use]
    pub fn is_fixed_capacity(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }

    /// Current content.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Dynamic(store) => store.as_bytes(),
            Self::Fixed(store) => store.as_bytes(),
        }
    }

    /// Copy of the current content.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    /// Dirty flags, one per byte.
    #[must_use]
    pub fn changes(&self) -> &ChangeMask {
        match self {
            Self::Dynamic(store) => store.changes(),
            Self::Fixed(store) => store.changes(),
        }
    }

    /// Byte at `offset`.
    pub fn at(&self, offset: usize) -> Result<u8> {
        self.as_bytes()
            .get(offset)
            .copied()
            .ok_or_else(|| Error::out_of_range(offset, self.len()))
    }

    /// Up to `len` bytes starting at `offset`.
    ///
    /// The result is truncated at the end of the store; only a start offset
    /// past the end is an error.
    pub fn range(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let data = self.as_bytes();
        if offset >= data.len() {
            return Err(Error::out_of_range(offset, data.len()));
        }
        let end = offset.saturating_add(len).min(data.len());
        Ok(&data[offset..end])
    }

    /// Whether the byte at `offset` changed since load.
    pub fn is_changed(&self, offset: usize) -> Result<bool> {
        self.changes()
            .get(offset)
            .ok_or_else(|| Error::out_of_range(offset, self.len()))
    }

    /// Dirty flags for up to `len` bytes starting at `offset`.
    pub fn changed_range(&self, offset: usize, len: usize) -> Result<&[bool]> {
        if offset >= self.len() {
            return Err(Error::out_of_range(offset, self.len()));
        }
        Ok(self.changes().slice(offset, len))
    }

    /// First occurrence of `needle` starting at or after `from`.
    #[must_use]
    pub fn index_of(&self, needle: &[u8], from: usize) -> Option<usize> {
        let data = self.as_bytes();
        if from > data.len() {
            return None;
        }
        memmem::find(&data[from..], needle).map(|pos| pos + from)
    }

    /// Last occurrence of `needle` starting at or before `from`.
    #[must_use]
    pub fn last_index_of(&self, needle: &[u8], from: usize) -> Option<usize> {
        let data = self.as_bytes();
        let end = from.saturating_add(needle.len()).min(data.len());
        memmem::rfind(&data[..end], needle)
    }

    pub(crate) fn insert(&mut self, offset: usize, bytes: &[u8]) -> Result<Insertion> {
        tracing::trace!(
            offset,
            len = bytes.len(),
            fixed = self.is_fixed_capacity(),
            "store insert"
        );
        match self {
            Self::Dynamic(store) => store.insert(offset, bytes),
            Self::Fixed(store) => store.insert(offset, bytes),
        }
    }

    pub(crate) fn remove(&mut self, offset: usize, len: usize) -> Result<Snapshot> {
        tracing::trace!(offset, len, fixed = self.is_fixed_capacity(), "store remove");
        match self {
            Self::Dynamic(store) => store.remove(offset, len),
            Self::Fixed(store) => store.remove(offset, len),
        }
    }

    pub(crate) fn replace(
        &mut self,
        offset: usize,
        len: usize,
        bytes: &[u8],
    ) -> Result<Replacement> {
        tracing::trace!(
            offset,
            len,
            payload = bytes.len(),
            fixed = self.is_fixed_capacity(),
            "store replace"
        );
        match self {
            Self::Dynamic(store) => store.replace(offset, len, bytes),
            Self::Fixed(store) => store.replace(offset, len, bytes),
        }
    }

    /// Put `snapshot` back in place of the `replaced` bytes at `offset`,
    /// flags included.
    pub(crate) fn restore(&mut self, offset: usize, replaced: usize, snapshot: &Snapshot) {
        match self {
            Self::Dynamic(store) => store.restore(offset, replaced, snapshot),
            Self::Fixed(store) => store.restore(offset, replaced, snapshot),
        }
    }

    /// Overwrite dirty flags from `offset` without touching content.
    pub(crate) fn set_changed(&mut self, offset: usize, flags: &[bool]) {
        match self {
            Self::Dynamic(store) => store.changes_mut().restore(offset, flags),
            Self::Fixed(store) => store.changes_mut().restore(offset, flags),
        }
    }
}

impl From<Vec<u8>> for ByteStore<'_> {
    fn from(data: Vec<u8>) -> Self {
        Self::from_vec(data)
    }
}

impl<'a> From<&'a mut [u8]> for ByteStore<'a> {
    fn from(data: &'a mut [u8]) -> Self {
        Self::from_slice(data)
    }
}
