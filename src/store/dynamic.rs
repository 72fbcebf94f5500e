//! Growable in-memory storage.

use super::{ChangeMask, Insertion, Replacement, Snapshot};
use crate::error::{Error, Result};

/// Owned, resizable byte storage.
#[derive(Clone, Debug, Default)]
pub struct DynamicStore {
    data: Vec<u8>,
    changed: ChangeMask,
}

impl DynamicStore {
    /// Take ownership of `data`; every byte starts clean.
    #[must_use]
    pub fn new(data: Vec<u8>) -> Self {
        let changed = ChangeMask::new(data.len());
        Self { data, changed }
    }

    /// Current content.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Dirty flags.
    #[must_use]
    pub fn changes(&self) -> &ChangeMask {
        &self.changed
    }

    /// Consume the store and return its bytes.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    pub(crate) fn changes_mut(&mut self) -> &mut ChangeMask {
        &mut self.changed
    }

    pub(crate) fn insert(&mut self, offset: usize, bytes: &[u8]) -> Result<Insertion> {
        if offset > self.data.len() {
            return Err(Error::out_of_range(offset, self.data.len()));
        }
        self.data.splice(offset..offset, bytes.iter().copied());
        self.changed.splice(offset, 0, &vec![true; bytes.len()]);
        Ok(Insertion {
            written: bytes.len(),
            spilled: Snapshot::default(),
        })
    }

    pub(crate) fn remove(&mut self, offset: usize, len: usize) -> Result<Snapshot> {
        if offset >= self.data.len() {
            return Err(Error::out_of_range(offset, self.data.len()));
        }
        let len = len.min(self.data.len() - offset);
        let old = Snapshot::capture(&self.data, &self.changed, offset, len);
        self.data.drain(offset..offset + len);
        self.changed.splice(offset, len, &[]);
        Ok(old)
    }

    /// Replace up to `len` bytes at `offset`.
    ///
    /// `len` is clamped to the bytes available, and the payload is clamped to
    /// `len`. A payload shorter than `len` shrinks the store.
    pub(crate) fn replace(
        &mut self,
        offset: usize,
        len: usize,
        bytes: &[u8],
    ) -> Result<Replacement> {
        if offset >= self.data.len() {
            return Err(Error::out_of_range(offset, self.data.len()));
        }
        let len = len.min(self.data.len() - offset);
        let payload = &bytes[..len.min(bytes.len())];
        let old = Snapshot::capture(&self.data, &self.changed, offset, len);
        self.data.splice(offset..offset + len, payload.iter().copied());
        self.changed.splice(offset, len, &vec![true; payload.len()]);
        Ok(Replacement {
            written: payload.len(),
            old,
        })
    }

    pub(crate) fn restore(&mut self, offset: usize, replaced: usize, snapshot: &Snapshot) {
        let start = offset.min(self.data.len());
        let end = offset.saturating_add(replaced).min(self.data.len());
        self.data.splice(start..end, snapshot.bytes.iter().copied());
        self.changed.splice(start, end - start, &snapshot.flags);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(bytes: &[u8]) -> DynamicStore {
        DynamicStore::new(bytes.to_vec())
    }

    #[test]
    fn insert_grows_and_marks() {
        let mut s = store(&[0xAA, 0xBB]);
        let ins = s.insert(1, &[1, 2, 3]).unwrap();
        assert_eq!(ins.written, 3);
        assert!(ins.spilled.is_empty());
        assert_eq!(s.as_bytes(), &[0xAA, 1, 2, 3, 0xBB]);
        assert_eq!(s.changes().slice(0, 5), &[false, true, true, true, false]);
    }

    #[test]
    fn insert_at_end_appends() {
        let mut s = store(&[1]);
        s.insert(1, &[2]).unwrap();
        assert_eq!(s.as_bytes(), &[1, 2]);
        assert!(s.insert(3, &[9]).is_err());
    }

    #[test]
    fn remove_shrinks_and_snapshots() {
        let mut s = store(&[1, 2, 3, 4]);
        s.changes_mut().fill(2, 1, true);
        let old = s.remove(1, 2).unwrap();
        assert_eq!(old.bytes, vec![2, 3]);
        assert_eq!(old.flags, vec![false, true]);
        assert_eq!(s.as_bytes(), &[1, 4]);
        assert_eq!(s.changes().len(), 2);
    }

    #[test]
    fn remove_clamps_len() {
        let mut s = store(&[1, 2, 3]);
        let old = s.remove(1, 100).unwrap();
        assert_eq!(old.bytes, vec![2, 3]);
        assert_eq!(s.as_bytes(), &[1]);
        assert!(s.remove(1, 1).is_err());
    }

    #[test]
    fn replace_clamps_payload_to_len() {
        let mut s = store(&[0xAA, 0xBB, 0xCC]);
        let rep = s.replace(1, 1, &[0xFF, 0xFF]).unwrap();
        assert_eq!(rep.written, 1);
        assert_eq!(rep.old.bytes, vec![0xBB]);
        assert_eq!(s.as_bytes(), &[0xAA, 0xFF, 0xCC]);
        assert_eq!(s.changes().slice(0, 3), &[false, true, false]);
    }

    #[test]
    fn replace_with_short_payload_shrinks() {
        let mut s = store(&[1, 2, 3, 4]);
        let rep = s.replace(1, 3, &[9]).unwrap();
        assert_eq!(rep.written, 1);
        assert_eq!(s.as_bytes(), &[1, 9]);
        assert_eq!(s.changes().len(), 2);
    }

    #[test]
    fn restore_undoes_replace() {
        let mut s = store(&[1, 2, 3, 4]);
        let rep = s.replace(1, 3, &[9]).unwrap();
        s.restore(1, rep.written, &rep.old);
        assert_eq!(s.as_bytes(), &[1, 2, 3, 4]);
        assert_eq!(s.changes().count_changed(), 0);
    }
}
