//! Per-offset change tracking.
//!
//! [`ChangeMask`] holds one flag per byte of its owning store. Stores resize
//! it in the same call that resizes their content, so the two lengths never
//! drift apart.

/// One dirty flag per byte offset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeMask {
    flags: Vec<bool>,
}

impl ChangeMask {
    /// Create a mask of `len` clean flags.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            flags: vec![false; len],
        }
    }

    /// Number of tracked offsets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// True when no offsets are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Flag at `offset`, or `None` past the end.
    #[must_use]
    pub fn get(&self, offset: usize) -> Option<bool> {
        self.flags.get(offset).copied()
    }

    /// Flags in `[offset, offset + len)`, truncated at the end.
    #[must_use]
    pub fn slice(&self, offset: usize, len: usize) -> &[bool] {
        let start = offset.min(self.flags.len());
        let end = offset.saturating_add(len).min(self.flags.len());
        &self.flags[start..end]
    }

    /// Number of offsets currently marked dirty.
    #[must_use]
    pub fn count_changed(&self) -> usize {
        self.flags.iter().filter(|&&flag| flag).count()
    }

    /// Replace `remove` flags at `offset` with `replacement`.
    ///
    /// This is the growable path: the mask length changes by
    /// `replacement.len() - remove`.
    pub(crate) fn splice(&mut self, offset: usize, remove: usize, replacement: &[bool]) {
        let start = offset.min(self.flags.len());
        let end = offset.saturating_add(remove).min(self.flags.len());
        self.flags.splice(start..end, replacement.iter().copied());
    }

    /// Set `count` flags starting at `offset` to `value`, clamped to the end.
    pub(crate) fn fill(&mut self, offset: usize, count: usize, value: bool) {
        let start = offset.min(self.flags.len());
        let end = offset.saturating_add(count).min(self.flags.len());
        self.flags[start..end].fill(value);
    }

    /// Overwrite flags from `offset` with `flags`, dropping what does not fit.
    pub(crate) fn restore(&mut self, offset: usize, flags: &[bool]) {
        let start = offset.min(self.flags.len());
        let n = flags.len().min(self.flags.len() - start);
        self.flags[start..start + n].copy_from_slice(&flags[..n]);
    }

    /// Fixed-window insert: shift flags at/after `offset` right by `count`,
    /// dropping the ones pushed past the end, and mark the opened gap dirty.
    pub(crate) fn shift_in(&mut self, offset: usize, count: usize) {
        let len = self.flags.len();
        if offset >= len || count == 0 {
            return;
        }
        let count = count.min(len - offset);
        self.flags.copy_within(offset..len - count, offset + count);
        self.flags[offset..offset + count].fill(true);
    }

    /// Fixed-window remove: shift flags after `offset + count` left to close
    /// the gap and mark the vacated tail dirty.
    pub(crate) fn shift_out(&mut self, offset: usize, count: usize) {
        let len = self.flags.len();
        if offset >= len || count == 0 {
            return;
        }
        let count = count.min(len - offset);
        self.flags.copy_within(offset + count..len, offset);
        self.flags[len - count..].fill(true);
    }
}
