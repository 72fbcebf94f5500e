//! Editable byte document with undo/redo and change tracking.
//!
//! [`HexDocument`] is the engine's single entry point. It owns a
//! [`ByteStore`], the [`CommandLog`] that every mutation flows through, and
//! the observers that are told about each change.
//!
//! # Examples
//!
//! ```
//! use hexedit_rust::HexDocument;
//!
//! let mut doc = HexDocument::new();
//!
//! // Typing a byte as two nibbles collapses into one undo step.
//! doc.insert_byte(0, 0x00).unwrap();
//! doc.replace_byte(0, 0x03).unwrap();
//! doc.replace_byte(0, 0x34).unwrap();
//! assert_eq!(doc.as_bytes(), &[0x34]);
//! assert_eq!(doc.undo_count(), 1);
//!
//! doc.undo().unwrap();
//! assert!(doc.is_empty());
//! ```

use tracing::debug;

use crate::command::EditCommand;
use crate::dump::{self, DumpOptions};
use crate::error::{Error, Result};
use crate::event::{ChangeEvent, ChangeKind, ObserverId, Observers};
use crate::history::{CommandLog, DEFAULT_MAX_HISTORY_DEPTH};
use crate::search;
use crate::store::{ByteStore, ChangeMask};

/// Document behavior settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DocumentOptions {
    /// Turn `insert_bytes` into replaces and removes into zero-fills.
    pub overwrite_mode: bool,
    /// Reject every mutation.
    pub read_only: bool,
    /// Maximum number of undo steps kept.
    pub max_history_depth: usize,
    /// Address column settings for dumps.
    pub dump: DumpOptions,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            overwrite_mode: false,
            read_only: false,
            max_history_depth: DEFAULT_MAX_HISTORY_DEPTH,
            dump: DumpOptions::default(),
        }
    }
}

/// Editable byte buffer with undo/redo history.
///
/// `HexDocument` provides:
///
/// - **Queries**: length, bytes, ranges, per-byte dirty flags
/// - **Edits**: insert, replace and remove of single bytes or ranges, each
///   recorded as one undoable command
/// - **History**: undo/redo with merging of in-place retyping, explicit
///   merge boundaries, a depth bound and clean-state tracking
/// - **Search**: forward and backward substring search
/// - **Notification**: observers called after every change
///
/// A document built with [`from_slice`](Self::from_slice) edits
/// caller-owned memory in place and can never change length.
#[derive(Debug, Default)]
pub struct HexDocument<'a> {
    store: ByteStore<'a>,
    history: CommandLog,
    options: DocumentOptions,
    observers: Observers,
    revision: u64,
}

impl<'a> HexDocument<'a> {
    /// Create an empty, growable document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a growable document that owns `data`.
    #[must_use]
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self::with_options(ByteStore::from_vec(data), DocumentOptions::default())
    }

    /// Create a fixed-length document over caller-owned memory.
    #[must_use]
    pub fn from_slice(data: &'a mut [u8]) -> Self {
        Self::with_options(ByteStore::from_slice(data), DocumentOptions::default())
    }

    /// Create a document over `store` with custom options.
    #[must_use]
    pub fn with_options(store: ByteStore<'a>, options: DocumentOptions) -> Self {
        Self {
            store,
            history: CommandLog::with_max_depth(options.max_history_depth),
            options,
            observers: Observers::default(),
            revision: 0,
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Underlying storage.
    #[must_use]
    pub fn store(&self) -> &ByteStore<'a> {
        &self.store
    }

    /// Undo/redo history.
    #[must_use]
    pub fn history(&self) -> &CommandLog {
        &self.history
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// True when the document edits a fixed-length window.
    #[must_use]
    pub fn is_fixed_capacity(&self) -> bool {
        self.store.is_fixed_capacity()
    }

    /// Byte at `offset`.
    pub fn at(&self, offset: usize) -> Result<u8> {
        self.store.at(offset)
    }

    /// Up to `len` bytes starting at `offset`.
    pub fn range(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.store.range(offset, len)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.store.as_bytes()
    }

    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.store.to_bytes()
    }

    /// Whether the byte at `offset` changed since load.
    pub fn is_changed(&self, offset: usize) -> Result<bool> {
        self.store.is_changed(offset)
    }

    /// Dirty flags for up to `len` bytes starting at `offset`.
    pub fn changed_range(&self, offset: usize, len: usize) -> Result<&[bool]> {
        self.store.changed_range(offset, len)
    }

    /// All dirty flags.
    #[must_use]
    pub fn changes(&self) -> &ChangeMask {
        self.store.changes()
    }

    /// Printable form of the byte at `offset`.
    pub fn ascii_char(&self, offset: usize) -> Result<char> {
        self.store.at(offset).map(dump::ascii_char)
    }

    /// Incremented on every content change, undo and redo.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ------------------------------------------------------------------
    // Options
    // ------------------------------------------------------------------

    #[must_use]
    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    pub fn set_overwrite_mode(&mut self, enabled: bool) {
        self.options.overwrite_mode = enabled;
    }

    #[must_use]
    pub fn overwrite_mode(&self) -> bool {
        self.options.overwrite_mode
    }

    pub fn set_read_only(&mut self, enabled: bool) {
        self.options.read_only = enabled;
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.options.read_only
    }

    /// Set the maximum undo depth, dropping the oldest steps if needed.
    pub fn set_max_history_depth(&mut self, max_depth: usize) {
        self.options.max_history_depth = max_depth;
        self.history.set_max_depth(max_depth);
    }

    /// Set the minimum number of digits in the dump address column.
    pub fn set_address_width(&mut self, width: usize) {
        self.options.dump.address_width = width;
    }

    /// Set the value added to every dumped address.
    pub fn set_address_offset(&mut self, offset: usize) {
        self.options.dump.address_offset = offset;
    }

    // ------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------

    /// Insert `byte` before `offset`. `offset == len()` appends.
    ///
    /// Always inserts, even in overwrite mode. On a fixed-capacity document
    /// the last byte is pushed out, and inserting at the very end does
    /// nothing.
    pub fn insert_byte(&mut self, offset: usize, byte: u8) -> Result<()> {
        self.ensure_writable()?;
        if !self.check_insert(offset)? {
            return Ok(());
        }
        self.push(EditCommand::insert_byte(offset, byte))
    }

    /// Insert `bytes` before `offset`. `offset == len()` appends.
    ///
    /// In overwrite mode the bytes at `offset` are replaced instead. On a
    /// fixed-capacity document bytes pushed past the end are discarded, and
    /// a payload longer than the room left is cut to fit.
    pub fn insert_bytes(&mut self, offset: usize, bytes: &[u8]) -> Result<()> {
        self.ensure_writable()?;
        if bytes.is_empty() {
            return Ok(());
        }
        if self.options.overwrite_mode && offset < self.len() {
            return self.replace_bytes(offset, bytes);
        }
        if !self.check_insert(offset)? {
            return Ok(());
        }
        self.push(EditCommand::insert_bytes(offset, bytes.to_vec()))
    }

    /// Remove up to `len` bytes starting at `offset`.
    ///
    /// In overwrite mode the bytes are zeroed instead. On a fixed-capacity
    /// document the tail shifts down and the end is zero-filled.
    pub fn remove_range(&mut self, offset: usize, len: usize) -> Result<()> {
        self.ensure_writable()?;
        if len == 0 {
            return Ok(());
        }
        self.check_offset(offset)?;
        if self.options.overwrite_mode {
            let len = len.min(self.len() - offset);
            return if len == 1 {
                self.push(EditCommand::replace_byte(offset, 0))
            } else {
                self.push(EditCommand::replace_range(offset, len, vec![0; len]))
            };
        }
        if len == 1 {
            self.push(EditCommand::remove_byte(offset))
        } else {
            self.push(EditCommand::remove_range(offset, len))
        }
    }

    /// Overwrite the byte at `offset`.
    ///
    /// Retyping the byte just inserted or replaced at the same offset is
    /// folded into that earlier undo step.
    pub fn replace_byte(&mut self, offset: usize, byte: u8) -> Result<()> {
        self.ensure_writable()?;
        self.check_offset(offset)?;
        self.push(EditCommand::replace_byte(offset, byte))
    }

    /// Overwrite `bytes.len()` bytes at `offset`, clamped to the end.
    pub fn replace_bytes(&mut self, offset: usize, bytes: &[u8]) -> Result<()> {
        self.replace_range(offset, bytes.len(), bytes)
    }

    /// Replace up to `len` bytes at `offset` with `bytes`.
    ///
    /// At most `len` payload bytes are used. On a growable document a
    /// payload shorter than `len` shrinks the buffer; on a fixed-capacity
    /// document only the bytes that fit are written.
    pub fn replace_range(&mut self, offset: usize, len: usize, bytes: &[u8]) -> Result<()> {
        self.ensure_writable()?;
        if len == 0 || (bytes.is_empty() && self.is_fixed_capacity()) {
            return Ok(());
        }
        self.check_offset(offset)?;
        self.push(EditCommand::replace_range(offset, len, bytes.to_vec()))
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Revert the last edit. Returns `false` when there is nothing to undo
    /// or the document is read-only.
    pub fn undo(&mut self) -> Result<bool> {
        if self.options.read_only {
            return Ok(false);
        }
        let offset = self.history.last().map_or(0, EditCommand::offset);
        let len_before = self.len();
        if !self.history.undo(&mut self.store)? {
            return Ok(false);
        }
        self.notify(offset, len_before);
        Ok(true)
    }

    /// Re-apply the last undone edit. Returns `false` when there is nothing
    /// to redo or the document is read-only.
    pub fn redo(&mut self) -> Result<bool> {
        if self.options.read_only {
            return Ok(false);
        }
        let len_before = self.len();
        if !self.history.redo(&mut self.store)? {
            return Ok(false);
        }
        let offset = self.history.last().map_or(0, EditCommand::offset);
        self.notify(offset, len_before);
        Ok(true)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.history.undo_count()
    }

    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.history.redo_count()
    }

    /// Force an undo boundary: the next edit starts a new step even if it
    /// would otherwise merge. Undo and redo do not set a boundary.
    pub fn commit(&mut self) {
        self.history.commit();
    }

    /// Forget all undo/redo steps. Content and dirty flags are kept.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Record the current state as saved.
    pub fn mark_clean(&mut self) {
        self.history.mark_clean();
    }

    /// True when undo/redo has moved away from the state last marked clean.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        !self.history.is_clean()
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// First occurrence of `needle` at or after `from`.
    pub fn index_of(&self, needle: &[u8], from: usize) -> Result<Option<usize>> {
        search::index_of(&self.store, needle, from)
    }

    /// Last occurrence of `needle` starting at or before `from`.
    pub fn last_index_of(&self, needle: &[u8], from: usize) -> Result<Option<usize>> {
        search::last_index_of(&self.store, needle, from)
    }

    // ------------------------------------------------------------------
    // Dump
    // ------------------------------------------------------------------

    /// Hex dump of the whole document.
    #[must_use]
    pub fn to_readable_string(&self) -> String {
        dump::to_readable_string(&self.store, 0, self.len(), &self.options.dump)
    }

    /// Hex dump of `[start, end)`.
    #[must_use]
    pub fn range_to_readable_string(&self, start: usize, end: usize) -> String {
        dump::to_readable_string(&self.store, start, end, &self.options.dump)
    }

    /// Digits used by the dump address column.
    #[must_use]
    pub fn address_width(&self) -> usize {
        dump::address_width(self.len(), &self.options.dump)
    }

    // ------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------

    /// Call `observer` after every edit, undo and redo.
    pub fn subscribe<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&ChangeEvent) + Send + 'static,
    {
        self.observers.subscribe(observer)
    }

    /// Remove an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn ensure_writable(&self) -> Result<()> {
        if self.options.read_only {
            debug!("edit rejected: document is read-only");
            return Err(Error::ReadOnly);
        }
        Ok(())
    }

    fn check_offset(&self, offset: usize) -> Result<()> {
        if offset >= self.len() {
            debug!(offset, len = self.len(), "edit rejected: offset out of range");
            return Err(Error::out_of_range(offset, self.len()));
        }
        Ok(())
    }

    /// Validate an insert position. `Ok(false)` means nothing would land.
    fn check_insert(&self, offset: usize) -> Result<bool> {
        let len = self.len();
        if offset > len {
            debug!(offset, len, "insert rejected: offset out of range");
            return Err(Error::out_of_range(offset, len));
        }
        Ok(!(self.is_fixed_capacity() && offset == len))
    }

    fn push(&mut self, command: EditCommand) -> Result<()> {
        let offset = command.offset();
        let len_before = self.len();
        self.history.push(command, &mut self.store)?;
        self.notify(offset, len_before);
        Ok(())
    }

    fn notify(&mut self, offset: usize, len_before: usize) {
        self.revision += 1;
        let len = self.len();
        let mut kind = ChangeKind::CONTENT | ChangeKind::HISTORY;
        if len != len_before {
            kind |= ChangeKind::SIZE;
        }
        let event = ChangeEvent {
            kind,
            offset,
            len,
            revision: self.revision,
        };
        self.observers.emit(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder(doc: &mut HexDocument<'_>) -> Arc<Mutex<Vec<ChangeEvent>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        doc.subscribe(move |ev| sink.lock().unwrap().push(*ev));
        events
    }

    #[test]
    fn edits_mark_bytes_dirty() {
        let mut doc = HexDocument::from_vec(vec![1, 2, 3]);
        doc.replace_byte(1, 9).unwrap();
        assert_eq!(doc.is_changed(0), Ok(false));
        assert_eq!(doc.is_changed(1), Ok(true));
        doc.undo().unwrap();
        assert_eq!(doc.is_changed(1), Ok(false));
    }

    #[test]
    fn remove_single_byte_uses_byte_command() {
        let mut doc = HexDocument::from_vec(vec![1, 2, 3]);
        doc.remove_range(1, 1).unwrap();
        assert!(doc.history().last().unwrap().op().is_single_byte());
        doc.remove_range(0, 2).unwrap();
        assert!(!doc.history().last().unwrap().op().is_single_byte());
        assert!(doc.is_empty());
    }

    #[test]
    fn zero_length_edits_are_noops() {
        let mut doc = HexDocument::from_vec(vec![1, 2, 3]);
        doc.insert_bytes(0, &[]).unwrap();
        doc.remove_range(10, 0).unwrap();
        doc.replace_range(0, 0, &[1]).unwrap();
        doc.replace_bytes(0, &[]).unwrap();
        assert_eq!(doc.undo_count(), 0);
        assert_eq!(doc.revision(), 0);
    }

    #[test]
    fn out_of_range_edits_fail() {
        let mut doc = HexDocument::from_vec(vec![1, 2, 3]);
        assert!(matches!(doc.insert_byte(4, 0), Err(Error::OutOfRange { .. })));
        assert!(matches!(doc.remove_range(3, 1), Err(Error::OutOfRange { .. })));
        assert!(matches!(doc.replace_byte(3, 0), Err(Error::OutOfRange { .. })));
        assert!(doc.replace_range(5, 1, &[0]).is_err());
        assert_eq!(doc.as_bytes(), &[1, 2, 3]);
        assert_eq!(doc.undo_count(), 0);
    }

    #[test]
    fn insert_at_end_appends_when_growable() {
        let mut doc = HexDocument::from_vec(vec![1]);
        doc.insert_byte(1, 2).unwrap();
        assert_eq!(doc.as_bytes(), &[1, 2]);
    }

    #[test]
    fn insert_at_end_of_fixed_is_noop() {
        let mut memory = [1, 2];
        let mut doc = HexDocument::from_slice(&mut memory);
        doc.insert_byte(2, 9).unwrap();
        doc.insert_bytes(2, &[9, 9]).unwrap();
        assert_eq!(doc.as_bytes(), &[1, 2]);
        assert_eq!(doc.undo_count(), 0);
    }

    #[test]
    fn overwrite_mode_replaces_instead_of_inserting() {
        let mut doc = HexDocument::from_vec(vec![1, 2, 3]);
        doc.set_overwrite_mode(true);
        doc.insert_bytes(0, &[7, 8]).unwrap();
        assert_eq!(doc.as_bytes(), &[7, 8, 3]);

        doc.remove_range(1, 5).unwrap();
        assert_eq!(doc.as_bytes(), &[7, 0, 0]);

        // The end of a growable buffer still appends.
        doc.insert_bytes(3, &[4]).unwrap();
        assert_eq!(doc.as_bytes(), &[7, 0, 0, 4]);
    }

    #[test]
    fn overwrite_mode_still_inserts_single_bytes() {
        let mut doc = HexDocument::from_vec(vec![1, 2, 3]);
        doc.set_overwrite_mode(true);
        doc.insert_byte(1, 9).unwrap();
        assert_eq!(doc.as_bytes(), &[1, 9, 2, 3]);
        doc.undo().unwrap();
        assert_eq!(doc.as_bytes(), &[1, 2, 3]);
    }

    #[test]
    fn read_only_rejects_edits() {
        let mut doc = HexDocument::from_vec(vec![1, 2, 3]);
        doc.replace_byte(0, 5).unwrap();
        doc.set_read_only(true);
        assert_eq!(doc.insert_byte(0, 1), Err(Error::ReadOnly));
        assert_eq!(doc.remove_range(0, 1), Err(Error::ReadOnly));
        assert_eq!(doc.replace_bytes(0, &[1]), Err(Error::ReadOnly));
        assert_eq!(doc.undo(), Ok(false));
        assert_eq!(doc.as_bytes(), &[5, 2, 3]);

        doc.set_read_only(false);
        assert_eq!(doc.undo(), Ok(true));
        assert_eq!(doc.as_bytes(), &[1, 2, 3]);
    }

    #[test]
    fn events_fire_for_edits_undo_and_redo() {
        let mut doc = HexDocument::from_vec(vec![1, 2, 3]);
        let events = recorder(&mut doc);

        doc.insert_byte(1, 0xAA).unwrap();
        doc.replace_byte(0, 0xBB).unwrap();
        doc.undo().unwrap();
        doc.redo().unwrap();
        doc.undo().unwrap();
        doc.undo().unwrap();
        // Nothing left: no event.
        doc.undo().unwrap();

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 6);
        assert!(events[0].kind.contains(ChangeKind::SIZE));
        assert_eq!(events[0].offset, 1);
        assert_eq!(events[0].len, 4);
        assert!(!events[1].kind.contains(ChangeKind::SIZE));
        assert_eq!(events[1].offset, 0);
        assert!(events[5].kind.contains(ChangeKind::SIZE));
        assert_eq!(events[5].len, 3);
        assert_eq!(events[5].revision, 6);
    }

    #[test]
    fn failed_edit_sends_no_event() {
        let mut doc = HexDocument::from_vec(vec![1]);
        let events = recorder(&mut doc);
        assert!(doc.replace_byte(5, 0).is_err());
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn modified_tracks_clean_point() {
        let mut doc = HexDocument::from_vec(vec![1, 2]);
        assert!(!doc.is_modified());
        doc.replace_byte(0, 3).unwrap();
        assert!(doc.is_modified());
        doc.mark_clean();
        assert!(!doc.is_modified());
        doc.undo().unwrap();
        assert!(doc.is_modified());
        doc.redo().unwrap();
        assert!(!doc.is_modified());
    }

    #[test]
    fn ascii_char_reads_through() {
        let doc = HexDocument::from_vec(vec![b'A', 0x00]);
        assert_eq!(doc.ascii_char(0), Ok('A'));
        assert_eq!(doc.ascii_char(1), Ok('.'));
        assert!(doc.ascii_char(2).is_err());
    }

    #[test]
    fn history_depth_option_applies() {
        let options = DocumentOptions {
            max_history_depth: 1,
            ..DocumentOptions::default()
        };
        let mut doc = HexDocument::with_options(ByteStore::from_vec(vec![0; 3]), options);
        doc.replace_byte(0, 1).unwrap();
        doc.replace_byte(1, 1).unwrap();
        assert_eq!(doc.undo_count(), 1);
        doc.set_max_history_depth(0);
        assert!(!doc.can_undo());
    }
}
