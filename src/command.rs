//! Undoable edit commands.
//!
//! An [`EditCommand`] is one reversible mutation of a [`ByteStore`]:
//! insert, replace or remove, either of a single byte or of a byte range.
//! Commands are built with the new payload only. Everything needed to undo
//! them is captured when they are applied, since an insert has no old
//! content until it runs.
//!
//! Lifecycle: `Created -> Applied <-> Undone`.

use std::slice;

use crate::error::Result;
use crate::store::{ByteStore, Insertion, Replacement, Snapshot};

/// Kind of mutation, independent of granularity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditKind {
    Insert,
    Replace,
    Remove,
}

/// Mutation payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditOp {
    /// Insert one byte.
    InsertByte(u8),
    /// Insert a byte range.
    InsertBytes(Vec<u8>),
    /// Overwrite one byte.
    ReplaceByte(u8),
    /// Overwrite up to `len` bytes with `bytes` (clamped to `len`).
    ReplaceRange { len: usize, bytes: Vec<u8> },
    /// Remove one byte.
    RemoveByte,
    /// Remove up to the given number of bytes.
    RemoveRange(usize),
}

impl EditOp {
    /// Kind of this operation.
    #[must_use]
    pub fn kind(&self) -> EditKind {
        match self {
            Self::InsertByte(_) | Self::InsertBytes(_) => EditKind::Insert,
            Self::ReplaceByte(_) | Self::ReplaceRange { .. } => EditKind::Replace,
            Self::RemoveByte | Self::RemoveRange(_) => EditKind::Remove,
        }
    }

    /// True for the single-byte variants.
    #[must_use]
    pub fn is_single_byte(&self) -> bool {
        matches!(
            self,
            Self::InsertByte(_) | Self::ReplaceByte(_) | Self::RemoveByte
        )
    }
}

/// Position of a command in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CommandState {
    #[default]
    Created,
    Applied,
    Undone,
}

/// State captured on apply and consumed by invert.
#[derive(Clone, Debug, Default)]
enum UndoState {
    #[default]
    Empty,
    Inserted(Insertion),
    Replaced(Replacement),
    Removed(Snapshot),
}

/// A reversible mutation at one offset.
#[derive(Clone, Debug)]
pub struct EditCommand {
    offset: usize,
    op: EditOp,
    state: CommandState,
    undo: UndoState,
}

impl EditCommand {
    /// Create a command; nothing happens until it is pushed to a log.
    #[must_use]
    pub(crate) fn new(offset: usize, op: EditOp) -> Self {
        Self {
            offset,
            op,
            state: CommandState::Created,
            undo: UndoState::Empty,
        }
    }

    #[must_use]
    pub(crate) fn insert_byte(offset: usize, byte: u8) -> Self {
        Self::new(offset, EditOp::InsertByte(byte))
    }

    #[must_use]
    pub(crate) fn insert_bytes(offset: usize, bytes: Vec<u8>) -> Self {
        Self::new(offset, EditOp::InsertBytes(bytes))
    }

    #[must_use]
    pub(crate) fn replace_byte(offset: usize, byte: u8) -> Self {
        Self::new(offset, EditOp::ReplaceByte(byte))
    }

    #[must_use]
    pub(crate) fn replace_range(offset: usize, len: usize, bytes: Vec<u8>) -> Self {
        Self::new(offset, EditOp::ReplaceRange { len, bytes })
    }

    #[must_use]
    pub(crate) fn remove_byte(offset: usize) -> Self {
        Self::new(offset, EditOp::RemoveByte)
    }

    #[must_use]
    pub(crate) fn remove_range(offset: usize, len: usize) -> Self {
        Self::new(offset, EditOp::RemoveRange(len))
    }

    /// Target offset.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Operation and payload.
    #[must_use]
    pub fn op(&self) -> &EditOp {
        &self.op
    }

    /// Kind of mutation.
    #[must_use]
    pub fn kind(&self) -> EditKind {
        self.op.kind()
    }

    /// Lifecycle state.
    #[must_use]
    pub fn state(&self) -> CommandState {
        self.state
    }

    /// Bytes affected by the last apply: written for insert and replace,
    /// removed for remove. Zero before the first apply.
    #[must_use]
    pub fn span(&self) -> usize {
        match &self.undo {
            UndoState::Empty => 0,
            UndoState::Inserted(ins) => ins.written,
            UndoState::Replaced(rep) => rep.written,
            UndoState::Removed(old) => old.len(),
        }
    }

    /// Perform the forward mutation and capture what undo needs.
    pub(crate) fn apply(&mut self, store: &mut ByteStore<'_>) -> Result<()> {
        debug_assert_ne!(self.state, CommandState::Applied, "command applied twice");
        let offset = self.offset;
        self.undo = match &self.op {
            EditOp::InsertByte(byte) => {
                UndoState::Inserted(store.insert(offset, slice::from_ref(byte))?)
            }
            EditOp::InsertBytes(bytes) => UndoState::Inserted(store.insert(offset, bytes)?),
            EditOp::ReplaceByte(byte) => {
                UndoState::Replaced(store.replace(offset, 1, slice::from_ref(byte))?)
            }
            EditOp::ReplaceRange { len, bytes } => {
                UndoState::Replaced(store.replace(offset, *len, bytes)?)
            }
            EditOp::RemoveByte => UndoState::Removed(store.remove(offset, 1)?),
            EditOp::RemoveRange(len) => UndoState::Removed(store.remove(offset, *len)?),
        };
        self.state = CommandState::Applied;
        Ok(())
    }

    /// Undo the last apply, content and dirty flags both.
    pub(crate) fn invert(&mut self, store: &mut ByteStore<'_>) -> Result<()> {
        debug_assert_eq!(self.state, CommandState::Applied, "command not applied");
        let offset = self.offset;
        match &self.undo {
            UndoState::Empty => {}
            UndoState::Inserted(ins) => {
                if ins.written > 0 {
                    store.remove(offset, ins.written)?;
                }
                // Bytes pushed off a fixed window come back at its end.
                if !ins.spilled.is_empty() {
                    let tail = store.len() - ins.spilled.len();
                    store.restore(tail, ins.spilled.len(), &ins.spilled);
                }
            }
            UndoState::Replaced(rep) => store.restore(offset, rep.written, &rep.old),
            UndoState::Removed(old) => {
                if !old.is_empty() {
                    store.insert(offset, &old.bytes)?;
                    store.set_changed(offset, &old.flags);
                }
            }
        }
        self.state = CommandState::Undone;
        Ok(())
    }

    /// Fold `next` into this command instead of recording it separately.
    ///
    /// Succeeds when this command is not a remove, `next` is a replace at the
    /// same offset and granularity, and `next` rewrote exactly the bytes this
    /// command wrote. Both commands must already be applied; on success this
    /// command takes over `next`'s payload and `next` should be dropped.
    pub(crate) fn try_merge(&mut self, next: &EditCommand) -> bool {
        if self.kind() == EditKind::Remove
            || next.kind() != EditKind::Replace
            || self.offset != next.offset
            || self.op.is_single_byte() != next.op.is_single_byte()
            || self.state != CommandState::Applied
            || next.state != CommandState::Applied
        {
            return false;
        }

        let span = self.span();
        let UndoState::Replaced(rep) = &next.undo else {
            return false;
        };
        if rep.written != span || rep.old.len() != span {
            return false;
        }

        match (&mut self.op, &next.op) {
            (
                EditOp::InsertByte(byte) | EditOp::ReplaceByte(byte),
                EditOp::ReplaceByte(new_byte),
            ) => *byte = *new_byte,
            (
                EditOp::InsertBytes(bytes) | EditOp::ReplaceRange { bytes, .. },
                EditOp::ReplaceRange {
                    bytes: new_bytes, ..
                },
            ) => *bytes = new_bytes[..span].to_vec(),
            _ => return false,
        }
        true
    }
}
