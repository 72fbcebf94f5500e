//! Undo/redo command log.
//!
//! [`CommandLog`] owns every command pushed through it. Pushing applies the
//! command, drops the redo branch, and either folds the command into the
//! newest undo entry or appends it.

use tracing::debug;

use crate::command::EditCommand;
use crate::error::Result;
use crate::store::ByteStore;

/// Default maximum number of undo entries to retain.
pub const DEFAULT_MAX_HISTORY_DEPTH: usize = 1000;

/// How a pushed command ended up in the log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PushOutcome {
    /// Recorded as a new undo entry.
    Appended,
    /// Folded into the previous entry.
    Merged,
}

/// Undo and redo stacks with bounded depth.
#[derive(Debug)]
pub struct CommandLog {
    undo_stack: Vec<EditCommand>,
    redo_stack: Vec<EditCommand>,
    /// Maximum number of undo entries. Oldest entries are dropped when exceeded.
    max_depth: usize,
    /// Set by `commit`; the newest undo entry accepts no merges.
    sealed: bool,
    /// Undo depth at which content was last marked clean, if still reachable.
    clean_index: Option<usize>,
}

impl Default for CommandLog {
    fn default() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth: DEFAULT_MAX_HISTORY_DEPTH,
            sealed: false,
            clean_index: Some(0),
        }
    }
}

impl CommandLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log with a custom maximum depth.
    #[must_use]
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }

    /// Apply `command` to `store` and record it.
    ///
    /// On error nothing is recorded and the store is left untouched.
    pub(crate) fn push(
        &mut self,
        mut command: EditCommand,
        store: &mut ByteStore<'_>,
    ) -> Result<PushOutcome> {
        command.apply(store)?;

        if self.clean_index.is_some_and(|idx| idx > self.undo_stack.len()) {
            self.clean_index = None;
        }
        self.redo_stack.clear();

        // The entry at the clean point stays intact so undo can reach it.
        let top_is_clean = self.clean_index == Some(self.undo_stack.len());
        if !self.sealed && !top_is_clean {
            if let Some(top) = self.undo_stack.last_mut() {
                if top.try_merge(&command) {
                    debug!(offset = command.offset(), kind = ?command.kind(), "merged edit");
                    return Ok(PushOutcome::Merged);
                }
            }
        }

        debug!(
            offset = command.offset(),
            kind = ?command.kind(),
            span = command.span(),
            "recorded edit"
        );
        self.undo_stack.push(command);
        self.sealed = false;
        self.enforce_depth();
        Ok(PushOutcome::Appended)
    }

    /// Revert the newest entry. Returns `false` when there is nothing to undo.
    pub(crate) fn undo(&mut self, store: &mut ByteStore<'_>) -> Result<bool> {
        let Some(mut command) = self.undo_stack.pop() else {
            return Ok(false);
        };
        if let Err(err) = command.invert(store) {
            self.undo_stack.push(command);
            return Err(err);
        }
        debug!(offset = command.offset(), kind = ?command.kind(), "undo");
        self.redo_stack.push(command);
        self.sealed = false;
        Ok(true)
    }

    /// Re-apply the newest undone entry. Returns `false` when there is
    /// nothing to redo.
    pub(crate) fn redo(&mut self, store: &mut ByteStore<'_>) -> Result<bool> {
        let Some(mut command) = self.redo_stack.pop() else {
            return Ok(false);
        };
        if let Err(err) = command.apply(store) {
            self.redo_stack.push(command);
            return Err(err);
        }
        debug!(offset = command.offset(), kind = ?command.kind(), "redo");
        self.undo_stack.push(command);
        self.sealed = false;
        Ok(true)
    }

    /// Close the newest entry so the next push starts a new one.
    pub fn commit(&mut self) {
        self.sealed = true;
    }

    /// Remember the current position as matching the saved content.
    pub fn mark_clean(&mut self) {
        self.clean_index = Some(self.undo_stack.len());
    }

    /// True when the history sits at the position last marked clean.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.clean_index == Some(self.undo_stack.len())
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Newest undo entry.
    #[must_use]
    pub fn last(&self) -> Option<&EditCommand> {
        self.undo_stack.last()
    }

    /// Get the current maximum depth.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Set the maximum depth, dropping the oldest entries if already over it.
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
        self.enforce_depth();
    }

    /// Forget all history. The current content becomes the clean state.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.sealed = false;
        self.clean_index = Some(0);
    }

    fn enforce_depth(&mut self) {
        if self.undo_stack.len() > self.max_depth {
            let excess = self.undo_stack.len() - self.max_depth;
            self.undo_stack.drain(..excess);
            self.clean_index = self.clean_index.and_then(|idx| idx.checked_sub(excess));
        }
    }
}
