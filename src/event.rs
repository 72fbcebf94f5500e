//! Change notification.
//!
//! A document owns its observers; there is no global callback slot. Every
//! successful edit, undo or redo fires one [`ChangeEvent`] to each observer
//! in subscription order.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// What a change touched.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct ChangeKind: u8 {
        /// Byte content or dirty flags changed.
        const CONTENT = 0x01;
        /// The buffer length changed.
        const SIZE    = 0x02;
        /// The undo/redo stacks changed.
        const HISTORY = 0x04;
    }
}

/// Notification sent after a document changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    /// Offset of the edit that caused the change.
    pub offset: usize,
    /// Buffer length after the change.
    pub len: usize,
    /// Document revision after the change.
    pub revision: u64,
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Box<dyn FnMut(&ChangeEvent) + Send + 'static>;

/// Ordered set of change observers.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    entries: Vec<(ObserverId, Observer)>,
}

impl Observers {
    pub(crate) fn subscribe<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&ChangeEvent) + Send + 'static,
    {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(observer)));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn emit(&mut self, event: &ChangeEvent) {
        for (_, observer) in &mut self.entries {
            observer(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.len())
            .finish()
    }
}
