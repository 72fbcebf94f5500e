//! `hexedit` - Byte-buffer editing engine for hex editors
//!
//! Provides a growable or fixed-length byte store with per-byte change
//! tracking, command-based undo/redo with merging of in-place retyping,
//! substring search and a printable hex dump.

// Crate-level lint configuration
#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)] // Allow store::ByteStore etc
#![allow(clippy::missing_errors_doc)] // Errors are the crate Error enum
#![allow(clippy::missing_panics_doc)] // Panics only in tests
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::struct_excessive_bools)] // Options carry several mode flags
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::needless_collect)] // Collect for assertions is clear

pub mod command;
pub mod document;
pub mod dump;
pub mod error;
pub mod event;
pub mod history;
pub mod search;
pub mod store;

// Re-export core types at crate root
pub use document::{DocumentOptions, HexDocument};
pub use error::{Error, Result};
pub use event::{ChangeEvent, ChangeKind, ObserverId};
pub use store::{ByteStore, ChangeMask, DynamicStore, FixedStore};

// Re-export history types
pub use command::{CommandState, EditCommand, EditKind, EditOp};
pub use history::{CommandLog, DEFAULT_MAX_HISTORY_DEPTH};

pub use dump::DumpOptions;
