//! Substring search over a store's current content.
//!
//! Both store variants scan the same contiguous slice, so a dynamic and a
//! fixed store with equal content always report the same offsets.

use crate::error::{Error, Result};
use crate::store::ByteStore;

fn check_needle(needle: &[u8]) -> Result<()> {
    if needle.is_empty() {
        return Err(Error::InvalidArgument("search needle must not be empty"));
    }
    Ok(())
}

/// First occurrence of `needle` at or after `from`.
///
/// `from` is clamped to the last valid offset. An empty store never matches.
pub fn index_of(store: &ByteStore<'_>, needle: &[u8], from: usize) -> Result<Option<usize>> {
    check_needle(needle)?;
    let Some(last) = store.len().checked_sub(1) else {
        return Ok(None);
    };
    Ok(store.index_of(needle, from.min(last)))
}

/// Last occurrence of `needle` starting at or before `from`.
///
/// `from` is clamped to the last valid offset. An empty store never matches.
pub fn last_index_of(store: &ByteStore<'_>, needle: &[u8], from: usize) -> Result<Option<usize>> {
    check_needle(needle)?;
    let Some(last) = store.len().checked_sub(1) else {
        return Ok(None);
    };
    Ok(store.last_index_of(needle, from.min(last)))
}
