//! Shared iteration engine for all four enum flavors.
//!
//! One tagged-mode state machine produces the name, value, and entry
//! sequences for every enum representation, instead of one bespoke iterator
//! type per flavor. The mode carries the backing sequences: explicit shared
//! arrays for most flavors, or nothing at all for the numeric flavor, whose
//! values are recomputed from the cursor.
//!
//! A session is created per `keys()`/`values()`/`entries()` call, is
//! forward-only, and exhausts deterministically: once the cursor reaches
//! the end bound the mode is replaced by a drained state so the backing
//! arrays are released instead of being retained by a lingering session.

use std::{iter::FusedIterator, sync::Arc};

use crate::value::Value;

/// One item produced by the engine; the mode determines which shape.
#[derive(Debug, Clone)]
pub(crate) enum IterItem {
    /// A member name.
    Key(Arc<str>),
    /// A member value.
    Value(Value),
    /// A `(name, value)` pair.
    Entry(Arc<str>, Value),
}

/// Type-specific iteration state, selected at session construction.
#[derive(Debug, Clone)]
pub(crate) enum IterMode {
    /// Consecutive integers derived from the cursor itself. Used for the
    /// numeric flavor's values, which never materialize an array.
    RawRange { offset: i64 },
    /// Names out of the shared key array.
    Keys { keys: Arc<[Arc<str>]> },
    /// Values out of the shared value array.
    Values { values: Arc<[Value]> },
    /// `(name, offset + cursor)` pairs: numeric-flavor entries pair the key
    /// array with the implicit range.
    RangeEntries { keys: Arc<[Arc<str>]>, offset: i64 },
    /// `(name, value)` pairs from two parallel arrays.
    Entries {
        keys: Arc<[Arc<str>]>,
        values: Arc<[Value]>,
    },
    /// Exhausted; backing arrays have been released.
    Drained,
}

/// Iteration state for one traversal of one enum.
///
/// Sessions are never shared or reused; every yielding step advances the
/// cursor by exactly one, and there is no reverse iteration or seeking.
#[derive(Debug)]
pub(crate) struct EnumIter {
    /// Current cursor, shared across all modes.
    index: usize,
    /// Exclusive end bound.
    end: usize,
    /// Mode tag plus backing sequences.
    mode: IterMode,
}

impl EnumIter {
    pub(crate) fn new(mode: IterMode, end: usize) -> Self {
        Self { index: 0, end, mode }
    }
}

impl Iterator for EnumIter {
    type Item = IterItem;

    fn next(&mut self) -> Option<IterItem> {
        if matches!(self.mode, IterMode::Drained) {
            return None;
        }
        if self.index >= self.end {
            // Release the backing arrays; a session held past exhaustion
            // must not keep large member arrays alive.
            self.mode = IterMode::Drained;
            return None;
        }
        let index = self.index;
        let item = match &self.mode {
            IterMode::RawRange { offset } => IterItem::Value(Value::Int(offset + index as i64)),
            IterMode::Keys { keys } => IterItem::Key(keys[index].clone()),
            IterMode::Values { values } => IterItem::Value(values[index].clone()),
            IterMode::RangeEntries { keys, offset } => {
                IterItem::Entry(keys[index].clone(), Value::Int(offset + index as i64))
            }
            IterMode::Entries { keys, values } => IterItem::Entry(keys[index].clone(), values[index].clone()),
            IterMode::Drained => unreachable!("drained sessions return early"),
        };
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end.saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for EnumIter {}
impl FusedIterator for EnumIter {}

/// Iterator over an enum's member names, in declaration order.
///
/// This is also the enum's default iteration (`&Enum` iterates names).
#[derive(Debug)]
pub struct Keys(pub(crate) EnumIter);

impl Iterator for Keys {
    type Item = Arc<str>;

    fn next(&mut self) -> Option<Arc<str>> {
        self.0.next().map(|item| match item {
            IterItem::Key(key) => key,
            _ => unreachable!("key sessions yield names"),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for Keys {}
impl FusedIterator for Keys {}

/// Iterator over an enum's member values, in declaration order.
#[derive(Debug)]
pub struct Values(pub(crate) EnumIter);

impl Iterator for Values {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        self.0.next().map(|item| match item {
            IterItem::Value(value) => value,
            _ => unreachable!("value sessions yield values"),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for Values {}
impl FusedIterator for Values {}

/// Iterator over an enum's `(name, value)` pairs, in declaration order.
#[derive(Debug)]
pub struct Entries(pub(crate) EnumIter);

impl Iterator for Entries {
    type Item = (Arc<str>, Value);

    fn next(&mut self) -> Option<(Arc<str>, Value)> {
        self.0.next().map(|item| match item {
            IterItem::Entry(key, value) => (key, value),
            _ => unreachable!("entry sessions yield pairs"),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for Entries {}
impl FusedIterator for Entries {}
