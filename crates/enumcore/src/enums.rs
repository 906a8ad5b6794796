//! Sealed enum objects and their construction factories.
//!
//! All four construction strategies produce the same [`Enum`] surface; the
//! flavor only decides the internal members representation, a tagged state
//! carried next to the shared key array:
//!
//! - [`init_enum`] — arbitrary values with a value-keyed reverse table.
//! - [`init_string_enum`] — names double as values, no extra tables.
//! - [`init_number_enum`] — consecutive integers from an offset; membership
//!   and reverse lookup are pure arithmetic range checks.
//! - [`init_object_enum`] — one identity-backed [`Variant`] per member,
//!   with an explicit open window ([`EnumBuilder`]) for deferred value
//!   binding before sealing.
//!
//! Sealing is unconditional and irreversible. The first three factories
//! seal before returning; the object flavor seals when the builder is
//! consumed. After sealing there is no structural mutation entry point in
//! any public signature, so a sealed enum and everything reachable from it
//! can be shared freely.

use std::{
    cmp::Ordering,
    sync::{Arc, OnceLock, Weak},
};

use ahash::AHashMap;

use crate::{
    error::{EnumError, EnumResult, ErrorKind},
    iter::{Entries, EnumIter, IterMode, Keys, Values},
    value::Value,
    variant::{Variant, VariantId, set_value},
};

/// Per-flavor members representation.
///
/// Member names live in the shared key array on [`EnumCell`]; this tag only
/// carries what the flavor needs for values and reverse lookup.
#[derive(Debug)]
enum Members {
    /// General value-backed members: a value array plus a value-keyed
    /// position index built in one pass at construction.
    Mapped {
        values: Arc<[Value]>,
        by_value: AHashMap<Value, usize>,
    },
    /// String-backed members: the values are the names themselves (shared
    /// storage with the key array), and the name index suffices for
    /// reverse lookup.
    Keyed { values: Arc<[Value]> },
    /// Number-backed members: consecutive integers starting at `offset`,
    /// never materialized.
    Range { offset: i64 },
    /// Object-backed members: one variant per name, indexed by identity
    /// (never by value).
    Variants {
        values: Arc<[Value]>,
        by_identity: AHashMap<VariantId, usize>,
    },
}

/// Shared state behind an [`Enum`] handle (and, pre-seal, an
/// [`EnumBuilder`]).
#[derive(Debug)]
pub(crate) struct EnumCell {
    /// Display name, used for reprs and error messages only.
    name: Arc<str>,
    /// Member names in declaration order.
    keys: Arc<[Arc<str>]>,
    /// Name -> declaration position, for member access by name.
    by_key: AHashMap<Arc<str>, usize>,
    members: Members,
    /// Open/closed latch; one-shot, flipped exactly once at sealing. This
    /// is the sole authority for whether construction-time mutation is
    /// still legal.
    sealed: OnceLock<()>,
}

impl EnumCell {
    pub(crate) fn is_sealed(&self) -> bool {
        self.sealed.get().is_some()
    }

    fn seal(&self) {
        let sealed = self.sealed.set(()).is_ok();
        debug_assert!(sealed, "enum '{}' sealed twice", self.name);
    }

    fn len(&self) -> usize {
        self.keys.len()
    }

    /// Resolves a value to its declaration position, flavor-appropriately.
    fn position_of(&self, value: &Value) -> Option<usize> {
        match &self.members {
            Members::Mapped { by_value, .. } => by_value.get(value).copied(),
            Members::Keyed { .. } => match value {
                Value::Str(s) => self.by_key.get(&**s).copied(),
                _ => None,
            },
            Members::Range { offset } => range_index(*offset, self.len(), value),
            Members::Variants { by_identity, .. } => match value {
                Value::Variant(variant) => by_identity.get(&variant.id()).copied(),
                _ => None,
            },
        }
    }

    /// Returns the member value at a declaration position.
    fn value_at(&self, position: usize) -> Value {
        match &self.members {
            Members::Mapped { values, .. } | Members::Keyed { values } | Members::Variants { values, .. } => {
                values[position].clone()
            }
            Members::Range { offset } => Value::Int(offset + position as i64),
        }
    }
}

/// A sealed, immutable mapping from a fixed ordered set of member names to
/// member values.
///
/// Handles are cheap clones of shared state; two handles compare equal iff
/// they refer to the same underlying enum.
#[derive(Debug, Clone)]
pub struct Enum {
    cell: Arc<EnumCell>,
}

impl Enum {
    /// Wraps an already-sealed cell, e.g. when a variant resolves its
    /// owner.
    pub(crate) fn from_cell(cell: Arc<EnumCell>) -> Self {
        debug_assert!(cell.is_sealed(), "enum handles require a sealed cell");
        Self { cell }
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.cell.name
    }

    /// Returns the member count, fixed for the enum's entire lifetime.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cell.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cell.len() == 0
    }

    /// Membership predicate: whether `value` is a member of this enum.
    ///
    /// Like all lookup-style calls this answers `false` for non-members
    /// (including variants of other enums) instead of erroring.
    #[must_use]
    pub fn has(&self, value: &Value) -> bool {
        self.cell.position_of(value).is_some()
    }

    /// Reverse lookup: the declared name for a member value.
    ///
    /// For the string flavor the value is a known name or nothing; for the
    /// object flavor resolution goes by variant identity, never by the
    /// variant's bound value.
    #[must_use]
    pub fn get_key(&self, value: &Value) -> Option<&str> {
        let position = self.cell.position_of(value)?;
        Some(&self.cell.keys[position])
    }

    /// Member access by declared name.
    #[must_use]
    pub fn member(&self, key: &str) -> Option<Value> {
        let position = self.cell.by_key.get(key)?;
        Some(self.cell.value_at(*position))
    }

    /// The variant declared under `key`, for object-backed enums.
    #[must_use]
    pub fn variant(&self, key: &str) -> Option<&Variant> {
        let Members::Variants { values, .. } = &self.cell.members else {
            return None;
        };
        let position = self.cell.by_key.get(key)?;
        match &values[*position] {
            Value::Variant(variant) => Some(variant),
            _ => unreachable!("object enums hold only variants"),
        }
    }

    /// Orders two members by declaration position.
    ///
    /// Fails with `Incomparable` if either operand cannot be resolved to a
    /// position in this enum.
    pub fn compare(&self, a: &Value, b: &Value) -> EnumResult<Ordering> {
        let a_position = self
            .cell
            .position_of(a)
            .ok_or_else(|| EnumError::incomparable(&self.cell.name, a))?;
        let b_position = self
            .cell
            .position_of(b)
            .ok_or_else(|| EnumError::incomparable(&self.cell.name, b))?;
        Ok(a_position.cmp(&b_position))
    }

    /// Member names in declaration order. Also the default iteration.
    #[must_use]
    pub fn keys(&self) -> Keys {
        Keys(EnumIter::new(
            IterMode::Keys {
                keys: self.cell.keys.clone(),
            },
            self.len(),
        ))
    }

    /// Member values in declaration order.
    ///
    /// The numeric flavor recomputes its values from the cursor; every
    /// other flavor hands the session a shared value array.
    #[must_use]
    pub fn values(&self) -> Values {
        let mode = match &self.cell.members {
            Members::Range { offset } => IterMode::RawRange { offset: *offset },
            Members::Mapped { values, .. } | Members::Keyed { values } | Members::Variants { values, .. } => {
                IterMode::Values { values: values.clone() }
            }
        };
        Values(EnumIter::new(mode, self.len()))
    }

    /// `(name, value)` pairs in declaration order.
    #[must_use]
    pub fn entries(&self) -> Entries {
        let keys = self.cell.keys.clone();
        let mode = match &self.cell.members {
            Members::Range { offset } => IterMode::RangeEntries { keys, offset: *offset },
            Members::Mapped { values, .. } | Members::Keyed { values } | Members::Variants { values, .. } => {
                IterMode::Entries {
                    keys,
                    values: values.clone(),
                }
            }
        };
        Entries(EnumIter::new(mode, self.len()))
    }
}

impl PartialEq for Enum {
    /// Handle identity: same underlying enum, not structural equality.
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }
}

impl Eq for Enum {}

impl<'a> IntoIterator for &'a Enum {
    type Item = Arc<str>;
    type IntoIter = Keys;

    /// Default iteration is the name sequence, aliasing `keys()`.
    fn into_iter(self) -> Keys {
        self.keys()
    }
}

/// Open construction window for an object-backed enum.
///
/// The builder is the only state from which mutation is reachable: it hands
/// out already-created variant identities (so forward-referencing
/// initializers can read earlier members while later ones remain unready)
/// and accepts deferred value bindings. [`EnumBuilder::seal`] consumes the
/// builder, flips the one-shot latch, and returns the immutable [`Enum`].
#[derive(Debug)]
pub struct EnumBuilder {
    cell: Arc<EnumCell>,
}

impl EnumBuilder {
    /// Returns the display name of the enum under construction.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.cell.name
    }

    /// Returns the already-created identity declared under `key`.
    ///
    /// The variant is readable immediately; its value may still be
    /// unbound.
    #[must_use]
    pub fn variant(&self, key: &str) -> Option<Variant> {
        let position = self.cell.by_key.get(key)?;
        match &self.cell.members {
            Members::Variants { values, .. } => match &values[*position] {
                Value::Variant(variant) => Some(variant.clone()),
                _ => unreachable!("object enums hold only variants"),
            },
            _ => unreachable!("builders exist only for object enums"),
        }
    }

    /// Binds a variant's value inside this construction window.
    ///
    /// Fails with `NotAVariant` if the variant belongs to a different
    /// enum, and with `SealedEnum` if the slot is already bound.
    pub fn set_value(&self, variant: &Variant, value: Value) -> EnumResult<()> {
        if !variant.is_owned_by(&self.cell) {
            return Err(EnumError::new(
                ErrorKind::NotAVariant,
                format!("{variant} is not a variant of enum '{}'", self.cell.name),
            ));
        }
        set_value(variant, value)
    }

    /// Irreversibly seals the enum and publishes it.
    #[must_use]
    pub fn seal(self) -> Enum {
        self.cell.seal();
        Enum { cell: self.cell }
    }
}

/// Builds the shared key array and the name -> position index.
fn make_keys(keys: &[&str]) -> (Arc<[Arc<str>]>, AHashMap<Arc<str>, usize>) {
    let keys: Arc<[Arc<str>]> = keys.iter().map(|key| Arc::<str>::from(*key)).collect();
    let by_key = keys.iter().enumerate().map(|(i, key)| (key.clone(), i)).collect();
    (keys, by_key)
}

/// Applies the numeric flavor's membership arithmetic.
///
/// The candidate is coerced with bitwise 32-bit truncation and its sign
/// normalized with the absolute value; any input changed by that coercion
/// (non-integers, negatives, out-of-range numbers) is rejected rather than
/// silently aliased onto a member. Survivors are range-checked against
/// `offset..offset + len`.
fn range_index(offset: i64, len: usize, value: &Value) -> Option<usize> {
    let number = match value {
        Value::Int(i) => *i as f64,
        Value::Float(f) => *f,
        _ => return None,
    };
    let normalized = i64::from(to_int32(number).unsigned_abs());
    if normalized as f64 != number {
        return None;
    }
    let index = normalized.checked_sub(offset)?;
    if index < 0 || index as usize >= len {
        return None;
    }
    usize::try_from(index).ok()
}

/// 32-bit integer conversion with modular wrapping (truncate, then wrap
/// into `[-2^31, 2^31)`); non-finite inputs coerce to 0.
fn to_int32(value: f64) -> i32 {
    if !value.is_finite() || value == 0.0 {
        return 0;
    }
    let modulus = 4_294_967_296.0; // 2^32
    let mut wrapped = value.trunc().rem_euclid(modulus);
    if wrapped >= modulus / 2.0 {
        wrapped -= modulus;
    }
    wrapped as i32
}

/// Builds a sealed enum from parallel name and value lists.
///
/// The general flavor: suited to arbitrary comparable values (numbers,
/// strings, pre-built opaque tokens). A value-keyed position index is built
/// in one pass; with duplicate values the later declaration wins the
/// reverse lookup.
///
/// # Panics
///
/// Panics if `keys` and `values` differ in length. Duplicate names are a
/// precondition owned by the generating caller and are not detected here.
#[must_use]
pub fn init_enum(name: impl Into<Arc<str>>, keys: &[&str], values: Vec<Value>) -> Enum {
    assert_eq!(
        keys.len(),
        values.len(),
        "init_enum keys and values must have the same length"
    );
    let (keys, by_key) = make_keys(keys);
    let values: Arc<[Value]> = values.into();
    let by_value = values.iter().enumerate().map(|(i, value)| (value.clone(), i)).collect();
    let cell = Arc::new(EnumCell {
        name: name.into(),
        keys,
        by_key,
        members: Members::Mapped { values, by_value },
        sealed: OnceLock::new(),
    });
    cell.seal();
    Enum { cell }
}

/// Builds a sealed enum where every member's value is its own name.
///
/// Skips the value-keyed table entirely: the name index already answers
/// reverse lookup, and the value array shares storage with the keys.
#[must_use]
pub fn init_string_enum(name: impl Into<Arc<str>>, keys: &[&str]) -> Enum {
    let (keys, by_key) = make_keys(keys);
    let values: Arc<[Value]> = keys.iter().map(|key| Value::Str(key.clone())).collect();
    let cell = Arc::new(EnumCell {
        name: name.into(),
        keys,
        by_key,
        members: Members::Keyed { values },
        sealed: OnceLock::new(),
    });
    cell.seal();
    Enum { cell }
}

/// Builds a sealed enum whose values are consecutive integers from
/// `offset`.
///
/// No tables at all: membership, reverse lookup, and comparison are
/// arithmetic on the truncated integer (see [`range_index`]).
#[must_use]
pub fn init_number_enum(name: impl Into<Arc<str>>, keys: &[&str], offset: i64) -> Enum {
    let (keys, by_key) = make_keys(keys);
    let cell = Arc::new(EnumCell {
        name: name.into(),
        keys,
        by_key,
        members: Members::Range { offset },
        sealed: OnceLock::new(),
    });
    cell.seal();
    Enum { cell }
}

/// Opens construction of an object-backed enum with one fresh [`Variant`]
/// identity per name.
///
/// With `init_values` each variant's value defaults to its own name at
/// creation; otherwise the slots are left for deferred assignment through
/// [`set_value`](crate::set_value) / [`EnumBuilder::set_value`] before
/// sealing. Reverse lookup and comparison go by variant identity, not by
/// the bound value.
#[must_use]
pub fn init_object_enum(name: impl Into<Arc<str>>, init_values: bool, keys: &[&str]) -> EnumBuilder {
    let name: Arc<str> = name.into();
    let (keys, by_key) = make_keys(keys);
    let cell = Arc::new_cyclic(|weak: &Weak<EnumCell>| {
        let variants: Vec<Variant> = keys
            .iter()
            .map(|key| Variant::new(key.clone(), name.clone(), weak.clone()))
            .collect();
        if init_values {
            for (key, variant) in keys.iter().zip(&variants) {
                variant.bind(Value::Str(key.clone()));
            }
        }
        let by_identity = variants.iter().enumerate().map(|(i, variant)| (variant.id(), i)).collect();
        let values: Arc<[Value]> = variants.into_iter().map(Value::Variant).collect();
        EnumCell {
            name: name.clone(),
            keys: keys.clone(),
            by_key,
            members: Members::Variants { values, by_identity },
            sealed: OnceLock::new(),
        }
    });
    EnumBuilder { cell }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_int32_wraps_like_bitwise_or_zero() {
        assert_eq!(to_int32(0.0), 0);
        assert_eq!(to_int32(1.5), 1);
        assert_eq!(to_int32(-1.0), -1);
        assert_eq!(to_int32(2_147_483_648.0), -2_147_483_648);
        assert_eq!(to_int32(4_294_967_296.0), 0);
        assert_eq!(to_int32(f64::NAN), 0);
        assert_eq!(to_int32(f64::INFINITY), 0);
    }

    #[test]
    fn range_index_rejects_coerced_inputs() {
        // offset 1, four members: values 1..=4.
        assert_eq!(range_index(1, 4, &Value::Int(1)), Some(0));
        assert_eq!(range_index(1, 4, &Value::Int(4)), Some(3));
        assert_eq!(range_index(1, 4, &Value::Int(0)), None);
        assert_eq!(range_index(1, 4, &Value::Int(5)), None);
        assert_eq!(range_index(1, 4, &Value::Int(-1)), None);
        assert_eq!(range_index(1, 4, &Value::Float(1.5)), None);
        assert_eq!(range_index(1, 4, &Value::Float(3.0)), Some(2));
        assert_eq!(range_index(1, 4, &Value::Str("1".into())), None);
    }
}
