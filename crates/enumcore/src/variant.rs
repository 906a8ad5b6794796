//! Rich enum variants and their hidden metadata.
//!
//! A [`Variant`] is a distinguishable identity object representing one
//! member of an object-backed enum. The handle itself exposes nothing: the
//! display name, the owning-enum back-reference, and the once-assignable
//! value slot all live behind the identity in a shared cell, so cloning a
//! variant clones the identity, never the metadata.
//!
//! The metadata accessors come in two shapes: typed methods on [`Variant`],
//! and value-level functions ([`variant_name`], [`variant_owner`],
//! [`variant_value`]) that reject any [`Value`] which was never constructed
//! as a variant with a `NotAVariant` error.

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::{
        Arc, OnceLock, Weak,
        atomic::{AtomicU64, Ordering},
    },
};

use crate::{
    enums::{Enum, EnumCell},
    error::{EnumError, EnumResult},
    value::Value,
};

/// Stable, process-unique variant identifier.
///
/// Identity is the freshly minted id: two variants are the same member iff
/// their ids match, regardless of name or value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub(crate) struct VariantId(u64);

impl VariantId {
    /// Mints the next process-unique id.
    fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Out-of-band metadata for one variant.
///
/// The owner edge is a `Weak`: the enum owns its variants, never the other
/// way around, so a variant handle that outlives its enum simply loses the
/// back-reference instead of keeping the whole enum alive.
#[derive(Debug)]
struct VariantCell {
    id: VariantId,
    /// Declared member name.
    name: Arc<str>,
    /// Owning enum's display name, kept here so errors and reprs work even
    /// while the owner is still under construction.
    enum_name: Arc<str>,
    /// Non-owning back-reference to the owning enum.
    owner: Weak<EnumCell>,
    /// Assignable exactly once, optionally deferred until just before
    /// sealing.
    value: OnceLock<Value>,
}

/// Identity-backed member of a rich enum.
///
/// Created during its enum's construction; its value may be unset at
/// creation and filled in later via [`set_value`], but only while the
/// owning enum is still open. After sealing both the variant and its
/// metadata are permanently immutable.
#[derive(Debug, Clone)]
pub struct Variant {
    cell: Arc<VariantCell>,
}

impl Variant {
    /// Creates a variant with an unbound value slot.
    pub(crate) fn new(name: Arc<str>, enum_name: Arc<str>, owner: Weak<EnumCell>) -> Self {
        Self {
            cell: Arc::new(VariantCell {
                id: VariantId::fresh(),
                name,
                enum_name,
                owner,
                value: OnceLock::new(),
            }),
        }
    }

    /// Returns the declared member name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.cell.name
    }

    /// Returns the bound value, or `None` while a deferred slot is still
    /// unbound.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.cell.value.get()
    }

    /// Returns the owning enum.
    ///
    /// Fails with `UninitializedEnum` while the owner is still under
    /// construction (or no longer alive): a half-built enum must not be
    /// observable through a variant that escaped the construction window.
    pub fn owner(&self) -> EnumResult<Enum> {
        match self.cell.owner.upgrade() {
            Some(cell) if cell.is_sealed() => Ok(Enum::from_cell(cell)),
            _ => Err(EnumError::uninitialized_enum(&self.cell.enum_name)),
        }
    }

    /// Identity key for the owning enum's reverse-lookup table.
    pub(crate) fn id(&self) -> VariantId {
        self.cell.id
    }

    /// Binds the value slot during construction.
    ///
    /// Factory call discipline guarantees at most one bind per variant; a
    /// second bind is a bug in this crate, not in the caller.
    pub(crate) fn bind(&self, value: Value) {
        let bound = self.cell.value.set(value).is_ok();
        debug_assert!(bound, "variant {self} value bound twice during construction");
    }

    /// Returns whether this variant belongs to the given enum cell.
    pub(crate) fn is_owned_by(&self, cell: &Arc<EnumCell>) -> bool {
        self.cell
            .owner
            .upgrade()
            .is_some_and(|owner| Arc::ptr_eq(&owner, cell))
    }
}

impl PartialEq for Variant {
    fn eq(&self, other: &Self) -> bool {
        self.cell.id == other.cell.id
    }
}

impl Eq for Variant {}

impl Hash for Variant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cell.id.hash(state);
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.cell.enum_name, self.cell.name)
    }
}

/// Binds a variant's value before its owning enum is sealed.
///
/// This is the single mutation entry point permitted on a variant, used by
/// the object-variant construction path to support initializer expressions
/// that reference earlier-declared members. The owning enum's open/closed
/// state is the sole authority for whether the call is legal: once the enum
/// is sealed (or dropped), the call fails with `SealedEnum`, as does a
/// second bind of an already-bound slot.
pub fn set_value(variant: &Variant, value: Value) -> EnumResult<()> {
    let open = variant
        .cell
        .owner
        .upgrade()
        .is_some_and(|cell| !cell.is_sealed());
    if !open {
        return Err(EnumError::sealed_enum(format!(
            "enum '{}' is sealed; cannot assign a value to {variant}",
            variant.cell.enum_name
        )));
    }
    variant
        .cell
        .value
        .set(value)
        .map_err(|_| EnumError::sealed_enum(format!("{variant} already has a bound value")))
}

/// Extracts the variant out of a value, or reports `NotAVariant`.
fn as_variant(value: &Value) -> EnumResult<&Variant> {
    match value {
        Value::Variant(variant) => Ok(variant),
        other => Err(EnumError::not_a_variant(other)),
    }
}

/// Value-level accessor for a variant's declared name.
pub fn variant_name(value: &Value) -> EnumResult<&str> {
    Ok(as_variant(value)?.name())
}

/// Value-level accessor for a variant's owning enum.
///
/// Fails with `NotAVariant` for non-variant values and `UninitializedEnum`
/// while the owner is unsealed.
pub fn variant_owner(value: &Value) -> EnumResult<Enum> {
    as_variant(value)?.owner()
}

/// Value-level accessor for a variant's bound value.
///
/// `Ok(None)` means the deferred slot has not been bound yet.
pub fn variant_value(value: &Value) -> EnumResult<Option<&Value>> {
    Ok(as_variant(value)?.value())
}
