//! Runtime member values.
//!
//! Enum members come from a dynamically-typed surface, so the crate carries
//! an explicit [`Value`] enum instead of a generic parameter: a member can
//! be a number, a string, a pre-built opaque token, or (for the rich enum
//! flavor) an identity-backed [`Variant`]. Small values are stored inline;
//! strings are cheaply-clonable shared slices.
//!
//! Equality and hashing follow the source surface's numeric model:
//! `Int(1)` and `Float(1.0)` are the same member value, so both compare
//! equal and hash identically (see [`crate::num_hash`]).

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use crate::{num_hash, variant::Variant};

/// Stable, process-unique handle for an opaque member value.
///
/// Tokens let a caller use pre-built host objects as member values without
/// the enum runtime knowing anything about them: identity is the freshly
/// minted id, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct Token(u64);

impl Token {
    /// Mints a token with a process-unique id.
    #[must_use]
    pub fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw integer identifier.
    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// A runtime member value.
///
/// `Clone` is cheap everywhere: strings and variants are `Arc`-backed, the
/// rest is `Copy` data.
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Shared string contents; member names double as values in the
    /// string-backed flavor, so these share storage with the key arrays.
    Str(Arc<str>),
    /// Opaque pre-built host value, compared by token identity.
    Token(Token),
    /// Rich enum member, compared by variant identity.
    Variant(Variant),
}

/// Returns whether an integer and a float denote the same number.
///
/// Exact: the float must be integral, in `i64` range, and truncate to the
/// integer. Mirrors the integral-float delegation in the hash path so the
/// `a == b  =>  hash(a) == hash(b)` invariant holds.
fn int_eq_float(i: i64, f: f64) -> bool {
    f.is_finite() && f == f.trunc() && f >= i64::MIN as f64 && f <= i64::MAX as f64 && f as i64 == i
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            // NaN is treated as equal to itself so it can serve as a table
            // key; every NaN hashes to the same bucket.
            (Self::Float(a), Self::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::Int(i), Self::Float(f)) | (Self::Float(f), Self::Int(i)) => int_eq_float(*i, *f),
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Token(a), Self::Token(b)) => a == b,
            (Self::Variant(a), Self::Variant(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Int and Float share a tag so cross-type numeric equality stays
        // consistent with hashing.
        const TAG_BOOL: u8 = 0;
        const TAG_NUM: u8 = 1;
        const TAG_STR: u8 = 2;
        const TAG_TOKEN: u8 = 3;
        const TAG_VARIANT: u8 = 4;

        match self {
            Self::Bool(b) => {
                state.write_u8(TAG_BOOL);
                b.hash(state);
            }
            Self::Int(i) => {
                state.write_u8(TAG_NUM);
                state.write_u64(num_hash::hash_int(*i));
            }
            Self::Float(f) => {
                state.write_u8(TAG_NUM);
                state.write_u64(num_hash::hash_float(*f));
            }
            Self::Str(s) => {
                state.write_u8(TAG_STR);
                s.hash(state);
            }
            Self::Token(t) => {
                state.write_u8(TAG_TOKEN);
                t.hash(state);
            }
            Self::Variant(v) => {
                state.write_u8(TAG_VARIANT);
                v.hash(state);
            }
        }
    }
}

impl fmt::Display for Value {
    /// Repr-style formatting for error messages: strings quoted, integral
    /// floats kept distinguishable from ints.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => {
                if v.is_finite() && *v == v.trunc() {
                    write!(f, "{v:.1}")
                } else {
                    write!(f, "{v}")
                }
            }
            Self::Str(s) => write!(f, "'{s}'"),
            Self::Token(t) => write!(f, "<token {}>", t.raw()),
            Self::Variant(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(Arc::from(v))
    }
}

impl From<Arc<str>> for Value {
    fn from(v: Arc<str>) -> Self {
        Self::Str(v)
    }
}

impl From<Token> for Value {
    fn from(v: Token) -> Self {
        Self::Token(v)
    }
}

impl From<Variant> for Value {
    fn from(v: Variant) -> Self {
        Self::Variant(v)
    }
}
