//! Deterministic numeric hashing for value-keyed reverse lookup.
//!
//! The general value-backed enum flavor indexes members by their value in a
//! hash table. Member values come from a dynamically-typed surface where
//! `1` and `1.0` denote the same number, so the table must hash equal
//! integers and floats identically. These helpers implement the
//! Mersenne-prime modular scheme (modulo `2^61 - 1`) that keeps the
//! cross-type hash invariant: if `a == b` then `hash(a) == hash(b)` for any
//! mix of `Int` and `Float`.

/// Mersenne prime used for numeric hashing: `2^61 - 1`.
///
/// Both integer and float hashing reduce modulo this prime so that equal
/// values across the two representations produce identical hashes.
const MODULUS: i64 = (1 << 61) - 1;

/// Hashes a signed 64-bit integer with the sign-preserving modular scheme.
#[must_use]
pub(crate) fn hash_int(value: i64) -> u64 {
    let result = hash_int_signed(value);
    u64::from_ne_bytes(result.to_ne_bytes())
}

/// Signed version of [`hash_int`], shared with the float path.
fn hash_int_signed(value: i64) -> i64 {
    if value == 0 {
        return 0;
    }

    let sign: i64 = if value < 0 { -1 } else { 1 };
    // Work with the absolute value; i64::MIN would overflow a plain abs().
    let abs_val = i128::from(value).unsigned_abs() as u64;
    let remainder = (abs_val % MODULUS as u64) as i64;

    sign * remainder
}

/// Hashes an `f64` consistently with [`hash_int`].
///
/// Integral floats in `i64` range delegate to the integer path so that
/// `hash(Float(1.0)) == hash(Int(1))` holds. Non-integral floats decompose
/// with `frexp` and fold the mantissa into the modulus in 28-bit chunks.
///
/// Special values: infinities hash to fixed sentinels and NaN hashes to 0
/// (NaN compares equal to itself inside the value model, so all NaN keys
/// must land in one bucket).
#[must_use]
pub(crate) fn hash_float(value: f64) -> u64 {
    let result = hash_float_signed(value);
    u64::from_ne_bytes(result.to_ne_bytes())
}

/// Signed implementation of [`hash_float`].
fn hash_float_signed(value: f64) -> i64 {
    if value.is_infinite() {
        return if value > 0.0 { 314_159 } else { -314_159 };
    }
    if value.is_nan() {
        return 0;
    }

    // Exact integers take the integer path for cross-type consistency.
    let truncated = value.trunc();
    if value == truncated && truncated >= i64::MIN as f64 && truncated <= i64::MAX as f64 {
        return hash_int_signed(truncated as i64);
    }

    let (frac, exp) = frexp(value);
    let mut m = frac;
    let mut e = exp;

    let sign: i64 = if m < 0.0 {
        m = -m;
        -1
    } else {
        1
    };

    // Fold the mantissa bits in 28-bit chunks.
    let mut x: u64 = 0;
    while m > 0.0 {
        x = ((x << 28) & (MODULUS as u64)) | (x >> 33);
        m *= 268_435_456.0; // 2^28
        e -= 28;
        let w = m as u64;
        m -= w as f64;
        x = x.wrapping_add(w);
        if x >= MODULUS as u64 {
            x -= MODULUS as u64;
        }
    }

    // Incorporate the exponent as a rotation within the 61-bit field.
    e %= 61;
    if e < 0 {
        e += 61;
    }
    x = ((x << e as u32) & (MODULUS as u64)) | (x >> (61 - e) as u32);

    (sign * x as i64) % MODULUS
}

/// Returns `(frac, exp)` such that `value == frac * 2^exp` with `0.5 <= |frac| < 1.0`.
///
/// Equivalent to C's `frexp()`.
fn frexp(value: f64) -> (f64, i32) {
    if value == 0.0 || value.is_nan() || value.is_infinite() {
        return (value, 0);
    }
    let bits = value.to_bits();
    let exponent = ((bits >> 52) & 0x7ff) as i32;
    if exponent == 0 {
        // Subnormal: scale up by 2^64 to normalize, then adjust the exponent.
        let normalized = value * (1u64 << 63) as f64 * 2.0;
        let (frac, exp) = frexp(normalized);
        return (frac, exp - 64);
    }
    // Clear the exponent bits and rebias to land in [0.5, 1.0).
    let frac_bits = (bits & 0x800F_FFFF_FFFF_FFFF) | 0x3FE0_0000_0000_0000;
    let frac = f64::from_bits(frac_bits);
    (frac, exponent - 1022)
}
