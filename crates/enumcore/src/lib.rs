#![doc = include_str!("../../../README.md")]
#![expect(clippy::cast_possible_truncation, reason = "numeric narrowing mirrors 32-bit coercion")]
#![expect(clippy::cast_sign_loss, reason = "sign-changing casts are range-checked first")]
#![expect(clippy::cast_possible_wrap, reason = "wrap behavior mirrors the source coercion")]
#![expect(clippy::float_cmp, reason = "numeric coercion requires exact float comparison")]

mod enums;
mod error;
mod iter;
mod num_hash;
mod value;
mod variant;

pub use crate::{
    enums::{Enum, EnumBuilder, init_enum, init_number_enum, init_object_enum, init_string_enum},
    error::{EnumError, EnumResult, ErrorKind},
    iter::{Entries, Keys, Values},
    value::{Token, Value},
    variant::{Variant, set_value, variant_name, variant_owner, variant_value},
};
