//! Tests for object-backed enums: variant identity, hidden metadata,
//! deferred value assignment, and the open/closed construction window.

use std::cmp::Ordering;

use enumcore::{
    ErrorKind, Value, init_object_enum, set_value, variant_name, variant_owner, variant_value,
};

#[test]
fn init_values_binds_each_value_to_its_own_name() {
    let e = init_object_enum("Status", true, &["OK", "FAILED"]).seal();
    let ok = e.variant("OK").unwrap();
    assert_eq!(ok.name(), "OK");
    assert_eq!(ok.value(), Some(&Value::from("OK")));
    assert_eq!(e.variant("FAILED").unwrap().value(), Some(&Value::from("FAILED")));
}

#[test]
fn owner_resolves_after_sealing() {
    let e = init_object_enum("Status", true, &["OK"]).seal();
    let owner = e.variant("OK").unwrap().owner().unwrap();
    assert_eq!(owner, e);
    assert_eq!(owner.name(), "Status");
}

/// Reading a variant's owner before sealing is a reportable error: a
/// half-built enum must not be observable through an escaped identity.
#[test]
fn owner_before_sealing_is_uninitialized() {
    let builder = init_object_enum("Foo", false, &["FOO", "BAR"]);
    let bar = builder.variant("BAR").unwrap();
    let err = bar.owner().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UninitializedEnum);
    assert!(err.to_string().contains("Foo"), "message names the enum: {err}");

    let e = builder.seal();
    assert_eq!(bar.owner().unwrap(), e);
}

/// The deferred two-step scenario: identities exist first, values are
/// bound before sealing, and both survive sealing unchanged.
#[test]
fn deferred_value_assignment_before_sealing() {
    let builder = init_object_enum("Foo", false, &["FOO", "BAR"]);
    let foo = builder.variant("FOO").unwrap();
    let bar = builder.variant("BAR").unwrap();

    // Unbound slots read as nothing, not as an error.
    assert_eq!(foo.value(), None);
    assert_eq!(variant_value(&Value::Variant(foo.clone())).unwrap(), None);

    set_value(&foo, Value::from("FOO")).unwrap();
    set_value(&bar, Value::Int(1)).unwrap();

    let e = builder.seal();
    assert_eq!(e.variant("FOO").unwrap().value(), Some(&Value::from("FOO")));
    assert_eq!(e.variant("BAR").unwrap().value(), Some(&Value::Int(1)));
}

/// An initializer for a later member may read an earlier member's
/// already-bound variant while later members remain unready.
#[test]
fn forward_reference_reads_earlier_members() {
    let builder = init_object_enum("Chain", false, &["FIRST", "SECOND"]);
    let first = builder.variant("FIRST").unwrap();
    set_value(&first, Value::Int(10)).unwrap();

    // The "initializer" for SECOND references FIRST's bound value.
    let second = builder.variant("SECOND").unwrap();
    let derived = match first.value() {
        Some(Value::Int(n)) => Value::Int(n * 2),
        other => panic!("FIRST should be bound, got {other:?}"),
    };
    set_value(&second, derived).unwrap();

    let e = builder.seal();
    assert_eq!(e.variant("SECOND").unwrap().value(), Some(&Value::Int(20)));
}

#[test]
fn set_value_after_sealing_is_rejected() {
    let builder = init_object_enum("Status", false, &["OK"]);
    let ok = builder.variant("OK").unwrap();
    let _sealed = builder.seal();
    let err = set_value(&ok, Value::Int(0)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SealedEnum);
}

#[test]
fn set_value_twice_is_rejected() {
    let builder = init_object_enum("Status", false, &["OK"]);
    let ok = builder.variant("OK").unwrap();
    set_value(&ok, Value::Int(0)).unwrap();
    let err = set_value(&ok, Value::Int(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SealedEnum);
    // The first binding is untouched.
    assert_eq!(ok.value(), Some(&Value::Int(0)));
}

#[test]
fn builder_rejects_foreign_variants() {
    let ours = init_object_enum("Ours", false, &["A"]);
    let theirs = init_object_enum("Theirs", false, &["A"]);
    let foreign = theirs.variant("A").unwrap();
    let err = ours.set_value(&foreign, Value::Int(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotAVariant);
}

/// Cross-enum misuse: a variant from enum A is simply not a member of enum
/// B, and comparing it there is an error.
#[test]
fn cross_enum_variants_are_not_members() {
    let a = init_object_enum("A", true, &["X", "Y"]).seal();
    let b = init_object_enum("B", true, &["X", "Y"]).seal();
    let from_a = Value::Variant(a.variant("X").unwrap().clone());
    let b_first = b.member("X").unwrap();

    assert!(!b.has(&from_a));
    assert_eq!(b.get_key(&from_a), None);
    let err = b.compare(&from_a, &b_first).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Incomparable);
}

/// No two distinct enums share a variant, even with identical member
/// names.
#[test]
fn variants_are_never_shared_between_enums() {
    let a = init_object_enum("Twin", true, &["X"]).seal();
    let b = init_object_enum("Twin", true, &["X"]).seal();
    assert_ne!(a.variant("X").unwrap(), b.variant("X").unwrap());
}

/// Membership and reverse lookup go by variant identity, never by the
/// bound value.
#[test]
fn object_enum_resolution_is_by_identity_not_value() {
    let builder = init_object_enum("Status", false, &["OK"]);
    let ok = builder.variant("OK").unwrap();
    set_value(&ok, Value::Int(1)).unwrap();
    let e = builder.seal();

    assert!(e.has(&Value::Variant(ok.clone())));
    assert!(!e.has(&Value::Int(1)));
    assert_eq!(e.get_key(&Value::Variant(ok)), Some("OK"));
    assert_eq!(e.get_key(&Value::Int(1)), None);
}

#[test]
fn object_enum_compare_follows_declaration_order() {
    let e = init_object_enum("Status", true, &["OK", "WARN", "FAILED"]).seal();
    let ok = e.member("OK").unwrap();
    let failed = e.member("FAILED").unwrap();
    assert_eq!(e.compare(&ok, &failed).unwrap(), Ordering::Less);
    assert_eq!(e.compare(&failed, &ok).unwrap(), Ordering::Greater);
    assert_eq!(e.compare(&ok, &ok).unwrap(), Ordering::Equal);
}

/// The value-level store accessors reject anything that was never
/// constructed as a variant.
#[test]
fn store_accessors_reject_non_variants() {
    for value in [Value::Int(1), Value::from("OK"), Value::Bool(false)] {
        assert_eq!(variant_name(&value).unwrap_err().kind(), ErrorKind::NotAVariant);
        assert_eq!(variant_owner(&value).unwrap_err().kind(), ErrorKind::NotAVariant);
        assert_eq!(variant_value(&value).unwrap_err().kind(), ErrorKind::NotAVariant);
    }
}

#[test]
fn store_accessors_read_variant_metadata() {
    let e = init_object_enum("Status", true, &["OK"]).seal();
    let value = e.member("OK").unwrap();
    assert_eq!(variant_name(&value).unwrap(), "OK");
    assert_eq!(variant_owner(&value).unwrap(), e);
    assert_eq!(variant_value(&value).unwrap(), Some(&Value::from("OK")));
}

/// Variants are distinguishable identities: same name, same value, still
/// different members.
#[test]
fn variant_identity_is_not_structural() {
    let e = init_object_enum("Pair", true, &["A", "B"]).seal();
    let a = e.variant("A").unwrap();
    let b = e.variant("B").unwrap();
    assert_ne!(a, b);
    assert_eq!(a, &a.clone());
}
