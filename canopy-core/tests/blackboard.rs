use canopy_core::{BbKey, Blackboard, BlackboardError};

#[test]
fn blackboard_set_get_remove_roundtrip() {
    let k_u32 = BbKey::<u32>::new("ammo");
    let k_str = BbKey::<String>::new("greeting");

    let mut bb = Blackboard::new();
    assert!(!bb.contains(k_u32));

    bb.set(k_u32, 123);
    bb.set(k_str, "hello".to_string());

    assert_eq!(bb.get(k_u32).copied(), Some(123));
    assert_eq!(bb.get(k_str).map(|s| s.as_str()), Some("hello"));

    assert_eq!(bb.remove(k_u32), Some(123));
    assert_eq!(bb.get(k_u32), None);
}

#[test]
fn typed_and_named_access_share_slots() {
    const HEALTH: BbKey<f32> = BbKey::new("health");

    let mut bb = Blackboard::new();
    bb.set_value("health", 0.5f32);

    assert!(bb.has_key("health"));
    assert!(bb.contains(HEALTH));
    assert_eq!(bb.get(HEALTH).copied(), Some(0.5));

    *bb.value_mut::<f32>("health").unwrap() = 0.25;
    assert_eq!(bb.get(HEALTH).copied(), Some(0.25));
}

#[test]
fn named_access_reports_missing_and_mismatched_keys() {
    let mut bb = Blackboard::new();
    bb.set_value("flag", true);

    assert_eq!(
        bb.value::<bool>("nope"),
        Err(BlackboardError::Missing {
            key: "nope".to_string()
        })
    );
    assert!(matches!(
        bb.value::<u32>("flag"),
        Err(BlackboardError::TypeMismatch { ref key, .. }) if key == "flag"
    ));
    assert_eq!(bb.value::<bool>("flag"), Ok(&true));
}

#[test]
fn set_value_overwrites_with_a_new_type() {
    let mut bb = Blackboard::new();
    bb.set_value("slot", 1u8);
    bb.set_value("slot", "text");

    assert_eq!(bb.len(), 1);
    assert_eq!(bb.value::<&str>("slot"), Ok(&"text"));
    assert!(bb.remove_key("slot"));
    assert!(bb.is_empty());
}

#[test]
fn keys_are_sorted() {
    let mut bb = Blackboard::new();
    bb.set_value("b", 2);
    bb.set_value("a", 1);
    bb.set_value("c", 3);

    assert_eq!(bb.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
}

#[test]
#[should_panic(expected = "blackboard type mismatch")]
fn blackboard_type_mismatch_panics() {
    let mut bb = Blackboard::new();
    bb.set(BbKey::<u32>::new("x"), 1u32);
    let _ = bb.get(BbKey::<i32>::new("x"));
}
