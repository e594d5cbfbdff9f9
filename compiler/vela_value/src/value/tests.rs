use super::*;
use crate::errors::not_iterable;
use pretty_assertions::assert_eq;

fn ints(ns: &[i64]) -> Value {
    Value::list(ns.iter().copied().map(Value::Int).collect())
}

#[test]
fn test_type_names() {
    assert_eq!(Value::Null.type_name(), "null_type");
    assert_eq!(Value::Bool(true).type_name(), "bool");
    assert_eq!(Value::Int(1).type_name(), "int");
    assert_eq!(Value::Uint(1).type_name(), "uint");
    assert_eq!(Value::Double(1.0).type_name(), "double");
    assert_eq!(Value::string("a").type_name(), "string");
    assert_eq!(Value::bytes(b"a".to_vec()).type_name(), "bytes");
    assert_eq!(ints(&[]).type_name(), "list");
    assert_eq!(Value::map(MapValue::new()).type_name(), "map");
    assert_eq!(Value::error(no_such_overload()).type_name(), "error");
    assert_eq!(Value::unknown(NodeId::new(1)).type_name(), "unknown");
}

#[test]
fn test_list_traits() {
    let list = ints(&[1, 2]);
    assert!(list.has_trait(Traits::ITERABLE));
    assert!(list.has_trait(Traits::LISTER));
    assert!(list.has_trait(Traits::ITERABLE | Traits::SIZER));
    assert!(!list.has_trait(Traits::MAPPER));
}

#[test]
fn test_map_traits() {
    let map = Value::map(MapValue::new());
    assert!(map.has_trait(Traits::ITERABLE));
    assert!(map.has_trait(Traits::MAPPER));
    assert!(!map.has_trait(Traits::LISTER));
}

#[test]
fn test_scalars_are_not_iterable() {
    assert!(!Value::Int(1).has_trait(Traits::ITERABLE));
    assert!(Value::Int(1).iter().is_none());
    assert!(Value::string("abc").iter().is_none());
}

#[test]
fn test_primitive_classification() {
    assert!(Value::Bool(true).is_primitive());
    assert!(Value::Double(0.5).is_primitive());
    assert!(Value::bytes(vec![1_u8]).is_primitive());
    assert!(!Value::Null.is_primitive());
    assert!(!ints(&[1]).is_primitive());
    assert!(!Value::error(no_such_overload()).is_primitive());
}

#[test]
fn test_list_iteration_preserves_order() {
    let items: Vec<Value> = ints(&[3, 1, 2]).iter().unwrap().collect();
    assert_eq!(items, vec![Value::Int(3), Value::Int(1), Value::Int(2)]);
}

#[test]
fn test_map_iteration_yields_keys_in_insertion_order() {
    let mut m = MapValue::new();
    m.insert(Value::string("b").to_key().unwrap(), Value::Int(1))
        .unwrap();
    m.insert(Value::string("a").to_key().unwrap(), Value::Int(2))
        .unwrap();
    let keys: Vec<Value> = Value::map(m).iter().unwrap().collect();
    assert_eq!(keys, vec![Value::string("b"), Value::string("a")]);
}

#[test]
fn test_map_rejects_duplicate_keys() {
    let mut m = MapValue::new();
    let key = Value::Int(1).to_key().unwrap();
    assert!(m.insert(key.clone(), Value::Bool(true)).is_ok());
    assert_eq!(m.insert(key.clone(), Value::Bool(false)), Err(key.clone()));
    assert_eq!(m.get(&key), Some(&Value::Bool(true)));
    assert_eq!(m.len(), 1);
}

#[test]
fn test_map_equality_ignores_order() {
    let k1 = Value::Int(1).to_key().unwrap();
    let k2 = Value::Int(2).to_key().unwrap();
    let mut a = MapValue::new();
    a.insert(k1.clone(), Value::string("x")).unwrap();
    a.insert(k2.clone(), Value::string("y")).unwrap();
    let mut b = MapValue::new();
    b.insert(k2, Value::string("y")).unwrap();
    b.insert(k1, Value::string("x")).unwrap();
    assert_eq!(a, b);
}

// Keys

#[test]
fn test_keys_only_for_primitives() {
    assert!(Value::Int(1).to_key().is_some());
    assert!(Value::string("s").to_key().is_some());
    assert!(Value::Null.to_key().is_none());
    assert!(ints(&[1]).to_key().is_none());
    assert!(Value::unknown(NodeId::new(0)).to_key().is_none());
}

#[test]
fn test_nan_has_no_key() {
    assert!(Value::Double(f64::NAN).to_key().is_none());
}

#[test]
fn test_signed_zero_shares_a_key() {
    assert_eq!(
        Value::Double(0.0).to_key(),
        Value::Double(-0.0).to_key()
    );
}

#[test]
fn test_keys_distinguish_types() {
    assert_ne!(Value::Int(1).to_key(), Value::Uint(1).to_key());
    assert_ne!(Value::Int(1).to_key(), Value::Double(1.0).to_key());
}

#[test]
fn test_key_round_trip_shares_payload() {
    let s = Value::string("shared");
    let key = s.to_key().unwrap();
    match (&s, key.to_value()) {
        (Value::Str(a), Value::Str(b)) => assert!(Heap::ptr_eq(a, &b)),
        _ => panic!("expected strings"),
    }
}

#[test]
fn test_keys_work_in_hash_sets() {
    use rustc_hash::FxHashSet;
    let set: FxHashSet<ValueKey> = [Value::Int(1), Value::Int(2), Value::Int(1)]
        .iter()
        .filter_map(Value::to_key)
        .collect();
    assert_eq!(set.len(), 2);
    assert!(set.contains(&Value::Int(2).to_key().unwrap()));
}

// Language equality

#[test]
fn test_equal_same_type() {
    assert_eq!(Value::Int(1).equal(&Value::Int(1)), Value::Bool(true));
    assert_eq!(Value::Int(1).equal(&Value::Int(2)), Value::Bool(false));
    assert_eq!(
        Value::string("a").equal(&Value::string("a")),
        Value::Bool(true)
    );
    assert_eq!(Value::Null.equal(&Value::Null), Value::Bool(true));
}

#[test]
fn test_equal_mismatched_types_is_an_error() {
    assert_eq!(
        Value::Int(1).equal(&Value::string("1")),
        Value::error(no_such_overload())
    );
}

#[test]
fn test_equal_nan() {
    let nan = Value::Double(f64::NAN);
    assert_eq!(nan.equal(&nan), Value::Bool(false));
}

#[test]
fn test_equal_lists() {
    assert_eq!(ints(&[1, 2]).equal(&ints(&[1, 2])), Value::Bool(true));
    assert_eq!(ints(&[1, 2]).equal(&ints(&[2, 1])), Value::Bool(false));
    assert_eq!(ints(&[1]).equal(&ints(&[1, 2])), Value::Bool(false));
}

#[test]
fn test_equal_propagates_left_sentinel_first() {
    let err = Value::error(not_iterable("int"));
    let unk = Value::unknown(NodeId::new(4));
    assert_eq!(err.equal(&unk), err);
    assert_eq!(unk.equal(&err), unk);
    assert_eq!(Value::Int(1).equal(&unk), unk);
}

// Value-or-error

#[test]
fn test_or_error_keeps_sentinels() {
    let unk = Value::unknown(NodeId::new(2));
    assert_eq!(unk.clone().or_error(no_such_overload), unk);
    let err = Value::error(not_iterable("bool"));
    assert_eq!(err.clone().or_error(no_such_overload), err);
}

#[test]
fn test_or_error_replaces_plain_values() {
    assert_eq!(
        Value::Int(3).or_error(no_such_overload),
        Value::error(no_such_overload())
    );
}

// Unknown sets

#[test]
fn test_unknown_sets_are_sorted_and_deduplicated() {
    let set = UnknownSet::from_ids([NodeId::new(3), NodeId::new(1), NodeId::new(3)]);
    assert_eq!(set.ids(), &[NodeId::new(1), NodeId::new(3)]);
    assert!(set.contains(NodeId::new(3)));
    assert!(!set.contains(NodeId::new(2)));
}

// Formatting

#[test]
fn test_value_display() {
    assert_eq!(format!("{}", Value::Int(42)), "42");
    assert_eq!(format!("{}", Value::Uint(42)), "42u");
    assert_eq!(format!("{}", Value::Double(1.0)), "1.0");
    assert_eq!(format!("{}", Value::string("hi")), "\"hi\"");
    assert_eq!(format!("{}", ints(&[1, 2, 3])), "[1, 2, 3]");
    assert_eq!(
        format!("{}", Value::error(no_such_overload())),
        "<error: no such overload>"
    );
    assert_eq!(
        format!("{}", Value::unknown_set(UnknownSet::from_ids([NodeId::new(1), NodeId::new(5)]))),
        "<unknown: {1, 5}>"
    );
}

#[test]
fn test_value_debug() {
    assert_eq!(format!("{:?}", Value::Int(1)), "Int(1)");
    assert_eq!(
        format!("{:?}", ints(&[1])),
        "List([Int(1)])"
    );
    assert_eq!(format!("{:?}", Value::unknown(NodeId::new(3))), "Unknown({3})");
}

#[test]
fn test_values_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Value>();
}
