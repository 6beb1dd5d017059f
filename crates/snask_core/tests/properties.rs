use proptest::prelude::*;
use snask_core::{Object, Value, deep_eq, loose_eq, loose_ne, parse, strict_eq, stringify, stringify_pretty};

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Nil),
        any::<bool>().prop_map(Value::Boolean),
        (-99999i32..99999).prop_map(|i| Value::Number(i as f64)),
        (-9999i32..9999).prop_map(|i| Value::Number(i as f64 / 4.0)),
        any::<String>().prop_map(Value::String),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::array),
            prop::collection::vec(("[a-z_]{1,6}", inner), 0..6).prop_map(|members| {
                let mut obj = Object::new();
                for (k, v) in members {
                    obj.set(k, v);
                }
                Value::object(obj)
            }),
        ]
    })
}

proptest! {
    #[test]
    fn compact_round_trip_preserves_structure(v in value()) {
        let text = stringify(&v);
        let back = parse(&text).unwrap();
        prop_assert!(deep_eq(&v, &back), "{}", text);
    }

    #[test]
    fn pretty_round_trip_preserves_structure(v in value()) {
        let back = parse(&stringify_pretty(&v)).unwrap();
        prop_assert!(deep_eq(&v, &back));
    }

    #[test]
    fn loose_equality_is_symmetric(a in scalar(), b in scalar()) {
        prop_assert_eq!(loose_eq(&a, &b), loose_eq(&b, &a));
        prop_assert_eq!(loose_ne(&a, &b), !loose_eq(&a, &b));
    }

    #[test]
    fn strict_equality_implies_loose_equality(a in scalar(), b in scalar()) {
        if strict_eq(&a, &b) {
            prop_assert!(loose_eq(&a, &b));
        }
    }
}
