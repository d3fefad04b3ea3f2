//! Property-based round-trip tests over generated JSON values

use jton_codec::decode::looks_like_envelope;
use jton_codec::{compress_json, compress_json_with, decompress_json, EncodeOptions};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|i| json!(i)),
        (-1.0e12f64..1.0e12).prop_map(|f| json!(f)),
        // Uppercase starts exercise the reserved-prefix escape.
        "[A-Za-z0-9 ~=+/]{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
            prop::collection::vec(("[a-zA-Z_]{1,8}", inner), 0..8).prop_map(|entries| {
                let mut map = Map::new();
                for (key, value) in entries {
                    map.insert(key, value);
                }
                Value::Object(map)
            }),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn roundtrip_is_exact(value in arb_json()) {
        let text = compress_json(&value).expect("compress");
        let decoded = decompress_json(&text).expect("decompress");
        prop_assert_eq!(
            serde_json::to_string(&decoded).unwrap(),
            serde_json::to_string(&value).unwrap()
        );
    }

    #[test]
    fn readable_roundtrip_is_exact(value in arb_json()) {
        let text = compress_json_with(&value, &EncodeOptions::readable()).expect("compress");
        let decoded = decompress_json(&text).expect("decompress");
        prop_assert_eq!(
            serde_json::to_string(&decoded).unwrap(),
            serde_json::to_string(&value).unwrap()
        );
    }

    #[test]
    fn output_never_inflates(value in arb_json()) {
        // The one sanctioned exception: inputs that themselves look like
        // envelopes are force-wrapped to stay decodable.
        prop_assume!(!looks_like_envelope(&value));
        let text = compress_json(&value).expect("compress");
        let canonical = serde_json::to_string(&value).unwrap();
        prop_assert!(text.len() <= canonical.len());
    }

    #[test]
    fn output_is_always_valid_json(value in arb_json()) {
        let text = compress_json(&value).expect("compress");
        let reparsed: Result<Value, _> = serde_json::from_str(&text);
        prop_assert!(reparsed.is_ok());
    }

    #[test]
    fn same_typed_leaf_arrays_roundtrip(
        ints in prop::collection::vec(any::<i64>(), 0..64),
        floats in prop::collection::vec(-1.0e9f64..1.0e9, 0..64),
        bools in prop::collection::vec(any::<bool>(), 0..64),
        strings in prop::collection::vec("[A-Za-z]{0,10}", 0..64),
    ) {
        for value in [json!(ints), json!(floats), json!(bools), json!(strings)] {
            let text = compress_json(&value).expect("compress");
            let decoded = decompress_json(&text).expect("decompress");
            prop_assert_eq!(
                serde_json::to_string(&decoded).unwrap(),
                serde_json::to_string(&value).unwrap()
            );
        }
    }

    #[test]
    fn uniform_rows_roundtrip(
        ids in prop::collection::vec(any::<i32>(), 2..32),
        flag in any::<bool>(),
    ) {
        let rows: Vec<Value> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| json!({"id": id, "pos": i, "ok": flag}))
            .collect();
        let value = Value::Array(rows);
        let text = compress_json(&value).expect("compress");
        let decoded = decompress_json(&text).expect("decompress");
        prop_assert_eq!(
            serde_json::to_string(&decoded).unwrap(),
            serde_json::to_string(&value).unwrap()
        );
    }
}
