//! Property-based tests for JTON format primitives

use jton_format::packed::{pack_bools, pack_floats, pack_ints, unpack, Unpacked};
use jton_format::token::{base62, is_reserved, KeyDict};
use proptest::prelude::*;

proptest! {
    #[test]
    fn bool_pack_roundtrip_property(
        values in prop::collection::vec(any::<bool>(), 2..500)
    ) {
        let packed = pack_bools(&values);
        let Unpacked::Bools(decoded) = unpack(&packed).expect("unpack bools") else {
            panic!("expected booleans");
        };
        prop_assert_eq!(values, decoded);
    }

    #[test]
    fn int_pack_roundtrip_property(
        values in prop::collection::vec(any::<i64>(), 2..200)
    ) {
        let packed = pack_ints(&values);
        let Unpacked::Ints(decoded) = unpack(&packed).expect("unpack ints") else {
            panic!("expected integers");
        };
        prop_assert_eq!(values, decoded);
    }

    #[test]
    fn small_int_pack_is_single_byte_property(
        values in prop::collection::vec(0i64..=255, 2..100)
    ) {
        let packed = pack_ints(&values);
        prop_assert!(packed.starts_with('U') || packed.starts_with('B'));
    }

    #[test]
    fn float_pack_roundtrip_is_bit_exact_property(
        values in prop::collection::vec(-1.0e12f64..1.0e12, 2..200)
    ) {
        let packed = pack_floats(&values);
        let Unpacked::Floats(decoded) = unpack(&packed).expect("unpack floats") else {
            panic!("expected floats");
        };
        prop_assert_eq!(values.len(), decoded.len());
        for (a, b) in values.iter().zip(decoded.iter()) {
            prop_assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn cent_valued_floats_use_scaled_pack_property(
        cents in prop::collection::vec(-32768i64..=32767, 2..100)
    ) {
        let values: Vec<f64> = cents.iter().map(|&c| c as f64 / 100.0).collect();
        let packed = pack_floats(&values);
        prop_assert!(
            packed.starts_with('F'),
            "cent values should pack scaled, got {}",
            packed
        );
        let Unpacked::Floats(decoded) = unpack(&packed).expect("unpack floats") else {
            panic!("expected floats");
        };
        for (a, b) in values.iter().zip(decoded.iter()) {
            prop_assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn base62_tokens_are_unique_property(count in 1usize..2000) {
        let mut seen = std::collections::HashSet::new();
        for n in 0..count as u64 {
            prop_assert!(seen.insert(base62(n)), "duplicate token for {}", n);
        }
    }

    #[test]
    fn interned_tokens_never_reserved_property(
        keys in prop::collection::vec("[a-z_]{1,10}", 1..100)
    ) {
        let mut dict = KeyDict::new();
        for key in &keys {
            let token = dict.intern(key);
            prop_assert!(!is_reserved(&token));
            prop_assert!(!token.is_empty());
        }
    }
}
