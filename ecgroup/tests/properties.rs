//! Randomized properties over the public API, cross-checked against
//! reference big-integer arithmetic.

use ecgroup::Group;
use num_bigint::BigUint;
use num_traits::Zero;
use proptest::prelude::*;

/// Canonical encoding as an integer, respecting per-curve endianness.
fn scalar_int(group: Group, scalar: &ecgroup::Scalar) -> BigUint {
    let bytes = scalar.encode();
    match group {
        Group::Ristretto255Sha512 | Group::Edwards25519Sha512 => BigUint::from_bytes_le(&bytes),
        _ => BigUint::from_bytes_be(&bytes),
    }
}

fn order_int(group: Group) -> BigUint {
    BigUint::from_bytes_be(&group.order())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn scalar_add_matches_bigint(seed_a in any::<[u8; 16]>(), seed_b in any::<[u8; 16]>()) {
        for group in Group::list() {
            let dst = group.make_dst("proptest", 1).expect("dst");
            let a = group.hash_to_scalar(&seed_a, &dst).expect("hash");
            let b = group.hash_to_scalar(&seed_b, &dst).expect("hash");
            let mut sum = a.copy();
            sum.add(&b);
            let n = order_int(*group);
            prop_assert_eq!(
                scalar_int(*group, &sum),
                (scalar_int(*group, &a) + scalar_int(*group, &b)) % &n
            );
        }
    }

    #[test]
    fn scalar_mul_matches_bigint(seed_a in any::<[u8; 16]>(), seed_b in any::<[u8; 16]>()) {
        for group in Group::list() {
            let dst = group.make_dst("proptest", 1).expect("dst");
            let a = group.hash_to_scalar(&seed_a, &dst).expect("hash");
            let b = group.hash_to_scalar(&seed_b, &dst).expect("hash");
            let mut product = a.copy();
            product.multiply(&b);
            let n = order_int(*group);
            prop_assert_eq!(
                scalar_int(*group, &product),
                (scalar_int(*group, &a) * scalar_int(*group, &b)) % &n
            );
        }
    }

    #[test]
    fn hashed_scalars_are_reduced(seed in any::<[u8; 24]>()) {
        for group in Group::list() {
            let dst = group.make_dst("proptest", 1).expect("dst");
            let scalar = group.hash_to_scalar(&seed, &dst).expect("hash");
            prop_assert!(scalar_int(*group, &scalar) < order_int(*group));
        }
    }

    #[test]
    fn hashed_elements_round_trip(seed in any::<[u8; 24]>()) {
        for group in Group::list() {
            let dst = group.make_dst("proptest", 1).expect("dst");
            let element = group.hash_to_group(&seed, &dst).expect("hash");
            let encoded = element.encode();
            prop_assert_eq!(encoded.len(), group.element_length());
            let decoded = group.decode_element(&encoded).expect("round trip");
            prop_assert!(bool::from(decoded.equal(&element)));
        }
    }

    #[test]
    fn scalar_mult_distributes_over_hashes(
        seed_a in any::<[u8; 16]>(),
        seed_b in any::<[u8; 16]>(),
        msg in any::<[u8; 8]>()
    ) {
        for group in Group::list() {
            let dst = group.make_dst("proptest", 1).expect("dst");
            let a = group.hash_to_scalar(&seed_a, &dst).expect("hash");
            let b = group.hash_to_scalar(&seed_b, &dst).expect("hash");
            let point = group.hash_to_group(&msg, &dst).expect("hash");

            // (a + b)P == aP + bP on a hashed (non-generator) point.
            let mut scalar_sum = a.copy();
            scalar_sum.add(&b);
            let mut lhs = point.copy();
            lhs.multiply(&scalar_sum);

            let mut ap = point.copy();
            ap.multiply(&a);
            let mut bp = point.copy();
            bp.multiply(&b);
            ap.add(&bp);

            prop_assert!(bool::from(lhs.equal(&ap)));
        }
    }

    #[test]
    fn random_garbage_rarely_decodes(bytes in proptest::collection::vec(any::<u8>(), 0..80)) {
        // Decoding never panics, and whenever it succeeds the result
        // re-encodes to the same bytes.
        for group in Group::list() {
            if let Ok(element) = group.decode_element(&bytes) {
                prop_assert_eq!(element.encode(), bytes.clone());
            }
            if let Ok(scalar) = group.decode_scalar(&bytes) {
                prop_assert_eq!(scalar.encode(), bytes.clone());
            }
        }
    }

    #[test]
    fn zero_scalar_behaviour(seed in any::<[u8; 16]>()) {
        for group in Group::list() {
            let dst = group.make_dst("proptest", 1).expect("dst");
            let a = group.hash_to_scalar(&seed, &dst).expect("hash");
            let zero = group.new_scalar();
            prop_assert!(scalar_int(*group, &zero).is_zero());

            // a * 0 == 0; P * 0 == identity.
            let mut product = a.copy();
            product.multiply(&zero);
            prop_assert!(bool::from(product.is_zero()));
            let mut point = group.base();
            point.multiply(&zero);
            prop_assert!(bool::from(point.is_identity()));
        }
    }
}
