//! Elligator 2 for curve25519 and the birational map to edwards25519
//! (RFC 9380 §6.7.1, §6.8.2 and appendix D).

use ctfield::{FieldElement, FieldParams};
use subtle::ConditionallySelectable;

use crate::sswu::MappedPoint;

/// Montgomery curve constant of curve25519.
const J: u64 = 486662;
/// Non-square for the map.
const Z: u64 = 2;

/// Elligator 2 over GF(2²⁵⁵ − 19).
///
/// The `map_to_edwards` output uses the twisted Edwards coordinates of
/// edwards25519; the caller is responsible for cofactor clearance.
#[derive(Debug)]
pub struct Elligator2 {
    j: FieldElement,
    neg_j: FieldElement,
    z: FieldElement,
    /// sqrt(-486664), the even root, scaling the birational map.
    c: FieldElement,
}

impl Elligator2 {
    /// Builds the map over the given curve25519 base field.
    pub fn new(field: &'static FieldParams) -> Self {
        let j = field.from_u64(J);
        // The RFC pins sgn0(sqrt(-486664)) == 0; -486664 is a square mod
        // 2^255 - 19, so the root always exists.
        let mut c = field
            .from_u64(486664)
            .negate()
            .sqrt()
            .unwrap_or(field.zero());
        c.conditional_negate(c.sgn0());
        Self {
            j,
            neg_j: j.negate(),
            z: field.from_u64(Z),
            c,
        }
    }

    /// Maps a field element to a point (s, t) on curve25519, constant-time.
    pub fn map_to_curve25519(&self, u: &FieldElement) -> (FieldElement, FieldElement) {
        let field = u.params();
        let one = field.one();

        let tv1 = one.add(&self.z.mul(&u.square()));
        let tv1_is_zero = tv1.is_zero();
        // x1 = -J / (1 + Z u²), or -J at the exceptional point.
        let x1 = self.neg_j.mul(&tv1.invert().unwrap_or(field.zero()));
        let x1 = FieldElement::conditional_select(&x1, &self.neg_j, tv1_is_zero);
        let gx1 = self.g(&x1);

        let x2 = x1.negate().sub(&self.j);
        let gx2 = self.g(&x2);

        let square = gx1.is_square();
        let x = FieldElement::conditional_select(&x2, &x1, square);
        let gx = FieldElement::conditional_select(&gx2, &gx1, square);
        let mut y = gx.sqrt().unwrap_or(field.zero());
        // sgn0(y) == 1 on the gx1 branch, 0 on the gx2 branch.
        y.conditional_negate(y.sgn0() ^ square);
        (x, y)
    }

    /// Maps a field element to an affine edwards25519 point.
    pub fn map_to_edwards(&self, u: &FieldElement) -> MappedPoint {
        let field = u.params();
        let one = field.one();

        let (s, t) = self.map_to_curve25519(u);
        // x = c·s/t, y = (s-1)/(s+1); both exceptional cases (t = 0 or
        // s = -1) land on the neutral element (0, 1).
        let s_plus_1 = s.add(&one);
        let denominator = s_plus_1.mul(&t);
        let exceptional = denominator.is_zero();
        let inv = denominator.invert().unwrap_or(field.zero());

        let x = self.c.mul(&s).mul(&inv).mul(&s_plus_1);
        let y = s.sub(&one).mul(&inv).mul(&t);

        MappedPoint {
            x: FieldElement::conditional_select(&x, &field.zero(), exceptional),
            y: FieldElement::conditional_select(&y, &one, exceptional),
            is_identity: exceptional,
        }
    }

    /// g(x) = x³ + Jx² + x.
    fn g(&self, x: &FieldElement) -> FieldElement {
        x.square().add(&self.j.mul(x)).add(&x.params().one()).mul(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash_to_field;
    use hex_literal::hex;
    use once_cell::sync::Lazy;
    use sha2::Sha512;

    static ED_FIELD: Lazy<FieldParams> = Lazy::new(|| {
        FieldParams::new(&hex!(
            "7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffed"
        ))
    });

    static ELL2: Lazy<Elligator2> = Lazy::new(|| Elligator2::new(&ED_FIELD));

    #[test]
    fn rational_map_constant() {
        // sqrt(-486664) with sgn0 == 0.
        assert_eq!(
            ELL2.c.encode(),
            hex!("0f26edf460a006bbd27b08dc03fc4f7ec5a1d3d14b7d1a82cc6e04aaff457e06")
        );
    }

    #[test]
    fn edwards25519_map_vectors() {
        // u[0], u[1], Q0, Q1 for edwards25519_XMD:SHA-512_ELL2_RO_,
        // msg = "" (RFC 9380 J.5.1).
        let u = hash_to_field::<Sha512>(
            &ED_FIELD,
            48,
            &[b""],
            b"QUUX-V01-CS02-with-edwards25519_XMD:SHA-512_ELL2_RO_",
            2,
        )
        .expect("hash_to_field");
        assert_eq!(
            u[0].encode(),
            hex!("03fef4813c8cb5f98c6eef88fae174e6e7d5380de2b007799ac7ee712d203f3a")
        );
        assert_eq!(
            u[1].encode(),
            hex!("780bdddd137290c8f589dc687795aafae35f6b674668d92bf92ae793e6a60c75")
        );

        let q0 = ELL2.map_to_edwards(&u[0]);
        assert!(!bool::from(q0.is_identity));
        assert_eq!(
            q0.x.encode(),
            hex!("6549118f65bb617b9e8b438decedc73c496eaed496806d3b2eb9ee60b88e09a7")
        );
        assert_eq!(
            q0.y.encode(),
            hex!("7315bcc8cf47ed68048d22bad602c6680b3382a08c7c5d3f439a973fb4cf9feb")
        );

        let q1 = ELL2.map_to_edwards(&u[1]);
        assert_eq!(
            q1.x.encode(),
            hex!("31dcfc5c58aa1bee6e760bf78cbe71c2bead8cebb2e397ece0f37a3da19c9ed2")
        );
        assert_eq!(
            q1.y.encode(),
            hex!("7876d81474828d8a5928b50c82420b2bd0898d819e9550c5c82c39fc9bafa196")
        );
    }

    #[test]
    fn map_lands_on_curve25519() {
        for v in 0..8u64 {
            let u = ED_FIELD.from_u64(v);
            let (s, t) = ELL2.map_to_curve25519(&u);
            assert_eq!(t.square(), ELL2.g(&s));
        }
    }

    #[test]
    fn zero_maps_to_identity() {
        // u = 0 gives t = 0 on the Montgomery curve, hence the neutral
        // element after the rational map.
        let p = ELL2.map_to_edwards(&ED_FIELD.zero());
        assert!(bool::from(p.is_identity));
        assert!(bool::from(p.x.is_zero()));
        assert_eq!(p.y, ED_FIELD.one());
    }
}
