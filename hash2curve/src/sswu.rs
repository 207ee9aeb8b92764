//! Simplified Shallue–van de Woestijne–Ulas map (RFC 9380 §6.6.2).

use ctfield::{FieldElement, FieldParams};
use subtle::{Choice, ConditionallySelectable};

use crate::isogeny::Isogeny;

/// Affine output of a curve map.
///
/// `is_identity` is set when the map lands on the point at infinity (only
/// possible through an isogeny denominator or an Elligator exceptional
/// case); `x` and `y` are zeroed in that event and must not be interpreted
/// as coordinates.
#[derive(Clone, Copy, Debug)]
pub struct MappedPoint {
    /// Affine x coordinate.
    pub x: FieldElement,
    /// Affine y coordinate.
    pub y: FieldElement,
    /// Point-at-infinity marker.
    pub is_identity: Choice,
}

/// Parameters of the SSWU map for one Weierstrass curve `y² = x³ + Ax + B`
/// (with `A, B ≠ 0`) and a non-square `Z`.
///
/// Curves with `A = 0` or `B = 0` (secp256k1) supply the constants of an
/// isogenous curve together with the rational map back to the target curve.
#[derive(Debug)]
pub struct SswuParams {
    a: FieldElement,
    b: FieldElement,
    z: FieldElement,
    /// -B / A, the numerator scale of the first candidate abscissa.
    neg_b_div_a: FieldElement,
    /// B / (Z * A), the exceptional-case abscissa.
    b_div_za: FieldElement,
    isogeny: Option<Isogeny>,
}

impl SswuParams {
    /// Builds the map parameters. `a`, `b` and `z` must be the constants of
    /// an SSWU-suitable curve: `a` and `z` invertible, `z` a non-square.
    pub fn new(
        field: &'static FieldParams,
        a: FieldElement,
        b: FieldElement,
        z: FieldElement,
        isogeny: Option<Isogeny>,
    ) -> Self {
        let a_inv = a.invert().unwrap_or(field.zero());
        debug_assert!(!bool::from(a.is_zero()) && !bool::from(z.is_zero()));
        let neg_b_div_a = (b.mul(&a_inv)).negate();
        let b_div_za = b.mul(&z.mul(&a).invert().unwrap_or(field.zero()));
        Self {
            a,
            b,
            z,
            neg_b_div_a,
            b_div_za,
            isogeny,
        }
    }

    /// Maps a field element to an affine curve point, constant-time.
    pub fn map_to_curve(&self, u: &FieldElement) -> MappedPoint {
        let field = u.params();
        let one = field.one();

        let z_u2 = self.z.mul(&u.square());
        let tv1 = z_u2.square().add(&z_u2);
        let tv1_is_zero = tv1.is_zero();
        let tv1_inv = tv1.invert().unwrap_or(field.zero());

        // x1 = (-B / A) * (1 + inv0(Z² u⁴ + Z u²)), or B / (Z A) when the
        // denominator vanishes.
        let x1 = self.neg_b_div_a.mul(&one.add(&tv1_inv));
        let x1 = FieldElement::conditional_select(&x1, &self.b_div_za, tv1_is_zero);
        let gx1 = self.g(&x1);

        let x2 = z_u2.mul(&x1);
        let gx2 = self.g(&x2);

        let e = gx1.is_square();
        let x = FieldElement::conditional_select(&x2, &x1, e);
        let gx = FieldElement::conditional_select(&gx2, &gx1, e);
        // Exactly one of gx1, gx2 is a square (both when u = 0), so the
        // selected value always has a root.
        let mut y = gx.sqrt().unwrap_or(field.zero());
        y.conditional_negate(u.sgn0() ^ y.sgn0());

        match &self.isogeny {
            Some(iso) => iso.map(&x, &y),
            None => MappedPoint {
                x,
                y,
                is_identity: Choice::from(0u8),
            },
        }
    }

    /// g(x) = x³ + Ax + B.
    fn g(&self, x: &FieldElement) -> FieldElement {
        x.square().mul(x).add(&self.a.mul(x)).add(&self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash_to_field;
    use hex_literal::hex;
    use once_cell::sync::Lazy;
    use sha2::Sha256;

    static P256_FIELD: Lazy<FieldParams> = Lazy::new(|| {
        FieldParams::new(&hex!(
            "ffffffff00000001000000000000000000000000ffffffffffffffffffffffff"
        ))
    });

    static P256_SSWU: Lazy<SswuParams> = Lazy::new(|| {
        let a = P256_FIELD.from_u64(3).negate();
        let b = P256_FIELD
            .decode(&hex!(
                "5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b"
            ))
            .expect("curve constant");
        let z = P256_FIELD.from_u64(10).negate();
        SswuParams::new(&P256_FIELD, a, b, z, None)
    });

    #[test]
    fn p256_map_vectors() {
        // Q0, Q1 for P256_XMD:SHA-256_SSWU_RO_, msg = "" (RFC 9380 J.1.1).
        let u = hash_to_field::<Sha256>(
            &P256_FIELD,
            48,
            &[b""],
            b"QUUX-V01-CS02-with-P256_XMD:SHA-256_SSWU_RO_",
            2,
        )
        .expect("hash_to_field");

        let q0 = P256_SSWU.map_to_curve(&u[0]);
        assert_eq!(
            q0.x.encode(),
            hex!("ab640a12220d3ff283510ff3f4b1953d09fad35795140b1c5d64f313967934d5")
        );
        assert_eq!(
            q0.y.encode(),
            hex!("dccb558863804a881d4fff3455716c836cef230e5209594ddd33d85c565b19b1")
        );

        let q1 = P256_SSWU.map_to_curve(&u[1]);
        assert_eq!(
            q1.x.encode(),
            hex!("51cce63c50d972a6e51c61334f0f4875c9ac1cd2d3238412f84e31da7d980ef5")
        );
        assert_eq!(
            q1.y.encode(),
            hex!("b45d1a36d00ad90e5ec7840a60a4de411917fbe7c82c3949a6e699e5a1b66aac")
        );
    }

    #[test]
    fn map_output_is_on_curve() {
        for v in 0..16u64 {
            let u = P256_FIELD.from_u64(v);
            let p = P256_SSWU.map_to_curve(&u);
            assert!(!bool::from(p.is_identity));
            let lhs = p.y.square();
            let rhs = P256_SSWU.g(&p.x);
            assert_eq!(lhs, rhs);
        }
    }
}
