//! secp256k1 point arithmetic.
//!
//! Two representations are maintained and selected statically by intent:
//!
//! - [`ProjectivePoint`]: homogeneous coordinates with the complete
//!   Renes–Costello–Batina formulas (a = 0, b3 = 21). Uniform control flow,
//!   used for the public element API and for scalar multiplication.
//! - [`JacobianPoint`]: Jacobian coordinates with the incomplete
//!   `add-2007-bl` / `dbl-2009-l` formulas and explicit special-case
//!   pre-checks. Faster but variable-time over its inputs, used only on the
//!   public-input hash-to-curve path.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

use super::field::FieldElement;

/// Affine point, with an explicit infinity flag (0 or 1).
#[derive(Clone, Copy, Debug)]
pub struct AffinePoint {
    pub x: FieldElement,
    pub y: FieldElement,
    pub infinity: u8,
}

impl AffinePoint {
    pub const GENERATOR: Self = Self {
        x: FieldElement::from_words([
            0x59f2_815b_16f8_1798,
            0x029b_fcdb_2dce_28d9,
            0x55a0_6295_ce87_0b07,
            0x79be_667e_f9dc_bbac,
        ]),
        y: FieldElement::from_words([
            0x9c47_d08f_fb10_d4b8,
            0xfd17_b448_a685_5419,
            0x5da4_fbfc_0e11_08a8,
            0x483a_da77_26a3_c465,
        ]),
        infinity: 0,
    };

    pub fn identity() -> Self {
        Self {
            x: FieldElement::ZERO,
            y: FieldElement::ONE,
            infinity: 1,
        }
    }

    /// Recovers the point with the given x and y parity; fails off-curve.
    pub fn decompress(x_bytes: &[u8; 32], y_is_odd: Choice) -> CtOption<Self> {
        FieldElement::from_bytes(x_bytes).and_then(|x| {
            let y_squared = x.square().mul(&x).add(&FieldElement::B);
            y_squared.sqrt().map(|mut y| {
                y.conditional_assign(&y.negate(), y.is_odd() ^ y_is_odd);
                Self {
                    x,
                    y,
                    infinity: 0,
                }
            })
        })
    }

    pub fn is_identity(&self) -> Choice {
        Choice::from(self.infinity)
    }

    pub fn is_on_curve(&self) -> Choice {
        let rhs = self.x.square().mul(&self.x).add(&FieldElement::B);
        self.y.square().ct_eq(&rhs) | self.is_identity()
    }
}

impl ConstantTimeEq for AffinePoint {
    fn ct_eq(&self, other: &Self) -> Choice {
        let coords = self.x.ct_eq(&other.x) & self.y.ct_eq(&other.y);
        let both_infinity = self.is_identity() & other.is_identity();
        let neither_infinity = !self.is_identity() & !other.is_identity();
        both_infinity | (neither_infinity & coords)
    }
}

/// Homogeneous projective point; the identity is (0 : 1 : 0).
#[derive(Clone, Copy, Debug)]
pub struct ProjectivePoint {
    x: FieldElement,
    y: FieldElement,
    z: FieldElement,
}

impl ProjectivePoint {
    pub const IDENTITY: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
        z: FieldElement::ZERO,
    };

    pub const GENERATOR: Self = Self {
        x: AffinePoint::GENERATOR.x,
        y: AffinePoint::GENERATOR.y,
        z: FieldElement::ONE,
    };

    pub fn from_affine(p: &AffinePoint) -> Self {
        let mut out = Self {
            x: p.x,
            y: p.y,
            z: FieldElement::ONE,
        };
        out = Self::conditional_select(&out, &Self::IDENTITY, p.is_identity());
        out
    }

    pub fn to_affine(&self) -> AffinePoint {
        let maybe_inv = self.z.invert();
        let is_identity = self.is_identity();
        let z_inv = maybe_inv.unwrap_or(FieldElement::ZERO);
        let mut out = AffinePoint {
            x: self.x.mul(&z_inv),
            y: self.y.mul(&z_inv),
            infinity: is_identity.unwrap_u8(),
        };
        out.x = FieldElement::conditional_select(&out.x, &FieldElement::ZERO, is_identity);
        out.y = FieldElement::conditional_select(&out.y, &FieldElement::ONE, is_identity);
        out
    }

    pub fn is_identity(&self) -> Choice {
        self.z.is_zero()
    }

    /// Complete addition, Renes–Costello–Batina 2016 algorithm 7 for a = 0.
    pub fn add(&self, other: &Self) -> Self {
        let xx = self.x.mul(&other.x);
        let yy = self.y.mul(&other.y);
        let zz = self.z.mul(&other.z);

        let xy_pairs = self
            .x
            .add(&self.y)
            .mul(&other.x.add(&other.y))
            .sub(&xx.add(&yy));
        let yz_pairs = self
            .y
            .add(&self.z)
            .mul(&other.y.add(&other.z))
            .sub(&yy.add(&zz));
        let xz_pairs = self
            .x
            .add(&self.z)
            .mul(&other.x.add(&other.z))
            .sub(&xx.add(&zz));

        let bzz3 = zz.mul_small(21);
        let yy_minus_bzz3 = yy.sub(&bzz3);
        let yy_plus_bzz3 = yy.add(&bzz3);
        let byz3 = yz_pairs.mul_small(21);
        let xx3 = xx.mul_small(3);
        let bxx9 = xx.mul_small(63);

        Self {
            x: xy_pairs.mul(&yy_minus_bzz3).sub(&byz3.mul(&xz_pairs)),
            y: yy_plus_bzz3.mul(&yy_minus_bzz3).add(&bxx9.mul(&xz_pairs)),
            z: yz_pairs.mul(&yy_plus_bzz3).add(&xx3.mul(&xy_pairs)),
        }
    }

    /// Complete doubling, Renes–Costello–Batina 2016 algorithm 9 for a = 0.
    pub fn double(&self) -> Self {
        let yy = self.y.square();
        let zz = self.z.square();
        let xy2 = self.x.mul(&self.y).double();

        let bzz3 = zz.mul_small(21);
        let bzz9 = zz.mul_small(63);
        let yy_minus_bzz9 = yy.sub(&bzz9);
        let yy_plus_bzz3 = yy.add(&bzz3);
        let t = yy.mul(&zz).mul_small(168);

        Self {
            x: xy2.mul(&yy_minus_bzz9),
            y: yy_minus_bzz9.mul(&yy_plus_bzz3).add(&t),
            z: yy.mul(&self.y).mul(&self.z).mul_small(8),
        }
    }

    pub fn negate(&self) -> Self {
        Self {
            x: self.x,
            y: self.y.negate(),
            z: self.z,
        }
    }

    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.negate())
    }

    /// Montgomery-ladder scalar multiplication over the complete formulas.
    ///
    /// Scans all 256 bits of the big-endian scalar encoding; both ladder
    /// arms execute every round, with conditional swaps in place of
    /// data-dependent branches.
    pub fn mul(&self, scalar_bytes: &[u8; 32]) -> Self {
        let mut r0 = Self::IDENTITY;
        let mut r1 = *self;
        for byte in scalar_bytes {
            for bit_index in (0..8).rev() {
                let bit = Choice::from((byte >> bit_index) & 1);
                Self::conditional_swap(&mut r0, &mut r1, bit);
                let sum = r0.add(&r1);
                let doubled = r0.double();
                r0 = doubled;
                r1 = sum;
                Self::conditional_swap(&mut r0, &mut r1, bit);
            }
        }
        r0
    }
}

impl ConstantTimeEq for ProjectivePoint {
    fn ct_eq(&self, other: &Self) -> Choice {
        // Cross-multiplication comparison; identities carry z = 0.
        let id1 = self.is_identity();
        let id2 = other.is_identity();
        let x_cross = self.x.mul(&other.z).ct_eq(&other.x.mul(&self.z));
        let y_cross = self.y.mul(&other.z).ct_eq(&other.y.mul(&self.z));
        (id1 & id2) | (!id1 & !id2 & x_cross & y_cross)
    }
}

impl PartialEq for ProjectivePoint {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for ProjectivePoint {}

impl ConditionallySelectable for ProjectivePoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            z: FieldElement::conditional_select(&a.z, &b.z, choice),
        }
    }
}

/// Jacobian point; affine coordinates are (X/Z², Y/Z³), identity has Z = 0.
#[derive(Clone, Copy, Debug)]
pub struct JacobianPoint {
    x: FieldElement,
    y: FieldElement,
    z: FieldElement,
}

impl JacobianPoint {
    pub const IDENTITY: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
        z: FieldElement::ZERO,
    };

    pub fn from_affine(p: &AffinePoint) -> Self {
        if p.infinity == 1 {
            Self::IDENTITY
        } else {
            Self {
                x: p.x,
                y: p.y,
                z: FieldElement::ONE,
            }
        }
    }

    pub fn is_identity(&self) -> bool {
        bool::from(self.z.is_zero())
    }

    /// Incomplete addition (`add-2007-bl`). The driver pre-checks the cases
    /// the formula cannot represent: either operand at infinity, doubling,
    /// and annihilation. Variable-time; public inputs only.
    pub fn add(&self, other: &Self) -> Self {
        if self.is_identity() {
            return *other;
        }
        if other.is_identity() {
            return *self;
        }

        let z1z1 = self.z.square();
        let z2z2 = other.z.square();
        let u1 = self.x.mul(&z2z2);
        let u2 = other.x.mul(&z1z1);
        let s1 = self.y.mul(&other.z).mul(&z2z2);
        let s2 = other.y.mul(&self.z).mul(&z1z1);

        if u1 == u2 {
            if s1 == s2 {
                return self.double();
            }
            return Self::IDENTITY;
        }

        let h = u2.sub(&u1);
        let i = h.double().square();
        let j = h.mul(&i);
        let r = s2.sub(&s1).double();
        let v = u1.mul(&i);

        let x3 = r.square().sub(&j).sub(&v.double());
        let y3 = r.mul(&v.sub(&x3)).sub(&s1.mul(&j).double());
        let z3 = self
            .z
            .add(&other.z)
            .square()
            .sub(&z1z1)
            .sub(&z2z2)
            .mul(&h);

        Self {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Jacobian doubling (`dbl-2009-l`).
    pub fn double(&self) -> Self {
        if self.is_identity() {
            return *self;
        }

        let a = self.x.square();
        let b = self.y.square();
        let c = b.square();
        let d = self.x.add(&b).square().sub(&a).sub(&c).double();
        let e = a.mul_small(3);
        let f = e.square();

        let x3 = f.sub(&d.double());
        let y3 = e.mul(&d.sub(&x3)).sub(&c.mul_small(8));
        let z3 = self.y.mul(&self.z).double();

        Self {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    pub fn to_affine(&self) -> AffinePoint {
        match Option::<FieldElement>::from(self.z.invert()) {
            None => AffinePoint::identity(),
            Some(z_inv) => {
                let z_inv_squared = z_inv.square();
                AffinePoint {
                    x: self.x.mul(&z_inv_squared),
                    y: self.y.mul(&z_inv_squared).mul(&z_inv),
                    infinity: 0,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn generator_multiple_complete(k: u64) -> ProjectivePoint {
        let mut acc = ProjectivePoint::IDENTITY;
        for _ in 0..k {
            acc = acc.add(&ProjectivePoint::GENERATOR);
        }
        acc
    }

    #[test]
    fn generator_is_on_curve() {
        assert!(bool::from(AffinePoint::GENERATOR.is_on_curve()));
    }

    #[test]
    fn complete_add_handles_all_cases() {
        let g = ProjectivePoint::GENERATOR;
        // P + identity == P
        assert!(bool::from(g.add(&ProjectivePoint::IDENTITY).ct_eq(&g)));
        // P + P == double(P)
        assert!(bool::from(g.add(&g).ct_eq(&g.double())));
        // P + (-P) == identity
        assert!(bool::from(g.add(&g.negate()).is_identity()));
    }

    #[test]
    fn jacobian_matches_complete_formulas() {
        let mut jacobian = JacobianPoint::IDENTITY;
        let g_jacobian = JacobianPoint::from_affine(&AffinePoint::GENERATOR);
        for k in 1..40u64 {
            jacobian = jacobian.add(&g_jacobian);
            let complete = generator_multiple_complete(k).to_affine();
            assert!(bool::from(jacobian.to_affine().ct_eq(&complete)));
        }
        // Doubling agreement.
        let doubled = g_jacobian.double().to_affine();
        assert!(bool::from(
            doubled.ct_eq(&ProjectivePoint::GENERATOR.double().to_affine())
        ));
        // Annihilation.
        let minus_g = JacobianPoint::from_affine(&ProjectivePoint::GENERATOR.negate().to_affine());
        assert!(g_jacobian.add(&minus_g).is_identity());
    }

    #[test]
    fn ladder_edge_scalars() {
        let g = ProjectivePoint::GENERATOR;
        assert!(bool::from(g.mul(&[0u8; 32]).is_identity()));

        let mut one = [0u8; 32];
        one[31] = 1;
        assert!(bool::from(g.mul(&one).ct_eq(&g)));

        // n - 1 gives -G.
        let n_minus_1 = hex!("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140");
        assert!(bool::from(g.mul(&n_minus_1).ct_eq(&g.negate())));
    }

    #[test]
    fn ladder_matches_additive_multiples() {
        for k in 1..20u64 {
            let mut bytes = [0u8; 32];
            bytes[24..].copy_from_slice(&k.to_be_bytes());
            let via_ladder = ProjectivePoint::GENERATOR.mul(&bytes);
            assert!(bool::from(
                via_ladder.ct_eq(&generator_multiple_complete(k))
            ));
        }
    }

    #[test]
    fn scalar_mul_fixture() {
        // FROST secp256k1 key-generation fixture.
        let secret = hex!("0d004150d27c3bf2a42f312683d35fac7394b1e9e318249c1bfe7f0795a83114");
        let public = ProjectivePoint::GENERATOR.mul(&secret).to_affine();
        assert_eq!(
            public.x.to_bytes(),
            hex!("f37c34b66ced1fb51c34a90bdae006901f10625cc06c4f64663b0eae87d87b4f")
        );
        assert!(!bool::from(public.y.is_odd()));
    }

    #[test]
    fn decompress_round_trip() {
        let g = AffinePoint::GENERATOR;
        let recovered =
            AffinePoint::decompress(&g.x.to_bytes(), g.y.is_odd()).expect("on curve");
        assert!(bool::from(recovered.ct_eq(&g)));
        let flipped =
            AffinePoint::decompress(&g.x.to_bytes(), !g.y.is_odd()).expect("on curve");
        assert!(bool::from(flipped.y.ct_eq(&g.y.negate())));
    }

    #[test]
    fn decompress_rejects_off_curve_x() {
        // x = 0: y² = 7 has no root mod p.
        assert!(bool::from(
            AffinePoint::decompress(&[0u8; 32], Choice::from(0u8)).is_none()
        ));
    }
}
