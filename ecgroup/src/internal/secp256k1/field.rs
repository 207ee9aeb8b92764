//! Base-field arithmetic modulo p = 2^256 - 2^32 - 977.
//!
//! Elements are four 64-bit limbs holding the canonical representative.
//! Products are reduced with the identity 2^256 = 2^32 + 977 (mod p): the
//! high half of a wide product is folded back twice, which keeps every
//! operation branch-free.

use core::ops::{Add, Mul, Neg, Sub};

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};
use zeroize::Zeroize;

/// 2^256 mod p.
const FOLD: u64 = 0x1_0000_03d1;

/// p = 2^256 - 2^32 - 977, little-endian limbs.
const MODULUS: [u64; 4] = [
    0xffff_fffe_ffff_fc2f,
    0xffff_ffff_ffff_ffff,
    0xffff_ffff_ffff_ffff,
    0xffff_ffff_ffff_ffff,
];

/// An element of GF(p), canonical (< p).
#[derive(Clone, Copy, Debug)]
pub struct FieldElement(pub(crate) [u64; 4]);

impl FieldElement {
    pub const ZERO: Self = Self([0, 0, 0, 0]);
    pub const ONE: Self = Self([1, 0, 0, 0]);

    /// Curve equation constant b = 7.
    pub const B: Self = Self([7, 0, 0, 0]);

    pub(crate) const fn from_words(words: [u64; 4]) -> Self {
        Self(words)
    }

    /// Decodes 32 big-endian bytes; fails for values >= p.
    pub fn from_bytes(bytes: &[u8; 32]) -> CtOption<Self> {
        let mut words = [0u64; 4];
        for (i, word) in words.iter_mut().enumerate() {
            let mut chunk = [0u8; 8];
            chunk.copy_from_slice(&bytes[32 - 8 * (i + 1)..32 - 8 * i]);
            *word = u64::from_be_bytes(chunk);
        }
        let (_, borrow) = sub_words(&words, &MODULUS);
        CtOption::new(Self(words), Choice::from(borrow as u8))
    }

    /// Canonical 32-byte big-endian encoding.
    pub fn to_bytes(self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for (i, word) in self.0.iter().enumerate() {
            out[32 - 8 * (i + 1)..32 - 8 * i].copy_from_slice(&word.to_be_bytes());
        }
        out
    }

    pub fn is_zero(&self) -> Choice {
        self.ct_eq(&Self::ZERO)
    }

    pub fn is_odd(&self) -> Choice {
        Choice::from((self.0[0] & 1) as u8)
    }

    pub fn add(&self, rhs: &Self) -> Self {
        let (sum, carry) = add_words(&self.0, &rhs.0);
        let (diff, borrow) = sub_words(&sum, &MODULUS);
        // carry set or no borrow: the sum reached p, take the difference.
        let take_diff = Choice::from((carry | (borrow ^ 1)) as u8);
        Self(select(&sum, &diff, take_diff))
    }

    pub fn sub(&self, rhs: &Self) -> Self {
        let (diff, borrow) = sub_words(&self.0, &rhs.0);
        let (fixed, _) = add_words(&diff, &MODULUS);
        Self(select(&diff, &fixed, Choice::from(borrow as u8)))
    }

    pub fn double(&self) -> Self {
        self.add(self)
    }

    pub fn negate(&self) -> Self {
        let (diff, _) = sub_words(&MODULUS, &self.0);
        Self(select(&diff, &[0u64; 4], self.is_zero()))
    }

    pub fn mul(&self, rhs: &Self) -> Self {
        Self(reduce(&mul_wide(&self.0, &rhs.0)))
    }

    /// Multiplication by a small constant (formula coefficients).
    pub fn mul_small(&self, k: u64) -> Self {
        let mut wide = [0u64; 8];
        let mut carry = 0u64;
        for i in 0..4 {
            let t = (self.0[i] as u128) * (k as u128) + (carry as u128);
            wide[i] = t as u64;
            carry = (t >> 64) as u64;
        }
        wide[4] = carry;
        Self(reduce(&wide))
    }

    pub fn square(&self) -> Self {
        self.mul(self)
    }

    fn pow2k(&self, k: usize) -> Self {
        let mut out = *self;
        for _ in 0..k {
            out = out.square();
        }
        out
    }

    /// Fermat inversion with the 5-block addition chain for p - 2.
    pub fn invert(&self) -> CtOption<Self> {
        let c = self.chain_x223();
        let mut t = c.x223.pow2k(23).mul(&c.x22);
        t = t.pow2k(5).mul(self);
        t = t.pow2k(3).mul(&c.x2);
        t = t.pow2k(2).mul(self);
        CtOption::new(t, !self.is_zero())
    }

    /// Square root as the (p+1)/4 power; p = 3 (mod 4).
    pub fn sqrt(&self) -> CtOption<Self> {
        let c = self.chain_x223();
        let mut t = c.x223.pow2k(23).mul(&c.x22);
        t = t.pow2k(6).mul(&c.x2);
        t = t.pow2k(2);
        CtOption::new(t, t.square().ct_eq(self))
    }

    /// Shared prefix of the inversion and square-root chains: x_k = a^(2^k - 1).
    fn chain_x223(&self) -> Chain {
        let x2 = self.square().mul(self);
        let x3 = x2.square().mul(self);
        let x6 = x3.pow2k(3).mul(&x3);
        let x9 = x6.pow2k(3).mul(&x3);
        let x11 = x9.pow2k(2).mul(&x2);
        let x22 = x11.pow2k(11).mul(&x11);
        let x44 = x22.pow2k(22).mul(&x22);
        let x88 = x44.pow2k(44).mul(&x44);
        let x176 = x88.pow2k(88).mul(&x88);
        let x220 = x176.pow2k(44).mul(&x44);
        let x223 = x220.pow2k(3).mul(&x3);
        Chain { x2, x22, x223 }
    }
}

struct Chain {
    x2: FieldElement,
    x22: FieldElement,
    x223: FieldElement,
}

impl ConstantTimeEq for FieldElement {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0[0].ct_eq(&other.0[0])
            & self.0[1].ct_eq(&other.0[1])
            & self.0[2].ct_eq(&other.0[2])
            & self.0[3].ct_eq(&other.0[3])
    }
}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self(select(&a.0, &b.0, choice))
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for FieldElement {}

impl Default for FieldElement {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Zeroize for FieldElement {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl Add<&FieldElement> for &FieldElement {
    type Output = FieldElement;
    fn add(self, rhs: &FieldElement) -> FieldElement {
        FieldElement::add(self, rhs)
    }
}

impl Sub<&FieldElement> for &FieldElement {
    type Output = FieldElement;
    fn sub(self, rhs: &FieldElement) -> FieldElement {
        FieldElement::sub(self, rhs)
    }
}

impl Mul<&FieldElement> for &FieldElement {
    type Output = FieldElement;
    fn mul(self, rhs: &FieldElement) -> FieldElement {
        FieldElement::mul(self, rhs)
    }
}

impl Neg for &FieldElement {
    type Output = FieldElement;
    fn neg(self) -> FieldElement {
        self.negate()
    }
}

#[inline(always)]
fn add_words(a: &[u64; 4], b: &[u64; 4]) -> ([u64; 4], u64) {
    let mut out = [0u64; 4];
    let mut carry = 0u64;
    for i in 0..4 {
        let t = (a[i] as u128) + (b[i] as u128) + (carry as u128);
        out[i] = t as u64;
        carry = (t >> 64) as u64;
    }
    (out, carry)
}

#[inline(always)]
fn sub_words(a: &[u64; 4], b: &[u64; 4]) -> ([u64; 4], u64) {
    let mut out = [0u64; 4];
    let mut borrow = 0u64;
    for i in 0..4 {
        let t = (a[i] as u128).wrapping_sub((b[i] as u128) + (borrow as u128));
        out[i] = t as u64;
        borrow = ((t >> 64) as u64) & 1;
    }
    (out, borrow)
}

fn select(a: &[u64; 4], b: &[u64; 4], choice: Choice) -> [u64; 4] {
    [
        u64::conditional_select(&a[0], &b[0], choice),
        u64::conditional_select(&a[1], &b[1], choice),
        u64::conditional_select(&a[2], &b[2], choice),
        u64::conditional_select(&a[3], &b[3], choice),
    ]
}

fn mul_wide(a: &[u64; 4], b: &[u64; 4]) -> [u64; 8] {
    let mut out = [0u64; 8];
    for i in 0..4 {
        let mut carry = 0u64;
        for j in 0..4 {
            let t = (out[i + j] as u128) + (a[i] as u128) * (b[j] as u128) + (carry as u128);
            out[i + j] = t as u64;
            carry = (t >> 64) as u64;
        }
        out[i + 4] = carry;
    }
    out
}

/// Reduces an eight-limb value modulo p by folding the high half twice.
fn reduce(wide: &[u64; 8]) -> [u64; 4] {
    // hi * 2^256 = hi * (2^32 + 977) (mod p); hi * FOLD spans five limbs.
    let mut folded = [0u64; 4];
    let mut carry = 0u64;
    for i in 0..4 {
        let t = (wide[4 + i] as u128) * (FOLD as u128) + (carry as u128);
        folded[i] = t as u64;
        carry = (t >> 64) as u64;
    }
    let mut top = carry;

    let lo: [u64; 4] = [wide[0], wide[1], wide[2], wide[3]];
    let (mut acc, carry) = add_words(&lo, &folded);
    top += carry;

    // Second fold: top < 2^34, so top * FOLD fits two limbs.
    let t = (top as u128) * (FOLD as u128);
    let second = [t as u64, (t >> 64) as u64, 0, 0];
    let (acc2, carry) = add_words(&acc, &second);
    acc = acc2;

    // A final carry can only leave a tiny residue; fold it once more
    // (carry is 0 or 1 and the accumulator is far below p afterwards).
    let third = [carry * FOLD, 0, 0, 0];
    let (acc3, carry) = add_words(&acc, &third);
    debug_assert_eq!(carry, 0);

    let (diff, borrow) = sub_words(&acc3, &MODULUS);
    select(&acc3, &diff, Choice::from((borrow ^ 1) as u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;
    use num_traits::One;
    use proptest::prelude::*;

    fn modulus() -> BigUint {
        (BigUint::one() << 256u32) - (BigUint::one() << 32u32) - BigUint::from(977u32)
    }

    fn to_big(fe: &FieldElement) -> BigUint {
        BigUint::from_bytes_be(&fe.to_bytes())
    }

    fn from_big(v: &BigUint) -> FieldElement {
        let bytes = v.to_bytes_be();
        let mut padded = [0u8; 32];
        padded[32 - bytes.len()..].copy_from_slice(&bytes);
        FieldElement::from_bytes(&padded).expect("in range")
    }

    #[test]
    fn encoding_round_trip() {
        let x = FieldElement::from_words([0x1234, 0, 0xffff_ffff, 1]);
        assert_eq!(FieldElement::from_bytes(&x.to_bytes()).expect("canonical"), x);
    }

    #[test]
    fn from_bytes_rejects_modulus() {
        let p = from_big(&(modulus() - BigUint::one())).to_bytes();
        assert!(bool::from(FieldElement::from_bytes(&p).is_some()));
        assert!(bool::from(FieldElement::from_bytes(&[0xff; 32]).is_none()));
        let mut exact = [0xffu8; 32];
        exact[27] = 0xfe;
        exact[30] = 0xfc;
        exact[31] = 0x2f;
        // p itself must be rejected.
        assert!(bool::from(FieldElement::from_bytes(&exact).is_none()));
    }

    #[test]
    fn invert_one() {
        assert_eq!(
            FieldElement::ONE.invert().expect("nonzero"),
            FieldElement::ONE
        );
        assert!(bool::from(FieldElement::ZERO.invert().is_none()));
    }

    #[test]
    fn sqrt_of_four() {
        let two = FieldElement::ONE.double();
        let four = two.square();
        let root = four.sqrt().expect("square");
        assert!(root == two || root == two.negate());
    }

    #[test]
    fn seven_is_a_nonresidue_times_y2() {
        // x = 0 is not on the curve: 7 has no square root mod p.
        assert!(bool::from(FieldElement::B.sqrt().is_none()));
    }

    prop_compose! {
        fn fe()(bytes in any::<[u8; 32]>()) -> BigUint {
            BigUint::from_bytes_be(&bytes) % modulus()
        }
    }

    proptest! {
        #[test]
        fn mul_matches_reference(a in fe(), b in fe()) {
            let got = to_big(&from_big(&a).mul(&from_big(&b)));
            prop_assert_eq!(got, (&a * &b) % modulus());
        }

        #[test]
        fn add_sub_match_reference(a in fe(), b in fe()) {
            let m = modulus();
            prop_assert_eq!(to_big(&from_big(&a).add(&from_big(&b))), (&a + &b) % &m);
            prop_assert_eq!(to_big(&from_big(&a).sub(&from_big(&b))), ((&m + &a) - &b) % &m);
        }

        #[test]
        fn negate_matches_reference(a in fe()) {
            let m = modulus();
            prop_assert_eq!(to_big(&from_big(&a).negate()), (&m - &a) % &m);
        }

        #[test]
        fn invert_matches_reference(a in fe()) {
            if a == BigUint::default() {
                prop_assert!(bool::from(from_big(&a).invert().is_none()));
            } else {
                let inv = from_big(&a).invert().expect("nonzero");
                prop_assert!((to_big(&inv) * &a % modulus()).is_one());
            }
        }

        #[test]
        fn sqrt_round_trip(a in fe()) {
            let square = from_big(&a).square();
            let root = square.sqrt().expect("constructed square");
            prop_assert_eq!(root.square(), square);
        }

        #[test]
        fn mul_small_matches_mul(a in fe(), k in any::<u64>()) {
            let got = from_big(&a).mul_small(k);
            let expected = (&a * BigUint::from(k)) % modulus();
            prop_assert_eq!(to_big(&got), expected);
        }
    }
}
