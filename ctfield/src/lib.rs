//! Constant-time prime-field arithmetic with runtime moduli.
//!
//! A [`FieldParams`] describes one odd prime field: the modulus, the derived
//! Montgomery constants, and the square-root strategy selected by the residue
//! of the modulus mod 8. Parameters are built once (typically inside a
//! `once_cell::sync::Lazy`) and handed out as `&'static` references;
//! [`FieldElement`]s carry that reference so values from different fields can
//! never be mixed silently.
//!
//! All value-dependent control flow is eliminated: comparisons go through
//! [`subtle`], selections are limb-wise masks, and exponentiations scan a
//! fixed number of bits. Loop bounds depend only on the (public) limb count
//! of the field.

#![forbid(unsafe_code)]
#![warn(
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unused_qualifications
)]

mod arith;

use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};
use zeroize::Zeroize;

use crate::arith::{adc, mac, mont_neg_inv, sbb};

/// Widest supported modulus: 9 limbs of 64 bits (covers P-521).
pub const MAX_LIMBS: usize = 9;

type Limbs = [u64; MAX_LIMBS];

/// Square-root strategy, fixed by the modulus residue mod 8.
#[derive(Clone, Copy, Debug)]
enum SqrtStrategy {
    /// m = 3 (mod 4): candidate is a^((m+1)/4).
    ThreeMod4 { exp: Limbs },
    /// m = 5 (mod 8): candidate is a^((m+3)/8), fixed up by sqrt(-1).
    FiveMod8 { exp: Limbs, sqrt_m1: Limbs },
    /// m = 1 (mod 8): no exponentiation shortcut. Scalar fields (group
    /// orders) land here and never take square roots.
    Unsupported,
}

/// Parameters of one odd prime field.
#[derive(Clone, Debug)]
pub struct FieldParams {
    limbs: usize,
    byte_length: usize,
    modulus: Limbs,
    /// R^2 mod m, for conversion into Montgomery form.
    r2: Limbs,
    /// R mod m, the Montgomery representation of 1.
    one: Limbs,
    /// -m^-1 mod 2^64.
    n0: u64,
    /// (m - 1) / 2, the Legendre exponent.
    legendre: Limbs,
    sqrt: SqrtStrategy,
}

impl FieldParams {
    /// Builds the parameters for the field of the given big-endian prime
    /// modulus. The canonical encoding length of the field is the length of
    /// the input slice.
    ///
    /// # Panics
    ///
    /// If the modulus is even, zero, one, or wider than [`MAX_LIMBS`] limbs.
    /// Parameters describe compile-time-known curve constants, so a bad
    /// modulus is a programming error rather than a runtime condition.
    pub fn new(modulus_be: &[u8]) -> Self {
        let byte_length = modulus_be.len();
        assert!(
            byte_length > 0 && byte_length <= MAX_LIMBS * 8,
            "modulus width out of range"
        );
        let modulus = parse_be(modulus_be);
        assert!(modulus[0] & 1 == 1, "modulus must be odd");
        let limbs = ((byte_length + 7) / 8).max(1);
        assert!(!is_one(&modulus), "modulus must be a prime > 1");

        let n0 = mont_neg_inv(modulus[0]);

        // R mod m by 64*limbs modular doublings of 1, then R^2 by as many
        // more. Runs once per field; no Montgomery machinery needed yet.
        let mut one = [0u64; MAX_LIMBS];
        one[0] = 1;
        let mut r = reduce_once(&one, &modulus, limbs);
        for _ in 0..64 * limbs {
            r = add_mod(&r, &r, &modulus, limbs);
        }
        let mut r2 = r;
        for _ in 0..64 * limbs {
            r2 = add_mod(&r2, &r2, &modulus, limbs);
        }

        // m - 1 (clears bit 0 of an odd modulus), then (m - 1) / 2.
        let mut m_minus_1 = modulus;
        m_minus_1[0] &= !1;
        let legendre = shr1(&m_minus_1);

        let sqrt = match modulus[0] & 7 {
            3 | 7 => {
                // (m + 1) / 4 computed as (m - 3) / 4 + 1 to avoid overflow.
                let mut t = modulus;
                t[0] -= 3;
                let mut exp = shr1(&shr1(&t));
                exp = add_u64(&exp, 1);
                SqrtStrategy::ThreeMod4 { exp }
            }
            5 => {
                // (m + 3) / 8 as (m - 5) / 8 + 1.
                let mut t = modulus;
                t[0] -= 5;
                let mut exp = shr1(&shr1(&shr1(&t)));
                exp = add_u64(&exp, 1);
                let mut params = Self {
                    limbs,
                    byte_length,
                    modulus,
                    r2,
                    one: r,
                    n0,
                    legendre,
                    sqrt: SqrtStrategy::ThreeMod4 { exp },
                };
                // 2^((m-1)/4) is a primitive fourth root of unity when
                // m = 5 (mod 8); either root serves as the fix-up constant.
                let quarter = shr1(&legendre);
                let two = params.mont_from_u64(2);
                let sqrt_m1 = params.mont_pow(&two, &quarter);
                params.sqrt = SqrtStrategy::FiveMod8 { exp, sqrt_m1 };
                return params;
            }
            _ => SqrtStrategy::Unsupported,
        };

        Self {
            limbs,
            byte_length,
            modulus,
            r2,
            one: r,
            n0,
            legendre,
            sqrt,
        }
    }

    /// Canonical encoded length of a field element, in bytes.
    pub fn byte_length(&self) -> usize {
        self.byte_length
    }

    /// The additive identity.
    pub fn zero(&'static self) -> FieldElement {
        FieldElement {
            limbs: [0u64; MAX_LIMBS],
            params: self,
        }
    }

    /// The multiplicative identity.
    pub fn one(&'static self) -> FieldElement {
        FieldElement {
            limbs: self.one,
            params: self,
        }
    }

    /// Lifts a small integer into the field.
    pub fn from_u64(&'static self, value: u64) -> FieldElement {
        FieldElement {
            limbs: self.mont_from_u64(value),
            params: self,
        }
    }

    /// Decodes a canonical fixed-length big-endian encoding. Rejects inputs
    /// of the wrong length and values not strictly below the modulus.
    pub fn decode(&'static self, bytes: &[u8]) -> CtOption<FieldElement> {
        if bytes.len() != self.byte_length {
            return CtOption::new(self.zero(), Choice::from(0u8));
        }
        let raw = parse_be(bytes);
        let in_range = lt(&raw, &self.modulus, self.limbs);
        let limbs = self.mont_mul(&raw, &self.r2);
        CtOption::new(
            FieldElement {
                limbs,
                params: self,
            },
            in_range,
        )
    }

    /// Reduces an arbitrary-length big-endian integer into the field.
    ///
    /// This is the wide reduction behind `hash_to_field`: the input is folded
    /// in Horner fashion, one byte per step, so the work depends only on the
    /// (public) input length.
    pub fn reduce_be_bytes(&'static self, bytes: &[u8]) -> FieldElement {
        let radix = self.mont_from_u64(256);
        let mut acc = [0u64; MAX_LIMBS];
        for byte in bytes {
            acc = self.mont_mul(&acc, &radix);
            let b = self.mont_from_u64(u64::from(*byte));
            acc = add_mod(&acc, &b, &self.modulus, self.limbs);
        }
        FieldElement {
            limbs: acc,
            params: self,
        }
    }

    fn mont_from_u64(&self, value: u64) -> Limbs {
        let mut raw = [0u64; MAX_LIMBS];
        raw[0] = value;
        let raw = reduce_once(&raw, &self.modulus, self.limbs);
        self.mont_mul(&raw, &self.r2)
    }

    /// CIOS Montgomery multiplication; inputs and output are reduced.
    fn mont_mul(&self, a: &Limbs, b: &Limbs) -> Limbs {
        let n = self.limbs;
        let m = &self.modulus;
        let mut t = [0u64; MAX_LIMBS + 2];

        for i in 0..n {
            let mut carry = 0;
            for j in 0..n {
                let (lo, hi) = mac(t[j], a[j], b[i], carry);
                t[j] = lo;
                carry = hi;
            }
            let (lo, hi) = adc(t[n], carry, 0);
            t[n] = lo;
            t[n + 1] = hi;

            let mfac = t[0].wrapping_mul(self.n0);
            let (_, mut carry) = mac(t[0], mfac, m[0], 0);
            for j in 1..n {
                let (lo, hi) = mac(t[j], mfac, m[j], carry);
                t[j - 1] = lo;
                carry = hi;
            }
            let (lo, hi) = adc(t[n], carry, 0);
            t[n - 1] = lo;
            t[n] = t[n + 1] + hi;
            t[n + 1] = 0;
        }

        // Result is below 2m; one conditional subtraction normalizes it.
        let mut out = [0u64; MAX_LIMBS];
        out[..n].copy_from_slice(&t[..n]);
        let mut diff = [0u64; MAX_LIMBS];
        let mut borrow = 0;
        for i in 0..n {
            let (lo, b) = sbb(out[i], m[i], borrow);
            diff[i] = lo;
            borrow = b;
        }
        let (_, borrow) = sbb(t[n], 0, borrow);
        // borrow == 0 means t >= m (including the carry word): take the diff.
        let take_diff = Choice::from((borrow ^ 1) as u8);
        select(&out, &diff, take_diff)
    }

    fn mont_square(&self, a: &Limbs) -> Limbs {
        self.mont_mul(a, a)
    }

    /// Fixed-length left-to-right exponentiation with a constant-time
    /// multiply-or-keep selection per bit.
    fn mont_pow(&self, base: &Limbs, exp: &Limbs) -> Limbs {
        let mut acc = self.one;
        for i in (0..self.limbs * 64).rev() {
            acc = self.mont_square(&acc);
            let with_base = self.mont_mul(&acc, base);
            let bit = Choice::from(((exp[i / 64] >> (i % 64)) & 1) as u8);
            acc = select(&acc, &with_base, bit);
        }
        acc
    }
}

/// An element of a prime field, in Montgomery form, bound to its field.
#[derive(Clone, Copy)]
pub struct FieldElement {
    limbs: Limbs,
    params: &'static FieldParams,
}

impl FieldElement {
    /// The parameters of the field this element belongs to.
    pub fn params(&self) -> &'static FieldParams {
        self.params
    }

    /// Canonical fixed-length big-endian encoding.
    pub fn encode(&self) -> Vec<u8> {
        let canonical = self.canonical();
        let mut wide = [0u8; MAX_LIMBS * 8];
        for (i, limb) in canonical.iter().enumerate() {
            let start = wide.len() - 8 * (i + 1);
            wide[start..start + 8].copy_from_slice(&limb.to_be_bytes());
        }
        wide[wide.len() - self.params.byte_length..].to_vec()
    }

    /// self + rhs.
    pub fn add(&self, rhs: &Self) -> Self {
        debug_assert!(core::ptr::eq(self.params, rhs.params));
        Self {
            limbs: add_mod(
                &self.limbs,
                &rhs.limbs,
                &self.params.modulus,
                self.params.limbs,
            ),
            params: self.params,
        }
    }

    /// self - rhs.
    pub fn sub(&self, rhs: &Self) -> Self {
        debug_assert!(core::ptr::eq(self.params, rhs.params));
        Self {
            limbs: sub_mod(
                &self.limbs,
                &rhs.limbs,
                &self.params.modulus,
                self.params.limbs,
            ),
            params: self.params,
        }
    }

    /// 2 * self.
    pub fn double(&self) -> Self {
        self.add(self)
    }

    /// self * rhs.
    pub fn mul(&self, rhs: &Self) -> Self {
        debug_assert!(core::ptr::eq(self.params, rhs.params));
        Self {
            limbs: self.params.mont_mul(&self.limbs, &rhs.limbs),
            params: self.params,
        }
    }

    /// self^2.
    pub fn square(&self) -> Self {
        Self {
            limbs: self.params.mont_square(&self.limbs),
            params: self.params,
        }
    }

    /// Additive inverse.
    pub fn negate(&self) -> Self {
        let n = self.params.limbs;
        let mut diff = [0u64; MAX_LIMBS];
        let mut borrow = 0;
        for i in 0..n {
            let (lo, b) = sbb(self.params.modulus[i], self.limbs[i], borrow);
            diff[i] = lo;
            borrow = b;
        }
        debug_assert_eq!(borrow, 0);
        let limbs = select(&diff, &[0u64; MAX_LIMBS], self.is_zero());
        Self {
            limbs,
            params: self.params,
        }
    }

    /// Raises self to an exponent given as little-endian limbs. The scan
    /// length is fixed by the field width, not by the exponent value.
    pub fn pow(&self, exp: &[u64; MAX_LIMBS]) -> Self {
        Self {
            limbs: self.params.mont_pow(&self.limbs, exp),
            params: self.params,
        }
    }

    /// Raises self to a big-endian byte exponent.
    ///
    /// The scan length is the field width; exponents wider than the field
    /// are a programming error.
    pub fn pow_be_bytes(&self, exp: &[u8]) -> Self {
        assert!(exp.len() <= self.params.limbs * 8, "exponent too wide");
        self.pow(&parse_be(exp))
    }

    /// Multiplicative inverse via Fermat; `None` for zero.
    pub fn invert(&self) -> CtOption<Self> {
        let mut exp = self.params.modulus;
        let mut borrow = 2u64;
        for limb in exp.iter_mut().take(self.params.limbs) {
            let (lo, b) = sbb(*limb, borrow, 0);
            *limb = lo;
            borrow = b;
        }
        debug_assert_eq!(borrow, 0);
        let result = self.pow(&exp);
        CtOption::new(result, !self.is_zero())
    }

    /// Square root, when one exists.
    ///
    /// # Panics
    ///
    /// For fields whose modulus is 1 (mod 8); none of the base fields used
    /// by the curve maps fall in that class.
    pub fn sqrt(&self) -> CtOption<Self> {
        let candidate = match self.params.sqrt {
            SqrtStrategy::ThreeMod4 { exp } => self.pow(&exp),
            SqrtStrategy::FiveMod8 { exp, sqrt_m1 } => {
                let c = self.pow(&exp);
                let fixed = Self {
                    limbs: self.params.mont_mul(&c.limbs, &sqrt_m1),
                    params: self.params,
                };
                Self::conditional_select(&c, &fixed, !c.square().ct_eq(self))
            }
            SqrtStrategy::Unsupported => {
                panic!("no square-root shortcut for a modulus = 1 (mod 8)")
            }
        };
        CtOption::new(candidate, candidate.square().ct_eq(self))
    }

    /// Euler criterion: 1 for squares (including zero), 0 otherwise.
    pub fn is_square(&self) -> Choice {
        let legendre = self.pow(&self.params.legendre);
        legendre.is_zero() | legendre.ct_eq(&self.params.one())
    }

    /// Whether this is the additive identity.
    pub fn is_zero(&self) -> Choice {
        let mut acc = 0u64;
        for limb in &self.limbs {
            acc |= limb;
        }
        Choice::from((acc == 0) as u8)
    }

    /// Parity of the canonical representative, the RFC 9380 `sgn0`.
    pub fn sgn0(&self) -> Choice {
        Choice::from((self.canonical()[0] & 1) as u8)
    }

    /// Negates in place when `choice` is set.
    pub fn conditional_negate(&mut self, choice: Choice) {
        let negated = self.negate();
        *self = Self::conditional_select(self, &negated, choice);
    }

    fn canonical(&self) -> Limbs {
        // Montgomery reduction by multiplying with 1.
        let mut one_raw = [0u64; MAX_LIMBS];
        one_raw[0] = 1;
        self.params.mont_mul(&self.limbs, &one_raw)
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement(0x{})", hex::encode(self.encode()))
    }
}

impl ConstantTimeEq for FieldElement {
    fn ct_eq(&self, other: &Self) -> Choice {
        let mut acc = Choice::from(1u8);
        for i in 0..MAX_LIMBS {
            acc &= self.limbs[i].ct_eq(&other.limbs[i]);
        }
        acc
    }
}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        debug_assert!(core::ptr::eq(a.params, b.params));
        Self {
            limbs: select(&a.limbs, &b.limbs, choice),
            params: a.params,
        }
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for FieldElement {}

impl Zeroize for FieldElement {
    fn zeroize(&mut self) {
        self.limbs.zeroize();
    }
}

impl Add<&FieldElement> for &FieldElement {
    type Output = FieldElement;
    fn add(self, rhs: &FieldElement) -> FieldElement {
        FieldElement::add(self, rhs)
    }
}

impl Add for FieldElement {
    type Output = FieldElement;
    fn add(self, rhs: FieldElement) -> FieldElement {
        FieldElement::add(&self, &rhs)
    }
}

impl Sub<&FieldElement> for &FieldElement {
    type Output = FieldElement;
    fn sub(self, rhs: &FieldElement) -> FieldElement {
        FieldElement::sub(self, rhs)
    }
}

impl Sub for FieldElement {
    type Output = FieldElement;
    fn sub(self, rhs: FieldElement) -> FieldElement {
        FieldElement::sub(&self, &rhs)
    }
}

impl Mul<&FieldElement> for &FieldElement {
    type Output = FieldElement;
    fn mul(self, rhs: &FieldElement) -> FieldElement {
        FieldElement::mul(self, rhs)
    }
}

impl Mul for FieldElement {
    type Output = FieldElement;
    fn mul(self, rhs: FieldElement) -> FieldElement {
        FieldElement::mul(&self, &rhs)
    }
}

impl Neg for &FieldElement {
    type Output = FieldElement;
    fn neg(self) -> FieldElement {
        self.negate()
    }
}

impl Neg for FieldElement {
    type Output = FieldElement;
    fn neg(self) -> FieldElement {
        self.negate()
    }
}

// ---------------------------------------------------------------------------
// limb vector helpers (length-parameterized, value-independent control flow)
// ---------------------------------------------------------------------------

fn parse_be(bytes: &[u8]) -> Limbs {
    let mut wide = [0u8; MAX_LIMBS * 8];
    wide[MAX_LIMBS * 8 - bytes.len()..].copy_from_slice(bytes);
    let mut limbs = [0u64; MAX_LIMBS];
    for (i, limb) in limbs.iter_mut().enumerate() {
        let start = wide.len() - 8 * (i + 1);
        let mut chunk = [0u8; 8];
        chunk.copy_from_slice(&wide[start..start + 8]);
        *limb = u64::from_be_bytes(chunk);
    }
    limbs
}

fn select(a: &Limbs, b: &Limbs, choice: Choice) -> Limbs {
    let mut out = [0u64; MAX_LIMBS];
    for i in 0..MAX_LIMBS {
        out[i] = u64::conditional_select(&a[i], &b[i], choice);
    }
    out
}

/// a < b over the first `n` limbs.
fn lt(a: &Limbs, b: &Limbs, n: usize) -> Choice {
    let mut borrow = 0;
    for i in 0..n {
        let (_, bo) = sbb(a[i], b[i], borrow);
        borrow = bo;
    }
    Choice::from(borrow as u8)
}

fn is_one(limbs: &Limbs) -> bool {
    limbs[0] == 1 && limbs[1..].iter().all(|l| *l == 0)
}

fn add_mod(a: &Limbs, b: &Limbs, m: &Limbs, n: usize) -> Limbs {
    let mut sum = [0u64; MAX_LIMBS];
    let mut carry = 0;
    for i in 0..n {
        let (lo, c) = adc(a[i], b[i], carry);
        sum[i] = lo;
        carry = c;
    }
    let mut diff = [0u64; MAX_LIMBS];
    let mut borrow = 0;
    for i in 0..n {
        let (lo, bo) = sbb(sum[i], m[i], borrow);
        diff[i] = lo;
        borrow = bo;
    }
    let (_, borrow) = sbb(carry, 0, borrow);
    let take_diff = Choice::from((borrow ^ 1) as u8);
    select(&sum, &diff, take_diff)
}

fn sub_mod(a: &Limbs, b: &Limbs, m: &Limbs, n: usize) -> Limbs {
    let mut diff = [0u64; MAX_LIMBS];
    let mut borrow = 0;
    for i in 0..n {
        let (lo, bo) = sbb(a[i], b[i], borrow);
        diff[i] = lo;
        borrow = bo;
    }
    let mut fixed = [0u64; MAX_LIMBS];
    let mut carry = 0;
    for i in 0..n {
        let (lo, c) = adc(diff[i], m[i], carry);
        fixed[i] = lo;
        carry = c;
    }
    select(&diff, &fixed, Choice::from(borrow as u8))
}

/// Reduces a value known to be below 2m into [0, m).
fn reduce_once(a: &Limbs, m: &Limbs, n: usize) -> Limbs {
    let mut diff = [0u64; MAX_LIMBS];
    let mut borrow = 0;
    for i in 0..n {
        let (lo, bo) = sbb(a[i], m[i], borrow);
        diff[i] = lo;
        borrow = bo;
    }
    select(&diff, a, Choice::from(borrow as u8))
}

fn shr1(a: &Limbs) -> Limbs {
    let mut out = [0u64; MAX_LIMBS];
    for i in 0..MAX_LIMBS {
        let high = if i + 1 < MAX_LIMBS { a[i + 1] } else { 0 };
        out[i] = (a[i] >> 1) | (high << 63);
    }
    out
}

fn add_u64(a: &Limbs, v: u64) -> Limbs {
    let mut out = *a;
    let mut carry = v;
    for limb in out.iter_mut() {
        let (lo, c) = adc(*limb, carry, 0);
        *limb = lo;
        carry = c;
        if carry == 0 {
            break;
        }
    }
    out
}
