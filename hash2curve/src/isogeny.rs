//! Rational isogeny evaluation (RFC 9380 appendix E).

use ctfield::FieldElement;
use subtle::ConditionallySelectable;

use crate::sswu::MappedPoint;

/// A rational map `(x, y) → (x_num(x)/x_den(x), y · y_num(x)/y_den(x))`
/// carrying an SSWU output from an isogenous curve to the target curve.
///
/// Coefficient vectors are in ascending degree order. A vanishing
/// denominator maps to the point at infinity.
#[derive(Debug)]
pub struct Isogeny {
    x_num: Vec<FieldElement>,
    x_den: Vec<FieldElement>,
    y_num: Vec<FieldElement>,
    y_den: Vec<FieldElement>,
}

impl Isogeny {
    /// Builds the map from its coefficient tables.
    pub fn new(
        x_num: Vec<FieldElement>,
        x_den: Vec<FieldElement>,
        y_num: Vec<FieldElement>,
        y_den: Vec<FieldElement>,
    ) -> Self {
        Self {
            x_num,
            x_den,
            y_num,
            y_den,
        }
    }

    /// Evaluates the map at an affine point.
    pub fn map(&self, x: &FieldElement, y: &FieldElement) -> MappedPoint {
        let field = x.params();
        let x_num = horner(&self.x_num, x);
        let x_den = horner(&self.x_den, x);
        let y_num = horner(&self.y_num, x);
        let y_den = horner(&self.y_den, x);

        let is_identity = x_den.is_zero() | y_den.is_zero();
        let out_x = x_num.mul(&x_den.invert().unwrap_or(field.zero()));
        let out_y = y.mul(&y_num).mul(&y_den.invert().unwrap_or(field.zero()));

        MappedPoint {
            x: FieldElement::conditional_select(&out_x, &field.zero(), is_identity),
            y: FieldElement::conditional_select(&out_y, &field.zero(), is_identity),
            is_identity,
        }
    }
}

fn horner(coefficients: &[FieldElement], x: &FieldElement) -> FieldElement {
    let mut iter = coefficients.iter().rev();
    let mut acc = *iter.next().expect("coefficient tables are never empty");
    for coefficient in iter {
        acc = acc.mul(x).add(coefficient);
    }
    acc
}
