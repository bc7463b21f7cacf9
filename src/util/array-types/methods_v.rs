/* ************************************************************************ **
** This file is part of rsp2, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
**                                                                          **
** Be aware that not all of rsp2 is provided under this permissive license, **
** and that the project as a whole is licensed under the GPL 3.0.           **
** ************************************************************************ */

use std::ops::{Add, Sub, Mul};

use num_traits::{Zero, Float};

use crate::V3;

impl<X> V3<X> {
    /// Get a zero vector.
    #[inline(always)]
    pub fn zero() -> Self
    where X: Zero,
    { V3([X::zero(), X::zero(), X::zero()]) }

    /// Construct a vector from a function on indices.
    #[inline(always)]
    pub fn from_fn<F>(mut f: F) -> Self
    where F: FnMut(usize) -> X,
    { V3([f(0), f(1), f(2)]) }

    /// Get the inner product of two vectors.
    ///
    /// It is recommended you write this as `V3::dot(a, b)`, rather than `a.dot(b)`.
    #[inline(always)]
    pub fn dot(&self, other: &Self) -> X
    where X: Copy + Add<Output=X> + Mul<Output=X>,
    { self[0] * other[0] + self[1] * other[1] + self[2] * other[2] }

    /// Get the vector's squared magnitude.
    #[inline(always)]
    pub fn sqnorm(&self) -> X
    where X: Copy + Add<Output=X> + Mul<Output=X>,
    { self.dot(self) }

    /// Get the vector's magnitude.
    #[inline(always)]
    pub fn norm(&self) -> X
    where X: Float,
    { self.sqnorm().sqrt() }

    /// Normalize the vector.
    #[inline(always)]
    pub fn unit(&self) -> Self
    where X: Float,
    { *self / self.norm() }

    /// Cross-product.
    #[inline]
    pub fn cross(&self, other: &Self) -> Self
    where X: Copy + Sub<Output=X> + Mul<Output=X>,
    {
        V3([
            self[1] * other[2] - self[2] * other[1],
            self[2] * other[0] - self[0] * other[2],
            self[0] * other[1] - self[1] * other[0],
        ])
    }

    /// Get the shortest angle (as a value in `[0, pi]`) between this vector and another.
    #[inline(always)]
    pub fn angle_to(&self, other: &Self) -> X
    where X: Float,
    {
        let arg = self.dot(other) / X::sqrt(self.sqnorm() * other.sqnorm());
        X::acos(arg.min(X::one()).max(-X::one()))
    }
}

/// Inner product of vectors.
///
/// This is basically just `V3::dot` as a free function,
/// because everyone loves symmetry.
#[inline(always)]
pub fn dot<X>(a: &V3<X>, b: &V3<X>) -> X
where X: Copy + Add<Output=X> + Mul<Output=X>,
{ a.dot(b) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn products() {
        let x = V3([1.0, 0.0, 0.0]);
        let y = V3([0.0, 1.0, 0.0]);
        assert_eq!(x.cross(&y), V3([0.0, 0.0, 1.0]));
        assert_eq!(dot(&x, &y), 0.0);
        assert_eq!(V3([3.0, 4.0, 0.0]).norm(), 5.0);
        assert_eq!(V3([3.0, 4.0, 0.0]).sqnorm(), 25.0);
        assert_eq!(V3([0.0, 0.0, 2.0]).unit(), V3([0.0, 0.0, 1.0]));
    }

    #[test]
    fn angle_to_is_clamped() {
        let x = V3([1.0, 0.0, 0.0]);
        assert_eq!(x.angle_to(&(x * 3.0)), 0.0);
        assert_eq!(x.angle_to(&-x), std::f64::consts::PI);
    }

    #[test]
    fn constructors() {
        assert_eq!(V3::from_fn(|i| i as f64), V3([0.0, 1.0, 2.0]));
        assert_eq!(V3::<f64>::zero(), V3([0.0; 3]));
    }
}
