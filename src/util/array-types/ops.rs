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

use std::ops::{Add, Sub, Mul, Div, Neg};
use std::ops::{AddAssign, SubAssign, MulAssign, DivAssign};

use crate::V3;

// NOTE: Operator impls are deliberately between same-typed vectors,
//       rather than e.g. V3<T> and V3<U> where T: Add<U>.

// ---------------------------------------------------------------------------
// vector-vector ops

macro_rules! impl_v_add_sub {
    ($([$($lt_a:lifetime)?; $($ref_a:tt)*] [$($lt_b:lifetime)?; $($ref_b:tt)*])*) => {$(
        // vector + vector
        impl<$($lt_a,)? $($lt_b,)? X> Add<$($ref_b)* V3<X>> for $($ref_a)* V3<X>
        where X: Copy + Add<Output=X>,
        {
            type Output = V3<X>;

            #[inline]
            fn add(self, other: $($ref_b)* V3<X>) -> Self::Output
            { V3([self[0] + other[0], self[1] + other[1], self[2] + other[2]]) }
        }

        // vector - vector
        impl<$($lt_a,)? $($lt_b,)? X> Sub<$($ref_b)* V3<X>> for $($ref_a)* V3<X>
        where X: Copy + Sub<Output=X>,
        {
            type Output = V3<X>;

            #[inline]
            fn sub(self, other: $($ref_b)* V3<X>) -> Self::Output
            { V3([self[0] - other[0], self[1] - other[1], self[2] - other[2]]) }
        }
    )*};
}

impl_v_add_sub!{
    [   ;     ] [   ;     ]
    ['a ; &'a ] [   ;     ]
    [   ;     ] ['b ; &'b ]
    ['a ; &'a ] ['b ; &'b ]
}

// ---------------------------------------------------------------------------
// vector unary ops and vector-scalar ops

macro_rules! impl_v_unops_and_scalar_ops {
    ($([$($lt_a:lifetime)?; $($ref_a:tt)*])*) => {$(
        // -vector
        impl<$($lt_a,)? X> Neg for $($ref_a)* V3<X>
        where X: Copy + Neg<Output=X>,
        {
            type Output = V3<X>;

            #[inline]
            fn neg(self) -> Self::Output
            { V3([-self[0], -self[1], -self[2]]) }
        }

        // vector * scalar
        impl<$($lt_a,)? X> Mul<X> for $($ref_a)* V3<X>
        where X: Copy + Mul<Output=X>,
        {
            type Output = V3<X>;

            #[inline]
            fn mul(self, scalar: X) -> Self::Output
            { V3([self[0] * scalar, self[1] * scalar, self[2] * scalar]) }
        }

        // vector / scalar
        impl<$($lt_a,)? X> Div<X> for $($ref_a)* V3<X>
        where X: Copy + Div<Output=X>,
        {
            type Output = V3<X>;

            #[inline]
            fn div(self, scalar: X) -> Self::Output
            { V3([self[0] / scalar, self[1] / scalar, self[2] / scalar]) }
        }

        // scalar * vector
        //
        // NOTE: the orphan rules prevent us from impl-ing this "for X", so it is
        //       only provided for the scalar type that we actually use.
        impl<$($lt_a)?> Mul<$($ref_a)* V3<f64>> for f64 {
            type Output = V3<f64>;

            #[inline(always)]
            fn mul(self, vector: $($ref_a)* V3<f64>) -> Self::Output
            { vector * self }
        }
    )*};
}

impl_v_unops_and_scalar_ops!{
    [   ;     ]
    ['a ; &'a ]
}

// ---------------------------------------------------------------------------
// assign ops

// vector += vector;
impl<X, B> AddAssign<B> for V3<X> where for<'a> &'a Self: Add<B, Output=Self> {
    #[inline(always)]
    fn add_assign(&mut self, rhs: B)
    { *self = &*self + rhs; }
}

// vector -= vector;
impl<X, B> SubAssign<B> for V3<X> where for<'a> &'a Self: Sub<B, Output=Self> {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: B)
    { *self = &*self - rhs; }
}

// vector *= scalar;
impl<X, B> MulAssign<B> for V3<X> where for<'a> &'a Self: Mul<B, Output=Self> {
    #[inline(always)]
    fn mul_assign(&mut self, rhs: B)
    { *self = &*self * rhs; }
}

// vector /= scalar;
impl<X, B> DivAssign<B> for V3<X> where for<'a> &'a Self: Div<B, Output=Self> {
    #[inline(always)]
    fn div_assign(&mut self, rhs: B)
    { *self = &*self / rhs; }
}
