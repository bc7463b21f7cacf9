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

use std::ops::{Deref, DerefMut};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

/// A 3-dimensional vector with operations for linear algebra.
#[derive(Copy, Clone, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct V3<X=f64>(pub [X; 3]);

// The vector behaves generally like its backing array type.

impl<X> Deref for V3<X> {
    type Target = [X; 3];

    #[inline(always)]
    fn deref(&self) -> &Self::Target
    { &self.0 }
}

impl<X> DerefMut for V3<X> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut Self::Target
    { &mut self.0 }
}

impl<'a, X> IntoIterator for &'a V3<X> {
    type Item = &'a X;
    type IntoIter = std::slice::Iter<'a, X>;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter
    { self.0.iter() }
}

impl<'a, X> IntoIterator for &'a mut V3<X> {
    type Item = &'a mut X;
    type IntoIter = std::slice::IterMut<'a, X>;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter
    { self.0.iter_mut() }
}

impl<X> From<[X; 3]> for V3<X> {
    #[inline(always)]
    fn from(arr: [X; 3]) -> Self { V3(arr) }
}

// forward the debug impl without a surrounding "V3(...)", so that debug output
// of vectors and lists of vectors is valid JSON and Python.
impl<X: fmt::Debug> fmt::Debug for V3<X> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    { fmt::Debug::fmt(&self.0, f) }
}

// Display and LowerExp apply the format to each element, giving e.g. `[1.0000, 0.3333, 0.0000]`.
macro_rules! impl_elementwise_fmt {
    ($($Format:ident)*) => {$(
        impl<X: fmt::$Format> fmt::$Format for V3<X> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "[")?;
                fmt::$Format::fmt(&self[0], f)?;
                for x in &self[1..] {
                    write!(f, ", ")?;
                    fmt::$Format::fmt(x, f)?;
                }
                write!(f, "]")
            }
        }
    )*};
}

impl_elementwise_fmt!{ Display LowerExp UpperExp }
