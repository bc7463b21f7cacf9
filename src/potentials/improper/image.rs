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

//! Boundary correction of bond vectors.

use rsp2_array_types::V3;

/// Maps a raw displacement between two sites onto the shortest equivalent vector.
///
/// Implementations are shared by every worker thread, hence `Sync`.
pub trait MinimumImage: Sync {
    fn minimum_image(&self, delta: V3) -> V3;
}

/// No periodicity; vectors are used as they are.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct NoImage;

impl MinimumImage for NoImage {
    #[inline(always)]
    fn minimum_image(&self, delta: V3) -> V3 { delta }
}

/// An orthogonal box, optionally periodic along each axis.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrthoBox {
    pub lengths: V3,
    pub periodic: [bool; 3],
}

impl OrthoBox {
    pub fn periodic(lengths: V3) -> Self {
        OrthoBox { lengths, periodic: [true; 3] }
    }
}

impl MinimumImage for OrthoBox {
    // A single shift is applied per axis, so displacements are assumed to be less than
    // one and a half box lengths long.
    #[inline]
    fn minimum_image(&self, delta: V3) -> V3 {
        let mut out = delta;
        for k in 0..3 {
            if !self.periodic[k] {
                continue;
            }
            let length = self.lengths[k];
            if out[k].abs() > 0.5 * length {
                match out[k] < 0.0 {
                    true => out[k] += length,
                    false => out[k] -= length,
                }
            }
        }
        out
    }
}

impl<F> MinimumImage for F
where F: Fn(V3) -> V3 + Sync,
{
    #[inline(always)]
    fn minimum_image(&self, delta: V3) -> V3 { self(delta) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ortho_box() {
        let cell = OrthoBox {
            lengths: V3([10.0, 10.0, 4.0]),
            periodic: [true, true, false],
        };
        let image = cell.minimum_image(V3([9.0, -6.0, 3.0]));
        assert_close!(abs=1e-12, image.0, [-1.0, 4.0, 3.0]);

        // exactly half a box length is left alone
        let image = cell.minimum_image(V3([5.0, -5.0, 0.0]));
        assert_close!(abs=1e-12, image.0, [5.0, -5.0, 0.0]);
    }

    #[test]
    fn closures_are_images() {
        let double = |v: V3| v * 2.0;
        assert_eq!(double.minimum_image(V3([1.0, 2.0, 3.0])), V3([2.0, 4.0, 6.0]));
        assert_eq!(NoImage.minimum_image(V3([1.0, 2.0, 3.0])), V3([1.0, 2.0, 3.0]));
    }
}
