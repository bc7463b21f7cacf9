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

use super::MinimumImage;

use rsp2_array_types::V3;

/// The three bond vectors of a four-body term.
///
/// ```text
///   b1 = x1 - x2
///   b2 = x3 - x2
///   b3 = x4 - x3
/// ```
///
/// Each has been passed through the boundary correction.  Zero-length bonds are not
/// treated specially; they produce infinite inverse lengths which propagate downstream.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BondGeometry {
    pub b1: V3,
    pub b2: V3,
    pub b3: V3,
    /// `1 / |b_k|^2`, in order of the bonds.
    pub inv_sqnorm: [f64; 3],
    /// `1 / |b_k|`, in order of the bonds.
    pub inv_norm: [f64; 3],
}

impl BondGeometry {
    pub fn compute(
        positions: &[V3],
        [i1, i2, i3, i4]: [usize; 4],
        image: &impl MinimumImage,
    ) -> Self {
        let b1 = image.minimum_image(positions[i1] - positions[i2]);
        let b2 = image.minimum_image(positions[i3] - positions[i2]);
        let b3 = image.minimum_image(positions[i4] - positions[i3]);
        BondGeometry::from_bonds(b1, b2, b3)
    }

    #[inline]
    pub fn from_bonds(b1: V3, b2: V3, b3: V3) -> Self {
        let inv_sqnorm = [
            1.0 / b1.sqnorm(),
            1.0 / b2.sqnorm(),
            1.0 / b3.sqnorm(),
        ];
        let inv_norm = [
            inv_sqnorm[0].sqrt(),
            inv_sqnorm[1].sqrt(),
            inv_sqnorm[2].sqrt(),
        ];
        BondGeometry { b1, b2, b3, inv_sqnorm, inv_norm }
    }

    pub fn norms(&self) -> [f64; 3] {
        let [r1, r2, r3] = self.inv_norm;
        [r1.recip(), r2.recip(), r3.recip()]
    }
}
