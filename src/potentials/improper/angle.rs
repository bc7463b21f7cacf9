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

//! The cosine of the angle between the planes `(x1, x2, x3)` and `(x2, x3, x4)`.

use super::BondGeometry;

use rsp2_array_types::dot;

/// How far outside of `[-1, 1]` the cosine may stray before it is reported.
pub const TOLERANCE: f64 = 0.05;

/// Floor for squared sines, which appear in denominators.
pub const SMALL: f64 = 0.001;

/// Everything about the angle that the force computation needs.
///
/// `c0, c1, c2` are cosines between pairs of bonds; `s1` and `s2` are the
/// inverse squared sines of the two bond angles (after flooring at `SMALL`),
/// and `s12 = sqrt(s1 * s2)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AngleTerms {
    /// Cosine of the improper angle, clamped to `[-1, 1]`.
    pub c: f64,
    /// Sine of the improper angle, floored at `SMALL`.
    pub s: f64,
    pub s1: f64,
    pub s2: f64,
    pub s12: f64,
    pub c0: f64,
    pub c1: f64,
    pub c2: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Solution {
    pub terms: AngleTerms,
    /// The cosine before clamping.
    pub raw_cosine: f64,
}

impl Solution {
    /// Whether the unclamped cosine is far enough outside of `[-1, 1]` to indicate
    /// bad geometry.  NaN is never out of the domain.
    pub fn is_out_of_domain(&self) -> bool {
        self.raw_cosine > 1.0 + TOLERANCE || self.raw_cosine < -1.0 - TOLERANCE
    }
}

pub fn solve(geom: &BondGeometry) -> Solution {
    let BondGeometry { ref b1, ref b2, ref b3, inv_norm: [r1, r2, r3], inv_sqnorm: _ } = *geom;

    let c0 = dot(b1, b3) * r1 * r3;
    let c1 = dot(b1, b2) * r1 * r2;
    let c2 = -dot(b3, b2) * r3 * r2;

    // NOTE: these are written as comparisons rather than `f64::max` so that NaN
    //       is carried through instead of being replaced by the floor.
    let mut s1 = 1.0 - c1 * c1;
    if s1 < SMALL { s1 = SMALL; }
    let s1 = 1.0 / s1;

    let mut s2 = 1.0 - c2 * c2;
    if s2 < SMALL { s2 = SMALL; }
    let s2 = 1.0 / s2;

    let s12 = f64::sqrt(s1 * s2);
    let raw_cosine = (c1 * c2 + c0) * s12;

    let mut c = raw_cosine;
    if c > 1.0 { c = 1.0; }
    if c < -1.0 { c = -1.0; }

    let mut s = f64::sqrt(1.0 - c * c);
    if s < SMALL { s = SMALL; }

    Solution {
        terms: AngleTerms { c, s, s1, s2, s12, c0, c1, c2 },
        raw_cosine,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::random_v3;
    use rsp2_array_types::V3;

    fn solve_bonds(b1: V3, b2: V3, b3: V3) -> Solution {
        solve(&BondGeometry::from_bonds(b1, b2, b3))
    }

    #[test]
    fn right_angle() {
        let sol = solve_bonds(V3([-1.0, 0.0, 0.0]), V3([0.0, 1.0, 0.0]), V3([0.0, 0.0, 1.0]));
        assert!(!sol.is_out_of_domain());
        assert_close!(abs=1e-15, sol.terms.c, 0.0);
        assert_close!(sol.terms.s, 1.0);
        assert_close!(sol.terms.s12, 1.0);
    }

    #[test]
    fn planar_cis_and_trans() {
        let cis = solve_bonds(V3([-1.0, 0.0, 0.0]), V3([0.0, 1.0, 0.0]), V3([-1.0, 0.0, 0.0]));
        assert_eq!(cis.terms.c, 1.0);
        assert_eq!(cis.terms.s, SMALL);

        let trans = solve_bonds(V3([-1.0, 0.0, 0.0]), V3([0.0, 1.0, 0.0]), V3([1.0, 0.0, 0.0]));
        assert_eq!(trans.terms.c, -1.0);
        assert_eq!(trans.terms.s, SMALL);
    }

    #[test]
    fn matches_the_dihedral_between_normals() {
        for _ in 0..20 {
            let b1 = random_v3(-1.0, 1.0);
            let b2 = random_v3(-1.0, 1.0);
            let b3 = random_v3(-1.0, 1.0);

            // away from the floors, `c` is the cosine of the angle between plane normals
            let sines_ok = {
                b1.angle_to(&b2).sin().abs() > 0.1 && b3.angle_to(&b2).sin().abs() > 0.1
            };
            if !sines_ok { continue; }

            let n1 = b1.cross(&b2);
            let n2 = b2.cross(&b3);
            let expected = dot(&n1, &n2) / (n1.norm() * n2.norm());
            // (sign convention: the trans configuration has c = -1)
            let sol = solve_bonds(b1, b2, b3);
            assert_close!(rel=1e-9, abs=1e-12, sol.terms.c, -expected);
        }
    }

    #[test]
    fn floors_prevent_blowup() {
        // b1 parallel to b2
        let sol = solve_bonds(V3([0.0, 2.0, 0.0]), V3([0.0, 1.0, 0.0]), V3([0.0, 0.5, 0.5]));
        assert_eq!(sol.terms.s1, 1.0 / SMALL);
        assert!(sol.terms.c.is_finite());
        assert!(sol.terms.s >= SMALL);
        assert!(!sol.is_out_of_domain());
    }

    #[test]
    fn out_of_domain_is_clamped() {
        // Inconsistent inverse lengths (as e.g. from a corrupted image) push the
        // cosine well past 1.
        let mut geom = BondGeometry::from_bonds(
            V3([-1.0, 0.0, 0.1]), V3([0.0, 1.0, 0.0]), V3([-1.0, 0.0, 0.0]),
        );
        geom.inv_norm[0] *= 1.5;
        let sol = solve(&geom);
        assert!(sol.raw_cosine > 1.0 + TOLERANCE);
        assert!(sol.is_out_of_domain());
        assert_eq!(sol.terms.c, 1.0);
        assert_eq!(sol.terms.s, SMALL);

        geom.b3 = -geom.b3;
        let sol = solve(&geom);
        assert!(sol.is_out_of_domain());
        assert_eq!(sol.terms.c, -1.0);
    }

    #[test]
    fn slightly_out_of_domain_is_silent() {
        let sol = Solution {
            terms: solve_bonds(V3([-1.0, 0.0, 0.0]), V3([0.0, 1.0, 0.0]), V3([-1.0, 0.0, 0.0])).terms,
            raw_cosine: 1.0 + 0.5 * TOLERANCE,
        };
        assert!(!sol.is_out_of_domain());
        assert!(!Solution { raw_cosine: std::f64::NAN, ..sol }.is_out_of_domain());
    }
}
