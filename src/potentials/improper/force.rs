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

//! Energy and forces of a single harmonic improper term.
//!
//! ```text
//!   E = k (acos(c) - chi)^2
//! ```
//!
//! The forces are obtained by projecting `-dE/dc * dc/dx` onto the three bond
//! vectors.  The six projection coefficients are evaluated in a fixed order, in
//! which `a`, `c` and `s12` are rescaled *before* any coefficient is computed;
//! reordering these expressions changes the rounding of the output.

use super::{AngleTerms, BondGeometry, Params};

use rsp2_array_types::V3;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TermForces {
    /// Energy of the term.  Always zero when the energy was not requested.
    pub energy: f64,
    /// Forces on the four sites, in the order of the term.
    pub forces: [V3; 4],
}

/// Compute the forces (and, if `EFLAG`, the energy) of one term.
///
/// The forces always sum to zero, up to rounding.
#[inline(always)]
pub fn compute<const EFLAG: bool>(
    params: &Params,
    geom: &BondGeometry,
    angle: &AngleTerms,
) -> TermForces {
    let Params { k, chi } = *params;
    let BondGeometry {
        b1, b2, b3,
        inv_sqnorm: [ss1, ss2, ss3],
        inv_norm: [r1, r2, r3],
    } = *geom;
    let AngleTerms { c, s, s1, s2, s12, c0, c1, c2 } = *angle;

    let domega = f64::acos(c) - chi;
    let mut a = k * domega;

    let energy = match EFLAG {
        true => a * domega,
        false => 0.0,
    };

    // dE/dc
    a = -a * 2.0 / s;
    let c = c * a;
    let s12 = s12 * a;

    let a11 = c * ss1 * s1;
    let a22 = -ss2 * (2.0 * c0 * s12 - c * (s1 + s2));
    let a33 = c * ss3 * s2;
    let a12 = -r1 * r2 * (c1 * c * s1 + c2 * s12);
    let a13 = -r1 * r3 * s12;
    let a23 = r2 * r3 * (c2 * c * s2 + c1 * s12);

    let mid = a22 * b2 + a23 * b3 + a12 * b1;

    let f1 = a12 * b2 + a13 * b3 + a11 * b1;
    let f2 = -mid - f1;
    let f4 = a23 * b2 + a33 * b3 + a13 * b1;
    let f3 = mid - f4;

    TermForces { energy, forces: [f1, f2, f3, f4] }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::improper::{angle, NoImage};
    use crate::util::{uniform, random_v3, num_grad_v3, rotate};
    use std::f64::consts::PI;

    fn term_forces<const EFLAG: bool>(params: &Params, positions: &[V3; 4]) -> TermForces {
        let geom = BondGeometry::compute(positions, [0, 1, 2, 3], &NoImage);
        let solution = angle::solve(&geom);
        compute::<EFLAG>(params, &geom, &solution.terms)
    }

    fn energy(params: &Params, positions: &[V3; 4]) -> f64 {
        term_forces::<true>(params, positions).energy
    }

    fn random_positions() -> [V3; 4] {
        [
            random_v3(-1.0, 1.0),
            random_v3(-1.0, 1.0) + V3([1.5, 0.0, 0.0]),
            random_v3(-1.0, 1.0) + V3([1.5, 1.5, 0.0]),
            random_v3(-1.0, 1.0) + V3([1.5, 1.5, 1.5]),
        ]
    }

    fn random_params() -> Params {
        Params { k: uniform(1.0, 20.0), chi: uniform(0.0, PI) }
    }

    fn net_force(forces: &[V3; 4]) -> V3 {
        forces[0] + forces[1] + forces[2] + forces[3]
    }

    #[test]
    fn right_angle_by_hand() {
        let positions = [
            V3([0.0, 0.0, 0.0]),
            V3([1.0, 0.0, 0.0]),
            V3([1.0, 1.0, 0.0]),
            V3([1.0, 1.0, 1.0]),
        ];
        let params = Params { k: 10.0, chi: 0.0 };
        let TermForces { energy, forces } = term_forces::<true>(&params, &positions);

        // c = 0, so the angle is pi/2 and dE/dc = -2 k (pi/2)
        let scale = 10.0 * PI;
        assert_close!(energy, 10.0 * (PI / 2.0) * (PI / 2.0));
        assert_close!(abs=1e-12, forces[0].0, [0.0, 0.0, scale]);
        assert_close!(abs=1e-12, forces[1].0, [0.0, 0.0, -scale]);
        assert_close!(abs=1e-12, forces[2].0, [scale, 0.0, 0.0]);
        assert_close!(abs=1e-12, forces[3].0, [-scale, 0.0, 0.0]);
    }

    #[test]
    fn planar_configurations() {
        let params = Params { k: 10.0, chi: 0.0 };

        // angle 0: at equilibrium
        let cis = [
            V3([0.0, 0.0, 0.0]),
            V3([1.0, 0.0, 0.0]),
            V3([1.0, 1.0, 0.0]),
            V3([0.0, 1.0, 0.0]),
        ];
        let out = term_forces::<true>(&params, &cis);
        assert_eq!(out.energy, 0.0);
        for f in &out.forces {
            assert_eq!(f.0, [0.0; 3]);
        }

        // angle pi: maximally strained, but every force lies in a symmetric plane
        let trans = [
            V3([0.0, 0.0, 0.0]),
            V3([1.0, 0.0, 0.0]),
            V3([1.0, 1.0, 0.0]),
            V3([2.0, 1.0, 0.0]),
        ];
        let out = term_forces::<true>(&params, &trans);
        assert_close!(out.energy, 10.0 * PI * PI);
        for f in &out.forces {
            assert!(f.norm() < 1e-9, "{:?}", f);
        }
    }

    #[test]
    fn energy_is_omitted_on_request() {
        let positions = random_positions();
        let params = random_params();
        let with = term_forces::<true>(&params, &positions);
        let without = term_forces::<false>(&params, &positions);
        assert_eq!(without.energy, 0.0);
        assert_eq!(with.forces, without.forces);
    }

    #[test]
    fn energy_formula() {
        for _ in 0..20 {
            let positions = random_positions();
            let params = random_params();
            let geom = BondGeometry::compute(&positions, [0, 1, 2, 3], &NoImage);
            let c = angle::solve(&geom).terms.c;
            let domega = c.acos() - params.chi;
            assert_close!(energy(&params, &positions), params.k * domega * domega);
        }
    }

    #[test]
    fn forces_balance() {
        for _ in 0..50 {
            let out = term_forces::<false>(&random_params(), &random_positions());
            let scale = out.forces.iter().map(|f| f.norm()).fold(0.0, f64::max);
            assert_close!(abs=1e-12 * scale.max(1.0), net_force(&out.forces).0, [0.0; 3]);
        }
    }

    #[test]
    fn forces_are_gradients() {
        for _ in 0..20 {
            let positions = random_positions();
            let params = random_params();

            // stay clear of the floors, where the energy is not differentiable
            let geom = BondGeometry::compute(&positions, [0, 1, 2, 3], &NoImage);
            let terms = angle::solve(&geom).terms;
            if terms.s1 > 10.0 || terms.s2 > 10.0 || terms.s < 0.1 {
                continue;
            }

            let TermForces { forces, .. } = term_forces::<true>(&params, &positions);
            for site in 0..4 {
                let num_grad = num_grad_v3(1e-4, positions[site], |x| {
                    let mut displaced = positions;
                    displaced[site] = x;
                    energy(&params, &displaced)
                });
                assert_close!(rel=1e-6, abs=1e-6, forces[site].0, (-num_grad).0);
            }
        }
    }

    #[test]
    fn rigid_motions() {
        for _ in 0..20 {
            let positions = random_positions();
            let params = random_params();

            // near the floors, rounding differences are amplified by 1/s
            let geom = BondGeometry::compute(&positions, [0, 1, 2, 3], &NoImage);
            let terms = angle::solve(&geom).terms;
            if terms.s1 > 10.0 || terms.s2 > 10.0 || terms.s < 0.1 {
                continue;
            }

            let original = term_forces::<true>(&params, &positions);

            let shift = random_v3(-5.0, 5.0);
            let axis = random_v3(-1.0, 1.0).unit();
            let angle = uniform(-PI, PI);

            let mut moved = positions;
            for x in &mut moved {
                *x = rotate(*x, axis, angle) + shift;
            }
            let out = term_forces::<true>(&params, &moved);

            assert_close!(rel=1e-9, abs=1e-9, out.energy, original.energy);
            for (f_moved, &f_orig) in out.forces.iter().zip(&original.forces) {
                let expected = rotate(f_orig, axis, angle);
                assert_close!(rel=1e-7, abs=1e-7 * f_orig.norm().max(1.0), f_moved.0, expected.0);
            }
        }
    }

    #[test]
    fn near_linear_is_finite() {
        let params = Params { k: 10.0, chi: 0.0 };
        let positions = [
            V3([1.0, 2.0, 0.01]),
            V3([1.0, 0.0, 0.0]),
            V3([1.0, 1.0, 0.0]),
            V3([1.0, 2.0, 0.5]),
        ];
        let out = term_forces::<true>(&params, &positions);
        assert!(out.energy.is_finite());
        for f in &out.forces {
            assert!(f.0.iter().all(|x| x.is_finite()));
        }

        // exactly collinear first three sites
        let positions = [
            V3([1.0, 3.0, 0.0]),
            V3([1.0, 0.0, 0.0]),
            V3([1.0, 1.0, 0.0]),
            V3([1.0, 2.0, 0.5]),
        ];
        let out = term_forces::<true>(&params, &positions);
        assert!(out.energy.is_finite());
        for f in &out.forces {
            assert!(f.0.iter().all(|x| x.is_finite()));
        }
    }
}
