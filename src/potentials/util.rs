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

// Helpers for the tests of the potentials.
#![cfg(test)]

use rsp2_array_types::V3;

pub(crate) fn uniform(a: f64, b: f64) -> f64 { ::rand::random::<f64>() * (b - a) + a }

pub(crate) fn random_v3(a: f64, b: f64) -> V3 { V3::from_fn(|_| uniform(a, b)) }

/// Numerical derivative by a 5-point stencil.
pub(crate) fn slope(step: f64, point: f64, mut value_fn: impl FnMut(f64) -> f64) -> f64 {
    // http://www.holoborodko.com/pavel/numerical-methods/numerical-derivative/central-differences/
    let numer = {
        1.0 * value_fn(point - 2.0 * step)
        - 8.0 * value_fn(point - 1.0 * step)
        + 8.0 * value_fn(point + 1.0 * step)
        - 1.0 * value_fn(point + 2.0 * step)
    };
    numer / (12.0 * step)
}

pub(crate) fn num_grad_v3(
    step: f64,
    point: V3,
    mut value_fn: impl FnMut(V3) -> f64,
) -> V3 {
    V3::from_fn(|k| slope(step, point[k], |x| {
        let mut p = point;
        p[k] = x;
        value_fn(p)
    }))
}

/// Rotation of `v` about the unit vector `axis` (Rodrigues' formula).
pub(crate) fn rotate(v: V3, axis: V3, angle: f64) -> V3 {
    let (sin, cos) = angle.sin_cos();
    cos * v + sin * axis.cross(&v) + (1.0 - cos) * axis.dot(&v) * axis
}

#[test]
fn slope_of_cubic() {
    assert_close!(rel=1e-9, slope(1e-3, 2.0, |x| x * x * x), 12.0);
}

#[test]
fn rotation_preserves_norm() {
    for _ in 0..10 {
        let v = random_v3(-2.0, 2.0);
        let axis = random_v3(-1.0, 1.0).unit();
        let rotated = rotate(v, axis, uniform(-3.0, 3.0));
        assert_close!(rel=1e-12, rotated.norm(), v.norm());
    }
}
