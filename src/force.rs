//! Direct-sum softened gravity, evaluated for one contiguous range of bodies.

use std::ops::Range;

use crate::array_body::{Body, Force};

#[derive(Clone, Copy, Debug)]
pub struct ForceParams {
    pub g: f64,
    pub softening: f64,
}

/// Force on body `i` from body `j`.
#[inline]
pub fn calc_pair_force(bi: &Body, bj: &Body, g: f64, eps2: f64) -> [f64; 2] {
    let dx = bj.x - bi.x;
    let dy = bj.y - bi.y;
    let d2 = dx * dx + dy * dy + eps2;
    let dist = f64::sqrt(d2);
    let f = g * bi.mass * bj.mass / d2;
    [f * (dx / dist), f * (dy / dist)]
}

/// Total force on body `i` from every other body.
pub fn calc_force(i: usize, bodies: &[Body], params: ForceParams) -> Force {
    let eps2 = params.softening * params.softening;
    let bi = &bodies[i];
    let mut fx = 0.0;
    let mut fy = 0.0;
    for (j, bj) in bodies.iter().enumerate() {
        if j == i {
            continue;
        }
        let [dfx, dfy] = calc_pair_force(bi, bj, params.g, eps2);
        fx += dfx;
        fy += dfy;
    }
    Force { fx, fy }
}

/// Writes the force for every body in `range` into `out`, which must be the
/// slice of the force buffer covering exactly that range. Each slot is
/// written once, after its sum over all `n` bodies is complete.
pub fn evaluate(range: Range<usize>, bodies: &[Body], out: &mut [Force], params: ForceParams) {
    assert_eq!(out.len(), range.len(), "force slice does not match range {:?}", range);
    for (i, slot) in range.zip(out.iter_mut()) {
        *slot = calc_force(i, bodies, params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::array_body::{random_bodies, two_bodies};

    const PARAMS: ForceParams = ForceParams { g: 1.0, softening: 1e-3 };

    #[test]
    fn single_body_feels_nothing() {
        let bodies = vec![Body::new(0.3, -0.2, 0.05, 0.01, 2.0)];
        let mut out = vec![Force { fx: 9.0, fy: 9.0 }];
        evaluate(0..1, &bodies, &mut out, PARAMS);
        assert_eq!(out[0], Force { fx: 0.0, fy: 0.0 });
    }

    #[test]
    fn two_body_magnitude_and_direction() {
        let (d, m1, m2) = (0.5, 2.0, 3.0);
        let bodies = two_bodies(d, m1, m2);
        let f = calc_force(0, &bodies, PARAMS);
        let d2 = d * d + 1e-6;
        let expected = m1 * m2 / d2;
        // projected onto the unit vector dx / sqrt(d2)
        assert_relative_eq!(f.fx, expected * d / d2.sqrt(), max_relative = 1e-12);
        assert_relative_eq!(f.fx, expected, max_relative = 1e-5);
        assert!(f.fx > 0.0);
        assert_eq!(f.fy, 0.0);
    }

    #[test]
    fn pair_forces_equal_and_opposite() {
        let bodies = random_bodies(2, 99);
        let f0 = calc_force(0, &bodies, PARAMS);
        let f1 = calc_force(1, &bodies, PARAMS);
        assert_relative_eq!(f0.fx, -f1.fx, epsilon = 1e-12, max_relative = 1e-12);
        assert_relative_eq!(f0.fy, -f1.fy, epsilon = 1e-12, max_relative = 1e-12);
    }

    #[test]
    fn coincident_bodies_stay_finite() {
        let bodies = vec![Body::new(0.0, 0.0, 0.0, 0.0, 1.0); 2];
        let f = calc_force(0, &bodies, PARAMS);
        assert!(f.fx.is_finite() && f.fy.is_finite());
    }

    #[test]
    fn range_matches_whole_evaluation() {
        let bodies = random_bodies(20, 3);
        let mut all = vec![Force::default(); 20];
        evaluate(0..20, &bodies, &mut all, PARAMS);
        let mut part = vec![Force::default(); 5];
        evaluate(10..15, &bodies, &mut part, PARAMS);
        assert_eq!(&all[10..15], &part[..]);
    }
}
