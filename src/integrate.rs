//! Adaptive Simpson quadrature.

use crate::Float;

/// Maximum recursion depth of [`adaptive_simpson`].
const MAX_DEPTH: usize = 50;

/// Integrate `f` over `[a, b]` to an absolute tolerance of `tolerance`.
///
/// Intervals are bisected until the Richardson error estimate drops below the tolerance
/// assigned to them, which copes with the square-root behaviour of limb-darkening laws at
/// the stellar limb. The tolerance is raised to a small multiple of the machine epsilon of `F`.
/// A non-finite error estimate ends the bisection, so an integrand returning NaN yields NaN
/// after a single step.
pub(crate) fn adaptive_simpson<F, G>(f: G, a: F, b: F, tolerance: F) -> F
where
    F: Float,
    G: Fn(F) -> F,
{
    let tolerance = tolerance.max(F::default_epsilon() * F::from_f64(64.).unwrap());
    let two = F::from_f64(2.).unwrap();
    let fa = f(a);
    let fb = f(b);
    let m = (a + b) / two;
    let fm = f(m);
    let whole = simpson(a, b, fa, fm, fb);
    recurse(&f, a, b, fa, fm, fb, whole, tolerance, MAX_DEPTH)
}

fn simpson<F: Float>(a: F, b: F, fa: F, fm: F, fb: F) -> F {
    (b - a) / F::from_f64(6.).unwrap() * (fa + F::from_f64(4.).unwrap() * fm + fb)
}

#[allow(clippy::too_many_arguments)]
fn recurse<F, G>(f: &G, a: F, b: F, fa: F, fm: F, fb: F, whole: F, tolerance: F, depth: usize) -> F
where
    F: Float,
    G: Fn(F) -> F,
{
    let two = F::from_f64(2.).unwrap();
    let m = (a + b) / two;
    let lm = (a + m) / two;
    let rm = (m + b) / two;
    let flm = f(lm);
    let frm = f(rm);
    let left = simpson(a, m, fa, flm, fm);
    let right = simpson(m, b, fm, frm, fb);
    let delta = left + right - whole;
    let fifteen = F::from_f64(15.).unwrap();

    if depth == 0 || !delta.is_finite() || delta.abs() <= fifteen * tolerance {
        return left + right + delta / fifteen;
    }

    recurse(f, a, m, fa, flm, fm, left, tolerance / two, depth - 1)
        + recurse(f, m, b, fm, frm, fb, right, tolerance / two, depth - 1)
}
