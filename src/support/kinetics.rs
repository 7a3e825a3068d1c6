//! Rate laws shared by physiological models.
//!
//! Each function here is pure and works on plain `f64` concentrations and
//! rates, leaving unit bookkeeping to the caller. Substrate concentrations
//! are clamped to zero before use where a transiently negative pool would
//! otherwise produce a negative or undefined rate.
//!
//! # Example
//!
//! ```
//! use twine_crop_models::support::kinetics::{michaelis_menten, transport_resistance};
//!
//! // Half-saturated uptake.
//! assert_eq!(michaelis_menten(2.0, 10.0, 10.0), 1.0);
//!
//! // A negative substrate never yields a negative rate.
//! assert_eq!(michaelis_menten(2.0, 10.0, -3.0), 0.0);
//!
//! // Flux out of the richer compartment is positive.
//! assert!(transport_resistance(40.0, 10.0, 1e-3) > 0.0);
//! ```

/// Michaelis-Menten saturation `vmax * s / (s + km)` with `s` clamped to zero.
#[must_use]
pub fn michaelis_menten(vmax: f64, km: f64, substrate: f64) -> f64 {
    let s = substrate.max(0.0);
    vmax * s / (s + km)
}

/// Bi-substrate Michaelis-Menten `vmax / ((1 + ka/a)(1 + kb/b))`.
///
/// Returns zero when either substrate is not positive, where the law has no
/// meaningful value.
#[must_use]
pub fn bi_substrate(vmax: f64, ka: f64, a: f64, kb: f64, b: f64) -> f64 {
    if a <= 0.0 || b <= 0.0 {
        return 0.0;
    }
    vmax / ((1.0 + ka / a) * (1.0 + kb / b))
}

/// Transport-resistance flux from `source` to `sink`.
///
/// The gradient is weighted by the higher of the two concentrations:
/// `max(source, sink) * (source - sink) * conductance`.
#[must_use]
pub fn transport_resistance(source: f64, sink: f64, conductance: f64) -> f64 {
    source.max(sink) * (source - sink) * conductance
}

/// End-product inhibition `vmax * k / (i + k)` with inhibitor `i` clamped to zero.
#[must_use]
pub fn end_product_inhibition(vmax: f64, k: f64, inhibitor: f64) -> f64 {
    vmax * k / (inhibitor.max(0.0) + k)
}

/// Hill function `x^n / (x^n + k^n)` with `x` clamped to zero.
#[must_use]
pub fn hill(x: f64, k: f64, n: f64) -> f64 {
    let xn = x.max(0.0).powf(n);
    xn / (xn + k.powf(n))
}

/// "Switch-off" sigmoidal ceiling `vmax * k^n / (rate^n + k^n)`.
///
/// A non-positive `rate` leaves the ceiling at its unregulated value `vmax`.
#[must_use]
pub fn switch_off(vmax: f64, k: f64, n: f64, rate: f64) -> f64 {
    if rate <= 0.0 {
        return vmax;
    }
    let kn = k.powf(n);
    vmax * kn / (rate.powf(n).max(0.0) + kn)
}

/// Fraction of `total` attributed to a contributor holding `share` of `whole`.
///
/// Returns zero when `whole` is not positive.
#[must_use]
pub fn proportional_share(total: f64, share: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        total * (share / whole)
    } else {
        0.0
    }
}
