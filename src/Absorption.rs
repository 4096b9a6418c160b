//! # Absorption Spectroscopy Module
//!
//! Data reduction for laser absorption diagnostics behind the shock via the
//! Beer-Lambert law
//!
//! ```text
//! A = sigma * X * N_A * L * P / (R * T)
//! ```
//!
//! with the absorption cross-section `sigma` in cm^2, the path length `L` in
//! cm, pressure in Pa and temperature in K. The cm^2 * cm to m^3 mismatch is
//! absorbed by the 1e6 factor.
use crate::constants::{AVOGADRO_NUMBER, GAS_CONSTANT};
use nalgebra::DVector;

/// Species mole fraction from a measured absorbance.
///
/// # Arguments
/// * `absorbance` - Measured absorbance (dimensionless)
/// * `sigma` - Absorption cross-section [cm^2]
/// * `temperature` - Absolute temperature [K]
/// * `pressure` - Absolute pressure [Pa]
/// * `path_length` - Optical path length [cm]
pub fn species_mole_fraction(
    absorbance: f64,
    sigma: f64,
    temperature: f64,
    pressure: f64,
    path_length: f64,
) -> f64 {
    absorbance / (sigma / 1e6 * AVOGADRO_NUMBER * path_length) * (GAS_CONSTANT * temperature)
        / pressure
}

/// Absorbance produced by a species at the given mole fraction; inverse of
/// [`species_mole_fraction`].
pub fn absorbance(
    mole_fraction: f64,
    sigma: f64,
    temperature: f64,
    pressure: f64,
    path_length: f64,
) -> f64 {
    mole_fraction * (sigma / 1e6 * AVOGADRO_NUMBER * path_length) * pressure
        / (GAS_CONSTANT * temperature)
}

/// Element-wise mole fraction reduction of a time-resolved absorbance trace
/// with matching temperature and pressure histories.
pub fn species_mole_fraction_trace(
    absorbance: &DVector<f64>,
    sigma: f64,
    temperature: &DVector<f64>,
    pressure: &DVector<f64>,
    path_length: f64,
) -> DVector<f64> {
    DVector::from_fn(absorbance.len(), |i, _| {
        species_mole_fraction(absorbance[i], sigma, temperature[i], pressure[i], path_length)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_round_trip() {
        let (sigma, t, p, l) = (1.2e-19, 1450.0, 1.8e5, 10.0);
        let x = 0.004;
        let a = absorbance(x, sigma, t, p, l);
        assert_relative_eq!(
            species_mole_fraction(a, sigma, t, p, l),
            x,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_absorbance_scales_with_pressure() {
        let a_low = absorbance(0.01, 1e-19, 1500.0, 1.0e5, 10.0);
        let a_high = absorbance(0.01, 1e-19, 1500.0, 2.0e5, 10.0);
        assert_relative_eq!(a_high / a_low, 2.0, max_relative = 1e-12);
    }

    #[test]
    fn test_trace_reduction() {
        let a = DVector::from_vec(vec![0.1, 0.2]);
        let t = DVector::from_vec(vec![1400.0, 1400.0]);
        let p = DVector::from_vec(vec![2.0e5, 2.0e5]);
        let x = species_mole_fraction_trace(&a, 1e-19, &t, &p, 10.0);
        assert_relative_eq!(x[1] / x[0], 2.0, max_relative = 1e-12);
    }

    // number check: known magnitudes should give mole fractions below unity
    #[test]
    fn test_magnitude() {
        let x = species_mole_fraction(0.5, 1e-19, 1500.0, 2.0e5, 10.0);
        assert!(x > 0.0 && x < 1.0);
    }
}
