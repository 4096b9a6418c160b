//! # Frozen Thermodynamics Module
//!
//! Heat capacities and specific heat ratios of driven and driver gas
//! mixtures, evaluated with frozen chemistry. Heat capacity follows the
//! seven-coefficient NASA polynomial form
//!
//! ```text
//! Cp/R = a1 + a2*T + a3*T^2 + a4*T^3 + a5*T^4
//! ```
//!
//! with a built-in two-range coefficient table for the species that dominate
//! shock tube work (bath gases, O2/H2/CH4/CO systems). Only the Cp
//! coefficients are stored; enthalpy and entropy are not needed for the
//! frozen shock relations.
use super::mixture::Mixture;
use crate::constants::R;
use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThermoError {
    #[error("No thermodynamic data for species '{0}'")]
    UnknownSpecies(String),
}

struct NasaPoly {
    name: &'static str,
    t_low: f64,
    t_mid: f64,
    t_high: f64,
    /// a1..a5 for t_low..t_mid
    low: [f64; 5],
    /// a1..a5 for t_mid..t_high
    high: [f64; 5],
}

// GRI-Mech 3.0 coefficients; monatomics are exact.
const NASA_TABLE: &[NasaPoly] = &[
    NasaPoly {
        name: "AR",
        t_low: 200.0,
        t_mid: 1000.0,
        t_high: 6000.0,
        low: [2.5, 0.0, 0.0, 0.0, 0.0],
        high: [2.5, 0.0, 0.0, 0.0, 0.0],
    },
    NasaPoly {
        name: "HE",
        t_low: 200.0,
        t_mid: 1000.0,
        t_high: 6000.0,
        low: [2.5, 0.0, 0.0, 0.0, 0.0],
        high: [2.5, 0.0, 0.0, 0.0, 0.0],
    },
    NasaPoly {
        name: "N2",
        t_low: 300.0,
        t_mid: 1000.0,
        t_high: 5000.0,
        low: [
            3.298677e0,
            1.4082404e-3,
            -3.963222e-6,
            5.641515e-9,
            -2.444854e-12,
        ],
        high: [
            2.92664e0,
            1.4879768e-3,
            -5.68476e-7,
            1.0097038e-10,
            -6.753351e-15,
        ],
    },
    NasaPoly {
        name: "O2",
        t_low: 200.0,
        t_mid: 1000.0,
        t_high: 3500.0,
        low: [
            3.78245636e0,
            -2.99673416e-3,
            9.84730201e-6,
            -9.68129509e-9,
            3.24372837e-12,
        ],
        high: [
            3.28253784e0,
            1.48308754e-3,
            -7.57966669e-7,
            2.09470555e-10,
            -2.16717794e-14,
        ],
    },
    NasaPoly {
        name: "H2",
        t_low: 200.0,
        t_mid: 1000.0,
        t_high: 3500.0,
        low: [
            2.34433112e0,
            7.98052075e-3,
            -1.9478151e-5,
            2.01572094e-8,
            -7.37611761e-12,
        ],
        high: [
            3.3372792e0,
            -4.94024731e-5,
            4.99456778e-7,
            -1.79566394e-10,
            2.00255376e-14,
        ],
    },
    NasaPoly {
        name: "CO",
        t_low: 200.0,
        t_mid: 1000.0,
        t_high: 3500.0,
        low: [
            3.57953347e0,
            -6.1035368e-4,
            1.01681433e-6,
            9.07005884e-10,
            -9.04424499e-13,
        ],
        high: [
            2.71518561e0,
            2.06252743e-3,
            -9.98825771e-7,
            2.30053008e-10,
            -2.03647716e-14,
        ],
    },
    NasaPoly {
        name: "CO2",
        t_low: 200.0,
        t_mid: 1000.0,
        t_high: 3500.0,
        low: [
            2.35677352e0,
            8.98459677e-3,
            -7.12356269e-6,
            2.45919022e-9,
            -1.43699548e-13,
        ],
        high: [
            3.85746029e0,
            4.41437026e-3,
            -2.21481404e-6,
            5.23490188e-10,
            -4.72084164e-14,
        ],
    },
    NasaPoly {
        name: "H2O",
        t_low: 200.0,
        t_mid: 1000.0,
        t_high: 3500.0,
        low: [
            4.19864056e0,
            -2.0364341e-3,
            6.52040211e-6,
            -5.48797062e-9,
            1.77197817e-12,
        ],
        high: [
            3.03399249e0,
            2.17691804e-3,
            -1.64072518e-7,
            -9.7041987e-11,
            1.68200992e-14,
        ],
    },
    NasaPoly {
        name: "CH4",
        t_low: 200.0,
        t_mid: 1000.0,
        t_high: 3500.0,
        low: [
            5.14987613e0,
            -1.36709788e-2,
            4.91800599e-5,
            -4.84743026e-8,
            1.66693956e-11,
        ],
        high: [
            7.48514950e-2,
            1.33909467e-2,
            -5.73285809e-6,
            1.22292535e-9,
            -1.0181523e-13,
        ],
    },
];

fn cp_over_r(a: &[f64; 5], t: f64) -> f64 {
    a[0] + a[1] * t + a[2] * t.powi(2) + a[3] * t.powi(3) + a[4] * t.powi(4)
}

fn find_species(name: &str) -> Result<&'static NasaPoly, ThermoError> {
    let name = name.trim().to_uppercase();
    NASA_TABLE
        .iter()
        .find(|p| p.name == name)
        .ok_or(ThermoError::UnknownSpecies(name))
}

/// Molar heat capacity at constant pressure [J mol^-1 K^-1]. Temperatures
/// outside the tabulated range are clamped to the range boundary.
pub fn cp_molar(species: &str, t: f64) -> Result<f64, ThermoError> {
    let poly = find_species(species)?;
    let t_eval = t.clamp(poly.t_low, poly.t_high);
    if t_eval != t {
        debug!(
            "Temperature {} K outside table range for {}; clamped to {} K",
            t, poly.name, t_eval
        );
    }
    let a = if t_eval < poly.t_mid {
        &poly.low
    } else {
        &poly.high
    };
    Ok(R * cp_over_r(a, t_eval))
}

/// Mole-fraction-weighted mixture heat capacity [J mol^-1 K^-1].
pub fn cp_mean(mix: &Mixture, t: f64) -> Result<f64, ThermoError> {
    let mut cp = 0.0;
    for (name, x) in mix.mole_fractions() {
        cp += x * cp_molar(&name, t)?;
    }
    Ok(cp)
}

/// Mixture specific heat ratio gamma = Cp/(Cp - R), frozen composition.
pub fn gamma_mean(mix: &Mixture, t: f64) -> Result<f64, ThermoError> {
    let cp = cp_mean(mix, t)?;
    Ok(cp / (cp - R))
}

/// All species present in the built-in table.
pub fn available_species() -> Vec<&'static str> {
    NASA_TABLE.iter().map(|p| p.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_monatomic_gamma_exact() {
        let ar = Mixture::parse("AR").unwrap();
        assert_relative_eq!(gamma_mean(&ar, 300.0).unwrap(), 5.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(gamma_mean(&ar, 3000.0).unwrap(), 5.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_nitrogen_gamma_room_temperature() {
        let n2 = Mixture::parse("N2").unwrap();
        assert_relative_eq!(gamma_mean(&n2, 300.0).unwrap(), 1.400, epsilon = 5e-3);
    }

    #[test]
    fn test_methane_cp() {
        // NIST: cp(CH4, 298 K) about 35.7 J/mol/K
        let cp = cp_molar("ch4", 300.0).unwrap();
        assert_relative_eq!(cp, 35.8, epsilon = 0.5);
    }

    #[test]
    fn test_cp_rises_with_temperature() {
        let cp_low = cp_molar("CO2", 300.0).unwrap();
        let cp_high = cp_molar("CO2", 2000.0).unwrap();
        assert!(cp_high > cp_low);
    }

    #[test]
    fn test_mixture_gamma_bounded_by_components() {
        let mix = Mixture::parse("CH4: 0.05, O2: 0.10, AR: 0.85").unwrap();
        let g = gamma_mean(&mix, 300.0).unwrap();
        let g_ar = 5.0 / 3.0;
        let g_ch4 = {
            let ch4 = Mixture::parse("CH4").unwrap();
            gamma_mean(&ch4, 300.0).unwrap()
        };
        assert!(g < g_ar && g > g_ch4);
    }

    #[test]
    fn test_unknown_species() {
        assert!(cp_molar("C2H5OH", 300.0).is_err());
    }
}
