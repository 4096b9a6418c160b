//! # Shock State Module
//!
//! Ideal-gas normal shock relations for the driven section of a shock tube,
//! with frozen chemistry: the specific heat ratio is evaluated at the initial
//! temperature and held constant across the shock. Region numbering follows
//! the usual convention: 1 - initial driven gas, 2 - behind the incident
//! shock, 5 - behind the reflected shock.
//!
//! ```text
//! P2/P1  = (2*g*Ms^2 - (g-1)) / (g+1)
//! T2/T1  = (2*g*Ms^2 - (g-1)) * ((g-1)*Ms^2 + 2) / ((g+1)^2 * Ms^2)
//! r2/r1  = (g+1)*Ms^2 / ((g-1)*Ms^2 + 2)
//! U2     = (2/(g+1)) * a1 * (Ms - 1/Ms)
//! P5/P2  = ((3g-1)*Ms^2 - 2*(g-1)) / ((g-1)*Ms^2 + 2)
//! T5/T1  = (2*(g-1)*Ms^2 + (3-g)) * ((3g-1)*Ms^2 - 2*(g-1)) / ((g+1)^2 * Ms^2)
//! ```
use crate::Kinetics::mixture::{Mixture, MixtureError};
use crate::Kinetics::thermo::{self, ThermoError};
use crate::constants::GAS_CONSTANT;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShockTubeError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Root finding did not converge: {0}")]
    NotConverged(String),
    #[error("Thermodynamics error: {0}")]
    Thermo(#[from] ThermoError),
    #[error("Mixture error: {0}")]
    Mixture(#[from] MixtureError),
}

/// Speed of sound [m/s] for an ideal gas; `mw` in kg/kmol.
pub fn sound_speed(gamma: f64, mw: f64, temp: f64) -> f64 {
    (gamma * GAS_CONSTANT / mw * temp).sqrt()
}

/// Pressure ratio across the incident shock.
pub fn p2_p1(gamma: f64, ms: f64) -> f64 {
    (2.0 * gamma * ms.powi(2) - (gamma - 1.0)) / (gamma + 1.0)
}

/// Temperature ratio across the incident shock.
pub fn t2_t1(gamma: f64, ms: f64) -> f64 {
    (2.0 * gamma * ms.powi(2) - (gamma - 1.0)) * ((gamma - 1.0) * ms.powi(2) + 2.0)
        / ((gamma + 1.0).powi(2) * ms.powi(2))
}

/// Density ratio across the incident shock.
pub fn rho2_rho1(gamma: f64, ms: f64) -> f64 {
    (gamma + 1.0) * ms.powi(2) / ((gamma - 1.0) * ms.powi(2) + 2.0)
}

/// Pressure ratio across the reflected shock.
pub fn p5_p2(gamma: f64, ms: f64) -> f64 {
    ((3.0 * gamma - 1.0) * ms.powi(2) - 2.0 * (gamma - 1.0))
        / ((gamma - 1.0) * ms.powi(2) + 2.0)
}

/// Temperature ratio behind the reflected shock relative to region 1.
pub fn t5_t1(gamma: f64, ms: f64) -> f64 {
    (2.0 * (gamma - 1.0) * ms.powi(2) + (3.0 - gamma))
        * ((3.0 * gamma - 1.0) * ms.powi(2) - 2.0 * (gamma - 1.0))
        / ((gamma + 1.0).powi(2) * ms.powi(2))
}

/// Lab-frame gas velocity behind the incident shock [m/s].
pub fn u2(gamma: f64, a1: f64, ms: f64) -> f64 {
    2.0 / (gamma + 1.0) * a1 * (ms - 1.0 / ms)
}

/// Complete frozen-chemistry state of a shock tube experiment for a given
/// incident shock Mach number.
#[allow(non_snake_case)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShockConditions {
    /// Specific heat ratio of the driven gas at T1
    pub gamma: f64,
    /// Mean molar mass of the driven gas [kg/kmol]
    pub MW: f64,
    /// Incident shock Mach number
    pub Ms: f64,
    /// Initial driven gas temperature [K]
    pub T1: f64,
    /// Initial driven gas pressure [Pa]
    pub P1: f64,
    /// Speed of sound in region 1 [m/s]
    pub a1: f64,
    /// Incident shock speed [m/s]
    pub W: f64,
    /// Temperature behind the incident shock [K]
    pub T2: f64,
    /// Pressure behind the incident shock [Pa]
    pub P2: f64,
    /// Lab-frame gas velocity behind the incident shock [m/s]
    pub U2: f64,
    /// Density ratio across the incident shock
    pub rho_ratio: f64,
    /// Temperature behind the reflected shock [K]
    pub T5: f64,
    /// Pressure behind the reflected shock [Pa]
    pub P5: f64,
}

impl ShockConditions {
    /// Evaluates all regions from the initial state and the incident shock
    /// Mach number. `Ms` must exceed unity.
    #[allow(non_snake_case)]
    pub fn from_mach(
        mixture: &Mixture,
        T1: f64,
        P1: f64,
        Ms: f64,
    ) -> Result<Self, ShockTubeError> {
        if T1 <= 0.0 || P1 <= 0.0 {
            return Err(ShockTubeError::InvalidParameter(
                "T1 and P1 must be positive".to_string(),
            ));
        }
        if Ms <= 1.0 {
            return Err(ShockTubeError::InvalidParameter(format!(
                "Incident shock Mach number must exceed unity, got {}",
                Ms
            )));
        }
        let gamma = thermo::gamma_mean(mixture, T1)?;
        let mw = mixture.mean_molar_mass()?;
        let a1 = sound_speed(gamma, mw, T1);
        Ok(Self {
            gamma,
            MW: mw,
            Ms,
            T1,
            P1,
            a1,
            W: Ms * a1,
            T2: T1 * t2_t1(gamma, Ms),
            P2: P1 * p2_p1(gamma, Ms),
            U2: u2(gamma, a1, Ms),
            rho_ratio: rho2_rho1(gamma, Ms),
            T5: T1 * t5_t1(gamma, Ms),
            P5: P1 * p2_p1(gamma, Ms) * p5_p2(gamma, Ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_incident_ratios_gamma_14_ms_2() {
        let g = 1.4;
        let ms = 2.0;
        assert_relative_eq!(p2_p1(g, ms), 4.5, epsilon = 1e-12);
        assert_relative_eq!(t2_t1(g, ms), 1.6875, epsilon = 1e-12);
        assert_relative_eq!(rho2_rho1(g, ms), 8.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reflected_ratios_gamma_14_ms_2() {
        let g = 1.4;
        let ms = 2.0;
        assert_relative_eq!(p5_p2(g, ms), 10.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(t5_t1(g, ms), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_ratios_tend_to_identity_at_ms_1() {
        for g in [1.3, 1.4, 5.0 / 3.0] {
            assert_relative_eq!(p2_p1(g, 1.0), 1.0, epsilon = 1e-12);
            assert_relative_eq!(t2_t1(g, 1.0), 1.0, epsilon = 1e-12);
            assert_relative_eq!(p5_p2(g, 1.0), 1.0, epsilon = 1e-12);
            assert_relative_eq!(t5_t1(g, 1.0), 1.0, epsilon = 1e-12);
            assert_relative_eq!(u2(g, 340.0, 1.0), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_sound_speed_argon() {
        // a = sqrt(gamma R T / MW): argon at 300 K is about 322 m/s
        let a = sound_speed(5.0 / 3.0, 39.948, 300.0);
        assert_relative_eq!(a, 322.6, epsilon = 1.0);
    }

    #[test]
    fn test_from_mach_argon() {
        let ar = Mixture::parse("AR").unwrap();
        let sc = ShockConditions::from_mach(&ar, 300.0, 10000.0, 2.5).unwrap();
        assert_relative_eq!(sc.gamma, 5.0 / 3.0, epsilon = 1e-12);
        assert!(sc.T5 > sc.T2 && sc.T2 > sc.T1);
        assert!(sc.P5 > sc.P2 && sc.P2 > sc.P1);
        assert!(sc.W > sc.U2 && sc.U2 > 0.0);
        assert_relative_eq!(sc.W, sc.Ms * sc.a1, epsilon = 1e-12);
    }

    #[test]
    fn test_from_mach_rejects_subsonic() {
        let ar = Mixture::parse("AR").unwrap();
        assert!(ShockConditions::from_mach(&ar, 300.0, 1e4, 0.9).is_err());
        assert!(ShockConditions::from_mach(&ar, -300.0, 1e4, 2.0).is_err());
    }
}
