//! # Experiment Planning Module
//!
//! Inverts the frozen-chemistry shock relations: given the target temperature
//! and pressure behind the reflected shock (the reaction conditions of an
//! ignition delay experiment), find the incident shock Mach number and the
//! initial driven-section fill pressure.
//!
//! With `x = Ms^2` the relation `T5/T1 = f(Ms)` reduces to a quadratic
//!
//! ```text
//! a*c*x^2 + (b*c - a*d - tau*(g+1)^2)*x - b*d = 0
//! a = 2(g-1), b = 3-g, c = 3g-1, d = 2(g-1), tau = T5/T1
//! ```
//!
//! with exactly one positive root, so the Mach number is recovered in closed
//! form and the fill pressure follows from the pressure ratios.
use super::state::{ShockConditions, ShockTubeError, p2_p1, p5_p2};
use crate::Kinetics::mixture::Mixture;
use crate::Kinetics::thermo;
use log::info;

/// Incident shock Mach number that produces the given `T5/T1` ratio for the
/// specific heat ratio `gamma`.
pub fn required_mach(gamma: f64, t5_ratio: f64) -> Result<f64, ShockTubeError> {
    if t5_ratio <= 1.0 {
        return Err(ShockTubeError::InvalidParameter(format!(
            "T5/T1 ratio must exceed unity, got {}",
            t5_ratio
        )));
    }
    let a = 2.0 * (gamma - 1.0);
    let b = 3.0 - gamma;
    let c = 3.0 * gamma - 1.0;
    let d = 2.0 * (gamma - 1.0);
    let ac = a * c;
    let bd = b * d;
    let big_b = b * c - a * d - t5_ratio * (gamma + 1.0).powi(2);
    let discriminant = big_b.powi(2) + 4.0 * ac * bd;
    if discriminant < 0.0 {
        return Err(ShockTubeError::NotConverged(
            "negative discriminant in Mach number quadratic".to_string(),
        ));
    }
    let x = (-big_b + discriminant.sqrt()) / (2.0 * ac);
    if x <= 1.0 {
        return Err(ShockTubeError::NotConverged(format!(
            "quadratic root Ms^2 = {} is not supersonic",
            x
        )));
    }
    Ok(x.sqrt())
}

/// Plans an experiment: driven gas `mixture` filled at `T1`, targets `T5` [K]
/// and `P5` [Pa] behind the reflected shock. Returns the complete shock state
/// including the required fill pressure `P1` and shock speed.
#[allow(non_snake_case)]
pub fn plan_experiment(
    mixture: &Mixture,
    T1: f64,
    T5: f64,
    P5: f64,
) -> Result<ShockConditions, ShockTubeError> {
    if T1 <= 0.0 {
        return Err(ShockTubeError::InvalidParameter(
            "T1 must be positive".to_string(),
        ));
    }
    if T5 <= T1 {
        return Err(ShockTubeError::InvalidParameter(format!(
            "target T5 = {} K must exceed T1 = {} K",
            T5, T1
        )));
    }
    if P5 <= 0.0 {
        return Err(ShockTubeError::InvalidParameter(
            "target P5 must be positive".to_string(),
        ));
    }
    let gamma = thermo::gamma_mean(mixture, T1)?;
    let ms = required_mach(gamma, T5 / T1)?;
    let p5_p1 = p2_p1(gamma, ms) * p5_p2(gamma, ms);
    let p1 = P5 / p5_p1;
    info!(
        "experiment plan: gamma = {:.4}, Ms = {:.4}, P1 = {:.1} Pa",
        gamma, ms, p1
    );
    ShockConditions::from_mach(mixture, T1, p1, ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShockTube::state::t5_t1;
    use approx::assert_relative_eq;

    #[test]
    fn test_required_mach_known_value() {
        // gamma = 1.4, T5/T1 = 2.5 corresponds to Ms = 2 exactly
        let ms = required_mach(1.4, 2.5).unwrap();
        assert_relative_eq!(ms, 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_required_mach_round_trip() {
        for gamma in [1.3, 1.4, 5.0 / 3.0] {
            for ms in [1.5, 2.0, 3.5, 5.0] {
                let tau = t5_t1(gamma, ms);
                let recovered = required_mach(gamma, tau).unwrap();
                assert_relative_eq!(recovered, ms, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_plan_hits_targets() {
        let mix = Mixture::parse("AR").unwrap();
        let plan = plan_experiment(&mix, 295.0, 1500.0, 2.0e5).unwrap();
        assert_relative_eq!(plan.T5, 1500.0, max_relative = 1e-9);
        assert_relative_eq!(plan.P5, 2.0e5, max_relative = 1e-9);
        assert!(plan.Ms > 1.0);
        assert!(plan.P1 < 2.0e5);
    }

    #[test]
    fn test_plan_with_dilute_fuel_mixture() {
        let mix = Mixture::parse("CH4: 0.05, O2: 0.10, AR: 0.85").unwrap();
        let plan = plan_experiment(&mix, 295.0, 1800.0, 5.0e5).unwrap();
        assert_relative_eq!(plan.T5, 1800.0, max_relative = 1e-9);
        assert!(plan.W > plan.a1);
    }

    #[test]
    fn test_plan_rejects_bad_targets() {
        let mix = Mixture::parse("AR").unwrap();
        assert!(plan_experiment(&mix, 295.0, 290.0, 1e5).is_err());
        assert!(plan_experiment(&mix, 295.0, 1500.0, -1.0).is_err());
        assert!(required_mach(1.4, 0.5).is_err());
    }
}
