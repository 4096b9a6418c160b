//! # Driver Pressure Module
//!
//! Required driver fill pressure P4 for a shock tube experiment, given the
//! incident-shock state of the driven gas. The driver expansion is treated as
//! an unsteady isentropic expansion through an optional area change
//! (`area_ratio` = driver to driven cross-section, >= 1).
//!
//! The solution branches on the expanded driver flow Mach number M3:
//! - supersonic case: the nozzle throat chokes, Me = 1, and the area relation
//!   is solved for M3a alone
//! - subsonic case (M3 < 1): Me = M3 and the area relation couples M3 and
//!   M3a into a two-equation nonlinear system
//!
//! For `area_ratio = 1` the area relation collapses to `M3a = Me` and both
//! branches reduce to the classical closed-form shock tube equation; the
//! Newton-Raphson solver only runs for a genuine area change.
use super::state::{ShockTubeError, sound_speed};
use RustedSciThe::numerical::Nonlinear_systems::NR::NR;
use RustedSciThe::symbolic::symbolic_engine::Expr;
use log::{debug, info};
use std::collections::HashMap;

fn phi(g: f64, m: f64) -> f64 {
    2.0 + (g - 1.0) * m.powi(2)
}

// ((phi(M3a)/phi(Me))^0.5 * (2+(g-1)Me)/(2+(g-1)M3a))^(2g/(g-1))
fn equivalence_factor(g: f64, m3a: f64, me: f64) -> f64 {
    ((phi(g, m3a) / phi(g, me)).sqrt() * (2.0 + (g - 1.0) * me) / (2.0 + (g - 1.0) * m3a))
        .powf(2.0 * g / (g - 1.0))
}

fn calc_m3(g: f64, a4: f64, u2: f64, m3a: f64, me: f64) -> f64 {
    1.0 / (a4 / u2 * equivalence_factor(g, m3a, me).powf((g - 1.0) / g / 2.0) - (g - 1.0) / 2.0)
}

fn area_ratio_residual(g: f64, area_ratio: f64, m3a: f64, me: f64) -> f64 {
    area_ratio * m3a
        - me * (phi(g, m3a) / phi(g, me)).powf((g + 1.0) / (g - 1.0) / 2.0)
}

fn phi_sym(g: f64, m: &Expr) -> Expr {
    Expr::Const(2.0) + Expr::Const(g - 1.0) * m.clone().pow(Expr::Const(2.0))
}

fn equivalence_factor_sym(g: f64, m3a: &Expr, me: &Expr) -> Expr {
    ((phi_sym(g, m3a) / phi_sym(g, me)).pow(Expr::Const(0.5))
        * (Expr::Const(2.0) + Expr::Const(g - 1.0) * me.clone())
        / (Expr::Const(2.0) + Expr::Const(g - 1.0) * m3a.clone()))
    .pow(Expr::Const(2.0 * g / (g - 1.0)))
}

fn area_relation_sym(g: f64, area_ratio: f64, m3a: &Expr, me: &Expr) -> Expr {
    Expr::Const(area_ratio) * m3a.clone()
        - me.clone()
            * (phi_sym(g, m3a) / phi_sym(g, me)).pow(Expr::Const((g + 1.0) / (g - 1.0) / 2.0))
}

fn run_nr(
    equations: Vec<Expr>,
    unknowns: Vec<String>,
    initial_guess: Vec<f64>,
    bounds: HashMap<String, (f64, f64)>,
) -> Result<Vec<f64>, ShockTubeError> {
    let mut solver = NR::new();
    solver.set_equation_system(equations, Some(unknowns), initial_guess, 1e-10, 500);
    solver.set_solver_params(
        Some("info".to_string()),
        None,
        Some(0.5),
        Some(bounds),
        None,
        None,
    );
    solver.eq_generate();
    solver.solve();
    let solution = solver
        .get_result()
        .ok_or_else(|| ShockTubeError::NotConverged("Newton-Raphson returned no result".to_string()))?;
    Ok(solution.data.into())
}

/// Solves the area relation for M3a at the given exit Mach number Me.
fn solve_m3a(g: f64, area_ratio: f64, me: f64) -> Result<f64, ShockTubeError> {
    if area_ratio == 1.0 {
        // the area relation degenerates to M3a = Me
        return Ok(me);
    }
    let m3a_var = Expr::Var("M3a".to_string());
    let me_expr = Expr::Const(me);
    let eq = area_relation_sym(g, area_ratio, &m3a_var, &me_expr);
    let bounds = HashMap::from([("M3a".to_string(), (1e-6, 1.0))]);
    let solution = run_nr(vec![eq], vec!["M3a".to_string()], vec![0.5], bounds)?;
    let m3a = solution[0];
    let residual = area_ratio_residual(g, area_ratio, m3a, me);
    if residual.abs() > 1e-6 {
        return Err(ShockTubeError::NotConverged(format!(
            "area relation residual {} at M3a = {}",
            residual, m3a
        )));
    }
    Ok(m3a)
}

/// Solves the coupled subsonic system (Me = M3) for (M3, M3a).
fn solve_subsonic(
    g: f64,
    area_ratio: f64,
    a4: f64,
    u2: f64,
) -> Result<(f64, f64), ShockTubeError> {
    if area_ratio == 1.0 {
        // M3a = Me = M3 and the expansion relation is explicit
        let m3 = 1.0 / (a4 / u2 - (g - 1.0) / 2.0);
        return Ok((m3, m3));
    }
    let m3_var = Expr::Var("M3".to_string());
    let m3a_var = Expr::Var("M3a".to_string());
    let eq1 = area_relation_sym(g, area_ratio, &m3a_var, &m3_var);
    // M3 * ((a4/U2)*F^((g-1)/(2g)) - (g-1)/2) - 1 = 0
    let eq2 = m3_var.clone()
        * (Expr::Const(a4 / u2)
            * equivalence_factor_sym(g, &m3a_var, &m3_var)
                .pow(Expr::Const((g - 1.0) / g / 2.0))
            - Expr::Const((g - 1.0) / 2.0))
        - Expr::Const(1.0);
    let bounds = HashMap::from([
        ("M3".to_string(), (1e-6, 1.0)),
        ("M3a".to_string(), (1e-6, 1.0)),
    ]);
    let solution = run_nr(
        vec![eq1, eq2],
        vec!["M3".to_string(), "M3a".to_string()],
        vec![0.5, 0.5],
        bounds,
    )?;
    let (m3, m3a) = (solution[0], solution[1]);
    let r1 = area_ratio_residual(g, area_ratio, m3a, m3);
    let r2 = m3 - calc_m3(g, a4, u2, m3a, m3);
    if r1.abs() > 1e-6 || r2.abs() > 1e-6 {
        return Err(ShockTubeError::NotConverged(format!(
            "subsonic system residuals ({}, {}) at M3 = {}, M3a = {}",
            r1, r2, m3, m3a
        )));
    }
    Ok((m3, m3a))
}

/// Required driver pressure P4 [Pa].
///
/// # Arguments
/// * `p2` - Pressure behind the incident shock [Pa]
/// * `u2` - Lab-frame gas velocity behind the incident shock [m/s]
/// * `mw4` - Mean molar mass of the driver gas [kg/kmol]
/// * `gamma4` - Specific heat ratio of the driver gas
/// * `t4` - Initial driver gas temperature [K]
/// * `area_ratio` - Driver to driven area ratio, >= 1
#[allow(non_snake_case)]
pub fn solve_driver_pressure(
    p2: f64,
    u2: f64,
    mw4: f64,
    gamma4: f64,
    t4: f64,
    area_ratio: f64,
) -> Result<f64, ShockTubeError> {
    if area_ratio < 1.0 {
        return Err(ShockTubeError::InvalidParameter(
            "Area ratio must be greater than or equal to one".to_string(),
        ));
    }
    if p2 <= 0.0 || u2 <= 0.0 || mw4 <= 0.0 || t4 <= 0.0 {
        return Err(ShockTubeError::InvalidParameter(
            "p2, u2, mw4 and t4 must be positive".to_string(),
        ));
    }
    if gamma4 <= 1.0 {
        return Err(ShockTubeError::InvalidParameter(
            "gamma4 must exceed unity".to_string(),
        ));
    }
    let g = gamma4;
    let a4 = sound_speed(g, mw4, t4);
    let u_escape = 2.0 * a4 / (g - 1.0);
    if u2 >= u_escape {
        return Err(ShockTubeError::InvalidParameter(format!(
            "U2 = {} m/s exceeds the maximum driver expansion velocity {} m/s",
            u2, u_escape
        )));
    }

    // assume the choked (supersonic) case first
    let mut me = 1.0;
    let mut m3a = solve_m3a(g, area_ratio, me)?;
    let mut m3 = calc_m3(g, a4, u2, m3a, me);
    debug!("driver solve, supersonic branch: M3a = {}, M3 = {}", m3a, m3);

    if m3 < 1.0 {
        let (m3_sub, m3a_sub) = solve_subsonic(g, area_ratio, a4, u2)?;
        m3 = m3_sub;
        me = m3_sub;
        m3a = m3a_sub;
        debug!("driver solve, subsonic branch: M3a = {}, M3 = {}", m3a, m3);
    }

    let p4 = p2 / equivalence_factor(g, m3a, me)
        * (1.0 + (g - 1.0) / 2.0 * m3).powf(2.0 * g / (g - 1.0));
    info!(
        "driver pressure: P4 = {:.1} Pa (M3 = {:.4}, Me = {:.4})",
        p4, m3, me
    );
    Ok(p4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const HE_MW: f64 = 4.0026;
    const HE_GAMMA: f64 = 5.0 / 3.0;

    #[test]
    fn test_area_ratio_below_one_rejected() {
        assert!(solve_driver_pressure(1e5, 500.0, HE_MW, HE_GAMMA, 300.0, 0.5).is_err());
    }

    #[test]
    fn test_equivalence_factor_identity() {
        for m in [0.2, 0.5, 0.9, 1.0] {
            assert_relative_eq!(
                equivalence_factor(HE_GAMMA, m, m),
                1.0,
                epsilon = 1e-12
            );
            assert_relative_eq!(
                area_ratio_residual(HE_GAMMA, 1.0, m, m),
                0.0,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_tailored_supersonic_closed_form() {
        // area_ratio = 1: M3a = Me = 1, F = 1, and
        // P4 = P2 * (1 + (g-1)/2 * M3)^(2g/(g-1)), M3 = 1/(a4/U2 - (g-1)/2)
        let p2 = 2.0e5;
        let u2 = 900.0;
        let t4 = 300.0;
        let a4 = (HE_GAMMA * 8.31432e3 / HE_MW * t4).sqrt();
        let m3 = 1.0 / (a4 / u2 - (HE_GAMMA - 1.0) / 2.0);
        assert!(m3 >= 1.0);
        let expected = p2 * (1.0 + (HE_GAMMA - 1.0) / 2.0 * m3).powf(5.0);
        let p4 = solve_driver_pressure(p2, u2, HE_MW, HE_GAMMA, t4, 1.0).unwrap();
        assert_relative_eq!(p4, expected, max_relative = 1e-10);
    }

    #[test]
    fn test_tailored_subsonic_closed_form() {
        let p2 = 1.5e5;
        let u2 = 300.0;
        let t4 = 300.0;
        let a4 = (HE_GAMMA * 8.31432e3 / HE_MW * t4).sqrt();
        let m3 = 1.0 / (a4 / u2 - (HE_GAMMA - 1.0) / 2.0);
        assert!(m3 < 1.0);
        let expected = p2 * (1.0 + (HE_GAMMA - 1.0) / 2.0 * m3).powf(5.0);
        let p4 = solve_driver_pressure(p2, u2, HE_MW, HE_GAMMA, t4, 1.0).unwrap();
        assert_relative_eq!(p4, expected, max_relative = 1e-10);
    }

    #[test]
    fn test_driver_pressure_exceeds_p2() {
        let p4 = solve_driver_pressure(2.0e5, 700.0, HE_MW, HE_GAMMA, 300.0, 1.0).unwrap();
        assert!(p4 > 2.0e5);
    }

    #[test]
    fn test_higher_u2_needs_higher_p4() {
        let p4_slow = solve_driver_pressure(1e5, 400.0, HE_MW, HE_GAMMA, 300.0, 1.0).unwrap();
        let p4_fast = solve_driver_pressure(1e5, 800.0, HE_MW, HE_GAMMA, 300.0, 1.0).unwrap();
        assert!(p4_fast > p4_slow);
    }

    #[test]
    fn test_area_change_case_converges() {
        let p4 = solve_driver_pressure(1e5, 500.0, HE_MW, HE_GAMMA, 300.0, 2.0).unwrap();
        assert!(p4.is_finite() && p4 > 0.0);
    }
}
