//! # Batch Reactor Module
//!
//! Zero-dimensional homogeneous reactor behind the shock: constant-volume,
//! adiabatic, with elementary Arrhenius kinetics. The reactor state is the
//! vector of species molar concentrations [mol/m^3] plus temperature [K].
//!
//! ## Mathematical Model
//!
//! ```text
//! dC_i/dt = SUM_j( nu_ij * R_j ),    R_j = k_j(T) * PROD_i( C_i^nu_ij )
//! dT/dt   = SUM_j( Q_j * R_j ) / (rho * cv)
//! ```
//!
//! Density and mass heat capacity are frozen at the initial state; pressure
//! follows from the ideal gas law, `P = R*T*SUM(C_i)`. The constant-property
//! assumption holds well for the dilute mixtures typical of ignition delay
//! measurements.
//!
//! ## Usage Pattern
//! 1. `new()` with mechanism, mixture and initial state
//! 2. `frozen_properties_from_table()` or `set_properties()`
//! 3. `solve()`
//! 4. histories / `ignition_delay_time()` / `top_species()` / plots
use super::mechanism::{MechanismError, ReactionMech};
use super::mixture::{Mixture, MixtureError};
use super::thermo::{self, ThermoError};
use crate::constants::{GAS_CONSTANT, R};
use RustedSciThe::Utils::logger::save_matrix_to_csv;
use RustedSciThe::Utils::plots::{plots_gnulot, plots_terminal};
use RustedSciThe::numerical::ODE_api2::{SolverParam, SolverType, UniversalODESolver};
use RustedSciThe::symbolic::symbolic_engine::Expr;
use log::info;
use nalgebra::{DMatrix, DVector};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KineticsError {
    #[error("Mechanism error: {0}")]
    Mechanism(#[from] MechanismError),
    #[error("Mixture error: {0}")]
    Mixture(#[from] MixtureError),
    #[error("Thermodynamics error: {0}")]
    Thermo(#[from] ThermoError),
    #[error("Unknown species '{0}'")]
    UnknownSpecies(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error(
        "Density and heat capacity not set; call frozen_properties_from_table() or set_properties()"
    )]
    MissingProperties,
    #[error("Reactor not solved yet; call solve() first")]
    NotSolved,
    #[error("ODE solver returned no solution")]
    SolverFailed,
}

/// Method used to extract the ignition delay time from a history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdtMethod {
    /// inflection point (maximum slope)
    Inflection,
    /// maximum of the signal
    Peak,
}

impl std::str::FromStr for IdtMethod {
    type Err = KineticsError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inflection" => Ok(IdtMethod::Inflection),
            "peak" => Ok(IdtMethod::Peak),
            other => Err(KineticsError::InvalidParameter(format!(
                "Invalid method '{}'; valid methods are 'inflection' and 'peak'",
                other
            ))),
        }
    }
}

/// Ignition delay time from a signal history by the given method.
///
/// `Inflection` returns the time of the maximum forward-difference slope and
/// NaN when that maximum falls on the last interval (the signal was still
/// rising at the end of the simulation). `Peak` returns the time of the
/// signal maximum and NaN when it is the final sample.
pub fn ignition_delay_from_history(t: &DVector<f64>, x: &DVector<f64>, method: IdtMethod) -> f64 {
    let m = t.len();
    if m < 2 || x.len() != m {
        return f64::NAN;
    }
    match method {
        IdtMethod::Inflection => {
            let mut best = f64::NEG_INFINITY;
            let mut best_i = 0;
            for i in 0..m - 1 {
                let dt = t[i + 1] - t[i];
                if dt <= 0.0 {
                    continue;
                }
                let slope = (x[i + 1] - x[i]) / dt;
                if slope > best {
                    best = slope;
                    best_i = i;
                }
            }
            if best_i == m - 2 { f64::NAN } else { t[best_i] }
        }
        IdtMethod::Peak => {
            let mut best = f64::NEG_INFINITY;
            let mut best_i = 0;
            for i in 0..m {
                if x[i] > best {
                    best = x[i];
                    best_i = i;
                }
            }
            if best_i == m - 1 { f64::NAN } else { t[best_i] }
        }
    }
}

/// Constant-volume adiabatic batch reactor task.
#[allow(non_snake_case)]
pub struct BatchReactor {
    pub mech: ReactionMech,
    pub mixture: Mixture,
    /// Initial temperature [K]
    pub T0: f64,
    /// Initial pressure [Pa]
    pub P0: f64,
    /// End time [s]
    pub t_end: f64,
    /// Frozen (density [kg/m^3], mass heat capacity at constant volume
    /// [J/(kg K)]) pair
    properties: Option<(f64, f64)>,
    solvertype: SolverType,
    solver_params: HashMap<String, SolverParam>,
    stop_condition: Option<HashMap<String, f64>>,
    t: Option<DVector<f64>>,
    y: Option<DMatrix<f64>>,
}

impl BatchReactor {
    pub fn new(
        mech: ReactionMech,
        mixture: Mixture,
        temperature: f64,
        pressure: f64,
        t_end: f64,
    ) -> Result<Self, KineticsError> {
        if temperature <= 0.0 {
            return Err(KineticsError::InvalidParameter(
                "temperature must be positive".to_string(),
            ));
        }
        if pressure <= 0.0 {
            return Err(KineticsError::InvalidParameter(
                "pressure must be positive".to_string(),
            ));
        }
        if t_end <= 0.0 {
            return Err(KineticsError::InvalidParameter(
                "t_end must be positive".to_string(),
            ));
        }
        let max_step = t_end / 100.0;
        let solver_params = HashMap::from([
            ("step_size".to_owned(), SolverParam::Float(t_end * 1e-6)),
            ("tolerance".to_owned(), SolverParam::Float(1e-6)),
            ("max_iterations".to_owned(), SolverParam::Int(100000)),
            ("rtol".to_owned(), SolverParam::Float(1e-6)),
            ("atol".to_owned(), SolverParam::Float(1e-9)),
            ("max_step".to_owned(), SolverParam::Float(max_step)),
            ("first_step".to_owned(), SolverParam::OptionalFloat(None)),
            ("vectorized".to_owned(), SolverParam::Bool(false)),
            ("jac_sparsity".to_owned(), SolverParam::OptionalMatrix(None)),
            ("parallel".to_owned(), SolverParam::Bool(false)),
        ]);
        Ok(Self {
            mech,
            mixture,
            T0: temperature,
            P0: pressure,
            t_end,
            properties: None,
            solvertype: SolverType::BDF,
            solver_params,
            stop_condition: None,
            t: None,
            y: None,
        })
    }

    pub fn set_solver(&mut self, solvertype: SolverType) {
        self.solvertype = solvertype;
    }

    pub fn set_solver_params(&mut self, params: HashMap<String, SolverParam>) {
        self.solver_params = params;
    }

    pub fn set_stop_condition(&mut self, condition: Option<HashMap<String, f64>>) {
        self.stop_condition = condition;
    }

    /// Sets the frozen density [kg/m^3] and mass heat capacity at constant
    /// volume [J/(kg K)] directly. Needed for species absent from the
    /// built-in thermodynamic table.
    pub fn set_properties(&mut self, rho: f64, cv: f64) -> Result<(), KineticsError> {
        if rho <= 0.0 || cv <= 0.0 {
            return Err(KineticsError::InvalidParameter(
                "rho and cv must be positive".to_string(),
            ));
        }
        self.properties = Some((rho, cv));
        Ok(())
    }

    /// Computes the frozen properties from the built-in NASA table and the
    /// ideal gas law at the initial state.
    pub fn frozen_properties_from_table(&mut self) -> Result<(), KineticsError> {
        let mw = self.mixture.mean_molar_mass()?; // kg/kmol
        let rho = self.P0 * mw / (GAS_CONSTANT * self.T0); // kg/m^3
        let cp_molar = thermo::cp_mean(&self.mixture, self.T0)?; // J/mol/K
        let cv_molar = cp_molar - R;
        let cv = cv_molar / mw * 1000.0; // J/(kg K), mw in g/mol
        self.properties = Some((rho, cv));
        Ok(())
    }

    /// Initial concentrations [mol/m^3] in mechanism species order. Mixture
    /// species missing from the mechanism are rejected; mechanism species
    /// absent from the mixture start at zero.
    fn initial_concentrations(&self) -> Result<DVector<f64>, KineticsError> {
        let x = self.mixture.mole_fractions();
        for name in x.keys() {
            if !self.mech.substances.contains(name) {
                return Err(KineticsError::UnknownSpecies(name.clone()));
            }
        }
        let c_total = self.P0 / (R * self.T0); // mol/m^3
        let c0: Vec<f64> = self
            .mech
            .substances
            .iter()
            .map(|s| x.get(s).copied().unwrap_or(0.0) * c_total)
            .collect();
        Ok(DVector::from_vec(c0))
    }

    /// Assembles the symbolic right-hand sides in the unknown order
    /// `[substances..., T]`.
    fn create_equations(&self) -> Result<(Vec<Expr>, Vec<String>), KineticsError> {
        let (rho, cv) = self.properties.ok_or(KineticsError::MissingProperties)?;
        let k = self.mech.number_of_reactions();
        let n = self.mech.number_of_substances();
        let rates: Vec<Expr> = (0..k).map(|j| self.mech.rate_expr(j, "T")).collect();

        let mut equations = Vec::with_capacity(n + 1);
        for i in 0..n {
            let mut rhs = Expr::Const(0.0);
            for j in 0..k {
                let nu = self.mech.stoich_matrix[(j, i)];
                if nu == 0.0 {
                    continue;
                }
                rhs = rhs + Expr::Const(nu) * rates[j].clone();
            }
            equations.push(rhs);
        }
        let mut heat = Expr::Const(0.0);
        for j in 0..k {
            let q = self.mech.reactions[j].Q;
            if q == 0.0 {
                continue;
            }
            heat = heat + Expr::Const(q) * rates[j].clone();
        }
        equations.push(heat / Expr::Const(rho * cv));

        let mut unknowns = self.mech.substances.clone();
        unknowns.push("T".to_string());
        Ok((equations, unknowns))
    }

    /// Integrates the reactor ODE system from the initial state to `t_end`.
    pub fn solve(&mut self) -> Result<(), KineticsError> {
        let (equations, unknowns) = self.create_equations()?;
        let c0 = self.initial_concentrations()?;
        let mut y0 = c0.iter().copied().collect::<Vec<f64>>();
        y0.push(self.T0);

        info!(
            "batch reactor solve: {} species, {} reactions, T0 = {} K, P0 = {} Pa",
            self.mech.number_of_substances(),
            self.mech.number_of_reactions(),
            self.T0,
            self.P0
        );
        let mut ode = UniversalODESolver::new(
            equations,
            unknowns,
            "t".to_owned(),
            self.solvertype.clone(),
            0.0,
            DVector::from_vec(y0),
            self.t_end,
        );
        ode.set_parameters(self.solver_params.clone());
        if let Some(stop_condition) = self.stop_condition.clone() {
            ode.set_stop_condition(stop_condition);
        }
        ode.initialize();
        ode.solve();
        let (t, y) = ode.get_result();
        let t = t.ok_or(KineticsError::SolverFailed)?;
        let y = y.ok_or(KineticsError::SolverFailed)?;
        info!("batch reactor solve finished: {} time steps", t.len());
        self.t = Some(t);
        self.y = Some(y);
        Ok(())
    }

    fn result(&self) -> Result<(&DVector<f64>, &DMatrix<f64>), KineticsError> {
        match (&self.t, &self.y) {
            (Some(t), Some(y)) => Ok((t, y)),
            _ => Err(KineticsError::NotSolved),
        }
    }

    fn species_index(&self, species: &str) -> Result<usize, KineticsError> {
        let name = species.trim().to_uppercase();
        self.mech
            .substances
            .iter()
            .position(|s| *s == name)
            .ok_or(KineticsError::UnknownSpecies(name))
    }

    /// Reactor elapsed time [s].
    pub fn t(&self) -> Result<DVector<f64>, KineticsError> {
        Ok(self.result()?.0.clone())
    }

    /// Reactor temperature history [K].
    #[allow(non_snake_case)]
    pub fn T(&self) -> Result<DVector<f64>, KineticsError> {
        let (_, y) = self.result()?;
        Ok(y.column(self.mech.number_of_substances()).into_owned())
    }

    /// Reactor pressure history [Pa] from the ideal gas law.
    #[allow(non_snake_case)]
    pub fn P(&self) -> Result<DVector<f64>, KineticsError> {
        let (_, y) = self.result()?;
        let n = self.mech.number_of_substances();
        let mut p = DVector::zeros(y.nrows());
        for row in 0..y.nrows() {
            let c_total: f64 = (0..n).map(|i| y[(row, i)]).sum();
            p[row] = R * y[(row, n)] * c_total;
        }
        Ok(p)
    }

    /// Concentration history of a species [mol/m^3].
    pub fn concentration(&self, species: &str) -> Result<DVector<f64>, KineticsError> {
        let i = self.species_index(species)?;
        let (_, y) = self.result()?;
        Ok(y.column(i).into_owned())
    }

    /// Mole fraction history of a species.
    #[allow(non_snake_case)]
    pub fn X(&self, species: &str) -> Result<DVector<f64>, KineticsError> {
        let i = self.species_index(species)?;
        let (_, y) = self.result()?;
        let n = self.mech.number_of_substances();
        let mut x = DVector::zeros(y.nrows());
        for row in 0..y.nrows() {
            let c_total: f64 = (0..n).map(|j| y[(row, j)]).sum();
            x[row] = if c_total > 0.0 {
                y[(row, i)] / c_total
            } else {
                0.0
            };
        }
        Ok(x)
    }

    /// Ignition delay time [s] from the temperature history, or the mole
    /// fraction history of `species` when given.
    pub fn ignition_delay_time(
        &self,
        species: Option<&str>,
        method: IdtMethod,
    ) -> Result<f64, KineticsError> {
        let t = self.t()?;
        let signal = match species {
            None => self.T()?,
            Some(s) => self.X(s)?,
        };
        Ok(ignition_delay_from_history(&t, &signal, method))
    }

    /// Top `n` species by peak mole fraction in descending order; all
    /// non-excluded species when `n` is None. Exclusions are uppercased and
    /// silently ignored when absent.
    pub fn top_species(
        &self,
        n: Option<usize>,
        exclude: Option<&[&str]>,
    ) -> Result<Vec<String>, KineticsError> {
        let (_, y) = self.result()?;
        let ns = self.mech.number_of_substances();
        let mut ranked: Vec<(f64, String)> = Vec::with_capacity(ns);
        for i in 0..ns {
            let mut c_max = f64::NEG_INFINITY;
            for row in 0..y.nrows() {
                let c_total: f64 = (0..ns).map(|j| y[(row, j)]).sum();
                let x = if c_total > 0.0 {
                    y[(row, i)] / c_total
                } else {
                    0.0
                };
                if x > c_max {
                    c_max = x;
                }
            }
            ranked.push((c_max, self.mech.substances[i].clone()));
        }
        ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        let mut species: Vec<String> = ranked.into_iter().map(|(_, s)| s).collect();
        if let Some(exclude) = exclude {
            for e in exclude {
                let e = e.trim().to_uppercase();
                species.retain(|s| *s != e);
            }
        }
        match n {
            Some(n) => Ok(species.into_iter().take(n).collect()),
            None => Ok(species),
        }
    }

    pub fn plot_in_terminal(&self) -> Result<(), KineticsError> {
        let (t, y) = self.result()?;
        let mut unknowns = self.mech.substances.clone();
        unknowns.push("T".to_string());
        plots_terminal("t".to_string(), unknowns, t.clone(), y.clone());
        Ok(())
    }

    pub fn gnuplot(&self) -> Result<(), KineticsError> {
        let (t, y) = self.result()?;
        let mut unknowns = self.mech.substances.clone();
        unknowns.push("T".to_string());
        plots_gnulot("t".to_owned(), unknowns, t.clone(), y.clone());
        Ok(())
    }

    /// Saves the state histories to a CSV file.
    pub fn save_to_csv(&self, filename: Option<String>) -> Result<(), KineticsError> {
        let (t, y) = self.result()?;
        let name = filename.unwrap_or_else(|| "reactor_result.csv".to_string());
        let mut unknowns = self.mech.substances.clone();
        unknowns.push("T".to_string());
        let _ = save_matrix_to_csv(y, &unknowns, &name, t, "t");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Kinetics::mechanism::ElemReact;
    use approx::assert_relative_eq;

    fn linear_ramp_history() -> (DVector<f64>, DVector<f64>) {
        // slope grows until the 5th interval, then decays
        let t = DVector::from_vec(vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        let x = DVector::from_vec(vec![0.0, 0.1, 0.3, 0.6, 1.6, 2.0, 2.2, 2.3]);
        (t, x)
    }

    #[test]
    fn test_idt_inflection() {
        let (t, x) = linear_ramp_history();
        // max slope on interval [3, 4]
        let tau = ignition_delay_from_history(&t, &x, IdtMethod::Inflection);
        assert_relative_eq!(tau, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_idt_peak_at_end_is_nan() {
        let (t, x) = linear_ramp_history();
        // monotonic signal peaks at the last sample
        let tau = ignition_delay_from_history(&t, &x, IdtMethod::Peak);
        assert!(tau.is_nan());
    }

    #[test]
    fn test_idt_peak() {
        let t = DVector::from_vec(vec![0.0, 1.0, 2.0, 3.0]);
        let x = DVector::from_vec(vec![0.0, 2.0, 1.0, 0.5]);
        let tau = ignition_delay_from_history(&t, &x, IdtMethod::Peak);
        assert_relative_eq!(tau, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_idt_inflection_still_rising_is_nan() {
        let t = DVector::from_vec(vec![0.0, 1.0, 2.0, 3.0]);
        let x = DVector::from_vec(vec![0.0, 0.1, 0.3, 1.0]);
        let tau = ignition_delay_from_history(&t, &x, IdtMethod::Inflection);
        assert!(tau.is_nan());
    }

    #[test]
    fn test_idt_short_history() {
        let t = DVector::from_vec(vec![0.0]);
        let x = DVector::from_vec(vec![1.0]);
        assert!(ignition_delay_from_history(&t, &x, IdtMethod::Inflection).is_nan());
    }

    #[test]
    fn test_method_from_str() {
        assert_eq!(
            "inflection".parse::<IdtMethod>().unwrap(),
            IdtMethod::Inflection
        );
        assert_eq!("Peak".parse::<IdtMethod>().unwrap(), IdtMethod::Peak);
        assert!("slope".parse::<IdtMethod>().is_err());
    }

    fn simple_reactor() -> BatchReactor {
        let mech = ReactionMech::new(vec![ElemReact {
            eq: "A=>B".to_string(),
            A: 1000.0,
            n: 0.0,
            E: 0.0,
            Q: 0.0,
        }])
        .unwrap();
        let mixture = Mixture::parse("A").unwrap();
        let mut reactor = BatchReactor::new(mech, mixture, 1000.0, 101325.0, 5e-3).unwrap();
        reactor.set_properties(1.0, 1000.0).unwrap();
        reactor
    }

    #[test]
    fn test_initial_concentrations() {
        let reactor = simple_reactor();
        let c0 = reactor.initial_concentrations().unwrap();
        assert_relative_eq!(c0[0], 101325.0 / (R * 1000.0), max_relative = 1e-12);
        assert_relative_eq!(c0[1], 0.0);
    }

    #[test]
    fn test_mixture_species_must_be_in_mechanism() {
        let mech = ReactionMech::new(vec![ElemReact {
            eq: "A=>B".to_string(),
            A: 1.0,
            n: 0.0,
            E: 0.0,
            Q: 0.0,
        }])
        .unwrap();
        let mixture = Mixture::parse("AR").unwrap();
        let mut reactor = BatchReactor::new(mech, mixture, 1000.0, 1e5, 1e-3).unwrap();
        reactor.set_properties(1.0, 1000.0).unwrap();
        assert!(matches!(
            reactor.solve(),
            Err(KineticsError::UnknownSpecies(_))
        ));
    }

    #[test]
    fn test_accessors_before_solve() {
        let reactor = simple_reactor();
        assert!(matches!(reactor.t(), Err(KineticsError::NotSolved)));
        assert!(matches!(reactor.T(), Err(KineticsError::NotSolved)));
    }

    // First order isothermal decay A => B with constant k: C_A(t) = C0*exp(-k t).
    #[test]
    fn test_first_order_decay_against_analytic() {
        let mut reactor = simple_reactor();
        reactor.solve().unwrap();
        let t = reactor.t().unwrap();
        let c_a = reactor.concentration("A").unwrap();
        let c0 = 101325.0 / (R * 1000.0);
        let k = 1000.0;
        let last = t.len() - 1;
        assert_relative_eq!(
            c_a[last],
            c0 * f64::exp(-k * t[last]),
            max_relative = 5e-2
        );
    }

    #[test]
    fn test_mass_conservation_in_decay() {
        let mut reactor = simple_reactor();
        reactor.solve().unwrap();
        let c_a = reactor.concentration("A").unwrap();
        let c_b = reactor.concentration("B").unwrap();
        let c0 = 101325.0 / (R * 1000.0);
        let last = c_a.len() - 1;
        assert_relative_eq!(c_a[last] + c_b[last], c0, max_relative = 1e-2);
    }

    #[test]
    fn test_top_species_after_decay() {
        let mut reactor = simple_reactor();
        reactor.solve().unwrap();
        // A starts at X=1, so it tops the peak mole fraction ranking
        let top = reactor.top_species(Some(1), None).unwrap();
        assert_eq!(top, vec!["A".to_string()]);
        let top = reactor.top_species(None, Some(&["A"])).unwrap();
        assert_eq!(top, vec!["B".to_string()]);
    }
}
