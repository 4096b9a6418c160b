//! # Simulation Pool Module
//!
//! Parameter studies over (mechanism, temperature, pressure, mixture) grids.
//! The case list is the cartesian product in mechanism-major, mixture-minor
//! order; cases run in parallel and each one is an independent reactor solve
//! followed by ignition delay extraction. A failed case records its error
//! and does not abort the rest of the study.
use super::mechanism::{ElemReact, ReactionMech};
use super::mixture::Mixture;
use super::reactor::{BatchReactor, IdtMethod, KineticsError};
use log::{info, warn};
use prettytable::{Cell, Row, Table};
use rayon::prelude::*;
use std::fs::File;
use std::io::Write;

/// One point of the parameter study grid.
#[allow(non_snake_case)]
#[derive(Debug, Clone)]
pub struct Case {
    pub mech_label: String,
    /// Temperature [K]
    pub T: f64,
    /// Pressure [Pa]
    pub P: f64,
    /// Mixture specification string
    pub mixture: String,
}

/// A finished (or failed) case.
#[derive(Debug, Clone)]
pub struct CaseResult {
    pub case: Case,
    /// Ignition delay time [s]; NaN when the case failed or no ignition was
    /// detected
    pub tau: f64,
    pub error: Option<String>,
}

/// Settings shared by every case of a study.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    /// End time of each reactor solve [s]
    pub t_end: f64,
    pub method: IdtMethod,
    /// Signal species for the delay extraction; temperature when None
    pub species: Option<String>,
    /// Frozen (rho, cv) override applied to every case; when None the
    /// properties come from the built-in thermodynamic table
    pub properties: Option<(f64, f64)>,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            t_end: 5e-3,
            method: IdtMethod::Inflection,
            species: None,
            properties: None,
        }
    }
}

/// Builds the case grid: cartesian product of the four input axes in
/// mechanism-major, mixture-minor order.
pub fn build_grid(
    mech_labels: &[String],
    temperatures: &[f64],
    pressures: &[f64],
    mixtures: &[String],
) -> Vec<Case> {
    let mut cases = Vec::new();
    for mech_label in mech_labels {
        for temperature in temperatures {
            for pressure in pressures {
                for mixture in mixtures {
                    cases.push(Case {
                        mech_label: mech_label.clone(),
                        T: *temperature,
                        P: *pressure,
                        mixture: mixture.clone(),
                    });
                }
            }
        }
    }
    cases
}

/// Parameter study results.
pub struct SimulationPool {
    pub results: Vec<CaseResult>,
}

impl SimulationPool {
    /// Runs the full study. `mechs` pairs a label with the reaction set it
    /// names; the remaining axes are grids of initial conditions.
    pub fn parameter_study(
        mechs: &[(String, Vec<ElemReact>)],
        temperatures: &[f64],
        pressures: &[f64],
        mixtures: &[String],
        settings: &PoolSettings,
    ) -> Result<Self, KineticsError> {
        if mechs.is_empty() || temperatures.is_empty() || pressures.is_empty()
            || mixtures.is_empty()
        {
            return Err(KineticsError::InvalidParameter(
                "every parameter study axis needs at least one entry".to_string(),
            ));
        }
        let labels: Vec<String> = mechs.iter().map(|(label, _)| label.clone()).collect();
        let cases = build_grid(&labels, temperatures, pressures, mixtures);
        info!("parameter study: {} cases", cases.len());

        let results: Vec<CaseResult> = cases
            .into_par_iter()
            .map(|case| {
                let reactions = mechs
                    .iter()
                    .find(|(label, _)| *label == case.mech_label)
                    .map(|(_, reactions)| reactions.clone())
                    .unwrap_or_default();
                match run_case(&case, reactions, settings) {
                    Ok(tau) => CaseResult {
                        case,
                        tau,
                        error: None,
                    },
                    Err(e) => {
                        warn!(
                            "case failed (mech {}, T = {} K, P = {} Pa, X = {}): {}",
                            case.mech_label, case.T, case.P, case.mixture, e
                        );
                        CaseResult {
                            case,
                            tau: f64::NAN,
                            error: Some(e.to_string()),
                        }
                    }
                }
            })
            .collect();
        Ok(Self { results })
    }

    /// Ignition delay times [s] in case order.
    pub fn taus(&self) -> Vec<f64> {
        self.results.iter().map(|r| r.tau).collect()
    }

    /// The (T, tau) series of a fixed (mechanism, pressure, mixture) slice,
    /// for plotting against inverse temperature. Failed cases are skipped.
    pub fn series(&self, mech_label: &str, pressure: f64, mixture: &str) -> (Vec<f64>, Vec<f64>) {
        let mut temperature = Vec::new();
        let mut tau = Vec::new();
        for r in &self.results {
            if r.case.mech_label == mech_label
                && r.case.P == pressure
                && r.case.mixture == mixture
                && r.error.is_none()
                && r.tau.is_finite()
            {
                temperature.push(r.case.T);
                tau.push(r.tau);
            }
        }
        (temperature, tau)
    }

    pub fn pretty_print(&self) {
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("mech"),
            Cell::new("T, K"),
            Cell::new("P, Pa"),
            Cell::new("mixture"),
            Cell::new("IDT, us"),
        ]));
        for r in &self.results {
            let tau_cell = match &r.error {
                Some(e) => format!("failed: {}", e),
                None => format!("{:.2}", r.tau * 1e6),
            };
            table.add_row(Row::new(vec![
                Cell::new(&r.case.mech_label),
                Cell::new(&format!("{}", r.case.T)),
                Cell::new(&format!("{}", r.case.P)),
                Cell::new(&r.case.mixture),
                Cell::new(&tau_cell),
            ]));
        }
        table.printstd();
    }

    /// Writes the case table to a CSV file.
    pub fn save_csv(&self, path: &str) -> Result<(), KineticsError> {
        let mut file = File::create(path).map_err(|e| {
            KineticsError::InvalidParameter(format!("failed to create '{}': {}", path, e))
        })?;
        writeln!(file, "mech,T_K,P_Pa,mixture,tau_s,error").map_err(|e| {
            KineticsError::InvalidParameter(format!("failed to write '{}': {}", path, e))
        })?;
        for r in &self.results {
            writeln!(
                file,
                "{},{},{},\"{}\",{},{}",
                r.case.mech_label,
                r.case.T,
                r.case.P,
                r.case.mixture,
                r.tau,
                r.error.clone().unwrap_or_default()
            )
            .map_err(|e| {
                KineticsError::InvalidParameter(format!("failed to write '{}': {}", path, e))
            })?;
        }
        info!("parameter study saved to '{}'", path);
        Ok(())
    }
}

fn run_case(
    case: &Case,
    reactions: Vec<ElemReact>,
    settings: &PoolSettings,
) -> Result<f64, KineticsError> {
    let mech = ReactionMech::new(reactions)?;
    let mixture = Mixture::parse(&case.mixture)?;
    let mut reactor = BatchReactor::new(mech, mixture, case.T, case.P, settings.t_end)?;
    match settings.properties {
        Some((rho, cv)) => reactor.set_properties(rho, cv)?,
        None => reactor.frozen_properties_from_table()?,
    }
    reactor.solve()?;
    reactor.ignition_delay_time(settings.species.as_deref(), settings.method)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_order_mixture_minor() {
        let mechs = vec!["m1".to_string(), "m2".to_string()];
        let ts = vec![1000.0, 1100.0];
        let ps = vec![1e5];
        let xs = vec!["A".to_string(), "B".to_string()];
        let grid = build_grid(&mechs, &ts, &ps, &xs);
        assert_eq!(grid.len(), 8);
        assert_eq!(grid[0].mech_label, "m1");
        assert_eq!(grid[0].T, 1000.0);
        assert_eq!(grid[0].mixture, "A");
        assert_eq!(grid[1].mixture, "B");
        assert_eq!(grid[2].T, 1100.0);
        assert_eq!(grid[4].mech_label, "m2");
    }

    #[test]
    fn test_empty_axis_rejected() {
        let settings = PoolSettings::default();
        assert!(
            SimulationPool::parameter_study(&[], &[1000.0], &[1e5], &["A".to_string()], &settings)
                .is_err()
        );
    }

    #[test]
    fn test_study_runs_and_keeps_order() {
        let mechs = vec![(
            "first_order".to_string(),
            vec![ElemReact {
                eq: "A=>B".to_string(),
                A: 1000.0,
                n: 0.0,
                E: 0.0,
                Q: 0.0,
            }],
        )];
        let settings = PoolSettings {
            t_end: 5e-3,
            method: IdtMethod::Inflection,
            species: Some("B".to_string()),
            properties: Some((1.0, 1000.0)),
        };
        let pool = SimulationPool::parameter_study(
            &mechs,
            &[1000.0, 1200.0],
            &[1e5],
            &["A".to_string()],
            &settings,
        )
        .unwrap();
        assert_eq!(pool.results.len(), 2);
        for r in &pool.results {
            assert!(r.error.is_none(), "case failed: {:?}", r.error);
            assert!(!r.tau.is_nan());
        }
        assert_eq!(pool.results[0].case.T, 1000.0);
        assert_eq!(pool.results[1].case.T, 1200.0);
    }

    #[test]
    fn test_failed_case_does_not_poison_pool() {
        let mechs = vec![(
            "first_order".to_string(),
            vec![ElemReact {
                eq: "A=>B".to_string(),
                A: 1000.0,
                n: 0.0,
                E: 0.0,
                Q: 0.0,
            }],
        )];
        // mixture species AR is not in the mechanism, so the case must fail
        let settings = PoolSettings {
            properties: Some((1.0, 1000.0)),
            ..Default::default()
        };
        let pool = SimulationPool::parameter_study(
            &mechs,
            &[1000.0],
            &[1e5],
            &["AR".to_string()],
            &settings,
        )
        .unwrap();
        assert_eq!(pool.results.len(), 1);
        assert!(pool.results[0].error.is_some());
        assert!(pool.results[0].tau.is_nan());
    }
}
